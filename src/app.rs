//! TaskFlow Frontend App
//!
//! Root component: provides the store and context, gates everything behind
//! the login screen and switches between views.

use chrono::Local;
use leptos::prelude::*;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};
use reactive_stores::Store;

use crate::components::{
    handle_card_drop, start_pomodoro_clock, AdminConsole, CalendarView, FileExplorer, KanbanBoard,
    ListView, LoginForm, MessagingView, NavBar, NotificationList, PomodoroPanel, SettingsPanel, TimelineView,
    ToastStack,
};
use crate::config::AppConfig;
use crate::context::{AppContext, View};
use crate::store::{store_check_deadlines, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let today = Local::now().date_naive();
    let ctx = AppContext::new(AppConfig::load(), today);
    let store = Store::new(AppState::load());

    // Provide context to all children
    provide_context(ctx);
    provide_context(store);

    // Board drag-and-drop, bound once for the app's lifetime
    let dnd = create_dnd_signals();
    bind_global_mouseup(dnd, move |card_id, target| handle_card_drop(&store, &ctx, card_id, target));
    provide_context(dnd);

    start_pomodoro_clock(store, ctx);

    // Deadline reminders whenever someone signs in
    Effect::new(move |_| {
        let signed_in = store.auth().read().user().is_some();
        if signed_in {
            let added = untrack(|| store_check_deadlines(&store, today));
            if added > 0 {
                log::info!("[APP] {} deadline reminder(s)", added);
                ctx.info(format!("{} task(s) due tomorrow", added));
            }
        }
    });

    let is_authenticated = move || store.auth().read().state().is_authenticated;

    view! {
        <Show when=is_authenticated fallback=|| view! { <LoginForm /> }>
            <div class="app-layout">
                <NavBar />
                <main class="main-content">
                    {move || {
                        let view = ctx.view.get();
                        if view.admin_only() && !store.auth().read().is_admin() {
                            return view! {
                                <p class="empty-state">"Only administrators can open this page."</p>
                            }.into_any();
                        }
                        match view {
                            View::Kanban => view! { <KanbanBoard /> }.into_any(),
                            View::Calendar => view! { <CalendarView /> }.into_any(),
                            View::Timeline => view! { <TimelineView /> }.into_any(),
                            View::List => view! { <ListView /> }.into_any(),
                            View::Files => view! { <FileExplorer /> }.into_any(),
                            View::Messaging => view! { <MessagingView /> }.into_any(),
                            View::Notifications => view! { <NotificationList /> }.into_any(),
                            View::Pomodoro => view! { <PomodoroPanel /> }.into_any(),
                            View::Admin => view! { <AdminConsole /> }.into_any(),
                            View::Settings => view! { <SettingsPanel /> }.into_any(),
                        }
                    }}
                </main>
            </div>
        </Show>
        <ToastStack />
    }
}
