//! Nav Bar Component
//!
//! View switcher, unread badge and the signed-in user.

use leptos::prelude::*;

use taskflow_core::i18n::{self, Label};

use crate::context::{AppContext, View};
use crate::storage;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn NavBar() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let unread = move || store.notifications().read().unread_count();
    let is_admin = move || store.auth().read().is_admin();
    let language = move || store.auth().read().user().map(|u| u.language).unwrap_or_default();
    let user_label = move || {
        store
            .auth()
            .read()
            .user()
            .map(|u| format!("{} ({})", u.name, u.role.as_str()))
            .unwrap_or_default()
    };

    let logout = move |_| {
        storage::remove(storage::TOKEN_KEY);
        storage::remove(storage::USER_KEY);
        store.auth().write().logout();
        ctx.navigate(View::Kanban);
        log::info!("[NAV] signed out");
    };

    view! {
        <nav class="nav-bar">
            <span class="brand">"TaskFlow"</span>
            {View::NAV
                .into_iter()
                .map(|view| {
                    let visible = move || !view.admin_only() || is_admin();
                    view! {
                        <Show when=visible>
                            <button
                                class="nav-btn"
                                class:active=move || ctx.view.get() == view
                                on:click=move |_| ctx.navigate(view)
                            >
                                {move || view.label(language())}
                                {move || {
                                    let count = unread();
                                    (view == View::Notifications && count > 0)
                                        .then(|| view! { <span class="badge">{count}</span> })
                                }}
                            </button>
                        </Show>
                    }
                })
                .collect_view()}
            <span class="nav-spacer"></span>
            <span class="nav-user">{user_label}</span>
            <button class="nav-btn" on:click=logout>{move || i18n::text(language(), Label::SignOut)}</button>
        </nav>
    }
}
