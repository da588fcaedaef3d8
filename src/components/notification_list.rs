//! Notification List Component

use leptos::prelude::*;

use taskflow_core::domain::{NotificationKind, RelatedKind};

use crate::components::{TaskForm, TaskFormMode};
use crate::store::{use_app_store, AppStateStoreFields};

fn kind_icon(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Mention => "@",
        NotificationKind::Assignment => "👤",
        NotificationKind::Deadline => "⏰",
        NotificationKind::Comment => "💬",
        NotificationKind::System => "ℹ",
    }
}

#[component]
pub fn NotificationList() -> impl IntoView {
    let store = use_app_store();
    let (form, set_form) = signal(None::<TaskFormMode>);

    let notifications = move || store.notifications().read().notifications().to_vec();

    view! {
        <div class="notification-list">
            <header class="view-header">
                <h2>"Notifications"</h2>
                <span class="unread">{move || format!("{} unread", store.notifications().read().unread_count())}</span>
                <button on:click=move |_| store.notifications().write().mark_all_as_read()>"Mark all read"</button>
                <button on:click=move |_| store.notifications().write().clear_all()>"Clear all"</button>
            </header>
            <Show
                when=move || !store.notifications().read().notifications().is_empty()
                fallback=|| view! { <p class="empty-state">"You're all caught up"</p> }
            >
                <For
                    each=notifications
                    key=|n| (n.id.clone(), n.is_read)
                    children=move |n| {
                        let read_id = n.id.clone();
                        let delete_id = n.id.clone();
                        let task_id = n.related_to
                            .as_ref()
                            .filter(|r| r.kind == RelatedKind::Task)
                            .map(|r| r.id.clone());
                        view! {
                            <div
                                class="notification"
                                class:unread=!n.is_read
                                on:click=move |_| {
                                    store.notifications().write().mark_as_read(&read_id);
                                    let task = task_id
                                        .clone()
                                        .filter(|id| store.board().read_untracked().task_by_id(id).is_some());
                                    if let Some(id) = task {
                                        set_form.set(Some(TaskFormMode::Edit(id)));
                                    }
                                }
                            >
                                <span class="icon">{kind_icon(n.kind)}</span>
                                <div class="body">
                                    <strong>{n.title}</strong>
                                    <p>{n.message}</p>
                                    <span class="time">{n.created_at.format("%Y-%m-%d %H:%M").to_string()}</span>
                                </div>
                                <button
                                    class="delete-btn"
                                    on:click=move |ev| {
                                        ev.stop_propagation();
                                        store.notifications().write().delete(&delete_id);
                                    }
                                >
                                    "×"
                                </button>
                            </div>
                        }
                    }
                />
            </Show>
        </div>
        {move || form.get().map(|mode| view! {
            <TaskForm mode=mode on_close=move |_: ()| set_form.set(None) />
        })}
    }
}
