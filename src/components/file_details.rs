//! File Details Component
//!
//! Side panel for one file: metadata, sharing and its activity history.

use leptos::prelude::*;

use taskflow_core::domain::PermissionLevel;

use crate::context::AppContext;
use crate::store::{
    store_share_file, store_share_folder, store_unshare_file, use_app_store, AppStateStoreFields,
};

const LEVELS: [PermissionLevel; 4] = [
    PermissionLevel::View,
    PermissionLevel::Edit,
    PermissionLevel::Delete,
    PermissionLevel::Admin,
];

#[component]
pub fn FileDetails(file_id: String, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let file_id = StoredValue::new(file_id);

    let (share_user, set_share_user) = signal(String::new());
    let (share_level, set_share_level) = signal(PermissionLevel::View);
    let (whole_folder, set_whole_folder) = signal(false);

    let file = move || file_id.with_value(|id| store.files().read().file(id).cloned());
    let activities = move || {
        file_id.with_value(|id| {
            store
                .activity()
                .read()
                .file_activities(id)
                .into_iter()
                .take(20)
                .cloned()
                .collect::<Vec<_>>()
        })
    };
    let stats = move || file_id.with_value(|id| store.activity().read().stats(id));

    let share = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let user = share_user.get_untracked().trim().to_string();
        if user.is_empty() {
            return;
        }
        let level = share_level.get_untracked();
        let result = if whole_folder.get_untracked() {
            let folder = file().and_then(|f| f.folder_id);
            match folder {
                Some(folder_id) => store_share_folder(&store, &folder_id, &user, level, true),
                None => {
                    ctx.error("This file is not in a folder");
                    return;
                }
            }
        } else {
            file_id.with_value(|id| store_share_file(&store, id, &user, level))
        };
        match result {
            Ok(()) => {
                set_share_user.set(String::new());
                ctx.success(format!("Shared with {}", user));
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    view! {
        <aside class="file-details">
            <header>
                <h3>{move || file().map(|f| f.name).unwrap_or_default()}</h3>
                <button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
            </header>
            {move || file().map(|f| view! {
                <dl class="file-meta">
                    <dt>"Type"</dt><dd>{f.mime_type.clone()}</dd>
                    <dt>"Owner"</dt><dd>{f.created_by.clone()}</dd>
                    <dt>"Created"</dt><dd>{f.created_at.format("%Y-%m-%d %H:%M").to_string()}</dd>
                    <dt>"Versions"</dt><dd>{f.version_history.len().max(1)}</dd>
                </dl>
                {f.is_image().then(|| view! { <img class="file-preview" src=f.url.clone() alt=f.name.clone() /> })}
            })}

            <section class="file-sharing">
                <h4>"Access"</h4>
                <ul>
                    {move || file().map(|f| f.permissions).unwrap_or_default().into_iter().map(|p| {
                        let user_id = p.user_id.clone();
                        view! {
                            <li>
                                {p.user_name.clone().unwrap_or_else(|| p.user_id.clone())}
                                " · " {p.permission.as_str()}
                                <button class="delete-btn" on:click=move |_| {
                                    let result = file_id.with_value(|id| store_unshare_file(&store, id, &user_id));
                                    if let Err(e) = result {
                                        ctx.error(e.to_string());
                                    }
                                }>"×"</button>
                            </li>
                        }
                    }).collect_view()}
                </ul>
                <form on:submit=share>
                    <input
                        type="text"
                        placeholder="User id"
                        prop:value=move || share_user.get()
                        on:input=move |ev| set_share_user.set(event_target_value(&ev))
                    />
                    <select on:change=move |ev| {
                        if let Ok(level) = event_target_value(&ev).parse() { set_share_level.set(level); }
                    }>
                        {LEVELS.into_iter().map(|l| view! { <option value=l.as_str()>{l.as_str()}</option> }).collect_view()}
                    </select>
                    <label>
                        <input type="checkbox" on:change=move |ev| set_whole_folder.set(event_target_checked(&ev)) />
                        "Whole folder"
                    </label>
                    <button type="submit">"Share"</button>
                </form>
            </section>

            <section class="file-activity">
                <h4>"Activity"</h4>
                {move || {
                    let s = stats();
                    view! {
                        <p class="activity-stats">
                            {format!("{} views · {} downloads · {} edits", s.views, s.downloads, s.edits)}
                        </p>
                        {s.most_active_hours.first().map(|h| view! {
                            <p class="hint">{format!("Busiest hour: {:02}:00", h.hour)}</p>
                        })}
                    }
                }}
                <ul>
                    {move || activities().into_iter().map(|a| view! {
                        <li>
                            <span class="activity-type">{a.activity_type.as_str()}</span>
                            " " {a.details.unwrap_or_default()}
                            <span class="time">{a.performed_at.format("%m-%d %H:%M").to_string()}</span>
                        </li>
                    }).collect_view()}
                </ul>
            </section>
        </aside>
    }
}
