//! File Explorer Component
//!
//! Folder tree, breadcrumbs and the file list of the current folder.
//! Uploads become object URLs; nothing leaves the browser.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use taskflow_core::domain::{ActivityType, FileUpload, FolderDraft, PermissionLevel, StoredFile};
use taskflow_core::permission;

use crate::components::{DeleteConfirmButton, FileDetails};
use crate::context::AppContext;
use crate::store::{
    current_user_id, store_create_folder, store_delete_file, store_delete_folder, store_log_file,
    store_move_file, store_move_folder, store_rename_file, store_upload_file, use_app_store,
    AppStateStoreFields, AppStore,
};

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 { format!("{} B", bytes) } else { format!("{:.1} {}", size, UNITS[unit]) }
}

/// Whether the signed-in user holds `level` on the file
fn can(store: &AppStore, file: &StoredFile, level: PermissionLevel) -> bool {
    let user = current_user_id(store);
    permission::check_file_access(file, &user, level, &store.files().read_untracked().folders)
}

/// Files picked in an `<input type="file">`
fn picked_files(ev: &web_sys::Event) -> Vec<FileUpload> {
    let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
        return Vec::new();
    };
    let Some(list) = input.files() else {
        return Vec::new();
    };
    let uploads = (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|file| match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => Some(FileUpload {
                name: file.name(),
                mime_type: file.type_(),
                size: file.size() as u64,
                url,
            }),
            Err(e) => {
                log::error!("[FILES] could not read {}: {:?}", file.name(), e);
                None
            }
        })
        .collect();
    input.set_value("");
    uploads
}

fn render_folder(
    store: AppStore,
    folder_id: String,
    name: String,
    current: ReadSignal<Option<String>>,
    set_current: WriteSignal<Option<String>>,
) -> AnyView {
    let children: Vec<AnyView> = store
        .files()
        .read_untracked()
        .subfolders(Some(&folder_id))
        .into_iter()
        .map(|f| (f.id.clone(), f.name.clone()))
        .collect::<Vec<_>>()
        .into_iter()
        .map(|(id, name)| render_folder(store, id, name, current, set_current))
        .collect();
    let is_current = {
        let id = folder_id.clone();
        move || current.get().as_deref() == Some(id.as_str())
    };

    view! {
        <li>
            <span
                class="folder-name"
                class:selected=is_current
                on:click=move |_| set_current.set(Some(folder_id.clone()))
            >
                "📁 " {name}
            </span>
            {(!children.is_empty()).then(|| view! { <ul>{children}</ul> })}
        </li>
    }
    .into_any()
}

#[component]
pub fn FileExplorer() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let (current, set_current) = signal(None::<String>);
    let (query, set_query) = signal(String::new());
    let (favorites_only, set_favorites_only) = signal(false);
    let (selected, set_selected) = signal(None::<String>);
    let (new_folder, set_new_folder) = signal(String::new());
    let (renaming, set_renaming) = signal(None::<(String, String)>);

    let folder_tree = move || {
        let roots: Vec<(String, String)> = store
            .files()
            .read()
            .subfolders(None)
            .into_iter()
            .map(|f| (f.id.clone(), f.name.clone()))
            .collect();
        roots
            .into_iter()
            .map(|(id, name)| render_folder(store, id, name, current, set_current))
            .collect::<Vec<_>>()
    };

    let crumbs = move || {
        current
            .get()
            .map(|id| {
                store
                    .files()
                    .read()
                    .breadcrumbs(&id)
                    .into_iter()
                    .map(|f| (f.id.clone(), f.name.clone()))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    };

    let visible_files = move || {
        let user = current_user_id(&store);
        let files = store.files().read();
        let q = query.get();
        let candidates = if q.trim().is_empty() {
            files.files_in_folder(current.get().as_deref())
        } else {
            files.search(&q)
        };
        candidates
            .into_iter()
            .filter(|f| !favorites_only.get() || f.favorite)
            .filter(|f| permission::check_file_access(f, &user, PermissionLevel::View, &files.folders))
            .cloned()
            .collect::<Vec<_>>()
    };

    let folder_options = move || {
        store
            .files()
            .read()
            .folders
            .iter()
            .map(|f| (f.id.clone(), f.path.clone()))
            .collect::<Vec<_>>()
    };

    let on_upload = move |ev: web_sys::Event| {
        let folder = current.get_untracked();
        let uploads = picked_files(&ev);
        let count = uploads.len();
        for upload in uploads {
            store_upload_file(&store, upload, folder.as_deref());
        }
        if count > 0 {
            ctx.success(format!("Uploaded {} file(s)", count));
        }
    };

    let create_folder = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = FolderDraft {
            name: Some(new_folder.get_untracked()).filter(|n| !n.trim().is_empty()),
            parent_id: current.get_untracked(),
            ..Default::default()
        };
        let folder = store_create_folder(&store, draft);
        set_new_folder.set(String::new());
        ctx.success(format!("Created {}", folder.path));
    };

    let delete_current = move |_: ()| {
        let Some(id) = current.get_untracked() else { return };
        let parent = store.files().read_untracked().folder(&id).and_then(|f| f.parent_id.clone());
        match store_delete_folder(&store, &id) {
            Ok(n) => {
                set_current.set(parent);
                ctx.info(format!("Deleted {} folder(s)", n));
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let move_current = move |ev: web_sys::Event| {
        let Some(id) = current.get_untracked() else { return };
        let target = event_target_value(&ev);
        if target.is_empty() {
            return;
        }
        let target = Some(target.as_str()).filter(|t| *t != "__root");
        if let Err(e) = store_move_folder(&store, &id, target) {
            ctx.error(e.to_string());
        }
    };

    let commit_rename = move || {
        if let Some((id, name)) = renaming.get_untracked() {
            if !name.trim().is_empty() {
                if let Err(e) = store_rename_file(&store, &id, name.trim()) {
                    ctx.error(e.to_string());
                }
            }
        }
        set_renaming.set(None);
    };

    view! {
        <div class="file-explorer">
            <aside class="folder-sidebar">
                <div class="folder-name" class:selected=move || current.get().is_none() on:click=move |_| set_current.set(None)>
                    "All files"
                </div>
                <ul class="folder-tree">{folder_tree}</ul>
                <form class="new-folder" on:submit=create_folder>
                    <input
                        type="text"
                        placeholder="New folder"
                        prop:value=move || new_folder.get()
                        on:input=move |ev| set_new_folder.set(event_target_value(&ev))
                    />
                    <button type="submit">"+"</button>
                </form>
            </aside>

            <section class="file-main">
                <header class="file-toolbar">
                    <nav class="breadcrumbs">
                        <span on:click=move |_| set_current.set(None)>"Root"</span>
                        {move || crumbs().into_iter().map(|(id, name)| view! {
                            " / "
                            <span on:click=move |_| set_current.set(Some(id.clone()))>{name}</span>
                        }).collect_view()}
                    </nav>
                    <input
                        type="search"
                        placeholder="Search files"
                        prop:value=move || query.get()
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                    />
                    <label>
                        <input type="checkbox" on:change=move |ev| set_favorites_only.set(event_target_checked(&ev)) />
                        "Favorites"
                    </label>
                    <label class="upload-btn">
                        "Upload"
                        <input type="file" multiple=true on:change=on_upload />
                    </label>
                    <Show when=move || current.get().is_some()>
                        <select on:change=move_current>
                            <option value="">"Move folder to..."</option>
                            <option value="__root">"Root"</option>
                            {move || folder_options().into_iter().map(|(id, path)| view! {
                                <option value=id>{path}</option>
                            }).collect_view()}
                        </select>
                        <DeleteConfirmButton button_class="delete-btn" on_confirm=delete_current />
                    </Show>
                </header>

                <table class="file-table">
                    <thead>
                        <tr><th></th><th>"Name"</th><th>"Type"</th><th>"Size"</th><th>"Modified"</th><th></th></tr>
                    </thead>
                    <tbody>
                        <For
                            each=visible_files
                            key=|f| (f.id.clone(), f.name.clone(), f.favorite, f.folder_id.clone(), f.permissions.len())
                            children=move |file| {
                                let id = file.id.clone();
                                let fav_id = id.clone();
                                let select_id = id.clone();
                                let rename_id = id.clone();
                                let delete_id = id.clone();
                                let move_id = id.clone();
                                let view_file = file.clone();
                                let download_file = file.clone();
                                let name = file.name.clone();
                                let can_edit = can(&store, &file, PermissionLevel::Edit);
                                let can_delete = can(&store, &file, PermissionLevel::Delete);
                                let is_renaming = {
                                    let id = id.clone();
                                    move || renaming.get().is_some_and(|(r, _)| r == id)
                                };
                                view! {
                                    <tr class:selected=move || selected.get().as_deref() == Some(id.as_str())
                                        on:click=move |_| set_selected.set(Some(select_id.clone()))>
                                        <td>
                                            <button class="star-btn" on:click=move |ev| {
                                                ev.stop_propagation();
                                                if let Err(e) = store.files().write().toggle_favorite(&fav_id) {
                                                    ctx.error(e.to_string());
                                                }
                                            }>{if file.favorite { "★" } else { "☆" }}</button>
                                        </td>
                                        <td>
                                            <Show
                                                when=is_renaming.clone()
                                                fallback=move || {
                                                    let opened = view_file.clone();
                                                    view! {
                                                        <a
                                                            href=view_file.url.clone()
                                                            target="_blank"
                                                            on:click=move |ev| {
                                                                ev.stop_propagation();
                                                                store_log_file(&store, &opened, ActivityType::View);
                                                            }
                                                        >
                                                            {view_file.name.clone()}
                                                        </a>
                                                    }
                                                }
                                            >
                                                <input
                                                    type="text"
                                                    prop:value=move || renaming.get().map(|(_, n)| n).unwrap_or_default()
                                                    on:input=move |ev| {
                                                        let text = event_target_value(&ev);
                                                        set_renaming.update(|r| if let Some((_, n)) = r { *n = text; });
                                                    }
                                                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                                                        if ev.key() == "Enter" { commit_rename(); }
                                                        if ev.key() == "Escape" { set_renaming.set(None); }
                                                    }
                                                    on:blur=move |_| commit_rename()
                                                />
                                            </Show>
                                        </td>
                                        <td>{file.mime_type.clone()}</td>
                                        <td>{human_size(file.size)}</td>
                                        <td>{file.updated_at.format("%Y-%m-%d").to_string()}</td>
                                        <td class="file-actions">
                                            <a
                                                href=download_file.url.clone()
                                                download=download_file.name.clone()
                                                on:click=move |ev| {
                                                    ev.stop_propagation();
                                                    store_log_file(&store, &download_file, ActivityType::Download);
                                                }
                                            >"⬇"</a>
                                            {can_edit.then(|| {
                                                let rename_id = rename_id.clone();
                                                let name = name.clone();
                                                let move_id = move_id.clone();
                                                view! {
                                                    <button on:click=move |ev| {
                                                        ev.stop_propagation();
                                                        set_renaming.set(Some((rename_id.clone(), name.clone())));
                                                    }>"Rename"</button>
                                                    <select
                                                        on:click=|ev| ev.stop_propagation()
                                                        on:change=move |ev| {
                                                            let target = event_target_value(&ev);
                                                            let target = Some(target.as_str()).filter(|t| *t != "__root");
                                                            if let Err(e) = store_move_file(&store, &move_id, target) {
                                                                ctx.error(e.to_string());
                                                            }
                                                        }
                                                    >
                                                        <option value="" selected=true disabled=true>"Move to..."</option>
                                                        <option value="__root">"Root"</option>
                                                        {folder_options().into_iter().map(|(id, path)| view! {
                                                            <option value=id>{path}</option>
                                                        }).collect_view()}
                                                    </select>
                                                }
                                            })}
                                            {can_delete.then(|| {
                                                let delete_id = delete_id.clone();
                                                view! {
                                                    <DeleteConfirmButton
                                                        button_class="delete-btn"
                                                        on_confirm=move |_: ()| {
                                                            match store_delete_file(&store, &delete_id) {
                                                                Ok(file) => ctx.info(format!("Deleted {}", file.name)),
                                                                Err(e) => ctx.error(e.to_string()),
                                                            }
                                                            set_selected.set(None);
                                                        }
                                                    />
                                                }
                                            })}
                                        </td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
                <Show when=move || visible_files().is_empty()>
                    <p class="empty-state">"No files here"</p>
                </Show>
            </section>

            {move || selected.get().map(|id| view! { <FileDetails file_id=id on_close=move |_: ()| set_selected.set(None) /> })}
        </div>
    }
}
