//! Project Tree Component
//!
//! Nested projects with task-based progress. Selecting a project scopes the
//! list view; new projects go under the selection.

use chrono::Local;
use leptos::prelude::*;

use taskflow_core::domain::{Priority, ProjectDraft, ProjectNode, ProjectStatus};

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::store::{current_user_id, current_user_name, use_app_store, AppStateStoreFields};

fn render_node(
    node: ProjectNode,
    progress: &dyn Fn(&str) -> u8,
    selected: ReadSignal<Option<String>>,
    on_select: Callback<Option<String>>,
) -> AnyView {
    let id = node.project.id.clone();
    let select_id = id.clone();
    let pct = progress(&id);
    let children: Vec<AnyView> = node
        .children
        .into_iter()
        .map(|child| render_node(child, progress, selected, on_select))
        .collect();

    view! {
        <li>
            <div
                class="project-row"
                class:selected=move || selected.get().as_deref() == Some(id.as_str())
                on:click=move |_| on_select.run(Some(select_id.clone()))
            >
                <span class="project-name">{node.project.name}</span>
                <progress max="100" value=pct.to_string()></progress>
                <span class="project-pct">{format!("{}%", pct)}</span>
            </div>
            {(!children.is_empty()).then(|| view! { <ul class="project-children">{children}</ul> })}
        </li>
    }
    .into_any()
}

#[component]
pub fn ProjectTree(
    selected: ReadSignal<Option<String>>,
    #[prop(into)] on_select: Callback<Option<String>>,
) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (new_name, set_new_name) = signal(String::new());

    let tree = move || {
        let projects = store.projects().read();
        let board = store.board().read();
        let progress = |id: &str| projects.progress_from_tasks(id, board.all_tasks());
        projects
            .hierarchy()
            .into_iter()
            .map(|node| render_node(node, &progress, selected, on_select))
            .collect::<Vec<_>>()
    };

    let add = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get_untracked();
        if name.trim().is_empty() {
            return;
        }
        let draft = ProjectDraft {
            name: name.trim().to_string(),
            description: None,
            start_date: Local::now().date_naive(),
            end_date: None,
            status: ProjectStatus::Planning,
            priority: Priority::Medium,
            team_members: vec![current_user_name(&store)],
            created_by: current_user_id(&store),
            tags: Vec::new(),
            parent_id: selected.get_untracked(),
        };
        let result = store.projects().write().add(draft);
        match result {
            Ok(project) => {
                set_new_name.set(String::new());
                ctx.success(format!("Project \"{}\" created", project.name));
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let delete_selected = move |_: ()| {
        let Some(id) = selected.get_untracked() else { return };
        let result = store.projects().write().delete(&id);
        match result {
            Ok(removed) => {
                on_select.run(None);
                ctx.info(format!("Removed {} project(s)", removed.len()));
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    view! {
        <aside class="project-tree">
            <header>
                <h3 on:click=move |_| on_select.run(None)>"Projects"</h3>
                <Show when=move || selected.get().is_some()>
                    <DeleteConfirmButton button_class="delete-btn" on_confirm=delete_selected />
                </Show>
            </header>
            <ul>{tree}</ul>
            <form class="project-add" on:submit=add>
                <input
                    type="text"
                    placeholder=move || if selected.get().is_some() { "New sub-project" } else { "New project" }
                    prop:value=move || new_name.get()
                    on:input=move |ev| set_new_name.set(event_target_value(&ev))
                />
                <button type="submit">"Add"</button>
            </form>
        </aside>
    }
}
