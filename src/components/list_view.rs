//! List View Component
//!
//! Sortable, filterable task table next to the project tree.

use chrono::Local;
use leptos::prelude::*;

use taskflow_core::domain::{Priority, TaskStatus};
use taskflow_core::selectors::{filter_and_sort, is_overdue, SortKey, TaskFilter};

use crate::components::{ProjectTree, TaskForm, TaskFormMode};
use crate::store::{use_app_store, AppStateStoreFields};

const COLUMNS: [(SortKey, &str); 4] = [
    (SortKey::Title, "Title"),
    (SortKey::Status, "Status"),
    (SortKey::Priority, "Priority"),
    (SortKey::DueDate, "Due"),
];

#[component]
pub fn ListView() -> impl IntoView {
    let store = use_app_store();
    let today = Local::now().date_naive();

    let (filter, set_filter) = signal(TaskFilter::default());
    let (sort_key, set_sort_key) = signal(SortKey::default());
    let (descending, set_descending) = signal(false);
    let (project, set_project) = signal(None::<String>);
    let (form, set_form) = signal(None::<TaskFormMode>);

    let rows = move || {
        let board = store.board().read();
        let scoped: Vec<_> = match project.get() {
            Some(id) => board.tasks_by_project(Some(&id)).into_iter().cloned().collect(),
            None => board.all_tasks().to_vec(),
        };
        filter_and_sort(&scoped, &filter.get(), sort_key.get(), descending.get())
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    };

    let assignees = move || {
        let mut names: Vec<String> = store
            .board()
            .read()
            .all_tasks()
            .iter()
            .flat_map(|t| t.assignees.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    };

    let sort_by = move |key: SortKey| {
        if sort_key.get_untracked() == key {
            set_descending.update(|d| *d = !*d);
        } else {
            set_sort_key.set(key);
            set_descending.set(false);
        }
    };

    view! {
        <div class="list-layout">
            <ProjectTree selected=project on_select={move |id: Option<String>| set_project.set(id)} />
            <div class="list-view">
                <div class="list-filters">
                    <input
                        type="search"
                        placeholder="Search tasks"
                        prop:value=move || filter.get().text
                        on:input=move |ev| set_filter.update(|f| f.text = event_target_value(&ev))
                    />
                    <select on:change=move |ev| set_filter.update(|f| f.status = event_target_value(&ev).parse().ok())>
                        <option value="">"Any status"</option>
                        {TaskStatus::ALL.into_iter().map(|s| view! { <option value=s.as_str()>{s.label()}</option> }).collect_view()}
                    </select>
                    <select on:change=move |ev| set_filter.update(|f| f.priority = event_target_value(&ev).parse::<Priority>().ok())>
                        <option value="">"Any priority"</option>
                        {[Priority::High, Priority::Medium, Priority::Low].into_iter().map(|p| view! { <option value=p.as_str()>{p.as_str()}</option> }).collect_view()}
                    </select>
                    <select on:change=move |ev| {
                        let v = event_target_value(&ev);
                        set_filter.update(|f| f.assignee = Some(v).filter(|a| !a.is_empty()));
                    }>
                        <option value="">"Anyone"</option>
                        {move || assignees().into_iter().map(|a| view! { <option value=a.clone()>{a.clone()}</option> }).collect_view()}
                    </select>
                    <button on:click=move |_| set_form.set(Some(TaskFormMode::Create { status: TaskStatus::Todo, date: None }))>
                        "+ Task"
                    </button>
                </div>
                <table class="task-table">
                    <thead>
                        <tr>
                            {COLUMNS.into_iter().map(|(key, label)| view! {
                                <th on:click=move |_| sort_by(key)>
                                    {label}
                                    {move || (sort_key.get() == key).then(|| if descending.get() { " ▼" } else { " ▲" })}
                                </th>
                            }).collect_view()}
                            <th>"Assignees"</th>
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=rows
                            key=|t| (t.id.clone(), t.status, t.priority, t.due_date, t.title.clone())
                            children=move |task| {
                                let id = task.id.clone();
                                let overdue = is_overdue(&task, today);
                                view! {
                                    <tr class:overdue=overdue on:click=move |_| set_form.set(Some(TaskFormMode::Edit(id.clone())))>
                                        <td>{task.title.clone()}</td>
                                        <td>{task.status.label()}</td>
                                        <td>{task.priority.map(|p| p.as_str()).unwrap_or("-")}</td>
                                        <td>{task.due_date.map(|d| d.to_string()).unwrap_or_default()}</td>
                                        <td>{task.assignees.join(", ")}</td>
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>
        </div>
        {move || form.get().map(|mode| view! {
            <TaskForm mode=mode on_close=move |_: ()| set_form.set(None) />
        })}
    }
}
