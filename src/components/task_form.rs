//! Task Form Component
//!
//! Modal editor for creating and editing tasks, with dependency picking and
//! the comment thread of an existing task.

use chrono::NaiveDate;
use leptos::prelude::*;

use taskflow_core::domain::{Priority, Task, TaskDraft, TaskStatus, TaskType};

use crate::components::DeleteConfirmButton;
use crate::context::AppContext;
use crate::store::{
    store_add_comment, store_add_task, store_delete_task, store_update_task, use_app_store,
    AppStateStoreFields,
};

/// What the form edits
#[derive(Clone, Debug, PartialEq)]
pub enum TaskFormMode {
    Create { status: TaskStatus, date: Option<NaiveDate> },
    Edit(String),
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn date_value(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[component]
pub fn TaskForm(mode: TaskFormMode, #[prop(into)] on_close: Callback<()>) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();

    let existing: Option<Task> = match &mode {
        TaskFormMode::Edit(id) => store.board().read_untracked().task_by_id(id).cloned(),
        TaskFormMode::Create { .. } => None,
    };
    let mut draft = existing.as_ref().map(TaskDraft::from).unwrap_or_default();
    if let TaskFormMode::Create { status, date } = &mode {
        draft.status = *status;
        draft.due_date = *date;
    }
    let editing_id = existing.as_ref().map(|t| t.id.clone());

    let (title, set_title) = signal(draft.title.clone());
    let (description, set_description) = signal(draft.description.clone().unwrap_or_default());
    let (status, set_status) = signal(draft.status);
    let (priority, set_priority) = signal(draft.priority);
    let (project_id, set_project_id) = signal(draft.project_id.clone().unwrap_or_default());
    let (assignees, set_assignees) = signal(draft.assignees.clone().unwrap_or_default().join(", "));
    let (dependencies, set_dependencies) = signal(draft.dependencies.clone());
    let (start_date, set_start_date) = signal(date_value(draft.start_date));
    let (due_date, set_due_date) = signal(date_value(draft.due_date));
    let (meeting_date, set_meeting_date) = signal(date_value(draft.date));
    let (time, set_time) = signal(draft.time.clone().unwrap_or_default());
    let (is_meeting, set_is_meeting) = signal(draft.task_type == Some(TaskType::Meeting));
    let (show_in_timeline, set_show_in_timeline) = signal(draft.show_in_timeline.unwrap_or(false));

    let candidates = {
        let editing_id = editing_id.clone();
        move || {
            store
                .board()
                .read()
                .eligible_dependencies(editing_id.as_deref())
                .into_iter()
                .map(|t| (t.id.clone(), t.title.clone()))
                .collect::<Vec<_>>()
        }
    };
    let projects = move || {
        store
            .projects()
            .read()
            .all()
            .iter()
            .map(|p| (p.id.clone(), p.name.clone(), p.level))
            .collect::<Vec<_>>()
    };

    let save = {
        let editing_id = editing_id.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let title = title.get_untracked();
            if title.trim().is_empty() {
                ctx.error("Title is required");
                return;
            }
            let project_id = Some(project_id.get_untracked()).filter(|p| !p.is_empty());
            let project_name = project_id
                .as_deref()
                .and_then(|id| store.projects().read_untracked().by_id(id).map(|p| p.name.clone()));
            let meeting = is_meeting.get_untracked();

            let mut draft = TaskDraft::new(title.trim(), status.get_untracked());
            draft.id = editing_id.clone();
            draft.description = Some(description.get_untracked()).filter(|d| !d.trim().is_empty());
            draft.priority = priority.get_untracked();
            draft.project_id = project_id;
            draft.project = project_name;
            draft.assignees = Some(split_names(&assignees.get_untracked()));
            draft.start_date = parse_date(&start_date.get_untracked());
            draft.due_date = parse_date(&due_date.get_untracked());
            draft.date = parse_date(&meeting_date.get_untracked());
            draft.time = Some(time.get_untracked()).filter(|t| !t.is_empty());
            draft.task_type = Some(if meeting { TaskType::Meeting } else { TaskType::Task });
            draft.show_in_kanban = Some(!meeting);
            draft.show_in_timeline = Some(meeting || show_in_timeline.get_untracked());

            let deps = dependencies.get_untracked();
            match &editing_id {
                None => {
                    draft.dependencies = deps;
                    let task = store_add_task(&store, draft);
                    ctx.success(format!("Created \"{}\"", task.title));
                    on_close.run(());
                }
                Some(id) => {
                    let mut task = draft.into_task();
                    if let Some(old) = store.board().read_untracked().task_by_id(id) {
                        task.comments = old.comments.clone();
                        task.dependencies = old.dependencies.clone();
                    }
                    let result = store_update_task(&store, task)
                        .and_then(|_| store.board().write().set_dependencies(id, deps));
                    match result {
                        Ok(task) => {
                            ctx.success(format!("Saved \"{}\"", task.title));
                            on_close.run(());
                        }
                        Err(e) => ctx.error(e.to_string()),
                    }
                }
            }
        }
    };

    let delete_id = editing_id.clone();
    let comments_id = editing_id.clone();

    view! {
        <div class="modal-backdrop" on:click=move |_| on_close.run(())>
            <form class="modal task-form" on:submit=save on:click=|ev| ev.stop_propagation()>
                <h2>{if editing_id.is_some() { "Edit task" } else { "New task" }}</h2>
                <input
                    type="text"
                    placeholder="Title"
                    prop:value=move || title.get()
                    on:input=move |ev| set_title.set(event_target_value(&ev))
                />
                <textarea
                    placeholder="Description"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                ></textarea>

                <div class="form-row">
                    <label>"Status"
                        <select on:change=move |ev| {
                            if let Ok(s) = event_target_value(&ev).parse() { set_status.set(s); }
                        }>
                            {TaskStatus::ALL.into_iter().map(|s| view! {
                                <option value=s.as_str() selected={move || status.get() == s}>{s.label()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <label>"Priority"
                        <select on:change=move |ev| set_priority.set(event_target_value(&ev).parse().ok())>
                            <option value="" selected=move || priority.get().is_none()>"None"</option>
                            {[Priority::Low, Priority::Medium, Priority::High].into_iter().map(|p| view! {
                                <option value=p.as_str() selected=move || priority.get() == Some(p)>{p.as_str()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <label>"Project"
                        <select on:change=move |ev| set_project_id.set(event_target_value(&ev))>
                            <option value="">"None"</option>
                            {move || projects().into_iter().map(|(id, name, level)| {
                                let selected = project_id.get() == id;
                                view! {
                                    <option value=id selected=selected>
                                        {format!("{}{}", "  ".repeat(level as usize), name)}
                                    </option>
                                }
                            }).collect_view()}
                        </select>
                    </label>
                </div>

                <input
                    type="text"
                    placeholder="Assignees, comma separated"
                    prop:value=move || assignees.get()
                    on:input=move |ev| set_assignees.set(event_target_value(&ev))
                />

                <div class="form-row">
                    <label>"Start"
                        <input type="date" prop:value=move || start_date.get()
                            on:input=move |ev| set_start_date.set(event_target_value(&ev)) />
                    </label>
                    <label>"Due"
                        <input type="date" prop:value=move || due_date.get()
                            on:input=move |ev| set_due_date.set(event_target_value(&ev)) />
                    </label>
                </div>

                <div class="form-row">
                    <label>
                        <input type="checkbox" prop:checked=move || is_meeting.get()
                            on:change=move |ev| set_is_meeting.set(event_target_checked(&ev)) />
                        "Meeting"
                    </label>
                    <Show when=move || !is_meeting.get()>
                        <label>
                            <input type="checkbox" prop:checked=move || show_in_timeline.get()
                                on:change=move |ev| set_show_in_timeline.set(event_target_checked(&ev)) />
                            "Show in timeline"
                        </label>
                    </Show>
                </div>
                <Show when=move || is_meeting.get()>
                    <div class="form-row">
                        <input type="date" prop:value=move || meeting_date.get()
                            on:input=move |ev| set_meeting_date.set(event_target_value(&ev)) />
                        <input type="time" prop:value=move || time.get()
                            on:input=move |ev| set_time.set(event_target_value(&ev)) />
                    </div>
                </Show>

                <fieldset class="dependency-picker">
                    <legend>"Depends on"</legend>
                    {move || {
                        let chosen = dependencies.get();
                        candidates().into_iter().map(|(id, label)| {
                            let checked = chosen.contains(&id);
                            view! {
                                <label class="dependency-option">
                                    <input
                                        type="checkbox"
                                        prop:checked=checked
                                        on:change=move |ev| {
                                            let on = event_target_checked(&ev);
                                            let id = id.clone();
                                            set_dependencies.update(|deps| {
                                                deps.retain(|d| *d != id);
                                                if on { deps.push(id); }
                                            });
                                        }
                                    />
                                    {label}
                                </label>
                            }
                        }).collect_view()
                    }}
                </fieldset>

                {comments_id.map(|id| view! { <CommentThread task_id=id /> })}

                <div class="form-actions">
                    {delete_id.map(|id| view! {
                        <DeleteConfirmButton
                            button_class="delete-btn"
                            on_confirm=move |_: ()| {
                                if let Some(task) = store_delete_task(&store, &id) {
                                    ctx.info(format!("Deleted \"{}\"", task.title));
                                }
                                on_close.run(());
                            }
                        />
                    })}
                    <button type="button" on:click=move |_| on_close.run(())>"Cancel"</button>
                    <button type="submit">"Save"</button>
                </div>
            </form>
        </div>
    }
}

/// Comments of one task plus an input for a new one
#[component]
fn CommentThread(task_id: String) -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (draft, set_draft) = signal(String::new());

    let comments = {
        let task_id = task_id.clone();
        move || {
            store
                .board()
                .read()
                .task_by_id(&task_id)
                .map(|t| t.comments.clone())
                .unwrap_or_default()
        }
    };

    let post = move |_| {
        let text = draft.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        match store_add_comment(&store, &task_id, text.trim()) {
            Ok(_) => set_draft.set(String::new()),
            Err(e) => ctx.error(e.to_string()),
        }
    };

    view! {
        <section class="comments">
            <h3>"Comments"</h3>
            <For
                each=comments
                key=|c| c.id.clone()
                children=|c| view! {
                    <div class="comment">
                        <strong>{c.author}</strong>
                        <span class="comment-time">{c.created_at.format("%Y-%m-%d %H:%M").to_string()}</span>
                        <p>{c.content}</p>
                    </div>
                }
            />
            <div class="comment-input">
                <input
                    type="text"
                    placeholder="Write a comment, @Name to mention"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button type="button" on:click=post>"Post"</button>
            </div>
        </section>
    }
}
