//! Timeline View Component
//!
//! Timeline tasks and meetings for a day, week, month, quarter or year.
//! The week zoom shows one column per day; wider zooms list tasks by date.

use chrono::{Local, NaiveDate};
use leptos::prelude::*;

use taskflow_core::domain::{Task, TaskType};
use taskflow_core::selectors::{tasks_by_week, tasks_in_range, tasks_on_date, ViewMode};

use crate::components::{TaskForm, TaskFormMode};
use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields};

fn first_date(task: &Task) -> Option<NaiveDate> {
    [task.date, task.start_date, task.due_date].into_iter().flatten().min()
}

fn span_label(task: &Task) -> String {
    match (task.date, task.start_date, task.due_date) {
        (Some(day), _, _) => match (&task.time, task.duration) {
            (Some(time), Some(mins)) => format!("{} {} ({} min)", day, time, mins),
            (Some(time), None) => format!("{} {}", day, time),
            _ => day.to_string(),
        },
        (None, Some(start), Some(due)) => format!("{} → {}", start, due),
        (None, Some(start), None) => format!("from {}", start),
        (None, None, Some(due)) => format!("due {}", due),
        (None, None, None) => String::new(),
    }
}

#[component]
pub fn TimelineView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (mode, set_mode) = signal(ViewMode::Week);
    let (form, set_form) = signal(None::<TaskFormMode>);

    let timeline_tasks = move || -> Vec<Task> {
        store
            .board()
            .read()
            .timeline_tasks()
            .into_iter()
            .cloned()
            .collect()
    };
    let open = move |id: String| set_form.set(Some(TaskFormMode::Edit(id)));

    let shift = move |steps: i32| {
        let anchor = ctx.selected_date.get_untracked();
        ctx.select_date(mode.get_untracked().shift(anchor, steps));
    };

    let range_label = move || {
        let (start, end) = mode.get().range(ctx.selected_date.get());
        if start == end { start.format("%d %b %Y").to_string() } else { format!("{} – {}", start.format("%d %b"), end.format("%d %b %Y")) }
    };

    let task_row = move |task: Task| {
        let id = task.id.clone();
        let meeting = task.task_type == TaskType::Meeting;
        view! {
            <div class="timeline-item" class:meeting=meeting on:click=move |_| open(id.clone())>
                <span class="timeline-title">{task.title.clone()}</span>
                <span class="timeline-span">{span_label(&task)}</span>
                <span class="status">{task.status.label()}</span>
            </div>
        }
    };

    view! {
        <div class="timeline-view">
            <header class="view-header">
                <button on:click=move |_| shift(-1)>"‹"</button>
                <h2>{range_label}</h2>
                <button on:click=move |_| shift(1)>"›"</button>
                <button on:click=move |_| ctx.select_date(Local::now().date_naive())>"Today"</button>
                <div class="mode-switch">
                    {ViewMode::ALL.into_iter().map(|m| view! {
                        <button class:active=move || mode.get() == m on:click=move |_| set_mode.set(m)>
                            {m.label()}
                        </button>
                    }).collect_view()}
                </div>
            </header>
            {move || {
                let tasks = timeline_tasks();
                let refs: Vec<&Task> = tasks.iter().collect();
                let anchor = ctx.selected_date.get();
                match mode.get() {
                    ViewMode::Week => view! {
                        <div class="timeline-week">
                            {tasks_by_week(&refs, anchor).into_iter().map(|(day, on_day)| view! {
                                <div class="timeline-day">
                                    <h4>{day.format("%a %d").to_string()}</h4>
                                    {on_day.into_iter().cloned().map(task_row).collect_view()}
                                </div>
                            }).collect_view()}
                        </div>
                    }.into_any(),
                    ViewMode::Day => view! {
                        <div class="timeline-list">
                            {tasks_on_date(refs.iter().copied(), anchor).into_iter().cloned().map(task_row).collect_view()}
                        </div>
                    }.into_any(),
                    wide => {
                        let (start, end) = wide.range(anchor);
                        let mut in_range: Vec<Task> = tasks_in_range(&refs, start, end).into_iter().cloned().collect();
                        in_range.sort_by_key(first_date);
                        if in_range.is_empty() {
                            view! { <p class="empty-state">"Nothing on the timeline in this period"</p> }.into_any()
                        } else {
                            view! {
                                <div class="timeline-list">
                                    {in_range.into_iter().map(task_row).collect_view()}
                                </div>
                            }.into_any()
                        }
                    }
                }
            }}
        </div>
        {move || form.get().map(|mode| view! {
            <TaskForm mode=mode on_close=move |_: ()| set_form.set(None) />
        })}
    }
}
