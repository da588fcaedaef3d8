//! Calendar View Component
//!
//! Month grid starting on Monday; tasks appear on their meeting, due and
//! start dates.

use chrono::{Datelike, Local, NaiveDate};
use leptos::prelude::*;

use taskflow_core::domain::{Task, TaskStatus};
use taskflow_core::selectors::{is_overdue, month_grid, tasks_on_date, ViewMode};

use crate::components::{TaskForm, TaskFormMode};
use crate::context::AppContext;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn CalendarView() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (form, set_form) = signal(None::<TaskFormMode>);
    let today = Local::now().date_naive();

    let day_tasks = move |day: NaiveDate| -> Vec<Task> {
        tasks_on_date(store.board().read().all_tasks(), day)
            .into_iter()
            .cloned()
            .collect()
    };

    let shift = move |steps: i32| ctx.select_date(ViewMode::Month.shift(ctx.selected_date.get_untracked(), steps));

    view! {
        <div class="calendar-view">
            <header class="view-header">
                <button on:click=move |_| shift(-1)>"‹"</button>
                <h2>{move || ctx.selected_date.get().format("%B %Y").to_string()}</h2>
                <button on:click=move |_| shift(1)>"›"</button>
                <button on:click=move |_| ctx.select_date(today)>"Today"</button>
            </header>
            <div class="calendar-grid">
                {["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                    .into_iter()
                    .map(|d| view! { <div class="weekday">{d}</div> })
                    .collect_view()}
                {move || {
                    let selected = ctx.selected_date.get();
                    month_grid(selected).into_iter().map(|day| {
                        let tasks = day_tasks(day);
                        let outside = day.month() != selected.month();
                        view! {
                            <div
                                class="calendar-day"
                                class:outside=outside
                                class:today={day == today}
                                class:selected={day == selected}
                                on:click=move |_| ctx.select_date(day)
                            >
                                <span class="day-number">{day.day()}</span>
                                {tasks.into_iter().take(3).map(|t| view! {
                                    <span
                                        class="calendar-chip"
                                        class:overdue=is_overdue(&t, today)
                                    >
                                        {t.time.clone().map(|tm| format!("{} ", tm)).unwrap_or_default()}
                                        {t.title.clone()}
                                    </span>
                                }).collect_view()}
                            </div>
                        }
                    }).collect_view()
                }}
            </div>
            <section class="day-detail">
                <header>
                    <h3>{move || ctx.selected_date.get().format("%A, %d %B").to_string()}</h3>
                    <button on:click=move |_| set_form.set(Some(TaskFormMode::Create {
                        status: TaskStatus::Todo,
                        date: Some(ctx.selected_date.get_untracked()),
                    }))>"+ Task"</button>
                </header>
                {move || {
                    let tasks = day_tasks(ctx.selected_date.get());
                    if tasks.is_empty() {
                        return view! { <p class="empty-state">"Nothing scheduled"</p> }.into_any();
                    }
                    tasks.into_iter().map(|t| {
                        let id = t.id.clone();
                        view! {
                            <div class="day-task" on:click=move |_| set_form.set(Some(TaskFormMode::Edit(id.clone())))>
                                <span class="status">{t.status.label()}</span>
                                <span>{t.title}</span>
                            </div>
                        }
                    }).collect_view().into_any()
                }}
            </section>
        </div>
        {move || form.get().map(|mode| view! {
            <TaskForm mode=mode on_close=move |_: ()| set_form.set(None) />
        })}
    }
}
