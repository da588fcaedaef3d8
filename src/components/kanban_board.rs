//! Kanban Board Component
//!
//! Columns in board order; cards move by mouse drag (see `leptos-dragdrop`).

use leptos::prelude::*;
use leptos_dragdrop::*;

use taskflow_core::domain::{Column, Task, TaskStatus};

use crate::components::{TaskForm, TaskFormMode};
use crate::context::AppContext;
use crate::store::{store_move_task, use_app_store, AppStateStoreFields, AppStore};

/// Apply a finished drag
pub fn handle_card_drop(store: &AppStore, ctx: &AppContext, card_id: String, target: DropTarget) {
    let slot = match &target {
        DropTarget::Slot { index, .. } => Some(*index),
        DropTarget::Column(_) => None,
    };
    let placement = store
        .board()
        .read_untracked()
        .board()
        .final_drop_index(&card_id, target.column_id(), slot)
        .map(|(source, index)| (source.to_string(), index));
    let Some((source, index)) = placement else {
        log::warn!("[KANBAN] dropped card {} is not on the board", card_id);
        return;
    };

    if let Err(e) = store_move_task(store, &card_id, &source, target.column_id(), index) {
        ctx.error(e.to_string());
    }
}

#[component]
pub fn KanbanBoard() -> impl IntoView {
    let store = use_app_store();
    let dnd = expect_context::<DndSignals>();
    let (form, set_form) = signal(None::<TaskFormMode>);

    let columns = move || {
        let board = store.board().read();
        board
            .board()
            .ordered_columns()
            .into_iter()
            .map(|c| {
                let tasks: Vec<Task> = board.column_tasks(&c.id).into_iter().cloned().collect();
                (c.clone(), tasks)
            })
            .collect::<Vec<_>>()
    };
    let open = Callback::new(move |mode: TaskFormMode| set_form.set(Some(mode)));

    view! {
        <div class="kanban-board" class:dragging=move || dnd.is_dragging()>
            {move || columns().into_iter().map(|(column, tasks)| view! {
                <KanbanColumn column=column tasks=tasks on_open=open />
            }).collect_view()}
        </div>
        {move || form.get().map(|mode| view! {
            <TaskForm mode=mode on_close=move |_: ()| set_form.set(None) />
        })}
    }
}

#[component]
fn KanbanColumn(column: Column, tasks: Vec<Task>, on_open: Callback<TaskFormMode>) -> impl IntoView {
    let dnd = expect_context::<DndSignals>();
    let column_target = DropTarget::Column(column.id.clone());
    let status = column.status;
    let count = tasks.len();
    let column_id = column.id.clone();

    view! {
        <section class="kanban-column">
            <header class="column-header">
                <span class="column-title">{column.title.clone()}</span>
                <span class="column-count">{count}</span>
                <button
                    class="add-btn"
                    on:click=move |_| on_open.run(TaskFormMode::Create { status, date: None })
                >
                    "+"
                </button>
            </header>
            <div class="column-cards">
                {tasks.into_iter().enumerate().map(|(index, task)| view! {
                    <TaskCard task=task column_id=column_id.clone() index=index on_open=on_open />
                }).collect_view()}
                <div
                    class="column-tail"
                    class:drop-target=move || dnd.is_target(&column_target)
                    on:mouseenter=make_on_column_mouseenter(dnd, column.id.clone())
                    on:mouseleave=make_on_mouseleave(dnd)
                ></div>
            </div>
        </section>
    }
}

#[component]
fn TaskCard(task: Task, column_id: String, index: usize, on_open: Callback<TaskFormMode>) -> impl IntoView {
    let dnd = expect_context::<DndSignals>();
    let store = use_app_store();
    let id = task.id.clone();
    let slot = DropTarget::Slot { column_id: column_id.clone(), index };

    let blockers = {
        let id = id.clone();
        move || store.board().read().open_blockers(&id).len()
    };
    let is_dragged = {
        let id = id.clone();
        move || dnd.is_dragging_card(&id)
    };
    let open_id = id.clone();
    let completed = task.status == TaskStatus::Completed;
    let priority = task.priority.map(|p| p.as_str());

    view! {
        <article
            class="task-card"
            class:is-dragging=is_dragged
            class:drop-before=move || dnd.is_target(&slot)
            on:mousedown=make_on_mousedown(dnd, id.clone())
            on:mouseenter=make_on_card_mouseenter(dnd, id.clone(), column_id, index)
            on:mouseleave=make_on_mouseleave(dnd)
            on:click=move |_| {
                if !dnd.drag_just_ended_read.get_untracked() {
                    on_open.run(TaskFormMode::Edit(open_id.clone()));
                }
            }
        >
            <div class="card-title">
                {task.title.clone()}
                {completed.then(|| view! { <span class="tag done">"completed"</span> })}
            </div>
            <div class="card-meta">
                {priority.map(|p| view! { <span class=format!("priority {}", p)>{p}</span> })}
                {task.due_date.map(|d| view! { <span class="due">{d.format("%b %d").to_string()}</span> })}
                {(!task.comments.is_empty()).then(|| view! { <span class="comment-count">{format!("💬 {}", task.comments.len())}</span> })}
                {move || {
                    let n = blockers();
                    (n > 0).then(|| view! { <span class="blocked">{format!("blocked by {}", n)}</span> })
                }}
            </div>
            <div class="card-assignees">
                {task.assignees.iter().map(|a| view! { <span class="avatar" title=a.clone()>{initials(a)}</span> }).collect_view()}
            </div>
        </article>
    }
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}
