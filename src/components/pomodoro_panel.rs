//! Pomodoro Panel Component
//!
//! Timer face, controls and per-task estimates. The clock itself runs at
//! app level so switching views does not stop it.

use gloo_timers::callback::Interval;
use leptos::prelude::*;

use taskflow_core::domain::{NotificationDraft, NotificationKind, TaskStatus};
use taskflow_core::{TimerEvent, TimerState};

use crate::context::AppContext;
use crate::store::{store_notify, store_persist_pomodoro, use_app_store, AppStateStoreFields, AppStore};

/// One tick per second while a phase is running
pub fn start_pomodoro_clock(store: AppStore, ctx: AppContext) {
    Interval::new(1_000, move || {
        if !store.pomodoro().read_untracked().is_active() {
            return;
        }
        let event = store.pomodoro().write().tick();
        if let Some(event) = event {
            on_timer_event(&store, &ctx, event);
        }
    })
    .forget();
}

fn on_timer_event(store: &AppStore, ctx: &AppContext, event: TimerEvent) {
    let notify = store.pomodoro().read_untracked().settings.notifications_enabled;
    let message = match &event {
        TimerEvent::FocusComplete { task_id, next } => {
            let task = task_id
                .as_deref()
                .and_then(|id| store.board().read_untracked().task_by_id(id).map(|t| t.title.clone()));
            match task {
                Some(title) => format!("Pomodoro finished for \"{}\". Next: {}", title, next.label()),
                None => format!("Pomodoro finished. Next: {}", next.label()),
            }
        }
        TimerEvent::BreakComplete { finished, next } => {
            format!("{} over. Next: {}", finished.label(), next.label())
        }
    };
    log::info!("[POMODORO] {}", message);
    ctx.success(message.clone());
    if notify {
        store_notify(store, NotificationDraft::new(NotificationKind::System, "Pomodoro", message));
    }
    store_persist_pomodoro(store);
}

#[component]
pub fn PomodoroPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (estimate, set_estimate) = signal(4u32);

    let state = move || store.pomodoro().read().state();
    let display = move || store.pomodoro().read().display();
    let progress = move || format!("{:.0}", store.pomodoro().read().progress());

    let open_tasks = move || {
        store
            .board()
            .read()
            .all_tasks()
            .iter()
            .filter(|t| !t.status.is_finished())
            .map(|t| (t.id.clone(), t.title.clone()))
            .collect::<Vec<_>>()
    };

    let tracked = move || {
        let timer = store.pomodoro().read();
        let board = store.board().read();
        timer
            .task_pomodoros()
            .iter()
            .map(|tp| {
                let title = board
                    .task_by_id(&tp.task_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| tp.task_id.clone());
                let active = timer.active_task_ids().contains(&tp.task_id);
                (tp.clone(), title, active)
            })
            .collect::<Vec<_>>()
    };

    let control = move |f: fn(&mut taskflow_core::PomodoroTimer)| {
        f(&mut store.pomodoro().write());
    };

    let track_current = move |_| {
        let current = store.pomodoro().read_untracked().current_task_id().map(str::to_string);
        let Some(task_id) = current else {
            ctx.error("Pick a task first");
            return;
        };
        store.pomodoro().write().add_task_to_pomodoros(&task_id, estimate.get_untracked());
        store_persist_pomodoro(&store);
    };

    view! {
        <div class="pomodoro-panel">
            <div class=move || format!("timer-face phase-{:?}", state()).to_lowercase()>
                <span class="phase">{move || state().label()}</span>
                <span class="clock">{display}</span>
                <progress max="100" value=progress></progress>
                <span class="cycles">{move || {
                    let timer = store.pomodoro().read();
                    format!("{} pomodoros · cycle {}", timer.completed_pomodoros(), timer.completed_cycles())
                }}</span>
            </div>

            <div class="timer-controls">
                {move || match state() {
                    TimerState::Idle => view! {
                        <button on:click=move |_| control(|t| t.start_focus())>"Start focus"</button>
                        <button on:click=move |_| control(|t| t.start_short_break())>"Short break"</button>
                        <button on:click=move |_| control(|t| t.start_long_break())>"Long break"</button>
                    }.into_any(),
                    TimerState::Paused => view! {
                        <button on:click=move |_| control(|t| t.resume())>"Resume"</button>
                        <button on:click=move |_| control(|t| t.reset())>"Reset"</button>
                    }.into_any(),
                    _ => view! {
                        <button on:click=move |_| control(|t| t.pause())>"Pause"</button>
                        <button on:click=move |_| control(|t| t.skip())>"Skip"</button>
                        <button on:click=move |_| control(|t| t.reset())>"Reset"</button>
                    }.into_any(),
                }}
            </div>

            <div class="task-picker">
                <select on:change=move |ev| {
                    let id = event_target_value(&ev);
                    store.pomodoro().write().set_current_task(Some(id).filter(|v| !v.is_empty()));
                }>
                    <option value="">"No task"</option>
                    {move || {
                        let current = store.pomodoro().read().current_task_id().map(str::to_string);
                        open_tasks().into_iter().map(|(id, title)| {
                            let selected = current.as_deref() == Some(id.as_str());
                            view! { <option value=id selected=selected>{title}</option> }
                        }).collect_view()
                    }}
                </select>
                <input
                    type="number"
                    min="1"
                    prop:value=move || estimate.get().to_string()
                    on:input=move |ev| {
                        if let Ok(n) = event_target_value(&ev).parse::<u32>() { set_estimate.set(n.max(1)); }
                    }
                />
                <button on:click=track_current>"Track estimate"</button>
            </div>

            <table class="pomodoro-tasks">
                <thead>
                    <tr><th>"Task"</th><th>"Done / Estimate"</th><th>"Active"</th><th></th></tr>
                </thead>
                <tbody>
                    {move || tracked().into_iter().map(|(tp, title, active)| {
                        let toggle_id = tp.task_id.clone();
                        let remove_id = tp.task_id.clone();
                        let bump_id = tp.task_id.clone();
                        let estimated = tp.estimated_pomodoros;
                        view! {
                            <tr>
                                <td>{title}</td>
                                <td>
                                    {format!("{} / {}", tp.completed_pomodoros, estimated)}
                                    <button class="small-btn" on:click=move |_| {
                                        store.pomodoro().write().update_task_pomodoros(&bump_id, estimated + 1);
                                        store_persist_pomodoro(&store);
                                    }>"+1"</button>
                                </td>
                                <td>
                                    <input
                                        type="checkbox"
                                        prop:checked=active
                                        on:change=move |ev| {
                                            if event_target_checked(&ev) {
                                                store.pomodoro().write().add_task_to_active(&toggle_id);
                                            } else {
                                                store.pomodoro().write().remove_task_from_active(&toggle_id);
                                            }
                                            store_persist_pomodoro(&store);
                                        }
                                    />
                                </td>
                                <td>
                                    <button class="delete-btn" on:click=move |_| {
                                        store.pomodoro().write().remove_task_from_pomodoros(&remove_id);
                                        store_persist_pomodoro(&store);
                                    }>"×"</button>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
            <p class="hint">
                {move || {
                    let in_progress = store
                        .board()
                        .read()
                        .all_tasks()
                        .iter()
                        .filter(|t| t.status == TaskStatus::InProgress)
                        .count();
                    format!("{} task(s) in progress on the board", in_progress)
                }}
            </p>
        </div>
    }
}
