//! Pomodoro Timer
//!
//! A second-granular state machine. The UI drives it with one `tick()` per
//! second and reacts to the returned [`TimerEvent`]s (toasts, persistence).
//!
//! ```text
//! idle --start_focus--> focus --0s--> shortBreak|longBreak --0s--> focus ...
//!                         \--pause--> paused --resume--> (previous phase)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    #[default]
    Idle,
    Focus,
    ShortBreak,
    LongBreak,
    Paused,
}

impl TimerState {
    pub fn label(&self) -> &'static str {
        match self {
            TimerState::Idle => "Ready",
            TimerState::Focus => "Focus",
            TimerState::ShortBreak => "Short Break",
            TimerState::LongBreak => "Long Break",
            TimerState::Paused => "Paused",
        }
    }

    fn is_break(&self) -> bool {
        matches!(self, TimerState::ShortBreak | TimerState::LongBreak)
    }
}

/// Longest phase a user can configure, in minutes
pub const MAX_PHASE_MINUTES: u32 = 24 * 60;

fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(1, MAX_PHASE_MINUTES)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimerSettings {
    pub focus_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub cycles_before_long_break: u32,
    pub auto_start_breaks: bool,
    pub auto_start_focus: bool,
    pub sound_enabled: bool,
    pub notifications_enabled: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            cycles_before_long_break: 4,
            auto_start_breaks: true,
            auto_start_focus: true,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

/// Partial settings update; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub focus_minutes: Option<u32>,
    pub short_break_minutes: Option<u32>,
    pub long_break_minutes: Option<u32>,
    pub cycles_before_long_break: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_focus: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl TimerSettings {
    /// Bring stored values back into range
    pub fn clamped(mut self) -> Self {
        self.focus_minutes = clamp_minutes(self.focus_minutes);
        self.short_break_minutes = clamp_minutes(self.short_break_minutes);
        self.long_break_minutes = clamp_minutes(self.long_break_minutes);
        self.cycles_before_long_break = self.cycles_before_long_break.max(1);
        self
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.focus_minutes {
            self.focus_minutes = clamp_minutes(v);
        }
        if let Some(v) = patch.short_break_minutes {
            self.short_break_minutes = clamp_minutes(v);
        }
        if let Some(v) = patch.long_break_minutes {
            self.long_break_minutes = clamp_minutes(v);
        }
        if let Some(v) = patch.cycles_before_long_break {
            self.cycles_before_long_break = v.max(1);
        }
        if let Some(v) = patch.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_focus {
            self.auto_start_focus = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.notifications_enabled {
            self.notifications_enabled = v;
        }
    }

    fn seconds_for(&self, phase: TimerState) -> u32 {
        let minutes = match phase {
            TimerState::Focus => self.focus_minutes,
            TimerState::ShortBreak => self.short_break_minutes,
            TimerState::LongBreak => self.long_break_minutes,
            TimerState::Idle | TimerState::Paused => 0,
        };
        minutes.saturating_mul(60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPomodoro {
    pub task_id: String,
    pub estimated_pomodoros: u32,
    pub completed_pomodoros: u32,
}

/// What happened when a phase ran out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    FocusComplete {
        task_id: Option<String>,
        /// Phase the timer moved into (idle when breaks don't auto-start)
        next: TimerState,
    },
    BreakComplete {
        finished: TimerState,
        next: TimerState,
    },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PomodoroTimer {
    pub settings: TimerSettings,
    state: TimerState,
    paused_from: Option<TimerState>,
    seconds_left: u32,
    target_seconds: u32,
    completed_cycles: u32,
    completed_pomodoros: u32,
    current_task_id: Option<String>,
    task_pomodoros: Vec<TaskPomodoro>,
    active_task_ids: Vec<String>,
}

impl PomodoroTimer {
    pub fn new(
        settings: TimerSettings,
        task_pomodoros: Vec<TaskPomodoro>,
        active_task_ids: Vec<String>,
    ) -> Self {
        Self {
            settings: settings.clamped(),
            task_pomodoros,
            active_task_ids,
            ..Self::default()
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    pub fn current_task_id(&self) -> Option<&str> {
        self.current_task_id.as_deref()
    }

    pub fn set_current_task(&mut self, task_id: Option<String>) {
        self.current_task_id = task_id;
    }

    /// Running (neither idle nor paused)
    pub fn is_active(&self) -> bool {
        !matches!(self.state, TimerState::Idle | TimerState::Paused)
    }

    /// Percent of the current phase elapsed, 0 when nothing is loaded
    pub fn progress(&self) -> f64 {
        if self.target_seconds == 0 {
            return 0.0;
        }
        100.0 - (self.seconds_left as f64 / self.target_seconds as f64) * 100.0
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }

    // ========================
    // Transitions
    // ========================

    pub fn start_focus(&mut self) {
        self.enter(TimerState::Focus);
    }

    pub fn start_short_break(&mut self) {
        self.enter(TimerState::ShortBreak);
    }

    pub fn start_long_break(&mut self) {
        self.enter(TimerState::LongBreak);
    }

    fn enter(&mut self, phase: TimerState) {
        let seconds = self.settings.seconds_for(phase);
        self.state = phase;
        self.paused_from = None;
        self.seconds_left = seconds;
        self.target_seconds = seconds;
        log::debug!("[POMODORO] {} for {}s", phase.label(), seconds);
    }

    pub fn pause(&mut self) {
        if self.is_active() {
            self.paused_from = Some(self.state);
            self.state = TimerState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == TimerState::Paused {
            self.state = self.paused_from.take().unwrap_or(TimerState::Focus);
        }
    }

    /// Back to idle; completed pomodoros survive, the cycle count does not
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.paused_from = None;
        self.seconds_left = 0;
        self.target_seconds = 0;
        self.completed_cycles = 0;
    }

    /// Jump to the next phase without counting the current one
    pub fn skip(&mut self) {
        match self.state {
            TimerState::Focus => {
                let next = self.break_after(self.completed_cycles + 1);
                self.enter(next);
            }
            TimerState::ShortBreak | TimerState::LongBreak => self.start_focus(),
            TimerState::Idle | TimerState::Paused => {}
        }
    }

    /// Advance one second
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_active() || self.seconds_left == 0 {
            return None;
        }
        self.seconds_left -= 1;
        if self.seconds_left > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    fn complete_phase(&mut self) -> TimerEvent {
        let finished = self.state;
        if finished == TimerState::Focus {
            self.completed_pomodoros += 1;
            self.completed_cycles += 1;
            let task_id = self.current_task_id.clone();
            if let Some(id) = &task_id {
                self.increment_task_completed(id);
            }
            let next = if self.settings.auto_start_breaks {
                let phase = self.break_after(self.completed_cycles);
                self.enter(phase);
                phase
            } else {
                self.state = TimerState::Idle;
                TimerState::Idle
            };
            log::info!("[POMODORO] focus complete ({} total)", self.completed_pomodoros);
            TimerEvent::FocusComplete { task_id, next }
        } else {
            debug_assert!(finished.is_break());
            let next = if self.settings.auto_start_focus {
                self.start_focus();
                TimerState::Focus
            } else {
                self.state = TimerState::Idle;
                TimerState::Idle
            };
            TimerEvent::BreakComplete { finished, next }
        }
    }

    fn break_after(&self, cycles: u32) -> TimerState {
        if cycles % self.settings.cycles_before_long_break.max(1) == 0 {
            TimerState::LongBreak
        } else {
            TimerState::ShortBreak
        }
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    // ========================
    // Per-task tracking
    // ========================

    pub fn task_pomodoros(&self) -> &[TaskPomodoro] {
        &self.task_pomodoros
    }

    pub fn task_pomodoro(&self, task_id: &str) -> Option<&TaskPomodoro> {
        self.task_pomodoros.iter().find(|tp| tp.task_id == task_id)
    }

    /// Set the estimate, tracking the task if it was not tracked yet
    pub fn update_task_pomodoros(&mut self, task_id: &str, estimated: u32) {
        match self.task_pomodoros.iter_mut().find(|tp| tp.task_id == task_id) {
            Some(tp) => tp.estimated_pomodoros = estimated,
            None => self.task_pomodoros.push(TaskPomodoro {
                task_id: task_id.to_string(),
                estimated_pomodoros: estimated,
                completed_pomodoros: 0,
            }),
        }
    }

    /// No-op for untracked tasks
    pub fn increment_task_completed(&mut self, task_id: &str) {
        if let Some(tp) = self.task_pomodoros.iter_mut().find(|tp| tp.task_id == task_id) {
            tp.completed_pomodoros += 1;
        }
    }

    pub fn add_task_to_pomodoros(&mut self, task_id: &str, estimated: u32) {
        if self.task_pomodoro(task_id).is_none() {
            self.task_pomodoros.push(TaskPomodoro {
                task_id: task_id.to_string(),
                estimated_pomodoros: estimated,
                completed_pomodoros: 0,
            });
        }
        self.add_task_to_active(task_id);
    }

    pub fn remove_task_from_pomodoros(&mut self, task_id: &str) {
        self.task_pomodoros.retain(|tp| tp.task_id != task_id);
        self.remove_task_from_active(task_id);
    }

    pub fn active_task_ids(&self) -> &[String] {
        &self.active_task_ids
    }

    pub fn add_task_to_active(&mut self, task_id: &str) {
        if !self.active_task_ids.iter().any(|id| id == task_id) {
            self.active_task_ids.push(task_id.to_string());
        }
    }

    pub fn remove_task_from_active(&mut self, task_id: &str) {
        self.active_task_ids.retain(|id| id != task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> PomodoroTimer {
        let mut settings = TimerSettings::default();
        settings.apply(SettingsPatch {
            focus_minutes: Some(1),
            short_break_minutes: Some(1),
            long_break_minutes: Some(2),
            cycles_before_long_break: Some(2),
            ..Default::default()
        });
        PomodoroTimer::new(settings, vec![], vec![])
    }

    fn run_out(timer: &mut PomodoroTimer) -> TimerEvent {
        loop {
            if let Some(event) = timer.tick() {
                return event;
            }
        }
    }

    #[test]
    fn test_settings_defaults_and_json_shape() {
        let s = TimerSettings::default();
        assert_eq!((s.focus_minutes, s.short_break_minutes, s.long_break_minutes), (25, 5, 15));
        assert_eq!(s.cycles_before_long_break, 4);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["cyclesBeforeLongBreak"], 4);
        assert_eq!(json["autoStartBreaks"], true);

        let partial: TimerSettings = serde_json::from_str(r#"{"focusMinutes":50}"#).unwrap();
        assert_eq!(partial.focus_minutes, 50);
        assert_eq!(partial.short_break_minutes, 5);
    }

    #[test]
    fn test_huge_minute_values_are_capped() {
        let mut timer = PomodoroTimer::default();
        timer.update_settings(SettingsPatch {
            focus_minutes: Some(80_000_000),
            short_break_minutes: Some(0),
            ..Default::default()
        });
        assert_eq!(timer.settings.focus_minutes, MAX_PHASE_MINUTES);
        assert_eq!(timer.settings.short_break_minutes, 1);
        timer.start_focus();
        assert_eq!(timer.seconds_left(), MAX_PHASE_MINUTES * 60);

        let stored: TimerSettings =
            serde_json::from_str(r#"{"focusMinutes":4000000000,"longBreakMinutes":0}"#).unwrap();
        let mut timer = PomodoroTimer::new(stored, vec![], vec![]);
        assert_eq!(timer.settings.focus_minutes, MAX_PHASE_MINUTES);
        timer.start_long_break();
        assert_eq!(timer.seconds_left(), 60);
    }

    #[test]
    fn test_focus_completion_starts_short_then_long_break() {
        let mut timer = quick();
        timer.add_task_to_pomodoros("task-1", 3);
        timer.set_current_task(Some("task-1".into()));
        timer.start_focus();
        assert_eq!(timer.seconds_left(), 60);

        let event = run_out(&mut timer);
        assert_eq!(
            event,
            TimerEvent::FocusComplete {
                task_id: Some("task-1".into()),
                next: TimerState::ShortBreak
            }
        );
        assert_eq!(timer.completed_pomodoros(), 1);
        assert_eq!(timer.task_pomodoro("task-1").unwrap().completed_pomodoros, 1);

        let event = run_out(&mut timer);
        assert_eq!(
            event,
            TimerEvent::BreakComplete {
                finished: TimerState::ShortBreak,
                next: TimerState::Focus
            }
        );

        run_out(&mut timer);
        assert_eq!(timer.state(), TimerState::LongBreak);
        assert_eq!(timer.seconds_left(), 120);
    }

    #[test]
    fn test_without_auto_start_timer_goes_idle() {
        let mut timer = quick();
        timer.update_settings(SettingsPatch {
            auto_start_breaks: Some(false),
            ..Default::default()
        });
        timer.start_focus();
        let event = run_out(&mut timer);
        assert!(matches!(event, TimerEvent::FocusComplete { next: TimerState::Idle, .. }));
        assert!(!timer.is_active());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn test_pause_resume_returns_to_paused_phase() {
        let mut timer = quick();
        timer.start_short_break();
        timer.tick();
        timer.pause();
        assert_eq!(timer.state(), TimerState::Paused);
        let left = timer.seconds_left();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.seconds_left(), left);

        timer.resume();
        assert_eq!(timer.state(), TimerState::ShortBreak);
    }

    #[test]
    fn test_progress_and_reset() {
        let mut timer = quick();
        assert_eq!(timer.progress(), 0.0);
        timer.start_focus();
        for _ in 0..30 {
            timer.tick();
        }
        assert!((timer.progress() - 50.0).abs() < f64::EPSILON);
        assert_eq!(timer.display(), "00:30");

        run_out(&mut timer);
        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.completed_cycles(), 0);
        assert_eq!(timer.completed_pomodoros(), 1);
    }

    #[test]
    fn test_skip_does_not_count_pomodoro() {
        let mut timer = quick();
        timer.start_focus();
        timer.skip();
        assert_eq!(timer.state(), TimerState::ShortBreak);
        assert_eq!(timer.completed_pomodoros(), 0);
        timer.skip();
        assert_eq!(timer.state(), TimerState::Focus);
    }

    #[test]
    fn test_task_tracking() {
        let mut timer = PomodoroTimer::default();
        timer.add_task_to_pomodoros("a", 2);
        timer.add_task_to_pomodoros("a", 9);
        assert_eq!(timer.task_pomodoro("a").unwrap().estimated_pomodoros, 2);
        assert_eq!(timer.active_task_ids(), &["a".to_string()]);

        timer.update_task_pomodoros("b", 4);
        timer.increment_task_completed("b");
        timer.increment_task_completed("ghost");
        assert_eq!(timer.task_pomodoro("b").unwrap().completed_pomodoros, 1);

        timer.remove_task_from_pomodoros("a");
        assert!(timer.task_pomodoro("a").is_none());
        assert!(timer.active_task_ids().is_empty());
    }
}
