//! Application Context
//!
//! UI-only state provided via Leptos Context API: current view, reload
//! trigger, selected calendar date, toasts and the runtime config.

use chrono::NaiveDate;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use taskflow_core::domain::Language;
use taskflow_core::i18n::{self, Label};

use crate::config::AppConfig;

const TOAST_MS: u32 = 3_500;

/// Top-level screens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Kanban,
    Calendar,
    Timeline,
    List,
    Files,
    Messaging,
    Notifications,
    Pomodoro,
    Admin,
    Settings,
}

impl View {
    pub const NAV: [View; 10] = [
        View::Kanban,
        View::Calendar,
        View::Timeline,
        View::List,
        View::Files,
        View::Messaging,
        View::Notifications,
        View::Pomodoro,
        View::Admin,
        View::Settings,
    ];

    pub fn label(&self, language: Language) -> &'static str {
        let label = match self {
            View::Kanban => Label::Board,
            View::Calendar => Label::Calendar,
            View::Timeline => Label::Timeline,
            View::List => Label::List,
            View::Files => Label::Files,
            View::Messaging => Label::Messages,
            View::Notifications => Label::Notifications,
            View::Pomodoro => Label::Pomodoro,
            View::Admin => Label::Admin,
            View::Settings => Label::Settings,
        };
        i18n::text(language, label)
    }

    /// Screens that only admins may open
    pub fn admin_only(&self) -> bool {
        matches!(self, View::Admin)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast success",
            ToastKind::Error => "toast error",
            ToastKind::Info => "toast info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub view: ReadSignal<View>,
    set_view: WriteSignal<View>,
    /// Bumped after backend-backed data changes
    pub reload_trigger: ReadSignal<u32>,
    set_reload_trigger: WriteSignal<u32>,
    /// Anchor day for calendar and timeline
    pub selected_date: ReadSignal<NaiveDate>,
    set_selected_date: WriteSignal<NaiveDate>,
    pub toasts: ReadSignal<Vec<Toast>>,
    set_toasts: WriteSignal<Vec<Toast>>,
    next_toast_id: StoredValue<u32>,
    config: StoredValue<AppConfig>,
}

impl AppContext {
    pub fn new(config: AppConfig, today: NaiveDate) -> Self {
        let (view, set_view) = signal(View::default());
        let (reload_trigger, set_reload_trigger) = signal(0u32);
        let (selected_date, set_selected_date) = signal(today);
        let (toasts, set_toasts) = signal(Vec::<Toast>::new());
        Self {
            view,
            set_view,
            reload_trigger,
            set_reload_trigger,
            selected_date,
            set_selected_date,
            toasts,
            set_toasts,
            next_toast_id: StoredValue::new(0),
            config: StoredValue::new(config),
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn navigate(&self, view: View) {
        self.set_view.set(view);
    }

    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn select_date(&self, day: NaiveDate) {
        self.set_selected_date.set(day);
    }

    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast_id.get_value();
        self.next_toast_id.set_value(id.wrapping_add(1));
        let message = message.into();
        if kind == ToastKind::Error {
            log::error!("[TOAST] {}", message);
        }
        self.set_toasts.update(|list| list.push(Toast { id, kind, message }));

        let set_toasts = self.set_toasts;
        Timeout::new(TOAST_MS, move || {
            set_toasts.update(|list| list.retain(|t| t.id != id));
        })
        .forget();
    }

    pub fn success(&self, message: impl Into<String>) {
        self.toast(ToastKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.toast(ToastKind::Info, message);
    }

    pub fn dismiss(&self, id: u32) {
        self.set_toasts.update(|list| list.retain(|t| t.id != id));
    }
}
