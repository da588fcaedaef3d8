//! Settings Panel Component
//!
//! Per-user preferences: language, pomodoro timing and the backend URL.

use leptos::prelude::*;

use taskflow_core::domain::Language;
use taskflow_core::i18n::{self, Label};
use taskflow_core::pomodoro::MAX_PHASE_MINUTES;
use taskflow_core::SettingsPatch;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::storage;
use crate::store::{store_persist_pomodoro, use_app_store, AppStateStoreFields};

fn minutes_input(label: &'static str, value: impl Fn() -> u32 + Send + Sync + 'static, on_set: impl Fn(u32) + 'static) -> impl IntoView {
    view! {
        <label class="setting-row">
            <span>{label}</span>
            <input
                type="number"
                min="1"
                max=MAX_PHASE_MINUTES.to_string()
                prop:value=move || value().to_string()
                on:change=move |ev| {
                    if let Ok(n) = event_target_value(&ev).parse::<u32>() { on_set(n); }
                }
            />
        </label>
    }
}

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let (api_url, set_api_url) = signal(storage::get(storage::API_URL_KEY).unwrap_or_default());

    let patch = move |p: SettingsPatch| {
        store.pomodoro().write().update_settings(p);
        store_persist_pomodoro(&store);
    };
    let setting = move |f: fn(&taskflow_core::TimerSettings) -> u32| move || f(&store.pomodoro().read().settings);
    let flag = move |f: fn(&taskflow_core::TimerSettings) -> bool| move || f(&store.pomodoro().read().settings);

    let set_language = move |ev: web_sys::Event| {
        let language = match event_target_value(&ev).as_str() {
            "es" => Language::Es,
            _ => Language::En,
        };
        let saved = store.auth().write().update_language(language).cloned();
        match saved {
            Ok(user) => {
                storage::set_json(storage::USER_KEY, &user);
                ctx.success("Language saved");
            }
            Err(e) => ctx.error(e.to_string()),
        }
    };

    let save_api_url = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        AppConfig::save_override(&api_url.get_untracked());
        log::info!("[CONFIG] api url override saved");
        ctx.info("Saved. Reload the page to apply.");
    };

    view! {
        <div class="settings-panel">
            <h2>{move || {
                let language = store.auth().read().user().map(|u| u.language).unwrap_or_default();
                i18n::text(language, Label::Settings)
            }}</h2>
            <section>
                <h3>"Profile"</h3>
                <label class="setting-row">
                    <span>"Language"</span>
                    <select on:change=set_language>
                        {move || {
                            let current = store.auth().read().user().map(|u| u.language).unwrap_or_default();
                            [(Language::En, "English"), (Language::Es, "Español")].into_iter().map(|(lang, label)| view! {
                                <option value=lang.as_str() selected={lang == current}>{label}</option>
                            }).collect_view()
                        }}
                    </select>
                </label>
            </section>

            <section>
                <h3>"Pomodoro"</h3>
                {minutes_input("Focus (min)", setting(|s| s.focus_minutes), move |n| patch(SettingsPatch { focus_minutes: Some(n), ..Default::default() }))}
                {minutes_input("Short break (min)", setting(|s| s.short_break_minutes), move |n| patch(SettingsPatch { short_break_minutes: Some(n), ..Default::default() }))}
                {minutes_input("Long break (min)", setting(|s| s.long_break_minutes), move |n| patch(SettingsPatch { long_break_minutes: Some(n), ..Default::default() }))}
                {minutes_input("Focus sessions per long break", setting(|s| s.cycles_before_long_break), move |n| patch(SettingsPatch { cycles_before_long_break: Some(n), ..Default::default() }))}
                <label class="setting-row">
                    <input type="checkbox" prop:checked=flag(|s| s.auto_start_breaks)
                        on:change=move |ev| patch(SettingsPatch { auto_start_breaks: Some(event_target_checked(&ev)), ..Default::default() }) />
                    <span>"Start breaks automatically"</span>
                </label>
                <label class="setting-row">
                    <input type="checkbox" prop:checked=flag(|s| s.auto_start_focus)
                        on:change=move |ev| patch(SettingsPatch { auto_start_focus: Some(event_target_checked(&ev)), ..Default::default() }) />
                    <span>"Start focus automatically"</span>
                </label>
                <label class="setting-row">
                    <input type="checkbox" prop:checked=flag(|s| s.notifications_enabled)
                        on:change=move |ev| patch(SettingsPatch { notifications_enabled: Some(event_target_checked(&ev)), ..Default::default() }) />
                    <span>"Notify when a phase ends"</span>
                </label>
            </section>

            <section>
                <h3>"Backend"</h3>
                <form class="setting-row" on:submit=save_api_url>
                    <input
                        type="text"
                        placeholder="/api (empty for offline mode)"
                        prop:value=move || api_url.get()
                        on:input=move |ev| set_api_url.set(event_target_value(&ev))
                    />
                    <button type="submit">"Save"</button>
                </form>
                <p class="hint">{move || match ctx.config().api_base_url {
                    Some(url) => format!("Connected to {}", url),
                    None => "Offline mode".to_string(),
                }}</p>
            </section>
        </div>
    }
}
