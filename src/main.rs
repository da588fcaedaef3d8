//! TaskFlow Frontend Entry Point

mod config;
mod storage;
mod api;
mod context;
mod store;
mod components;
mod app;

use app::App;
use leptos::prelude::*;

fn main() {
    let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
    if console_log::init_with_level(level).is_err() {
        web_sys::console::warn_1(&"logger already installed".into());
    }
    console_error_panic_hook::set_once();
    mount_to_body(App);
}
