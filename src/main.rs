//! TaskSphere Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod models;
mod session;
mod sync;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    // Route the sync core's `log` output to the browser console.
    let _ = console_log::init_with_level(log::Level::Debug);
    mount_to_body(App);
}
