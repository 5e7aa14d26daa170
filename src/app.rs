//! TaskSphere App
//!
//! Top-level component: constructs the sync engine for this client session,
//! mirrors its state into signals, and wires the auth card, the board, the
//! create modal, and the sidebar together.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{ApiClient, FetchTransport};
use crate::components::{AuthCard, CreateTaskModal, SidebarMenu, StatusMessage, TaskBoard};
use crate::config;
use crate::context::AppContext;
use crate::models::TaskStatus;
use crate::session::{BrowserTokenStorage, Session};
use crate::sync::SyncEngine;

const DEFAULT_PROFILE_NAME: &str = "Account";

#[component]
pub fn App() -> impl IntoView {
    let candidates = config::api_candidates();
    web_sys::console::log_1(&format!("[APP] API candidates: {candidates:?}").into());

    let engine = Rc::new(SyncEngine::new(
        ApiClient::new(candidates, FetchTransport),
        Session::restore(BrowserTokenStorage),
    ));

    // Engine state mirrored into the reactive graph.
    let (state, set_state) = signal(engine.state());
    engine.set_listener(move |snapshot| set_state.set(snapshot));

    let (status, set_status) = signal(String::new());
    let ctx = AppContext::new(Rc::clone(&engine), state, (status, set_status));
    provide_context(ctx.clone());

    let (profile_name, set_profile_name) = signal(DEFAULT_PROFILE_NAME.to_string());
    let (sidebar_open, set_sidebar_open) = signal(false);
    let (modal_open, set_modal_open) = signal(false);
    let (new_title, set_new_title) = signal(String::new());
    let (new_content, set_new_content) = signal(String::new());
    let (new_status, set_new_status) = signal(TaskStatus::Todo);

    let logged_in = Memo::new(move |_| state.get().logged_in);

    // Fetch tasks and the profile name whenever a token becomes held,
    // including a persisted one on reload.
    let load_ctx = ctx.clone();
    Effect::new(move |_| {
        if logged_in.get() {
            let ctx = load_ctx.clone();
            spawn_local(async move {
                ctx.report(ctx.engine.refresh_tasks().await);
                // Non-fatal: the sidebar falls back to a placeholder name.
                if let Ok(profile) = ctx.engine.profile().await {
                    set_profile_name.set(profile.display_name());
                }
            });
        } else {
            set_profile_name.set(DEFAULT_PROFILE_NAME.to_string());
        }
    });

    let open_create_for = {
        Callback::new(move |column: TaskStatus| {
            set_new_status.set(column);
            set_modal_open.set(true);
        })
    };
    let open_create = move |_| {
        set_new_status.set(TaskStatus::Todo);
        set_modal_open.set(true);
    };
    let close_modal = Callback::new(move |()| set_modal_open.set(false));

    let submit_create = {
        let ctx = ctx.clone();
        Callback::new(move |()| {
            let ctx = ctx.clone();
            let title = new_title.get_untracked();
            let content = new_content.get_untracked();
            let status = new_status.get_untracked();
            spawn_local(async move {
                match ctx.engine.create_task(&title, &content, status).await {
                    Ok(()) => {
                        set_new_title.set(String::new());
                        set_new_content.set(String::new());
                        set_modal_open.set(false);
                    }
                    Err(message) => ctx.set_status(message),
                }
            });
        })
    };

    let logout = {
        let ctx = ctx.clone();
        Callback::new(move |()| {
            ctx.engine.logout();
            set_sidebar_open.set(false);
            set_modal_open.set(false);
            set_new_title.set(String::new());
            set_new_content.set(String::new());
            ctx.set_status("Signed out");
        })
    };
    let close_sidebar = Callback::new(move |()| set_sidebar_open.set(false));

    view! {
        <div class="page">
            <header>
                <h1>"TaskSphere"</h1>
                <p>"A task list backed by the TaskSphere API"</p>
                {move || logged_in.get().then(|| view! {
                    <button class="ghost" on:click=move |_| set_sidebar_open.set(true)>
                        "Menu"
                    </button>
                })}
            </header>

            <StatusMessage />

            <Show when=move || logged_in.get() fallback=|| view! { <AuthCard /> }>
                <section class="card">
                    <div class="card-header">
                        <h2>"Your tasks"</h2>
                        <button on:click=open_create>"New task"</button>
                    </div>
                    <TaskBoard on_create_for=open_create_for />
                </section>

                <CreateTaskModal
                    is_open=modal_open
                    on_close=close_modal
                    title=new_title
                    set_title=set_new_title
                    content=new_content
                    set_content=set_new_content
                    status=new_status
                    set_status=set_new_status
                    on_submit=submit_create
                />

                <SidebarMenu
                    is_open=sidebar_open
                    on_close=close_sidebar
                    user_name=profile_name
                    on_logout=logout
                />
            </Show>
        </div>
    }
}
