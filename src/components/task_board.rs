//! Task Board Component
//!
//! Three status columns. Columns are drop targets: dropping a dragged card
//! issues an optimistic move to the column's status.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::task_item::TaskItem;
use crate::context::use_app_context;
use crate::models::TaskStatus;

#[component]
pub fn TaskBoard(
    /// Opens the create modal pre-selected to the given column.
    on_create_for: Callback<TaskStatus>,
) -> impl IntoView {
    let ctx = use_app_context();
    let state = ctx.state;

    move || {
        let snapshot = state.get();
        if snapshot.loading {
            return view! { <p>"Loading..."</p> }.into_any();
        }
        if snapshot.tasks.is_empty() {
            return view! { <p>"No tasks yet"</p> }.into_any();
        }
        view! {
            <div class="task-columns">
                {TaskStatus::ALL.into_iter().map(|status| view! {
                    <TaskColumn status=status on_create_for=on_create_for />
                }).collect_view()}
            </div>
        }
        .into_any()
    }
}

#[component]
fn TaskColumn(status: TaskStatus, on_create_for: Callback<TaskStatus>) -> impl IntoView {
    let ctx = use_app_context();
    let state = ctx.state;

    let column_tasks = Memo::new(move |_| {
        state
            .get()
            .tasks
            .into_iter()
            .filter(|task| task.status == status)
            .collect::<Vec<_>>()
    });

    let on_dragover = move |ev: web_sys::DragEvent| {
        // Required for the element to accept drops.
        ev.prevent_default();
    };
    let on_drop = {
        let ctx = ctx.clone();
        move |ev: web_sys::DragEvent| {
            ev.prevent_default();
            let dragged_id = ev
                .data_transfer()
                .and_then(|data| data.get_data("text/plain").ok())
                .and_then(|raw| raw.parse::<i64>().ok());
            if let Some(id) = dragged_id {
                let ctx = ctx.clone();
                spawn_local(async move {
                    ctx.report(ctx.engine.move_task(id, status).await);
                });
            }
        }
    };

    view! {
        <div class="task-column" on:dragover=on_dragover on:drop=on_drop>
            <div class="task-column-header">
                <h3>{status.label()}</h3>
                <span>{move || column_tasks.get().len()}</span>
                <button class="ghost" on:click=move |_| on_create_for.run(status)>
                    "+"
                </button>
            </div>
            {move || {
                let tasks = column_tasks.get();
                if tasks.is_empty() {
                    view! { <p class="task-empty">"No tasks in this list"</p> }.into_any()
                } else {
                    view! {
                        <ul class="task-list">
                            {tasks.into_iter().map(|task| view! {
                                <TaskItem task=task />
                            }).collect_view()}
                        </ul>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}
