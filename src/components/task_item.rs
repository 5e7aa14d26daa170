//! Task Item Component
//!
//! One card on the board: draggable display mode, or the inline edit form
//! when this task owns the edit session.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::models::{Task, TaskStatus};

#[component]
pub fn TaskItem(task: Task) -> impl IntoView {
    let ctx = use_app_context();
    let task_id = task.id;

    // Draft for this task, when it is the one being edited.
    let state = ctx.state;
    let edit_draft = Memo::new(move |_| {
        state.get().edit.filter(|draft| draft.task_id == task_id)
    });

    let start_edit = {
        let ctx = ctx.clone();
        move |_| ctx.engine.start_edit(task_id)
    };
    let cancel_edit = {
        let ctx = ctx.clone();
        move |_| ctx.engine.cancel_edit()
    };
    let save_edit = {
        let ctx = ctx.clone();
        move |ev: web_sys::SubmitEvent| {
            ev.prevent_default();
            let ctx = ctx.clone();
            spawn_local(async move {
                ctx.report(ctx.engine.save_edit().await);
            });
        }
    };
    let delete = {
        let ctx = ctx.clone();
        move |_| {
            let ctx = ctx.clone();
            spawn_local(async move {
                ctx.report(ctx.engine.delete_task(task_id).await);
            });
        }
    };

    // The drop target reads the task id back out of the DataTransfer.
    let drag_start = move |ev: web_sys::DragEvent| {
        if let Some(data) = ev.data_transfer() {
            let _ = data.set_data("text/plain", &task_id.to_string());
        }
    };

    let edit_ctx = ctx.clone();
    move || match edit_draft.get() {
        Some(draft) => {
            let ctx = edit_ctx.clone();
            let title_ctx = ctx.clone();
            let content_ctx = ctx.clone();
            let status_ctx = ctx.clone();
            view! {
                <li>
                    <form class="form edit" on:submit=save_edit.clone()>
                        <input
                            prop:value=draft.title.clone()
                            on:input=move |ev| title_ctx.engine.set_edit_title(event_target_value(&ev))
                        />
                        <textarea
                            rows="3"
                            prop:value=draft.content.clone()
                            on:input=move |ev| content_ctx.engine.set_edit_content(event_target_value(&ev))
                        />
                        <select
                            prop:value=draft.status.as_str()
                            on:change=move |ev| {
                                if let Some(next) = TaskStatus::parse(&event_target_value(&ev)) {
                                    status_ctx.engine.set_edit_status(next);
                                }
                            }
                        >
                            {TaskStatus::ALL.into_iter().map(|option| view! {
                                <option value=option.as_str()>{option.label()}</option>
                            }).collect_view()}
                        </select>
                        <div class="actions">
                            <button type="submit">"Save"</button>
                            <button type="button" class="ghost" on:click=cancel_edit.clone()>
                                "Cancel"
                            </button>
                        </div>
                    </form>
                </li>
            }
            .into_any()
        }
        None => {
            let task = task.clone();
            view! {
                <li draggable="true" on:dragstart=drag_start>
                    <div class="task-content">
                        <span class="task-title">{task.title}</span>
                        <span class="task-status">{task.status.as_str()}</span>
                        {(!task.content.is_empty()).then(|| view! { <p>{task.content}</p> })}
                    </div>
                    <div class="actions">
                        <button class="ghost" on:click=start_edit.clone()>
                            "Edit"
                        </button>
                        <button class="link" on:click=delete.clone()>
                            "Delete"
                        </button>
                    </div>
                </li>
            }
            .into_any()
        }
    }
}
