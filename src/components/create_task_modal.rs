//! Create Task Modal Component

use leptos::prelude::*;

use crate::components::task_form::TaskForm;
use crate::models::TaskStatus;

#[component]
pub fn CreateTaskModal(
    is_open: ReadSignal<bool>,
    on_close: Callback<()>,
    title: ReadSignal<String>,
    set_title: WriteSignal<String>,
    content: ReadSignal<String>,
    set_content: WriteSignal<String>,
    status: ReadSignal<TaskStatus>,
    set_status: WriteSignal<TaskStatus>,
    on_submit: Callback<()>,
) -> impl IntoView {
    let overlay_class = move || {
        if is_open.get() { "modal-overlay open" } else { "modal-overlay" }
    };
    let panel_class = move || {
        if is_open.get() { "modal-panel open" } else { "modal-panel" }
    };

    view! {
        <button
            class=overlay_class
            on:click=move |_| on_close.run(())
            aria-label="Close the new task panel"
        />
        <div class=panel_class>
            <div class="modal-header">
                <h3>"New Task"</h3>
                <button class="ghost" on:click=move |_| on_close.run(())>
                    "Close"
                </button>
            </div>
            <TaskForm
                class="form"
                title=title
                set_title=set_title
                content=content
                set_content=set_content
                status=status
                set_status=set_status
                on_submit=on_submit
            />
        </div>
    }
}
