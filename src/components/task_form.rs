//! Task Form Component
//!
//! Title/content/status inputs, shared by the create modal and reusable
//! inline.

use leptos::prelude::*;

use crate::models::TaskStatus;

#[component]
pub fn TaskForm(
    #[prop(default = "form inline")] class: &'static str,
    title: ReadSignal<String>,
    set_title: WriteSignal<String>,
    content: ReadSignal<String>,
    set_content: WriteSignal<String>,
    status: ReadSignal<TaskStatus>,
    set_status: WriteSignal<TaskStatus>,
    on_submit: Callback<()>,
) -> impl IntoView {
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        on_submit.run(());
    };

    view! {
        <form class=class on:submit=submit>
            <input
                placeholder="New task title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Short description"
                rows="3"
                prop:value=move || content.get()
                on:input=move |ev| set_content.set(event_target_value(&ev))
            />
            <select
                prop:value=move || status.get().as_str()
                on:change=move |ev| {
                    if let Some(next) = TaskStatus::parse(&event_target_value(&ev)) {
                        set_status.set(next);
                    }
                }
            >
                {TaskStatus::ALL.into_iter().map(|option| view! {
                    <option value=option.as_str()>{option.label()}</option>
                }).collect_view()}
            </select>
            <button type="submit">"Add"</button>
        </form>
    }
}
