//! Sidebar Menu Component
//!
//! Profile panel with the display name and the sign-out action.

use leptos::prelude::*;

#[component]
pub fn SidebarMenu(
    is_open: ReadSignal<bool>,
    on_close: Callback<()>,
    user_name: ReadSignal<String>,
    on_logout: Callback<()>,
) -> impl IntoView {
    let overlay_class = move || {
        if is_open.get() { "sidebar-overlay open" } else { "sidebar-overlay" }
    };
    let panel_class = move || {
        if is_open.get() { "sidebar-panel open" } else { "sidebar-panel" }
    };

    view! {
        <button
            class=overlay_class
            on:click=move |_| on_close.run(())
            aria-label="Close the menu"
        />
        <aside class=panel_class>
            <div class="sidebar-panel-header">
                <p class="sidebar-title">"Profile"</p>
                <button class="ghost" on:click=move |_| on_close.run(())>
                    "Close"
                </button>
            </div>
            <p class="sidebar-name">{move || user_name.get()}</p>
            <button class="ghost" on:click=move |_| on_logout.run(())>
                "Sign out"
            </button>
        </aside>
    }
}
