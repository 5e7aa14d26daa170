//! Status Banner Component

use leptos::prelude::*;

use crate::context::use_app_context;

/// Last status message, hidden while empty.
#[component]
pub fn StatusMessage() -> impl IntoView {
    let ctx = use_app_context();

    move || {
        let status = ctx.status.get();
        (!status.is_empty()).then(|| {
            view! {
                <div class="status">{status}</div>
            }
        })
    }
}
