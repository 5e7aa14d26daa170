//! Auth Card Component
//!
//! Login/register tabs shown while no session token is held.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;

#[derive(Clone, Copy, PartialEq)]
enum AuthMode {
    Login,
    Register,
}

#[component]
pub fn AuthCard() -> impl IntoView {
    let ctx = use_app_context();

    let (mode, set_mode) = signal(AuthMode::Login);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.clear_status();

        let ctx = ctx.clone();
        let submitted_name = name.get();
        let submitted_email = email.get();
        let submitted_password = password.get();
        spawn_local(async move {
            let result = match mode.get_untracked() {
                AuthMode::Login => {
                    ctx.engine.login(&submitted_email, &submitted_password).await
                }
                AuthMode::Register => {
                    ctx.engine
                        .register(&submitted_name, &submitted_email, &submitted_password)
                        .await
                }
            };
            match result {
                Ok(()) => {
                    if mode.get_untracked() == AuthMode::Login {
                        ctx.set_status("Signed in");
                    } else {
                        ctx.set_status("Registration complete, you can sign in now");
                        set_mode.set(AuthMode::Login);
                    }
                    set_name.set(String::new());
                    set_email.set(String::new());
                    set_password.set(String::new());
                }
                Err(message) => ctx.set_status(message),
            }
        });
    };

    view! {
        <section class="card">
            <div class="tabs">
                <button
                    class=move || if mode.get() == AuthMode::Login { "active" } else { "" }
                    on:click=move |_| set_mode.set(AuthMode::Login)
                >
                    "Sign in"
                </button>
                <button
                    class=move || if mode.get() == AuthMode::Register { "active" } else { "" }
                    on:click=move |_| set_mode.set(AuthMode::Register)
                >
                    "Register"
                </button>
            </div>

            <form class="form" on:submit=submit>
                {move || (mode.get() == AuthMode::Register).then(|| view! {
                    <label>
                        "Name"
                        <input
                            type="text"
                            required
                            prop:value=move || name.get()
                            on:input=move |ev| set_name.set(event_target_value(&ev))
                        />
                    </label>
                })}
                <label>
                    "Email"
                    <input
                        type="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        required
                        minlength="6"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </label>

                <button type="submit">
                    {move || if mode.get() == AuthMode::Login { "Sign in" } else { "Register" }}
                </button>
            </form>
        </section>
    }
}
