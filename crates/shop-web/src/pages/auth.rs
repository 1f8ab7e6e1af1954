//! Login and Registration Pages

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use shop_core::{Credentials, Registration};

use crate::api;
use crate::auth::use_auth;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let credentials = Credentials {
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::login(&credentials).await {
                Ok(session) => {
                    auth.sign_in(session);
                    navigate("/", Default::default());
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <div class="auth">
            <h1>"Log in"</h1>
            <form on:submit=submit>
                <div class="field">
                    <label>"Email"</label>
                    <input
                        type="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Password"</label>
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                <button type="submit" class="btn btn-primary">"Log in"</button>
            </form>
            <p>"No account yet? " <A href="/register">"Sign up"</A></p>
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error, set_error) = signal(None::<String>);

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let registration = Registration {
            email: email.get_untracked(),
            name: name.get_untracked(),
            password: password.get_untracked(),
        };
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match api::register(&registration).await {
                Ok(session) => {
                    auth.sign_in(session);
                    navigate("/", Default::default());
                }
                Err(e) => set_error.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <div class="auth">
            <h1>"Create an account"</h1>
            <form on:submit=submit>
                <div class="field">
                    <label>"Name"</label>
                    <input
                        type="text"
                        required
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Email"</label>
                    <input
                        type="email"
                        required
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </div>
                <div class="field">
                    <label>"Password"</label>
                    <input
                        type="password"
                        required
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </div>
                {move || error.get().map(|e| view! { <p class="error">{e}</p> })}
                <button type="submit" class="btn btn-primary">"Sign up"</button>
            </form>
            <p>"Already registered? " <A href="/login">"Log in"</A></p>
        </div>
    }
}
