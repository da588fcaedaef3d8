//! Login Form Component
//!
//! Sign-in and registration. Talks to the backend when one is configured
//! and reachable, otherwise to the demo accounts.

use leptos::prelude::*;
use leptos::task::spawn_local;

use taskflow_core::domain::User;
use taskflow_core::MockDirectory;

use crate::api::{self, ApiClient};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::storage;
use crate::store::{use_app_store, AppStateStoreFields};

#[derive(Clone)]
struct Credentials {
    name: String,
    email: String,
    password: String,
}

async fn authenticate(
    config: AppConfig,
    registering: bool,
    creds: Credentials,
    demo: StoredValue<MockDirectory>,
) -> Result<User, String> {
    if let Ok(client) = ApiClient::new(&config) {
        let result = if registering {
            api::register(&client, &creds.name, &creds.email, &creds.password).await
        } else {
            api::login(&client, &creds.email, &creds.password).await
        };
        match result {
            Ok(resp) => {
                storage::set(storage::TOKEN_KEY, &resp.access_token);
                return Ok(resp.user);
            }
            Err(e) if e.is_unreachable() => {
                log::warn!("[AUTH] backend unreachable, using demo accounts: {}", e);
            }
            Err(e) => return Err(e.to_string()),
        }
    }

    let outcome = if registering {
        let mut outcome = None;
        demo.update_value(|dir| outcome = Some(dir.register(&creds.name, &creds.email, &creds.password)));
        outcome.unwrap_or_else(|| Err(taskflow_core::AuthError::InvalidCredentials))
    } else {
        demo.with_value(|dir| dir.login(&creds.email, &creds.password))
    };
    outcome.map_err(|e| e.to_string())
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = expect_context::<AppContext>();
    let store = use_app_store();
    let demo = StoredValue::new(MockDirectory::default());

    let (registering, set_registering) = signal(false);
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let loading = move || store.auth().read().state().is_loading;
    let error = move || store.auth().read().state().error.clone();

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let creds = Credentials {
            name: name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        let registering = registering.get_untracked();
        if creds.email.trim().is_empty() || creds.password.is_empty() || (registering && creds.name.trim().is_empty()) {
            ctx.error("Please fill in every field");
            return;
        }

        store.auth().write().begin();
        let config = ctx.config();
        spawn_local(async move {
            match authenticate(config, registering, creds, demo).await {
                Ok(user) => {
                    storage::set_json(storage::USER_KEY, &user);
                    ctx.success(format!("Welcome, {}", user.name));
                    store.auth().write().sign_in(user);
                }
                Err(message) => {
                    ctx.error(message.clone());
                    store.auth().write().fail(message, registering);
                }
            }
        });
    };

    view! {
        <div class="login-page">
            <form class="login-form" on:submit=submit>
                <h1>{move || if registering.get() { "Create account" } else { "Sign in" }}</h1>
                <Show when=move || registering.get()>
                    <input
                        type="text"
                        placeholder="Name"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </Show>
                <input
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                {move || error().map(|e| view! { <p class="form-error">{e}</p> })}
                <button type="submit" disabled=loading>
                    {move || if loading() { "Please wait..." } else if registering.get() { "Register" } else { "Sign in" }}
                </button>
                <button
                    type="button"
                    class="link-btn"
                    on:click=move |_| set_registering.update(|r| *r = !*r)
                >
                    {move || if registering.get() { "Have an account? Sign in" } else { "No account? Register" }}
                </button>
                <Show when=move || ctx.config().is_offline()>
                    <p class="hint">"Offline mode: try admin@example.com / admin123"</p>
                </Show>
            </form>
        </div>
    }
}
