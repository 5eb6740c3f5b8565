//! Self-service registration for students and teachers.
//!
//! DESIGN
//! ======
//! Each role carries one extra attribute (student number or department).
//! It is sent flattened into the register body and comes back on the user
//! record, where the dashboard and profile pages read it by the same key.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use serde_json::{Map, Value};

use crate::net::types::{RegisterRequest, Role};
use crate::state::auth::AuthState;
use crate::state::session::use_session;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;

/// Roles offered on the public registration form.
pub(crate) const REGISTERABLE_ROLES: [Role; 2] = [Role::Student, Role::Teacher];

/// Role-specific attribute as `(json key, form label)`.
pub(crate) fn role_detail_field(role: Role) -> Option<(&'static str, &'static str)> {
    match role {
        Role::Student => Some(("studentId", "Student number")),
        Role::Teacher => Some(("department", "Department")),
        Role::Admin => None,
    }
}

/// Raw registration form values.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct RegisterForm {
    pub username: String,
    pub name: String,
    pub password: String,
    pub confirm: String,
    pub role: Role,
    pub detail: String,
}

/// Validate the form and build the request body.
pub(crate) fn validate_register_input(form: &RegisterForm) -> Result<RegisterRequest, String> {
    let username = form.username.trim();
    let name = form.name.trim();
    if username.is_empty() || name.is_empty() {
        return Err("Enter a username and your full name.".to_owned());
    }
    if !REGISTERABLE_ROLES.contains(&form.role) {
        return Err("Choose the student or teacher role.".to_owned());
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("Password must be at least {MIN_PASSWORD_LEN} characters."));
    }
    if form.password != form.confirm {
        return Err("Passwords do not match.".to_owned());
    }

    let mut attributes = Map::new();
    if let Some((key, label)) = role_detail_field(form.role) {
        let detail = form.detail.trim();
        if detail.is_empty() {
            return Err(format!("{label} is required."));
        }
        attributes.insert(key.to_owned(), Value::String(detail.to_owned()));
    }

    Ok(RegisterRequest {
        username: username.to_owned(),
        password: form.password.clone(),
        name: name.to_owned(),
        role: form.role,
        attributes,
    })
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = use_session();
    let navigate = use_navigate();

    let form = RwSignal::new(RegisterForm::default());
    let info = RwSignal::new(String::new());

    Effect::new(move || {
        if auth.get().is_authenticated() {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let request = match validate_register_input(&form.get()) {
            Ok(request) => request,
            Err(msg) => {
                info.set(msg);
                return;
            }
        };
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                let _ = session.register(&request).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, request);
    };

    let detail_label = move || role_detail_field(form.with(|f| f.role)).map(|(_, label)| label);
    let message = move || {
        let local = info.get();
        if local.is_empty() { auth.get().error.unwrap_or_default() } else { local }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create an account"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="username"
                        placeholder="Username"
                        prop:value=move || form.with(|f| f.username.clone())
                        on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="name"
                        placeholder="Full name"
                        prop:value=move || form.with(|f| f.name.clone())
                        on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                    />
                    <select
                        class="login-input"
                        prop:value=move || form.with(|f| f.role.as_str())
                        on:change=move |ev| {
                            let role = event_target_value(&ev).parse().unwrap_or_default();
                            form.update(|f| {
                                f.role = role;
                                f.detail.clear();
                            });
                        }
                    >
                        {REGISTERABLE_ROLES
                            .into_iter()
                            .map(|role| view! { <option value=role.as_str()>{role.label()}</option> })
                            .collect_view()}
                    </select>
                    <Show when=move || detail_label().is_some()>
                        <input
                            class="login-input"
                            type="text"
                            placeholder=move || detail_label().unwrap_or_default()
                            prop:value=move || form.with(|f| f.detail.clone())
                            on:input=move |ev| form.update(|f| f.detail = event_target_value(&ev))
                        />
                    </Show>
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm password"
                        prop:value=move || form.with(|f| f.confirm.clone())
                        on:input=move |ev| form.update(|f| f.confirm = event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || auth.get().loading>
                        "Register"
                    </button>
                </form>
                <Show when=move || !message().is_empty()>
                    <p class="login-message" role="alert">{message}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">
                    "Already registered? "
                    <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
