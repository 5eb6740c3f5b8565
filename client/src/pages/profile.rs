//! Profile page: display-name and role attribute edits, password change.
//!
//! ERROR HANDLING
//! ==============
//! Local validation messages and session failures share one message line
//! per form. Session failures come from `AuthState::error`, so a failed
//! password change reads the backend's message verbatim when it sent one.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use leptos::prelude::*;
use serde_json::{Map, Value};

use crate::components::app_header::AppHeader;
use crate::pages::dashboard::role_detail;
use crate::pages::register::{MIN_PASSWORD_LEN, role_detail_field};
use crate::state::auth::AuthState;
use crate::state::session::use_session;

/// Build the `PUT /users/{id}` body from the edit form.
pub(crate) fn build_profile_patch(
    name: &str,
    detail: Option<(&'static str, &str)>,
) -> Result<Map<String, Value>, &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Name cannot be empty.");
    }
    let mut patch = Map::new();
    patch.insert("name".to_owned(), Value::String(name.to_owned()));
    if let Some((key, value)) = detail {
        let value = value.trim();
        if !value.is_empty() {
            patch.insert(key.to_owned(), Value::String(value.to_owned()));
        }
    }
    Ok(patch)
}

/// Check a password change before it is sent.
pub(crate) fn validate_password_change(current: &str, new: &str, confirm: &str) -> Result<(), String> {
    if current.is_empty() || new.is_empty() {
        return Err("Enter your current and new password.".to_owned());
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!("New password must be at least {MIN_PASSWORD_LEN} characters."));
    }
    if new != confirm {
        return Err("New passwords do not match.".to_owned());
    }
    if new == current {
        return Err("New password must differ from the current one.".to_owned());
    }
    Ok(())
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = use_session();

    let initial = auth.get_untracked().user;
    let name = RwSignal::new(initial.as_ref().map(|u| u.name.clone()).unwrap_or_default());
    let detail = RwSignal::new(
        initial
            .as_ref()
            .and_then(role_detail)
            .map(|(_, value)| value)
            .unwrap_or_default(),
    );
    let detail_field = initial.as_ref().and_then(|u| role_detail_field(u.role));

    let profile_info = RwSignal::new(String::new());
    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let password_info = RwSignal::new(String::new());

    let profile_session = session.clone();
    let on_save_profile = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let detail_value = detail.get();
        let patch = match build_profile_patch(&name.get(), detail_field.map(|(key, _)| (key, detail_value.as_str()))) {
            Ok(patch) => patch,
            Err(msg) => {
                profile_info.set(msg.to_owned());
                return;
            }
        };
        profile_info.set("Saving...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let session = profile_session.clone();
            leptos::task::spawn_local(async move {
                match session.update_profile(&patch).await {
                    Ok(_) => profile_info.set("Profile updated.".to_owned()),
                    Err(err) => profile_info.set(err.to_string()),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&profile_session, patch);
    };

    let on_change_password = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if auth.get_untracked().loading {
            return;
        }
        let (current, new) = (current_password.get(), new_password.get());
        if let Err(msg) = validate_password_change(&current, &new, &confirm_password.get()) {
            password_info.set(msg);
            return;
        }
        password_info.set("Updating password...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let session = session.clone();
            leptos::task::spawn_local(async move {
                match session.change_password(&current, &new).await {
                    Ok(_) => {
                        current_password.set(String::new());
                        new_password.set(String::new());
                        confirm_password.set(String::new());
                        password_info.set("Password changed.".to_owned());
                    }
                    Err(err) => password_info.set(err.to_string()),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = (&session, current, new);
    };

    let busy = move || auth.get().loading;

    view! {
        <div class="profile-page">
            <AppHeader title="Profile"/>
            <section class="profile-card">
                <h2>"Profile"</h2>
                <p class="profile-card__meta">
                    {move || {
                        auth.get()
                            .user
                            .map(|u| format!("{} ({})", u.username, u.role.label()))
                            .unwrap_or_default()
                    }}
                </p>
                <form class="profile-form" on:submit=on_save_profile>
                    <label>
                        "Full name"
                        <input
                            type="text"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>
                    {detail_field
                        .map(|(_, label)| {
                            view! {
                                <label>
                                    {label}
                                    <input
                                        type="text"
                                        prop:value=move || detail.get()
                                        on:input=move |ev| detail.set(event_target_value(&ev))
                                    />
                                </label>
                            }
                        })}
                    <button class="btn" type="submit" disabled=busy>"Save profile"</button>
                    <Show when=move || !profile_info.get().is_empty()>
                        <p class="profile-message">{move || profile_info.get()}</p>
                    </Show>
                </form>
            </section>
            <section class="profile-card">
                <h2>"Change password"</h2>
                <form class="profile-form" on:submit=on_change_password>
                    <input
                        type="password"
                        autocomplete="current-password"
                        placeholder="Current password"
                        prop:value=move || current_password.get()
                        on:input=move |ev| current_password.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        autocomplete="new-password"
                        placeholder="New password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| new_password.set(event_target_value(&ev))
                    />
                    <input
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm new password"
                        prop:value=move || confirm_password.get()
                        on:input=move |ev| confirm_password.set(event_target_value(&ev))
                    />
                    <button class="btn" type="submit" disabled=busy>"Change password"</button>
                    <Show when=move || !password_info.get().is_empty()>
                        <p class="profile-message">{move || password_info.get()}</p>
                    </Show>
                </form>
            </section>
        </div>
    }
}
