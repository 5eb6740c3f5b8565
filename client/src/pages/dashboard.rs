//! Authenticated landing page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `ProtectedRoute`, so a user is present whenever this
//! renders. Shows the current identity and links to every workspace the
//! user's role can enter.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::app_header::AppHeader;
use crate::net::types::{Role, User};
use crate::pages::register::role_detail_field;
use crate::pages::workspace::{workspace_path, workspace_title};
use crate::state::auth::AuthState;
use crate::util::auth::satisfies;

/// Workspaces reachable by `role` as `(path, title)`, highest privilege last.
pub(crate) fn workspace_links(role: Role) -> Vec<(&'static str, &'static str)> {
    Role::ALL
        .into_iter()
        .filter(|&required| satisfies(role, required))
        .map(|required| (workspace_path(required), workspace_title(required)))
        .collect()
}

/// The user's role-specific attribute as `(label, value)`, if set.
pub(crate) fn role_detail(user: &User) -> Option<(&'static str, String)> {
    let (key, label) = role_detail_field(user.role)?;
    let value = match user.attributes.get(key)? {
        serde_json::Value::String(text) if !text.trim().is_empty() => text.clone(),
        serde_json::Value::Number(number) => number.to_string(),
        _ => return None,
    };
    Some((label, value))
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let user = Memo::new(move |_| auth.get().user);

    view! {
        <div class="dashboard-page">
            <AppHeader title="Dashboard"/>
            {move || {
                user.get()
                    .map(|user| {
                        let detail = role_detail(&user);
                        let links = workspace_links(user.role);
                        view! {
                            <section class="dashboard-card">
                                <h2>"Welcome, " {user.display_name().to_owned()}</h2>
                                <dl class="dashboard-card__identity">
                                    <dt>"Username"</dt>
                                    <dd>{user.username.clone()}</dd>
                                    <dt>"Role"</dt>
                                    <dd>{user.role.label()}</dd>
                                    {detail
                                        .map(|(label, value)| {
                                            view! {
                                                <dt>{label}</dt>
                                                <dd>{value}</dd>
                                            }
                                        })}
                                </dl>
                                <nav class="dashboard-card__links">
                                    {links
                                        .into_iter()
                                        .map(|(path, title)| {
                                            view! { <a class="btn" href=path>{title}</a> }
                                        })
                                        .collect_view()}
                                    <a class="btn" href="/profile">"Edit profile"</a>
                                </nav>
                            </section>
                        }
                    })
            }}
        </div>
    }
}
