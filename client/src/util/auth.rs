//! Route guard: who may see a protected view.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route evaluates [`evaluate_guard`] against the current
//! [`AuthState`] on each render. The decision has no memory of its own, so a
//! logout is reflected on the very next render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::net::types::Role;
use crate::state::auth::AuthState;

/// Path unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Implicit grants: `(actual, required)` pairs beyond exact matches.
const IMPLIED_ROLES: &[(Role, Role)] = &[(Role::Admin, Role::Teacher)];

/// Whether a user holding `actual` may enter a view gated on `required`.
#[must_use]
pub fn satisfies(actual: Role, required: Role) -> bool {
    actual == required || IMPLIED_ROLES.contains(&(actual, required))
}

/// Outcome of one guard evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still resolving; show a placeholder and decide later.
    Loading,
    /// No session; send the visitor to the login view.
    RedirectToLogin,
    /// Signed in, but the role does not satisfy the route.
    Forbidden,
    /// Render the requested view.
    Render,
}

/// Decide what a protected route renders for `state`.
#[must_use]
pub fn evaluate_guard(state: &AuthState, required: Option<Role>) -> GuardOutcome {
    if state.loading {
        return GuardOutcome::Loading;
    }
    let Some(user) = state.user.as_ref().filter(|_| state.is_authenticated()) else {
        return GuardOutcome::RedirectToLogin;
    };
    match required {
        Some(required) if !satisfies(user.role, required) => GuardOutcome::Forbidden,
        _ => GuardOutcome::Render,
    }
}

/// True once auth has settled without a session.
#[must_use]
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    evaluate_guard(state, None) == GuardOutcome::RedirectToLogin
}

/// Redirect to `/login` whenever auth has settled and no session is present.
pub fn install_unauth_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&auth.get()) {
            navigate(LOGIN_PATH, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
