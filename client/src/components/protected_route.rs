//! Route wrapper that applies the session guard.

#[cfg(test)]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::Role;
use crate::state::auth::AuthState;
use crate::util::auth::{GuardOutcome, evaluate_guard, install_unauth_redirect};

/// Renders `children` only when the guard allows it.
///
/// While the session resolves a loading placeholder is shown; without a
/// session the visitor is redirected to `/login`; with an unsatisfied
/// `required_role` a permission-denied placeholder replaces the view.
#[component]
pub fn ProtectedRoute(
    /// Role the visitor must satisfy. Any signed-in user when omitted.
    #[prop(optional, into)]
    required_role: Option<Role>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    let outcome = Memo::new(move |_| evaluate_guard(&auth.get(), required_role));

    view! {
        {move || match outcome.get() {
            GuardOutcome::Loading => view! { <LoadingPlaceholder/> }.into_any(),
            GuardOutcome::RedirectToLogin => {
                view! {
                    <div class="guard guard--redirect">
                        <p>"Redirecting to login..."</p>
                    </div>
                }
                    .into_any()
            }
            GuardOutcome::Forbidden => view! { <PermissionDenied required_role=required_role/> }.into_any(),
            GuardOutcome::Render => children().into_any(),
        }}
    }
}

#[component]
pub fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="guard guard--loading" aria-busy="true">
            <p>"Loading..."</p>
        </div>
    }
}

/// Explanation shown on the permission-denied placeholder.
pub(crate) fn denied_detail(required_role: Option<Role>) -> String {
    required_role.map_or_else(
        || "You do not have permission to view this page.".to_owned(),
        |role| format!("This page is restricted to {} accounts.", role.label()),
    )
}

#[component]
pub fn PermissionDenied(#[prop(default = None)] required_role: Option<Role>) -> impl IntoView {
    let detail = denied_detail(required_role);

    view! {
        <div class="guard guard--denied" role="alert">
            <h2>"Permission denied"</h2>
            <p>{detail}</p>
            <a href="/" class="btn">"Back to dashboard"</a>
        </div>
    }
}
