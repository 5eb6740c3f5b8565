//! Top bar shown on every signed-in page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;
use crate::state::session::use_session;
use crate::util::auth::LOGIN_PATH;

/// Header with the page title, current identity, and a logout button.
#[component]
pub fn AppHeader(title: &'static str) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let session = use_session();
    let navigate = use_navigate();

    let self_identity = move || {
        auth.get()
            .user
            .map(|user| (user.display_name().to_owned(), user.role.label()))
            .unwrap_or_else(|| ("-".to_owned(), ""))
    };

    let on_logout = move |_| {
        session.logout();
        navigate(LOGIN_PATH, NavigateOptions::default());
    };

    view! {
        <header class="app-header toolbar">
            <a href="/" class="toolbar__home">"Credits"</a>
            <span class="toolbar__divider" aria-hidden="true"></span>
            <span class="toolbar__title">{title}</span>
            <span class="toolbar__spacer"></span>
            <a href="/profile" class="toolbar__self">
                {move || self_identity().0}
                " ("
                <span class="toolbar__self-role">{move || self_identity().1}</span>
                ")"
            </a>
            <button class="btn toolbar__logout" on:click=on_logout title="Logout">
                "Logout"
            </button>
        </header>
    }
}
