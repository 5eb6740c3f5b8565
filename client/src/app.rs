//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` owns the one `SessionStore` of the page. Its state is mirrored into
//! an `RwSignal<AuthState>` through a store subscription, so components read
//! reactive state while every mutation still flows through the store.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::protected_route::ProtectedRoute;
use crate::config::ApiConfig;
use crate::net::http::{ApiClient, default_transport};
use crate::net::types::Role;
use crate::pages::{
    dashboard::DashboardPage, login::LoginPage, profile::ProfilePage, register::RegisterPage,
    workspace::WorkspacePage,
};
use crate::state::auth::AuthState;
use crate::state::session::{SessionHandle, SessionStore};
use crate::util::token_storage::LocalTokenStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Build the session store, mirror it into a signal, and provide both.
///
/// In the browser the stored token is resolved right away. The store is
/// detached from the signal when the owning scope is cleaned up.
pub fn provide_session(config: &ApiConfig) -> (SessionHandle, RwSignal<AuthState>) {
    let api = Arc::new(ApiClient::new(&config.base_url, default_transport()));
    let store = Arc::new(SessionStore::new(api, Arc::new(LocalTokenStorage::default())));

    let auth = RwSignal::new(store.snapshot());
    store.subscribe(move |state| auth.set(state.clone()));

    let session = SessionHandle::new(store);
    provide_context(session.clone());
    provide_context(auth);

    #[cfg(feature = "hydrate")]
    {
        let session = session.clone();
        leptos::task::spawn_local(async move { session.initialize().await });
    }

    let disposer = session.clone();
    on_cleanup(move || disposer.dispose());

    (session, auth)
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_session(&ApiConfig::from_build_env());

    view! {
        <Title text="Extracurricular Credits"/>

        <Router>
            <main class="app">
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route
                        path=StaticSegment("")
                        view=|| view! { <ProtectedRoute><DashboardPage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("profile")
                        view=|| view! { <ProtectedRoute><ProfilePage/></ProtectedRoute> }
                    />
                    <Route
                        path=StaticSegment("student")
                        view=|| {
                            view! {
                                <ProtectedRoute required_role=Role::Student>
                                    <WorkspacePage role=Role::Student/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=StaticSegment("teacher")
                        view=|| {
                            view! {
                                <ProtectedRoute required_role=Role::Teacher>
                                    <WorkspacePage role=Role::Teacher/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route
                        path=StaticSegment("admin")
                        view=|| {
                            view! {
                                <ProtectedRoute required_role=Role::Admin>
                                    <WorkspacePage role=Role::Admin/>
                                </ProtectedRoute>
                            }
                        }
                    />
                </Routes>
            </main>
        </Router>
    }
}
