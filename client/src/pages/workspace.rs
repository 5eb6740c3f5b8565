//! Role workspaces mounted at `/student`, `/teacher`, and `/admin`.
//!
//! Each workspace is an index of the tools its role owns. The tools
//! themselves live in separate modules of the portal.

#[cfg(test)]
#[path = "workspace_test.rs"]
mod workspace_test;

use leptos::prelude::*;

use crate::components::app_header::AppHeader;
use crate::net::types::Role;

/// Route path of a role's workspace.
pub fn workspace_path(role: Role) -> &'static str {
    match role {
        Role::Student => "/student",
        Role::Teacher => "/teacher",
        Role::Admin => "/admin",
    }
}

/// Workspace heading for a role.
pub(crate) fn workspace_title(role: Role) -> &'static str {
    match role {
        Role::Student => "Student workspace",
        Role::Teacher => "Teacher workspace",
        Role::Admin => "Administration",
    }
}

/// Tool sections as `(title, summary)`.
pub(crate) fn sections_for(role: Role) -> &'static [(&'static str, &'static str)] {
    match role {
        Role::Student => &[
            ("Activities", "Browse extracurricular activities and sign up."),
            ("Credit applications", "Submit completed activities for credit."),
            ("Credit summary", "Track approved credits toward graduation."),
        ],
        Role::Teacher => &[
            ("My activities", "Publish and manage the activities you supervise."),
            ("Application review", "Approve or reject student credit applications."),
            ("Class reports", "Review credit progress for your students."),
        ],
        Role::Admin => &[
            ("User management", "Create accounts and assign roles."),
            ("Activity catalogue", "Curate activity categories and credit values."),
            ("Institution reports", "Export credit statistics across departments."),
        ],
    }
}

#[component]
pub fn WorkspacePage(role: Role) -> impl IntoView {
    let title = workspace_title(role);

    view! {
        <div class="workspace-page">
            <AppHeader title=title/>
            <section class="workspace">
                <h2>{title}</h2>
                <ul class="workspace__sections">
                    {sections_for(role)
                        .iter()
                        .map(|(name, summary)| {
                            view! {
                                <li class="workspace__section">
                                    <h3>{*name}</h3>
                                    <p>{*summary}</p>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </section>
        </div>
    }
}
