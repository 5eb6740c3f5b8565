use super::*;

#[test]
fn denied_detail_names_required_role() {
    assert_eq!(denied_detail(Some(Role::Teacher)), "This page is restricted to Teacher accounts.");
}

#[test]
fn denied_detail_without_role_is_generic() {
    assert_eq!(denied_detail(None), "You do not have permission to view this page.");
}

#[test]
fn permission_denied_takes_the_guard_role_as_is() {
    let owner = Owner::new();
    owner.with(|| {
        for required_role in [None, Some(Role::Admin)] {
            let _view = view! { <PermissionDenied required_role=required_role/> };
        }
    });
}
