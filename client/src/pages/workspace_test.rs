use super::*;

#[test]
fn workspace_path_is_distinct_per_role() {
    let paths: Vec<_> = Role::ALL.into_iter().map(workspace_path).collect();
    assert_eq!(paths, vec!["/student", "/teacher", "/admin"]);
}

#[test]
fn sections_are_present_for_every_role() {
    for role in Role::ALL {
        assert!(!sections_for(role).is_empty(), "{role} has no sections");
    }
}

#[test]
fn teacher_workspace_reviews_applications() {
    assert!(sections_for(Role::Teacher).iter().any(|(name, _)| *name == "Application review"));
    assert!(!sections_for(Role::Student).iter().any(|(name, _)| *name == "Application review"));
}
