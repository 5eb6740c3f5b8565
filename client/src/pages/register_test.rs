use super::*;
use serde_json::json;

fn student_form() -> RegisterForm {
    RegisterForm {
        username: " newstudent ".to_owned(),
        name: " New Student ".to_owned(),
        password: "secret1".to_owned(),
        confirm: "secret1".to_owned(),
        role: Role::Student,
        detail: " S-1001 ".to_owned(),
    }
}

#[test]
fn role_detail_field_matches_role() {
    assert_eq!(role_detail_field(Role::Student), Some(("studentId", "Student number")));
    assert_eq!(role_detail_field(Role::Teacher), Some(("department", "Department")));
    assert_eq!(role_detail_field(Role::Admin), None);
}

#[test]
fn validate_register_input_builds_trimmed_request() {
    let request = validate_register_input(&student_form()).unwrap();

    assert_eq!(request.username, "newstudent");
    assert_eq!(request.name, "New Student");
    assert_eq!(request.role, Role::Student);
    assert_eq!(request.attributes.get("studentId"), Some(&json!("S-1001")));
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "username": "newstudent",
            "password": "secret1",
            "name": "New Student",
            "role": "student",
            "studentId": "S-1001",
        })
    );
}

#[test]
fn validate_register_input_uses_department_for_teachers() {
    let form = RegisterForm { role: Role::Teacher, detail: "Physics".to_owned(), ..student_form() };

    let request = validate_register_input(&form).unwrap();

    assert_eq!(request.attributes.get("department"), Some(&json!("Physics")));
    assert!(!request.attributes.contains_key("studentId"));
}

#[test]
fn validate_register_input_requires_identity() {
    let form = RegisterForm { name: "  ".to_owned(), ..student_form() };
    assert_eq!(
        validate_register_input(&form),
        Err("Enter a username and your full name.".to_owned())
    );
}

#[test]
fn validate_register_input_rejects_admin_self_registration() {
    let form = RegisterForm { role: Role::Admin, ..student_form() };
    assert_eq!(
        validate_register_input(&form),
        Err("Choose the student or teacher role.".to_owned())
    );
}

#[test]
fn validate_register_input_checks_password_length_and_confirmation() {
    let short = RegisterForm { password: "abc".to_owned(), confirm: "abc".to_owned(), ..student_form() };
    assert_eq!(
        validate_register_input(&short),
        Err("Password must be at least 6 characters.".to_owned())
    );

    let mismatch = RegisterForm { confirm: "secret2".to_owned(), ..student_form() };
    assert_eq!(validate_register_input(&mismatch), Err("Passwords do not match.".to_owned()));
}

#[test]
fn validate_register_input_requires_role_detail() {
    let form = RegisterForm { detail: String::new(), ..student_form() };
    assert_eq!(
        validate_register_input(&form),
        Err("Student number is required.".to_owned())
    );
}
