use super::*;
use crate::router::navigator::Navigator;
use crate::session::SessionState;
use crate::test_helpers::{client_for, record, spawn_backend};
use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use serde_json::{Value, json};

// =============================================================================
// MOCK BACKEND
// =============================================================================

async fn login_handler(Json(body): Json<Value>) -> impl IntoResponse {
    let user = json!({
        "id": 7,
        "email": "ana@acme.test",
        "username": body["emailOrUsername"],
        "role": body["role"],
        "firstname": "Ana",
        "lastname": "Lopez",
    });
    match body["password"].as_str() {
        Some("secret") => {
            let mut user = user;
            user["token"] = json!("jwt-1");
            Json(user).into_response()
        }
        Some("no-token") => Json(user).into_response(),
        Some("silent") => StatusCode::FORBIDDEN.into_response(),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Bad credentials" }))).into_response(),
    }
}

async fn register_handler(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == json!("taken@acme.test") {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Email already in use" }))).into_response();
    }
    let mut created = body;
    created["id"] = json!(10);
    created.as_object_mut().map(|o| o.remove("password"));
    Json(created).into_response()
}

async fn candidate_profile(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": id,
        "email": body["email"],
        "username": body["username"],
        "firstname": body["firstname"],
        "lastname": body["lastname"],
        "phone": body["phone"],
        "passwordChanged": body.get("newPassword").is_some(),
    }))
}

async fn hr_profile(Path(id): Path<i64>, Json(body): Json<Value>) -> impl IntoResponse {
    if body.get("email").is_some() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "email is read-only" }))).into_response();
    }
    Json(json!({
        "id": id,
        "email": "hr@acme.test",
        "username": body["username"],
        "firstname": body["firstname"],
        "lastname": body["lastname"],
    }))
    .into_response()
}

fn backend() -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/candidates/create", post(register_handler))
        .route("/api/candidates/{id}/profile", put(candidate_profile))
        .route("/api/hr/{id}/profile", put(hr_profile))
}

fn credentials(password: &str, role: Role) -> Credentials {
    Credentials { email_or_username: "ana".into(), password: password.into(), role }
}

// =============================================================================
// LOGIN
// =============================================================================

#[tokio::test]
async fn login_stores_session_and_token() {
    let t = client_for(&spawn_backend(backend()).await);
    let record = login(&t.client, &credentials("secret", Role::Candidate)).await.expect("login");

    assert_eq!(record.role, Role::Candidate);
    assert_eq!(record.token.as_deref(), Some("jwt-1"));
    assert!(t.session.is_authenticated());
    assert_eq!(t.session.token().as_deref(), Some("jwt-1"));
    assert_eq!(record.role.landing_route(), "/offer");
}

#[tokio::test]
async fn rejected_login_uses_server_message_and_keeps_navigation() {
    let t = client_for(&spawn_backend(backend()).await);
    t.history.navigate("/login");
    let err = login(&t.client, &credentials("wrong", Role::Hr)).await.expect_err("rejected");

    assert_eq!(err.to_string(), "Bad credentials");
    assert_eq!(err.error_code(), "E_LOGIN_REJECTED");
    assert_eq!(t.session.snapshot(), SessionState::Anonymous);
    assert_eq!(t.history.len(), 2);
}

#[tokio::test]
async fn rejected_login_without_message_uses_generic_text() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = login(&t.client, &credentials("silent", Role::Pm)).await.expect_err("rejected");
    assert_eq!(err.to_string(), LOGIN_REJECTED_MESSAGE);
}

#[tokio::test]
async fn login_without_token_is_not_a_session() {
    let t = client_for(&spawn_backend(backend()).await);
    let err = login(&t.client, &credentials("no-token", Role::Candidate)).await.expect_err("no token");
    assert!(matches!(err, AuthError::MissingToken));
    assert!(!t.session.is_authenticated());
}

#[tokio::test]
async fn unreachable_backend_is_reported_as_such() {
    let t = client_for("http://127.0.0.1:9/api");
    let err = login(&t.client, &credentials("secret", Role::Admin)).await.expect_err("offline");
    assert_eq!(err.to_string(), SERVER_UNREACHABLE_MESSAGE);
    assert!(err.retryable());
}

#[test]
fn credentials_serialize_camel_case_with_upper_role() {
    let body = serde_json::to_value(credentials("pw", Role::Hr)).expect("serializes");
    assert_eq!(body, json!({ "emailOrUsername": "ana", "password": "pw", "role": "HR" }));
}

#[tokio::test]
async fn logout_clears_session() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(1, Role::Pm, "pm-token"));
    logout(&t.client);
    assert!(!t.session.is_authenticated());
}

// =============================================================================
// REGISTRATION
// =============================================================================

#[tokio::test]
async fn register_returns_created_candidate_without_logging_in() {
    let t = client_for(&spawn_backend(backend()).await);
    let registration = Registration {
        username: "newbie".into(),
        email: "new@acme.test".into(),
        password: "hunter22".into(),
        firstname: "New".into(),
        lastname: "Bie".into(),
        phone: None,
    };
    let created = register_candidate(&t.client, &registration).await.expect("registered");
    assert_eq!(created["id"], json!(10));
    assert!(created.get("password").is_none());
    assert!(created.get("phone").is_none());
    assert!(!t.session.is_authenticated());
}

#[tokio::test]
async fn register_conflict_surfaces_message() {
    let t = client_for(&spawn_backend(backend()).await);
    let registration = Registration { email: "taken@acme.test".into(), ..Registration::default() };
    let err = register_candidate(&t.client, &registration).await.expect_err("conflict");
    assert_eq!(err.to_string(), "Email already in use");
}

// =============================================================================
// PROFILE FORM
// =============================================================================

fn password_change(current: &str, new: &str, confirm: &str) -> ProfileForm {
    ProfileForm {
        current_password: current.into(),
        new_password: new.into(),
        confirm_password: confirm.into(),
        ..ProfileForm::default()
    }
}

#[test]
fn form_without_password_change_is_valid() {
    let form = ProfileForm { current_password: "ignored".into(), ..ProfileForm::default() };
    assert!(!form.changes_password());
    assert_eq!(form.validate(), Ok(()));
}

#[test]
fn password_rules_apply_in_order() {
    let cases = [
        (password_change("", "abcdef", "abcdef"), ProfileFormError::CurrentPasswordRequired),
        (password_change("old", "", "abcdef"), ProfileFormError::NewPasswordRequired),
        (password_change("old", "abc", "abc"), ProfileFormError::PasswordTooShort),
        (password_change("old", "abcdef", "abcdeg"), ProfileFormError::PasswordMismatch),
        (password_change("abcdef", "abcdef", "abcdef"), ProfileFormError::PasswordUnchanged),
    ];
    for (form, expected) in cases {
        assert_eq!(form.validate(), Err(expected));
    }
    assert_eq!(password_change("old-pass", "new-pass", "new-pass").validate(), Ok(()));
}

#[test]
fn validation_messages_are_user_facing() {
    assert_eq!(
        ProfileFormError::PasswordTooShort.to_string(),
        "New password must be at least 6 characters long"
    );
}

#[test]
fn profile_endpoints_exist_for_candidate_and_hr_only() {
    assert_eq!(profile_endpoint(Role::Candidate, 4).as_deref(), Some("/candidates/4/profile"));
    assert_eq!(profile_endpoint(Role::Hr, 2).as_deref(), Some("/hr/2/profile"));
    assert_eq!(profile_endpoint(Role::Pm, 3), None);
    assert_eq!(profile_endpoint(Role::Admin, 1), None);
}

// =============================================================================
// PROFILE UPDATE
// =============================================================================

#[tokio::test]
async fn candidate_profile_update_refreshes_session_and_keeps_token() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(4, Role::Candidate, "cand-token"));
    let form = ProfileForm {
        firstname: "Renamed".into(),
        lastname: "Person".into(),
        username: "renamed".into(),
        email: "renamed@acme.test".into(),
        ..ProfileForm::default()
    };

    let updated = update_profile(&t.client, &form).await.expect("updated");
    assert_eq!(updated.firstname.as_deref(), Some("Renamed"));
    assert_eq!(updated.email.as_deref(), Some("renamed@acme.test"));
    assert_eq!(updated.role, Role::Candidate);
    assert_eq!(updated.token.as_deref(), Some("cand-token"));
    assert_eq!(t.session.current_user(), Some(updated));
}

#[tokio::test]
async fn hr_profile_update_omits_email() {
    let t = client_for(&spawn_backend(backend()).await);
    t.session.login(record(2, Role::Hr, "hr-token"));
    let form = ProfileForm {
        username: "hr-two".into(),
        email: "ignored@acme.test".into(),
        ..ProfileForm::default()
    };

    let updated = update_profile(&t.client, &form).await.expect("updated");
    assert_eq!(updated.username.as_deref(), Some("hr-two"));
    assert_eq!(updated.role, Role::Hr);
}

#[tokio::test]
async fn invalid_form_is_rejected_before_sending() {
    let t = client_for("http://127.0.0.1:9/api");
    t.session.login(record(4, Role::Candidate, "cand-token"));
    let err = update_profile(&t.client, &password_change("old", "new", "new"))
        .await
        .expect_err("too short");
    assert!(matches!(err, AuthError::Invalid(ProfileFormError::PasswordTooShort)));
}

#[tokio::test]
async fn profile_update_requires_session_and_supported_role() {
    let t = client_for("http://127.0.0.1:9/api");
    let err = update_profile(&t.client, &ProfileForm::default()).await.expect_err("anonymous");
    assert!(matches!(err, AuthError::NotLoggedIn));

    t.session.login(record(3, Role::Pm, "pm-token"));
    let err = update_profile(&t.client, &ProfileForm::default()).await.expect_err("pm");
    assert!(matches!(err, AuthError::ProfileUnsupported(Role::Pm)));
}
