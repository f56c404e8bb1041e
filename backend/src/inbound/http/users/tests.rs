//! Regression coverage for login and profile handlers.

use super::*;
use crate::inbound::http::test_utils::{TestHarness, bearer_for};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;

fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .service(web::scope("/api/v1").service(login).service(profile))
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: username.into(),
            password: password.into(),
        })
        .to_request()
}

#[rstest]
#[case("   ", "password", "username must not be empty", "empty_username")]
#[case("admin", "", "password must not be empty", "empty_password")]
#[actix_web::test]
async fn login_rejects_blank_fields(
    #[case] username: &str,
    #[case] password: &str,
    #[case] message: &str,
    #[case] detail_code: &str,
) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(&app, login_request(username, password)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["message"], message);
    assert_eq!(value["details"]["code"], detail_code);
}

#[actix_web::test]
async fn login_rejects_wrong_password() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(&app, login_request("admin", "nope")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "unauthorized");
}

#[actix_web::test]
async fn login_issues_a_token_that_opens_the_profile() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(&app, login_request("admin", "password")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: LoginResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.id, crate::domain::ports::FIXTURE_USER_ID);
    assert_eq!(body.roles, vec!["Admin".to_owned()]);
    assert!(body.expiration > Utc::now());

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/profile")
            .insert_header((AUTHORIZATION, format!("Bearer {}", body.token)))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile_body: Value = actix_test::read_body_json(response).await;
    assert_eq!(profile_body["username"], "admin");
    assert_eq!(profile_body["id"], crate::domain::ports::FIXTURE_USER_ID);
}

#[actix_web::test]
async fn profile_requires_a_token() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/profile")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn profile_of_unknown_subject_is_not_found() {
    let harness = TestHarness::new();
    let ghost = crate::domain::UserId::new("ghost").expect("valid id");
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/profile")
            .insert_header((AUTHORIZATION, bearer_for(&harness, &ghost)))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case("s3cret-bob", StatusCode::OK)]
#[case("password", StatusCode::UNAUTHORIZED)]
#[actix_web::test]
async fn stored_accounts_log_in_with_their_password(
    #[case] password: &str,
    #[case] expected: StatusCode,
) {
    let harness = TestHarness::new();
    harness.register_user_with_password("bob", "s3cret-bob");
    let app = actix_test::init_service(test_app(harness.state())).await;

    let response = actix_test::call_service(&app, login_request("bob", password)).await;

    assert_eq!(response.status(), expected);
    if expected == StatusCode::OK {
        let body: LoginResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.id, "bob");
        assert!(body.roles.is_empty());
    }
}
