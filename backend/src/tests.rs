//! Tests for the application bootstrap: readiness signalling and route
//! wiring.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{test, web};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use focus_backend::domain::{SessionTokenIssuer, SigningSecret};
use focus_backend::inbound::http::health::HealthState;

use crate::server::{ServerConfig, build_app, build_http_state, create_server};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn issuer() -> SessionTokenIssuer {
    let secret = SigningSecret::new(b"bootstrap-test-secret-of-32-bytes".to_vec())
        .expect("non-empty secret");
    SessionTokenIssuer::new(&secret, Arc::new(DefaultClock))
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(
    health_state: web::Data<HealthState>,
    issuer: SessionTokenIssuer,
) {
    assert!(!health_state.is_ready(), "state should start unready");
    let bind_addr = "127.0.0.1:0".parse().expect("valid address");

    let _server = create_server(health_state.clone(), ServerConfig::new(issuer, bind_addr))
        .expect("server should bind");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn login_then_report_through_the_full_app(
    health_state: web::Data<HealthState>,
    issuer: SessionTokenIssuer,
) {
    let bind_addr = "127.0.0.1:0".parse().expect("valid address");
    let config = ServerConfig::new(issuer, bind_addr);
    let http_state = build_http_state(&config);
    let app = test::init_service(build_app(health_state, http_state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": "admin", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("trace-id"));
    let body: Value = test::read_body_json(res).await;
    let token = body["token"].as_str().expect("token string").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/daily-statistics/update")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .set_json(json!({ "date": "2024-03-01", "totalFocusTime": 20 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/daily-statistics")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["totalFocusTime"], 20);
}
