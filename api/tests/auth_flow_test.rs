//! Integration tests for the auth endpoints

mod common;

use actix_web::{
    http::{header, StatusCode},
    test,
};
use serde_json::{json, Value};

use orchid_api::app::create_app;
use orchid_shared::CorsConfig;

use common::{setup, ACCESS_TTL, PASSWORD};

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(create_app($ctx.state.clone(), &CorsConfig::development(), None)).await
    };
}

macro_rules! login {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": $email, "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        body["data"]["token"].clone()
    }};
}

fn bearer(token: &Value) -> (header::HeaderName, String) {
    (
        header::AUTHORIZATION,
        format!("Bearer {}", token["access_token"].as_str().unwrap()),
    )
}

#[actix_web::test]
async fn test_login_success() {
    let ctx = setup();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::USER_AGENT, "Mozilla/5.0 (X11; Linux x86_64)"))
        .set_json(json!({ "email": "mai@orchid.shop", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Login successful");

    let token = &body["data"]["token"];
    assert!(!token["access_token"].as_str().unwrap().is_empty());
    assert_eq!(token["refresh_token"].as_str().unwrap().len(), 64);
    assert_eq!(token["token_type"], "Bearer");
    assert_eq!(token["is_mobile"], false);
    assert!(token["expires"].is_string());
    assert!(token["expires_refresh_token"].is_string());

    let account = &body["data"]["account"];
    assert_eq!(account["id"], ctx.mai.id.to_string());
    assert_eq!(account["email"], "mai@orchid.shop");
    assert_eq!(account["role"], "USER");
    assert!(account.get("password_hash").is_none());

    assert_eq!(ctx.tokens.all().await.len(), 1);
}

#[actix_web::test]
async fn test_login_rejects_bad_credentials() {
    let ctx = setup();
    let app = init_app!(ctx);

    for (email, password) in [
        ("mai@orchid.shop", "wrong-password"),
        ("nobody@orchid.shop", PASSWORD),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_CREDENTIALS");
    }

    assert!(ctx.tokens.all().await.is_empty());
}

#[actix_web::test]
async fn test_login_validates_body() {
    let ctx = setup();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "not-an-email", "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"].get("email").is_some());
    assert!(body["details"].get("password").is_some());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"email\":")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[actix_web::test]
async fn test_mobile_flag_from_user_agent_and_body() {
    let ctx = setup();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::USER_AGENT, "OrchidShop/2.1 (Android 14; Mobile)"))
        .set_json(json!({ "email": "mai@orchid.shop", "password": PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["token"]["is_mobile"], true);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header((header::USER_AGENT, "OrchidShop/2.1 (Android 14; Mobile)"))
        .set_json(json!({
            "email": "mai@orchid.shop",
            "password": PASSWORD,
            "is_mobile": false
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["token"]["is_mobile"], false);
}

#[actix_web::test]
async fn test_fourth_login_evicts_oldest_session() {
    let ctx = setup();
    let app = init_app!(ctx);

    let first = login!(app, "mai@orchid.shop");
    for _ in 0..3 {
        login!(app, "mai@orchid.shop");
    }

    assert_eq!(ctx.tokens.all().await.len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&first))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_NOT_FOUND");
}

#[actix_web::test]
async fn test_me_returns_current_session() {
    let ctx = setup();
    let app = init_app!(ctx);
    let token = login!(app, "linh@orchid.shop");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["account"]["id"], ctx.linh.id.to_string());
    assert_eq!(body["data"]["token"]["id"], token["id"]);
}

#[actix_web::test]
async fn test_protected_routes_require_bearer() {
    let ctx = setup();
    let app = init_app!(ctx);

    let requests = [
        test::TestRequest::get().uri("/api/v1/auth/me").to_request(),
        test::TestRequest::post().uri("/api/v1/auth/logout").to_request(),
        test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": "whatever" }))
            .to_request(),
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
            .to_request(),
    ];

    for req in requests {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn test_refresh_rotates_values() {
    let ctx = setup();
    let app = init_app!(ctx);
    let token = login!(app, "mai@orchid.shop");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(bearer(&token))
        .set_json(json!({ "refresh_token": token["refresh_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let refreshed = &body["data"];
    assert_eq!(refreshed["id"], token["id"]);
    assert_ne!(refreshed["access_token"], token["access_token"]);
    assert_ne!(refreshed["refresh_token"], token["refresh_token"]);

    // The old access value is gone, the new one works
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(refreshed))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // A rotated refresh value cannot be replayed
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(bearer(refreshed))
        .set_json(json!({ "refresh_token": token["refresh_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_NOT_FOUND");
}

#[actix_web::test]
async fn test_refresh_accepts_lapsed_access_value() {
    let ctx = setup();
    let app = init_app!(ctx);
    let token = login!(app, "mai@orchid.shop");
    ctx.advance(ACCESS_TTL + 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(bearer(&token))
        .set_json(json!({ "refresh_token": token["refresh_token"] }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_refresh_with_expired_refresh_value_deletes_token() {
    let ctx = setup();
    let app = init_app!(ctx);
    let token = login!(app, "mai@orchid.shop");
    ctx.advance(ACCESS_TTL * 10);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(bearer(&token))
        .set_json(json!({ "refresh_token": token["refresh_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_EXPIRED");
    assert!(ctx.tokens.all().await.is_empty());
}

#[actix_web::test]
async fn test_refresh_of_foreign_token_is_forbidden() {
    let ctx = setup();
    let app = init_app!(ctx);
    let mai = login!(app, "mai@orchid.shop");
    let linh = login!(app, "linh@orchid.shop");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .insert_header(bearer(&linh))
        .set_json(json!({ "refresh_token": mai["refresh_token"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_OWNERSHIP_MISMATCH");
}

#[actix_web::test]
async fn test_logout_revokes_only_presented_token() {
    let ctx = setup();
    let app = init_app!(ctx);
    let phone = login!(app, "mai@orchid.shop");
    let laptop = login!(app, "mai@orchid.shop");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&phone))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logged out successfully");
    assert!(body["data"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&phone))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TOKEN_REVOKED");

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&phone))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(bearer(&laptop))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Revoked rows stay until evicted or swept
    assert_eq!(ctx.tokens.all().await.len(), 2);
}

#[actix_web::test]
async fn test_health_and_unknown_route() {
    let ctx = setup();
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "orchid_api");

    let req = test::TestRequest::get().uri("/api/v1/nowhere").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
