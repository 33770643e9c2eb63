#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, read_body_json, TestRequest};
use common::fixtures::{TestContext, TEST_PASSWORD};
use serde_json::{json, Value};
use shield_backend::helper::session_helpers::SessionIssuer;
use shield_backend::models::account_models::AccountChanges;
use shield_backend::models::db_operations::accounts_db_operations as accounts_db;
use shield_backend::models::Role;

fn news_payload() -> Value {
    json!({
        "title": "Scholarship drive",
        "content": "Applications for the scholarship drive are now open.",
    })
}

#[actix_rt::test]
async fn test_login_returns_usable_token() {
    let ctx = TestContext::new();
    let account = ctx.create_account("asha", Role::Admin);
    let app = init_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/login")
            .set_json(json!({ "username": "asha", "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"], account.id.as_str());
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["last_login"].is_string());
    assert!(body["user"].get("password_hash").is_none());

    let token = body["token"].as_str().unwrap();
    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = read_body_json(resp).await;
    assert_eq!(me["username"], "asha");
}

#[actix_rt::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.create_account("asha", Role::Admin);
    let app = init_app!(ctx);

    let mut bodies = Vec::new();
    for (username, password) in [("asha", "wrong-password"), ("ghost", TEST_PASSWORD)] {
        let resp = call_service(
            &app,
            TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = read_body_json(resp).await;
        bodies.push(body);
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["detail"], "Invalid credentials");
}

#[actix_rt::test]
async fn test_admin_routes_require_a_valid_token() {
    let ctx = TestContext::new();
    let app = init_app!(ctx);

    let resp = call_service(&app, TestRequest::get().uri("/api/admin/news").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/news")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn test_expired_token_is_rejected() {
    let ctx = TestContext::new();
    let account = ctx.create_account("asha", Role::Admin);
    let app = init_app!(ctx);

    let stale_issuer = SessionIssuer::new(&[9u8; 64], -5, 4).unwrap();
    let token = stale_issuer.issue_token(&account.id, &account.username, account.role).unwrap();

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_deactivated_account_loses_access() {
    let ctx = TestContext::new();
    let (account, bearer) = ctx.login_as("asha", Role::Editor);
    let app = init_app!(ctx);

    {
        let conn = ctx.pool.get().unwrap();
        let changes = AccountChanges {
            is_active: Some(false),
            ..Default::default()
        };
        accounts_db::update_account(&conn, &account.id, &changes).unwrap();
    }

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/news")
            .insert_header(("Authorization", bearer))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_token_does_not_carry_over_to_a_reused_username() {
    let ctx = TestContext::new();
    let (account, old_bearer) = ctx.login_as("asha", Role::Admin);
    let app = init_app!(ctx);

    {
        let conn = ctx.pool.get().unwrap();
        accounts_db::delete_account_keeping_super_admin(&conn, &account.id).unwrap();
    }
    let (_, new_bearer) = ctx.login_as("asha", Role::Viewer);

    let me = |bearer: String| {
        TestRequest::get()
            .uri("/api/admin/me")
            .insert_header(("Authorization", bearer))
            .to_request()
    };
    assert_eq!(call_service(&app, me(old_bearer)).await.status(), StatusCode::UNAUTHORIZED);

    let resp = call_service(&app, me(new_bearer)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["role"], "viewer");
}

#[actix_rt::test]
async fn test_viewer_can_read_but_not_write() {
    let ctx = TestContext::new();
    let (_, viewer) = ctx.login_as("vera", Role::Viewer);
    let (_, editor) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/news")
            .insert_header(("Authorization", viewer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/news")
            .insert_header(("Authorization", viewer.clone()))
            .set_json(news_payload())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["detail"], "Not enough permissions");

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/database/stats")
            .insert_header(("Authorization", viewer))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/news")
            .insert_header(("Authorization", editor))
            .set_json(news_payload())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "News article created successfully!");
}
