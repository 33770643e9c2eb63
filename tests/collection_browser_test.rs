#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, read_body_json, TestRequest};
use common::fixtures::TestContext;
use serde_json::{json, Value};
use shield_backend::models::Role;

macro_rules! subscribe {
    ($app:expr, $email:expr) => {{
        let resp = call_service(
            &$app,
            TestRequest::post()
                .uri("/api/newsletter/subscribe")
                .set_json(json!({ "email": $email }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }};
}

#[actix_rt::test]
async fn test_stats_and_collections_cover_both_stores() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("asha", Role::Admin);
    let app = init_app!(ctx);
    for email in ["one@example.org", "two@example.org"] {
        subscribe!(app, email);
    }

    let stats: Value = read_body_json(
        call_service(
            &app,
            TestRequest::get()
                .uri("/api/admin/database/stats")
                .insert_header(("Authorization", bearer.clone()))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(stats["total_collections"], 14);
    assert_eq!(stats["total_documents"], 3);
    assert_eq!(stats["collection_stats"][0]["collection"], "newsletters");
    assert_eq!(stats["collection_stats"][0]["count"], 2);
    assert!(stats["collection_stats"][0]["size"].as_u64().unwrap() > 0);

    let overview: Value = read_body_json(
        call_service(
            &app,
            TestRequest::get()
                .uri("/api/admin/database/collections")
                .insert_header(("Authorization", bearer))
                .to_request(),
        )
        .await,
    )
    .await;
    let collections = overview["collections"].as_array().unwrap();
    let accounts = collections.iter().find(|c| c["collection"] == "admin_users").unwrap();
    assert_eq!(accounts["count"], 1);
    assert_eq!(accounts["name"], "Admin Users");
}

#[actix_rt::test]
async fn test_browse_pages_raw_documents() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("asha", Role::Admin);
    let app = init_app!(ctx);
    for email in ["a@example.org", "b@example.org", "c@example.org"] {
        subscribe!(app, email);
    }

    let browse = |uri: &str| {
        TestRequest::get()
            .uri(uri)
            .insert_header(("Authorization", bearer.clone()))
            .to_request()
    };

    let page: Value =
        read_body_json(call_service(&app, browse("/api/admin/database/newsletters?limit=2")).await).await;
    assert_eq!(page["total_count"], 3);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["has_more"], true);
    assert_eq!(page["documents"].as_array().unwrap().len(), 2);
    assert!(page["documents"][0]["_id"].is_string());

    let page: Value =
        read_body_json(call_service(&app, browse("/api/admin/database/newsletters?limit=5000&skip=2")).await).await;
    assert_eq!(page["limit"], 500);
    assert_eq!(page["has_more"], false);
    assert_eq!(page["documents"].as_array().unwrap().len(), 1);

    let page: Value = read_body_json(call_service(&app, browse("/api/admin/database/admin_users")).await).await;
    assert_eq!(page["documents"][0]["username"], "asha");
    assert!(page["documents"][0].get("password_hash").is_none());

    let resp = call_service(&app, browse("/api/admin/database/not_a_collection")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["detail"], "Collection 'not_a_collection' not found");
}

#[actix_rt::test]
async fn test_browser_deletes_documents_but_not_accounts() {
    let ctx = TestContext::new();
    let (admin, bearer) = ctx.login_as("asha", Role::Admin);
    let app = init_app!(ctx);
    subscribe!(app, "gone@example.org");

    let delete = |uri: String| {
        TestRequest::delete()
            .uri(&uri)
            .insert_header(("Authorization", bearer.clone()))
            .to_request()
    };

    let resp = call_service(&app, delete(format!("/api/admin/database/admin_users/{}", admin.id))).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let page: Value = read_body_json(
        call_service(
            &app,
            TestRequest::get()
                .uri("/api/admin/database/newsletters")
                .insert_header(("Authorization", bearer.clone()))
                .to_request(),
        )
        .await,
    )
    .await;
    let id = page["documents"][0]["id"].as_str().unwrap().to_string();

    let resp = call_service(&app, delete(format!("/api/admin/database/newsletters/{}", id))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Document deleted successfully!");

    let resp = call_service(&app, delete(format!("/api/admin/database/newsletters/{}", id))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_viewer_cannot_browse() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("vera", Role::Viewer);
    let app = init_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::get()
            .uri("/api/admin/database/collections")
            .insert_header(("Authorization", bearer))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
