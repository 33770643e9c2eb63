#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{call_service, read_body_json, TestRequest};
use common::fixtures::TestContext;
use serde_json::{json, Value};
use shield_backend::models::Role;

#[actix_rt::test]
async fn test_drafts_stay_hidden_until_published() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    let resp = call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/blogs")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({
                "title": "Winter health camp",
                "content": "<p>Free checkups for seniors</p><script>alert(1)</script>",
                "tags": ["health"],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let public: Value = read_body_json(call_service(&app, TestRequest::get().uri("/api/blogs").to_request()).await).await;
    assert!(public.as_array().unwrap().is_empty());

    let admin: Value = read_body_json(
        call_service(
            &app,
            TestRequest::get()
                .uri("/api/admin/blogs")
                .insert_header(("Authorization", bearer.clone()))
                .to_request(),
        )
        .await,
    )
    .await;
    let draft = &admin[0];
    assert_eq!(draft["status"], "draft");
    assert_eq!(draft["author"], "eddie");
    assert!(!draft["content"].as_str().unwrap().contains("<script>"));

    let id = draft["id"].as_str().unwrap().to_string();
    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/admin/blogs/{}", id))
            .insert_header(("Authorization", bearer))
            .set_json(json!({ "status": "published" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let public: Value = read_body_json(call_service(&app, TestRequest::get().uri("/api/blogs").to_request()).await).await;
    assert_eq!(public[0]["id"], id.as_str());
    assert_eq!(public[0]["title"], "Winter health camp");

    let single: Value = read_body_json(
        call_service(&app, TestRequest::get().uri(&format!("/api/blogs/{}", id)).to_request()).await,
    )
    .await;
    assert_eq!(single["category"], "General");
}

#[actix_rt::test]
async fn test_partial_update_keeps_other_fields() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/gallery-items")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({
                "title": "Graduation day",
                "description": "Certificates for the spring batch",
                "image": "https://example.org/graduation.jpg",
                "category": "Events",
                "date": "2024-02-01",
                "order": 2
            }))
            .to_request(),
    )
    .await;

    let list_admin = || {
        TestRequest::get()
            .uri("/api/admin/gallery-items")
            .insert_header(("Authorization", bearer.clone()))
            .to_request()
    };
    let before: Value = read_body_json(call_service(&app, list_admin()).await).await;
    let item = before["items"][0].clone();
    let id = item["id"].as_str().unwrap();

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/admin/gallery-items/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "title": "Graduation ceremony", "description": null }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["message"], "Gallery item updated successfully!");

    let after: Value = read_body_json(call_service(&app, list_admin()).await).await;
    let updated = &after["items"][0];
    assert_eq!(updated["title"], "Graduation ceremony");
    assert_eq!(updated["description"], item["description"]);
    assert_eq!(updated["category"], "Events");
    assert_eq!(updated["order"], 2);
    assert_eq!(updated["type"], "image");
    assert_eq!(updated["created_at"], item["created_at"]);
    assert_ne!(updated["updated_at"], item["updated_at"]);
}

#[actix_rt::test]
async fn test_update_and_delete_of_missing_ids() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);
    let missing = uuid::Uuid::new_v4();

    let resp = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/admin/success-stories/{}", missing))
            .insert_header(("Authorization", bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = read_body_json(resp).await;
    assert_eq!(body["detail"], "Success story not found");

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/admin/leadership-team/{}", missing))
            .insert_header(("Authorization", bearer))
            .set_json(json!({ "order": 3 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_delete_removes_item_once() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    call_service(
        &app,
        TestRequest::post()
            .uri("/api/admin/success-stories")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({
                "name": "Priya Sharma",
                "story": "Completed the digital marketing course and joined a startup.",
                "program": "Youth Skilling"
            }))
            .to_request(),
    )
    .await;

    let public: Value =
        read_body_json(call_service(&app, TestRequest::get().uri("/api/success-stories").to_request()).await).await;
    let id = public["stories"][0]["id"].as_str().unwrap().to_string();

    let delete = || {
        TestRequest::delete()
            .uri(&format!("/api/admin/success-stories/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .to_request()
    };
    assert_eq!(call_service(&app, delete()).await.status(), StatusCode::OK);
    assert_eq!(call_service(&app, delete()).await.status(), StatusCode::NOT_FOUND);

    let public: Value =
        read_body_json(call_service(&app, TestRequest::get().uri("/api/success-stories").to_request()).await).await;
    assert_eq!(public, json!({ "stories": [] }));
}

#[actix_rt::test]
async fn test_page_sections_are_scoped_by_page() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    for (page, section, active) in [("about", "mission", true), ("about", "archive", false), ("home", "hero", true)] {
        let resp = call_service(
            &app,
            TestRequest::post()
                .uri("/api/admin/page-sections")
                .insert_header(("Authorization", bearer.clone()))
                .set_json(json!({
                    "page": page,
                    "section": section,
                    "content": { "blocks": [{ "kind": "text", "body": section }] },
                    "is_active": active
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let public: Value = read_body_json(
        call_service(&app, TestRequest::get().uri("/api/page-sections/about").to_request()).await,
    )
    .await;
    let sections = public["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["section"], "mission");
    assert_eq!(sections[0]["content"]["blocks"][0]["body"], "mission");

    let admin: Value = read_body_json(
        call_service(
            &app,
            TestRequest::get()
                .uri("/api/admin/page-sections/about")
                .insert_header(("Authorization", bearer))
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(admin["sections"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_impact_stats_updates_merge() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("root", Role::SuperAdmin);
    let app = init_app!(ctx);

    for patch in [json!({ "youth_trained": 1500 }), json!({ "women_empowered": 320, "youth_placed": 1100 })] {
        let resp = call_service(
            &app,
            TestRequest::put()
                .uri("/api/admin/impact-stats")
                .insert_header(("Authorization", bearer.clone()))
                .set_json(patch)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let stats: Value =
        read_body_json(call_service(&app, TestRequest::get().uri("/api/impact-stats").to_request()).await).await;
    assert_eq!(
        stats,
        json!({
            "youthTrained": 1500,
            "youthPlaced": 1100,
            "seniorsSupported": 6000,
            "womenEmpowered": 320
        })
    );

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri("/api/admin/impact-stats")
            .insert_header(("Authorization", bearer))
            .set_json(json!({ "youth_trained": -4 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_site_settings_reject_bad_colors() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    let put = |body: Value| {
        TestRequest::put()
            .uri("/api/admin/site-settings")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(body)
            .to_request()
    };

    let resp = call_service(&app, put(json!({ "primary_color": "blue" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call_service(&app, put(json!({ "primary_color": "#0F766E", "facebook_url": "https://facebook.com/shield" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let settings: Value =
        read_body_json(call_service(&app, TestRequest::get().uri("/api/site-settings").to_request()).await).await;
    assert_eq!(settings["primary_color"], "#0F766E");
    assert_eq!(settings["secondary_color"], "#eab308");
    assert_eq!(settings["facebook_url"], "https://facebook.com/shield");
}

#[actix_rt::test]
async fn test_contact_info_merges_into_site_content() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    call_service(
        &app,
        TestRequest::put()
            .uri("/api/admin/site-content")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "content": { "home": { "title": "Adding Life to Years" } } }))
            .to_request(),
    )
    .await;

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri("/api/admin/contact-info")
            .insert_header(("Authorization", bearer))
            .set_json(json!({ "phone": "+91 22 1234 5678" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content: Value =
        read_body_json(call_service(&app, TestRequest::get().uri("/api/site-content").to_request()).await).await;
    assert_eq!(content["content"]["home"]["title"], "Adding Life to Years");
    assert_eq!(content["content"]["contact"]["contactInfo"]["phone"], "+91 22 1234 5678");
}

#[actix_rt::test]
async fn test_contact_triage() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    call_service(
        &app,
        TestRequest::post()
            .uri("/api/contact")
            .set_json(json!({
                "name": "Ravi",
                "email": "ravi@example.org",
                "subject": "Volunteering",
                "message": "Can I volunteer on weekends only?"
            }))
            .to_request(),
    )
    .await;

    let list = || {
        TestRequest::get()
            .uri("/api/admin/contacts")
            .insert_header(("Authorization", bearer.clone()))
            .to_request()
    };
    let contacts: Value = read_body_json(call_service(&app, list()).await).await;
    let id = contacts[0]["id"].as_str().unwrap().to_string();

    let resp = call_service(
        &app,
        TestRequest::put()
            .uri(&format!("/api/admin/contacts/{}/status", id))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "status": "in_progress" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let contacts: Value = read_body_json(call_service(&app, list()).await).await;
    assert_eq!(contacts[0]["status"], "in_progress");

    let resp = call_service(
        &app,
        TestRequest::delete()
            .uri(&format!("/api/admin/contacts/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let contacts: Value = read_body_json(call_service(&app, list()).await).await;
    assert!(contacts.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_inactive_items_stay_out_of_public_listings() {
    let ctx = TestContext::new();
    let (_, bearer) = ctx.login_as("eddie", Role::Editor);
    let app = init_app!(ctx);

    let families = [
        (
            "gallery-items",
            "items",
            json!({ "title": "Archived camp photo", "image": "/images/gallery/camp.jpg", "is_active": false }),
        ),
        (
            "leadership-team",
            "members",
            json!({ "name": "Former Trustee", "role": "Trustee", "is_active": false }),
        ),
        (
            "success-stories",
            "stories",
            json!({ "name": "Kavya", "story": "Finished the tailoring course last spring.", "is_active": false }),
        ),
    ];

    for (path, key, payload) in families {
        let resp = call_service(
            &app,
            TestRequest::post()
                .uri(&format!("/api/admin/{}", path))
                .insert_header(("Authorization", bearer.clone()))
                .set_json(payload)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK, "creating {}", path);

        let public: Value =
            read_body_json(call_service(&app, TestRequest::get().uri(&format!("/api/{}", path)).to_request()).await)
                .await;
        assert_eq!(public, json!({ key: [] }), "public {}", path);

        let admin: Value = read_body_json(
            call_service(
                &app,
                TestRequest::get()
                    .uri(&format!("/api/admin/{}", path))
                    .insert_header(("Authorization", bearer.clone()))
                    .to_request(),
            )
            .await,
        )
        .await;
        let listed = admin[key].as_array().unwrap();
        assert_eq!(listed.len(), 1, "admin {}", path);
        assert_eq!(listed[0]["is_active"], false);
    }
}
