//! HTTP tests for filing, reviewing and clearing complaints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use server_core::kernel::TestDependencies;

#[tokio::test]
async fn filed_complaint_can_be_listed_and_fetched() {
    let deps = TestDependencies::new();
    let student = deps.store.add_profile("Noor", "noor@campus.edu");
    let app = TestApp::new(deps);

    let res = app
        .post_json(
            "/complaints",
            json!({
                "student_id": student.to_string(),
                "title": "Broken heater in dorm B",
                "description": "Room 204 has had no heat since Monday",
                "category": "facilities",
                "image_urls": ["https://img.campus.edu/heater.jpg"],
            }),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["status"], "pending");
    assert_eq!(res.body["is_duplicate"], false);
    assert_eq!(res.body["duplicate_of"], serde_json::Value::Null);
    assert_eq!(res.body["student_name"], "Noor");
    let id = res.body["id"].as_str().unwrap().to_string();

    let listed = app.get("/complaints?status=all&category=facilities").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().unwrap().len(), 1);
    assert_eq!(listed.body[0]["student_email"], "noor@campus.edu");

    let fetched = app.get(&format!("/complaints/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["title"], "Broken heater in dorm B");
}

#[tokio::test]
async fn filing_validates_input() {
    let app = TestApp::new(TestDependencies::new());

    let res = app
        .post_json(
            "/complaints",
            json!({ "student_id": "nope", "title": "t", "description": "d", "category": "other" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .post_json(
            "/complaints",
            json!({
                "student_id": uuid::Uuid::new_v4().to_string(),
                "title": "t",
                "description": "",
                "category": "other",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "description is required");
}

#[tokio::test]
async fn admin_review_updates_status_and_notes() {
    let deps = TestDependencies::new();
    let id = deps.store.add_complaint(
        server_core::common::ProfileId::new(),
        "Projector flickers",
        "Room 12",
        server_core::domains::complaints::ComplaintCategory::Academic,
    );
    let app = TestApp::new(deps);
    let uri = format!("/complaints/{id}");

    let res = app
        .patch_json(&uri, json!({ "status": "resolved", "resolution_notes": "Bulb replaced" }))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "resolved");
    assert_eq!(res.body["resolution_notes"], "Bulb replaced");
    assert_eq!(res.body["student_name"], "Unknown");

    let res = app.patch_json(&uri, json!({ "status": "archived" })).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app.patch_json(&uri, json!({})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let res = app
        .patch_json(
            &format!("/complaints/{}", uuid::Uuid::new_v4()),
            json!({ "status": "closed" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let filtered = app.get("/complaints?status=resolved").await;
    assert_eq!(filtered.body.as_array().unwrap().len(), 1);
    let filtered = app.get("/complaints?status=pending").await;
    assert!(filtered.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn clearing_resolved_keeps_the_duplicate_invariant() {
    let deps = TestDependencies::new();
    let student = deps.store.add_profile("Eli", "eli@campus.edu");
    let category = server_core::domains::complaints::ComplaintCategory::Facilities;
    let original = deps.store.add_complaint(student, "Elevator stuck", "Library", category);
    let copy = deps.store.add_complaint(student, "Library elevator broken", "Again", category);
    let other = deps.store.add_complaint(student, "Cold showers", "Dorm A", category);
    let app = TestApp::new(deps);

    let res = app
        .post_json(
            "/functions/v1/mark-duplicate",
            json!({ "duplicateComplaintId": copy.to_string(), "originalComplaintId": original.to_string() }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    app.patch_json(&format!("/complaints/{original}"), json!({ "status": "resolved" }))
        .await;

    let res = app.post_json("/complaints/clear-resolved", json!({})).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!({ "cleared": 1 }));
    assert_eq!(
        app.get(&format!("/complaints/{original}")).await.status,
        StatusCode::NOT_FOUND
    );
    let survivor = app.get(&format!("/complaints/{copy}")).await;
    assert_eq!(survivor.body["is_duplicate"], false);
    assert_eq!(survivor.body["duplicate_of"], serde_json::Value::Null);
    assert_eq!(app.get(&format!("/complaints/{other}")).await.status, StatusCode::OK);
}

#[tokio::test]
async fn health_reflects_store_availability() {
    let app = TestApp::new(TestDependencies::new());

    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");

    app.deps.store.fail_reads(true);
    let res = app.get("/health").await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.body["database"]["status"], "error");
}
