mod common;

use common::{error_kind, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

fn request_payload(work_date: &str) -> Value {
    json!({
        "work_date": work_date,
        "requested": { "cash": "200", "yape": "50", "plin": "0", "transfer": "0" },
        "notes": "market day"
    })
}

#[tokio::test]
async fn request_lifecycle_approve_then_close() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-04"),
        )
        .await;
    assert_eq!(response.status(), 201);
    let request: Value = response.json().await.unwrap();
    assert_eq!(request["status"], "pending");
    let request_id = request["request_id"].as_str().unwrap();

    // Collectors cannot approve, not even their own request.
    let response = app
        .post(
            &format!("/cashbox-requests/{}/approve", request_id),
            collector,
            "collector",
            json!({}),
        )
        .await;
    assert_eq!(response.status(), 403);

    // Closing before approval is illegal.
    let response = app
        .post(
            &format!("/cashbox-requests/{}/close", request_id),
            collector,
            "collector",
            json!({ "closing": { "cash": "540", "yape": "130", "plin": "0", "transfer": "0" } }),
        )
        .await;
    assert_eq!(response.status(), 409);

    let response = app
        .post(
            &format!("/cashbox-requests/{}/approve", request_id),
            app.admin_id,
            "subadmin",
            json!({}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let approved: Value = response.json().await.unwrap();
    assert_eq!(approved["status"], "approved");
    assert_eq!(approved["approved_by"], app.admin_id.to_string());

    let response = app
        .post(
            &format!("/cashbox-requests/{}/close", request_id),
            collector,
            "collector",
            json!({ "closing": { "cash": "540", "yape": "130", "plin": "0", "transfer": "0" } }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let closed: Value = response.json().await.unwrap();
    assert_eq!(closed["status"], "closed");
    assert_eq!(closed["closing"]["cash"], "540");

    // Closing twice fails.
    let response = app
        .post(
            &format!("/cashbox-requests/{}/close", request_id),
            collector,
            "collector",
            json!({ "closing": { "cash": "540", "yape": "130", "plin": "0", "transfer": "0" } }),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_kind(&body), "invalid_state");
}

#[tokio::test]
async fn one_pending_request_per_collector_and_work_date() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-05"),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-05"),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_kind(&body), "conflict");

    // A different work date is fine.
    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-06"),
        )
        .await;
    assert_eq!(response.status(), 201);

    // Another collector is independent.
    let response = app
        .post(
            "/cashbox-requests",
            Uuid::new_v4(),
            "collector",
            request_payload("2024-03-05"),
        )
        .await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn concurrent_duplicate_requests_admit_exactly_one() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    let (first, second) = tokio::join!(
        app.post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-07"),
        ),
        app.post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-07"),
        ),
    );

    let statuses = [first.status().as_u16(), second.status().as_u16()];
    assert!(
        statuses == [201, 409] || statuses == [409, 201],
        "expected exactly one success, got {:?}",
        statuses
    );
}

#[tokio::test]
async fn rejection_records_the_reason() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-08"),
        )
        .await;
    let request: Value = response.json().await.unwrap();
    let request_id = request["request_id"].as_str().unwrap();

    let response = app
        .post(
            &format!("/cashbox-requests/{}/reject", request_id),
            app.admin_id,
            "admin",
            json!({ "reason": "float too large" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let rejected: Value = response.json().await.unwrap();
    assert_eq!(rejected["status"], "rejected");
    assert_eq!(rejected["rejection_reason"], "float too large");

    // Approving a rejected request is illegal.
    let response = app
        .post(
            &format!("/cashbox-requests/{}/approve", request_id),
            app.admin_id,
            "admin",
            json!({}),
        )
        .await;
    assert_eq!(response.status(), 409);
}

#[tokio::test]
async fn only_the_requesting_collector_updates_a_pending_request() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    let response = app
        .post(
            "/cashbox-requests",
            collector,
            "collector",
            request_payload("2024-03-11"),
        )
        .await;
    let request: Value = response.json().await.unwrap();
    let request_id = request["request_id"].as_str().unwrap();

    let update = json!({ "requested": { "cash": "300", "yape": "0", "plin": "0", "transfer": "0" } });

    let response = app
        .put(
            &format!("/cashbox-requests/{}", request_id),
            Uuid::new_v4(),
            "collector",
            update.clone(),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .put(
            &format!("/cashbox-requests/{}", request_id),
            collector,
            "collector",
            update,
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["requested"]["cash"], "300");

    // The owner withdraws it while pending.
    let response = app
        .delete(
            &format!("/cashbox-requests/{}", request_id),
            collector,
            "collector",
        )
        .await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn collectors_list_only_their_own_requests() {
    let app = TestApp::spawn().await;
    let collector = Uuid::new_v4();

    app.post(
        "/cashbox-requests",
        collector,
        "collector",
        request_payload("2024-03-12"),
    )
    .await;
    app.post(
        "/cashbox-requests",
        Uuid::new_v4(),
        "collector",
        request_payload("2024-03-12"),
    )
    .await;

    let response = app.get("/cashbox-requests", collector, "collector").await;
    let requests: Value = response.json().await.unwrap();
    assert_eq!(requests.as_array().unwrap().len(), 1);

    let response = app.get("/cashbox-requests", app.admin_id, "admin").await;
    let requests: Value = response.json().await.unwrap();
    assert_eq!(requests.as_array().unwrap().len(), 2);
}
