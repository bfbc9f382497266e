mod common;

use common::{client_payload, error_kind, TestApp};
use serde_json::{json, Value};
use uuid::Uuid;

fn voucher_payload(client_id: &str, operation_number: &str) -> Value {
    json!({
        "client_id": client_id,
        "operation_number": operation_number,
        "amount": "120",
        "payment_date": "2024-01-20",
        "period_from": "2024-01",
        "method": "transfer",
        "file_name": "voucher.jpg",
        "mime_type": "image/jpeg",
        "size_bytes": 204800
    })
}

#[tokio::test]
async fn voucher_submission_and_single_review() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000001")).await;
    let client_id = client["client_id"].as_str().unwrap();

    let response = app
        .post(
            "/vouchers",
            app.admin_id,
            "admin",
            voucher_payload(client_id, "00123456"),
        )
        .await;
    assert_eq!(response.status(), 201);
    let voucher: Value = response.json().await.unwrap();
    assert_eq!(voucher["status"], "pending");
    let voucher_id = voucher["voucher_id"].as_str().unwrap();

    // Collectors cannot review.
    let response = app
        .post(
            &format!("/vouchers/{}/review", voucher_id),
            Uuid::new_v4(),
            "collector",
            json!({ "decision": "approved" }),
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .post(
            &format!("/vouchers/{}/review", voucher_id),
            app.admin_id,
            "admin",
            json!({ "decision": "approved", "comments": "matches bank statement" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let reviewed: Value = response.json().await.unwrap();
    assert_eq!(reviewed["status"], "approved");
    assert_eq!(reviewed["reviewed_by"], app.admin_id.to_string());

    // Approving a voucher drives no payment transition by itself.
    let response = app
        .get(
            &format!("/payments?client_id={}", client_id),
            app.admin_id,
            "admin",
        )
        .await;
    let payments: Value = response.json().await.unwrap();
    assert!(payments.as_array().unwrap().is_empty());

    // A voucher is reviewed exactly once.
    let response = app
        .post(
            &format!("/vouchers/{}/review", voucher_id),
            app.admin_id,
            "admin",
            json!({ "decision": "rejected" }),
        )
        .await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_kind(&body), "invalid_state");
}

#[tokio::test]
async fn duplicate_operation_numbers_conflict() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000002")).await;
    let client_id = client["client_id"].as_str().unwrap();

    let response = app
        .post(
            "/vouchers",
            app.admin_id,
            "admin",
            voucher_payload(client_id, "987654321"),
        )
        .await;
    assert_eq!(response.status(), 201);

    let mut second = voucher_payload(client_id, "987654321");
    second["file_name"] = json!("other.png");
    second["mime_type"] = json!("image/png");
    let response = app.post("/vouchers", app.admin_id, "admin", second).await;
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(error_kind(&body), "conflict");
}

#[tokio::test]
async fn rejects_malformed_operation_numbers_and_files() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000003")).await;
    let client_id = client["client_id"].as_str().unwrap();

    // Non-digit characters.
    let response = app
        .post(
            "/vouchers",
            app.admin_id,
            "admin",
            voucher_payload(client_id, "12ab5678"),
        )
        .await;
    assert_eq!(response.status(), 400);

    // Too short (caught by request validation).
    let response = app
        .post(
            "/vouchers",
            app.admin_id,
            "admin",
            voucher_payload(client_id, "12345"),
        )
        .await;
    assert_eq!(response.status(), 422);

    // Oversized file.
    let mut oversized = voucher_payload(client_id, "11112222");
    oversized["size_bytes"] = json!(11 * 1024 * 1024);
    let response = app.post("/vouchers", app.admin_id, "admin", oversized).await;
    assert_eq!(response.status(), 400);

    // Unsupported mime type.
    let mut bad_mime = voucher_payload(client_id, "11113333");
    bad_mime["mime_type"] = json!("application/zip");
    let response = app.post("/vouchers", app.admin_id, "admin", bad_mime).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn clients_submit_only_for_themselves_and_see_only_their_own() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000004")).await;
    let client_id = client["client_id"].as_str().unwrap();
    let client_uuid: Uuid = client_id.parse().unwrap();

    // Another identity cannot submit on this client's behalf.
    let response = app
        .post(
            "/vouchers",
            Uuid::new_v4(),
            "client",
            voucher_payload(client_id, "44445555"),
        )
        .await;
    assert_eq!(response.status(), 403);

    // The client itself can.
    let response = app
        .post(
            "/vouchers",
            client_uuid,
            "client",
            voucher_payload(client_id, "44445555"),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app.get("/vouchers", client_uuid, "client").await;
    let vouchers: Value = response.json().await.unwrap();
    assert_eq!(vouchers.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn multi_month_periods_are_accepted() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000005")).await;
    let client_id = client["client_id"].as_str().unwrap();

    let mut payload = voucher_payload(client_id, "55556666");
    payload["period_to"] = json!("2024-03");
    payload["amount"] = json!("360");
    let response = app.post("/vouchers", app.admin_id, "admin", payload).await;
    assert_eq!(response.status(), 201);
    let voucher: Value = response.json().await.unwrap();
    assert_eq!(voucher["period"]["from"], "2024-01");
    assert_eq!(voucher["period"]["to"], "2024-03");

    // Inverted ranges are rejected.
    let mut inverted = voucher_payload(client_id, "55557777");
    inverted["period_from"] = json!("2024-05");
    inverted["period_to"] = json!("2024-02");
    let response = app.post("/vouchers", app.admin_id, "admin", inverted).await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn deletion_is_an_admin_override() {
    let app = TestApp::spawn().await;
    let client = app.create_client_record(client_payload("30000006")).await;
    let client_id = client["client_id"].as_str().unwrap();

    let response = app
        .post(
            "/vouchers",
            app.admin_id,
            "admin",
            voucher_payload(client_id, "66667777"),
        )
        .await;
    let voucher: Value = response.json().await.unwrap();
    let voucher_id = voucher["voucher_id"].as_str().unwrap();

    let response = app
        .delete(
            &format!("/vouchers/{}", voucher_id),
            app.admin_id,
            "subadmin",
        )
        .await;
    assert_eq!(response.status(), 403);

    let response = app
        .delete(&format!("/vouchers/{}", voucher_id), app.admin_id, "admin")
        .await;
    assert_eq!(response.status(), 204);
}
