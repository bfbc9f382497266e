//! Test helper module for collections-service integration tests.

#![allow(dead_code)]

use collections_service::config::{Config, LedgerConfig, ServerConfig};
use collections_service::Application;
use serde_json::{json, Value};
use uuid::Uuid;

/// Test application wrapper driving the HTTP API with an in-memory ledger.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub admin_id: Uuid,
}

impl TestApp {
    /// Spawn a new test application on a random port.
    pub async fn spawn() -> Self {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            ledger: LedgerConfig { path: None },
            service_name: "collections-service-test".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let port = app.port();
        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the server to accept requests.
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            client,
            admin_id: Uuid::new_v4(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post(
        &self,
        path: &str,
        actor_id: Uuid,
        role: &str,
        body: Value,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("X-User-Id", actor_id.to_string())
            .header("X-User-Role", role)
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn put(
        &self,
        path: &str,
        actor_id: Uuid,
        role: &str,
        body: Value,
    ) -> reqwest::Response {
        self.client
            .put(self.url(path))
            .header("X-User-Id", actor_id.to_string())
            .header("X-User-Role", role)
            .json(&body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn get(&self, path: &str, actor_id: Uuid, role: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("X-User-Id", actor_id.to_string())
            .header("X-User-Role", role)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, path: &str, actor_id: Uuid, role: &str) -> reqwest::Response {
        self.client
            .delete(self.url(path))
            .header("X-User-Id", actor_id.to_string())
            .header("X-User-Role", role)
            .send()
            .await
            .expect("request failed")
    }

    /// Onboard a client as admin; panics unless created. Returns the body.
    pub async fn create_client_record(&self, body: Value) -> Value {
        let response = self.post("/clients", self.admin_id, "admin", body).await;
        assert_eq!(response.status(), 201, "client onboarding should succeed");
        response.json().await.expect("invalid client body")
    }

    /// Generate debts for a month as admin; panics on failure.
    pub async fn generate_debts(&self, year: i32, month: u32) -> Value {
        let response = self
            .post(
                "/billing/generate",
                self.admin_id,
                "admin",
                json!({ "year": year, "month": month }),
            )
            .await;
        assert_eq!(response.status(), 201, "debt generation should succeed");
        response.json().await.expect("invalid generation body")
    }

    /// The unique payment id for (client, month), via the admin listing.
    pub async fn payment_id_for(&self, client_id: &str, month: &str) -> String {
        let response = self
            .get(
                &format!("/payments?client_id={}&month={}", client_id, month),
                self.admin_id,
                "admin",
            )
            .await;
        assert_eq!(response.status(), 200);
        let payments: Value = response.json().await.expect("invalid payments body");
        payments[0]["payment_id"]
            .as_str()
            .expect("payment not found")
            .to_string()
    }
}

/// A baseline onboarding payload; override fields per test.
pub fn client_payload(national_id: &str) -> Value {
    json!({
        "full_name": "Maria Torres",
        "national_id": national_id,
        "plan": "premium",
        "billing_type": "normal",
        "preferred_payment_day": 15,
        "installation_date": "2024-01-01"
    })
}

/// Machine-readable error kind from a structured decline.
pub fn error_kind(body: &Value) -> &str {
    body["error"].as_str().unwrap_or("")
}
