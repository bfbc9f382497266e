//! Application startup and lifecycle management.

use crate::config::Config;
use crate::handlers::{billing, cashbox, clients, payments, vouchers};
use crate::services::store::LedgerStore;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use service_core::error::AppError;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: LedgerStore,
    pub config: Config,
}

/// Health check endpoint for liveness probes.
async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "collections-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint.
async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/clients", post(clients::create_client))
        .route("/clients/:id/deactivate", post(clients::deactivate_client))
        .route("/clients/:id/unpaid-months", get(clients::unpaid_months))
        .route("/clients/:id/advance-months", get(clients::advance_months))
        .route("/billing/generate", post(billing::generate_monthly_debts))
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_manual_payment),
        )
        .route("/payments/sweep-overdue", post(payments::sweep_overdue))
        .route("/payments/:id/collect", post(payments::collect_payment))
        .route("/payments/:id/validate", post(payments::validate_payment))
        .route("/payments/:id/finalize", post(payments::finalize_payment))
        .route(
            "/vouchers",
            get(vouchers::list_vouchers).post(vouchers::submit_voucher),
        )
        .route("/vouchers/:id/review", post(vouchers::review_voucher))
        .route("/vouchers/:id", delete(vouchers::delete_voucher))
        .route(
            "/cashbox-requests",
            get(cashbox::list_requests).post(cashbox::create_request),
        )
        .route("/cashbox-requests/:id/approve", post(cashbox::approve_request))
        .route("/cashbox-requests/:id/reject", post(cashbox::reject_request))
        .route("/cashbox-requests/:id/close", post(cashbox::close_request))
        .route(
            "/cashbox-requests/:id",
            put(cashbox::update_request).delete(cashbox::delete_request),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let store = match &config.ledger.path {
            Some(path) => LedgerStore::open(path.clone())?,
            None => {
                tracing::warn!("No ledger path configured - using in-memory ledger");
                LedgerStore::in_memory()
            }
        };

        let state = AppState {
            store,
            config: config.clone(),
        };

        // Port 0 binds a random port for testing.
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Collections service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get the application state for sharing with tests.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = api_router(self.state);
        axum::serve(self.listener, router).await
    }
}
