//! HTTP API Layer
//!
//! This crate provides the JSON API for policy accounting using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for policies, contacts and health
//! - **Middleware**: Request ids, tracing, request logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(store, timezone));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod seed;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use core_kernel::Timezone;
use domain_billing::AccountingStore;

use crate::handlers::{contacts, health, policies};
use crate::middleware::request_logging_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountingStore>,
    pub timezone: Timezone,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountingStore>, timezone: Timezone) -> Self {
        Self { store, timezone }
    }
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Store handle and business timezone
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let policy_routes = Router::new()
        .route("/", post(policies::create_policy))
        .route("/by-number/:number", get(policies::get_policy_by_number))
        .route("/:id", get(policies::get_policy))
        .route("/:id/invoices", get(policies::list_invoices))
        .route("/:id/balance", get(policies::get_balance))
        .route("/:id/delinquency", get(policies::get_delinquency))
        .route(
            "/:id/payments",
            get(policies::list_payments).post(policies::make_payment),
        )
        .route("/:id/billing-schedule", put(policies::switch_billing_schedule))
        .route("/:id/cancel", post(policies::cancel_policy));

    let contact_routes = Router::new()
        .route("/", post(contacts::create_contact))
        .route("/:id", get(contacts::get_contact));

    let api_routes = Router::new()
        .nest("/policies", policy_routes)
        .nest("/contacts", contact_routes)
        .layer(axum_middleware::from_fn(request_logging_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
