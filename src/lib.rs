//! Custodia API Library
//!
//! Institutional asset management: item custody, assignment, return
//! inspection, maintenance, disposal and generic request workflows.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::ToSchema;

use crate::auth::{auth_middleware, AuthService};
use crate::errors::ServiceError;
use crate::handlers::AppServices;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: AppServices,
    pub auth: Arc<AuthService>,
    pub roles: Arc<auth::RoleRegistry>,
}

// Common response wrappers
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Standard result type for JSON handlers
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ServiceError>;

async fn liveness() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<Value>, ServiceError> {
    state.db.ping().await?;
    Ok(Json(json!({ "status": "ready" })))
}

/// Assemble the full application router.
pub fn app_router(state: AppState) -> Router {
    let auth_service = state.auth.clone();

    let protected = Router::new()
        // Items
        .route(
            "/items",
            get(handlers::items::list_items).post(handlers::items::create_item),
        )
        .route(
            "/items/:id",
            get(handlers::items::get_item)
                .put(handlers::items::update_item)
                .delete(handlers::items::delete_item),
        )
        .route("/items/:id/restore", post(handlers::items::restore_item))
        .route("/items/:id/qr", post(handlers::items::generate_qr))
        // Categories
        .route(
            "/categories",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        )
        .route(
            "/categories/:id/restore",
            post(handlers::categories::restore_category),
        )
        // Locations
        .route(
            "/locations",
            get(handlers::locations::list_locations).post(handlers::locations::create_location),
        )
        .route(
            "/locations/:id",
            get(handlers::locations::get_location)
                .put(handlers::locations::update_location)
                .delete(handlers::locations::delete_location),
        )
        // Assignments
        .route(
            "/assignments",
            get(handlers::assignments::list_assignments)
                .post(handlers::assignments::create_assignment),
        )
        .route("/assignments/:id", get(handlers::assignments::get_assignment))
        .route(
            "/assignments/:id/approve",
            post(handlers::assignments::approve_assignment),
        )
        .route(
            "/assignments/:id/activate",
            post(handlers::assignments::activate_assignment),
        )
        .route(
            "/assignments/:id/cancel",
            post(handlers::assignments::cancel_assignment),
        )
        .route(
            "/assignments/:id/return",
            post(handlers::assignments::return_assignment),
        )
        // Return inspections
        .route("/returns", get(handlers::returns::list_returns))
        .route("/returns/:id", get(handlers::returns::get_return))
        .route("/returns/:id/inspect", post(handlers::returns::inspect_return))
        .route("/returns/:id/approve", post(handlers::returns::approve_return))
        .route("/returns/:id/reject", post(handlers::returns::reject_return))
        // Disposals
        .route(
            "/disposals",
            get(handlers::disposals::list_disposals).post(handlers::disposals::create_disposal),
        )
        .route("/disposals/:id", get(handlers::disposals::get_disposal))
        .route(
            "/disposals/:id/approve",
            post(handlers::disposals::approve_disposal),
        )
        .route(
            "/disposals/:id/reject",
            post(handlers::disposals::reject_disposal),
        )
        .route(
            "/disposals/:id/execute",
            post(handlers::disposals::execute_disposal),
        )
        // Maintenance
        .route(
            "/maintenance",
            get(handlers::maintenance::list_maintenance)
                .post(handlers::maintenance::create_maintenance),
        )
        .route(
            "/maintenance/:id",
            get(handlers::maintenance::get_maintenance),
        )
        .route(
            "/maintenance/:id/schedule",
            post(handlers::maintenance::schedule_maintenance),
        )
        .route(
            "/maintenance/:id/start",
            post(handlers::maintenance::start_maintenance),
        )
        .route(
            "/maintenance/:id/complete",
            post(handlers::maintenance::complete_maintenance),
        )
        .route(
            "/maintenance/:id/cancel",
            post(handlers::maintenance::cancel_maintenance),
        )
        // Requests
        .route(
            "/requests",
            get(handlers::requests::list_requests).post(handlers::requests::submit_request),
        )
        .route(
            "/requests/:id",
            get(handlers::requests::get_request).put(handlers::requests::update_request),
        )
        .route("/requests/:id/review", post(handlers::requests::start_review))
        .route("/requests/:id/approve", post(handlers::requests::approve_request))
        .route("/requests/:id/reject", post(handlers::requests::reject_request))
        .route(
            "/requests/:id/request-changes",
            post(handlers::requests::request_changes),
        )
        .route(
            "/requests/:id/complete",
            post(handlers::requests::complete_request),
        )
        .route("/requests/:id/cancel", post(handlers::requests::cancel_request))
        .route(
            "/requests/:id/comments",
            get(handlers::requests::list_comments).post(handlers::requests::add_comment),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_service.clone(),
            auth_middleware,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(liveness))
        .route("/health/ready", get(readiness).with_state(state))
        .nest("/api/v1/auth", auth::auth_routes().with_state(auth_service))
        .nest("/api/v1", protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_response_rounds_pages_up() {
        let page: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn api_response_success_wraps_data() {
        let resp = ApiResponse::success(7);
        assert!(resp.success);
        assert_eq!(resp.data, Some(7));
    }
}
