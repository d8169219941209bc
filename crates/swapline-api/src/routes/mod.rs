//! API route handlers

pub mod health;
pub mod quote;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/pools", get(quote::get_pools))
        .route("/quote", post(quote::get_quote))
        .route("/routes", post(quote::get_routes))
        .with_state(state)
}
