//! Administrative surface. Routed but not implemented: every endpoint
//! answers `501` and performs no access control or mutation.

use axum::{
    routing::{get, put},
    Router,
};

use crate::{errors::AppError, state::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin", get(not_implemented).post(not_implemented))
        .route("/api/admin/:id", put(not_implemented))
}

async fn not_implemented() -> AppError {
    AppError::NotImplemented("admin endpoints are not implemented".into())
}
