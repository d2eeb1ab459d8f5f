/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health, /authorize
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{authorize::authorize, health::health};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/authorize", post(authorize))
}
