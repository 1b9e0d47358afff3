//! 路由模块

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/users", get(handlers::list_users))
        .route("/testdb", get(handlers::test_db))
        .route("/api/health", get(handlers::health_check))
}
