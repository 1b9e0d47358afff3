//! Handler模块

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppError;
use common::models::UserRow;

use crate::service::{DbService, DbServiceTrait};
use crate::state::AppState;

/// 问候端点
#[utoipa::path(
    get,
    path = "/",
    tag = "greeting",
    responses(
        (status = 200, description = "静态问候消息", body = GreetingResponse)
    )
)]
pub async fn home(State(state): State<AppState>) -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: state.config.greeting.clone(),
    })
}

/// 用户列表端点
///
/// 每次调用都会确保 users 表存在、插入一条固定记录，
/// 然后返回全部行。数据库错误不在本地处理，直接以 500 上报。
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "全部用户记录，[id, name] 元组数组"),
        (status = 500, description = "数据库错误")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserRow>>, AppError> {
    let service = DbService::new(state.config.database.clone());
    let rows = service.insert_and_list().await?;
    Ok(Json(rows))
}

/// 数据库连通性探测端点
///
/// 无论成功失败都返回 200，错误只通过响应体上报，
/// 供运维在不影响进程的情况下验证连通性。
#[utoipa::path(
    get,
    path = "/testdb",
    tag = "health",
    responses(
        (status = 200, description = "探测结果", body = ProbeResponse)
    )
)]
pub async fn test_db(State(state): State<AppState>) -> Json<ProbeResponse> {
    let service = DbService::new(state.config.database.clone());
    match service.server_version().await {
        Ok(version) => Json(ProbeResponse::connected(version)),
        Err(e) => Json(ProbeResponse::error(e.to_string())),
    }
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 问候响应
#[derive(Serialize, ToSchema)]
pub struct GreetingResponse {
    /// 问候消息
    pub message: String,
}

/// 连通性探测结果
#[derive(Serialize, ToSchema)]
pub struct ProbeResponse {
    /// "connected" 或 "error"
    pub status: String,
    /// 数据库服务器版本（探测成功时）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 错误信息（探测失败时）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeResponse {
    /// 探测成功
    pub fn connected(version: String) -> Self {
        Self {
            status: "connected".to_string(),
            version: Some(version),
            message: None,
        }
    }

    /// 探测失败
    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            version: None,
            message: Some(message),
        }
    }
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_probe_serializes_status_and_version_only() {
        let json =
            serde_json::to_value(ProbeResponse::connected("PostgreSQL 16.2".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "connected", "version": "PostgreSQL 16.2"})
        );
    }

    #[test]
    fn failed_probe_serializes_status_and_message_only() {
        let json = serde_json::to_value(ProbeResponse::error("connection refused".into())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "error", "message": "connection refused"})
        );
    }
}
