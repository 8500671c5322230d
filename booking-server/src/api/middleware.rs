//! 请求日志中间件
//!
//! 每个请求完成后记录一条日志：请求 ID、方法、路由模板、
//! 调用者 (用户名和角色)、状态码、耗时。5xx 升级为 warn。

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

pub async fn log_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();

    let method = req.method().clone();
    // 用路由模板而不是实际路径，避免日志里散落无穷多的 ID
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let caller = req
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{} ({})", u.username, u.role));

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(
            %request_id,
            %method,
            %route,
            ?caller,
            status,
            elapsed_ms,
            "request errored"
        );
    } else {
        info!(
            %request_id,
            %method,
            %route,
            ?caller,
            status,
            elapsed_ms,
            "request handled"
        );
    }

    response
}
