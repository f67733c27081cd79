//! # Request ID 伝播ミドルウェア
//!
//! user-web → User Service 間の Request ID 伝播を実現する。
//!
//! 1. [`store_request_id`] が `SetRequestIdLayer` の設定した
//!    [`RequestId`](tower_http::request_id::RequestId) を task-local に保存する
//! 2. [`inject_request_id`] が task-local から Request ID を取得し、
//!    gRPC メタデータ `x-request-id` として付与する

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use mxshop_shared::observability::REQUEST_ID_HEADER;
use tonic::metadata::AsciiMetadataValue;
use tower_http::request_id::RequestId;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// 現在のリクエストの Request ID を取得する
///
/// task-local スコープ外（テスト等）では `None` を返す。
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// Request ID を task-local に保存するミドルウェア
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    REQUEST_ID.scope(request_id, next.run(request)).await
}

/// gRPC リクエストに `x-request-id` メタデータを付与する
///
/// task-local 未設定、またはメタデータとして不正な値の場合は何もしない。
pub fn inject_request_id<T>(request: &mut tonic::Request<T>) {
    let Some(value) = current_request_id().and_then(|id| id.parse::<AsciiMetadataValue>().ok())
    else {
        return;
    };
    request.metadata_mut().insert(REQUEST_ID_HEADER, value);
}
