//! # user-web エラーハンドリング
//!
//! 下流エラーの HTTP 変換と、ハンドラ共通のレスポンスヘルパー。
//!
//! ## User Service エラーの変換表
//!
//! | 下流ステータス | HTTP | 本文 |
//! |---------------|------|------|
//! | NotFound | 404 | `{"msg": <下流メッセージ>}` |
//! | InvalidArgument | 400 | `{"msg": "parameter error"}` |
//! | Internal | 500 | `{"msg": "internal error"}` |
//! | Unavailable / 期限切れ | 500 | `{"msg": "service unavailable"}` |
//! | その他 | 500 | `{"msg": <ステータスコード名>}` |

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mxshop_shared::{FieldErrorResponse, MessageResponse};

use crate::client::UserServiceError;

// --- IntoResponse for UserServiceError ---

impl IntoResponse for UserServiceError {
    fn into_response(self) -> Response {
        match self {
            UserServiceError::NotFound(msg) => message_response(StatusCode::NOT_FOUND, msg),
            UserServiceError::InvalidArgument(_) => {
                message_response(StatusCode::BAD_REQUEST, "parameter error")
            }
            UserServiceError::Internal(_) => internal_error_response(),
            UserServiceError::Unavailable(_) => {
                message_response(StatusCode::INTERNAL_SERVER_ERROR, "service unavailable")
            }
            UserServiceError::Other { code, .. } => {
                message_response(StatusCode::INTERNAL_SERVER_ERROR, format!("{:?}", code))
            }
        }
    }
}

/// User Service エラーをログ付きでレスポンスに変換する
///
/// NotFound / InvalidArgument はクライアント起因なので debug、それ以外は error で出力する。
pub fn log_and_convert_user_service_error(context: &str, err: UserServiceError) -> Response {
    match &err {
        UserServiceError::NotFound(_) | UserServiceError::InvalidArgument(_) => {
            tracing::debug!("{}: {}", context, err);
        }
        _ => {
            tracing::error!(
                error.category = "external_service",
                error.kind = "user_service",
                "{}で内部エラー: {}",
                context,
                err
            );
        }
    }
    err.into_response()
}

// --- レスポンスヘルパー ---

/// `{"msg": ...}` 形式のレスポンス
pub fn message_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(MessageResponse::new(msg))).into_response()
}

/// 400 `{"msg": ...}`（リクエスト本文・クエリが解釈できない）
pub fn bad_request_response(msg: impl Into<String>) -> Response {
    message_response(StatusCode::BAD_REQUEST, msg)
}

/// 400 `{"error": {...}}`（フィールド単位の検証エラー）
pub fn field_errors_response(errors: BTreeMap<String, String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(FieldErrorResponse::new(errors))).into_response()
}

/// 400 `{"error": {field: message}}`（1 フィールドのみ）
pub fn field_error_response(field: &str, message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(FieldErrorResponse::single(field, message)),
    )
        .into_response()
}

/// 401 `{"msg": ...}`
pub fn unauthorized_response(msg: &str) -> Response {
    message_response(StatusCode::UNAUTHORIZED, msg)
}

/// 500 `{"msg": "internal error"}`
pub fn internal_error_response() -> Response {
    message_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};
    use tonic::Code;

    use super::*;

    async fn status_and_body(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(
        UserServiceError::NotFound("user does not exist".to_string()),
        StatusCode::NOT_FOUND,
        "user does not exist"
    )]
    #[case(
        UserServiceError::InvalidArgument("id must be positive".to_string()),
        StatusCode::BAD_REQUEST,
        "parameter error"
    )]
    #[case(
        UserServiceError::Internal("db down".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error"
    )]
    #[case(
        UserServiceError::Unavailable("deadline".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "service unavailable"
    )]
    #[case(
        UserServiceError::Other { code: Code::AlreadyExists, message: "mobile exists".to_string() },
        StatusCode::INTERNAL_SERVER_ERROR,
        "AlreadyExists"
    )]
    #[tokio::test]
    async fn test_user_service_errorが変換表どおりのレスポンスになる(
        #[case] err: UserServiceError,
        #[case] expected_status: StatusCode,
        #[case] expected_msg: &str,
    ) {
        let (status, body) = status_and_body(err.into_response()).await;

        assert_eq!(status, expected_status);
        assert_eq!(body, json!({ "msg": expected_msg }));
    }

    #[tokio::test]
    async fn test_field_error_responseはerrorキーにフィールドを持つ() {
        let (status, body) =
            status_and_body(field_error_response("captcha", "captcha is incorrect")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": { "captcha": "captcha is incorrect" } }));
    }
}
