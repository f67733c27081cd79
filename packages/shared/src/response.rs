//! # 共通エラーレスポンス型
//!
//! クライアントが受け取るエラー本文は 2 形状のみ:
//!
//! - [`MessageResponse`]: `{"msg": "..."}`（下流エラー・認証失敗・内部エラー）
//! - [`FieldErrorResponse`]: `{"error": {"<field>": "..."}}`（入力検証エラー）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// メッセージのみのレスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub msg: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

/// フィールド単位のエラーレスポンス
///
/// キーはクライアントが送ったフィールド名（構造体名の接頭辞なし）。
/// `BTreeMap` を使い、出力順を安定させる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldErrorResponse {
    pub error: BTreeMap<String, String>,
}

impl FieldErrorResponse {
    pub fn new(error: BTreeMap<String, String>) -> Self {
        Self { error }
    }

    /// 1 フィールドだけのエラーを作る
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: BTreeMap::from([(field.into(), message.into())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_message_responseのjson形状() {
        let value = serde_json::to_value(MessageResponse::new("internal error")).unwrap();
        assert_eq!(value, json!({ "msg": "internal error" }));
    }

    #[test]
    fn test_field_error_response_singleのjson形状() {
        let value =
            serde_json::to_value(FieldErrorResponse::single("mobile", "user does not exist"))
                .unwrap();
        assert_eq!(value, json!({ "error": { "mobile": "user does not exist" } }));
    }
}
