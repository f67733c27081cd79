//! # フォームの抽出と検証
//!
//! [`ValidatedForm`] はリクエスト本文を型付きフォームに変換し、`validator` で検証する。
//!
//! | 失敗 | レスポンス |
//! |------|-----------|
//! | 本文が解釈できない（JSON 不正、Content-Type 不一致など） | 400 `{"msg": "..."}` |
//! | 検証エラー | 400 `{"error": {"<field>": "<message>"}}` |
//!
//! 本文は `application/x-www-form-urlencoded` なら Form、それ以外は JSON として読む。
//! メッセージの言語は、ルーターに `Extension<Arc<Translator>>` として注入された
//! [`Translator`] で決まる（未注入なら英語）。

mod translator;

use std::sync::Arc;

use axum::{
    Form,
    Json,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
    response::Response,
};
use mxshop_domain::user::{Birthday, Gender, Mobile};
use serde::de::DeserializeOwned;
pub use translator::{Locale, Translator};
use validator::{Validate, ValidationError};

use crate::error::{bad_request_response, field_errors_response};

/// 検証済みフォーム抽出器
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let translator = req
            .extensions()
            .get::<Arc<Translator>>()
            .map(|t| **t)
            .unwrap_or_default();

        let value = if is_form_urlencoded(req.headers()) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| bad_request_response(e.body_text()))?;
            value
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| bad_request_response(e.body_text()))?;
            value
        };

        if let Err(errors) = value.validate() {
            return Err(field_errors_response(translator.translate(&errors)));
        }

        Ok(Self(value))
    }
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"))
}

// --- 独自バリデータ ---
//
// 空文字は "required"、形式違反は値の種類ごとのコードで返す。

/// 携帯番号の形式を検証する
pub fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    if !Mobile::is_valid(value) {
        return Err(ValidationError::new("mobile"));
    }
    Ok(())
}

/// 性別（`male` / `female` / `unknown`）を検証する
pub fn validate_gender(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    value
        .parse::<Gender>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("gender"))
}

/// 誕生日（`YYYY-MM-DD`）を検証する
pub fn validate_birthday(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required"));
    }
    Birthday::parse(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("birthday"))
}
