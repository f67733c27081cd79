//! # CAPTCHA ハンドラ
//!
//! - `GET /u/v1/captcha` - 画像 CAPTCHA を発行する

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use mxshop_shared::MessageResponse;
use serde::Serialize;
use utoipa::ToSchema;

use super::AuthState;
use crate::error::message_response;

/// CAPTCHA 発行レスポンス
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaResponse {
   /// 検証時に送り返す ID
   pub captcha_id: String,
   /// `data:image/png;base64,...` 形式の画像
   pub pic_path:   String,
}

/// GET /u/v1/captcha
///
/// 5 桁の数字画像を生成し、回答をストアに保存する。
/// 回答は一度の検証で消費される。
#[utoipa::path(
   get,
   path = "/u/v1/captcha",
   tag = "captcha",
   responses(
      (status = 200, description = "発行成功", body = CaptchaResponse),
      (status = 500, description = "生成失敗", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn get_captcha(State(state): State<Arc<AuthState>>) -> Response {
   match state.captcha_service.issue().await {
      Ok(challenge) => (
         StatusCode::OK,
         Json(CaptchaResponse {
            captcha_id: challenge.id,
            pic_path:   challenge.image,
         }),
      )
         .into_response(),
      Err(e) => {
         tracing::error!(
            error.category = "infrastructure",
            error.kind = "captcha",
            "CAPTCHA の生成に失敗: {}",
            e
         );
         message_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to generate captcha")
      }
   }
}
