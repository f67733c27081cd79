//! # 登録・ログインハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /u/v1/register` - 携帯番号とパスワードで登録し、トークンを発行
//! - `POST /u/v1/login` - CAPTCHA とパスワードを検証し、トークンを発行
//!
//! どちらも成功時は `{"id", "nick_name", "token", "expired_at"}` を返す。
//! 携帯番号はログに出す前にマスクする。

use std::sync::Arc;

use axum::{
   Json,
   extract::State,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use mxshop_domain::user::{Mobile, mask_mobile};
use mxshop_infra::{CaptchaService, TokenIssuer};
use mxshop_shared::{FieldErrorResponse, MessageResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
   client::{CreateUserRequest, UserInfo, UserServiceClient, UserServiceError},
   error::{
      field_error_response,
      internal_error_response,
      log_and_convert_user_service_error,
      message_response,
   },
   validation::{ValidatedForm, validate_mobile},
};

/// 認証系ハンドラ（CAPTCHA・登録・ログイン）の共有状態
pub struct AuthState {
   pub user_service_client: Arc<dyn UserServiceClient>,
   pub token_issuer:        Arc<TokenIssuer>,
   pub captcha_service:     Arc<CaptchaService>,
}

// --- リクエスト型 ---

/// 登録フォーム
///
/// CAPTCHA は任意。`captcha_id` と `captcha` の両方が送られた場合のみ検証する。
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterForm {
   #[serde(default)]
   #[validate(custom(function = "validate_mobile"))]
   pub mobile:           String,
   #[serde(default)]
   #[validate(length(min = 3, max = 20))]
   pub password:         String,
   #[serde(default)]
   #[validate(must_match(other = "password"))]
   pub confirm_password: String,
   #[serde(default, alias = "captchaId")]
   pub captcha_id:       Option<String>,
   #[serde(default)]
   #[validate(length(equal = 5))]
   pub captcha:          Option<String>,
}

/// ログインフォーム
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginForm {
   #[serde(default)]
   #[validate(custom(function = "validate_mobile"))]
   pub mobile:     String,
   #[serde(default)]
   #[validate(length(min = 3, max = 20))]
   pub password:   String,
   #[serde(default, alias = "captchaId")]
   #[validate(length(min = 1, code = "required"))]
   pub captcha_id: String,
   #[serde(default)]
   #[validate(length(equal = 5))]
   pub captcha:    String,
}

// --- レスポンス型 ---

/// 登録・ログイン成功レスポンス
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
   pub id:         i32,
   pub nick_name:  String,
   pub token:      String,
   /// トークンの有効期限（UNIX ミリ秒）
   pub expired_at: i64,
}

// --- ハンドラ ---

/// POST /u/v1/register
///
/// ## フロー
///
/// 1. 入力バリデーション
/// 2. CAPTCHA 検証（送られた場合のみ）
/// 3. User Service でユーザー作成（表示名は携帯番号）
/// 4. トークン発行
#[utoipa::path(
   post,
   path = "/u/v1/register",
   tag = "auth",
   request_body = RegisterForm,
   responses(
      (status = 200, description = "登録成功", body = SessionResponse),
      (status = 400, description = "入力エラー・CAPTCHA 不一致", body = FieldErrorResponse),
      (status = 500, description = "内部エラー", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
   State(state): State<Arc<AuthState>>,
   ValidatedForm(form): ValidatedForm<RegisterForm>,
) -> Response {
   let mobile = match Mobile::new(form.mobile) {
      Ok(mobile) => mobile,
      Err(e) => return field_error_response("mobile", &e.to_string()),
   };
   let masked = mobile.masked();

   if let Some((captcha_id, answer)) = form.captcha_id.as_deref().zip(form.captcha.as_deref()) {
      let checked = check_captcha(&state.captcha_service, captcha_id, answer).await;
      if let Err(response) = checked {
         tracing::info!(mobile = %masked, "登録失敗: CAPTCHA 不一致");
         return response;
      }
   }

   let request = CreateUserRequest {
      nick_name: mobile.to_string(),
      password:  form.password,
      mobile,
   };

   let user = match state.user_service_client.create_user(&request).await {
      Ok(user) => user,
      Err(e) => return log_and_convert_user_service_error("ユーザー登録", e),
   };

   tracing::info!(mobile = %masked, user_id = user.id, "ユーザーを登録しました");
   issue_session(&state.token_issuer, &user)
}

/// POST /u/v1/login
///
/// ## フロー
///
/// 1. 入力バリデーション
/// 2. CAPTCHA 検証（不一致なら User Service を呼ばない）
/// 3. 携帯番号でユーザーを検索
/// 4. パスワード照合（不一致ならトークンを発行しない）
/// 5. トークン発行
#[utoipa::path(
   post,
   path = "/u/v1/login",
   tag = "auth",
   request_body = LoginForm,
   responses(
      (status = 200, description = "ログイン成功", body = SessionResponse),
      (status = 400, description = "入力エラー・CAPTCHA 不一致・認証失敗", body = FieldErrorResponse),
      (status = 500, description = "内部エラー", body = MessageResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   ValidatedForm(form): ValidatedForm<LoginForm>,
) -> Response {
   let masked = mask_mobile(&form.mobile);

   if let Err(response) =
      check_captcha(&state.captcha_service, &form.captcha_id, &form.captcha).await
   {
      tracing::info!(mobile = %masked, "ログイン失敗: CAPTCHA 不一致");
      return response;
   }

   let user = match state
      .user_service_client
      .get_user_by_mobile(&form.mobile)
      .await
   {
      Ok(user) => user,
      Err(UserServiceError::NotFound(_)) => {
         tracing::info!(mobile = %masked, "ログイン失敗: ユーザー不存在");
         return field_error_response("mobile", "user does not exist");
      }
      Err(e) => return log_and_convert_user_service_error("ユーザー検索", e),
   };

   match state
      .user_service_client
      .check_password(&form.password, &user.password)
      .await
   {
      Ok(true) => {}
      Ok(false) => {
         tracing::info!(mobile = %masked, "ログイン失敗: パスワード不一致");
         return field_error_response("password", "login failed");
      }
      Err(e) => return log_and_convert_user_service_error("パスワード照合", e),
   }

   tracing::info!(mobile = %masked, user_id = user.id, "ログインしました");
   issue_session(&state.token_issuer, &user)
}

// --- ヘルパー関数 ---

/// CAPTCHA を検証する
///
/// 不一致は 400、ストア障害は 500 のレスポンスを `Err` で返す。
async fn check_captcha(
   captcha_service: &CaptchaService,
   captcha_id: &str,
   answer: &str,
) -> Result<(), Response> {
   match captcha_service.verify(captcha_id, answer).await {
      Ok(true) => Ok(()),
      Ok(false) => Err(field_error_response("captcha", "captcha is incorrect")),
      Err(e) => {
         tracing::error!(
            error.category = "infrastructure",
            error.kind = "captcha",
            "CAPTCHA の検証で内部エラー: {}",
            e
         );
         Err(internal_error_response())
      }
   }
}

/// トークンを発行してセッションレスポンスを組み立てる
fn issue_session(token_issuer: &TokenIssuer, user: &UserInfo) -> Response {
   match token_issuer.issue(user.id, &user.nick_name, user.role) {
      Ok(issued) => (
         StatusCode::OK,
         Json(SessionResponse {
            id:         user.id,
            nick_name:  user.nick_name.clone(),
            expired_at: issued.expires_at_millis(),
            token:      issued.token,
         }),
      )
         .into_response(),
      Err(e) => {
         tracing::error!(
            error.category = "infrastructure",
            error.kind = "token",
            "トークンの発行に失敗: {}",
            e
         );
         message_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to generate token")
      }
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   fn register_form(password: &str, confirm_password: &str) -> RegisterForm {
      RegisterForm {
         mobile:           "13800000000".to_string(),
         password:         password.to_string(),
         confirm_password: confirm_password.to_string(),
         captcha_id:       None,
         captcha:          None,
      }
   }

   #[test]
   fn test_register_form_確認用パスワードの不一致を検出する() {
      let errors = register_form("secret", "secreT").validate().unwrap_err();

      assert!(errors.field_errors().contains_key("confirm_password"));
   }

   #[test]
   fn test_register_form_captchaなしでも通る() {
      assert!(register_form("secret", "secret").validate().is_ok());
   }

   #[test]
   fn test_login_form_captcha_idの別名を受け付ける() {
      let form: LoginForm = serde_json::from_str(
         r#"{"mobile":"13800000000","password":"secret","captchaId":"abc","captcha":"12345"}"#,
      )
      .unwrap();

      assert_eq!(form.captcha_id, "abc");
      assert!(form.validate().is_ok());
   }

   #[test]
   fn test_login_form_captcha_id未送信はrequired() {
      let form: LoginForm =
         serde_json::from_str(r#"{"mobile":"13800000000","password":"secret","captcha":"12345"}"#)
            .unwrap();

      let errors = form.validate().unwrap_err();
      let field_errors = errors.field_errors();

      assert_eq!(field_errors["captcha_id"][0].code, "required");
   }
}
