//! # OpenAPI 仕様定義
//!
//! utoipa を使用して user-web の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::{
    Modify,
    OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::handler::{auth, captcha, health, user};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "mxshop user-web API",
      version = "0.1.0",
      description = "ユーザーアカウント用 HTTP ゲートウェイ"
   ),
   paths(
      // health
      health::health_check,
      // captcha
      captcha::get_captcha,
      // auth
      auth::register,
      auth::login,
      // user
      user::get_user_detail,
      user::update_user,
      user::list_users,
   ),
   components(schemas(
      mxshop_shared::MessageResponse,
      mxshop_shared::FieldErrorResponse,
   )),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "captcha", description = "画像 CAPTCHA"),
      (name = "auth", description = "登録・ログイン"),
      (name = "user", description = "プロフィール・ユーザー一覧"),
   ),
   modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// トークン認証のセキュリティスキームを登録する
///
/// `Authorization: Bearer` と `x-token` ヘッダーのどちらでも受け付ける。
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "x_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-token"))),
        );
    }
}
