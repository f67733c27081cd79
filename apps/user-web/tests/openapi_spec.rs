//! # OpenAPI 仕様テスト
//!
//! utoipa から生成される OpenAPI 仕様に、公開しているパス・タグ・
//! セキュリティスキームが揃っていることを検証する。

use mxshop_user_web::openapi::ApiDoc;
use utoipa::OpenApi;

#[test]
fn test_openapi仕様がパニックせず生成される() {
   let doc = ApiDoc::openapi();
   let yaml = doc.to_yaml().unwrap();
   assert!(yaml.contains("mxshop user-web API"));
}

#[test]
fn test_全パスが含まれている() {
   let doc = ApiDoc::openapi();
   let mut paths: Vec<&str> = doc.paths.paths.keys().map(|k| k.as_str()).collect();
   paths.sort_unstable();

   assert_eq!(
      paths,
      vec![
         "/health",
         "/u/v1/captcha",
         "/u/v1/login",
         "/u/v1/register",
         "/u/v1/user/detail",
         "/u/v1/user/list",
         "/u/v1/user/update",
      ]
   );
}

#[test]
fn test_トークン認証のセキュリティスキームが含まれている() {
   let doc = ApiDoc::openapi();
   let components = doc.components.as_ref().expect("components が存在すること");

   assert!(components.security_schemes.contains_key("bearer_auth"));
   assert!(components.security_schemes.contains_key("x_token"));
}

#[test]
fn test_全タグが含まれている() {
   let doc = ApiDoc::openapi();
   let tags: Vec<&str> = doc
      .tags
      .as_ref()
      .expect("tags が存在すること")
      .iter()
      .map(|t| t.name.as_str())
      .collect();

   for tag in ["health", "captcha", "auth", "user"] {
      assert!(tags.contains(&tag), "{tag} タグが存在すること: {tags:?}");
   }
}

#[test]
fn test_共通エラースキーマが登録されている() {
   let doc = ApiDoc::openapi();
   let components = doc.components.as_ref().expect("components が存在すること");

   for name in ["MessageResponse", "FieldErrorResponse", "SessionResponse"] {
      assert!(
         components.schemas.contains_key(name),
         "{name} スキーマが存在すること: {:?}",
         components.schemas.keys().collect::<Vec<_>>()
      );
   }
}
