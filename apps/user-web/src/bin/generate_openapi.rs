//! # OpenAPI YAML 生成ツール
//!
//! user-web の Rust 型から OpenAPI 仕様を YAML 形式で標準出力に出力する。
//! 生成後、どこからも参照されないコンポーネントスキーマを除去する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p mxshop-user-web > openapi/user-web.yaml
//! ```

use std::{collections::HashSet, process::ExitCode};

use mxshop_user_web::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> ExitCode {
   let mut openapi = ApiDoc::openapi();
   if let Err(e) = remove_unused_schemas(&mut openapi) {
      eprintln!("JSON シリアライズに失敗しました: {e}");
      return ExitCode::FAILURE;
   }
   match openapi.to_yaml() {
      Ok(yaml) => {
         print!("{yaml}");
         ExitCode::SUCCESS
      }
      Err(e) => {
         eprintln!("OpenAPI YAML 生成に失敗しました: {e}");
         ExitCode::FAILURE
      }
   }
}

/// どこからも `$ref` されないコンポーネントスキーマを除去する
fn remove_unused_schemas(openapi: &mut utoipa::openapi::OpenApi) -> Result<(), serde_json::Error> {
   // JSON にシリアライズして全 $ref ターゲットを収集する
   let json = serde_json::to_string(openapi)?;

   // JSON 形式: "$ref":"#/components/schemas/SchemaName"
   let prefix = "#/components/schemas/";
   let used_schemas: HashSet<String> = json
      .match_indices(prefix)
      .filter_map(|(start, _)| {
         let rest = &json[start + prefix.len()..];
         rest.find('"').map(|end| rest[..end].to_string())
      })
      .collect();

   if let Some(components) = &mut openapi.components {
      components
         .schemas
         .retain(|name, _| used_schemas.contains(name.as_str()));
   }
   Ok(())
}
