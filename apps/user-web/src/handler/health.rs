//! # ヘルスチェックハンドラ
//!
//! `/health` は依存サービスを確認せず、プロセスが応答できることだけを返す。

use axum::Json;
use mxshop_shared::HealthResponse;

/// ヘルスチェックエンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
