//! # ヘルスチェック共通型
//!
//! 稼働確認エンドポイント `/health` が返すレスポンス型。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// ```
/// use mxshop_shared::HealthResponse;
///
/// let response = HealthResponse::healthy();
/// assert_eq!(response.code, 200);
/// assert!(response.success);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    /// HTTP ステータスコードと同じ値
    pub code:    u16,
    /// 稼働中なら `true`
    pub success: bool,
}

impl HealthResponse {
    /// 稼働中を表すレスポンス
    pub fn healthy() -> Self {
        Self {
            code:    200,
            success: true,
        }
    }
}
