//! # キャッシュ抑止レイヤー
//!
//! user-web のレスポンスはセッショントークン・携帯番号・プロフィールを含むため、
//! 全ルートに `Cache-Control: no-store` を付ける。
//! ハンドラが独自に `Cache-Control` を設定した場合はそれを残す。

use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

/// `Cache-Control: no-store` を補うレイヤーを作る
pub fn no_store() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    )
}
