//! # mxshop 共有ユーティリティ
//!
//! 全クレート（domain, infra, user-web）から利用される共通ユーティリティ。
//!
//! ## 設計方針
//!
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - HTTP の JSON 形状のうち、サービス横断で揃えたいものをここに置く

pub mod health;
pub mod observability;
pub mod response;

pub use health::HealthResponse;
pub use response::{FieldErrorResponse, MessageResponse};
