//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ユーザーデータの扱いは User Service に委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `captcha`: CAPTCHA の発行
//! - `auth`: 登録・ログイン
//! - `user`: プロフィール参照・更新、ユーザー一覧

pub mod auth;
pub mod captcha;
pub mod health;
pub mod user;

pub use auth::{AuthState, login, register};
pub use captcha::get_captcha;
pub use health::health_check;
pub use user::{UserState, get_user_detail, list_users, update_user};
