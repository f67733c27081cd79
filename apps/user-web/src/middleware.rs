//! # ミドルウェア
//!
//! user-web 用のミドルウェアを提供する。

mod auth;
mod cache_control;
pub mod request_id;

pub use auth::{AuthnState, TOKEN_HEADER, require_auth};
pub use cache_control::no_store;
