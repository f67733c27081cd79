//! # mxshop ドメイン層
//!
//! ユーザーアカウントゲートウェイが扱う値オブジェクトを定義する。
//!
//! 永続化やパスワード検証は下流の User Service が所有するため、
//! このクレートが持つのはリクエスト境界で検証・変換される値のみ。
//!
//! ## 依存関係の方向
//!
//! ```text
//! user-web → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`clock`] - 時刻プロバイダ（テストで固定時刻を注入する）
//! - [`error`] - ドメイン層エラー
//! - [`user`] - 携帯番号・性別・誕生日の値オブジェクト

pub mod clock;
pub mod error;
pub mod user;

pub use error::DomainError;
