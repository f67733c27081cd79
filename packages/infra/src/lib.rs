//! # mxshop インフラ層
//!
//! ゲートウェイが自前で持つ外部資源との接続を担当する。
//!
//! ## 責務
//!
//! - **トークン**: セッショントークン（JWT）の署名と検証
//! - **CAPTCHA**: 画像生成と回答の一時保存（メモリ / Redis）
//! - **キャッシュ接続**: Redis への接続管理
//!
//! ユーザーデータの永続化は下流の User Service が担うため、
//! このクレートにはリポジトリは存在しない。
//!
//! ## 依存関係
//!
//! ```text
//! user-web → infra → domain
//! ```

pub mod captcha;
pub mod error;
pub mod redis;
pub mod token;

pub use captcha::{
   CaptchaChallenge,
   CaptchaRenderer,
   CaptchaService,
   CaptchaStore,
   DigitCaptchaRenderer,
   InMemoryCaptchaStore,
   RedisCaptchaStore,
   RenderedCaptcha,
};
pub use error::{InfraError, InfraErrorKind};
pub use token::{
   IssuedToken,
   SessionClaims,
   TOKEN_ISSUER,
   TOKEN_TTL_SECONDS,
   TokenError,
   TokenIssuer,
};
