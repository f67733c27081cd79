//! # セッショントークン
//!
//! ログイン・登録成功時に発行する署名付きトークン（JWT, HS256）。
//!
//! | クレーム | 内容 |
//! |---------|------|
//! | `id` | ユーザー ID |
//! | `nick_name` | 表示名 |
//! | `authority_id` | 権限レベル（下流の `role`） |
//! | `iat` / `nbf` | 発行時刻 |
//! | `exp` | 発行時刻 + 30 日 |
//! | `iss` | [`TOKEN_ISSUER`] |
//!
//! トークンはステートレスで、失効リストは持たない。

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use mxshop_domain::clock::Clock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// トークンの発行者
pub const TOKEN_ISSUER: &str = "mxshop";

/// トークンの有効期間（秒）
/// 30日 = 2,592,000秒
pub const TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// トークンに埋め込むセッション情報
///
/// 認証ミドルウェアが検証後にリクエスト extensions へ格納し、
/// ハンドラは `Extension<SessionClaims>` で受け取る。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
   pub id:           i32,
   pub nick_name:    String,
   pub authority_id: i32,
   pub iat:          i64,
   pub nbf:          i64,
   pub exp:          i64,
   pub iss:          String,
}

/// 発行済みトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
   pub token:  String,
   pub claims: SessionClaims,
}

impl IssuedToken {
   /// 有効期限（UNIX ミリ秒）
   pub fn expires_at_millis(&self) -> i64 {
      self.claims.exp * 1000
   }
}

/// トークンの発行・検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
   #[error("トークンの有効期限が切れています")]
   Expired,

   #[error("トークンはまだ有効になっていません")]
   NotYetValid,

   #[error("トークンが不正です: {0}")]
   Invalid(String),

   #[error("トークンの署名に失敗しました: {0}")]
   Signing(String),
}

/// セッショントークンの発行者
///
/// 署名鍵は設定から注入し、発行時刻は [`Clock`] から取得する。
pub struct TokenIssuer {
   encoding_key: EncodingKey,
   decoding_key: DecodingKey,
   validation:   Validation,
   clock:        Arc<dyn Clock>,
}

impl TokenIssuer {
   pub fn new(signing_key: &[u8], clock: Arc<dyn Clock>) -> Self {
      let mut validation = Validation::new(Algorithm::HS256);
      validation.set_issuer(&[TOKEN_ISSUER]);
      validation.set_required_spec_claims(&["exp", "nbf", "iss"]);
      validation.validate_exp = true;
      validation.validate_nbf = true;

      Self {
         encoding_key: EncodingKey::from_secret(signing_key),
         decoding_key: DecodingKey::from_secret(signing_key),
         validation,
         clock,
      }
   }

   /// トークンを発行する
   ///
   /// `nbf` は発行時刻、`exp` は発行時刻 + [`TOKEN_TTL_SECONDS`]。
   pub fn issue(
      &self,
      user_id: i32,
      nick_name: &str,
      authority_id: i32,
   ) -> Result<IssuedToken, TokenError> {
      let now = self.clock.now().timestamp();
      let claims = SessionClaims {
         id: user_id,
         nick_name: nick_name.to_string(),
         authority_id,
         iat: now,
         nbf: now,
         exp: now + TOKEN_TTL_SECONDS,
         iss: TOKEN_ISSUER.to_string(),
      };

      let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
         .map_err(|e| TokenError::Signing(e.to_string()))?;

      Ok(IssuedToken { token, claims })
   }

   /// トークンを検証してクレームを取り出す
   ///
   /// 署名・発行者・有効期間（`nbf` / `exp`）を検証する。
   pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
      jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
         .map(|data| data.claims)
         .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            _ => TokenError::Invalid(e.to_string()),
         })
   }
}

#[cfg(test)]
mod tests {
   use chrono::Utc;
   use mxshop_domain::clock::{FixedClock, SystemClock};
   use pretty_assertions::assert_eq;

   use super::*;

   const KEY: &[u8] = b"test-signing-key";

   fn issuer_at(unix: i64) -> TokenIssuer {
      TokenIssuer::new(KEY, Arc::new(FixedClock::at_unix(unix)))
   }

   #[test]
   fn test_issue_有効期限は発行時刻の30日後() {
      let issued = issuer_at(1_700_000_000).issue(1, "13800000000", 1).unwrap();

      assert_eq!(issued.claims.nbf, 1_700_000_000);
      assert_eq!(issued.claims.exp, 1_700_000_000 + 2_592_000);
      assert_eq!(issued.expires_at_millis(), (1_700_000_000 + 2_592_000) * 1000);
      assert_eq!(issued.claims.iss, "mxshop");
   }

   #[test]
   fn test_verify_発行したトークンのクレームを復元できる() {
      let issuer = TokenIssuer::new(KEY, Arc::new(SystemClock));
      let issued = issuer.issue(42, "bobby", 2).unwrap();

      let claims = issuer.verify(&issued.token).unwrap();

      assert_eq!(claims, issued.claims);
   }

   #[test]
   fn test_verify_期限切れトークンはexpiredを返す() {
      let forty_days_ago = Utc::now().timestamp() - 40 * 24 * 60 * 60;
      let issuer = issuer_at(forty_days_ago);
      let issued = issuer.issue(1, "old", 1).unwrap();

      assert_eq!(issuer.verify(&issued.token), Err(TokenError::Expired));
   }

   #[test]
   fn test_verify_未来の発行時刻はnot_yet_validを返す() {
      let tomorrow = Utc::now().timestamp() + 24 * 60 * 60;
      let issuer = issuer_at(tomorrow);
      let issued = issuer.issue(1, "future", 1).unwrap();

      assert_eq!(issuer.verify(&issued.token), Err(TokenError::NotYetValid));
   }

   #[test]
   fn test_verify_別の鍵で署名されたトークンを拒否する() {
      let issued = TokenIssuer::new(b"other-key", Arc::new(SystemClock))
         .issue(1, "x", 1)
         .unwrap();
      let issuer = TokenIssuer::new(KEY, Arc::new(SystemClock));

      assert!(matches!(issuer.verify(&issued.token), Err(TokenError::Invalid(_))));
   }

   #[test]
   fn test_verify_改ざんされたトークンを拒否する() {
      let issuer = TokenIssuer::new(KEY, Arc::new(SystemClock));
      let issued = issuer.issue(1, "x", 1).unwrap();
      let tampered = format!("{}x", issued.token);

      assert!(matches!(issuer.verify(&tampered), Err(TokenError::Invalid(_))));
   }

   #[test]
   fn test_verify_トークン形式でない文字列を拒否する() {
      let issuer = TokenIssuer::new(KEY, Arc::new(SystemClock));
      assert!(matches!(issuer.verify("not-a-token"), Err(TokenError::Invalid(_))));
   }
}
