//! # user-web 設定
//!
//! 環境変数から user-web サーバーの設定を読み込む。
//!
//! 解釈は [`UserWebConfig::from_lookup`] に集約しており、テストでは
//! 環境変数を書き換えずに任意の値の組を渡して検証できる。

use std::{env, str::FromStr, time::Duration};

use thiserror::Error;

use crate::validation::Locale;

/// User Service 呼び出しのデフォルト期限（ミリ秒）
const DEFAULT_USER_SRV_TIMEOUT_MS: u64 = 3000;

/// CAPTCHA のデフォルト有効期間（秒）
const DEFAULT_CAPTCHA_TTL_SECS: u64 = 300;

/// メモリ内 CAPTCHA ストアのデフォルト上限件数
const DEFAULT_CAPTCHA_MAX_ENTRIES: usize = 10_000;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {reason}")]
   Invalid { name: &'static str, reason: String },
}

/// user-web サーバーの設定
#[derive(Debug, Clone)]
pub struct UserWebConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// User Service の gRPC エンドポイント
   pub user_srv_url: String,
   /// User Service 呼び出し・接続の期限
   pub user_srv_timeout: Duration,
   /// トークン署名鍵
   pub jwt_signing_key: String,
   /// 設定されていれば CAPTCHA を Redis に保存する
   pub redis_url: Option<String>,
   /// CAPTCHA の有効期間
   pub captcha_ttl: Duration,
   /// メモリ内 CAPTCHA ストアの上限件数
   pub captcha_max_entries: usize,
   /// 検証メッセージの言語
   pub validation_locale: Locale,
}

impl UserWebConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 名前 → 値の関数から設定を組み立てる
   ///
   /// 空文字の値は未設定として扱う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let jwt_signing_key = get("JWT_SIGNING_KEY").ok_or(ConfigError::Missing("JWT_SIGNING_KEY"))?;

      Ok(Self {
         host: get("USER_WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port: parse_required(get("USER_WEB_PORT"), "USER_WEB_PORT")?,
         user_srv_url: get("USER_SRV_URL").ok_or(ConfigError::Missing("USER_SRV_URL"))?,
         user_srv_timeout: Duration::from_millis(positive(
            parse_or(
               get("USER_SRV_TIMEOUT_MS"),
               "USER_SRV_TIMEOUT_MS",
               DEFAULT_USER_SRV_TIMEOUT_MS,
            )?,
            "USER_SRV_TIMEOUT_MS",
         )?),
         jwt_signing_key,
         redis_url: get("REDIS_URL"),
         captcha_ttl: Duration::from_secs(positive(
            parse_or(
               get("CAPTCHA_TTL_SECS"),
               "CAPTCHA_TTL_SECS",
               DEFAULT_CAPTCHA_TTL_SECS,
            )?,
            "CAPTCHA_TTL_SECS",
         )?),
         captcha_max_entries: parse_or(
            get("CAPTCHA_MAX_ENTRIES"),
            "CAPTCHA_MAX_ENTRIES",
            DEFAULT_CAPTCHA_MAX_ENTRIES,
         )?,
         validation_locale: parse_or(get("VALIDATION_LOCALE"), "VALIDATION_LOCALE", Locale::En)?,
      })
   }
}

fn parse_required<T>(value: Option<String>, name: &'static str) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
{
   let value = value.ok_or(ConfigError::Missing(name))?;
   parse_value(&value, name)
}

fn parse_or<T>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
{
   match value {
      Some(value) => parse_value(&value, name),
      None => Ok(default),
   }
}

/// 期限を表す値の 0 を拒否する
fn positive(value: u64, name: &'static str) -> Result<u64, ConfigError> {
   if value == 0 {
      return Err(ConfigError::Invalid {
         name,
         reason: "0 より大きい値を指定してください".to_string(),
      });
   }
   Ok(value)
}

fn parse_value<T>(value: &str, name: &'static str) -> Result<T, ConfigError>
where
   T: FromStr,
   T::Err: std::fmt::Display,
{
   value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
      name,
      reason: format!("{value:?}: {e}"),
   })
}

#[cfg(test)]
mod tests {
   // テスト間で環境変数の競合を避けるため、
   // from_lookup に固定の値の組を渡して検証する

   use std::collections::HashMap;

   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn load(pairs: &[(&str, &str)]) -> Result<UserWebConfig, ConfigError> {
      let vars: HashMap<String, String> = pairs
         .iter()
         .map(|(k, v)| (k.to_string(), v.to_string()))
         .collect();
      UserWebConfig::from_lookup(|name| vars.get(name).cloned())
   }

   const REQUIRED: [(&str, &str); 3] = [
      ("USER_WEB_PORT", "8021"),
      ("USER_SRV_URL", "http://127.0.0.1:50051"),
      ("JWT_SIGNING_KEY", "secret"),
   ];

   #[test]
   fn test_必須項目のみでデフォルト値が入る() {
      let config = load(&REQUIRED).unwrap();

      assert_eq!(config.host, "0.0.0.0");
      assert_eq!(config.port, 8021);
      assert_eq!(config.user_srv_url, "http://127.0.0.1:50051");
      assert_eq!(config.user_srv_timeout, Duration::from_millis(3000));
      assert_eq!(config.redis_url, None);
      assert_eq!(config.captcha_ttl, Duration::from_secs(300));
      assert_eq!(config.captcha_max_entries, 10_000);
      assert_eq!(config.validation_locale, Locale::En);
   }

   #[test]
   fn test_任意項目を上書きできる() {
      let mut pairs = REQUIRED.to_vec();
      pairs.extend([
         ("USER_WEB_HOST", "127.0.0.1"),
         ("USER_SRV_TIMEOUT_MS", "500"),
         ("REDIS_URL", "redis://localhost:6379"),
         ("CAPTCHA_TTL_SECS", "60"),
         ("CAPTCHA_MAX_ENTRIES", "100"),
         ("VALIDATION_LOCALE", "zh"),
      ]);

      let config = load(&pairs).unwrap();

      assert_eq!(config.host, "127.0.0.1");
      assert_eq!(config.user_srv_timeout, Duration::from_millis(500));
      assert_eq!(config.redis_url.as_deref(), Some("redis://localhost:6379"));
      assert_eq!(config.captcha_ttl, Duration::from_secs(60));
      assert_eq!(config.captcha_max_entries, 100);
      assert_eq!(config.validation_locale, Locale::Zh);
   }

   #[test]
   fn test_署名鍵が空ならエラー() {
      let mut pairs = REQUIRED.to_vec();
      pairs.retain(|(k, _)| *k != "JWT_SIGNING_KEY");
      pairs.push(("JWT_SIGNING_KEY", "  "));

      assert_eq!(load(&pairs).unwrap_err(), ConfigError::Missing("JWT_SIGNING_KEY"));
   }

   #[test]
   fn test_ポート未設定はエラー() {
      let pairs: Vec<_> = REQUIRED
         .into_iter()
         .filter(|(k, _)| *k != "USER_WEB_PORT")
         .collect();

      assert_eq!(load(&pairs).unwrap_err(), ConfigError::Missing("USER_WEB_PORT"));
   }

   #[test]
   fn test_数値でないポートはinvalid() {
      let mut pairs = REQUIRED.to_vec();
      pairs.retain(|(k, _)| *k != "USER_WEB_PORT");
      pairs.push(("USER_WEB_PORT", "http"));

      assert!(matches!(
         load(&pairs).unwrap_err(),
         ConfigError::Invalid {
            name: "USER_WEB_PORT",
            ..
         }
      ));
   }

   #[test]
   fn test_未対応のロケールはinvalid() {
      let mut pairs = REQUIRED.to_vec();
      pairs.push(("VALIDATION_LOCALE", "fr"));

      assert!(matches!(
         load(&pairs).unwrap_err(),
         ConfigError::Invalid {
            name: "VALIDATION_LOCALE",
            ..
         }
      ));
   }

   #[rstest]
   #[case("USER_SRV_TIMEOUT_MS")]
   #[case("CAPTCHA_TTL_SECS")]
   fn test_期限に0を指定するとinvalid(#[case] name: &'static str) {
      let mut pairs = REQUIRED.to_vec();
      pairs.push((name, "0"));

      assert_eq!(
         load(&pairs).unwrap_err(),
         ConfigError::Invalid {
            name,
            reason: "0 より大きい値を指定してください".to_string(),
         }
      );
   }
}
