//! # インフラ層エラー定義
//!
//! Redis や CAPTCHA 画像生成など、ゲートウェイが自前で扱う資源のエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装や convenience constructor でエラーを生成すると、
//! その時点のスパン情報が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// Redis への接続失敗、コマンド実行エラーなど
   #[error("Redis エラー: {0}")]
   Redis(#[source] redis::RedisError),

   /// CAPTCHA 画像の生成に失敗した
   #[error("CAPTCHA 生成エラー: {0}")]
   Captcha(String),

   /// 上記に分類できない予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// CAPTCHA 生成エラーを生成する
   pub fn captcha(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Captcha(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }

   /// 予期しないエラーを生成する
   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      std::error::Error::source(&self.kind)
   }
}

impl From<redis::RedisError> for InfraError {
   fn from(source: redis::RedisError) -> Self {
      Self {
         kind:       InfraErrorKind::Redis(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

#[cfg(test)]
mod tests {
   use tracing_subscriber::layer::SubscriberExt as _;

   use super::*;

   fn with_error_layer(f: impl FnOnce()) {
      let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
      let _guard = tracing::subscriber::set_default(subscriber);
      f();
   }

   #[test]
   fn test_from_redis_errorでspan_traceがキャプチャされる() {
      with_error_layer(|| {
         let span = tracing::info_span!("captcha_store_take");
         let _enter = span.enter();

         let redis_err: redis::RedisError = (redis::ErrorKind::Io, "接続失敗").into();
         let err: InfraError = redis_err.into();

         assert!(matches!(err.kind(), InfraErrorKind::Redis(_)));
         let trace_str = format!("{}", err.span_trace());
         assert!(
            trace_str.contains("captcha_store_take"),
            "SpanTrace がスパン名を含むこと: {trace_str}",
         );
      });
   }

   #[test]
   fn test_captchaのdisplayにメッセージが含まれる() {
      let err = InfraError::captcha("PNG エンコード失敗");
      assert_eq!(format!("{err}"), "CAPTCHA 生成エラー: PNG エンコード失敗");
   }

   #[test]
   fn test_sourceがinfra_error_kindに委譲する() {
      use std::error::Error;

      let redis_err: redis::RedisError = (redis::ErrorKind::Io, "接続失敗").into();
      let err: InfraError = redis_err.into();
      assert!(err.source().is_some());

      let err = InfraError::unexpected("x");
      assert!(err.source().is_none());
   }
}
