//! User Service クライアントのエラー型

use thiserror::Error;
use tonic::{Code, Status};

/// User Service クライアントエラー
///
/// gRPC ステータスを HTTP 変換に必要な粒度へ分類したもの。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserServiceError {
   /// 対象が存在しない（NotFound）
   ///
   /// メッセージは下流のものをそのままクライアントへ返す。
   #[error("対象が見つかりません: {0}")]
   NotFound(String),

   /// 下流が引数を拒否した（InvalidArgument）
   #[error("パラメータエラー: {0}")]
   InvalidArgument(String),

   /// 下流の内部エラー（Internal）
   #[error("User Service 内部エラー: {0}")]
   Internal(String),

   /// 接続不可・期限切れ（Unavailable / DeadlineExceeded / ローカルタイムアウト）
   #[error("User Service を利用できません: {0}")]
   Unavailable(String),

   /// 上記以外のステータス
   #[error("User Service エラー（{code:?}）: {message}")]
   Other { code: Code, message: String },
}

impl From<Status> for UserServiceError {
   fn from(status: Status) -> Self {
      let message = status.message().to_string();
      match status.code() {
         Code::NotFound => Self::NotFound(message),
         Code::InvalidArgument => Self::InvalidArgument(message),
         Code::Internal => Self::Internal(message),
         Code::Unavailable | Code::DeadlineExceeded => Self::Unavailable(message),
         code => Self::Other { code, message },
      }
   }
}

impl From<tonic::transport::Error> for UserServiceError {
   fn from(err: tonic::transport::Error) -> Self {
      Self::Unavailable(err.to_string())
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[rstest]
   #[case(Status::not_found("user not found"), UserServiceError::NotFound("user not found".to_string()))]
   #[case(Status::invalid_argument("bad id"), UserServiceError::InvalidArgument("bad id".to_string()))]
   #[case(Status::internal("db down"), UserServiceError::Internal("db down".to_string()))]
   #[case(Status::unavailable("conn refused"), UserServiceError::Unavailable("conn refused".to_string()))]
   #[case(Status::deadline_exceeded("slow"), UserServiceError::Unavailable("slow".to_string()))]
   fn test_from_status_分類表どおりに変換する(
      #[case] status: Status,
      #[case] expected: UserServiceError,
   ) {
      assert_eq!(UserServiceError::from(status), expected);
   }

   #[test]
   fn test_from_status_表にないコードはotherになる() {
      let err = UserServiceError::from(Status::already_exists("mobile exists"));

      assert_eq!(
         err,
         UserServiceError::Other {
            code:    Code::AlreadyExists,
            message: "mobile exists".to_string(),
         }
      );
   }
}
