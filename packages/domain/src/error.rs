//! # ドメイン層エラー定義
//!
//! 値オブジェクトの生成時に検出される入力違反を表現する。
//! API 層ではフィールド単位のバリデーションエラー（400）に変換される。

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// 入力値が値オブジェクトの不変条件に違反している場合に使用する。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validationのdisplayにメッセージが含まれる() {
        let err = DomainError::Validation("携帯番号の形式が不正です".to_string());
        assert_eq!(err.to_string(), "バリデーションエラー: 携帯番号の形式が不正です");
    }
}
