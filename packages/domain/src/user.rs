//! # ユーザー値オブジェクト
//!
//! ゲートウェイの入出力境界で扱うユーザー属性を定義する。
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`Mobile`] | `String` | ログイン ID を兼ねる携帯番号 |
//! | [`Gender`] | enum | 性別（`male` / `female` / `unknown`） |
//! | [`Birthday`] | `NaiveDate` | 誕生日（下流とは UTC 0 時の UNIX 秒でやり取りする） |

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use strum::IntoStaticStr;

use crate::DomainError;

// =========================================================================
// Mobile（携帯番号）
// =========================================================================

static MOBILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1(3\d|4[579]|5[0-35-9]|66|7[1-35-8]|8\d|9[189])\d{8}$")
        .expect("携帯番号の正規表現は静的に妥当である")
});

/// 携帯番号（値オブジェクト）
///
/// 中国本土の 11 桁の携帯番号。番号帯の先頭 3 桁で妥当性を判定する。
///
/// ```rust
/// use mxshop_domain::user::Mobile;
///
/// let mobile = Mobile::new("13800000000").unwrap();
/// assert_eq!(mobile.masked(), "138****0000");
/// assert!(Mobile::new("12345").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mobile(String);

impl Mobile {
    /// 携帯番号を作成する
    ///
    /// # エラー
    ///
    /// 番号の形式が不正な場合は `DomainError::Validation` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        if !Self::is_valid(&value) {
            return Err(DomainError::Validation(
                "携帯番号の形式が不正です".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 文字列が携帯番号として妥当か判定する
    pub fn is_valid(value: &str) -> bool {
        MOBILE_PATTERN.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ログ出力用に中央 4 桁を伏せた表記を返す
    pub fn masked(&self) -> String {
        mask_mobile(&self.0)
    }
}

/// 携帯番号の中央 4 桁を伏せる
///
/// 検証前の入力にも使えるよう、11 桁 ASCII でない値は長さだけ残して全て伏せる。
pub fn mask_mobile(value: &str) -> String {
    if value.len() == 11 && value.is_ascii() {
        format!("{}****{}", &value[..3], &value[7..])
    } else {
        "*".repeat(value.chars().count())
    }
}

impl std::fmt::Display for Mobile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =========================================================================
// Gender（性別）
// =========================================================================

/// 性別
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// 下流サービスへ渡す文字列表現
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

impl std::str::FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unknown" => Ok(Self::Unknown),
            _ => Err(DomainError::Validation(format!("不正な性別: {}", s))),
        }
    }
}

// =========================================================================
// Birthday（誕生日）
// =========================================================================

/// 誕生日（値オブジェクト）
///
/// 表示形式は `YYYY-MM-DD`。下流サービスとは UTC 0 時の UNIX 秒（符号なし）で
/// やり取りするため、1970-01-01 より前の日付は表現できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// 表示・入力で使う日付書式
    pub const FORMAT: &'static str = "%Y-%m-%d";

    /// `YYYY-MM-DD` 形式の文字列から誕生日を作成する
    ///
    /// # エラー
    ///
    /// - 書式が不正、または存在しない日付
    /// - 1970-01-01 より前の日付
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let date = NaiveDate::parse_from_str(value, Self::FORMAT).map_err(|_| {
            DomainError::Validation(format!("誕生日の形式が不正です: {}", value))
        })?;
        if date < DateTime::<Utc>::UNIX_EPOCH.date_naive() {
            return Err(DomainError::Validation(
                "誕生日は 1970-01-01 以降である必要があります".to_string(),
            ));
        }
        Ok(Self(date))
    }

    /// UNIX 秒から誕生日を復元する
    ///
    /// 表現できない巨大な値は UNIX エポックとして扱う。
    pub fn from_unix_seconds(secs: u64) -> Self {
        let date = i64::try_from(secs)
            .ok()
            .and_then(|s| DateTime::from_timestamp(s, 0))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
            .date_naive();
        Self(date)
    }

    /// UTC 0 時の UNIX 秒に変換する
    pub fn to_unix_seconds(&self) -> u64 {
        let secs = self.0.and_time(NaiveTime::MIN).and_utc().timestamp();
        // parse で 1970-01-01 以降に限定している
        u64::try_from(secs).unwrap_or(0)
    }
}

impl std::fmt::Display for Birthday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}
