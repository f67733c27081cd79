//! # Clock（時刻プロバイダ）
//!
//! トークン発行などで `Utc::now()` を直接呼ばず、
//! テストで固定時刻を注入できるようにするための抽象化。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }

   /// UNIX 秒から固定時刻を作る
   ///
   /// 範囲外の値は UNIX エポックに丸める。
   pub fn at_unix(secs: i64) -> Self {
      Self::new(DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH))
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}
