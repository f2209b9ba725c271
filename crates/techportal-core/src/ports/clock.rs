//! Clock port - 時刻の抽象化
//!
//! # 実装
//! - **SystemClock**: 本番用
//! - **FixedClock**: テスト用（常に同じ時刻）
//! - **ManualClock**: シナリオ再生用（時刻を進められる）

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// ClockError は表現できない時刻の指定
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClockError {
    #[error("timestamp out of range: {0} ms")]
    OutOfRange(i64),

    #[error("timestamp overflow: {base} ms + {offset} ms")]
    Overflow { base: i64, offset: i64 },
}

fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, ClockError> {
    DateTime::from_timestamp_millis(millis).ok_or(ClockError::OutOfRange(millis))
}

/// `base + offset` をオーバーフローなしで計算する
pub fn offset_millis(base: i64, offset: i64) -> Result<i64, ClockError> {
    base.checked_add(offset)
        .ok_or(ClockError::Overflow { base, offset })
}

/// Clock は現在時刻を提供
///
/// # テスト容易性
/// - trait により時刻を差し替え可能
/// - テストでは FixedClock / ManualClock を使用
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// epoch ミリ秒（ストレージに保存する形式）
    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// SystemClock は実際の現在時刻を返す
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// FixedClock は常に同じ時刻を返す
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn from_millis(millis: i64) -> Result<Self, ClockError> {
        Ok(Self::new(from_epoch_millis(millis)?))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }
}

/// ManualClock は呼び出し側が明示的に進める時計
///
/// シングルスレッド前提なので `Cell` で十分。
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn from_millis(millis: i64) -> Result<Self, ClockError> {
        Ok(Self::new(from_epoch_millis(millis)?))
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now.set(at);
    }

    /// 範囲外の値なら時刻は変えずにエラーを返す
    pub fn set_millis(&self, millis: i64) -> Result<(), ClockError> {
        self.set(from_epoch_millis(millis)?);
        Ok(())
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixed_clock_is_stable() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.now_millis(), at.timestamp_millis());
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::from_millis(1_000).unwrap();
        clock.advance(TimeDelta::days(6));
        assert_eq!(clock.now_millis(), 1_000 + 6 * 24 * 60 * 60 * 1000);

        clock.set_millis(5).unwrap();
        assert_eq!(clock.now_millis(), 5);
    }

    #[test]
    fn out_of_range_millis_are_rejected() {
        const TOO_LATE: i64 = 100_000_000_000_000_000;

        assert_eq!(
            FixedClock::from_millis(TOO_LATE).unwrap_err(),
            ClockError::OutOfRange(TOO_LATE)
        );
        assert!(ManualClock::from_millis(TOO_LATE).is_err());

        let clock = ManualClock::from_millis(1_000).unwrap();
        assert_eq!(clock.set_millis(TOO_LATE), Err(ClockError::OutOfRange(TOO_LATE)));
        assert_eq!(clock.now_millis(), 1_000);
    }

    #[test]
    fn offset_overflow_is_an_error() {
        assert_eq!(offset_millis(1_000, 500), Ok(1_500));
        assert_eq!(
            offset_millis(i64::MAX, 1),
            Err(ClockError::Overflow {
                base: i64::MAX,
                offset: 1
            })
        );
    }

    #[test]
    fn system_clock_moves_forward() {
        let a = SystemClock.now_millis();
        let b = SystemClock.now_millis();
        assert!(b >= a);
    }
}
