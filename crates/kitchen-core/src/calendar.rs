//! 參考時鐘與訂單池時間窗

use chrono::{Days, Local, NaiveDate};

use crate::{PlanError, Result};

/// 參考時鐘
///
/// 所有「今天」的判定都經由時鐘注入，避免各處直接讀取系統時間。
pub trait ReferenceClock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 系統時鐘（本地時區）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceClock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 固定時鐘（測試與重播用）
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl ReferenceClock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// 訂單池時間窗（含頭尾）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PoolWindow {
    /// 往前回溯天數
    pub const PAST_DAYS: u64 = 10;

    /// 往後展望天數
    pub const FUTURE_DAYS: u64 = 4;

    /// 以參考日期建立預設時間窗 `[today - 10, today + 4]`
    pub fn around(today: NaiveDate) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(Self::PAST_DAYS))
                .unwrap_or(NaiveDate::MIN),
            end: today
                .checked_add_days(Days::new(Self::FUTURE_DAYS))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// 以時鐘建立時間窗
    pub fn from_clock(clock: &dyn ReferenceClock) -> Self {
        Self::around(clock.today())
    }

    /// 自訂邊界（start > end 時自動對調）
    pub fn with_bounds(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 時間窗內的每一天（遞增）
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start.iter_days().take_while(|d| *d <= self.end).collect()
    }

    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }
}

/// 從起始日起連續七天
pub fn week_starting(start: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take(7).collect()
}

/// 解析 `YYYY-MM-DD` 日期
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| PlanError::InvalidDate(raw.to_string()))
}
