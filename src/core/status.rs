//! Classification of recalculated items for status indicators.

use crate::domain::Item;

/// Number of partial-coverage buckets.
pub const PERCENT_BUCKETS: i64 = 4;

/// How far an item is from being affordable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeedStatus {
    /// Fully covered by the available cash.
    Enough,
    /// Cost unknown; nothing can be projected.
    Unknown,
    /// Partially covered; `bucket` is in `0..PERCENT_BUCKETS`.
    Partial { bucket: u8 },
    /// Nothing covered yet.
    Empty,
}

/// Warning level for long accumulation periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MonthsWarning {
    None,
    OverHalfYear,
    OverYear,
    OverYearAndHalf,
}

impl NeedStatus {
    pub fn of(item: &Item) -> Self {
        let derived = &item.derived;
        match derived.need_cash {
            None => NeedStatus::Unknown,
            Some(0) => NeedStatus::Enough,
            Some(_) => match derived.avail_cash {
                Some(avail) if avail > 0 && derived.sum > 0 => {
                    let bucket = i128::from(avail) * i128::from(PERCENT_BUCKETS) / i128::from(derived.sum);
                    NeedStatus::Partial {
                        bucket: bucket.clamp(0, i128::from(PERCENT_BUCKETS - 1)) as u8,
                    }
                }
                _ => NeedStatus::Empty,
            },
        }
    }
}

impl MonthsWarning {
    pub fn of(item: &Item) -> Self {
        match item.derived.need_months {
            Some(months) if months > 18 => MonthsWarning::OverYearAndHalf,
            Some(months) if months > 12 => MonthsWarning::OverYear,
            Some(months) if months > 6 => MonthsWarning::OverHalfYear,
            _ => MonthsWarning::None,
        }
    }
}
