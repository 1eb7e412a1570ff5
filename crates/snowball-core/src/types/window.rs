//! 조회 기간과 통계 주기.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SnowballError, SnowballResult};

/// `YYYYMMDD` 형식의 날짜를 파싱합니다.
pub fn parse_yyyymmdd(raw: &str) -> SnowballResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y%m%d")
        .map_err(|_| SnowballError::InvalidInput(format!("YYYYMMDD 형식이 아닙니다: {}", raw)))
}

/// 날짜를 `YYYYMMDD` 문자열로 변환합니다.
pub fn format_yyyymmdd(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// 기준일로 끝나는 조회 구간 (양 끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookbackWindow {
    /// 시작일
    pub start: NaiveDate,
    /// 종료일 (기준일)
    pub end: NaiveDate,
}

impl LookbackWindow {
    /// 기준일과 조회 연수로 구간을 계산합니다.
    ///
    /// 시작일은 `as_of - years * 365일`이며 윤년은 보정하지 않습니다.
    pub fn new(as_of: NaiveDate, years: u32) -> Self {
        Self {
            start: as_of - Duration::days(i64::from(years) * 365),
            end: as_of,
        }
    }

    /// 날짜가 구간 안에 있는지 여부.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// 구간의 일 수.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}~{}",
            format_yyyymmdd(self.start),
            format_yyyymmdd(self.end)
        )
    }
}

/// 통계 발표 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cycle {
    /// 일별 (`YYYYMMDD`)
    Daily,
    /// 월별 (`YYYYMM`)
    Monthly,
    /// 분기별 (`YYYYQn`)
    Quarterly,
    /// 연간 (`YYYY`)
    Yearly,
}

impl Cycle {
    /// ECOS 주기 코드에서 변환합니다. 지원하지 않는 주기(반년, 반월 등)는 `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "D" => Some(Self::Daily),
            "M" => Some(Self::Monthly),
            "Q" => Some(Self::Quarterly),
            "Y" | "A" => Some(Self::Yearly),
            _ => None,
        }
    }

    /// ECOS 주기 코드.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Daily => "D",
            Self::Monthly => "M",
            Self::Quarterly => "Q",
            Self::Yearly => "Y",
        }
    }

    /// 주기에 맞는 기간 문자열로 변환합니다 (검색 범위 지정용).
    pub fn format_period(&self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y%m%d").to_string(),
            Self::Monthly => date.format("%Y%m").to_string(),
            Self::Quarterly => format!("{}Q{}", date.year(), (date.month() - 1) / 3 + 1),
            Self::Yearly => date.format("%Y").to_string(),
        }
    }

    /// 기간 문자열을 날짜로 변환합니다.
    ///
    /// - 일별: 그대로
    /// - 월별: 해당 월의 말일
    /// - 분기별: 분기 첫날
    /// - 연간: 12월 31일
    pub fn parse_period(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        match self {
            Self::Daily => NaiveDate::parse_from_str(raw, "%Y%m%d").ok(),
            Self::Monthly => {
                if raw.len() != 6 {
                    return None;
                }
                let year: i32 = raw.get(..4)?.parse().ok()?;
                let month: u32 = raw.get(4..)?.parse().ok()?;
                month_end(year, month)
            }
            Self::Quarterly => {
                let (year, quarter) = raw.split_once('Q')?;
                let year: i32 = year.parse().ok()?;
                let quarter: u32 = quarter.parse().ok()?;
                if !(1..=4).contains(&quarter) {
                    return None;
                }
                NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
            }
            Self::Yearly => {
                if raw.len() != 4 {
                    return None;
                }
                NaiveDate::from_ymd_opt(raw.parse().ok()?, 12, 31)
            }
        }
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?;
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}
