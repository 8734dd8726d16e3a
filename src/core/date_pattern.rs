//! Date token recognition.
//!
//! Menu sheets write dates in several shapes. Each shape is a [`DateFormat`]
//! variant that owns its regex and knows what its capture groups mean, so the
//! recognizer never has to guess from the pattern text.

use crate::domain::model::CalendarDate;
use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static MONTH_DAY_KOREAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})월\s*(\d{1,2})일").unwrap());
static YEAR_MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4})\s*[-./]\s*(\d{1,2})\s*[-./]\s*(\d{1,2})").unwrap()
});
// 前後字元由 DateFormat::is_isolated 檢查，不放進 regex 以免吃掉相鄰的下一個日期
static SLASH_MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})").unwrap());
static DOT_MONTH_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})").unwrap());
static DAY_WITH_WEEKDAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})일\s*\([^)]*\)").unwrap());

/// Recognized date shapes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `1월 20일`
    MonthDayKorean,
    /// `2025-01-20`, `2025.01.20`, `2025/1/20`
    YearMonthDay,
    /// `01/20`
    SlashMonthDay,
    /// `1.20`
    DotMonthDay,
    /// `20일(월)`; the month comes from the reference date.
    DayWithWeekday,
}

impl DateFormat {
    pub const PRIORITY: [DateFormat; 5] = [
        DateFormat::MonthDayKorean,
        DateFormat::YearMonthDay,
        DateFormat::SlashMonthDay,
        DateFormat::DotMonthDay,
        DateFormat::DayWithWeekday,
    ];

    fn regex(self) -> &'static Regex {
        match self {
            DateFormat::MonthDayKorean => &MONTH_DAY_KOREAN_RE,
            DateFormat::YearMonthDay => &YEAR_MONTH_DAY_RE,
            DateFormat::SlashMonthDay => &SLASH_MONTH_DAY_RE,
            DateFormat::DotMonthDay => &DOT_MONTH_DAY_RE,
            DateFormat::DayWithWeekday => &DAY_WITH_WEEKDAY_RE,
        }
    }

    /// Capture groups -> raw date parts.
    fn parts(self, caps: &Captures<'_>, today: NaiveDate) -> Option<DateParts> {
        let number = |idx: usize| caps.get(idx)?.as_str().parse::<u32>().ok();
        match self {
            DateFormat::MonthDayKorean | DateFormat::SlashMonthDay | DateFormat::DotMonthDay => {
                Some(DateParts {
                    year: None,
                    month: number(1)?,
                    day: number(2)?,
                })
            }
            DateFormat::YearMonthDay => Some(DateParts {
                year: Some(caps.get(1)?.as_str().parse::<i32>().ok()?),
                month: number(2)?,
                day: number(3)?,
            }),
            DateFormat::DayWithWeekday => Some(DateParts {
                year: None,
                month: today.month(),
                day: number(1)?,
            }),
        }
    }

    /// `M/D` and `M.D` must not touch another digit or the same separator,
    /// so `(1.2.5.6)` and `650.5` are not dates. `M.D` right after `(` is an
    /// allergen code such as `(5.6)`.
    fn is_isolated(self, line: &str, start: usize, end: usize) -> bool {
        let (separator, opener) = match self {
            DateFormat::SlashMonthDay => ('/', None),
            DateFormat::DotMonthDay => ('.', Some('(')),
            _ => return true,
        };
        let touches = |c: char| c.is_ascii_digit() || c == separator;

        let before = line[..start].chars().next_back();
        let after = line[end..].chars().next();
        !before.is_some_and(|c| touches(c) || Some(c) == opener) && !after.is_some_and(touches)
    }

    fn resolve(self, caps: &Captures<'_>, today: NaiveDate) -> Option<CalendarDate> {
        let parts = self.parts(caps, today)?;
        let year = parts
            .year
            .unwrap_or_else(|| infer_year(parts.month, today, YearPolicy::CurrentYear));
        CalendarDate::from_ymd(year, parts.month, parts.day)
    }

    pub fn name(self) -> &'static str {
        match self {
            DateFormat::MonthDayKorean => "month-day-korean",
            DateFormat::YearMonthDay => "year-month-day",
            DateFormat::SlashMonthDay => "slash-month-day",
            DateFormat::DotMonthDay => "dot-month-day",
            DateFormat::DayWithWeekday => "day-with-weekday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateParts {
    year: Option<i32>,
    month: u32,
    day: u32,
}

/// How a missing year is filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearPolicy {
    /// Always the reference year.
    CurrentYear,
    /// Reference year, shifted across a December/January boundary.
    BoundaryCorrected,
}

pub fn infer_year(month: u32, today: NaiveDate, policy: YearPolicy) -> i32 {
    let year = today.year();
    match policy {
        YearPolicy::CurrentYear => year,
        YearPolicy::BoundaryCorrected => match (month, today.month()) {
            (12, 1) => year - 1,
            (1, 12) => year + 1,
            _ => year,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub date: CalendarDate,
    pub format: DateFormat,
}

/// What a line's date tokens amount to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    Valid(DateMatch),
    /// Looks like a date but is not a real day (`2월 30일`, `31일(화)` in April).
    Invalid(DateFormat),
}

/// Scan `line` for date tokens, trying formats in priority order.
///
/// The first hit that forms a real calendar date wins, even if an impossible
/// one (`13/2`, `2월 30일`) comes before it. A line with only impossible hits
/// yields [`DateToken::Invalid`].
pub fn scan(line: &str, today: NaiveDate) -> Option<DateToken> {
    let mut invalid = None;

    for format in DateFormat::PRIORITY {
        for caps in format.regex().captures_iter(line) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if !format.is_isolated(line, whole.start(), whole.end()) {
                continue;
            }
            match format.resolve(&caps, today) {
                Some(date) => return Some(DateToken::Valid(DateMatch { date, format })),
                None => {
                    invalid.get_or_insert(format);
                }
            }
        }
    }

    invalid.map(DateToken::Invalid)
}

/// First real calendar date in `line`.
pub fn recognize(line: &str, today: NaiveDate) -> Option<DateMatch> {
    match scan(line, today)? {
        DateToken::Valid(found) => Some(found),
        DateToken::Invalid(_) => None,
    }
}
