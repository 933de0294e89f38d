use super::domain::ParseLabelError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Half-open day range: `from` is included, `to` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date < self.to
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days().max(0)
    }
}

/// Reporting window relative to an evaluation day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateWindow {
    WeekToDate,
    #[default]
    MonthToDate,
    YearToDate,
    Rolling {
        days: u32,
    },
    Range(DateRange),
    AllTime,
}

impl DateWindow {
    /// Bounds for this window as of `today`, inclusive of `today` itself.
    ///
    /// `AllTime` has no bound. Spans reaching past the calendar saturate at its ends.
    pub fn resolve(&self, today: NaiveDate) -> Option<DateRange> {
        let end = today.succ_opt().unwrap_or(NaiveDate::MAX);
        match self {
            Self::WeekToDate => {
                let offset = u64::from(today.weekday().num_days_from_monday());
                Some(DateRange::new(days_before(today, offset), end))
            }
            Self::MonthToDate => Some(DateRange::new(today.with_day(1)?, end)),
            Self::YearToDate => Some(DateRange::new(
                NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                end,
            )),
            Self::Rolling { days } => {
                let span = u64::from((*days).max(1));
                Some(DateRange::new(days_before(end, span), end))
            }
            Self::Range(range) => Some(*range),
            Self::AllTime => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::WeekToDate => "Week to date".to_string(),
            Self::MonthToDate => "Month to date".to_string(),
            Self::YearToDate => "Year to date".to_string(),
            Self::Rolling { days } => format!("Last {days} days"),
            Self::Range(range) => format!("{} to {}", range.from, range.to),
            Self::AllTime => "All time".to_string(),
        }
    }
}

fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeekToDate => f.write_str("wtd"),
            Self::MonthToDate => f.write_str("mtd"),
            Self::YearToDate => f.write_str("ytd"),
            Self::Rolling { days } => write!(f, "last{days}"),
            Self::Range(range) => write!(f, "{}..{}", range.from, range.to),
            Self::AllTime => f.write_str("all"),
        }
    }
}

impl FromStr for DateWindow {
    type Err = ParseLabelError;

    /// Accepts `wtd`, `mtd`, `ytd`, `all`, `lastN`, or `YYYY-MM-DD..YYYY-MM-DD`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "wtd" | "week" => return Ok(Self::WeekToDate),
            "mtd" | "month" => return Ok(Self::MonthToDate),
            "ytd" | "year" => return Ok(Self::YearToDate),
            "all" => return Ok(Self::AllTime),
            _ => {}
        }

        if let Some(days) = normalized.strip_prefix("last") {
            return days
                .parse::<u32>()
                .ok()
                .filter(|days| *days > 0)
                .map(|days| Self::Rolling { days })
                .ok_or_else(|| ParseLabelError::new("window", value));
        }

        if let Some((from, to)) = normalized.split_once("..") {
            let from = NaiveDate::parse_from_str(from, "%Y-%m-%d");
            let to = NaiveDate::parse_from_str(to, "%Y-%m-%d");
            if let (Ok(from), Ok(to)) = (from, to) {
                if from <= to {
                    return Ok(Self::Range(DateRange::new(from, to)));
                }
            }
        }

        Err(ParseLabelError::new("window", value))
    }
}

impl Serialize for DateWindow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
