use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Cadence of a recurring rule.
///
/// Stored as its lowercase name. Values written by other tools that this crate
/// does not recognize are preserved in [`Frequency::Other`] and advance monthly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    Weekly,
    Biweekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
    Other(String),
}

impl Frequency {
    /// Returns the next occurrence after `from`.
    ///
    /// Day-based cadences add calendar days. Month-based cadences keep the day of
    /// month and clamp to the last day of the target month when it is shorter,
    /// so `2026-01-31` advanced monthly becomes `2026-02-28`.
    pub fn advance(&self, from: NaiveDate) -> NaiveDate {
        match self {
            Frequency::Weekly => from + Duration::days(7),
            Frequency::Biweekly => from + Duration::days(14),
            Frequency::Monthly | Frequency::Other(_) => shift_month(from, 1),
            Frequency::Quarterly => shift_month(from, 3),
            Frequency::Yearly => shift_year(from, 1),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Frequency::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
            Frequency::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Frequency::Weekly => "Weekly".into(),
            Frequency::Biweekly => "Bi-weekly".into(),
            Frequency::Monthly => "Monthly".into(),
            Frequency::Quarterly => "Quarterly".into(),
            Frequency::Yearly => "Yearly".into(),
            Frequency::Other(raw) => format!("{} (monthly)", raw),
        }
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Frequency::Weekly,
            "biweekly" => Frequency::Biweekly,
            "monthly" => Frequency::Monthly,
            "quarterly" => Frequency::Quarterly,
            "yearly" => Frequency::Yearly,
            _ => Frequency::Other(value),
        }
    }
}

impl From<&str> for Frequency {
    fn from(value: &str) -> Self {
        Frequency::from(value.to_string())
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn shift_month(date: NaiveDate, months: u32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + months as i32;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}

fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day).unwrap_or(date)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
