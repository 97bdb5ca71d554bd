//! Input validation for periods and tasks.
//!
//! # Responsibility
//! - Reject semantically invalid period/task input before any SQL runs.
//! - Normalize accepted input (trimmed strings, parsed calendar dates).
//!
//! # Invariants
//! - Validation is pure; it never touches the database.
//! - Every rejection names the offending field.

use crate::model::task::{TaskId, TaskStatus};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static SLASH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})$").expect("valid slash date regex")
});
static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Input field a `DataError` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataField {
    PeriodName,
    StartDate,
    EndDate,
    TaskTitle,
    TaskProject,
    TaskStatus,
}

impl DataField {
    fn label(self) -> &'static str {
        match self {
            Self::PeriodName => "period name",
            Self::StartDate => "start date",
            Self::EndDate => "end date",
            Self::TaskTitle => "task title",
            Self::TaskProject => "project name",
            Self::TaskStatus => "task status",
        }
    }
}

/// Domain error for input that is well-formed transport-wise but invalid for
/// the kanban model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    EmptyField(DataField),
    InvalidDate {
        field: DataField,
        value: String,
    },
    EndBeforeStart {
        start: NaiveDate,
        end: NaiveDate,
    },
    DuplicatePeriod(String),
    InvalidTransition {
        task_id: TaskId,
        from: TaskStatus,
        to: TaskStatus,
    },
}

impl DataError {
    /// Field that failed validation.
    pub fn field(&self) -> DataField {
        match self {
            Self::EmptyField(field) | Self::InvalidDate { field, .. } => *field,
            Self::EndBeforeStart { .. } => DataField::EndDate,
            Self::DuplicatePeriod(_) => DataField::PeriodName,
            Self::InvalidTransition { .. } => DataField::TaskStatus,
        }
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(DataField::PeriodName) => write!(f, "Period name cannot be empty"),
            Self::EmptyField(DataField::TaskTitle) => write!(f, "Task title cannot be empty"),
            Self::EmptyField(DataField::TaskProject) => write!(f, "Project name cannot be empty"),
            Self::EmptyField(field) => write!(f, "Field `{}` cannot be empty", field.label()),
            Self::InvalidDate { field, value } => write!(
                f,
                "Invalid date format for {}: `{value}` (expected MM/DD/YY)",
                field.label()
            ),
            Self::EndBeforeStart { start, end } => write!(
                f,
                "End date cannot be before start date ({end} < {start})"
            ),
            Self::DuplicatePeriod(name) => write!(f, "Period `{name}` already exists"),
            Self::InvalidTransition { task_id, from, to } => write!(
                f,
                "Task {task_id} cannot move from `{}` to `{}`",
                from.as_str(),
                to.as_str()
            ),
        }
    }
}

impl Error for DataError {}

/// Period input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPeriod {
    /// Trimmed name.
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Task input that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTask {
    /// Trimmed title.
    pub title: String,
    /// Trimmed project.
    pub project: String,
}

/// Checks period input and returns it normalized.
///
/// # Errors
/// - `EmptyField(PeriodName)` for a blank name.
/// - `InvalidDate` when either date does not parse.
/// - `EndBeforeStart` when `end < start`. Equal dates are accepted.
pub fn validate_period_data(
    name: &str,
    start_date: &str,
    end_date: &str,
) -> Result<ValidPeriod, DataError> {
    let name = non_empty(name, DataField::PeriodName)?;
    let start = parse_date_field(start_date, DataField::StartDate)?;
    let end = parse_date_field(end_date, DataField::EndDate)?;

    if end < start {
        return Err(DataError::EndBeforeStart { start, end });
    }

    Ok(ValidPeriod {
        name,
        start_date: start,
        end_date: end,
    })
}

/// Checks task input and returns it normalized.
pub fn validate_task_data(title: &str, project: &str) -> Result<ValidTask, DataError> {
    Ok(ValidTask {
        title: non_empty(title, DataField::TaskTitle)?,
        project: non_empty(project, DataField::TaskProject)?,
    })
}

/// Parses a period date.
///
/// Accepts `M/D/YY`, `MM/DD/YYYY` and ISO `YYYY-MM-DD`. Two-digit years
/// `00..=69` map to 20xx and `70..=99` to 19xx.
pub fn parse_period_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();

    if ISO_DATE_RE.is_match(input) {
        return NaiveDate::parse_from_str(input, "%Y-%m-%d").ok();
    }

    let captures = SLASH_DATE_RE.captures(input)?;
    let month: u32 = captures[1].parse().ok()?;
    let day: u32 = captures[2].parse().ok()?;
    let year_text = &captures[3];
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() == 2 {
        year += if year < 70 { 2000 } else { 1900 };
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

fn non_empty(value: &str, field: DataField) -> Result<String, DataError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DataError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_date_field(value: &str, field: DataField) -> Result<NaiveDate, DataError> {
    parse_period_date(value).ok_or_else(|| DataError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::parse_period_date;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_unpadded_two_digit_year() {
        assert_eq!(parse_period_date("1/1/24"), Some(date(2024, 1, 1)));
        assert_eq!(parse_period_date(" 12/31/24 "), Some(date(2024, 12, 31)));
    }

    #[test]
    fn two_digit_years_pivot_at_seventy() {
        assert_eq!(parse_period_date("06/15/69"), Some(date(2069, 6, 15)));
        assert_eq!(parse_period_date("06/15/70"), Some(date(1970, 6, 15)));
    }

    #[test]
    fn parses_four_digit_year_and_iso() {
        assert_eq!(parse_period_date("02/29/2024"), Some(date(2024, 2, 29)));
        assert_eq!(parse_period_date("2025-01-15"), Some(date(2025, 1, 15)));
    }

    #[test]
    fn rejects_impossible_or_malformed_dates() {
        assert_eq!(parse_period_date("02/30/25"), None);
        assert_eq!(parse_period_date("13/01/25"), None);
        assert_eq!(parse_period_date("invalid-date"), None);
        assert_eq!(parse_period_date("1/1/123"), None);
        assert_eq!(parse_period_date(""), None);
    }
}
