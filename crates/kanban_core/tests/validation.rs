use chrono::NaiveDate;
use kanban_core::{validate_period_data, validate_task_data, DataError, DataField};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn valid_period_is_normalized() {
    let period = validate_period_data("  Sprint 1 ", "01/01/25", "01/15/25").unwrap();

    assert_eq!(period.name, "Sprint 1");
    assert_eq!(period.start_date, date(2025, 1, 1));
    assert_eq!(period.end_date, date(2025, 1, 15));
}

#[test]
fn single_day_period_is_valid() {
    let period = validate_period_data("Review day", "3/14/25", "2025-03-14").unwrap();
    assert_eq!(period.start_date, period.end_date);
}

#[test]
fn blank_period_name_is_rejected() {
    for name in ["", "   ", "\t\n"] {
        let err = validate_period_data(name, "01/01/25", "01/15/25").unwrap_err();
        assert_eq!(err, DataError::EmptyField(DataField::PeriodName));
        assert_eq!(err.to_string(), "Period name cannot be empty");
    }
}

#[test]
fn end_before_start_is_rejected() {
    let err = validate_period_data("Sprint 1", "02/01/25", "01/15/25").unwrap_err();

    assert_eq!(
        err,
        DataError::EndBeforeStart {
            start: date(2025, 2, 1),
            end: date(2025, 1, 15),
        }
    );
    assert_eq!(err.field(), DataField::EndDate);
    assert!(err
        .to_string()
        .contains("End date cannot be before start date"));
}

#[test]
fn unparsable_dates_name_the_field() {
    let err = validate_period_data("Test Period", "invalid-date", "12/31/24").unwrap_err();
    assert_eq!(err.field(), DataField::StartDate);
    assert!(err.to_string().contains("Invalid date format"));
    assert!(err.to_string().contains("invalid-date"));

    let err = validate_period_data("Test Period", "1/1/24", "12/32/24").unwrap_err();
    assert_eq!(err.field(), DataField::EndDate);
}

#[test]
fn name_is_checked_before_dates() {
    let err = validate_period_data("", "garbage", "garbage").unwrap_err();
    assert_eq!(err.field(), DataField::PeriodName);
}

#[test]
fn every_ordered_pair_in_a_month_validates() {
    for start_day in 1..=28 {
        for end_day in start_day..=28 {
            let start = format!("02/{start_day:02}/25");
            let end = format!("02/{end_day:02}/25");
            assert!(
                validate_period_data("Feb", &start, &end).is_ok(),
                "{start} -> {end} should validate"
            );
            if end_day > start_day {
                assert!(validate_period_data("Feb", &end, &start).is_err());
            }
        }
    }
}

#[test]
fn valid_task_is_trimmed() {
    let task = validate_task_data("  Write docs ", " Website ").unwrap();
    assert_eq!(task.title, "Write docs");
    assert_eq!(task.project, "Website");
}

#[test]
fn blank_task_fields_are_rejected() {
    let err = validate_task_data("", "Website").unwrap_err();
    assert_eq!(err.to_string(), "Task title cannot be empty");
    assert_eq!(err.field(), DataField::TaskTitle);

    let err = validate_task_data("Write docs", "   ").unwrap_err();
    assert_eq!(err.to_string(), "Project name cannot be empty");
    assert_eq!(err.field(), DataField::TaskProject);
}
