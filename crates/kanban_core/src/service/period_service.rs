//! Period use-case service.
//!
//! # Invariants
//! - Periods are validated by `validate_period_data` before persistence.
//! - Created periods are returned as read back from storage.

use crate::model::period::{Period, PeriodId};
use crate::model::validation::validate_period_data;
use crate::repo::period_repo::PeriodRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::NaiveDate;
use log::info;

/// Use-case service wrapper for period operations.
pub struct PeriodService<R: PeriodRepository> {
    repo: R,
}

impl<R: PeriodRepository> PeriodService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new period.
    ///
    /// # Errors
    /// - `RepoError::Validation` for blank names, unparsable dates, an end
    ///   before the start, or a name that already exists.
    pub fn create_period(
        &self,
        name: &str,
        start_date: &str,
        end_date: &str,
    ) -> RepoResult<Period> {
        let period = validate_period_data(name, start_date, end_date)?;
        let id = self.repo.create_period(&period)?;

        let created = self.repo.get_period(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created period {id} not found in read-back"))
        })?;
        info!(
            "event=period_create module=service status=ok period_id={} days={}",
            created.id,
            created.length_days()
        );
        Ok(created)
    }

    pub fn get_period(&self, id: PeriodId) -> RepoResult<Option<Period>> {
        self.repo.get_period(id)
    }

    /// Looks a period up by its (trimmed) name.
    pub fn get_period_by_name(&self, name: &str) -> RepoResult<Option<Period>> {
        self.repo.get_period_by_name(name)
    }

    /// Lists every period ordered by start date.
    pub fn list_periods(&self) -> RepoResult<Vec<Period>> {
        self.repo.list_periods()
    }

    /// Returns the period containing `date`, most recently created first.
    pub fn current_period_on(&self, date: NaiveDate) -> RepoResult<Option<Period>> {
        self.repo.period_containing(date)
    }
}
