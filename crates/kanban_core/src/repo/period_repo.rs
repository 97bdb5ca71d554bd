//! Period repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist validated periods and answer period lookups.
//! - Resolve which period contains a given calendar date.
//!
//! # Invariants
//! - Dates are stored as ISO `YYYY-MM-DD` text.
//! - The duplicate-name lookup and the insert run in one transaction.
//! - Duplicate names surface as `DataError::DuplicatePeriod`; other
//!   constraint failures stay `RepoError::Db`.
//! - When several periods contain a date, the highest id (most recently
//!   created) wins.

use super::{date_to_db, parse_db_date, RepoError, RepoResult};
use crate::model::period::{Period, PeriodId};
use crate::model::validation::{DataError, ValidPeriod};
use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row, ToSql};

const PERIOD_SELECT_SQL: &str = "SELECT
    id,
    name,
    start_date,
    end_date
FROM performance_periods";

/// Repository interface for period operations.
pub trait PeriodRepository {
    fn create_period(&self, period: &ValidPeriod) -> RepoResult<PeriodId>;
    fn get_period(&self, id: PeriodId) -> RepoResult<Option<Period>>;
    fn get_period_by_name(&self, name: &str) -> RepoResult<Option<Period>>;
    /// All periods ordered by `start_date ASC, id ASC`.
    fn list_periods(&self) -> RepoResult<Vec<Period>>;
    fn period_containing(&self, date: NaiveDate) -> RepoResult<Option<Period>>;
}

/// SQLite-backed period repository.
pub struct SqlitePeriodRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePeriodRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PeriodRepository for SqlitePeriodRepository<'_> {
    fn create_period(&self, period: &ValidPeriod) -> RepoResult<PeriodId> {
        // Rolled back on drop unless committed.
        let tx = self.conn.unchecked_transaction()?;

        if self.get_period_by_name(&period.name)?.is_some() {
            return Err(DataError::DuplicatePeriod(period.name.clone()).into());
        }

        let inserted = tx.execute(
            "INSERT INTO performance_periods (name, start_date, end_date)
             VALUES (?1, ?2, ?3);",
            params![
                period.name.as_str(),
                date_to_db(period.start_date),
                date_to_db(period.end_date),
            ],
        );

        let id = match inserted {
            Ok(_) => tx.last_insert_rowid(),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                return Err(DataError::DuplicatePeriod(period.name.clone()).into());
            }
            Err(err) => return Err(err.into()),
        };

        tx.commit()?;
        Ok(id)
    }

    fn get_period(&self, id: PeriodId) -> RepoResult<Option<Period>> {
        self.query_one(&format!("{PERIOD_SELECT_SQL} WHERE id = ?1;"), id)
    }

    fn get_period_by_name(&self, name: &str) -> RepoResult<Option<Period>> {
        self.query_one(&format!("{PERIOD_SELECT_SQL} WHERE name = ?1;"), name.trim())
    }

    fn list_periods(&self) -> RepoResult<Vec<Period>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PERIOD_SELECT_SQL} ORDER BY start_date ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut periods = Vec::new();

        while let Some(row) = rows.next()? {
            periods.push(parse_period_row(row)?);
        }

        Ok(periods)
    }

    fn period_containing(&self, date: NaiveDate) -> RepoResult<Option<Period>> {
        self.query_one(
            &format!(
                "{PERIOD_SELECT_SQL}
                 WHERE date(start_date) <= date(?1)
                   AND date(end_date) >= date(?1)
                 ORDER BY id DESC
                 LIMIT 1;"
            ),
            date_to_db(date),
        )
    }
}

impl SqlitePeriodRepository<'_> {
    fn query_one(&self, sql: &str, param: impl ToSql) -> RepoResult<Option<Period>> {
        let mut stmt = self.conn.prepare(sql)?;
        let raw = stmt.query_row([param], RawPeriodRow::read).optional()?;
        raw.map(RawPeriodRow::into_period).transpose()
    }
}

struct RawPeriodRow {
    id: PeriodId,
    name: String,
    start_date: String,
    end_date: String,
}

impl RawPeriodRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
        })
    }

    fn into_period(self) -> RepoResult<Period> {
        let start_date = parse_db_date(&self.start_date, "performance_periods.start_date")?;
        let end_date = parse_db_date(&self.end_date, "performance_periods.end_date")?;
        if end_date < start_date {
            return Err(RepoError::InvalidData(format!(
                "period {} ends before it starts",
                self.id
            )));
        }

        Ok(Period {
            id: self.id,
            name: self.name,
            start_date,
            end_date,
        })
    }
}

fn parse_period_row(row: &Row<'_>) -> RepoResult<Period> {
    RawPeriodRow::read(row)?.into_period()
}
