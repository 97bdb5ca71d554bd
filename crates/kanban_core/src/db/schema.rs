//! Read-only schema verification.
//!
//! # Responsibility
//! - Compare the live table structure with the structure `create_schema`
//!   produces and report every difference.
//!
//! # Invariants
//! - Verification never mutates the database.
//! - Extra tables or columns are tolerated; missing or mismatched ones are not.

use super::DbResult;
use rusqlite::Connection;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

pub const PERIODS_TABLE: &str = "performance_periods";
pub const TASKS_TABLE: &str = "tasks";

struct ColumnSpec {
    name: &'static str,
    sql_type: &'static str,
    not_null: bool,
    primary_key: bool,
    unique: bool,
}

const fn column(
    name: &'static str,
    sql_type: &'static str,
    not_null: bool,
    primary_key: bool,
) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type,
        not_null,
        primary_key,
        unique: false,
    }
}

const fn unique_column(name: &'static str, sql_type: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        sql_type,
        not_null: true,
        primary_key: false,
        unique: true,
    }
}

struct TableSpec {
    name: &'static str,
    columns: &'static [ColumnSpec],
}

struct ForeignKeySpec {
    table: &'static str,
    column: &'static str,
    references_table: &'static str,
    references_column: &'static str,
}

const REQUIRED_TABLES: &[TableSpec] = &[
    TableSpec {
        name: PERIODS_TABLE,
        columns: &[
            column("id", "INTEGER", false, true),
            column("start_date", "TEXT", true, false),
            column("end_date", "TEXT", true, false),
            unique_column("name", "TEXT"),
        ],
    },
    TableSpec {
        name: TASKS_TABLE,
        columns: &[
            column("id", "INTEGER", false, true),
            column("title", "TEXT", true, false),
            column("description", "TEXT", false, false),
            column("status", "TEXT", true, false),
            column("resource", "TEXT", false, false),
            column("project", "TEXT", true, false),
            column("period_id", "INTEGER", false, false),
            column("created_datetime", "TEXT", true, false),
            column("todo_datetime", "TEXT", false, false),
            column("inwork_datetime", "TEXT", false, false),
            column("completed_datetime", "TEXT", false, false),
        ],
    },
];

const REQUIRED_FOREIGN_KEYS: &[ForeignKeySpec] = &[ForeignKeySpec {
    table: TASKS_TABLE,
    column: "period_id",
    references_table: PERIODS_TABLE,
    references_column: "id",
}];

/// One structural difference between the live schema and the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaIssue {
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    ColumnType {
        table: &'static str,
        column: &'static str,
        expected: &'static str,
        found: String,
    },
    NotNullMismatch {
        table: &'static str,
        column: &'static str,
        expected: bool,
    },
    PrimaryKeyMismatch {
        table: &'static str,
        column: &'static str,
        expected: bool,
    },
    /// No single-column unique index covers the column.
    MissingUnique {
        table: &'static str,
        column: &'static str,
    },
    MissingForeignKey {
        table: &'static str,
        column: &'static str,
        references: &'static str,
    },
}

impl Display for SchemaIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTable(table) => write!(f, "missing table `{table}`"),
            Self::MissingColumn { table, column } => {
                write!(f, "missing column `{table}.{column}`")
            }
            Self::ColumnType {
                table,
                column,
                expected,
                found,
            } => write!(
                f,
                "column `{table}.{column}` has type `{found}`, expected `{expected}`"
            ),
            Self::NotNullMismatch {
                table,
                column,
                expected,
            } => write!(
                f,
                "column `{table}.{column}` NOT NULL constraint should be {expected}"
            ),
            Self::PrimaryKeyMismatch {
                table,
                column,
                expected,
            } => write!(
                f,
                "column `{table}.{column}` primary key flag should be {expected}"
            ),
            Self::MissingUnique { table, column } => {
                write!(f, "column `{table}.{column}` is missing its UNIQUE constraint")
            }
            Self::MissingForeignKey {
                table,
                column,
                references,
            } => write!(
                f,
                "missing foreign key `{table}.{column}` -> `{references}`"
            ),
        }
    }
}

/// Outcome of a schema verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub issues: Vec<SchemaIssue>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

struct LiveColumn {
    sql_type: String,
    not_null: bool,
    primary_key: bool,
}

/// Inspects `sqlite_master` and the table pragmas and reports mismatches.
///
/// Returns `Err` only for transport failures; structural problems are
/// reported through `SchemaReport::issues`.
pub fn verify_schema(conn: &Connection) -> DbResult<SchemaReport> {
    let mut report = SchemaReport::default();

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table.name)? {
            report.issues.push(SchemaIssue::MissingTable(table.name));
            continue;
        }

        let live = live_columns(conn, table.name)?;
        let unique = unique_columns(conn, table.name)?;
        for spec in table.columns {
            let Some(found) = live.get(spec.name) else {
                report.issues.push(SchemaIssue::MissingColumn {
                    table: table.name,
                    column: spec.name,
                });
                continue;
            };

            if !found.sql_type.eq_ignore_ascii_case(spec.sql_type) {
                report.issues.push(SchemaIssue::ColumnType {
                    table: table.name,
                    column: spec.name,
                    expected: spec.sql_type,
                    found: found.sql_type.clone(),
                });
            }
            if found.not_null != spec.not_null {
                report.issues.push(SchemaIssue::NotNullMismatch {
                    table: table.name,
                    column: spec.name,
                    expected: spec.not_null,
                });
            }
            if found.primary_key != spec.primary_key {
                report.issues.push(SchemaIssue::PrimaryKeyMismatch {
                    table: table.name,
                    column: spec.name,
                    expected: spec.primary_key,
                });
            }
            if spec.unique && !unique.contains(spec.name) {
                report.issues.push(SchemaIssue::MissingUnique {
                    table: table.name,
                    column: spec.name,
                });
            }
        }
    }

    for fk in REQUIRED_FOREIGN_KEYS {
        if !table_exists(conn, fk.table)? {
            continue;
        }
        if !foreign_key_exists(conn, fk)? {
            report.issues.push(SchemaIssue::MissingForeignKey {
                table: fk.table,
                column: fk.column,
                references: fk.references_table,
            });
        }
    }

    Ok(report)
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn live_columns(conn: &Connection, table: &str) -> DbResult<HashMap<String, LiveColumn>> {
    let mut stmt = conn.prepare(
        "SELECT name, type, \"notnull\", pk
         FROM pragma_table_info(?1);",
    )?;
    let mut rows = stmt.query([table])?;
    let mut columns = HashMap::new();

    while let Some(row) = rows.next()? {
        let name: String = row.get(0)?;
        columns.insert(
            name,
            LiveColumn {
                sql_type: row.get(1)?,
                not_null: row.get::<_, i64>(2)? != 0,
                primary_key: row.get::<_, i64>(3)? != 0,
            },
        );
    }

    Ok(columns)
}

/// Columns covered on their own by a unique index (including the automatic
/// indexes behind inline `UNIQUE` constraints).
fn unique_columns(conn: &Connection, table: &str) -> DbResult<HashSet<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM pragma_index_list(?1)
         WHERE \"unique\" = 1 AND partial = 0;",
    )?;
    let indexes = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut info = conn.prepare("SELECT name FROM pragma_index_info(?1);")?;
    let mut columns = HashSet::new();
    for index in indexes {
        let indexed = info
            .query_map([&index], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        if let [Some(column)] = indexed.as_slice() {
            columns.insert(column.clone());
        }
    }

    Ok(columns)
}

fn foreign_key_exists(conn: &Connection, fk: &ForeignKeySpec) -> DbResult<bool> {
    let mut stmt = conn.prepare(
        "SELECT \"table\", \"from\", \"to\"
         FROM pragma_foreign_key_list(?1);",
    )?;
    let mut rows = stmt.query([fk.table])?;

    while let Some(row) = rows.next()? {
        let parent: String = row.get(0)?;
        let from: String = row.get(1)?;
        // A NULL target column means the parent's primary key.
        let to: Option<String> = row.get(2)?;
        let to_matches = to.map_or(true, |to| to == fk.references_column);

        if parent == fk.references_table && from == fk.column && to_matches {
            return Ok(true);
        }
    }

    Ok(false)
}
