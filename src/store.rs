use crate::error::{PulseError, Result};
use crate::model::{ColumnInfo, Granularity, PackageCount};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, ToSql};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bucket value exactly as the database produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBucket {
    Number(i64),
    Date(NaiveDate),
}

/// Read-only handle on the `commits` table.
pub struct CommitStore {
    conn: Connection,
    path: PathBuf,
}

impl CommitStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %path.display(), "opened commit store read-only");
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn describe(&self) -> Result<Vec<ColumnInfo>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(commits)")?;
        let columns = stmt
            .query_map([], |row| {
                let not_null: i64 = row.get(3)?;
                Ok(ColumnInfo {
                    name: row.get(1)?,
                    decl_type: row.get(2)?,
                    not_null: not_null != 0,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if columns.is_empty() {
            return Err(PulseError::Parse(format!(
                "No commits table in {}",
                self.path.display()
            )));
        }
        Ok(columns)
    }

    /// Dated commits per package. Undated rows are skipped here as in
    /// `bucket_counts`, so bucket sums match these totals.
    pub fn package_counts(&self, packages: &[String]) -> Result<Vec<PackageCount>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT package, COUNT(*) AS package_count
             FROM commits
             WHERE date IS NOT NULL AND package IN ({})
             GROUP BY package
             ORDER BY package",
            placeholders(packages.len())
        );
        let mut stmt = self.conn.prepare(&query)?;
        let counts = stmt
            .query_map(rusqlite::params_from_iter(packages.iter()), |row| {
                let count: i64 = row.get(1)?;
                Ok(PackageCount {
                    package: row.get(0)?,
                    commit_count: count as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    /// Rows of `(package, bucket, count)` ordered by package then bucket.
    pub fn bucket_counts(
        &self,
        granularity: Granularity,
        packages: &[String],
    ) -> Result<Vec<(String, RawBucket, u64)>> {
        if packages.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT package, {} AS bucket, COUNT(*) AS commits
             FROM commits
             WHERE date IS NOT NULL AND package IN ({})
             GROUP BY package, bucket
             ORDER BY package, bucket",
            bucket_expr(granularity),
            placeholders(packages.len())
        );
        let mut stmt = self.conn.prepare(&query)?;
        let mut rows = stmt.query(rusqlite::params_from_iter(packages.iter()))?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let package: String = row.get(0)?;
            let bucket = match row.get_ref(1)? {
                ValueRef::Integer(n) => RawBucket::Number(n),
                ValueRef::Text(bytes) => {
                    let text = std::str::from_utf8(bytes)
                        .map_err(|e| PulseError::Parse(format!("Bucket is not UTF-8: {e}")))?;
                    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .map_err(|e| PulseError::InvalidDate(format!("{text}: {e}")))?;
                    RawBucket::Date(date)
                }
                ValueRef::Null => {
                    return Err(PulseError::InvalidDate(format!(
                        "Unparseable commit date for package {package}"
                    )))
                }
                other => {
                    return Err(PulseError::Parse(format!(
                        "Unexpected bucket type {:?} for package {package}",
                        other.data_type()
                    )))
                }
            };
            let count: i64 = row.get(2)?;
            out.push((package, bucket, count as u64));
        }
        Ok(out)
    }

    /// Commits of `package` dated in `[since, until)`; an open `until` means no upper bound.
    pub fn count_between(
        &self,
        package: &str,
        since: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
    ) -> Result<u64> {
        let mut query = String::from(
            "SELECT COUNT(*) FROM commits
             WHERE package = ? AND julianday(date) >= julianday(?)",
        );
        let mut to_bind: Vec<Box<dyn ToSql>> = Vec::new();
        to_bind.push(Box::new(package.to_string()));
        to_bind.push(Box::new(since));
        if let Some(until) = until {
            query.push_str(" AND julianday(date) < julianday(?)");
            to_bind.push(Box::new(until));
        }

        let bind_refs: Vec<&dyn ToSql> = to_bind.iter().map(|b| b.as_ref()).collect();
        let count: i64 = self
            .conn
            .query_row(&query, bind_refs.as_slice(), |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Author counts over the `window_size` most recent commits of `package`,
    /// skipping authors whose name contains `marker`. Sorted by count
    /// descending, then author.
    pub fn recent_author_counts(
        &self,
        package: &str,
        window_size: usize,
        marker: &str,
    ) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT author, COUNT(*) AS commits
             FROM (
                 SELECT author
                 FROM commits
                 WHERE package = ?1
                 ORDER BY julianday(date) DESC, rowid DESC
                 LIMIT ?2
             )
             WHERE ?3 = '' OR instr(author, ?3) = 0
             GROUP BY author
             ORDER BY commits DESC, author ASC",
        )?;
        let limit = i64::try_from(window_size).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![package, limit, marker], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get::<_, String>(0)?, count as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

// Week buckets start on Monday: step forward to Sunday, then back six days.
fn bucket_expr(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Hour => "CAST(strftime('%H', date) AS INTEGER)",
        Granularity::Day => "CAST(strftime('%j', date) AS INTEGER)",
        Granularity::Week => "date(date, 'weekday 0', '-6 days')",
        Granularity::Month => "date(date, 'start of month')",
    }
}
