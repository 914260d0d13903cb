#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Builds a `commits` table the way the ingestion side lays it out.
pub struct Fixture {
    pub path: PathBuf,
    conn: Connection,
}

impl Fixture {
    pub fn create(dir: &Path) -> Self {
        let path = dir.join("packages.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE commits (
                package TEXT,
                author TEXT,
                date TIMESTAMP
            );",
        )
        .unwrap();
        Self { path, conn }
    }

    pub fn add(&mut self, package: &str, author: &str, date: DateTime<Utc>) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO commits (package, author, date) VALUES (?1, ?2, ?3)",
                params![package, author, date],
            )
            .unwrap();
        self
    }

    pub fn add_undated(&mut self, package: &str, author: &str) -> &mut Self {
        self.conn
            .execute(
                "INSERT INTO commits (package, author, date) VALUES (?1, ?2, NULL)",
                params![package, author],
            )
            .unwrap();
        self
    }

    pub fn add_many<'a, I>(&mut self, package: &str, rows: I) -> &mut Self
    where
        I: IntoIterator<Item = (&'a str, DateTime<Utc>)>,
    {
        let tx = self.conn.transaction().unwrap();
        {
            let mut stmt = tx
                .prepare("INSERT INTO commits (package, author, date) VALUES (?1, ?2, ?3)")
                .unwrap();
            for (author, date) in rows {
                stmt.execute(params![package, author, date]).unwrap();
            }
        }
        tx.commit().unwrap();
        self
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 1500 numpy commits 11 hours apart from 2023-01-01: per 15 commits,
/// 4 by alice, 6 by bob[bot], 5 by carol (400 / 600 / 500 overall).
pub fn numpy_history() -> Vec<(&'static str, DateTime<Utc>)> {
    let start = at(2023, 1, 1, 0, 0);
    (0..1500)
        .map(|i| {
            let author = match i % 15 {
                0..=3 => "alice",
                4..=9 => "bob[bot]",
                _ => "carol",
            };
            (author, start + Duration::hours(11 * i as i64))
        })
        .collect()
}
