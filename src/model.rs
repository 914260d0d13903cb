use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PACKAGES: [&str; 5] = ["scikit-learn", "pandas", "matplotlib", "plotly", "numpy"];
pub const DEFAULT_WINDOW_SIZE: usize = 1000;
pub const DEFAULT_BOT_MARKER: &str = "[bot]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Granularity::Hour => "hourly_commits.png",
            Granularity::Day => "daily_commits.png",
            Granularity::Week => "weekly_commits.png",
            Granularity::Month => "monthly_commits.png",
        }
    }

    pub fn adjective(&self) -> &'static str {
        match self {
            Granularity::Hour => "hourly",
            Granularity::Day => "daily",
            Granularity::Week => "weekly",
            Granularity::Month => "monthly",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Granularity::Hour => "Commits per Hour",
            Granularity::Day => "Commits per Day",
            Granularity::Week => "Commits per Week",
            Granularity::Month => "Commits per Month",
        }
    }

    pub fn x_label(&self) -> &'static str {
        match self {
            Granularity::Hour => "hours in the day",
            Granularity::Day => "days in the year",
            Granularity::Week => "weeks",
            Granularity::Month => "months",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.adjective())
    }
}

/// Key of a time bucket. Week keys are the Monday that starts the ISO week,
/// month keys the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum BucketKey {
    Hour(u32),
    DayOfYear(u32),
    Week(NaiveDate),
    Month(NaiveDate),
}

impl BucketKey {
    /// Position of the bucket on a numeric axis.
    pub fn position(&self) -> f64 {
        match self {
            BucketKey::Hour(h) => *h as f64,
            BucketKey::DayOfYear(d) => *d as f64,
            BucketKey::Week(date) | BucketKey::Month(date) => date.num_days_from_ce() as f64,
        }
    }

    pub fn label(&self) -> String {
        match self {
            BucketKey::Hour(h) => format!("{h:02}:00"),
            BucketKey::DayOfYear(d) => format!("day {d}"),
            BucketKey::Week(date) => date.format("%Y-%m-%d").to_string(),
            BucketKey::Month(date) => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketedCount {
    pub package: String,
    pub bucket: BucketKey,
    pub count: u64,
}

/// Per-package bucket counts, buckets ascending. Buckets without commits are
/// absent rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSeries {
    pub granularity: Granularity,
    pub packages: BTreeMap<String, Vec<(BucketKey, u64)>>,
}

impl BucketSeries {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            packages: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, entry: BucketedCount) {
        self.packages
            .entry(entry.package)
            .or_default()
            .push((entry.bucket, entry.count));
    }

    pub fn buckets(&self, package: &str) -> &[(BucketKey, u64)] {
        self.packages.get(package).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self, package: &str) -> u64 {
        self.buckets(package).iter().map(|(_, count)| count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.packages
            .values()
            .flat_map(|buckets| buckets.iter().map(|(_, count)| *count))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.values().all(Vec::is_empty)
    }

    pub fn entries(&self) -> impl Iterator<Item = BucketedCount> + '_ {
        self.packages.iter().flat_map(|(package, buckets)| {
            buckets.iter().map(move |(bucket, count)| BucketedCount {
                package: package.clone(),
                bucket: *bucket,
                count: *count,
            })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageCount {
    pub package: String,
    pub commit_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRanking {
    pub package: String,
    pub author: String,
    pub commit_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorReport {
    pub package: String,
    pub path: PathBuf,
    pub ranking: Vec<ContributorRanking>,
    pub unique_authors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendWindow {
    ThreeMonths,
    SixMonths,
}

impl TrendWindow {
    pub const ALL: [TrendWindow; 2] = [TrendWindow::ThreeMonths, TrendWindow::SixMonths];

    pub fn months(&self) -> u32 {
        match self {
            TrendWindow::ThreeMonths => 3,
            TrendWindow::SixMonths => 6,
        }
    }
}

/// Percent change between two windows. `Undefined` when the prior window
/// holds no commits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "percent", rename_all = "snake_case")]
pub enum PercentChange {
    Defined(f64),
    Undefined,
}

impl PercentChange {
    pub fn value(&self) -> Option<f64> {
        match self {
            PercentChange::Defined(v) => Some(*v),
            PercentChange::Undefined => None,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Defined(v) => write!(f, "{v:.2}%"),
            PercentChange::Undefined => f.write_str("undefined (no commits in prior window)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendComparison {
    pub package: String,
    pub window_months: u32,
    pub recent_count: u64,
    pub prior_count: u64,
    pub change: PercentChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub decl_type: String,
    pub not_null: bool,
}
