use crate::error::{PulseError, Result};
use crate::model::{BucketKey, BucketSeries, BucketedCount, Granularity, PackageCount};
use crate::store::{CommitStore, RawBucket};
use chrono::{Datelike, NaiveDate};

/// Groups the commits of `packages` into time buckets. Packages without
/// commits, or not present in the store, do not appear in the result.
pub fn bucket_commits(
    store: &CommitStore,
    granularity: Granularity,
    packages: &[String],
) -> Result<BucketSeries> {
    let mut series = BucketSeries::new(granularity);
    for (package, raw, count) in store.bucket_counts(granularity, packages)? {
        let bucket = bucket_key(granularity, raw)?;
        series.push(BucketedCount { package, bucket, count });
    }
    for buckets in series.packages.values_mut() {
        buckets.sort_by_key(|(key, _)| *key);
    }
    Ok(series)
}

pub fn package_counts(store: &CommitStore, packages: &[String]) -> Result<Vec<PackageCount>> {
    store.package_counts(packages)
}

pub fn bucket_key(granularity: Granularity, raw: RawBucket) -> Result<BucketKey> {
    match (granularity, raw) {
        (Granularity::Hour, RawBucket::Number(h)) if (0..=23).contains(&h) => Ok(BucketKey::Hour(h as u32)),
        (Granularity::Day, RawBucket::Number(d)) if (1..=366).contains(&d) => {
            Ok(BucketKey::DayOfYear(d as u32))
        }
        (Granularity::Week, RawBucket::Date(date)) if week_start(date) == date => Ok(BucketKey::Week(date)),
        (Granularity::Month, RawBucket::Date(date)) if month_start(date) == date => Ok(BucketKey::Month(date)),
        (granularity, raw) => Err(PulseError::Parse(format!(
            "Bucket {raw:?} is out of range for {granularity} granularity"
        ))),
    }
}

/// Monday starting the ISO week of `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
