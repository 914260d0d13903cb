//! Report runners. Each runner opens its own read-only connection, does its
//! work, and logs instead of propagating failures: a failed report leaves no
//! artifact behind and never stops the next one.

use crate::aggregate::{bucket_commits, package_counts};
use crate::config::Settings;
use crate::contributors::{top_contributors, write_report};
use crate::error::Result;
use crate::model::{
    BucketSeries, ColumnInfo, ContributorReport, Granularity, PackageCount, PercentChange, TrendComparison,
    TrendWindow,
};
use crate::render::{self, ChartMeta};
use crate::store::CommitStore;
use crate::trend::compare_trends;
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{error, info, warn};

fn connect(settings: &Settings, purpose: &str) -> Result<CommitStore> {
    let store = CommitStore::open(&settings.database)?;
    info!("Connected to {} for {purpose}.", store.path().display());
    Ok(store)
}

pub fn describe(settings: &Settings) -> Option<Vec<ColumnInfo>> {
    let run = || -> Result<Vec<ColumnInfo>> {
        let store = connect(settings, "describing the commits table")?;
        store.describe()
    };
    run().map_err(|e| error!("An error occurred while describing the commits table: {e}")).ok()
}

/// Bar chart of total commits per package.
pub fn run_counts(settings: &Settings) -> Option<(Vec<PackageCount>, PathBuf)> {
    let run = || -> Result<(Vec<PackageCount>, PathBuf)> {
        let store = connect(settings, "analysis")?;
        let counts = package_counts(&store, &settings.packages)?;
        info!("Fetched commit counts per package.");

        let image = render::render_bar(&counts, &ChartMeta::for_counts());
        let path = settings.visualizations_dir.join(render::COUNTS_FILE);
        render::save(&image, &path)?;
        info!("Saved commit counts bar chart as {}.", path.display());
        Ok((counts, path))
    };
    run().map_err(|e| error!("An error occurred during analysis: {e}")).ok()
}

/// Line chart of bucketed commit counts for every configured package.
pub fn run_series(settings: &Settings, granularity: Granularity) -> Option<(BucketSeries, PathBuf)> {
    let run = || -> Result<(BucketSeries, PathBuf)> {
        let store = connect(settings, &format!("visualizing {granularity} commits"))?;
        let series = bucket_commits(&store, granularity, &settings.packages)?;
        info!("Fetched commit counts per package, {granularity}.");

        for package in &settings.packages {
            let buckets = series.buckets(package).len();
            if buckets == 0 {
                info!("No {granularity} commits to plot for {package}");
            } else {
                info!("finished plotting {package} {granularity} ({buckets} buckets)");
            }
        }

        let meta = ChartMeta::for_series(granularity, &settings.packages);
        let image = render::render_series(&series, &meta);
        let path = settings.visualizations_dir.join(granularity.file_name());
        render::save(&image, &path)?;
        info!("finished plotting commits per {granularity} bucket into {}", path.display());
        Ok((series, path))
    };
    run()
        .map_err(|e| error!("An error occurred during {granularity} visualizations: {e}"))
        .ok()
}

pub fn run_all_series(settings: &Settings) -> Vec<(BucketSeries, PathBuf)> {
    Granularity::ALL
        .iter()
        .filter_map(|granularity| run_series(settings, *granularity))
        .collect()
}

/// Ranks the recent non-bot committers of `package` and writes their report.
pub fn run_contributors(settings: &Settings, package: &str) -> Option<ContributorReport> {
    let run = || -> Result<ContributorReport> {
        let store = connect(settings, "obtaining recent commit users that aren't bots")?;
        let ranking = top_contributors(&store, package, settings.window_size, &settings.bot_marker)?;
        let path = write_report(&settings.reports_dir, package, settings.window_size, &ranking)?;
        let unique_authors = ranking.len();
        info!(
            "Wrote meaningful commit users for {package} to file '{}' with {unique_authors} unique authors.",
            path.display()
        );
        Ok(ContributorReport {
            package: package.to_string(),
            path,
            ranking,
            unique_authors,
        })
    };
    run()
        .map_err(|e| error!("An error occurred while obtaining commit users for {package}: {e}"))
        .ok()
}

/// Runs the contributor report for every configured package. Packages whose
/// report failed are missing from the result.
pub fn run_contributors_batch(settings: &Settings, show_progress: bool) -> Vec<ContributorReport> {
    let pb = if show_progress {
        let pb = ProgressBar::new(settings.packages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut reports = Vec::with_capacity(settings.packages.len());
    for package in &settings.packages {
        pb.set_message(package.clone());
        if let Some(report) = run_contributors(settings, package) {
            reports.push(report);
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    reports
}

/// Three- and six-month comparisons for `package`, anchored at midnight UTC
/// of `today`.
pub fn run_trends(settings: &Settings, package: &str, today: NaiveDate) -> Option<Vec<TrendComparison>> {
    let run = || -> Result<Vec<TrendComparison>> {
        let store = connect(settings, "comparing commit trends in past 3, 6 and earlier months")?;
        let trends = TrendWindow::ALL
            .iter()
            .map(|window| compare_trends(&store, package, *window, today))
            .collect::<Result<Vec<_>>>()?;
        for trend in &trends {
            if trend.change == PercentChange::Undefined {
                warn!(
                    "Trend for {package} over {} months is undefined: no commits in the prior window",
                    trend.window_months
                );
            }
        }
        Ok(trends)
    };
    run()
        .map_err(|e| error!("An error occurred trying to compare trends for {package}: {e}"))
        .ok()
}
