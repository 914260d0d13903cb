use crate::model::{BucketSeries, ColumnInfo, ContributorReport, PackageCount, TrendComparison};
use anyhow::Result;
use console::style;
use std::path::Path;

pub fn print_schema(columns: &[ColumnInfo]) {
    println!(
        "{:<20} {:<16} {:>8}",
        style("Column").bold(),
        style("Type").bold(),
        style("Nullable").bold()
    );
    println!("{}", "─".repeat(46));
    for column in columns {
        println!(
            "{:<20} {:<16} {:>8}",
            column.name,
            column.decl_type,
            if column.not_null { "NO" } else { "YES" }
        );
    }
}

pub fn print_counts(counts: &[PackageCount], chart: &Path) {
    println!("{:<24} {:>10}", style("Package").bold(), style("Commits").bold());
    println!("{}", "─".repeat(35));
    for entry in counts {
        println!("{:<24} {:>10}", entry.package, entry.commit_count);
    }
    println!("\nBar chart saved to {}", style(chart.display()).dim());
}

pub fn print_counts_json(counts: &[PackageCount]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(counts)?);
    Ok(())
}

pub fn print_series_summary(series: &BucketSeries, chart: &Path) {
    println!("{}", style(format!("{} commits", series.granularity)).bold());
    println!("{}", "─".repeat(50));
    for (package, buckets) in &series.packages {
        let peak = buckets.iter().max_by_key(|(_, count)| *count);
        match peak {
            Some((key, count)) => println!(
                "{:<16} total: {:>7}  buckets: {:>4}  peak: {} ({})",
                package,
                series.total(package),
                buckets.len(),
                key.label(),
                count
            ),
            None => println!("{:<16} no commits", package),
        }
    }
    println!("{} visualization in {}", series.granularity, style(chart.display()).dim());
}

/// One JSON array holding every requested series.
pub fn print_series_json(series: &[BucketSeries]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(series)?);
    Ok(())
}

pub fn print_series_ndjson(series: &BucketSeries) -> Result<()> {
    for entry in series.entries() {
        println!("{}", serde_json::to_string(&entry)?);
    }
    Ok(())
}

pub fn print_contributors(report: &ContributorReport) {
    println!(
        "Wrote meaningful commit users for {} to file '{}'",
        style(&report.package).bold(),
        report.path.display()
    );
    println!("   -  with {} unique authors.", style(report.unique_authors).cyan());
}

pub fn print_trends(package: &str, trends: &[TrendComparison]) {
    println!("{}", style(package).bold());
    for trend in trends {
        let months = trend.window_months;
        println!("PRE {months} month period: {},", trend.prior_count);
        println!("last {months} months: {}", trend.recent_count);
        let change = match trend.change.value() {
            Some(v) if v >= 0.0 => style(trend.change.to_string()).green(),
            Some(_) => style(trend.change.to_string()).red(),
            None => style(trend.change.to_string()).yellow(),
        };
        println!("    - percent change for {months} months: {change}");
    }
}

pub fn print_trends_json(trends: &[TrendComparison]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(trends)?);
    Ok(())
}
