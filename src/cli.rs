use crate::config::Settings;
use crate::model::{Granularity, DEFAULT_BOT_MARKER, DEFAULT_PACKAGES, DEFAULT_WINDOW_SIZE};
use crate::{logging, output, report};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "pkgpulse")]
#[command(about = "Commit history reports for tracked packages: charts, trends and top contributors")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to the commits database", default_value = "packages.db")]
    pub database: PathBuf,

    #[arg(
        long,
        value_delimiter = ',',
        help = "Packages to report on, comma separated",
        default_values_t = DEFAULT_PACKAGES.map(String::from)
    )]
    pub packages: Vec<String>,

    #[arg(long, help = "Directory for chart images", default_value = "./visualizations")]
    pub visualizations: PathBuf,

    #[arg(long, help = "Directory for contributor reports", default_value = "./last_1000_commit_users")]
    pub reports: PathBuf,

    #[arg(long, help = "Append-only diagnostics log", default_value = "analysis.log")]
    pub log_file: PathBuf,

    #[arg(long, help = "Log level (error, warn, info, debug, trace)", default_value = "info")]
    pub log_level: String,
}

impl CommonArgs {
    pub fn settings(&self) -> Settings {
        Settings {
            database: self.database.clone(),
            packages: self.packages.clone(),
            visualizations_dir: self.visualizations.clone(),
            reports_dir: self.reports.clone(),
            ..Settings::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the schema of the commits table
    Describe,
    /// Bar chart of total commits per package
    Counts {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Line charts of commits per hour, day of year, week or month
    Series {
        #[arg(value_enum, help = "Granularities to plot (all when omitted)")]
        granularity: Vec<SeriesTarget>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Rank the recent non-bot committers of each package
    Contributors {
        #[arg(long, help = "Number of most recent commits to consider", default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,

        #[arg(long, help = "Author substring marking automated accounts", default_value = DEFAULT_BOT_MARKER)]
        marker: String,

        #[arg(long, help = "Only this package instead of every configured one")]
        package: Option<String>,
    },
    /// Compare the last 3 and 6 months against the periods before them
    Trends {
        #[arg(long, help = "Only this package instead of every configured one")]
        package: Option<String>,

        #[arg(long, help = "Reference date (YYYY-MM-DD), defaults to today")]
        as_of: Option<NaiveDate>,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeriesTarget {
    Hour,
    #[value(alias = "day-of-year", alias = "doy")]
    Day,
    Week,
    Month,
    All,
}

impl SeriesTarget {
    pub fn granularities(self) -> &'static [Granularity] {
        match self {
            SeriesTarget::Hour => &[Granularity::Hour],
            SeriesTarget::Day => &[Granularity::Day],
            SeriesTarget::Week => &[Granularity::Week],
            SeriesTarget::Month => &[Granularity::Month],
            SeriesTarget::All => &Granularity::ALL,
        }
    }
}

/// Granularities to plot, in order, without repeats. Nothing selected means all.
fn expand_targets(targets: &[SeriesTarget]) -> Vec<Granularity> {
    if targets.is_empty() {
        return Granularity::ALL.to_vec();
    }
    let mut out = Vec::new();
    for granularity in targets.iter().flat_map(|t| t.granularities()) {
        if !out.contains(granularity) {
            out.push(*granularity);
        }
    }
    out
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        logging::init(&self.common.log_file, &self.common.log_level)?;
        let settings = self.common.settings();
        info!(command = self.command.name(), "starting report");

        match self.command {
            Commands::Describe => {
                match report::describe(&settings) {
                    Some(columns) => output::print_schema(&columns),
                    None => report_failure("describe"),
                }
            }
            Commands::Counts { json } => match report::run_counts(&settings) {
                Some((counts, path)) if json => {
                    output::print_counts_json(&counts)?;
                    info!("bar chart written to {}", path.display());
                }
                Some((counts, path)) => output::print_counts(&counts, &path),
                None => report_failure("counts"),
            },
            Commands::Series { granularity, json, ndjson } => {
                let mut collected = Vec::new();
                for target in expand_targets(&granularity) {
                    match report::run_series(&settings, target) {
                        Some((series, _)) if json => collected.push(series),
                        Some((series, _)) if ndjson => output::print_series_ndjson(&series)?,
                        Some((series, path)) => output::print_series_summary(&series, &path),
                        None => report_failure(target.adjective()),
                    }
                }
                if json {
                    output::print_series_json(&collected)?;
                }
            }
            Commands::Contributors { window, marker, package } => {
                let settings = Settings {
                    window_size: window,
                    bot_marker: marker,
                    ..settings.narrowed_to(package)
                };
                let reports = report::run_contributors_batch(&settings, true);
                for report in &reports {
                    output::print_contributors(report);
                }
                if reports.len() < settings.packages.len() {
                    report_failure("contributors");
                }
            }
            Commands::Trends { package, as_of, json } => {
                let settings = settings.narrowed_to(package);
                let today = as_of.unwrap_or_else(|| chrono::Utc::now().date_naive());
                let mut all = Vec::new();
                for package in &settings.packages {
                    match report::run_trends(&settings, package, today) {
                        Some(trends) if json => all.extend(trends),
                        Some(trends) => {
                            output::print_trends(package, &trends);
                            println!();
                        }
                        None => report_failure(&format!("trends for {package}")),
                    }
                }
                if json {
                    output::print_trends_json(&all)?;
                }
            }
        }
        Ok(())
    }
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Describe => "describe",
            Commands::Counts { .. } => "counts",
            Commands::Series { .. } => "series",
            Commands::Contributors { .. } => "contributors",
            Commands::Trends { .. } => "trends",
        }
    }
}

fn report_failure(what: &str) {
    eprintln!(
        "{} {what} report failed; see the log for details",
        style("warning:").yellow().bold()
    );
}
