use crate::model::{DEFAULT_BOT_MARKER, DEFAULT_PACKAGES, DEFAULT_WINDOW_SIZE};
use std::path::PathBuf;

/// Locations and knobs shared by every report.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: PathBuf,
    pub packages: Vec<String>,
    pub visualizations_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub window_size: usize,
    pub bot_marker: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("packages.db"),
            packages: DEFAULT_PACKAGES.iter().map(|p| p.to_string()).collect(),
            visualizations_dir: PathBuf::from("./visualizations"),
            reports_dir: PathBuf::from("./last_1000_commit_users"),
            window_size: DEFAULT_WINDOW_SIZE,
            bot_marker: DEFAULT_BOT_MARKER.to_string(),
        }
    }
}

impl Settings {
    pub fn with_database(mut self, database: impl Into<PathBuf>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.visualizations_dir = root.join("visualizations");
        self.reports_dir = root.join("last_1000_commit_users");
        self
    }

    /// Restricts the run to `package` when one is given.
    pub fn narrowed_to(self, package: Option<String>) -> Self {
        match package {
            Some(package) => self.with_packages([package]),
            None => self,
        }
    }
}
