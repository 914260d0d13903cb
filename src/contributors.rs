use crate::error::{PulseError, Result};
use crate::model::ContributorRanking;
use crate::store::CommitStore;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Ranks the non-bot authors among the `window_size` most recent commits of
/// `package`. Authors containing `marker` (case-sensitive) are dropped after
/// the window is taken, so bots still consume window slots.
pub fn top_contributors(
    store: &CommitStore,
    package: &str,
    window_size: usize,
    marker: &str,
) -> Result<Vec<ContributorRanking>> {
    let ranking = store
        .recent_author_counts(package, window_size, marker)?
        .into_iter()
        .map(|(author, commit_count)| ContributorRanking {
            package: package.to_string(),
            author,
            commit_count,
        })
        .collect();
    Ok(ranking)
}

/// Report file for `package` inside `dir`. Package names that could escape
/// `dir` are rejected.
pub fn report_path(dir: &Path, package: &str, window_size: usize) -> Result<PathBuf> {
    if package.is_empty() || package == "." || package == ".." || package.contains(['/', '\\', '\0']) {
        return Err(PulseError::Parse(format!(
            "Package name {package:?} cannot be used as a report file name"
        )));
    }
    Ok(dir.join(format!("{package}_last{window_size}commitusers.txt")))
}

/// Writes the ranking as a plain-text report, creating `dir` if needed.
pub fn write_report(
    dir: &Path,
    package: &str,
    window_size: usize,
    ranking: &[ContributorRanking],
) -> Result<PathBuf> {
    let path = report_path(dir, package, window_size)?;
    fs::create_dir_all(dir)?;

    let mut out = BufWriter::new(File::create(&path)?);
    writeln!(
        out,
        "Meaningful commit users (non-bot authors) in the last {window_size} commits for package '{package}':"
    )?;
    writeln!(out)?;
    for entry in ranking {
        writeln!(out, "{}: {} commits", entry.author, entry.commit_count)?;
    }
    out.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn report_lists_one_line_per_author() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("reports");
        let ranking = vec![
            ContributorRanking { package: "numpy".into(), author: "carol".into(), commit_count: 5 },
            ContributorRanking { package: "numpy".into(), author: "alice".into(), commit_count: 2 },
        ];

        let path = write_report(&nested, "numpy", 1000, &ranking).unwrap();
        assert_eq!(path, nested.join("numpy_last1000commitusers.txt"));

        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Meaningful commit users (non-bot authors) in the last 1000 commits for package 'numpy':",
                "",
                "carol: 5 commits",
                "alice: 2 commits",
            ]
        );
    }

    #[test]
    fn unwritable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        assert!(write_report(&blocker, "numpy", 1000, &[]).is_err());
    }

    #[test]
    fn package_names_cannot_leave_the_report_directory() {
        let dir = tempdir().unwrap();
        let reports = dir.path().join("reports");
        for package in ["../x", "a/b", "a\\b", "..", ""] {
            assert!(report_path(&reports, package, 1000).is_err(), "{package:?} accepted");
            assert!(write_report(&reports, package, 1000, &[]).is_err());
        }
        assert!(!dir.path().join("x_last1000commitusers.txt").exists());
        assert!(report_path(&reports, "scikit-learn", 1000).is_ok());
    }
}
