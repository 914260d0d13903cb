use crate::error::{PulseError, Result};
use crate::model::{PercentChange, TrendComparison, TrendWindow};
use crate::store::CommitStore;
use chrono::{DateTime, Months, NaiveDate, TimeZone, Utc};

/// `(recent - prior) / prior * 100`, or `Undefined` when `prior` is zero.
pub fn percent_change(recent: u64, prior: u64) -> PercentChange {
    if prior == 0 {
        return PercentChange::Undefined;
    }
    PercentChange::Defined((recent as f64 - prior as f64) / prior as f64 * 100.0)
}

/// Start of the recent window and start of the prior window, both measured
/// back from midnight UTC of `today`.
pub fn window_bounds(today: NaiveDate, window: TrendWindow) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let months = window.months();
    let recent_start = today
        .checked_sub_months(Months::new(months))
        .ok_or_else(|| PulseError::InvalidDate(format!("{today} minus {months} months")))?;
    let prior_start = today
        .checked_sub_months(Months::new(months * 2))
        .ok_or_else(|| PulseError::InvalidDate(format!("{today} minus {} months", months * 2)))?;
    Ok((midnight(recent_start), midnight(prior_start)))
}

pub fn compare_trends(
    store: &CommitStore,
    package: &str,
    window: TrendWindow,
    today: NaiveDate,
) -> Result<TrendComparison> {
    let (recent_start, prior_start) = window_bounds(today, window)?;
    let recent_count = store.count_between(package, recent_start, None)?;
    let prior_count = store.count_between(package, prior_start, Some(recent_start))?;

    Ok(TrendComparison {
        package: package.to_string(),
        window_months: window.months(),
        recent_count,
        prior_count,
        change: percent_change(recent_count, prior_count),
    })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_percent_growth() {
        let change = percent_change(120, 100).value().unwrap();
        assert!((change - 20.0).abs() < 1e-9);
    }

    #[test]
    fn decline_is_negative() {
        assert_eq!(percent_change(50, 100), PercentChange::Defined(-50.0));
    }

    #[test]
    fn empty_prior_window_is_undefined() {
        assert_eq!(percent_change(10, 0), PercentChange::Undefined);
        assert_eq!(percent_change(0, 0), PercentChange::Undefined);
    }

    #[test]
    fn bounds_clamp_to_month_end() {
        let today = NaiveDate::from_ymd_opt(2024, 8, 31).unwrap();
        let (recent, prior) = window_bounds(today, TrendWindow::SixMonths).unwrap();
        assert_eq!(recent.date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(prior.date_naive(), NaiveDate::from_ymd_opt(2023, 8, 31).unwrap());
    }
}
