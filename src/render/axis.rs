use crate::model::{BucketSeries, Granularity};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Fraction of the way from `min` to `max`.
    pub fn scale(&self, value: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        (value - self.min) / (self.max - self.min)
    }
}

const HOUR_STRIDE: u32 = 3;
const DAY_STRIDE: u32 = 30;
const DATE_TICKS: usize = 6;

/// "12 AM", "1 AM", ... "11 PM".
pub fn hour_label(hour: u32) -> String {
    let hour = hour % 24;
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {suffix}")
}

pub fn x_axis(series: &BucketSeries) -> Axis {
    match series.granularity {
        Granularity::Hour => Axis {
            min: 0.0,
            max: 24.0,
            ticks: (0..=24)
                .step_by(HOUR_STRIDE as usize)
                .map(|h| Tick { position: h as f64, label: hour_label(h) })
                .collect(),
        },
        Granularity::Day => Axis {
            min: 1.0,
            max: 366.0,
            ticks: (1..=366)
                .step_by(DAY_STRIDE as usize)
                .map(|d| Tick { position: d as f64, label: d.to_string() })
                .collect(),
        },
        Granularity::Week | Granularity::Month => date_axis(series),
    }
}

fn date_axis(series: &BucketSeries) -> Axis {
    let positions = series
        .packages
        .values()
        .flat_map(|buckets| buckets.iter().map(|(key, _)| key.position()));
    let (mut min, mut max) = positions.fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)));
    if min > max {
        return Axis { min: 0.0, max: 1.0, ticks: Vec::new() };
    }
    if min == max {
        min -= 15.0;
        max += 15.0;
    }

    let span = max - min;
    let ticks = (0..DATE_TICKS)
        .filter_map(|i| {
            let position = min + span * i as f64 / (DATE_TICKS - 1) as f64;
            let date = NaiveDate::from_num_days_from_ce_opt(position.round() as i32)?;
            Some(Tick { position, label: date.format("%Y-%m").to_string() })
        })
        .collect();
    Axis { min, max, ticks }
}

/// Count axis from zero to a rounded ceiling above `max_count`.
pub fn y_axis(max_count: u64) -> Axis {
    let max = max_count.max(1);
    let step = nice_step(max.div_ceil(5));
    let top = max.div_ceil(step) * step;
    Axis {
        min: 0.0,
        max: top as f64,
        ticks: (0..=top)
            .step_by(step as usize)
            .map(|v| Tick { position: v as f64, label: v.to_string() })
            .collect(),
    }
}

fn nice_step(raw: u64) -> u64 {
    let raw = raw.max(1);
    let mut magnitude = 1u64;
    while magnitude.saturating_mul(10) <= raw {
        magnitude *= 10;
    }
    [1, 2, 5, 10]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10 * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BucketKey, BucketedCount};

    #[test]
    fn hour_labels_use_twelve_hour_clock() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(3), "3 AM");
        assert_eq!(hour_label(12), "12 PM");
        assert_eq!(hour_label(21), "9 PM");
        assert_eq!(hour_label(24), "12 AM");
    }

    #[test]
    fn hour_axis_ticks_every_three_hours() {
        let axis = x_axis(&BucketSeries::new(Granularity::Hour));
        let labels: Vec<&str> = axis.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["12 AM", "3 AM", "6 AM", "9 AM", "12 PM", "3 PM", "6 PM", "9 PM", "12 AM"]
        );
    }

    #[test]
    fn y_axis_rounds_up_to_nice_step() {
        let axis = y_axis(7);
        assert_eq!(axis.max, 8.0);
        assert_eq!(axis.ticks.len(), 5);

        let axis = y_axis(3130);
        assert_eq!(axis.max, 4000.0);

        let empty = y_axis(0);
        assert_eq!(empty.max, 1.0);
    }

    #[test]
    fn single_month_gets_padded_axis() {
        let mut series = BucketSeries::new(Granularity::Month);
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        series.push(BucketedCount { package: "numpy".into(), bucket: BucketKey::Month(date), count: 4 });
        let axis = x_axis(&series);
        assert!(axis.max > axis.min);
        assert_eq!(axis.ticks.len(), DATE_TICKS);
        assert!(axis.ticks.iter().any(|t| t.label == "2024-05"));
    }
}
