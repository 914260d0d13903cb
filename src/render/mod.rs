//! Rasterised charts for bucket series and per-package totals.
//!
//! Every render is a pure function of its input: identical aggregates give
//! byte-identical PNG files.

pub mod axis;
pub mod canvas;
pub mod colors;
pub mod font;

use crate::error::Result;
use crate::model::{BucketSeries, Granularity, PackageCount};
use axis::{x_axis, y_axis, Axis};
use canvas::{Align, Canvas, BLACK, GRID, WHITE};
use image::{ImageFormat, RgbImage};
use std::fs;
use std::path::Path;

pub const COUNTS_FILE: &str = "commit_counts_per_package.png";

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const MARGIN_LEFT: i64 = 90;
const MARGIN_RIGHT: i64 = 30;
const MARGIN_TOP: i64 = 70;
const MARGIN_BOTTOM: i64 = 80;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartMeta {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend order. Packages without rows still get a legend entry.
    pub packages: Vec<String>,
    pub width: u32,
    pub height: u32,
}

impl ChartMeta {
    pub fn for_series(granularity: Granularity, packages: &[String]) -> Self {
        let title = if packages.is_empty() {
            granularity.title().to_string()
        } else {
            format!("{} for {}", granularity.title(), join_names(packages))
        };
        Self {
            title,
            x_label: granularity.x_label().to_string(),
            y_label: "commits".to_string(),
            packages: packages.to_vec(),
            width: WIDTH,
            height: HEIGHT,
        }
    }

    pub fn for_counts() -> Self {
        Self {
            title: "Number of Commits per Package".to_string(),
            x_label: "Package".to_string(),
            y_label: "Number of Commits".to_string(),
            packages: Vec::new(),
            width: WIDTH,
            height: HEIGHT,
        }
    }
}

/// "a", "a and b", "a, b, and c".
fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

struct Plot {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

impl Plot {
    fn new(meta: &ChartMeta) -> Self {
        Self {
            left: MARGIN_LEFT,
            right: meta.width as i64 - MARGIN_RIGHT,
            top: MARGIN_TOP,
            bottom: meta.height as i64 - MARGIN_BOTTOM,
        }
    }

    fn x(&self, axis: &Axis, value: f64) -> i64 {
        self.left + (axis.scale(value) * (self.right - self.left) as f64).round() as i64
    }

    fn y(&self, axis: &Axis, value: f64) -> i64 {
        self.bottom - (axis.scale(value) * (self.bottom - self.top) as f64).round() as i64
    }
}

/// Draws title, labels, horizontal gridlines and the bottom spine. The left,
/// top and right spines stay hidden.
fn draw_frame(canvas: &mut Canvas, plot: &Plot, meta: &ChartMeta, y: &Axis) {
    let center = meta.width as i64 / 2;
    canvas.text(center, 24, &meta.title, 2, Align::Center, BLACK);

    for tick in &y.ticks {
        let py = plot.y(y, tick.position);
        canvas.hline(plot.left, plot.right, py, GRID);
        canvas.text(plot.left - 8, py - 3, &tick.label, 1, Align::Right, BLACK);
    }
    canvas.hline(plot.left, plot.right, plot.bottom, BLACK);

    canvas.text(plot.left - 8, plot.top - 22, &meta.y_label, 1, Align::Left, BLACK);
    canvas.text(
        (plot.left + plot.right) / 2,
        plot.bottom + 44,
        &meta.x_label,
        1,
        Align::Center,
        BLACK,
    );
}

pub fn render_series(series: &BucketSeries, meta: &ChartMeta) -> RgbImage {
    let mut canvas = Canvas::new(meta.width, meta.height);
    let plot = Plot::new(meta);
    let x = x_axis(series);
    let y = y_axis(series.max_count());

    draw_frame(&mut canvas, &plot, meta, &y);
    for tick in &x.ticks {
        let px = plot.x(&x, tick.position);
        canvas.vline(px, plot.bottom, plot.bottom + 5, BLACK);
        canvas.text(px, plot.bottom + 12, &tick.label, 1, Align::Center, BLACK);
    }

    let colors = legend_entries(series, meta);
    for (package, color) in &colors {
        let points: Vec<(i64, i64)> = series
            .buckets(package)
            .iter()
            .map(|(key, count)| (plot.x(&x, key.position()), plot.y(&y, *count as f64)))
            .collect();
        match points.as_slice() {
            [] => {}
            [(px, py)] => canvas.fill_rect(px - 2, py - 2, 5, 5, *color),
            _ => {
                for pair in points.windows(2) {
                    canvas.line(pair[0], pair[1], 2, *color);
                }
            }
        }
    }

    draw_legend(&mut canvas, &plot, &colors);
    canvas.into_image()
}

/// Configured packages in order, then any extra packages found in `series`.
fn legend_entries(series: &BucketSeries, meta: &ChartMeta) -> Vec<(String, image::Rgb<u8>)> {
    let extra = series
        .packages
        .keys()
        .filter(|name| !meta.packages.contains(name));
    colors::assign_colors(meta.packages.iter().chain(extra).map(String::as_str))
}

fn draw_legend(canvas: &mut Canvas, plot: &Plot, entries: &[(String, image::Rgb<u8>)]) {
    if entries.is_empty() {
        return;
    }
    let row = 14;
    let text_width = entries
        .iter()
        .map(|(name, _)| font::text_width(name, 1) as i64)
        .max()
        .unwrap_or(0);
    let width = text_width + 40;
    let height = entries.len() as i64 * row + 8;
    let x0 = plot.right - width - 4;
    let y0 = plot.top + 4;

    canvas.fill_rect(x0, y0, width, height, WHITE);
    canvas.hline(x0, x0 + width, y0, GRID);
    canvas.hline(x0, x0 + width, y0 + height, GRID);
    canvas.vline(x0, y0, y0 + height, GRID);
    canvas.vline(x0 + width, y0, y0 + height, GRID);

    for (i, (name, color)) in entries.iter().enumerate() {
        let y = y0 + 6 + i as i64 * row;
        canvas.fill_rect(x0 + 6, y + 2, 20, 3, *color);
        canvas.text(x0 + 32, y, name, 1, Align::Left, BLACK);
    }
}

pub fn render_bar(counts: &[PackageCount], meta: &ChartMeta) -> RgbImage {
    let mut canvas = Canvas::new(meta.width, meta.height);
    let plot = Plot::new(meta);
    let max = counts.iter().map(|c| c.commit_count).max().unwrap_or(0);
    let y = y_axis(max);

    draw_frame(&mut canvas, &plot, meta, &y);
    if counts.is_empty() {
        return canvas.into_image();
    }

    let slot = (plot.right - plot.left) / counts.len() as i64;
    let bar_width = (slot * 3 / 5).max(1);
    for (i, entry) in counts.iter().enumerate() {
        let center = plot.left + slot * i as i64 + slot / 2;
        let top = plot.y(&y, entry.commit_count as f64);
        canvas.fill_rect(center - bar_width / 2, top, bar_width, plot.bottom - top, colors::BAR);
        canvas.text(center, top - 12, &entry.commit_count.to_string(), 1, Align::Center, BLACK);
        canvas.text(center, plot.bottom + 12, &entry.package, 1, Align::Center, BLACK);
    }
    canvas.into_image()
}

/// Writes `image` as PNG, replacing any previous file at `path`.
pub fn save(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
