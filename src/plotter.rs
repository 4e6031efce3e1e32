//! Cumulative reward charts for one or more run files.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::Config;
use crate::logging::{info, obj, v_num, v_str, Domain, ProfileScope};
use crate::run::{load_runs, RunRecord};
use crate::series::RewardSeries;

pub const X_LABEL: &str = "Iterations";
pub const Y_LABEL: &str = "Reward";

/// Line colour, parsed from short (`b`), long (`blue`) or `#rrggbb` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const PALETTE: [(&str, &str, (u8, u8, u8)); 7] = [
    ("b", "blue", (0, 0, 255)),
    ("r", "red", (255, 0, 0)),
    ("g", "green", (0, 128, 0)),
    ("m", "magenta", (191, 0, 191)),
    ("c", "cyan", (0, 191, 191)),
    ("y", "yellow", (191, 191, 0)),
    ("k", "black", (0, 0, 0)),
];

impl SeriesColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default colour for the `i`-th series.
    pub fn cycle(i: usize) -> Self {
        let (_, _, (r, g, b)) = PALETTE[i % PALETTE.len()];
        Self::new(r, g, b)
    }

    fn rgb(&self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }
}

impl FromStr for SeriesColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(hex_str) = s.strip_prefix('#') {
            let bytes = hex::decode(hex_str).map_err(|e| anyhow!("bad colour {}: {}", s, e))?;
            if let [r, g, b] = bytes[..] {
                return Ok(Self::new(r, g, b));
            }
            bail!("bad colour {}: expected #rrggbb", s);
        }
        let lower = s.to_lowercase();
        PALETTE
            .iter()
            .find(|(short, long, _)| *short == lower || *long == lower)
            .map(|(_, _, (r, g, b))| Self::new(*r, *g, *b))
            .ok_or_else(|| anyhow!("unknown colour {}", s))
    }
}

impl fmt::Display for SeriesColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Accumulates reward series across `load` calls and draws them together.
#[derive(Debug, Clone)]
pub struct Plotter {
    series: Vec<RewardSeries>,
    colors: Vec<SeriesColor>,
    legend: Vec<(String, SeriesColor)>,
    x_label: String,
    y_label: String,
    width: u32,
    height: u32,
    title: Option<String>,
    legend_params: bool,
}

impl Plotter {
    pub fn new(cfg: &Config) -> Self {
        Self {
            series: Vec::new(),
            colors: Vec::new(),
            legend: Vec::new(),
            x_label: X_LABEL.to_string(),
            y_label: Y_LABEL.to_string(),
            width: cfg.plot_width,
            height: cfg.plot_height,
            title: cfg.plot_title.clone(),
            legend_params: cfg.legend_params,
        }
    }

    pub fn series(&self) -> &[RewardSeries] {
        &self.series
    }

    pub fn colors(&self) -> &[SeriesColor] {
        &self.colors
    }

    pub fn legend(&self) -> &[(String, SeriesColor)] {
        &self.legend
    }

    /// Load one run file as one series.
    pub fn load(&mut self, path: &Path, color: SeriesColor) -> Result<()> {
        let runs = load_runs(path)?;
        self.load_runs(&runs, color)
    }

    pub fn load_runs(&mut self, runs: &[RunRecord], color: SeriesColor) -> Result<()> {
        let series = RewardSeries::from_runs(runs)?;
        let label = legend_label(runs);
        info(
            Domain::Plot,
            "series_added",
            obj(&[
                ("index", v_num(self.series.len() as f64)),
                ("points", v_num(series.len() as f64)),
                ("color", v_str(&color.to_string())),
                ("legend", v_str(&label)),
            ]),
        );
        self.series.push(series);
        self.colors.push(color);
        self.legend.push((label, color));
        Ok(())
    }

    /// Render every series to `out`: PNG for a `.png` extension, SVG otherwise.
    pub fn plot(&self, out: &Path) -> Result<()> {
        if self.series.iter().all(RewardSeries::is_empty) {
            bail!("nothing loaded to plot");
        }
        let _scope = ProfileScope::with_context("plot", &[("series", v_num(self.series.len() as f64))]);
        let size = (self.width, self.height);
        let is_png = out
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if is_png {
            self.draw(BitMapBackend::new(out, size).into_drawing_area())?;
        } else {
            self.draw(SVGBackend::new(out, size).into_drawing_area())?;
        }
        info(
            Domain::Plot,
            "plot_written",
            obj(&[
                ("path", v_str(&out.display().to_string())),
                ("series", v_num(self.series.len() as f64)),
            ]),
        );
        Ok(())
    }

    fn series_label(&self, i: usize) -> String {
        if self.legend_params {
            self.legend[i].0.clone()
        } else {
            format!("data {}", i)
        }
    }

    fn draw<DB: DrawingBackend>(&self, root: DrawingArea<DB, Shift>) -> Result<()> {
        let (x_min, x_max) = self
            .series
            .iter()
            .filter_map(RewardSeries::x_bounds)
            .fold((i64::MAX, i64::MIN), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        let (y_min, y_max) = self
            .series
            .iter()
            .filter_map(RewardSeries::y_bounds)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        let (x_min, x_max) = widen(x_min as f64, x_max as f64);
        let (y_min, y_max) = widen(y_min, y_max);

        root.fill(&WHITE).map_err(draw_err)?;
        let mut builder = ChartBuilder::on(&root);
        builder.margin(20).x_label_area_size(50).y_label_area_size(80);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 24));
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, (series, color)) in self.series.iter().zip(&self.colors).enumerate() {
            let rgb = color.rgb();
            chart
                .draw_series(LineSeries::new(
                    series.points().map(|(x, y)| (x as f64, y)),
                    rgb.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label(self.series_label(i))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], rgb.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_err)?;
        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// Distinct parameter strings of a file's runs, in first-seen order.
fn legend_label(runs: &[RunRecord]) -> String {
    let mut labels: Vec<String> = Vec::new();
    for run in runs {
        let label = run.legend_label();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels.join(" | ")
}

/// Avoid a zero-width axis when all values coincide.
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if lo < hi {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

fn draw_err<E: std::error::Error>(err: E) -> anyhow::Error {
    anyhow!("draw failed: {}", err)
}
