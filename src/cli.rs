//! Command-line argument handling shared by the `rewardcurve` binary.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::config::Config;
use crate::plotter::SeriesColor;

/// File read by `policy` and `summary` when no path is given.
pub const DEFAULT_POLICY_FILE: &str = "runData50.json";

/// Files and colours plotted by `plot` when no path is given.
pub const DEFAULT_PLOT_FILES: [(&str, &str); 4] = [
    ("runDataRandomState1.json", "b"),
    ("runDataRandomState2.json", "r"),
    ("runDataRandomState3.json", "g"),
    ("runDataRandomState4.json", "m"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct PlotInput {
    pub path: PathBuf,
    pub color: SeriesColor,
}

/// Parse `file[=color]` arguments; files without a colour take the
/// next colour of the default cycle.
pub fn parse_plot_inputs(args: &[String], cfg: &Config) -> Result<Vec<PlotInput>> {
    if args.is_empty() {
        return DEFAULT_PLOT_FILES
            .iter()
            .map(|(file, color)| -> Result<PlotInput> {
                Ok(PlotInput {
                    path: cfg.data_path(file),
                    color: color.parse()?,
                })
            })
            .collect();
    }
    args.iter()
        .enumerate()
        .map(|(i, arg)| -> Result<PlotInput> {
            let (path, color) = match arg.rsplit_once('=') {
                Some((path, color)) => (path, color.parse::<SeriesColor>()?),
                None => (arg.as_str(), SeriesColor::cycle(i)),
            };
            if path.is_empty() {
                bail!("missing file in argument {:?}", arg);
            }
            Ok(PlotInput {
                path: PathBuf::from(path),
                color,
            })
        })
        .collect()
}

/// Input path for single-file commands.
pub fn single_input(args: &[String], cfg: &Config) -> Result<PathBuf> {
    match args {
        [] => Ok(cfg.data_path(DEFAULT_POLICY_FILE)),
        [path] => Ok(PathBuf::from(path)),
        _ => bail!("expected at most one file, got {}", args.len()),
    }
}
