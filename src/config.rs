use std::path::PathBuf;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub plot_out: PathBuf,
    pub plot_width: u32,
    pub plot_height: u32,
    pub plot_title: Option<String>,
    pub data_dir: PathBuf,
    /// Label series with their parameter strings instead of `data <i>`.
    pub legend_params: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plot_out: PathBuf::from("rewards.svg"),
            plot_width: 1000,
            plot_height: 800,
            plot_title: None,
            data_dir: PathBuf::from("."),
            legend_params: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            plot_out: std::env::var("PLOT_OUT").map(PathBuf::from).unwrap_or(d.plot_out),
            plot_width: std::env::var("PLOT_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(d.plot_width),
            plot_height: std::env::var("PLOT_HEIGHT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.plot_height),
            plot_title: std::env::var("PLOT_TITLE").ok().filter(|v| !v.trim().is_empty()),
            data_dir: std::env::var("DATA_DIR").map(PathBuf::from).unwrap_or(d.data_dir),
            legend_params: std::env::var("LEGEND_PARAMS").map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")).unwrap_or(d.legend_params),
        }
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.plot_out, PathBuf::from("rewards.svg"));
        assert_eq!((cfg.plot_width, cfg.plot_height), (1000, 800));
        assert!(cfg.plot_title.is_none());
        assert!(!cfg.legend_params);
    }

    #[test]
    fn data_path_joins_dir() {
        let cfg = Config {
            data_dir: PathBuf::from("results"),
            ..Config::default()
        };
        assert_eq!(cfg.data_path("runData50.json"), PathBuf::from("results/runData50.json"));
    }
}
