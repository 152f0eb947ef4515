use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::DEFAULT_CLUBS;

/// Config file looked up in the working directory when
/// `EPL_DASHBOARD_CONFIG` is not set.
pub const CONFIG_FILE: &str = "epl_dashboard.json";
pub const CONFIG_ENV: &str = "EPL_DASHBOARD_CONFIG";
pub const DATA_ENV: &str = "EPL_DASHBOARD_DATA";
pub const DEFAULT_DATA_FILE: &str = "epl_player_stats_24_25.csv";

/// Dashboard settings.
///
/// Resolution order, later wins: built-in defaults, JSON config file,
/// `EPL_DASHBOARD_DATA`, first command-line argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// CSV file to open at startup.
    pub data_path: PathBuf,
    /// Clubs selected when a table is first shown.
    pub default_clubs: Vec<String>,
    /// How many players the rankings chart shows.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            default_clubs: DEFAULT_CLUBS.iter().map(|c| c.to_string()).collect(),
            top_n: 10,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the config from the process environment and arguments.
    pub fn from_env() -> Result<Self> {
        Self::resolve(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os(DATA_ENV).map(PathBuf::from),
            std::env::args_os().nth(1).map(PathBuf::from),
        )
    }

    /// An explicitly named config file must exist; the default one is optional.
    pub fn resolve(
        config_file: Option<PathBuf>,
        data_env: Option<PathBuf>,
        data_arg: Option<PathBuf>,
    ) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(CONFIG_FILE).is_file() => Self::from_file(Path::new(CONFIG_FILE))?,
            None => Self::default(),
        };

        if let Some(path) = data_env {
            config.data_path = path;
        }
        if let Some(path) = data_arg {
            config.data_path = path;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 5 }}"#).unwrap();

        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.top_n, 5);
        assert_eq!(config.data_path, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.default_clubs.len(), 4);
    }

    #[test]
    fn argument_beats_environment_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "data_path": "from_file.csv" }}"#).unwrap();
        let cfg = Some(file.path().to_path_buf());

        let c = DashboardConfig::resolve(cfg.clone(), None, None).unwrap();
        assert_eq!(c.data_path, PathBuf::from("from_file.csv"));

        let c = DashboardConfig::resolve(cfg.clone(), Some("env.csv".into()), None).unwrap();
        assert_eq!(c.data_path, PathBuf::from("env.csv"));

        let c = DashboardConfig::resolve(cfg, Some("env.csv".into()), Some("arg.csv".into())).unwrap();
        assert_eq!(c.data_path, PathBuf::from("arg.csv"));
    }

    #[test]
    fn malformed_or_missing_explicit_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(DashboardConfig::resolve(Some(file.path().to_path_buf()), None, None).is_err());
        assert!(DashboardConfig::resolve(Some("/no/such/config.json".into()), None, None).is_err());
    }
}
