//! Settings resolution: built-in defaults, then the RON config file, then
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use crew_client::{ApiSettings, PollSettings};
use serde::Deserialize;

use super::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "crew_app.ron";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct FileConfig {
    base_url: String,
    poll_interval_ms: u64,
    connect_timeout_ms: u64,
    request_timeout_ms: u64,
    max_bytes: u64,
    log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            base_url: api.base_url,
            poll_interval_ms: millis(PollSettings::default().interval),
            connect_timeout_ms: millis(api.connect_timeout),
            request_timeout_ms: millis(api.request_timeout),
            max_bytes: api.max_bytes,
            log_file: None,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub poll: PollSettings,
    pub log_file: Option<PathBuf>,
    /// File the settings were read from, if any.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let (file, source) = match &cli.config {
            Some(path) => (read_config(path)?, Some(path.clone())),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.is_file() {
                    (read_config(&path)?, Some(path))
                } else {
                    (FileConfig::default(), None)
                }
            }
        };
        let mut config = Self::from_file(file, source);
        config.apply_overrides(cli);
        anyhow::ensure!(
            !config.poll.interval.is_zero(),
            "poll interval must be greater than zero"
        );
        Ok(config)
    }

    fn from_file(file: FileConfig, source: Option<PathBuf>) -> Self {
        Self {
            api: ApiSettings {
                base_url: file.base_url,
                connect_timeout: Duration::from_millis(file.connect_timeout_ms),
                request_timeout: Duration::from_millis(file.request_timeout_ms),
                max_bytes: file.max_bytes,
            },
            poll: PollSettings {
                interval: Duration::from_millis(file.poll_interval_ms),
            },
            log_file: file.log_file,
            source,
        }
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(interval_ms) = cli.interval_ms {
            self.poll.interval = Duration::from_millis(interval_ms);
        }
        if let Some(log_file) = &cli.log_file {
            self.log_file = Some(log_file.clone());
        }
    }
}

fn read_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("parsing config file {}", path.display()))
}

fn parse_config(content: &str) -> anyhow::Result<FileConfig> {
    Ok(ron::from_str(content)?)
}
