use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::label::IconSet;
use crate::error::ConfigError;

const MIN_INTERVAL_MS: u64 = 10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_projects_root")]
    pub projects_root: String,
    #[serde(default)]
    pub github_owner: Option<String>,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    #[serde(default = "default_gh_program")]
    pub gh_program: String,
    #[serde(default = "default_git_program")]
    pub git_program: String,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_spinner_interval_ms")]
    pub spinner_interval_ms: u64,
    #[serde(default)]
    pub max_concurrent_clones: Option<usize>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_icons")]
    pub icons: String,
    #[serde(default)]
    pub wait_on_quit: bool,
}

fn default_projects_root() -> String {
    "~/projects".to_string()
}
fn default_list_limit() -> usize {
    1000
}
fn default_gh_program() -> String {
    "gh".to_string()
}
fn default_git_program() -> String {
    "git".to_string()
}
fn default_tick_ms() -> u64 {
    100
}
fn default_spinner_interval_ms() -> u64 {
    100
}
fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_icons() -> String {
    "nerd".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            github_owner: None,
            list_limit: default_list_limit(),
            gh_program: default_gh_program(),
            git_program: default_git_program(),
            tick_ms: default_tick_ms(),
            spinner_interval_ms: default_spinner_interval_ms(),
            max_concurrent_clones: None,
            theme: default_theme(),
            icons: default_icons(),
            wait_on_quit: false,
        }
    }
}

impl Config {
    /// Loads the user config, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Clamps intervals and resets an unknown icon set.
    pub fn validate(&mut self) {
        self.tick_ms = self.tick_ms.max(MIN_INTERVAL_MS);
        self.spinner_interval_ms = self.spinner_interval_ms.max(MIN_INTERVAL_MS);
        if IconSet::from_name(&self.icons).is_none() {
            self.icons = default_icons();
        }
        if self.max_concurrent_clones == Some(0) {
            self.max_concurrent_clones = None;
        }
        if self.list_limit == 0 {
            self.list_limit = default_list_limit();
        }
    }

    pub fn projects_root_path(&self) -> PathBuf {
        expand_home(&self.projects_root)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn spinner_interval(&self) -> Duration {
        Duration::from_millis(self.spinner_interval_ms)
    }

    pub fn icon_set(&self) -> IconSet {
        IconSet::from_name(&self.icons).unwrap_or(IconSet::Nerd)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("projman")
}

fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
