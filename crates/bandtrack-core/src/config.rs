//! Tracker configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analytics::{Targets, DEFAULT_HEATMAP_DAYS};
use crate::ticker::DEFAULT_REFRESH;

/// Name of the per-directory config file.
pub const CONFIG_FILE: &str = "bandtrack.toml";

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "BANDTRACK_DATA_DIR";

/// Top-level bandtrack configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Directory holding the state blob.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Countdown refresh period for `watch`, in seconds.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Days shown in the activity heatmap.
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: u32,
    /// Target band per skill.
    #[serde(default)]
    pub targets: Targets,
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("bandtrack"),
        Err(_) => PathBuf::from(".bandtrack"),
    }
}
fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH.as_secs()
}
fn default_heatmap_days() -> u32 {
    DEFAULT_HEATMAP_DAYS
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            refresh_secs: default_refresh_secs(),
            heatmap_days: default_heatmap_days(),
            targets: Targets::default(),
        }
    }
}

impl TrackerConfig {
    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

/// Expand `${VAR}` references in a configured path.
///
/// Unset variables expand to nothing. An unterminated `${` is kept as
/// written, and expanded values are not scanned again.
fn expand_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let name_and_rest = &rest[open + 2..];
        let Some(close) = name_and_rest.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        out.push_str(&std::env::var(&name_and_rest[..close]).unwrap_or_default());
        rest = &name_and_rest[close + 1..];
    }
    out.push_str(rest);
    out
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `bandtrack.toml` in the current directory
/// 2. `~/.config/bandtrack/config.toml`
///
/// `BANDTRACK_DATA_DIR` overrides `data_dir` in every case.
pub fn load_config_from(path: Option<&Path>) -> Result<TrackerConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            global_config_path().filter(|p| p.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => TrackerConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            config.data_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

/// Parse a config file body, expanding `${VAR}` in `data_dir`.
pub fn parse_config(content: &str) -> Result<TrackerConfig> {
    let mut config: TrackerConfig = toml::from_str(content)?;
    let raw = config.data_dir.to_string_lossy().into_owned();
    config.data_dir = PathBuf::from(expand_vars(&raw));
    anyhow::ensure!(config.heatmap_days >= 1, "heatmap_days must be at least 1");
    Ok(config)
}

/// `~/.config/bandtrack/config.toml`, if `HOME` is set.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("bandtrack")
            .join("config.toml")
    })
}

/// Starter config written by `bandtrack init`.
pub const SAMPLE_CONFIG: &str = r#"# bandtrack configuration

# Where progress is stored. ${VAR} references are expanded.
data_dir = "${HOME}/.local/share/bandtrack"

# Countdown refresh period for `bandtrack watch`, in seconds.
refresh_secs = 60

# Days shown in the activity heatmap.
heatmap_days = 60

[targets]
listening = 8.0
reading = 9.0
writing = 7.0
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_variables_are_expanded() {
        std::env::set_var("_BANDTRACK_TEST_HOME", "/home/student");
        std::env::set_var("_BANDTRACK_TEST_NESTED", "${_BANDTRACK_TEST_HOME}");
        assert_eq!(
            expand_vars("${_BANDTRACK_TEST_HOME}/.local/share/bandtrack"),
            "/home/student/.local/share/bandtrack"
        );
        assert_eq!(
            expand_vars("${_BANDTRACK_TEST_HOME}:${_BANDTRACK_TEST_HOME}"),
            "/home/student:/home/student"
        );
        assert_eq!(expand_vars("${_BANDTRACK_TEST_NESTED}"), "${_BANDTRACK_TEST_HOME}");
        assert_eq!(expand_vars("/srv/bandtrack"), "/srv/bandtrack");
        std::env::remove_var("_BANDTRACK_TEST_HOME");
        std::env::remove_var("_BANDTRACK_TEST_NESTED");
    }

    #[test]
    fn unset_and_unterminated_variables() {
        assert_eq!(expand_vars("/data/${_BANDTRACK_TEST_UNSET}/x"), "/data//x");
        assert_eq!(expand_vars("/data/${HOME"), "/data/${HOME");
        assert_eq!(expand_vars("a${"), "a${");
        assert_eq!(expand_vars("$HOME/x"), "$HOME/x");
    }

    #[test]
    fn default_config() {
        let config = TrackerConfig::default();
        assert_eq!(config.refresh_secs, 60);
        assert_eq!(config.heatmap_days, 60);
        assert_eq!(config.targets, Targets::default());
    }

    #[test]
    fn sample_config_parses() {
        let config = parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.targets.reading, 9.0);
        assert!(!config.data_dir.to_string_lossy().contains("${"));
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config = parse_config(
            r#"
data_dir = "/tmp/bandtrack"

[targets]
writing = 6.5
"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/bandtrack"));
        assert_eq!(config.targets.writing, 6.5);
        assert_eq!(config.targets.listening, 8.0);
        assert_eq!(config.refresh_secs, 60);
    }

    #[test]
    fn zero_heatmap_days_is_rejected() {
        assert!(parse_config("heatmap_days = 0").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "refresh_secs = 5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.refresh_secs, 5);
        assert_eq!(config.refresh_period(), Duration::from_secs(5));
    }
}
