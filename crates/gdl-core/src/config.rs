use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Manifest file read by `gdl` / `gdl fetch` when no path is given.
pub const DEFAULT_MANIFEST_PATH: &str = "./google-drive-list.json";

/// Settings for `gdl list` (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Destination directory prefix for the listed root folder.
    pub root_path: String,
    /// File the generated manifest is written to.
    pub output: PathBuf,
    /// Names containing any of these substrings (case-sensitive) are skipped.
    pub skip_substrings: Vec<String>,
    /// Names containing any of these substrings (case-insensitive) are skipped.
    pub skip_substrings_ci: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            root_path: "Offline/Anime".to_string(),
            output: PathBuf::from("output.txt"),
            skip_substrings: vec![
                "1970-2019".to_string(),
                "BDMV".to_string(),
                "CERTIFICATE".to_string(),
            ],
            skip_substrings_ci: vec!["iso".to_string()],
        }
    }
}

/// Global configuration loaded from `~/.config/gdl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GdlConfig {
    /// Manifest read when the CLI is invoked without `--manifest`.
    pub manifest_path: PathBuf,
    /// Connect timeout per HTTP request, in seconds.
    pub connect_timeout_secs: u64,
    /// Abort a transfer that stays below this rate (bytes/s) for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Minimum interval between two progress lines for one transfer.
    pub progress_interval_ms: u64,
    #[serde(default)]
    pub list: Option<ListConfig>,
}

impl Default for GdlConfig {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            connect_timeout_secs: 30,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            progress_interval_ms: 500,
            list: None,
        }
    }
}

impl GdlConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// The `[list]` section, or built-in defaults when absent.
    pub fn list_or_default(&self) -> ListConfig {
        self.list.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("gdl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<GdlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = GdlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Read and parse one config file.
pub fn load_from(path: &Path) -> Result<GdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: GdlConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

/// [`load_or_init`], falling back to built-in defaults when the config
/// cannot be created, read or parsed. A broken config never stops a fetch.
pub fn load_or_default() -> GdlConfig {
    or_default(load_or_init())
}

fn or_default(loaded: Result<GdlConfig>) -> GdlConfig {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("config unavailable, using defaults: {:#}", e);
        GdlConfig::default()
    })
}
