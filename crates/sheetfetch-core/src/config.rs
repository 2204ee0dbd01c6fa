use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cells::CellLayout;
use crate::link::PUBLIC_PROXY_URL;

/// Transfer limits for the curl fetch (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum redirects followed per request.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 600,
            max_redirections: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/sheetfetch/config.toml`.
///
/// Secrets are never stored here; tokens come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetfetchConfig {
    /// Public CORS proxy for Drive, Dropbox and GitHub release links.
    pub public_proxy_url: String,
    /// Authenticated proxy for private GitHub resources.
    #[serde(default)]
    pub private_proxy_url: Option<String>,
    /// Where staged downloads and the last-import state live (default: system temp dir).
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    /// Optional transfer limits; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
    /// Optional cell addresses for sheet snapshots; if missing, defaults are used.
    #[serde(default)]
    pub cells: Option<CellLayout>,
}

impl Default for SheetfetchConfig {
    fn default() -> Self {
        Self {
            public_proxy_url: PUBLIC_PROXY_URL.to_string(),
            private_proxy_url: None,
            staging_dir: None,
            http: None,
            cells: None,
        }
    }
}

impl SheetfetchConfig {
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn http(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }

    pub fn cell_layout(&self) -> CellLayout {
        self.cells.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("sheetfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SheetfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SheetfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SheetfetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
