use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::config::themes::ThemeRegistry;

pub mod themes;

pub use themes::ThemeName;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "NotebookTui";
const APP_NAME: &str = "notebook";

/// Title given to freshly created notes and to titles edited down to nothing.
pub const DEFAULT_TITLE: &str = "New Entry ";

pub struct ConfigLoader {
    paths: ConfigPaths,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        let paths = ConfigPaths::discover()?;
        Ok(Self { paths })
    }

    pub fn with_paths(paths: ConfigPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ConfigPaths {
        &self.paths
    }

    pub fn load_or_init(&self) -> Result<AppConfig> {
        self.paths.ensure_directories()?;
        if !self.paths.config_file.exists() {
            let mut default_cfg = AppConfig::default();
            default_cfg.post_load();
            self.write_default_config(&default_cfg)?;
            return Ok(default_cfg);
        }

        self.load()
    }

    pub fn load(&self) -> Result<AppConfig> {
        let raw = fs::read_to_string(&self.paths.config_file)
            .with_context(|| format!("reading config {}", self.paths.config_file.display()))?;
        let mut cfg: AppConfig = toml::from_str(&raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn write_default_config(&self, cfg: &AppConfig) -> Result<()> {
        let toml = toml::to_string_pretty(cfg).context("serializing default config")?;
        if let Some(parent) = self.paths.config_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        let mut file = fs::File::create(&self.paths.config_file)
            .with_context(|| format!("creating config {}", self.paths.config_file.display()))?;
        file.write_all(toml.as_bytes())
            .context("writing default config")?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
    pub log_dir: PathBuf,
}

impl ConfigPaths {
    pub fn discover() -> Result<Self> {
        let override_config = env::var("NOTEBOOK_CONFIG").ok().map(PathBuf::from);

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;

        let config_dir = override_config
            .clone()
            .map(|p| {
                if p.is_dir() {
                    p
                } else {
                    p.parent().map(Path::to_path_buf).unwrap_or(p)
                }
            })
            .unwrap_or_else(|| project_dirs.config_dir().to_path_buf());

        let config_file = override_config
            .filter(|p| p.is_file() || p.extension().is_some())
            .unwrap_or_else(|| config_dir.join("config.toml"));

        let log_dir = project_dirs
            .state_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| project_dirs.data_local_dir().to_path_buf())
            .join("logs");

        Ok(Self {
            config_dir,
            config_file,
            log_dir,
        })
    }

    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.config_dir, &self.log_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating application directory {}", dir.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub theme: String,
    /// Text painted in the header bar
    pub header: String,
    /// Title used for new notes and for titles edited down to whitespace
    pub default_title: String,
    pub store: StoreOptions,
    #[serde(skip)]
    theme_name: ThemeName,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeName::Dark.to_string(),
            header: "Notebook".to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            store: StoreOptions::default(),
            theme_name: ThemeName::Dark,
        }
    }
}

impl AppConfig {
    pub fn theme_name(&self) -> ThemeName {
        self.theme_name
    }

    fn post_load(&mut self) {
        let registry = ThemeRegistry::default();
        match registry.resolve(&self.theme) {
            Some(name) => self.theme_name = name,
            None => {
                let known = registry
                    .all()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                tracing::warn!(theme = %self.theme, %known, "unknown theme in config, falling back to dark");
                self.theme_name = ThemeName::Dark;
            }
        }
        if self.default_title.trim().is_empty() {
            tracing::warn!("blank default_title in config, using {DEFAULT_TITLE:?}");
            self.default_title = DEFAULT_TITLE.to_string();
        }
        if self.store.seed_attempts == 0 {
            tracing::warn!("store.seed_attempts must be at least 1");
            self.store.seed_attempts = 1;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Base URL of the note store; empty means "read it from `url_file`"
    pub base_url: String,
    /// Text file whose first line holds the base URL
    pub url_file: PathBuf,
    pub timeout_secs: u64,
    /// How many placeholder notes to create before giving up on an empty store
    pub seed_attempts: u32,
    pub endpoints: Endpoints,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            url_file: PathBuf::from("url.txt"),
            timeout_secs: 10,
            seed_attempts: 3,
            endpoints: Endpoints::default(),
        }
    }
}

impl StoreOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Picks the base URL: explicit override, then `base_url`, then the first
    /// non-blank line of `url_file` (working directory first, then the
    /// config directory).
    pub fn resolve_base_url(&self, override_url: Option<&str>, paths: &ConfigPaths) -> Result<String> {
        if let Some(url) = override_url.map(str::trim).filter(|url| !url.is_empty()) {
            return Ok(url.to_string());
        }
        let configured = self.base_url.trim();
        if !configured.is_empty() {
            return Ok(configured.to_string());
        }

        let candidates = if self.url_file.is_absolute() {
            vec![self.url_file.clone()]
        } else {
            vec![self.url_file.clone(), paths.config_dir.join(&self.url_file)]
        };
        for candidate in candidates {
            if !candidate.is_file() {
                continue;
            }
            let raw = fs::read_to_string(&candidate)
                .with_context(|| format!("reading url file {}", candidate.display()))?;
            if let Some(url) = raw.lines().map(str::trim).find(|line| !line.is_empty()) {
                tracing::debug!(path = %candidate.display(), "base url read from file");
                return Ok(url.to_string());
            }
        }

        bail!(
            "no note store URL configured: pass --url, set store.base_url in {}, or write it to {}",
            paths.config_file.display(),
            self.url_file.display()
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub list: String,
    pub create: String,
    pub delete: String,
    pub update: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            list: "get_entry.php".to_string(),
            create: "add_entry.php".to_string(),
            delete: "delete_entry.php".to_string(),
            update: "modify_entry.php".to_string(),
        }
    }
}
