use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { worker_threads: Some(default_worker_threads()) }
    }
}

/// Where each entity collection lives.
///
/// An unset `authorization_file` / `token_file` means memory-only storage for that
/// collection. An unset `applications_file` / `scopes_file` means the built-in seed is used.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub authorization_file: Option<PathBuf>,
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    #[serde(default)]
    pub applications_file: Option<PathBuf>,
    #[serde(default)]
    pub scopes_file: Option<PathBuf>,
    #[serde(default)]
    pub reject_duplicate_ids: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            authorization_file: None,
            token_file: None,
            applications_file: None,
            scopes_file: None,
            reject_duplicate_ids: false,
        }
    }
}

fn default_worker_threads() -> usize { 2 }
fn default_data_dir() -> String { "data".into() }

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        return Ok(AppConfig::default());
    }
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.runtime.normalize();
        self.storage.normalize_from_env();
        self.storage.validate()?;
        Ok(())
    }
}

impl RuntimeConfig {
    fn normalize(&mut self) {
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(default_worker_threads()),
            Some(_) => {}
        }
    }
}

impl StorageConfig {
    /// Fill unset paths from the environment, then drop blank ones.
    pub fn normalize_from_env(&mut self) {
        fill_from_env(&mut self.authorization_file, "AUTHORIZATION_FILE");
        fill_from_env(&mut self.token_file, "TOKEN_FILE");
        fill_from_env(&mut self.applications_file, "APPLICATIONS");
        fill_from_env(&mut self.scopes_file, "SCOPES");
        for slot in [
            &mut self.authorization_file,
            &mut self.token_file,
            &mut self.applications_file,
            &mut self.scopes_file,
        ] {
            if slot.as_ref().is_some_and(|p| p.as_os_str().to_string_lossy().trim().is_empty()) {
                *slot = None;
            }
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(auth), Some(tokens)) = (&self.authorization_file, &self.token_file) {
            if auth == tokens {
                return Err(anyhow!(
                    "storage.authorization_file and storage.token_file must differ ({})",
                    auth.display()
                ));
            }
        }
        Ok(())
    }
}

fn fill_from_env(slot: &mut Option<PathBuf>, var: &str) {
    if slot.is_none() {
        if let Ok(value) = std::env::var(var) {
            *slot = Some(PathBuf::from(value));
        }
    }
}
