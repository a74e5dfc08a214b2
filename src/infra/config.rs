use crate::domain::LaunchConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SUITE_TOML_NAME: &str = "suite.toml";

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/hailo-suite")
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    pub name: Option<String>,
    pub tarball: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
    pub name: Option<String>,
    pub shared_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct XauthConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub xauth: XauthConfig,
}

impl SuiteConfig {
    /// Overwrites the defaults in `config` with whatever this file sets.
    pub fn apply_to(self, config: &mut LaunchConfig) {
        if let Some(name) = self.image.name {
            config.image_name = name;
        }
        if let Some(tarball) = self.image.tarball {
            config.image_tarball = expand(&tarball);
        }
        if let Some(name) = self.container.name {
            config.container_name = name;
        }
        if let Some(dir) = self.container.shared_dir {
            config.shared_dir = expand(&dir);
        }
        if let Some(dir) = self.container.logs_dir {
            config.logs_dir = expand(&dir);
        }
        if let Some(path) = self.xauth.path {
            config.xauth_path = expand(&path);
        }
    }
}

pub fn suite_toml_path(config_dir: &Path) -> PathBuf {
    config_dir.join(SUITE_TOML_NAME)
}

/// Missing file means "all defaults".
pub fn load_suite_config(config_dir: &Path) -> Result<SuiteConfig> {
    let path = suite_toml_path(config_dir);

    if !path.exists() {
        debug!("no {:?}, using defaults", path);
        return Ok(SuiteConfig::default());
    }

    let content = fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?;
    let config: SuiteConfig =
        toml::from_str(&content).with_context(|| format!("parsing {:?}", path))?;
    info!("Loaded configuration from {:?}", path);
    Ok(config)
}

/// Creates the shared and log directories that get bind-mounted.
pub fn ensure_host_dirs(config: &LaunchConfig) -> Result<()> {
    for dir in [&config.shared_dir, &config.logs_dir] {
        fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
    }
    Ok(())
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.to_string_lossy().as_ref()).into_owned())
}
