use std::{
    fs, io::{self, Write}, path::{Path, PathBuf},
};
use confique::Config as _;

use crate::prelude::*;


mod general;

pub(crate) use self::general::GeneralConfig;


/// The locations where we will look for a configuration file. The first
/// existing file in this list is used.
const DEFAULT_PATHS: &[&str] = &[
    "config.toml",
    "/etc/filmography/config.toml",
];

const CONFIG_PATH_ENV: &str = "FILMOGRAPHY_CONFIG_PATH";

/// Configuration for the filmography catalog.
///
/// All relative paths are relative to the location of this configuration file.
#[derive(Debug, confique::Config)]
pub(crate) struct Config {
    #[config(nested)]
    pub(crate) general: GeneralConfig,

    #[config(nested)]
    pub(crate) catalog: crate::catalog::CatalogConfig,

    #[config(nested)]
    pub(crate) db: crate::db::DbConfig,

    #[config(nested)]
    pub(crate) log: crate::logger::LogConfig,
}

impl Config {
    /// Tries to find a config file by checking `FILMOGRAPHY_CONFIG_PATH` and
    /// a list of default locations. If no file exists, only defaults and
    /// environment variables are used. Returns the loaded config and the path
    /// it was loaded from.
    pub(crate) fn from_env_or_default_locations() -> Result<(Self, Option<PathBuf>)> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => DEFAULT_PATHS.iter().map(PathBuf::from).find(|p| p.exists()),
        };

        let config = match &path {
            Some(path) => Self::load_from(path)
                .with_context(|| format!("failed to load configuration from '{}'", path.display()))?,
            None => Self::builder()
                .env()
                .load()
                .context("failed to load configuration from environment")?,
        };

        Ok((config, path))
    }

    /// Loads the configuration from a specific TOML file. Environment
    /// variables take precedence over values from the file.
    pub(crate) fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::builder()
            .env()
            .file(path)
            .load()
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;

        config.fix_paths(path)?;

        Ok(config)
    }

    /// Goes through all paths in the configuration and changes relative paths
    /// to be absolute based on the path of the configuration file itself.
    fn fix_paths(&mut self, config_path: &Path) -> Result<()> {
        let absolute_config_path = config_path.canonicalize()
            .context("failed to canonicalize config path")?;
        let base = absolute_config_path.parent()
            .ok_or_else(|| anyhow!("config file path has no parent"))?;

        if let Some(p) = &mut self.log.file {
            if p.is_relative() {
                *p = base.join(&p);
            }
        }

        Ok(())
    }
}

/// Writes the generated TOML config template file to the given destination or
/// stdout.
pub(crate) fn write_template(path: Option<&PathBuf>) -> Result<()> {
    use confique::toml::FormatOptions;

    info!(
        "Writing configuration template to '{}'",
        path.map(|p| p.display().to_string()).unwrap_or("<stdout>".into()),
    );

    let mut options = FormatOptions::default();
    options.general.nested_field_gap = 2;
    let template = confique::toml::template::<Config>(options);
    match path {
        Some(path) => fs::write(path, template)?,
        None => io::stdout().write_all(template.as_bytes())?,
    }

    Ok(())
}
