//! Service configuration.
//!
//! Priority: explicit caller arguments > environment variables > config file > defaults.
//! The config file is only read when `DEPSCAN_CONFIG` names one.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::engine::{OutputFormat, ScanningMode};
use crate::{Error, Result};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "DEPSCAN_CONFIG";

/// Content-addressed storage options forwarded to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CasOptions {
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default)]
    pub plugin_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub scanning_mode: ScanningMode,

    #[serde(default)]
    pub cas: CasOptions,

    #[serde(default)]
    pub reuse_file_manager: bool,

    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Full,
            scanning_mode: ScanningMode::DependencyDirectivesScan,
            cas: CasOptions::default(),
            reuse_file_manager: false,
            log_level: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from defaults, the optional config file, and
    /// `DEPSCAN_`-prefixed environment variables.
    pub fn load() -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
            figment = figment.merge(Toml::file(PathBuf::from(path)));
        }

        // DEPSCAN_OUTPUT_FORMAT, DEPSCAN_CAS__PATH, ...
        figment = figment.merge(Env::prefixed("DEPSCAN_").ignore(&["config"]).split("__"));

        figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_scanning_mode(mut self, mode: ScanningMode) -> Self {
        self.scanning_mode = mode;
        self
    }
}
