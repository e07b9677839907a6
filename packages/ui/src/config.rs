use anyhow::{Context, Result};
use serde::Deserialize;

use crate::header::DEFAULT_SCROLL_THRESHOLD;
use crate::reveal::ObserverOptions;
use crate::tilt::TiltConfig;

pub const DEFAULT_STORAGE_KEY: &str = "petitchardon-language";
/// Id of the optional inline JSON block overriding the defaults.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub storage_key: String,
    pub theme: String,
    pub header_scroll_threshold: f64,
    pub reveal: ObserverOptions,
    pub storyline: ObserverOptions,
    pub tilt: TiltConfig,
    /// `EnvFilter` directive for the console logger.
    pub log_filter: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            theme: "dark".to_string(),
            header_scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            reveal: ObserverOptions::reveal(),
            storyline: ObserverOptions::storyline(),
            tilt: TiltConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("invalid site config")
    }

    /// Missing or blank config means defaults.
    pub fn load(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => Ok(Self::default()),
            Some(raw) => Self::from_json(raw),
        }
    }
}
