//! Runtime configuration
//!
//! Read once at startup from YAML, then completed from the environment.
//! Collaborators receive their part of it on construction.

use std::env;

use serde::Deserialize;

use crate::analyzer::point::MissingElevation;
use crate::analyzer::segmenter::DEFAULT_SEGMENT_LENGTH_KM;

pub const DEFAULT_OPEN_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";
pub const DEFAULT_DESCRIPTION_MODEL: &str = "claude-3-5-haiku-latest";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub segments: SegmentsConfig,
    pub providers: ProvidersConfig,
    pub description: DescriptionConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SegmentsConfig {
    /// Target segment length in kilometers
    pub length_km: f64,
    pub missing_elevation: MissingElevation,
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            length_km: DEFAULT_SEGMENT_LENGTH_KM,
            missing_elevation: MissingElevation::default(),
        }
    }
}

/// Credentials and endpoints of the remote services
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Bearer token for the Strava routes export
    pub strava_access_token: Option<String>,
    /// Enables the Google elevation provider
    pub google_api_key: Option<String>,
    pub open_elevation_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            strava_access_token: None,
            google_api_key: None,
            open_elevation_url: DEFAULT_OPEN_ELEVATION_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_DESCRIPTION_MODEL.to_string(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        serde_yaml::from_str(yaml).map_err(|e| format!("Invalid configuration: {}", e))
    }

    /// Fill the unset credentials from the process environment
    pub fn with_env(self) -> Self {
        self.with_vars(|key| env::var(key).ok())
    }

    fn with_vars<F>(mut self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if self.providers.strava_access_token.is_none() {
            self.providers.strava_access_token = lookup("STRAVA_ACCESS_KEY");
        }
        if self.providers.google_api_key.is_none() {
            self.providers.google_api_key = lookup("GOOGLE_ELEVATION_API_KEY");
        }
        if self.description.api_key.is_none() {
            self.description.api_key = lookup("ANTHROPIC_API_KEY");
        }
        if let Some(model) = lookup("AI_MODEL") {
            self.description.model = model;
        }

        self
    }
}
