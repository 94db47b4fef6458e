//! Runtime configuration.
//!
//! Every field has a default matching the stock deployment layout
//! (`skills.json`, `skill_data/`, `icons/`), so an empty JSON object is a
//! valid configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::availability::AvailabilityPolicy;

const DEFAULT_TTL_MINUTES: u64 = 60;

/// Errors from parsing or validating a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Not valid JSON, or the wrong shape.
    Parse(serde_json::Error),
    /// A field holds an unusable value.
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "invalid configuration: {e}"),
            Self::Invalid { field, reason } => write!(f, "invalid configuration `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid { .. } => None,
        }
    }
}

/// DOM element ids the host renders into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub title: String,
    pub breadcrumb: String,
    pub content: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            title: "page-title".into(),
            breadcrumb: "breadcrumb".into(),
            content: "content".into(),
        }
    }
}

/// Configuration for a skilldex instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkilldexConfig {
    /// Path of the skill list resource.
    pub skills_path: String,
    /// Directory holding `<id>.json` detail records.
    pub detail_dir: String,
    /// Directory icon paths are relative to.
    pub icon_dir: String,
    /// Icon used when a skill has no image.
    pub missing_icon: String,
    /// Query parameter selecting the detail view.
    pub query_param: String,
    /// Persisted storage key of the availability cache.
    pub cache_key: String,
    /// Lifetime of the availability cache.
    pub cache_ttl_minutes: u64,
    pub availability: AvailabilityPolicy,
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub log_level: String,
    pub elements: ElementIds,
}

impl Default for SkilldexConfig {
    fn default() -> Self {
        Self {
            skills_path: "skills.json".into(),
            detail_dir: "skill_data".into(),
            icon_dir: "icons".into(),
            missing_icon: "-1/icons-shared_missing.png".into(),
            query_param: "skill".into(),
            cache_key: "skilldex.availability".into(),
            cache_ttl_minutes: DEFAULT_TTL_MINUTES,
            availability: AvailabilityPolicy::default(),
            log_level: "info".into(),
            elements: ElementIds::default(),
        }
    }
}

impl SkilldexConfig {
    /// Parse and validate a JSON configuration object.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request or lookup fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("skills_path", &self.skills_path),
            ("detail_dir", &self.detail_dir),
            ("query_param", &self.query_param),
            ("cache_key", &self.cache_key),
            ("elements.title", &self.elements.title),
            ("elements.breadcrumb", &self.elements.breadcrumb),
            ("elements.content", &self.elements.content),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".into(),
                });
            }
        }
        if self.cache_ttl_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_minutes",
                reason: "must be at least 1".into(),
            });
        }
        Level::from_str(&self.log_level).map_err(|_| ConfigError::Invalid {
            field: "log_level",
            reason: format!("unknown level {:?}", self.log_level),
        })?;
        Ok(())
    }

    /// Builder: set the skill list path.
    #[must_use]
    pub fn skills_path(mut self, path: impl Into<String>) -> Self {
        self.skills_path = path.into();
        self
    }

    /// Builder: set the detail record directory.
    #[must_use]
    pub fn detail_dir(mut self, dir: impl Into<String>) -> Self {
        self.detail_dir = dir.into();
        self
    }

    /// Builder: set the availability policy.
    #[must_use]
    pub fn availability(mut self, policy: AvailabilityPolicy) -> Self {
        self.availability = policy;
        self
    }

    /// Builder: set the cache lifetime.
    #[must_use]
    pub fn cache_ttl_minutes(mut self, minutes: u64) -> Self {
        self.cache_ttl_minutes = minutes;
        self
    }

    /// Cache lifetime in milliseconds.
    #[must_use]
    pub fn cache_ttl_ms(&self) -> u64 {
        self.cache_ttl_minutes.saturating_mul(60_000)
    }

    /// Parsed log level; falls back to `INFO` on an unvalidated config.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::INFO)
    }

    /// Path of the detail record for `id`.
    #[must_use]
    pub fn detail_path(&self, id: &str) -> String {
        format!(
            "{}/{}.json",
            self.detail_dir.trim_end_matches('/'),
            urlencoding::encode(id)
        )
    }

    /// Icon URL for a skill image, falling back to the missing-icon asset.
    #[must_use]
    pub fn icon_path(&self, image: Option<&str>) -> String {
        let image = image
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&self.missing_icon);
        format!("{}/{}", self.icon_dir.trim_end_matches('/'), image)
    }
}
