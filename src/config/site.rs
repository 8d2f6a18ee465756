//! Site configuration (_config.yml)

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::archive::ArchiveOrder;
use crate::error::ConfigError;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // URL
    pub url: String,
    pub baseurl: String,
    pub permalink: String,

    /// IANA timezone used to pick the calendar date of timestamped posts.
    /// Empty keeps dates exactly as written.
    pub timezone: String,

    // Directory
    pub source_dir: String,
    pub posts_dir: String,
    pub public_dir: String,
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Moment.js-style format for archive entry dates
    pub date_format: String,

    #[serde(default)]
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),

            url: "http://localhost".to_string(),
            baseurl: String::new(),
            permalink: "/:year/:month/:day/:title.html".to_string(),

            timezone: String::new(),

            source_dir: ".".to_string(),
            posts_dir: "_posts".to_string(),
            public_dir: "_site".to_string(),
            exclude: Vec::new(),

            date_format: "MMM DD".to_string(),

            archive: ArchiveConfig::default(),
            index: IndexConfig::default(),
            markdown: MarkdownConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the fields that are parsed lazily so mistakes surface at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tz()?;
        self.exclude_patterns()?;
        Ok(())
    }

    /// The configured timezone, if any
    pub fn tz(&self) -> Result<Option<Tz>, ConfigError> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(None);
        }
        name.parse::<Tz>()
            .map(Some)
            .map_err(|_| ConfigError::Timezone(name.to_string()))
    }

    /// Compiled `exclude` globs
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>, ConfigError> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|source| ConfigError::Exclude {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Archive page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub path: String,
    pub title: String,
    pub order: ArchiveOrder,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: "archive".to_string(),
            title: "Archive".to_string(),
            order: ArchiveOrder::default(),
        }
    }
}

/// Home page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Number of posts listed on the home page
    pub recent: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { recent: 10 }
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub highlight_theme: String,
    pub line_numbers: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.posts_dir, "_posts");
        assert_eq!(config.archive.order, ArchiveOrder::Descending);
        assert_eq!(config.index.recent, 10);
        assert!(config.tz().unwrap().is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes
author: Test User
timezone: America/New_York
exclude:
  - "drafts/**"
archive:
  order: first_seen
index:
  recent: 3
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.archive.order, ArchiveOrder::FirstSeen);
        assert_eq!(config.archive.path, "archive");
        assert_eq!(config.index.recent, 3);
        assert_eq!(config.tz().unwrap(), Some(chrono_tz::America::New_York));
        assert_eq!(config.exclude_patterns().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Timezone(_))));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "title: [unclosed").unwrap();

        let err = SiteConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("_config.yml"));
    }
}
