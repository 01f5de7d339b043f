//! Registry Configuration
//!
//! ```toml
//! default_domain = "myapp"
//! max_eval_depth = 32
//!
//! [bindings]
//! myapp = "/usr/share/locale"
//!
//! [locales]
//! LC_MESSAGES = "fr_FR.UTF-8"
//! ```
//!
//! Environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `GLOSSA_TEXTDOMAIN` | `default_domain` |
//! | `GLOSSA_MAX_PLURAL_DEPTH` | `max_eval_depth` |

use crate::locale::Category;
use crate::plural::{DEFAULT_MAX_DEPTH, MAX_TREE_HEIGHT};
use crate::{IntlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Domain used when none was selected.
pub const DEFAULT_DOMAIN: &str = "messages";

/// Configuration for an [`Intl`](crate::Intl) registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntlConfig {
    /// Initial current domain.
    pub default_domain: String,
    /// Nesting bound for plural expression evaluation.
    pub max_eval_depth: u32,
    /// Domain to catalog directory bindings applied at construction.
    pub bindings: BTreeMap<String, PathBuf>,
    /// Per-category locale overrides, keyed by category name.
    pub locales: BTreeMap<String, String>,
}

impl Default for IntlConfig {
    fn default() -> Self {
        Self {
            default_domain: DEFAULT_DOMAIN.to_string(),
            max_eval_depth: DEFAULT_MAX_DEPTH,
            bindings: BTreeMap::new(),
            locales: BTreeMap::new(),
        }
    }
}

impl IntlConfig {
    /// Defaults overridden by `GLOSSA_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(domain) = env::var("GLOSSA_TEXTDOMAIN") {
            if !domain.is_empty() {
                config.default_domain = domain;
            }
        }

        if let Some(depth) = env::var("GLOSSA_MAX_PLURAL_DEPTH")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.max_eval_depth = depth;
        }

        config
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| IntlError::Config(format!("TOML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| IntlError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Builder-style domain binding.
    pub fn bind(mut self, domain: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.bindings.insert(domain.into(), dir.into());
        self
    }

    /// Builder-style locale override.
    pub fn locale(mut self, category: Category, tag: impl Into<String>) -> Self {
        self.locales.insert(category.name().to_string(), tag.into());
        self
    }

    /// Check field values and category names.
    pub fn validate(&self) -> Result<()> {
        if self.max_eval_depth == 0 {
            return Err(IntlError::Config(
                "max_eval_depth must be positive".to_string(),
            ));
        }
        if self.max_eval_depth > MAX_TREE_HEIGHT {
            return Err(IntlError::Config(format!(
                "max_eval_depth must be at most {}",
                MAX_TREE_HEIGHT
            )));
        }
        self.locale_overrides().map(|_| ())
    }

    /// Locale overrides with parsed categories.
    pub fn locale_overrides(&self) -> Result<Vec<(Category, String)>> {
        self.locales
            .iter()
            .map(|(name, tag)| Ok((name.parse()?, tag.clone())))
            .collect()
    }
}
