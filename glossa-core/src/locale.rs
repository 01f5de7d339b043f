//! Locale Categories and Fallback Chains
//!
//! A catalog for category `C` and locale tag `T` lives at
//! `<dir>/<variant>/<C name>/<domain>.mo`, where `variant` runs over
//! progressively shorter forms of `T`: `en_US.UTF-8@euro`, `en_US.UTF-8`,
//! `en_US`, `en`.

use crate::{IntlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File extension of compiled catalogs.
pub const CATALOG_EXTENSION: &str = "mo";

/// Locale categories, numbered as in POSIX `<locale.h>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    #[serde(rename = "LC_CTYPE")]
    CType = 0,
    #[serde(rename = "LC_NUMERIC")]
    Numeric = 1,
    #[serde(rename = "LC_TIME")]
    Time = 2,
    #[serde(rename = "LC_COLLATE")]
    Collate = 3,
    #[serde(rename = "LC_MONETARY")]
    Monetary = 4,
    #[serde(rename = "LC_MESSAGES")]
    Messages = 5,
    #[serde(rename = "LC_ALL")]
    All = 6,
}

impl Category {
    /// All categories in numeric order.
    pub const ALL: [Category; 7] = [
        Category::CType,
        Category::Numeric,
        Category::Time,
        Category::Collate,
        Category::Monetary,
        Category::Messages,
        Category::All,
    ];

    /// Convert a raw category number.
    pub fn from_raw(raw: i32) -> Result<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(IntlError::InvalidCategory(raw))
    }

    /// Numeric value (also the bit index in a catalog's loaded mask).
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Bit for this category in a 32-bit loaded mask.
    pub fn mask(self) -> u32 {
        1 << self.index()
    }

    /// Directory name, e.g. `LC_MESSAGES`.
    pub fn name(self) -> &'static str {
        match self {
            Category::CType => "LC_CTYPE",
            Category::Numeric => "LC_NUMERIC",
            Category::Time => "LC_TIME",
            Category::Collate => "LC_COLLATE",
            Category::Monetary => "LC_MONETARY",
            Category::Messages => "LC_MESSAGES",
            Category::All => "LC_ALL",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = IntlError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IntlError::Config(format!("unknown category '{}'", s)))
    }
}

impl TryFrom<i32> for Category {
    type Error = IntlError;

    fn try_from(raw: i32) -> Result<Self> {
        Self::from_raw(raw)
    }
}

/// Iterator over the fallback variants of a locale tag, most specific first.
///
/// Each step truncates at the last `_`, `.` or `@`. The empty tag is never
/// produced.
#[derive(Debug, Clone)]
pub struct Variants<'a> {
    rest: Option<&'a str>,
}

/// Fallback variants of `tag`.
///
/// ```
/// use glossa_core::locale::variants;
///
/// let all: Vec<_> = variants("en_US.UTF-8@euro").collect();
/// assert_eq!(all, ["en_US.UTF-8@euro", "en_US.UTF-8", "en_US", "en"]);
/// ```
pub fn variants(tag: &str) -> Variants<'_> {
    Variants {
        rest: (!tag.is_empty()).then_some(tag),
    }
}

impl<'a> Iterator for Variants<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.rest?;
        self.rest = current
            .rfind(['_', '.', '@'])
            .map(|pos| &current[..pos])
            .filter(|shorter| !shorter.is_empty());
        Some(current)
    }
}

/// Path of the catalog for one variant.
pub fn catalog_path(dir: &Path, variant: &str, category: Category, domain: &str) -> PathBuf {
    dir.join(variant)
        .join(category.name())
        .join(format!("{}.{}", domain, CATALOG_EXTENSION))
}

/// Whether a locale name means "untranslated".
pub fn is_neutral(tag: &str) -> bool {
    tag.is_empty() || tag == "C" || tag == "POSIX" || tag.starts_with("C.")
}

// ============================================================================
// Locale Providers
// ============================================================================

/// Source of the active locale tag per category.
pub trait LocaleProvider: Send + Sync {
    /// Locale tag for `category`, or `None` when it should not be translated.
    fn locale(&self, category: Category) -> Option<String>;
}

/// Reads the POSIX environment: `LC_ALL`, then `LC_<CATEGORY>`, then `LANG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvLocaleProvider;

impl LocaleProvider for EnvLocaleProvider {
    fn locale(&self, category: Category) -> Option<String> {
        let lookup = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let value = lookup("LC_ALL")
            .or_else(|| match category {
                Category::All => None,
                _ => lookup(category.name()),
            })
            .or_else(|| lookup("LANG"))?;

        (!is_neutral(&value)).then_some(value)
    }
}

/// Fixed per-category tags, with an optional default for the rest.
#[derive(Debug, Clone, Default)]
pub struct StaticLocaleProvider {
    default: Option<String>,
    overrides: HashMap<Category, String>,
}

impl StaticLocaleProvider {
    /// Use `tag` for every category.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            default: Some(tag.into()),
            overrides: HashMap::new(),
        }
    }

    /// Provider that never translates.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Use `tag` for `category`.
    pub fn with(mut self, category: Category, tag: impl Into<String>) -> Self {
        self.overrides.insert(category, tag.into());
        self
    }
}

impl LocaleProvider for StaticLocaleProvider {
    fn locale(&self, category: Category) -> Option<String> {
        self.overrides
            .get(&category)
            .or(self.default.as_ref())
            .filter(|tag| !is_neutral(tag))
            .cloned()
    }
}
