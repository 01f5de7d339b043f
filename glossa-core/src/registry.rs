//! Domain Registry
//!
//! [`Intl`] maps domain names to catalogs and exposes the gettext-style
//! procedural API. Every call degrades to returning the caller's text when
//! no translation is available, so callers never handle errors here.
//!
//! An `Intl` is an ordinary value: tests build as many independent ones as
//! they need. The facade crate layers a process-wide instance on top.

use crate::catalog::{Catalog, Translation};
use crate::config::IntlConfig;
use crate::locale::{Category, EnvLocaleProvider, LocaleProvider, is_neutral};
use crate::Result;
use glossa_log::{debug, targets};
use parking_lot::RwLock;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// A registry of translation domains.
pub struct Intl {
    max_eval_depth: u32,
    provider: Box<dyn LocaleProvider>,
    locales: RwLock<HashMap<Category, Option<String>>>,
    domains: RwLock<HashMap<String, Arc<Catalog>>>,
    current: RwLock<String>,
}

impl fmt::Debug for Intl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intl")
            .field("current", &*self.current.read())
            .field("domains", &self.domains.read().keys().collect::<Vec<_>>())
            .field("locales", &*self.locales.read())
            .finish_non_exhaustive()
    }
}

impl Default for Intl {
    fn default() -> Self {
        Self::from_parts(&IntlConfig::default(), Box::new(EnvLocaleProvider))
    }
}

impl Intl {
    /// Build from a configuration, reading locales from the environment.
    pub fn new(config: IntlConfig) -> Result<Self> {
        Self::with_provider(config, EnvLocaleProvider)
    }

    /// Build from a configuration and a locale provider.
    ///
    /// Bindings and locale overrides in `config` are applied immediately.
    pub fn with_provider(config: IntlConfig, provider: impl LocaleProvider + 'static) -> Result<Self> {
        config.validate()?;
        let intl = Self::from_parts(&config, Box::new(provider));

        for (category, tag) in config.locale_overrides()? {
            intl.set_category_locale(category, Some(tag));
        }
        for (domain, dir) in &config.bindings {
            intl.bind_text_domain(domain, dir.clone());
        }

        Ok(intl)
    }

    fn from_parts(config: &IntlConfig, provider: Box<dyn LocaleProvider>) -> Self {
        Self {
            max_eval_depth: config.max_eval_depth,
            provider,
            locales: RwLock::new(HashMap::new()),
            domains: RwLock::new(HashMap::new()),
            current: RwLock::new(config.default_domain.clone()),
        }
    }

    // ========================================================================
    // Domains
    // ========================================================================

    /// The catalog for `domain`, created if absent.
    pub fn open_or_get(&self, domain: &str) -> Arc<Catalog> {
        if let Some(catalog) = self.domains.read().get(domain) {
            return Arc::clone(catalog);
        }

        let mut domains = self.domains.write();
        let catalog = domains
            .entry(domain.to_string())
            .or_insert_with(|| {
                debug!(target: targets::REGISTRY, "creating catalog for domain '{}'", domain);
                Arc::new(Catalog::with_max_eval_depth(domain, self.max_eval_depth))
            });
        Arc::clone(catalog)
    }

    /// The catalog for `domain`, if one exists.
    pub fn catalog(&self, domain: &str) -> Option<Arc<Catalog>> {
        self.domains.read().get(domain).cloned()
    }

    /// Bind `domain` to a catalog directory, creating the catalog on first
    /// bind. Returns the bound directory.
    pub fn bind_text_domain(&self, domain: &str, dir: impl Into<PathBuf>) -> PathBuf {
        self.open_or_get(domain).bind_directory(dir)
    }

    /// Set the current domain, returning it.
    pub fn text_domain(&self, domain: impl Into<String>) -> String {
        let domain = domain.into();
        *self.current.write() = domain.clone();
        domain
    }

    pub fn current_domain(&self) -> String {
        self.current.read().clone()
    }

    // ========================================================================
    // Locales
    // ========================================================================

    /// Locale tag for `category`, resolved once through the provider and
    /// cached.
    pub fn category_locale(&self, category: Category) -> Option<String> {
        if let Some(tag) = self.locales.read().get(&category) {
            return tag.clone();
        }

        let mut locales = self.locales.write();
        locales
            .entry(category)
            .or_insert_with(|| self.provider.locale(category))
            .clone()
    }

    /// Replace the cached locale of `category`. `None`, `C` and `POSIX`
    /// disable translation.
    ///
    /// Categories already loaded under another locale keep their strings.
    pub fn set_category_locale(&self, category: Category, tag: Option<String>) {
        let tag = tag.filter(|tag| !is_neutral(tag));
        self.locales.write().insert(category, tag);
    }

    // ========================================================================
    // Procedural API
    // ========================================================================

    fn resolve(&self, domain: Option<&str>, category: Category) -> Option<(Arc<Catalog>, String)> {
        let catalog = match domain {
            Some(domain) => self.catalog(domain)?,
            None => self.catalog(&self.current.read())?,
        };
        let locale = self.category_locale(category)?;
        Some((catalog, locale))
    }

    /// Translate `text` in the current domain, `LC_MESSAGES`.
    pub fn gettext<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.dcgettext(None, text, Category::Messages)
    }

    /// Translate `text` in `domain`, `LC_MESSAGES`.
    pub fn dgettext<'a>(&self, domain: &str, text: &'a str) -> Cow<'a, str> {
        self.dcgettext(Some(domain), text, Category::Messages)
    }

    /// Translate `text` in `domain` (or the current one) and `category`.
    ///
    /// `category` may be a [`Category`] or a raw POSIX number; unknown
    /// numbers return `text`.
    pub fn dcgettext<'a, C>(&self, domain: Option<&str>, text: &'a str, category: C) -> Cow<'a, str>
    where
        C: TryInto<Category>,
    {
        if text.is_empty() {
            return Cow::Borrowed(text);
        }
        let Ok(category) = category.try_into() else {
            return Cow::Borrowed(text);
        };

        self.resolve(domain, category)
            .and_then(|(catalog, locale)| catalog.translate(text, category, &locale))
            .map(owned)
            .unwrap_or(Cow::Borrowed(text))
    }

    /// Plural translation in the current domain, `LC_MESSAGES`.
    pub fn ngettext<'a>(&self, singular: &'a str, plural: &'a str, n: u64) -> Cow<'a, str> {
        self.dcngettext(None, singular, plural, n, Category::Messages)
    }

    /// Plural translation in `domain`, `LC_MESSAGES`.
    pub fn dngettext<'a>(
        &self,
        domain: &str,
        singular: &'a str,
        plural: &'a str,
        n: u64,
    ) -> Cow<'a, str> {
        self.dcngettext(Some(domain), singular, plural, n, Category::Messages)
    }

    /// Plural translation in `domain` (or the current one) and `category`.
    ///
    /// Without a translation the result is `singular` when `n == 1` and
    /// `plural` otherwise.
    pub fn dcngettext<'a, C>(
        &self,
        domain: Option<&str>,
        singular: &'a str,
        plural: &'a str,
        n: u64,
        category: C,
    ) -> Cow<'a, str>
    where
        C: TryInto<Category>,
    {
        let fallback = Cow::Borrowed(if n == 1 { singular } else { plural });
        if singular.is_empty() {
            return fallback;
        }
        let Ok(category) = category.try_into() else {
            return fallback;
        };

        self.resolve(domain, category)
            .and_then(|(catalog, locale)| {
                catalog.translate_plural(singular, plural, n, category, &locale)
            })
            .map(owned)
            .unwrap_or(fallback)
    }
}

fn owned<'a>(translation: Translation) -> Cow<'a, str> {
    Cow::Owned(translation.into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{StaticLocaleProvider, catalog_path};
    use crate::testing::MoBuilder;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Intl) {
        let tmp = TempDir::new().unwrap();
        MoBuilder::new()
            .plural_forms("nplurals=2; plural=(n > 1);")
            .message("Hello", "Bonjour")
            .plural("one file", "{} files", &["un fichier", "{} fichiers"])
            .write_to(catalog_path(tmp.path(), "fr", Category::Messages, "app"))
            .unwrap();
        MoBuilder::new()
            .message("Hello", "Bonjour (heure)")
            .write_to(catalog_path(tmp.path(), "fr", Category::Time, "app"))
            .unwrap();

        let config = IntlConfig::default().bind("app", tmp.path());
        let intl = Intl::with_provider(config, StaticLocaleProvider::new("fr_FR")).unwrap();
        intl.text_domain("app");
        (tmp, intl)
    }

    #[test]
    fn test_gettext_family() {
        let (_tmp, intl) = fixture();

        assert_eq!(intl.gettext("Hello"), "Bonjour");
        assert_eq!(intl.dgettext("app", "Hello"), "Bonjour");
        assert_eq!(intl.dcgettext(Some("app"), "Hello", Category::Time), "Bonjour (heure)");
        assert_eq!(intl.dcgettext(Some("app"), "Hello", 2), "Bonjour (heure)");
        assert_eq!(intl.gettext("Missing"), "Missing");
    }

    #[test]
    fn test_fallback_borrows() {
        let (_tmp, intl) = fixture();

        assert!(matches!(intl.gettext("Missing"), Cow::Borrowed("Missing")));
        assert!(matches!(intl.gettext(""), Cow::Borrowed("")));
        assert!(matches!(intl.dgettext("nope", "Hello"), Cow::Borrowed("Hello")));
        assert!(matches!(intl.dcgettext(None, "Hello", 99), Cow::Borrowed("Hello")));
        assert!(matches!(intl.dcgettext(None, "Hello", -1), Cow::Borrowed("Hello")));
    }

    #[test]
    fn test_ngettext_family() {
        let (_tmp, intl) = fixture();

        assert_eq!(intl.ngettext("one file", "{} files", 0), "un fichier");
        assert_eq!(intl.ngettext("one file", "{} files", 1), "un fichier");
        assert_eq!(intl.ngettext("one file", "{} files", 2), "{} fichiers");
        assert_eq!(intl.dngettext("app", "one file", "{} files", 7), "{} fichiers");

        assert_eq!(intl.ngettext("one dir", "{} dirs", 1), "one dir");
        assert_eq!(intl.ngettext("one dir", "{} dirs", 3), "{} dirs");
        assert_eq!(intl.ngettext("", "plural", 1), "");
        assert_eq!(intl.ngettext("", "plural", 2), "plural");
        assert_eq!(intl.dcngettext(None, "one file", "{} files", 2, 42), "{} files");
    }

    #[test]
    fn test_domains() {
        let (tmp, intl) = fixture();

        assert_eq!(intl.current_domain(), "app");
        assert!(intl.catalog("other").is_none());

        let a = intl.open_or_get("other");
        let b = intl.open_or_get("other");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.domain(), "other");

        // Known domain without a directory falls back.
        assert_eq!(intl.dgettext("other", "Hello"), "Hello");

        let dir = intl.bind_text_domain("other", tmp.path());
        assert_eq!(dir, tmp.path());
        assert_eq!(intl.catalog("other").unwrap().directory().as_deref(), Some(tmp.path()));

        intl.text_domain("other");
        assert_eq!(intl.gettext("Hello"), "Hello");
    }

    #[test]
    fn test_locale_cache_and_override() {
        let (_tmp, intl) = fixture();

        assert_eq!(intl.category_locale(Category::Messages).as_deref(), Some("fr_FR"));

        intl.set_category_locale(Category::Messages, None);
        assert_eq!(intl.gettext("Hello"), "Hello");

        intl.set_category_locale(Category::Messages, Some("fr".to_string()));
        assert_eq!(intl.gettext("Hello"), "Bonjour");
    }

    #[test]
    fn test_cached_lookups_take_shared_locks() {
        let (_tmp, intl) = fixture();
        assert_eq!(intl.gettext("Hello"), "Bonjour");

        // Only one upgradable guard may exist at a time; warm lookups must
        // not need one.
        let _locales = intl.locales.upgradable_read();
        let _domains = intl.domains.upgradable_read();
        assert_eq!(intl.category_locale(Category::Messages).as_deref(), Some("fr_FR"));
        assert!(Arc::ptr_eq(&intl.open_or_get("app"), &intl.catalog("app").unwrap()));
        assert_eq!(intl.gettext("Hello"), "Bonjour");
        assert_eq!(intl.ngettext("one file", "{} files", 2), "{} fichiers");
    }

    #[test]
    fn test_neutral_locale_does_not_load() {
        let tmp = TempDir::new().unwrap();
        let config = IntlConfig::default().bind("app", tmp.path());
        let intl = Intl::with_provider(config, StaticLocaleProvider::neutral()).unwrap();

        assert_eq!(intl.dgettext("app", "Hello"), "Hello");
        assert!(!intl.catalog("app").unwrap().is_loaded(Category::Messages));
    }

    #[test]
    fn test_config_overrides() {
        let config = IntlConfig::default()
            .locale(Category::Messages, "de")
            .locale(Category::Time, "C");
        let intl = Intl::with_provider(config, StaticLocaleProvider::new("fr")).unwrap();

        assert_eq!(intl.category_locale(Category::Messages).as_deref(), Some("de"));
        assert_eq!(intl.category_locale(Category::Numeric).as_deref(), Some("fr"));
        assert_eq!(intl.category_locale(Category::Time), None);
        assert_eq!(intl.current_domain(), "messages");
    }
}
