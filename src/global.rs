//! Process-wide registry.
//!
//! The free functions delegate to one shared [`Intl`]. It is created on
//! first use from [`IntlConfig::from_env`] and the environment locale, unless
//! one was [`install`]ed before. [`reset`] drops it, so the next call starts
//! from scratch.
//!
//! ```rust,no_run
//! use glossa::{Intl, IntlConfig, StaticLocaleProvider};
//!
//! let config = IntlConfig::default().bind("myapp", "/usr/share/locale");
//! glossa::global::install(Intl::with_provider(config, StaticLocaleProvider::new("de_DE"))?);
//! glossa::textdomain("myapp");
//!
//! println!("{}", glossa::gettext("Hello"));
//! # Ok::<(), glossa::IntlError>(())
//! ```

use glossa_core::{Category, Intl, IntlConfig};
use glossa_log::{debug, targets, warn};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

static INSTANCE: Lazy<RwLock<Option<Arc<Intl>>>> = Lazy::new(|| RwLock::new(None));

/// Replace the shared registry, returning the installed handle.
pub fn install(intl: Intl) -> Arc<Intl> {
    let intl = Arc::new(intl);
    *INSTANCE.write() = Some(Arc::clone(&intl));
    intl
}

/// The shared registry, created from the environment if none is installed.
pub fn instance() -> Arc<Intl> {
    if let Some(intl) = INSTANCE.read().as_ref() {
        return Arc::clone(intl);
    }

    let mut slot = INSTANCE.write();
    let intl = slot.get_or_insert_with(|| {
        debug!(target: targets::REGISTRY, "creating process-wide registry from environment");
        let intl = Intl::new(IntlConfig::from_env()).unwrap_or_else(|e| {
            warn!(target: targets::REGISTRY, "falling back to defaults: {}", e);
            Intl::default()
        });
        Arc::new(intl)
    });
    Arc::clone(intl)
}

/// Drop the shared registry, returning it if one existed.
///
/// Handles obtained earlier stay usable.
pub fn reset() -> Option<Arc<Intl>> {
    INSTANCE.write().take()
}

/// Translate `text` in the current domain.
pub fn gettext(text: &str) -> Cow<'_, str> {
    instance().gettext(text)
}

/// Translate `text` in `domain`.
pub fn dgettext<'a>(domain: &str, text: &'a str) -> Cow<'a, str> {
    instance().dgettext(domain, text)
}

/// Translate `text` in `domain` (or the current one) for a raw category
/// number, e.g. `libc::LC_TIME`.
pub fn dcgettext<'a>(domain: Option<&str>, text: &'a str, category: i32) -> Cow<'a, str> {
    instance().dcgettext(domain, text, category)
}

/// Plural translation in the current domain.
pub fn ngettext<'a>(singular: &'a str, plural: &'a str, n: u64) -> Cow<'a, str> {
    instance().ngettext(singular, plural, n)
}

/// Plural translation in `domain`.
pub fn dngettext<'a>(domain: &str, singular: &'a str, plural: &'a str, n: u64) -> Cow<'a, str> {
    instance().dngettext(domain, singular, plural, n)
}

/// Plural translation in `domain` (or the current one) for a raw category
/// number.
pub fn dcngettext<'a>(
    domain: Option<&str>,
    singular: &'a str,
    plural: &'a str,
    n: u64,
    category: i32,
) -> Cow<'a, str> {
    instance().dcngettext(domain, singular, plural, n, category)
}

/// Bind `domain` to a catalog directory.
pub fn bindtextdomain(domain: &str, dir: impl Into<PathBuf>) -> PathBuf {
    instance().bind_text_domain(domain, dir)
}

/// Set the current domain.
pub fn textdomain(domain: impl Into<String>) -> String {
    instance().text_domain(domain)
}

/// Category-typed variant of [`dcgettext`].
pub fn dcgettext_in<'a>(domain: Option<&str>, text: &'a str, category: Category) -> Cow<'a, str> {
    instance().dcgettext(domain, text, category)
}
