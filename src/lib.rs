// Glossa - a gettext-compatible translation runtime for Rust
//
// This library loads compiled .mo catalogs lazily per domain and locale
// category, and resolves singular and plural translations through the
// familiar gettext family of functions.

// Re-export core functionality
pub use glossa_core::*;

// Re-export logging configuration
pub use glossa_log as logging;

pub mod global;

pub use global::{
    bindtextdomain, dcgettext, dcgettext_in, dcngettext, dgettext, dngettext, gettext, ngettext,
    textdomain,
};

// Prelude for common imports
pub mod prelude {
    pub use crate::global::{dgettext, dngettext, gettext, ngettext};
    pub use crate::{
        Catalog, Category, Intl, IntlConfig, IntlError, LocaleProvider, StaticLocaleProvider,
    };
}
