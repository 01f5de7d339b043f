//! gettext-Compatible Catalog Engine
//!
//! Loads compiled `.mo` catalogs lazily, per domain and locale category, and
//! resolves singular and plural translations:
//!
//! - **Catalog decoding**: both byte orders, bounds-checked, all-or-nothing
//! - **Plural rules**: the C-like `Plural-Forms` expression language,
//!   compiled once and evaluated with short-circuit and failure semantics
//! - **Lazy loading**: each category is decoded at most once, on first use,
//!   along the locale fallback chain (`en_US.UTF-8` → `en_US` → `en`)
//! - **Registry**: the `gettext` family over named domains
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use glossa_core::{Category, Intl, IntlConfig, StaticLocaleProvider};
//!
//! let config = IntlConfig::default().bind("myapp", "/usr/share/locale");
//! let intl = Intl::with_provider(config, StaticLocaleProvider::new("fr_FR.UTF-8"))?;
//! intl.text_domain("myapp");
//!
//! let hello = intl.gettext("Hello");
//! let files = intl.ngettext("one file", "{} files", 3);
//! let time = intl.dcgettext(None, "%H:%M", Category::Time);
//! # Ok::<(), glossa_core::IntlError>(())
//! ```
//!
//! # Plural Expressions
//!
//! ```rust
//! use glossa_core::PluralExpr;
//!
//! let expr = PluralExpr::compile("n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2")?;
//! assert_eq!(expr.eval(1), Ok(0));
//! assert_eq!(expr.eval(3), Ok(1));
//! assert_eq!(expr.eval(12), Ok(2));
//! # Ok::<(), glossa_core::IntlError>(())
//! ```

mod arena;
mod catalog;
mod config;
mod error;
pub mod locale;
pub mod mo;
pub mod plural;
mod registry;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use arena::Arena;
pub use catalog::{Catalog, Entry, LoadReport, Translation};
pub use config::{DEFAULT_DOMAIN, IntlConfig};
pub use error::{EvalError, IntlError};
pub use locale::{Category, EnvLocaleProvider, LocaleProvider, StaticLocaleProvider};
pub use mo::MoFile;
pub use plural::{PluralExpr, PluralRule};
pub use registry::Intl;

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, IntlError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Catalog, Category, Intl, IntlConfig, IntlError, LocaleProvider, PluralExpr, PluralRule,
        Result, StaticLocaleProvider, Translation,
    };
}
