//! Error types for catalog operations
//!
//! None of these are fatal to the caller: the procedural `gettext` API turns
//! every one of them into "return the source text".

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading catalogs or selecting plural forms.
#[derive(Debug, Error)]
pub enum IntlError {
    /// Catalog file does not exist; the next fallback variant is tried.
    #[error("Catalog file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Catalog file exists but could not be read.
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not a valid compiled catalog; the file is skipped.
    #[error("Malformed catalog: {reason}")]
    MalformedCatalog { reason: String },

    /// `Plural-Forms` metadata could not be used; the default rule applies.
    #[error("Invalid plural metadata: {0}")]
    InvalidPluralMetadata(String),

    /// Plural expression failed to compile.
    #[error("Plural expression syntax error at byte {position}: {message}")]
    ExpressionSyntax { position: usize, message: String },

    /// Plural expression failed to evaluate.
    #[error("Plural expression evaluation failed: {0}")]
    Evaluation(#[from] EvalError),

    /// Evaluated plural index is not below `nplurals`.
    #[error("Plural index {index} out of range for nplurals={nplurals}")]
    IndexOutOfRange { index: u64, nplurals: u32 },

    /// Raw category number is not a known locale category.
    #[error("Invalid locale category: {0}")]
    InvalidCategory(i32),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntlError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        IntlError::MalformedCatalog {
            reason: reason.into(),
        }
    }

    /// Whether this error only means "nothing to load here".
    pub fn is_not_found(&self) -> bool {
        matches!(self, IntlError::FileNotFound(_))
    }
}

/// Failure of a single plural expression evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Nesting exceeded the evaluation depth bound.
    #[error("maximum evaluation depth exceeded")]
    DepthExceeded,

    /// The expression never compiled.
    #[error("expression is not valid")]
    Invalid,
}
