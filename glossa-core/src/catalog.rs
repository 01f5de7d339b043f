//! Catalog Store and Lookup
//!
//! A [`Catalog`] holds every translation loaded for one domain, indexed per
//! locale category. Categories are loaded lazily on first use:
//!
//! 1. Take the shared lock and test the category's loaded bit.
//! 2. If unset, release it and take the exclusive lock.
//! 3. Re-test the bit; if still unset, decode the fallback chain and set it.
//! 4. Downgrade the exclusive guard to a shared one and perform the lookup.
//!
//! The re-test in step 3 means a category's files are decoded at most once
//! even when many readers miss the bit together. Once the bit is set, that
//! category's index entries are never modified; later merges only add keys
//! that were absent.

use crate::arena::Arena;
use crate::locale::{Category, catalog_path, variants};
use crate::mo::MoFile;
use crate::plural::{DEFAULT_MAX_DEPTH, PluralRule};
use crate::Result;
use bytes::Bytes;
use glossa_log::{debug, targets, warn};
use parking_lot::{RwLock, RwLockWriteGuard};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::iter;
use std::path::{Path, PathBuf};

/// One indexed message: a source key and its translated block.
///
/// Both are views into the owning catalog's arena. Plural sources are
/// `singular NUL plural`; plural translations hold one NUL-separated
/// segment per form.
#[derive(Debug, Clone)]
pub struct Entry {
    source: Bytes,
    translated: Bytes,
    extra_plurals: u32,
}

impl Entry {
    /// Build an entry, counting the NUL separators in `translated`.
    pub fn new(source: Bytes, translated: Bytes) -> Self {
        let extra_plurals = memchr::memchr_iter(0, &translated).count() as u32;
        Self {
            source,
            translated,
            extra_plurals,
        }
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn translated(&self) -> &[u8] {
        &self.translated
    }

    /// Number of plural segments beyond the first.
    pub fn extra_plurals(&self) -> u32 {
        self.extra_plurals
    }

    /// The `nth` NUL-delimited segment of the translated block.
    ///
    /// `None` when the entry has no such segment or the segment is empty.
    pub fn plural(&self, nth: u64) -> Option<Bytes> {
        if nth > u64::from(self.extra_plurals) {
            return None;
        }

        let len = self.translated.len();
        let mut start = 0;
        for (i, end) in memchr::memchr_iter(0, &self.translated)
            .chain(iter::once(len))
            .enumerate()
        {
            if i as u64 == nth {
                return (end > start).then(|| self.translated.slice(start..end));
            }
            start = end + 1;
        }
        None
    }
}

/// A translated string returned by a lookup.
///
/// Shares the catalog's arena, so it stays valid independently of any lock.
#[derive(Clone, PartialEq, Eq)]
pub struct Translation(Bytes);

impl Translation {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The text, with invalid UTF-8 replaced.
    pub fn to_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_string(self) -> String {
        self.to_str().into_owned()
    }
}

impl fmt::Debug for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Translation({:?})", self.to_str())
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl PartialEq<str> for Translation {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for Translation {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Outcome of [`Catalog::ensure_loaded`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// The category was already loaded; nothing was attempted.
    pub already_loaded: bool,
    /// Catalog files tried along the fallback chain.
    pub attempted: usize,
    /// Files decoded and merged.
    pub merged: usize,
    /// Files missing or rejected.
    pub failed: usize,
}

impl LoadReport {
    /// Whether every attempted file was merged.
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    directory: Option<PathBuf>,
    loaded: u32,
    arena: Arena,
    index: HashMap<Category, HashMap<Bytes, Entry>>,
    plural: Option<PluralRule>,
}

impl CatalogState {
    fn is_loaded(&self, category: Category) -> bool {
        self.loaded & category.mask() != 0
    }

    fn entry(&self, key: &[u8], category: Category) -> Option<&Entry> {
        self.index.get(&category)?.get(key)
    }

    fn lookup(&self, text: &str, category: Category) -> Option<Translation> {
        if text.is_empty() {
            return None;
        }
        self.entry(text.as_bytes(), category)?
            .plural(0)
            .map(Translation)
    }

    fn plural_index(&self, n: u64, max_depth: u32) -> Result<u64> {
        match &self.plural {
            Some(rule) => rule.index(n, max_depth),
            None => Ok(PluralRule::default_index(n)),
        }
    }

    fn plural_lookup(
        &self,
        singular: &str,
        plural: &str,
        n: u64,
        category: Category,
        max_depth: u32,
    ) -> Option<Translation> {
        let index = match self.plural_index(n, max_depth) {
            Ok(index) => index,
            Err(e) => {
                debug!(target: targets::PLURAL, "plural selection failed for n={}: {}", n, e);
                return None;
            }
        };

        let key = plural_key(singular, plural);
        self.entry(&key, category)?.plural(index).map(Translation)
    }

    /// Merge a decoded file. Existing keys are kept; returns the number of
    /// entries added.
    fn merge(&mut self, file: MoFile, category: Category) -> usize {
        let rule = file.plural_rule();
        let (buffer, entries) = file.into_parts();
        self.arena.adopt(buffer);

        let index = self.index.entry(category).or_default();
        let mut added = 0;
        for entry in entries {
            if !index.contains_key(entry.source()) {
                index.insert(entry.source.clone(), entry);
                added += 1;
            }
        }

        match rule {
            Some(Ok(rule)) if self.plural.is_none() => self.plural = Some(rule),
            Some(Err(e)) => {
                warn!(target: targets::CATALOG, "ignoring Plural-Forms: {}", e);
            }
            _ => {}
        }

        added
    }

    fn load_chain(&mut self, domain: &str, category: Category, locale: &str) -> LoadReport {
        let mut report = LoadReport::default();
        let Some(dir) = self.directory.clone() else {
            return report;
        };

        let mut added = 0;
        for variant in variants(locale) {
            let path = catalog_path(&dir, variant, category, domain);
            report.attempted += 1;

            match MoFile::open(&path) {
                Ok(file) => {
                    added += self.merge(file, category);
                    report.merged += 1;
                }
                Err(e) => {
                    if e.is_not_found() {
                        debug!(target: targets::CATALOG, "no catalog at {}", path.display());
                    }
                    report.failed += 1;
                }
            }
        }

        self.loaded |= category.mask();
        debug!(
            target: targets::CATALOG,
            "loaded {}/{} for '{}': {} of {} files, {} entries",
            domain, category, locale, report.merged, report.attempted, added
        );
        report
    }
}

/// Composite index key of a plural message.
fn plural_key(singular: &str, plural: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(singular.len() + plural.len() + 1);
    key.extend_from_slice(singular.as_bytes());
    key.push(0);
    key.extend_from_slice(plural.as_bytes());
    key
}

/// All translations of one domain.
#[derive(Debug)]
pub struct Catalog {
    domain: String,
    max_eval_depth: u32,
    state: RwLock<CatalogState>,
}

impl Catalog {
    /// Create an empty, unbound catalog.
    pub fn new(domain: impl Into<String>) -> Self {
        Self::with_max_eval_depth(domain, DEFAULT_MAX_DEPTH)
    }

    /// Create a catalog whose plural evaluation is bounded at `max_eval_depth`.
    pub fn with_max_eval_depth(domain: impl Into<String>, max_eval_depth: u32) -> Self {
        Self {
            domain: domain.into(),
            max_eval_depth,
            state: RwLock::new(CatalogState::default()),
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Set the search directory. Already loaded categories are kept.
    pub fn bind_directory(&self, dir: impl Into<PathBuf>) -> PathBuf {
        let dir = dir.into();
        self.state.write().directory = Some(dir.clone());
        dir
    }

    pub fn directory(&self) -> Option<PathBuf> {
        self.state.read().directory.clone()
    }

    /// Decode one file and merge it into `category`.
    ///
    /// Returns the number of entries added. A failing file leaves the
    /// catalog untouched.
    pub fn load_file(&self, path: impl AsRef<Path>, category: Category) -> Result<usize> {
        let file = MoFile::open(path)?;
        Ok(self.state.write().merge(file, category))
    }

    /// Load `category` for `locale` from the bound directory unless already
    /// loaded. Idempotent.
    ///
    /// Without a bound directory nothing is loaded and the category stays
    /// unloaded.
    pub fn ensure_loaded(&self, category: Category, locale: &str) -> LoadReport {
        let state = self.state.read();
        if state.is_loaded(category) {
            return LoadReport {
                already_loaded: true,
                ..LoadReport::default()
            };
        }
        if state.directory.is_none() {
            return LoadReport::default();
        }
        drop(state);

        let mut state = self.state.write();
        if state.is_loaded(category) {
            return LoadReport {
                already_loaded: true,
                ..LoadReport::default()
            };
        }
        state.load_chain(&self.domain, category, locale)
    }

    /// Run `f` on the state with `category` loaded, holding the shared lock.
    fn with_loaded<R>(
        &self,
        category: Category,
        locale: &str,
        f: impl FnOnce(&CatalogState) -> R,
    ) -> R {
        let state = self.state.read();
        if state.is_loaded(category) || state.directory.is_none() {
            return f(&state);
        }
        drop(state);

        let mut state = self.state.write();
        if !state.is_loaded(category) {
            state.load_chain(&self.domain, category, locale);
        }
        let state = RwLockWriteGuard::downgrade(state);
        f(&state)
    }

    /// Look up `text` in an already loaded category.
    pub fn lookup(&self, text: &str, category: Category) -> Option<Translation> {
        self.state.read().lookup(text, category)
    }

    /// Look up a plural message in an already loaded category.
    pub fn plural_lookup(
        &self,
        singular: &str,
        plural: &str,
        n: u64,
        category: Category,
    ) -> Option<Translation> {
        self.state
            .read()
            .plural_lookup(singular, plural, n, category, self.max_eval_depth)
    }

    /// Load `category` for `locale` if needed, then look up `text`.
    pub fn translate(&self, text: &str, category: Category, locale: &str) -> Option<Translation> {
        if text.is_empty() {
            return None;
        }
        self.with_loaded(category, locale, |state| state.lookup(text, category))
    }

    /// Load `category` for `locale` if needed, then look up a plural message.
    pub fn translate_plural(
        &self,
        singular: &str,
        plural: &str,
        n: u64,
        category: Category,
        locale: &str,
    ) -> Option<Translation> {
        self.with_loaded(category, locale, |state| {
            state.plural_lookup(singular, plural, n, category, self.max_eval_depth)
        })
    }

    /// Plural form index for `n` under the installed (or default) rule.
    pub fn plural_index(&self, n: u64) -> Result<u64> {
        self.state.read().plural_index(n, self.max_eval_depth)
    }

    /// The installed plural rule, if any.
    pub fn plural_rule(&self) -> Option<PluralRule> {
        self.state.read().plural.clone()
    }

    pub fn is_loaded(&self, category: Category) -> bool {
        self.state.read().is_loaded(category)
    }

    /// Number of indexed messages in `category`.
    pub fn len(&self, category: Category) -> usize {
        self.state
            .read()
            .index
            .get(&category)
            .map_or(0, HashMap::len)
    }

    /// Whether no category holds any message.
    pub fn is_empty(&self) -> bool {
        self.state.read().index.values().all(HashMap::is_empty)
    }

    /// Bytes held by the string arena.
    pub fn arena_bytes(&self) -> usize {
        self.state.read().arena.len()
    }
}
