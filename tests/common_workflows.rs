//! Integration tests for common glossa workflows.
//!
//! Each test lays out a real locale tree in a temp dir and goes through the
//! public registry API the way an application would.

use glossa::{Category, Intl, IntlConfig, LoadReport, StaticLocaleProvider};
use glossa_core::locale::catalog_path;
use glossa_core::testing::MoBuilder;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const SINGULAR: &str = "I have one apple.";
const PLURAL: &str = "I have {} apples.";

fn install(root: &Path, locale: &str, category: Category, domain: &str, builder: MoBuilder) {
    builder
        .write_to(catalog_path(root, locale, category, domain))
        .unwrap();
}

fn registry(root: &Path, domain: &str, locale: &str) -> Intl {
    let config = IntlConfig::default().bind(domain, root);
    let intl = Intl::with_provider(config, StaticLocaleProvider::new(locale)).unwrap();
    intl.text_domain(domain);
    intl
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_translate_and_fall_back() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "fr",
        Category::Messages,
        "app",
        MoBuilder::new()
            .message("A message in english", "Un message en français")
            .message("Another message in english", "Un autre message en français"),
    );
    let intl = registry(tmp.path(), "app", "fr_FR.UTF-8");

    assert_eq!(intl.gettext("A message in english"), "Un message en français");
    assert_eq!(
        intl.gettext("Another message in english"),
        "Un autre message en français"
    );
    assert_eq!(
        intl.gettext("A message not in the catalog"),
        "A message not in the catalog"
    );
    assert_eq!(intl.gettext(""), "");
}

#[test]
fn test_big_endian_catalog() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "de",
        Category::Messages,
        "app",
        MoBuilder::new().message("Yes", "Ja").big_endian(),
    );
    let intl = registry(tmp.path(), "app", "de_AT");

    assert_eq!(intl.gettext("Yes"), "Ja");
}

#[test]
fn test_categories_are_independent() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "fr",
        Category::Messages,
        "app",
        MoBuilder::new().message("Monday", "lundi (messages)"),
    );
    install(
        tmp.path(),
        "fr",
        Category::Time,
        "app",
        MoBuilder::new().message("Monday", "lundi"),
    );
    let intl = registry(tmp.path(), "app", "fr");

    assert_eq!(intl.dcgettext(None, "Monday", Category::Time), "lundi");
    assert_eq!(intl.gettext("Monday"), "lundi (messages)");
    assert_eq!(intl.dcgettext(None, "Monday", Category::Numeric), "Monday");

    let catalog = intl.catalog("app").unwrap();
    assert!(catalog.is_loaded(Category::Time));
    assert!(catalog.is_loaded(Category::Messages));
    assert!(catalog.is_loaded(Category::Numeric));
    assert_eq!(catalog.len(Category::Numeric), 0);
}

// =============================================================================
// Plurals
// =============================================================================

#[test]
fn test_three_form_plural_catalog() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "fr",
        Category::Messages,
        "app",
        MoBuilder::new()
            .plural_forms("nplurals=3; plural=(n==1 ? 1 : n==2 ? 2 : 0);")
            .plural(
                SINGULAR,
                PLURAL,
                &["J'ai {} pommes.", "J'ai une pomme.", "J'ai deux pommes."],
            ),
    );
    let intl = registry(tmp.path(), "app", "fr_FR");

    assert_eq!(intl.ngettext(SINGULAR, PLURAL, 0), "J'ai {} pommes.");
    assert_eq!(intl.ngettext(SINGULAR, PLURAL, 1), "J'ai une pomme.");
    assert_eq!(intl.ngettext(SINGULAR, PLURAL, 2), "J'ai deux pommes.");
    assert_eq!(intl.ngettext(SINGULAR, PLURAL, 3), "J'ai {} pommes.");

    let other = ("A singular message not in the catalog", "A plural message not in the catalog");
    assert_eq!(intl.ngettext(other.0, other.1, 1), other.0);
    assert_eq!(intl.ngettext(other.0, other.1, 2), other.1);
}

#[test]
fn test_default_rule_without_plural_forms() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "es",
        Category::Messages,
        "app",
        MoBuilder::new().plural("one dog", "{} dogs", &["un perro", "{} perros"]),
    );
    let intl = registry(tmp.path(), "app", "es");

    assert_eq!(intl.ngettext("one dog", "{} dogs", 0), "{} perros");
    assert_eq!(intl.ngettext("one dog", "{} dogs", 1), "un perro");
    assert_eq!(intl.ngettext("one dog", "{} dogs", 2), "{} perros");
}

#[test]
fn test_failing_rule_returns_source_forms() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "xx",
        Category::Messages,
        "app",
        MoBuilder::new()
            .plural_forms("nplurals=2; plural=n % (n - 1);")
            .plural("one", "many", &["uno", "muchos"]),
    );
    let intl = registry(tmp.path(), "app", "xx");

    // n = 1 divides by zero; the caller's forms come back.
    assert_eq!(intl.ngettext("one", "many", 1), "one");
    assert_eq!(intl.ngettext("one", "many", 3), "muchos");
}

// =============================================================================
// Fallback chain
// =============================================================================

#[test]
fn test_most_specific_variant_wins() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "en_US",
        Category::Messages,
        "app",
        MoBuilder::new().message("greeting", "Howdy"),
    );
    install(
        tmp.path(),
        "en",
        Category::Messages,
        "app",
        MoBuilder::new()
            .message("greeting", "Hello")
            .message("farewell", "Goodbye"),
    );
    let intl = registry(tmp.path(), "app", "en_US.UTF-8@euro");

    assert_eq!(intl.gettext("greeting"), "Howdy");
    assert_eq!(intl.gettext("farewell"), "Goodbye");
}

#[test]
fn test_ensure_loaded_twice_matches_once() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "it",
        Category::Messages,
        "app",
        MoBuilder::new().message("a", "b").message("c", "d"),
    );
    let intl = registry(tmp.path(), "app", "it");
    let catalog = intl.catalog("app").unwrap();

    let first = catalog.ensure_loaded(Category::Messages, "it");
    let snapshot = (catalog.len(Category::Messages), catalog.arena_bytes());
    let second = catalog.ensure_loaded(Category::Messages, "it");

    assert_eq!(
        first,
        LoadReport {
            already_loaded: false,
            attempted: 1,
            merged: 1,
            failed: 0,
        }
    );
    assert!(second.already_loaded);
    assert_eq!(snapshot, (catalog.len(Category::Messages), catalog.arena_bytes()));
}

#[test]
fn test_corrupt_specific_file_keeps_generic_one() {
    let tmp = TempDir::new().unwrap();
    let mut bad = MoBuilder::new().message("k", "broken").build();
    bad.truncate(bad.len() / 2);
    let path = catalog_path(tmp.path(), "pt_BR", Category::Messages, "app");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, bad).unwrap();
    install(
        tmp.path(),
        "pt",
        Category::Messages,
        "app",
        MoBuilder::new().message("k", "valor"),
    );
    let intl = registry(tmp.path(), "app", "pt_BR");

    assert_eq!(intl.gettext("k"), "valor");
}

#[test]
fn test_corrupt_generic_file_keeps_specific_one() {
    let tmp = TempDir::new().unwrap();
    install(
        tmp.path(),
        "en_US",
        Category::Messages,
        "app",
        MoBuilder::new().message("k", "specific"),
    );
    let mut bad = MoBuilder::new()
        .message("k", "generic")
        .message("z", "zed")
        .build();
    bad.truncate(bad.len() / 2);
    let path = catalog_path(tmp.path(), "en", Category::Messages, "app");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, bad).unwrap();
    let intl = registry(tmp.path(), "app", "en_US");

    assert_eq!(intl.gettext("k"), "specific");
    assert_eq!(intl.gettext("z"), "z");

    let report = intl
        .catalog("app")
        .unwrap()
        .ensure_loaded(Category::Messages, "en_US");
    assert!(report.already_loaded);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_readers_share_one_load() {
    let tmp = TempDir::new().unwrap();
    let mut builder = MoBuilder::new().plural_forms("nplurals=2; plural=n != 1;");
    for i in 0..200 {
        builder = builder.message(&format!("key {}", i), &format!("valeur {}", i));
    }
    install(tmp.path(), "fr", Category::Messages, "app", builder);

    let intl = Arc::new(registry(tmp.path(), "app", "fr"));
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let intl = Arc::clone(&intl);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in (t..200).step_by(threads) {
                    let key = format!("key {}", i);
                    assert_eq!(intl.gettext(&key), format!("valeur {}", i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let catalog = intl.catalog("app").unwrap();
    assert_eq!(catalog.len(Category::Messages), 200);
    assert!(catalog.ensure_loaded(Category::Messages, "fr").already_loaded);
}
