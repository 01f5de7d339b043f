//! Fuzz target for compiled catalog decoding.
//!
//! Arbitrary bytes must either decode or be rejected, never panic. A file
//! that decodes must have every entry inside its buffer.

#![no_main]

use glossa_core::MoFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(file) = MoFile::parse(data) else {
        return;
    };

    let buffer = file.buffer();
    let lo = buffer.as_ptr() as usize;
    let hi = lo + buffer.len();
    for entry in file.entries() {
        assert!(!entry.source().is_empty());
        assert!(!entry.translated().is_empty());
        for view in [entry.source(), entry.translated()] {
            let start = view.as_ptr() as usize;
            assert!(start >= lo && start + view.len() <= hi);
        }
        for nth in 0..=u64::from(entry.extra_plurals()) + 1 {
            let _ = entry.plural(nth);
        }
    }

    let _ = file.charset();
    if let Some(Ok(rule)) = file.plural_rule() {
        for n in [0, 1, 2, 5, 11, 100, u64::MAX] {
            if let Ok(index) = rule.index(n, 64) {
                assert!(index < u64::from(rule.nplurals()));
            }
        }
    }
});
