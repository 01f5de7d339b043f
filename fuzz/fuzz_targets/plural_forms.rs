//! Fuzz target for `Plural-Forms` metadata carried through a real catalog.

#![no_main]

use arbitrary::Arbitrary;
use glossa_core::testing::MoBuilder;
use glossa_core::MoFile;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzPluralForms {
    header: String,
    forms: Vec<String>,
    n: u64,
}

fuzz_target!(|input: FuzzPluralForms| {
    let forms: Vec<&str> = input.forms.iter().map(String::as_str).collect();
    let data = MoBuilder::new()
        .header(&input.header)
        .plural("one", "many", &forms)
        .build();

    let Ok(file) = MoFile::parse(&data) else {
        return;
    };
    if let Some(Ok(rule)) = file.plural_rule() {
        if let Ok(index) = rule.index(input.n, 64) {
            assert!(index < u64::from(rule.nplurals()));
        }
    }
});
