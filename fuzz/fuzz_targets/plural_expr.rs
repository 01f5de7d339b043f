//! Fuzz target for plural expression compilation and evaluation.

#![no_main]

use arbitrary::Arbitrary;
use glossa_core::{EvalError, PluralExpr};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzExpr {
    source: String,
    n: u64,
    depth: u8,
}

fuzz_target!(|input: FuzzExpr| {
    let expr = PluralExpr::new(&input.source);
    let depth = u32::from(input.depth);

    match expr.eval_with_depth(input.n, depth) {
        Ok(_) => assert!(expr.is_valid()),
        Err(EvalError::Invalid) => assert!(!expr.is_valid()),
        Err(_) => {}
    }

    // Display output must compile back to an equivalent expression.
    if let Some(ast) = expr.ast() {
        let printed = ast.to_string();
        if let Ok(again) = PluralExpr::compile(&printed) {
            assert_eq!(again.eval(input.n), expr.eval(input.n));
        }
    }
});
