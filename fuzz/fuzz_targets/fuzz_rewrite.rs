#![no_main]

use libfuzzer_sys::fuzz_target;

use fibbench_core::terms::signed_fibonacci;
use fibbench_core::TermRewriter;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let target = i64::from(i8::from_le_bytes([data[0]])) % 40;
    let tail_limit = i64::from(data[1] % 8) + 1;
    let base = i64::from(i8::from_le_bytes([data[2]])) % 40;

    let Ok(rewriter) = TermRewriter::new(tail_limit) else {
        return;
    };
    // Coefficient overflow is a reported error, never a panic.
    let Ok(expansion) = rewriter.expand(target) else {
        return;
    };

    assert!(expansion.terms.is_terminal());
    assert_eq!(
        expansion.terms.evaluate_at(base),
        signed_fibonacci(base + target),
        "F(n{target:+}) at n={base}, tail limit {tail_limit}"
    );
});
