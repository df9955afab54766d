#![no_main]

use libfuzzer_sys::fuzz_target;

use fibbench_core::{Algorithm, Evaluator, KernelBackend, ShiftAddKernel, Word};

fn agree<W: Word>(n: u64) {
    let kernel = ShiftAddKernel::<W>::derive().unwrap();
    let expected = fibbench_core::fastdoubling::fib::<W>(n);
    for backend in [KernelBackend::Lanes, KernelBackend::Scalar] {
        let batched = Algorithm::BatchedSimd(kernel.with_backend(backend));
        assert_eq!(batched.evaluate(n), expected, "{backend:?} != FastDoubling at n={n}");
    }
    // O(n) evaluators only on a smaller range.
    if n < 20_000 {
        for algorithm in [Algorithm::LinearIterative, Algorithm::MatrixExponent] {
            assert_eq!(
                algorithm.evaluate(n),
                expected,
                "{} != FastDoubling at n={n}",
                algorithm.name()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    // First 4 bytes as n, capped for speed.
    let n = u64::from(u32::from_le_bytes([data[0], data[1], data[2], data[3]])) % 1_000_000;

    agree::<u64>(n);
    agree::<u32>(n);
});
