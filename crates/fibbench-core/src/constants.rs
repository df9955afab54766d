//! Constants shared by the evaluators, the oracle, and the harness.

/// Indices admitted by the recursive evaluator are `0..RECURSIVE_DOMAIN_LIMIT`.
///
/// The call count grows like F(n), so this bounds the benchmark run time.
pub const RECURSIVE_DOMAIN_LIMIT: u64 = 30;

/// Number of lanes advanced per step by the batched evaluator.
pub const BATCH_LANES: usize = 4;

/// Tail limit used to derive the batched kernel.
pub const DEFAULT_TAIL_LIMIT: i64 = 4;

/// Default largest index benchmarked by the harness (inclusive).
pub const DEFAULT_MAX_INDEX: u64 = 93;

/// Largest index whose Fibonacci value fits in a `u32`.
/// F(47) = 2971215073
pub const MAX_FIB_U32: u64 = 47;

/// Largest index whose Fibonacci value fits in a `u64`.
/// F(93) = 12200160415121876738
pub const MAX_FIB_U64: u64 = 93;

/// Exact Fibonacci values for n = 0..=93.
///
/// F(94) = 19,740,274,219,868,223,167 overflows `u64::MAX`
/// (18,446,744,073,709,551,615).
pub const FIB_TABLE: [u64; 94] = {
    let mut table = [0u64; 94];
    table[0] = 0;
    table[1] = 1;
    let mut i = 2;
    while i < 94 {
        table[i] = table[i - 1] + table[i - 2];
        i += 1;
    }
    table
};

/// Process exit codes.
pub mod exit_codes {
    /// Every checked cell passed.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// At least one evaluator disagreed with the oracle.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fib_table_first_values() {
        assert_eq!(FIB_TABLE[0], 0);
        assert_eq!(FIB_TABLE[1], 1);
        assert_eq!(FIB_TABLE[2], 1);
        assert_eq!(FIB_TABLE[10], 55);
        assert_eq!(FIB_TABLE[50], 12_586_269_025);
    }

    #[test]
    fn fib_table_boundaries() {
        assert_eq!(FIB_TABLE[MAX_FIB_U64 as usize], 12_200_160_415_121_876_738);
        // F(92) is the last value within i64.
        assert_eq!(FIB_TABLE[92], 7_540_113_804_746_346_429);
        assert!(FIB_TABLE[92] <= i64::MAX as u64);
        assert!(FIB_TABLE[MAX_FIB_U64 as usize] > i64::MAX as u64);
        assert!(FIB_TABLE[MAX_FIB_U32 as usize] <= u64::from(u32::MAX));
        assert!(FIB_TABLE[MAX_FIB_U32 as usize + 1] > u64::from(u32::MAX));
    }

    #[test]
    fn fib_table_consistency() {
        for i in 2..94 {
            assert_eq!(FIB_TABLE[i], FIB_TABLE[i - 1] + FIB_TABLE[i - 2]);
        }
    }
}
