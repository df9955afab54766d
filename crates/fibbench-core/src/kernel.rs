//! Shift/add kernel derived from terminal term maps.
//!
//! The state vector holds `[F(n-1), F(n-2), F(n-3), F(n-4)]`. Output lane `i`
//! is `F(n + 3 - i)`, expanded by the rewriter into power-of-two multiples of
//! the state lanes. One step therefore maps the state at base `n` straight to
//! the state at base `n + 4`, using only broadcast, shift, mask and add:
//!
//! ```text
//! F(n+3) = 4*F(n-1) + 4*F(n-2) + 1*F(n-3)
//! F(n+2) = 1*F(n-1) + 4*F(n-2) + 2*F(n-3)
//! F(n+1) = 2*F(n-1) + 1*F(n-2)
//! F(n)   = 1*F(n-1) + 1*F(n-2)
//! ```

use crate::algorithm::FibError;
use crate::constants::{BATCH_LANES, DEFAULT_TAIL_LIMIT};
use crate::lanes::Lanes;
use crate::terms::{TermMap, TermRewriter};
use crate::word::Word;

/// Kernel state: lane `j` holds `F(n - 1 - j)`.
pub type State<W> = [W; BATCH_LANES];

/// How a kernel step is executed. Both backends give identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelBackend {
    /// One broadcast-shift-mask-add per state lane over all output lanes.
    Lanes,
    /// One shift-add per non-zero coefficient.
    Scalar,
}

impl KernelBackend {
    /// `Lanes` when this build targets a vector unit with per-lane variable
    /// shifts (AVX2 on x86_64, NEON on aarch64), `Scalar` otherwise.
    ///
    /// The choice is made at build time: the lanes step is only vectorized
    /// when the compiler is allowed to emit those instructions, e.g. with
    /// `RUSTFLAGS="-C target-cpu=native"` on an AVX2 host.
    #[must_use]
    pub fn detect() -> Self {
        if VECTOR_UNIT_ENABLED {
            return Self::Lanes;
        }
        if runtime_vector_unit() {
            tracing::debug!(
                "CPU has a vector unit this build does not target; rebuild with -C target-cpu=native"
            );
        }
        Self::Scalar
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Lanes => "lanes",
            Self::Scalar => "scalar",
        }
    }
}

/// The build enables a vector unit the lanes step can be lowered to.
pub const VECTOR_UNIT_ENABLED: bool = cfg!(any(
    all(target_arch = "x86_64", target_feature = "avx2"),
    all(target_arch = "aarch64", target_feature = "neon"),
));

#[cfg(target_arch = "x86_64")]
fn runtime_vector_unit() -> bool {
    std::arch::is_x86_feature_detected!("avx2")
}

#[cfg(target_arch = "aarch64")]
fn runtime_vector_unit() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn runtime_vector_unit() -> bool {
    false
}

/// Per-lane shift amounts and masks for one 4-term step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftAddKernel<W: Word> {
    /// `shifts[j][i]`: shift applied to state lane `j` for output lane `i`.
    shifts: [[u32; BATCH_LANES]; BATCH_LANES],
    /// `masks[j][i]`: all ones when the coefficient is non-zero.
    masks: [Lanes<W, BATCH_LANES>; BATCH_LANES],
    backend: KernelBackend,
}

impl<W: Word> ShiftAddKernel<W> {
    /// Derive the kernel with the default tail limit and detected backend.
    pub fn derive() -> Result<Self, FibError> {
        let rewriter = TermRewriter::new(DEFAULT_TAIL_LIMIT)?;
        Self::derive_with(&rewriter, KernelBackend::detect())
    }

    /// Derive the kernel from `rewriter`'s expansions of F(n+3) .. F(n).
    pub fn derive_with(rewriter: &TermRewriter, backend: KernelBackend) -> Result<Self, FibError> {
        let mut formulas = Vec::with_capacity(BATCH_LANES);
        for lane in 0..BATCH_LANES {
            let target = i64::try_from(BATCH_LANES - 1 - lane)
                .map_err(|_| FibError::Kernel("lane count exceeds offset range".into()))?;
            formulas.push(rewriter.expand(target)?.terms);
        }
        Self::from_formulas(&formulas, backend)
    }

    /// Build from one terminal map per output lane (lane `i` = F(n + 3 - i)).
    pub fn from_formulas(formulas: &[TermMap], backend: KernelBackend) -> Result<Self, FibError> {
        if formulas.len() != BATCH_LANES {
            return Err(FibError::Kernel(format!(
                "expected {BATCH_LANES} formulas, got {}",
                formulas.len()
            )));
        }

        let mut shifts = [[0u32; BATCH_LANES]; BATCH_LANES];
        let mut masks = [[W::zero(); BATCH_LANES]; BATCH_LANES];

        for (out_lane, formula) in formulas.iter().enumerate() {
            if !formula.is_terminal() {
                return Err(FibError::Kernel(format!(
                    "formula for lane {out_lane} is not terminal: {formula}"
                )));
            }
            for (offset, coefficient) in formula.iter() {
                let state_lane = usize::try_from(-1 - offset)
                    .ok()
                    .filter(|&j| j < BATCH_LANES)
                    .ok_or_else(|| {
                        FibError::Kernel(format!(
                            "offset {offset} of lane {out_lane} is outside the {BATCH_LANES}-term window"
                        ))
                    })?;
                let shift = coefficient.trailing_zeros();
                if shift >= W::BITS {
                    return Err(FibError::Kernel(format!(
                        "coefficient {coefficient} does not fit a {}-bit shift",
                        W::BITS
                    )));
                }
                shifts[state_lane][out_lane] = shift;
                masks[state_lane][out_lane] = W::max_value();
            }
        }

        tracing::debug!(?shifts, backend = backend.name(), "derived shift/add kernel");
        Ok(Self {
            shifts,
            masks: masks.map(Lanes::from_array),
            backend,
        })
    }

    #[must_use]
    pub fn backend(&self) -> KernelBackend {
        self.backend
    }

    /// Same kernel, different execution backend.
    #[must_use]
    pub fn with_backend(mut self, backend: KernelBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Advance the state by four terms.
    #[inline]
    #[must_use]
    pub fn step(&self, state: State<W>) -> State<W> {
        match self.backend {
            KernelBackend::Lanes => self.step_lanes(state),
            KernelBackend::Scalar => self.step_scalar(state),
        }
    }

    #[inline]
    fn step_lanes(&self, state: State<W>) -> State<W> {
        let mut acc = Lanes::<W, BATCH_LANES>::zero();
        for (j, &value) in state.iter().enumerate() {
            acc = acc + (Lanes::splat(value).shl_lanes(self.shifts[j]) & self.masks[j]);
        }
        acc.to_array()
    }

    #[inline]
    fn step_scalar(&self, state: State<W>) -> State<W> {
        let mut next = [W::zero(); BATCH_LANES];
        for (j, &value) in state.iter().enumerate() {
            let mask = self.masks[j].to_array();
            for (i, out) in next.iter_mut().enumerate() {
                if mask[i] != W::zero() {
                    *out = out.wrapping_add(&value.wrapping_shl(self.shifts[j][i]));
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIB_TABLE;

    fn state_at(n: usize) -> State<u64> {
        [FIB_TABLE[n - 1], FIB_TABLE[n - 2], FIB_TABLE[n - 3], FIB_TABLE[n - 4]]
    }

    #[test]
    fn derived_shifts_match_formulas() {
        let kernel = ShiftAddKernel::<u64>::derive().unwrap();
        // State lane 0 (F(n-1)) feeds lanes F(n+3), F(n+2), F(n+1), F(n) with 4, 1, 2, 1.
        assert_eq!(kernel.shifts[0], [2, 0, 1, 0]);
        assert_eq!(kernel.shifts[1], [2, 2, 0, 0]);
        assert_eq!(kernel.shifts[2], [0, 1, 0, 0]);
        assert_eq!(kernel.masks[2].to_array(), [u64::MAX, u64::MAX, 0, 0]);
        assert_eq!(kernel.masks[3].to_array(), [0; 4]);
    }

    #[test]
    fn step_advances_four_terms() {
        for backend in [KernelBackend::Lanes, KernelBackend::Scalar] {
            let rewriter = TermRewriter::new(DEFAULT_TAIL_LIMIT).unwrap();
            let kernel = ShiftAddKernel::<u64>::derive_with(&rewriter, backend).unwrap();
            for n in (4..=84).step_by(4) {
                assert_eq!(kernel.step(state_at(n)), state_at(n + 4), "n={n} {backend:?}");
            }
        }
    }

    #[test]
    fn backends_agree_under_wraparound() {
        let lanes = ShiftAddKernel::<u32>::derive().unwrap().with_backend(KernelBackend::Lanes);
        let scalar = lanes.with_backend(KernelBackend::Scalar);
        let mut a = [u32::MAX, u32::MAX - 7, 12345, 1 << 31];
        let mut b = a;
        for _ in 0..50 {
            a = lanes.step(a);
            b = scalar.step(b);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn rejects_wrong_formula_count() {
        let formulas = vec![TermMap::seed(-1)];
        let err = ShiftAddKernel::<u64>::from_formulas(&formulas, KernelBackend::Scalar);
        assert!(matches!(err, Err(FibError::Kernel(_))));
    }

    #[test]
    fn rejects_offsets_outside_window() {
        let formulas = vec![TermMap::seed(-5), TermMap::seed(-1), TermMap::seed(-1), TermMap::seed(-1)];
        let err = ShiftAddKernel::<u64>::from_formulas(&formulas, KernelBackend::Scalar);
        assert!(matches!(err, Err(FibError::Kernel(_))));
    }

    #[test]
    fn rejects_non_terminal_formula() {
        let formulas = vec![TermMap::seed(2), TermMap::seed(-1), TermMap::seed(-1), TermMap::seed(-1)];
        let err = ShiftAddKernel::<u64>::from_formulas(&formulas, KernelBackend::Lanes);
        assert!(matches!(err, Err(FibError::Kernel(_))));
    }

    #[test]
    fn narrow_tail_still_fits_window() {
        // With a tail limit of 1, F(n+2) reaches F(n-4): the last state lane.
        let rewriter = TermRewriter::new(1).unwrap();
        let kernel = ShiftAddKernel::<u64>::derive_with(&rewriter, KernelBackend::Scalar).unwrap();
        assert_ne!(kernel.masks[3].to_array(), [0; 4]);
        assert_eq!(kernel.step(state_at(8)), state_at(12));
    }

    #[test]
    fn detect_follows_build_target() {
        let expected = if cfg!(any(
            all(target_arch = "x86_64", target_feature = "avx2"),
            all(target_arch = "aarch64", target_feature = "neon"),
        )) {
            KernelBackend::Lanes
        } else {
            KernelBackend::Scalar
        };
        assert_eq!(KernelBackend::detect(), expected);
        assert_eq!(VECTOR_UNIT_ENABLED, expected == KernelBackend::Lanes);
    }

    #[test]
    fn scalar_build_never_picks_lanes() {
        if !VECTOR_UNIT_ENABLED {
            assert_eq!(KernelBackend::detect(), KernelBackend::Scalar);
            assert_eq!(KernelBackend::detect().name(), "scalar");
        }
    }
}
