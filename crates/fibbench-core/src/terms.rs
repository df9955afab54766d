//! Symbolic rewriting of F(n+t) into a sum of earlier terms with
//! power-of-two coefficients.
//!
//! A [`TermMap`] holds `offset -> coefficient` pairs meaning
//! `Σ coefficient·F(n + offset)`. Starting from the single term `1·F(n+t)`,
//! [`TermRewriter::expand`] applies the rule `F(k) = F(k-1) + F(k-2)` in two
//! phases:
//!
//! 1. positivity elimination: rewrite the largest non-negative offset until
//!    every offset is negative;
//! 2. power-of-two normalization: walk each non-power-of-two coefficient
//!    down, moving units into its two lower neighbours.
//!
//! The result drives the shift/add kernel of the batched evaluator, e.g.
//!
//! ```text
//! F(n+3) = 1*F(n-3) + 4*F(n-2) + 4*F(n-1)
//! ```
//!
//! Both phases select entries by offset, so the terminal map and the trace
//! of intermediate maps are reproducible.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::algorithm::FibError;
use crate::word::is_power_of_two_or_zero;

/// Offset relative to the target index.
pub type Offset = i64;

/// Number of copies of a term.
pub type Coefficient = u128;

/// Ordered `offset -> coefficient` map. Zero coefficients are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermMap {
    terms: BTreeMap<Offset, Coefficient>,
}

impl TermMap {
    /// The single term `1·F(n + target)`.
    #[must_use]
    pub fn seed(target: Offset) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(target, 1);
        Self { terms }
    }

    /// Coefficient at `offset` (zero if absent).
    #[must_use]
    pub fn get(&self, offset: Offset) -> Coefficient {
        self.terms.get(&offset).copied().unwrap_or(0)
    }

    /// Entries in ascending offset order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Offset, Coefficient)> + '_ {
        self.terms.iter().map(|(&k, &c)| (k, c))
    }

    /// Number of stored terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// `true` if no term is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Smallest stored offset.
    #[must_use]
    pub fn min_offset(&self) -> Option<Offset> {
        self.terms.keys().next().copied()
    }

    /// Largest stored offset.
    #[must_use]
    pub fn max_offset(&self) -> Option<Offset> {
        self.terms.keys().next_back().copied()
    }

    /// Every offset is negative and every coefficient a power of two.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terms
            .iter()
            .all(|(&k, &c)| k < 0 && is_power_of_two_or_zero(c))
    }

    /// Weighted sum `Σ c·F(base + offset)` over the negafibonacci extension.
    ///
    /// Returns `None` if an intermediate value leaves `i128`.
    #[must_use]
    pub fn evaluate_at(&self, base: i64) -> Option<i128> {
        self.terms.iter().try_fold(0i128, |acc, (&k, &c)| {
            let index = base.checked_add(k)?;
            let term = i128::try_from(c).ok()?.checked_mul(signed_fibonacci(index)?)?;
            acc.checked_add(term)
        })
    }

    /// Apply `F(k) = F(k-1) + F(k-2)` to `units` copies of the term at `offset`.
    fn rewrite(&mut self, offset: Offset, units: Coefficient) -> Result<(), FibError> {
        let current = self.get(offset);
        debug_assert!(units <= current, "cannot move more units than present");
        if units == current {
            self.terms.remove(&offset);
        } else {
            self.terms.insert(offset, current - units);
        }
        for lower in [offset - 1, offset - 2] {
            let slot = self.terms.entry(lower).or_insert(0);
            *slot = slot
                .checked_add(units)
                .ok_or(FibError::CoefficientOverflow { offset: lower })?;
        }
        Ok(())
    }
}

impl fmt::Display for TermMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (k, c)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match k {
                0 => write!(f, "{c}*F(n)")?,
                _ => write!(f, "{c}*F(n{k:+})")?,
            }
        }
        Ok(())
    }
}

/// F(index) for any signed index, with `F(-k) = (-1)^(k+1)·F(k)`.
///
/// Returns `None` when the value does not fit in `i128` (|index| > 184).
#[must_use]
pub fn signed_fibonacci(index: i64) -> Option<i128> {
    let magnitude = index.unsigned_abs();
    if magnitude > 184 {
        return None;
    }
    // (F(-1), F(0)); stepping never computes past F(magnitude).
    let (mut previous, mut current) = (1i128, 0i128);
    for _ in 0..magnitude {
        let next = previous.checked_add(current)?;
        previous = std::mem::replace(&mut current, next);
    }
    if index < 0 && magnitude % 2 == 0 {
        Some(-current)
    } else {
        Some(current)
    }
}

/// Which rewrite phase produced a trace step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Removing non-negative offsets.
    PositivityElimination,
    /// Walking coefficients to powers of two.
    PowerOfTwoNormalization,
}

/// Stopping rule of a phase-2 walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Walk {
    /// Inside the tail: keep walking toward zero until the `k-1` neighbour is
    /// also a power of two, falling back to the nearest power of two.
    Settling,
    /// At or past the tail limit: stop at the nearest power of two below.
    Nearest,
}

/// One rule application and the map it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteStep {
    pub phase: Phase,
    /// Offset whose units were moved down.
    pub offset: Offset,
    /// Number of units moved.
    pub units: Coefficient,
    /// Stopping rule, for phase-2 steps.
    pub walk: Option<Walk>,
    /// Map after the step.
    pub terms: TermMap,
}

/// A terminal map with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expansion {
    pub target: Offset,
    pub tail_limit: i64,
    pub terms: TermMap,
    pub trace: Vec<RewriteStep>,
}

/// Rewriter configured with a tail limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermRewriter {
    tail_limit: i64,
}

impl TermRewriter {
    /// Create a rewriter. A tail limit of zero or less is rejected.
    pub fn new(tail_limit: i64) -> Result<Self, FibError> {
        if tail_limit <= 0 {
            return Err(FibError::InvalidConfiguration(format!(
                "tail limit must be positive, got {tail_limit}"
            )));
        }
        Ok(Self { tail_limit })
    }

    #[must_use]
    pub fn tail_limit(&self) -> i64 {
        self.tail_limit
    }

    /// Expand `1·F(n + target)` into terminal form.
    pub fn expand(&self, target: Offset) -> Result<Expansion, FibError> {
        let mut terms = TermMap::seed(target);
        let mut trace = Vec::new();

        // Phase 1: the largest non-negative offset strictly decreases.
        while let Some(offset) = terms.max_offset().filter(|&k| k >= 0) {
            let units = terms.get(offset);
            terms.rewrite(offset, units)?;
            tracing::trace!(offset, units, "positivity rewrite");
            trace.push(RewriteStep {
                phase: Phase::PositivityElimination,
                offset,
                units,
                walk: None,
                terms: terms.clone(),
            });
        }

        // Phase 2: rewrites only feed lower offsets, so each offset settles once.
        while let Some(offset) = Self::next_unnormalized(&terms) {
            let coefficient = terms.get(offset);
            let walk = self.walk_for(offset);
            let remaining = Self::walk_target(coefficient, terms.get(offset - 1), walk);
            let units = coefficient - remaining;
            terms.rewrite(offset, units)?;
            tracing::trace!(offset, units, ?walk, "normalization walk");
            trace.push(RewriteStep {
                phase: Phase::PowerOfTwoNormalization,
                offset,
                units,
                walk: Some(walk),
                terms: terms.clone(),
            });
        }

        tracing::debug!(
            target_offset = target,
            tail_limit = self.tail_limit,
            steps = trace.len(),
            %terms,
            "expanded term"
        );
        Ok(Expansion {
            target,
            tail_limit: self.tail_limit,
            terms,
            trace,
        })
    }

    fn next_unnormalized(terms: &TermMap) -> Option<Offset> {
        terms
            .iter()
            .rev()
            .find(|&(_, c)| !is_power_of_two_or_zero(c))
            .map(|(k, _)| k)
    }

    /// Offsets strictly closer to zero than the tail limit settle; the
    /// boundary itself uses the nearest walk.
    fn walk_for(&self, offset: Offset) -> Walk {
        if offset.unsigned_abs() < self.tail_limit.unsigned_abs() {
            Walk::Settling
        } else {
            Walk::Nearest
        }
    }

    /// Coefficient left at the walked offset.
    fn walk_target(coefficient: Coefficient, neighbour: Coefficient, walk: Walk) -> Coefficient {
        let nearest = floor_power_of_two(coefficient);
        if walk == Walk::Nearest {
            return nearest;
        }
        let mut candidate = nearest;
        loop {
            let settles = neighbour
                .checked_add(coefficient - candidate)
                .is_some_and(is_power_of_two_or_zero);
            if settles {
                return candidate;
            }
            if candidate == 0 {
                return nearest;
            }
            candidate >>= 1;
        }
    }
}

fn floor_power_of_two(value: Coefficient) -> Coefficient {
    if value == 0 {
        0
    } else {
        1 << (Coefficient::BITS - 1 - value.leading_zeros())
    }
}

/// Expand `1·F(n + target)` and return only the terminal map.
pub fn expand(target: Offset, tail_limit: i64) -> Result<TermMap, FibError> {
    Ok(TermRewriter::new(tail_limit)?.expand(target)?.terms)
}
