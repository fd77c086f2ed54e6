//! Roofs, refinement closure, and canonical fractions.
//!
//! A roof (d, n) with common apex A
//!
//! ```text
//!          A
//!      d ↙   ↘ n
//!     X         Y
//! ```
//!
//! denotes the formal arrow n ∘ d⁻¹ : X → Y. Precomposing both legs with a
//! denominator c: A' → A gives the refinement (d ∘ c, n ∘ c), which denotes the
//! same formal arrow. Two roofs are equivalent when they are connected by a
//! chain of refinements.
//!
//! - [`FractionEngine::closure`]: every refinement reachable from a roof.
//! - [`FractionEngine::equivalence_class`]: the closure saturated with the
//!   inverse step, i.e. the connected component of the roof.
//! - [`FractionEngine::canonical_form`]: the smallest member of the class
//!   under (denominator index, numerator index) order.

use crate::category::FiniteCategory;
use crate::error::LocalizationError;
use crate::index::ArrowIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// A roof in index form. Ordering is (denominator, numerator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoofIndex {
    pub denominator: usize,
    pub numerator: usize,
}

impl RoofIndex {
    pub fn new(denominator: usize, numerator: usize) -> Self {
        Self {
            denominator,
            numerator,
        }
    }

    /// Registry key of this roof.
    pub fn key(self) -> FractionKey {
        FractionKey(format!("{}:{}", self.denominator, self.numerator))
    }
}

impl fmt::Display for RoofIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.denominator, self.numerator)
    }
}

/// Stable key of a canonical roof: `"<denominator>:<numerator>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FractionKey(pub String);

impl fmt::Display for FractionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closure and canonicalization over a fixed denominator set.
pub struct FractionEngine<C: FiniteCategory> {
    index: ArrowIndex<C>,
    denominators: Vec<usize>,
    saturation: BTreeSet<usize>,
}

impl<C: FiniteCategory> FractionEngine<C> {
    /// Index the denominators (duplicates collapse) and compute their
    /// multiplicative saturation.
    pub fn new(index: ArrowIndex<C>, denominators: &[C::Arrow]) -> Result<Self, LocalizationError> {
        let mut indices: Vec<usize> = Vec::with_capacity(denominators.len());
        for arrow in denominators {
            let i = index.index_of(arrow)?;
            if !indices.contains(&i) {
                indices.push(i);
            }
        }
        let saturation = saturate(&index, &indices)?;
        Ok(Self {
            index,
            denominators: indices,
            saturation,
        })
    }

    pub fn index(&self) -> &ArrowIndex<C> {
        &self.index
    }

    /// Denominator indices, deduplicated, in first-appearance order.
    pub fn denominators(&self) -> &[usize] {
        &self.denominators
    }

    pub fn is_denominator(&self, index: usize) -> bool {
        self.denominators.contains(&index)
    }

    /// Every composite of denominators (the denominators included).
    pub fn saturation(&self) -> &BTreeSet<usize> {
        &self.saturation
    }

    /// The shared source of both legs.
    pub fn apex(&self, roof: RoofIndex) -> Result<&C::Obj, LocalizationError> {
        self.index.source_of(roof.denominator)
    }

    /// All roofs reachable from `roof` by refinement along denominators.
    pub fn closure(&self, roof: RoofIndex) -> Result<BTreeSet<RoofIndex>, LocalizationError> {
        self.explore(roof, |current, next| self.refinements(current, next))
    }

    /// The connected component of `roof` under refinement.
    pub fn equivalence_class(
        &self,
        roof: RoofIndex,
    ) -> Result<BTreeSet<RoofIndex>, LocalizationError> {
        self.explore(roof, |current, next| {
            self.refinements(current, next)?;
            self.coarsenings(current, next)
        })
    }

    /// Smallest member of the class of `roof`.
    pub fn canonical_form(&self, roof: RoofIndex) -> Result<RoofIndex, LocalizationError> {
        self.equivalence_class(roof)?
            .first()
            .copied()
            .ok_or(LocalizationError::EmptyClosure {
                denominator: roof.denominator,
                numerator: roof.numerator,
            })
    }

    fn explore(
        &self,
        seed: RoofIndex,
        step: impl Fn(RoofIndex, &mut Vec<RoofIndex>) -> Result<(), LocalizationError>,
    ) -> Result<BTreeSet<RoofIndex>, LocalizationError> {
        let mut seen: HashSet<RoofIndex> = HashSet::new();
        let mut result = BTreeSet::new();
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            result.insert(current);
            step(current, &mut stack)?;
        }
        Ok(result)
    }

    /// (d ∘ c, n ∘ c) for every denominator c landing on the apex.
    fn refinements(
        &self,
        roof: RoofIndex,
        next: &mut Vec<RoofIndex>,
    ) -> Result<(), LocalizationError> {
        let apex = self.apex(roof)?;
        for &c in &self.denominators {
            if self.index.target_of(c)? != apex {
                continue;
            }
            next.push(RoofIndex::new(
                self.index.compose(roof.denominator, c)?,
                self.index.compose(roof.numerator, c)?,
            ));
        }
        Ok(())
    }

    /// Every (d', n') with d' in the saturation that refines to `roof` along
    /// a single denominator.
    fn coarsenings(
        &self,
        roof: RoofIndex,
        next: &mut Vec<RoofIndex>,
    ) -> Result<(), LocalizationError> {
        let apex = self.apex(roof)?;
        let denominator_target = self.index.target_of(roof.denominator)?;
        let numerator_target = self.index.target_of(roof.numerator)?;
        for &c in &self.denominators {
            if self.index.source_of(c)? != apex {
                continue;
            }
            let upper = self.index.target_of(c)?;
            for d in self.index.between(upper, denominator_target) {
                if !self.saturation.contains(&d) || self.index.compose(d, c)? != roof.denominator {
                    continue;
                }
                for n in self.index.between(upper, numerator_target) {
                    if self.index.compose(n, c)? == roof.numerator {
                        next.push(RoofIndex::new(d, n));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Multiplicative closure of `denominators` inside the indexed category.
fn saturate<C: FiniteCategory>(
    index: &ArrowIndex<C>,
    denominators: &[usize],
) -> Result<BTreeSet<usize>, LocalizationError> {
    let mut saturation: BTreeSet<usize> = denominators.iter().copied().collect();
    loop {
        let mut fresh = BTreeSet::new();
        for &after in &saturation {
            for &before in &saturation {
                if index.target_of(before)? != index.source_of(after)? {
                    continue;
                }
                let composite = index.compose(after, before)?;
                if !saturation.contains(&composite) {
                    fresh.insert(composite);
                }
            }
        }
        if fresh.is_empty() {
            return Ok(saturation);
        }
        saturation.extend(fresh);
    }
}
