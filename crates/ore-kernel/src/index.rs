//! Dense integer indices for the arrows of a finite category.
//!
//! Everything downstream of indexing (closures, registry keys, composition
//! search) works with `usize` indices, never with arrow values. Arrow values
//! may only be comparable through the category's own equality predicate, so
//! positions are resolved through that predicate and lookup falls back to a
//! predicate scan when the hash table misses.

use crate::category::FiniteCategory;
use crate::error::LocalizationError;
use std::collections::HashMap;
use std::sync::Arc;

/// Frozen index over the arrows of `C`.
pub struct ArrowIndex<C: FiniteCategory> {
    category: Arc<C>,
    positions: HashMap<C::Arrow, usize>,
    sources: Vec<C::Obj>,
    targets: Vec<C::Obj>,
}

impl<C: FiniteCategory> ArrowIndex<C> {
    /// Index every arrow of `category`.
    ///
    /// Arrows equal under [`crate::category::Category::arrows_equal`] all
    /// resolve to the first of them, whether looked up by hash or by
    /// predicate.
    pub fn build(category: Arc<C>) -> Self {
        let arrows = category.arrows();
        let mut positions = HashMap::with_capacity(arrows.len());
        for (index, arrow) in arrows.iter().enumerate() {
            let first = arrows[..index]
                .iter()
                .position(|earlier| category.arrows_equal(earlier, arrow))
                .unwrap_or(index);
            positions.entry(arrow.clone()).or_insert(first);
        }
        let sources = arrows.iter().map(|a| category.source(a)).collect();
        let targets = arrows.iter().map(|a| category.target(a)).collect();
        Self {
            positions,
            sources,
            targets,
            category,
        }
    }

    pub fn category(&self) -> &Arc<C> {
        &self.category
    }

    /// Number of indexed arrows.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Index of `arrow`: exact hash hit first, then the category's predicate.
    pub fn index_of(&self, arrow: &C::Arrow) -> Result<usize, LocalizationError> {
        if let Some(&index) = self.positions.get(arrow) {
            return Ok(index);
        }
        self.category
            .arrows()
            .iter()
            .position(|candidate| self.category.arrows_equal(candidate, arrow))
            .ok_or_else(|| LocalizationError::ArrowNotFound {
                category: self.category.name().to_string(),
                arrow: arrow.to_string(),
            })
    }

    /// The arrow at `index`; `context` names the caller in the error.
    pub fn arrow_at(&self, index: usize, context: &str) -> Result<&C::Arrow, LocalizationError> {
        self.category
            .arrows()
            .get(index)
            .ok_or_else(|| LocalizationError::IndexOutOfRange {
                index,
                len: self.len(),
                context: context.to_string(),
            })
    }

    /// Source object of the arrow at `index`.
    pub fn source_of(&self, index: usize) -> Result<&C::Obj, LocalizationError> {
        self.sources
            .get(index)
            .ok_or_else(|| self.out_of_range(index, "reading a source"))
    }

    /// Target object of the arrow at `index`.
    pub fn target_of(&self, index: usize) -> Result<&C::Obj, LocalizationError> {
        self.targets
            .get(index)
            .ok_or_else(|| self.out_of_range(index, "reading a target"))
    }

    /// Index of `after ∘ before`.
    pub fn compose(&self, after: usize, before: usize) -> Result<usize, LocalizationError> {
        let composite = self.category.compose(
            self.arrow_at(after, "composing (after)")?,
            self.arrow_at(before, "composing (before)")?,
        )?;
        self.index_of(&composite)
    }

    /// Index of the identity on `object`.
    pub fn identity_of(&self, object: &C::Obj) -> Result<usize, LocalizationError> {
        self.index_of(&self.category.identity(object)?)
    }

    /// Indices of arrows `from → to`, in index order.
    pub fn between<'a>(
        &'a self,
        from: &'a C::Obj,
        to: &'a C::Obj,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.len()).filter(move |&i| self.sources[i] == *from && self.targets[i] == *to)
    }

    /// Indices of arrows with source `from`, in index order.
    pub fn starting_at<'a>(&'a self, from: &'a C::Obj) -> impl Iterator<Item = usize> + 'a {
        (0..self.len()).filter(move |&i| self.sources[i] == *from)
    }

    fn out_of_range(&self, index: usize, context: &str) -> LocalizationError {
        LocalizationError::IndexOutOfRange {
            index,
            len: self.len(),
            context: context.to_string(),
        }
    }
}
