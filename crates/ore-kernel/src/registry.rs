//! The morphisms of a localized category.
//!
//! Every roof (d, n) with d a denominator is canonicalized; one localized
//! morphism is materialized per distinct canonical key, from the canonical
//! roof itself. The registry is filled in a single pass and frozen.

use crate::category::FiniteCategory;
use crate::error::LocalizationError;
use crate::fraction::{FractionEngine, FractionKey, RoofIndex};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// A morphism of a localized category: the class of a canonical roof
/// `numerator ∘ denominator⁻¹ : source → target`.
///
/// Equality and hashing go through the key only.
#[derive(Debug, Clone)]
pub struct LocalizedArrow<O, A> {
    /// Target of the denominator.
    pub source: O,
    /// Target of the numerator.
    pub target: O,
    /// Shared source of both legs.
    pub apex: O,
    pub denominator: A,
    pub numerator: A,
    pub roof: RoofIndex,
    pub key: FractionKey,
}

impl<O, A> PartialEq for LocalizedArrow<O, A> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<O, A> Eq for LocalizedArrow<O, A> {}

impl<O, A> Hash for LocalizedArrow<O, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<O: fmt::Display, A> fmt::Display for LocalizedArrow<O, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} → {}", self.key, self.source, self.target)
    }
}

/// Localized morphism over the base category `C`.
pub type LocalizedMorphism<C> =
    LocalizedArrow<<C as crate::category::Category>::Obj, <C as crate::category::Category>::Arrow>;

/// Frozen table of localized morphisms and their roof classes.
pub struct Registry<C: FiniteCategory> {
    arrows: Vec<LocalizedMorphism<C>>,
    positions: HashMap<FractionKey, usize>,
    classes: HashMap<FractionKey, BTreeSet<RoofIndex>>,
    members: HashMap<RoofIndex, FractionKey>,
}

impl<C: FiniteCategory> Registry<C> {
    /// Enumerate every roof over a denominator and keep one morphism per class.
    pub fn build(engine: &FractionEngine<C>) -> Result<Self, LocalizationError> {
        let index = engine.index();
        let mut registry = Self {
            arrows: Vec::new(),
            positions: HashMap::new(),
            classes: HashMap::new(),
            members: HashMap::new(),
        };

        let mut candidates = 0usize;
        for &d in engine.denominators() {
            let apex = index.source_of(d)?;
            for n in index.starting_at(apex) {
                candidates += 1;
                let roof = RoofIndex::new(d, n);
                if registry.members.contains_key(&roof) {
                    continue;
                }
                let class = engine.equivalence_class(roof)?;
                let canonical = class
                    .first()
                    .copied()
                    .ok_or(LocalizationError::EmptyClosure {
                        denominator: d,
                        numerator: n,
                    })?;
                let key = canonical.key();
                if registry.positions.contains_key(&key) {
                    continue;
                }
                let arrow = LocalizedArrow {
                    source: index.target_of(canonical.denominator)?.clone(),
                    target: index.target_of(canonical.numerator)?.clone(),
                    apex: index.source_of(canonical.denominator)?.clone(),
                    denominator: index
                        .arrow_at(canonical.denominator, "materializing a denominator")?
                        .clone(),
                    numerator: index
                        .arrow_at(canonical.numerator, "materializing a numerator")?
                        .clone(),
                    roof: canonical,
                    key: key.clone(),
                };
                for member in &class {
                    registry.members.insert(*member, key.clone());
                }
                registry
                    .positions
                    .insert(key.clone(), registry.arrows.len());
                registry.classes.insert(key, class);
                registry.arrows.push(arrow);
            }
        }

        debug!(
            category = index.category().name(),
            denominators = engine.denominators().len(),
            candidates,
            localized = registry.arrows.len(),
            "registry built"
        );
        Ok(registry)
    }

    /// Localized morphisms in discovery order.
    pub fn arrows(&self) -> &[LocalizedMorphism<C>] {
        &self.arrows
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    pub fn get(&self, key: &FractionKey) -> Option<&LocalizedMorphism<C>> {
        self.positions.get(key).map(|&i| &self.arrows[i])
    }

    /// Like [`Registry::get`], failing with `MissingFraction`.
    pub fn lookup(&self, key: &FractionKey) -> Result<&LocalizedMorphism<C>, LocalizationError> {
        self.get(key)
            .ok_or_else(|| LocalizationError::MissingFraction {
                key: key.to_string(),
            })
    }

    /// Every roof in the class registered under `key`.
    pub fn class(&self, key: &FractionKey) -> Option<&BTreeSet<RoofIndex>> {
        self.classes.get(key)
    }

    /// The canonical roof registered under `key`.
    pub fn canonical(&self, key: &FractionKey) -> Option<RoofIndex> {
        self.get(key).map(|arrow| arrow.roof)
    }

    /// Key of the registered class containing `roof`, if any.
    pub fn key_of(&self, roof: RoofIndex) -> Option<&FractionKey> {
        self.members.get(&roof)
    }
}
