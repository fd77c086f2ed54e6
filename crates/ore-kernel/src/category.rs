//! Categories as seen by the localization kernel.
//!
//! The kernel never looks inside a concrete category. It needs:
//! 1. **Primitives**: identities, endpoints, composition, arrow equality
//! 2. **Enumeration** (optional capability): the finite object and arrow lists
//!
//! Localization itself requires a [`FiniteCategory`]. Targets of functors
//! only need [`Category`]; whether they can be enumerated is discovered
//! through [`Category::as_finite`].

use crate::error::LocalizationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// A category with fallible composition.
///
/// `compose(after, before)` is `after ∘ before`: `before` runs first.
pub trait Category: Send + Sync {
    /// Objects of the category.
    type Obj: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Morphisms of the category.
    type Arrow: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Name of this category instance (for diagnostics and precondition checks).
    fn name(&self) -> &str;

    /// The identity morphism on `object`.
    fn identity(&self, object: &Self::Obj) -> Result<Self::Arrow, LocalizationError>;

    /// Domain of `arrow`.
    fn source(&self, arrow: &Self::Arrow) -> Self::Obj;

    /// Codomain of `arrow`.
    fn target(&self, arrow: &Self::Arrow) -> Self::Obj;

    /// `after ∘ before`. Fails when `target(before) != source(after)`.
    fn compose(
        &self,
        after: &Self::Arrow,
        before: &Self::Arrow,
    ) -> Result<Self::Arrow, LocalizationError>;

    /// The category's equality predicate on morphisms.
    ///
    /// Defaults to structural equality. Categories whose arrow values carry
    /// presentation data (paths, labels) override this.
    fn arrows_equal(&self, a: &Self::Arrow, b: &Self::Arrow) -> bool {
        a == b
    }

    /// View this category as finite, if it can enumerate itself.
    fn as_finite(&self) -> Option<&dyn FiniteCategory<Obj = Self::Obj, Arrow = Self::Arrow>> {
        None
    }

    /// An inverse the category knows about without enumeration.
    ///
    /// Used by the isomorphism oracle when [`Category::as_finite`] is `None`.
    fn declared_inverse(&self, arrow: &Self::Arrow) -> Option<Self::Arrow> {
        let _ = arrow;
        None
    }
}

/// A category with finitely many, enumerable objects and arrows.
pub trait FiniteCategory: Category {
    /// Every object, in a fixed order.
    fn objects(&self) -> &[Self::Obj];

    /// Every arrow, in a fixed order. The order determines arrow indices.
    fn arrows(&self) -> &[Self::Arrow];
}

/// Opaque identifier for an object of a table category.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub String);

impl ObjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named morphism `name: source → target` of a table category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Morphism {
    /// Name, unique within its category.
    pub name: String,

    /// Domain.
    pub source: ObjectId,

    /// Codomain.
    pub target: ObjectId,
}

impl Morphism {
    /// Create a new morphism from source to target.
    pub fn new(name: impl Into<String>, source: ObjectId, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            source,
            target,
        }
    }

    /// The identity morphism on an object, named `id_<object>`.
    pub fn identity(object: ObjectId) -> Self {
        Self {
            name: identity_name(&object),
            source: object.clone(),
            target: object,
        }
    }

    /// Whether this is the identity generated for its object.
    pub fn is_identity(&self) -> bool {
        self.source == self.target && self.name == identity_name(&self.source)
    }
}

impl fmt::Display for Morphism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.name, self.source, self.target)
    }
}

/// Name of the generated identity on `object`.
pub fn identity_name(object: &ObjectId) -> String {
    format!("id_{}", object.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_morphism() {
        let a = ObjectId::new("A");
        let id = Morphism::identity(a.clone());
        assert_eq!(id.source, id.target);
        assert_eq!(id.name, "id_A");
        assert!(id.is_identity());
    }

    #[test]
    fn endomorphism_is_not_identity() {
        let a = ObjectId::new("A");
        let e = Morphism::new("e", a.clone(), a);
        assert!(!e.is_identity());
        assert_eq!(e.to_string(), "e: A → A");
    }
}
