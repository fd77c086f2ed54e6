//! The localized category C[S⁻¹] and composition of fractions.
//!
//! Composition of `left = ln ∘ ld⁻¹ : X → Y` with `right = rn ∘ rd⁻¹ : Y → Z`
//! needs an Ore square: an arrow h from the left apex to the right apex with
//! `rd ∘ h = ln`. The composite is then `(rn ∘ h) ∘ ld⁻¹`.
//!
//! ```text
//!             W
//!       ld ↙  │h  ↘ ln
//!       X     ▼     ↘
//!             V ──rd──▶ Y
//!             │
//!             rn
//!             ▼
//!             Z
//! ```
//!
//! Squares are searched over every member of both cached classes, exact
//! matches (`ln == rd`, h the identity) first. When no square exists the
//! outcome is [`Composite::Obstructed`], which is data, not an error.

use crate::category::{Category, FiniteCategory};
use crate::error::LocalizationError;
use crate::fraction::{FractionEngine, FractionKey, RoofIndex};
use crate::index::ArrowIndex;
use crate::registry::{LocalizedMorphism, Registry};
use crate::witness;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Index, closure engine and registry for one localization, built in that order.
pub struct FractionContext<C: FiniteCategory> {
    engine: FractionEngine<C>,
    registry: Registry<C>,
}

impl<C: FiniteCategory> FractionContext<C> {
    pub fn build(base: Arc<C>, denominators: &[C::Arrow]) -> Result<Self, LocalizationError> {
        let engine = FractionEngine::new(ArrowIndex::build(base), denominators)?;
        let registry = Registry::build(&engine)?;
        Ok(Self { engine, registry })
    }

    pub fn base(&self) -> &Arc<C> {
        self.engine.index().category()
    }

    pub fn index(&self) -> &ArrowIndex<C> {
        self.engine.index()
    }

    pub fn engine(&self) -> &FractionEngine<C> {
        &self.engine
    }

    pub fn registry(&self) -> &Registry<C> {
        &self.registry
    }

    /// Canonical key of `roof`, from the registry when its class is known.
    pub fn canonical_key(&self, roof: RoofIndex) -> Result<FractionKey, LocalizationError> {
        match self.registry.key_of(roof) {
            Some(key) => Ok(key.clone()),
            None => Ok(self.engine.canonical_form(roof)?.key()),
        }
    }

    /// The localized morphism denoted by `roof`.
    pub fn fraction(&self, roof: RoofIndex) -> Result<&LocalizedMorphism<C>, LocalizationError> {
        self.registry.lookup(&self.canonical_key(roof)?)
    }

    /// The image of a base arrow `f: X → Y`: the class of `(id_X, f)`.
    pub fn embed(&self, arrow: &C::Arrow) -> Result<&LocalizedMorphism<C>, LocalizationError> {
        let index = self.index();
        let numerator = index.index_of(arrow)?;
        let identity = index.identity_of(index.source_of(numerator)?)?;
        self.fraction(RoofIndex::new(identity, numerator))
    }
}

/// Why two localized morphisms failed to compose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreObstruction {
    /// The morphism applied first.
    pub left: String,
    /// The morphism applied second.
    pub right: String,
    pub reason: String,
}

impl From<OreObstruction> for LocalizationError {
    fn from(obstruction: OreObstruction) -> Self {
        LocalizationError::OreObstruction {
            left: obstruction.left,
            right: obstruction.right,
            reason: obstruction.reason,
        }
    }
}

/// Outcome of composing two fractions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Composite<A> {
    Composed(A),
    Obstructed(OreObstruction),
}

/// A composite settled against the registry, `None` when unregistered.
type Settled<C> = Result<Option<LocalizedMorphism<C>>, LocalizationError>;

/// The localization of a finite category at a set of denominators.
pub struct LocalizedCategory<C: FiniteCategory> {
    name: String,
    objects: Vec<C::Obj>,
    context: Arc<FractionContext<C>>,
}

impl<C: FiniteCategory> LocalizedCategory<C> {
    pub fn new(context: Arc<FractionContext<C>>) -> Self {
        let base = context.base();
        Self {
            name: format!("{}[S⁻¹]", base.name()),
            objects: base.objects().to_vec(),
            context,
        }
    }

    pub fn context(&self) -> &Arc<FractionContext<C>> {
        &self.context
    }

    pub fn base(&self) -> &Arc<C> {
        self.context.base()
    }

    /// `right ∘ left`, or the obstruction that prevents it.
    pub fn compose_fractions(
        &self,
        right: &LocalizedMorphism<C>,
        left: &LocalizedMorphism<C>,
    ) -> Result<Composite<LocalizedMorphism<C>>, LocalizationError> {
        if left.target != right.source {
            return Err(LocalizationError::BoundaryMismatch {
                left: left.to_string(),
                right: right.to_string(),
                left_target: left.target.to_string(),
                right_source: right.source.to_string(),
            });
        }

        let registry = self.context.registry();
        let index = self.context.index();
        let left_class = class_of(registry, &left.key)?;
        let right_class = class_of(registry, &right.key)?;

        let mut unregistered: Option<FractionKey> = None;
        let mut settle = |roof: RoofIndex| -> Settled<C> {
            let key = self.context.canonical_key(roof)?;
            match registry.get(&key) {
                Some(arrow) => Ok(Some(arrow.clone())),
                None => {
                    unregistered.get_or_insert(key);
                    Ok(None)
                }
            }
        };

        for l in left_class {
            for r in right_class {
                if l.numerator == r.denominator
                    && let Some(arrow) = settle(RoofIndex::new(l.denominator, r.numerator))?
                {
                    return Ok(Composite::Composed(arrow));
                }
            }
        }

        for l in left_class {
            let left_apex = index.source_of(l.denominator)?;
            for r in right_class {
                let right_apex = index.source_of(r.denominator)?;
                for h in index.between(left_apex, right_apex) {
                    if index.compose(r.denominator, h)? != l.numerator {
                        continue;
                    }
                    let numerator = index.compose(r.numerator, h)?;
                    if let Some(arrow) = settle(RoofIndex::new(l.denominator, numerator))? {
                        return Ok(Composite::Composed(arrow));
                    }
                }
            }
        }

        let reason = match unregistered {
            Some(key) => format!(
                "Ore square found but its canonical fraction {key} is unregistered \
                 (denominators not closed under composition)"
            ),
            None => format!(
                "no Ore square: no arrow from apex {} to apex {} completes the square",
                left.apex, right.apex
            ),
        };
        Ok(Composite::Obstructed(OreObstruction {
            left: left.to_string(),
            right: right.to_string(),
            reason,
        }))
    }

    /// `sha256:` digest over every key and its endpoints; independent of
    /// registry order.
    pub fn fingerprint(&self) -> String {
        witness::fingerprint(self.context.registry().arrows().iter().map(|arrow| {
            format!(
                "{}|{}|{}|{}|{}|{}",
                arrow.key,
                arrow.source,
                arrow.target,
                arrow.apex,
                arrow.denominator,
                arrow.numerator
            )
        }))
    }
}

fn class_of<'r, C: FiniteCategory>(
    registry: &'r Registry<C>,
    key: &FractionKey,
) -> Result<&'r BTreeSet<RoofIndex>, LocalizationError> {
    registry
        .class(key)
        .ok_or_else(|| LocalizationError::MissingFraction {
            key: key.to_string(),
        })
}

impl<C: FiniteCategory> Category for LocalizedCategory<C> {
    type Obj = C::Obj;
    type Arrow = LocalizedMorphism<C>;

    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self, object: &C::Obj) -> Result<Self::Arrow, LocalizationError> {
        if !self.objects.contains(object) {
            return Err(LocalizationError::UnknownObject {
                category: self.name.clone(),
                object: object.to_string(),
            });
        }
        let identity = self.context.index().identity_of(object)?;
        self.context
            .fraction(RoofIndex::new(identity, identity))
            .cloned()
    }

    fn source(&self, arrow: &Self::Arrow) -> C::Obj {
        arrow.source.clone()
    }

    fn target(&self, arrow: &Self::Arrow) -> C::Obj {
        arrow.target.clone()
    }

    fn compose(
        &self,
        after: &Self::Arrow,
        before: &Self::Arrow,
    ) -> Result<Self::Arrow, LocalizationError> {
        match self.compose_fractions(after, before)? {
            Composite::Composed(arrow) => Ok(arrow),
            Composite::Obstructed(obstruction) => Err(obstruction.into()),
        }
    }

    fn arrows_equal(&self, a: &Self::Arrow, b: &Self::Arrow) -> bool {
        a.key == b.key
    }

    fn as_finite(&self) -> Option<&dyn FiniteCategory<Obj = Self::Obj, Arrow = Self::Arrow>> {
        Some(self)
    }
}

impl<C: FiniteCategory> FiniteCategory for LocalizedCategory<C> {
    fn objects(&self) -> &[C::Obj] {
        &self.objects
    }

    fn arrows(&self) -> &[Self::Arrow] {
        self.context.registry().arrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ObjectId;
    use crate::table::TableCategory;
    use crate::toy;

    fn localized(name: &str, denominators: &[&str]) -> LocalizedCategory<TableCategory> {
        let base = toy::get_category(name).unwrap();
        let arrows = base.morphisms(denominators).unwrap();
        let context = FractionContext::build(Arc::new(base), &arrows).unwrap();
        LocalizedCategory::new(Arc::new(context))
    }

    fn embed(
        cat: &LocalizedCategory<TableCategory>,
        name: &str,
    ) -> LocalizedMorphism<TableCategory> {
        let arrow = cat.base().morphism(name).unwrap().clone();
        cat.context().embed(&arrow).unwrap().clone()
    }

    fn inverse_of(
        cat: &LocalizedCategory<TableCategory>,
        name: &str,
    ) -> LocalizedMorphism<TableCategory> {
        cat.arrows()
            .iter()
            .find(|a| a.denominator.name == name && a.numerator.is_identity())
            .unwrap()
            .clone()
    }

    #[test]
    fn name_marks_the_localization() {
        let cat = localized("walking_arrow", &["id_A", "id_B", "f"]);
        assert_eq!(cat.name(), "walking_arrow[S⁻¹]");
        assert_eq!(cat.objects().len(), 2);
    }

    #[test]
    fn denominator_becomes_invertible() {
        let cat = localized("walking_arrow", &["id_A", "id_B", "f"]);
        let f = embed(&cat, "f");
        let g = inverse_of(&cat, "f");
        let (a, b) = (ObjectId::new("A"), ObjectId::new("B"));
        assert_eq!(cat.compose(&g, &f).unwrap(), cat.identity(&a).unwrap());
        assert_eq!(cat.compose(&f, &g).unwrap(), cat.identity(&b).unwrap());
    }

    #[test]
    fn boundary_mismatch_is_an_error() {
        let cat = localized("walking_arrow", &["id_A", "id_B", "f"]);
        let f = embed(&cat, "f");
        assert!(matches!(
            cat.compose_fractions(&f, &f),
            Err(LocalizationError::BoundaryMismatch { .. })
        ));
    }

    #[test]
    fn cospan_legs_obstruct() {
        let cat = localized("cospan", &["id_A", "id_B", "id_C", "s", "t"]);
        let s = embed(&cat, "s");
        let t_inverse = inverse_of(&cat, "t");
        let outcome = cat.compose_fractions(&t_inverse, &s).unwrap();
        match outcome {
            Composite::Obstructed(obstruction) => {
                assert!(obstruction.reason.contains("no Ore square"));
                assert_eq!(obstruction.left, s.to_string());
            }
            Composite::Composed(arrow) => panic!("unexpected composite {arrow}"),
        }
        assert!(matches!(
            cat.compose(&t_inverse, &s),
            Err(LocalizationError::OreObstruction { .. })
        ));
    }

    #[test]
    fn general_square_composes_when_legs_differ() {
        // path2: A -f-> B -g-> C with g inverted. loc(g) ∘ loc(f) needs the
        // square through h = f, since loc(f) = (id_A, f) and loc(g) = (id_B, g).
        let cat = localized("path2", &["id_A", "id_B", "id_C", "g"]);
        let f = embed(&cat, "f");
        let g = embed(&cat, "g");
        let composite = cat.compose(&g, &f).unwrap();
        assert_eq!(composite, embed(&cat, "h"));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        let a = localized("cospan", &["id_A", "id_B", "id_C", "s", "t"]);
        let b = localized("cospan", &["t", "s", "id_C", "id_B", "id_A"]);
        assert_eq!(a.fingerprint(), a.fingerprint());
        assert_eq!(a.arrows().len(), b.arrows().len());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
