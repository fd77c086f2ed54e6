//! Functors between categories, with sample-based validation witnesses.
//!
//! A functor F: S → T assigns
//!   - to each object X of S an object F(X) of T,
//!   - to each arrow f: X → Y of S an arrow F(f): F(X) → F(Y) of T,
//!
//! and must respect identities and composition:
//!   F(id_X) = id_F(X),   F(g ∘ f) = F(g) ∘ F(f).
//!
//! Functors here are values built from two maps. Laws are not enforced at
//! construction; instead each functor carries a [`FunctorWitness`] recording
//! the outcome of checking the laws on a finite sample of objects and arrows.

use crate::category::{Category, FiniteCategory};
use crate::error::LocalizationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

type ObjectMap<S, T> = Arc<dyn Fn(&<S as Category>::Obj) -> <T as Category>::Obj + Send + Sync>;
type ArrowMap<S, T> = Arc<
    dyn Fn(&<S as Category>::Arrow) -> Result<<T as Category>::Arrow, LocalizationError>
        + Send
        + Sync,
>;

/// The objects and arrows a functor is checked (or compared) on.
pub struct FunctorSamples<S: Category> {
    pub objects: Vec<S::Obj>,
    pub arrows: Vec<S::Arrow>,
}

impl<S: Category> FunctorSamples<S> {
    /// Every object and every arrow of a finite category.
    pub fn exhaustive(category: &S) -> Self
    where
        S: FiniteCategory,
    {
        Self::limited(category, None)
    }

    /// Every object and at most `limit` arrows (in arrow order).
    pub fn limited(category: &S, limit: Option<usize>) -> Self
    where
        S: FiniteCategory,
    {
        let arrows = category.arrows();
        let take = limit.unwrap_or(arrows.len()).min(arrows.len());
        Self {
            objects: category.objects().to_vec(),
            arrows: arrows[..take].to_vec(),
        }
    }
}

impl<S: Category> Clone for FunctorSamples<S> {
    fn clone(&self) -> Self {
        Self {
            objects: self.objects.clone(),
            arrows: self.arrows.clone(),
        }
    }
}

impl<S: Category> fmt::Debug for FunctorSamples<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctorSamples")
            .field("objects", &self.objects)
            .field("arrows", &self.arrows)
            .finish()
    }
}

/// Outcome of checking the functor laws on a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctorWitness {
    pub label: String,
    pub source: String,
    pub target: String,

    /// Free-form documentation supplied by the caller, echoed verbatim.
    pub documentation: Vec<String>,

    pub checked_objects: usize,
    pub checked_arrows: usize,
    pub checked_composites: usize,

    /// One line per law violation found on the sample.
    pub failures: Vec<String>,

    pub holds: bool,
}

/// A functor `S → T` with its validation witness.
pub struct Functor<S: Category, T: Category> {
    label: String,
    source: Arc<S>,
    target: Arc<T>,
    on_objects: ObjectMap<S, T>,
    on_arrows: ArrowMap<S, T>,
    witness: FunctorWitness,
}

impl<S: Category, T: Category> Clone for Functor<S, T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            source: Arc::clone(&self.source),
            target: Arc::clone(&self.target),
            on_objects: Arc::clone(&self.on_objects),
            on_arrows: Arc::clone(&self.on_arrows),
            witness: self.witness.clone(),
        }
    }
}

impl<S: Category, T: Category> fmt::Debug for Functor<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Functor")
            .field("label", &self.label)
            .field("source", &self.source.name())
            .field("target", &self.target.name())
            .field("witness", &self.witness)
            .finish()
    }
}

impl<S: Category, T: Category> Functor<S, T> {
    /// Build a functor from its object and arrow maps and check it on `samples`.
    pub fn new<O, A>(
        label: impl Into<String>,
        source: Arc<S>,
        target: Arc<T>,
        on_objects: O,
        on_arrows: A,
        samples: &FunctorSamples<S>,
        documentation: Vec<String>,
    ) -> Self
    where
        O: Fn(&S::Obj) -> T::Obj + Send + Sync + 'static,
        A: Fn(&S::Arrow) -> Result<T::Arrow, LocalizationError> + Send + Sync + 'static,
    {
        Self::from_parts(
            label.into(),
            source,
            target,
            Arc::new(on_objects),
            Arc::new(on_arrows),
            samples,
            documentation,
        )
    }

    fn from_parts(
        label: String,
        source: Arc<S>,
        target: Arc<T>,
        on_objects: ObjectMap<S, T>,
        on_arrows: ArrowMap<S, T>,
        samples: &FunctorSamples<S>,
        documentation: Vec<String>,
    ) -> Self {
        let mut functor = Self {
            witness: FunctorWitness {
                label: label.clone(),
                source: source.name().to_string(),
                target: target.name().to_string(),
                documentation,
                checked_objects: 0,
                checked_arrows: 0,
                checked_composites: 0,
                failures: Vec::new(),
                holds: true,
            },
            label,
            source,
            target,
            on_objects,
            on_arrows,
        };
        functor.check_laws(samples);
        functor
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn witness(&self) -> &FunctorWitness {
        &self.witness
    }

    /// F(X).
    pub fn map_object(&self, object: &S::Obj) -> T::Obj {
        (self.on_objects)(object)
    }

    /// F(f).
    pub fn map_arrow(&self, arrow: &S::Arrow) -> Result<T::Arrow, LocalizationError> {
        (self.on_arrows)(arrow)
    }

    /// The composite `next ∘ self`, checked on `samples`.
    pub fn then<U: Category>(
        &self,
        next: &Functor<T, U>,
        samples: &FunctorSamples<S>,
    ) -> Functor<S, U> {
        let (first_objects, second_objects) =
            (Arc::clone(&self.on_objects), Arc::clone(&next.on_objects));
        let (first_arrows, second_arrows) =
            (Arc::clone(&self.on_arrows), Arc::clone(&next.on_arrows));

        let mut documentation = self.witness.documentation.clone();
        documentation.extend(next.witness.documentation.iter().cloned());

        Functor::from_parts(
            format!("{} ∘ {}", next.label, self.label),
            Arc::clone(&self.source),
            Arc::clone(&next.target),
            Arc::new(move |object: &S::Obj| second_objects(&first_objects(object))),
            Arc::new(move |arrow: &S::Arrow| second_arrows(&first_arrows(arrow)?)),
            samples,
            documentation,
        )
    }

    fn check_laws(&mut self, samples: &FunctorSamples<S>) {
        let (source, target) = (&*self.source, &*self.target);
        let mut failures = Vec::new();

        for object in &samples.objects {
            let image = self.map_object(object);
            let verdict = source
                .identity(object)
                .and_then(|id| self.map_arrow(&id))
                .and_then(|mapped| Ok((mapped, target.identity(&image)?)));
            match verdict {
                Ok((mapped, expected)) if !target.arrows_equal(&mapped, &expected) => {
                    failures.push(format!(
                        "identity of {object} maps to {mapped}, expected {expected}"
                    ));
                }
                Ok(_) => {}
                Err(e) => failures.push(format!("identity of {object}: {e}")),
            }
        }

        let mut images = Vec::with_capacity(samples.arrows.len());
        for arrow in &samples.arrows {
            match self.map_arrow(arrow) {
                Ok(image) => {
                    let from = self.map_object(&source.source(arrow));
                    let to = self.map_object(&source.target(arrow));
                    if target.source(&image) != from || target.target(&image) != to {
                        failures.push(format!("{arrow} maps to {image}, expected {from} → {to}"));
                    }
                    images.push(Some(image));
                }
                Err(e) => {
                    failures.push(format!("{arrow}: {e}"));
                    images.push(None);
                }
            }
        }

        let mut composites = 0;
        for (i, after) in samples.arrows.iter().enumerate() {
            for (j, before) in samples.arrows.iter().enumerate() {
                if source.target(before) != source.source(after) {
                    continue;
                }
                let (Some(after_image), Some(before_image)) = (&images[i], &images[j]) else {
                    continue;
                };
                composites += 1;
                let verdict = source
                    .compose(after, before)
                    .and_then(|composite| self.map_arrow(&composite))
                    .and_then(|mapped| Ok((mapped, target.compose(after_image, before_image)?)));
                match verdict {
                    Ok((mapped, expected)) if !target.arrows_equal(&mapped, &expected) => {
                        failures.push(format!(
                            "{after} ∘ {before} maps to {mapped}, expected {expected}"
                        ));
                    }
                    Ok(_) => {}
                    Err(e) => failures.push(format!("{after} ∘ {before}: {e}")),
                }
            }
        }

        self.witness.checked_objects = samples.objects.len();
        self.witness.checked_arrows = samples.arrows.len();
        self.witness.checked_composites = composites;
        self.witness.holds = failures.is_empty();
        self.witness.failures = failures;
    }
}

/// One sample on which two functors disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctorMismatch {
    pub subject: String,
    pub left: String,
    pub right: String,
}

/// Result of comparing two parallel functors on a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctorComparison {
    pub left: String,
    pub right: String,
    pub checked_objects: usize,
    pub checked_arrows: usize,
    pub mismatches: Vec<FunctorMismatch>,
    pub holds: bool,
}

/// Compare two functors `S → T` on `samples`.
///
/// Objects are compared with `==`, arrows with the target's equality
/// predicate. An arrow that either functor fails to map is a mismatch.
pub fn compare_functors<S: Category, T: Category>(
    left: &Functor<S, T>,
    right: &Functor<S, T>,
    samples: &FunctorSamples<S>,
) -> FunctorComparison {
    let target = &*left.target;
    let mut mismatches = Vec::new();

    for object in &samples.objects {
        let (l, r) = (left.map_object(object), right.map_object(object));
        if l != r {
            mismatches.push(FunctorMismatch {
                subject: object.to_string(),
                left: l.to_string(),
                right: r.to_string(),
            });
        }
    }

    for arrow in &samples.arrows {
        let outcome = |result: &Result<T::Arrow, LocalizationError>| match result {
            Ok(image) => image.to_string(),
            Err(e) => format!("error: {e}"),
        };
        let (l, r) = (left.map_arrow(arrow), right.map_arrow(arrow));
        let agree = matches!((&l, &r), (Ok(a), Ok(b)) if target.arrows_equal(a, b));
        if !agree {
            mismatches.push(FunctorMismatch {
                subject: arrow.to_string(),
                left: outcome(&l),
                right: outcome(&r),
            });
        }
    }

    FunctorComparison {
        left: left.label.clone(),
        right: right.label.clone(),
        checked_objects: samples.objects.len(),
        checked_arrows: samples.arrows.len(),
        holds: mismatches.is_empty(),
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Morphism, ObjectId};
    use crate::table::TableCategory;

    fn walking_arrow() -> Arc<TableCategory> {
        Arc::new(
            TableCategory::builder("walk")
                .object("A")
                .object("B")
                .arrow("f", "A", "B")
                .build()
                .unwrap(),
        )
    }

    fn identity_functor(cat: &Arc<TableCategory>) -> Functor<TableCategory, TableCategory> {
        Functor::new(
            "id",
            Arc::clone(cat),
            Arc::clone(cat),
            |x: &ObjectId| x.clone(),
            |f: &Morphism| Ok(f.clone()),
            &FunctorSamples::exhaustive(cat.as_ref()),
            vec!["identity functor".into()],
        )
    }

    #[test]
    fn identity_functor_witness_holds() {
        let cat = walking_arrow();
        let id = identity_functor(&cat);
        let witness = id.witness();
        assert!(witness.holds, "{:?}", witness.failures);
        assert_eq!(witness.checked_objects, 2);
        assert_eq!(witness.checked_arrows, 3);
        // id_A·id_A, f·id_A, id_B·f, id_B·id_B
        assert_eq!(witness.checked_composites, 4);
        assert_eq!(witness.documentation, ["identity functor"]);
    }

    #[test]
    fn collapsing_objects_breaks_endpoints() {
        let cat = walking_arrow();
        let a = ObjectId::new("A");
        let id_a = cat.identity(&a).unwrap();
        let collapse = Functor::new(
            "collapse",
            Arc::clone(&cat),
            Arc::clone(&cat),
            move |_: &ObjectId| a.clone(),
            move |_: &Morphism| Ok(id_a.clone()),
            &FunctorSamples::exhaustive(cat.as_ref()),
            vec![],
        );
        // Every object goes to A and every arrow to id_A: this is a functor.
        assert!(collapse.witness().holds);

        let broken = Functor::new(
            "broken",
            Arc::clone(&cat),
            Arc::clone(&cat),
            |x: &ObjectId| x.clone(),
            {
                let cat = Arc::clone(&cat);
                move |_: &Morphism| cat.identity(&ObjectId::new("A"))
            },
            &FunctorSamples::exhaustive(cat.as_ref()),
            vec![],
        );
        assert!(!broken.witness().holds);
        assert!(
            broken
                .witness()
                .failures
                .iter()
                .any(|line| line.contains("f: A → B maps to id_A"))
        );
    }

    #[test]
    fn composition_and_comparison() {
        let cat = walking_arrow();
        let id = identity_functor(&cat);
        let samples = FunctorSamples::exhaustive(cat.as_ref());
        let twice = id.then(&id, &samples);
        assert_eq!(twice.label(), "id ∘ id");
        assert!(twice.witness().holds);
        assert_eq!(twice.witness().documentation.len(), 2);

        let comparison = compare_functors(&id, &twice, &samples);
        assert!(comparison.holds);
        assert_eq!(comparison.checked_arrows, 3);
    }

    #[test]
    fn limited_samples_truncate_arrows() {
        let cat = walking_arrow();
        let samples = FunctorSamples::limited(cat.as_ref(), Some(1));
        assert_eq!(samples.objects.len(), 2);
        assert_eq!(samples.arrows.len(), 1);
    }
}
