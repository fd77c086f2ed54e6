//! The universal property of a localization.
//!
//! Given F: C → D inverting every denominator and a candidate lift
//! G: C[S⁻¹] → D, the lift is the factorization of F exactly when
//!
//!   1. F(s) is an isomorphism for every denominator s,
//!   2. G ∘ loc = F,
//!   3. G(n ∘ d⁻¹) = F(n) ∘ F(d)⁻¹ for every localized morphism.
//!
//! (2) alone does not pin G down on formal inverses; (3) does. Step 3 needs
//! to enumerate D's arrows to find inverses, so it is skipped when D is not
//! finite.

use crate::category::{Category, FiniteCategory};
use crate::error::{Law, LocalizationError};
use crate::functor::{Functor, FunctorComparison, FunctorSamples, compare_functors};
use crate::iso::{IsoVerdict, find_inverse};
use crate::localization::Localization;
use crate::localized::LocalizedCategory;
use crate::registry::LocalizedMorphism;
use crate::witness::compute_witness_id;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// A denominator whose image under F has no inverse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InversionFailure {
    pub denominator: String,
    pub image: String,
    pub reason: String,
    pub witness_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenominatorInversion {
    pub checked: usize,
    pub failures: Vec<InversionFailure>,
}

/// A localized morphism on which G disagrees with F(n) ∘ F(d)⁻¹.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FractionMismatch {
    pub morphism: String,
    pub expected: String,
    pub actual: String,
    pub witness_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FractionCheck {
    Checked {
        checked: usize,
        mismatches: Vec<FractionMismatch>,
    },
    Skipped {
        reason: String,
    },
}

impl FractionCheck {
    /// A skipped check passes.
    pub fn holds(&self) -> bool {
        match self {
            Self::Checked { mismatches, .. } => mismatches.is_empty(),
            Self::Skipped { .. } => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalPropertyReport {
    pub denominators_inverted: bool,
    pub inversion: DenominatorInversion,
    pub factorization: FunctorComparison,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factorization_witness: Option<String>,
    pub lift_respects_fractions: bool,
    pub fractions: FractionCheck,
    pub holds: bool,
}

/// Check that `lifted` is the factorization of `base_functor` through
/// `localization`.
///
/// Only mismatched inputs (functors over the wrong categories) are errors.
pub fn check_universal_property<C, T>(
    localization: &Localization<C>,
    base_functor: &Functor<C, T>,
    lifted: &Functor<LocalizedCategory<C>, T>,
) -> Result<UniversalPropertyReport, LocalizationError>
where
    C: FiniteCategory + 'static,
    T: Category + 'static,
{
    expect_name(
        "base functor source",
        localization.base.name(),
        base_functor.source().name(),
    )?;
    expect_name(
        "lifted functor source",
        localization.category.name(),
        lifted.source().name(),
    )?;
    expect_name(
        "lifted functor target",
        base_functor.target().name(),
        lifted.target().name(),
    )?;

    let target = &**base_functor.target();
    let context = localization.category.context();
    let index = context.index();

    let mut inverses: HashMap<usize, T::Arrow> = HashMap::new();
    let mut failures = Vec::new();
    let denominators = context.engine().denominators();
    for &d in denominators {
        let denominator = index.arrow_at(d, "checking denominator inversion")?;
        let verdict = base_functor
            .map_arrow(denominator)
            .map(|image| (find_inverse(target, &image), image));
        let (image, reason) = match verdict {
            Ok((IsoVerdict::Invertible { inverse }, _)) => {
                inverses.insert(d, inverse);
                continue;
            }
            Ok((IsoVerdict::NotInvertible { reason }, image)) => (image.to_string(), reason),
            Err(e) => ("<unmapped>".to_string(), e.to_string()),
        };
        let denominator = denominator.to_string();
        failures.push(InversionFailure {
            witness_id: compute_witness_id(
                Law::DenominatorInversion,
                &denominator,
                &json!({ "image": image }),
            ),
            denominator,
            image,
            reason,
        });
    }
    let inversion = DenominatorInversion {
        checked: denominators.len(),
        failures,
    };

    let samples = FunctorSamples::exhaustive(&*localization.base);
    let composite = localization.functor.then(lifted, &samples);
    let factorization = compare_functors(&composite, base_functor, &samples);
    let factorization_witness = (!factorization.holds).then(|| {
        compute_witness_id(
            Law::Factorization,
            composite.label(),
            &json!({ "mismatches": factorization.mismatches.len() }),
        )
    });

    let fractions = match target.as_finite() {
        None => FractionCheck::Skipped {
            reason: format!("{} cannot enumerate its arrows", target.name()),
        },
        Some(_) => {
            let mut mismatches = Vec::new();
            for arrow in localization.category.arrows() {
                let expected = expected_image(base_functor, &inverses, arrow);
                let actual = lifted.map_arrow(arrow).map_err(|e| e.to_string());
                let agree =
                    matches!((&expected, &actual), (Ok(e), Ok(a)) if target.arrows_equal(e, a));
                if agree {
                    continue;
                }
                let render = |result: &Result<T::Arrow, String>| match result {
                    Ok(value) => value.to_string(),
                    Err(e) => format!("error: {e}"),
                };
                let (expected, actual, morphism) =
                    (render(&expected), render(&actual), arrow.to_string());
                mismatches.push(FractionMismatch {
                    witness_id: compute_witness_id(
                        Law::FractionAgreement,
                        &morphism,
                        &json!({ "expected": expected, "actual": actual }),
                    ),
                    morphism,
                    expected,
                    actual,
                });
            }
            FractionCheck::Checked {
                checked: localization.category.arrows().len(),
                mismatches,
            }
        }
    };

    let denominators_inverted = inversion.failures.is_empty();
    let lift_respects_fractions = fractions.holds();
    Ok(UniversalPropertyReport {
        holds: denominators_inverted && factorization.holds && lift_respects_fractions,
        denominators_inverted,
        inversion,
        factorization,
        factorization_witness,
        lift_respects_fractions,
        fractions,
    })
}

/// F(n) ∘ F(d)⁻¹ for the canonical roof of `arrow`. Denominators that are
/// only composites of declared ones are inverted on demand.
fn expected_image<C, T>(
    base_functor: &Functor<C, T>,
    inverses: &HashMap<usize, T::Arrow>,
    arrow: &LocalizedMorphism<C>,
) -> Result<T::Arrow, String>
where
    C: FiniteCategory,
    T: Category,
{
    let target = &**base_functor.target();
    let inverse = match inverses.get(&arrow.roof.denominator) {
        Some(inverse) => inverse.clone(),
        None => {
            let image = base_functor
                .map_arrow(&arrow.denominator)
                .map_err(|e| e.to_string())?;
            match find_inverse(target, &image) {
                IsoVerdict::Invertible { inverse } => inverse,
                IsoVerdict::NotInvertible { reason } => return Err(reason),
            }
        }
    };
    let numerator = base_functor
        .map_arrow(&arrow.numerator)
        .map_err(|e| e.to_string())?;
    target
        .compose(&numerator, &inverse)
        .map_err(|e| e.to_string())
}

fn expect_name(role: &str, expected: &str, actual: &str) -> Result<(), LocalizationError> {
    if expected == actual {
        return Ok(());
    }
    Err(LocalizationError::CategoryMismatch {
        role: role.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
