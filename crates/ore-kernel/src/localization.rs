//! Assembly of a localization: category, functor, diagnostics.
//!
//! ```text
//! ArrowIndex ─▶ FractionEngine ─▶ Registry      (FractionContext, frozen)
//!                                     │
//!                     ┌───────────────┴───────────────┐
//!             LocalizedCategory                 loc: C → C[S⁻¹]
//!                     │
//!               diagnostics
//! ```
//!
//! The category and functor are returned even when the diagnostics fail;
//! an unlawful denominator set still yields a best-effort localization.

use crate::category::{Category, FiniteCategory};
use crate::diagnostics::{LocalizationDiagnostics, diagnose};
use crate::error::LocalizationError;
use crate::functor::{Functor, FunctorSamples, FunctorWitness};
use crate::localized::{FractionContext, LocalizedCategory};
use crate::options::LocalizationOptions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// The localization of `base` at `denominators`.
pub struct Localization<C: FiniteCategory> {
    pub base: Arc<C>,
    pub category: Arc<LocalizedCategory<C>>,
    /// The localization functor `C → C[S⁻¹]`.
    pub functor: Functor<C, LocalizedCategory<C>>,
    /// The denominators as supplied.
    pub denominators: Vec<C::Arrow>,
    pub diagnostics: LocalizationDiagnostics,
}

/// Localize `base` at `denominators`.
///
/// Errors only on contract violations (an unknown denominator, a category
/// whose composition escapes its own arrow list). Lawfulness is reported in
/// [`Localization::diagnostics`].
pub fn localize<C: FiniteCategory + 'static>(
    base: Arc<C>,
    denominators: &[C::Arrow],
    options: &LocalizationOptions,
) -> Result<Localization<C>, LocalizationError> {
    let context = Arc::new(FractionContext::build(Arc::clone(&base), denominators)?);
    let category = Arc::new(LocalizedCategory::new(Arc::clone(&context)));

    let samples = FunctorSamples::limited(&*base, options.witness_sample_limit);
    let embedding = Arc::clone(&context);
    let functor = Functor::new(
        "loc",
        Arc::clone(&base),
        Arc::clone(&category),
        |object: &C::Obj| object.clone(),
        move |arrow: &C::Arrow| embedding.embed(arrow).cloned(),
        &samples,
        options.documentation.clone(),
    );

    let mut diagnostics = diagnose(&category, options)?;
    let witness = functor.witness();
    if !witness.holds {
        diagnostics.details.push(format!(
            "localization functor: {} law failures on {} sampled arrows",
            witness.failures.len(),
            witness.checked_arrows
        ));
    }
    debug!(
        category = category.name(),
        arrows = category.arrows().len(),
        functor_holds = functor.witness().holds,
        holds = diagnostics.holds,
        "localization assembled"
    );

    Ok(Localization {
        base,
        category,
        functor,
        denominators: denominators.to_vec(),
        diagnostics,
    })
}

impl<C: FiniteCategory> Localization<C> {
    /// Serializable digest of this localization.
    pub fn summary(&self) -> LocalizationSummary {
        LocalizationSummary {
            base: self.base.name().to_string(),
            category: self.category.name().to_string(),
            fingerprint: self.category.fingerprint(),
            denominators: self.denominators.iter().map(ToString::to_string).collect(),
            arrows: self
                .category
                .arrows()
                .iter()
                .map(|arrow| ArrowSummary {
                    key: arrow.key.to_string(),
                    source: arrow.source.to_string(),
                    target: arrow.target.to_string(),
                    apex: arrow.apex.to_string(),
                    denominator: arrow.denominator.to_string(),
                    numerator: arrow.numerator.to_string(),
                })
                .collect(),
            functor: self.functor.witness().clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// One localized morphism, flattened to strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowSummary {
    pub key: String,
    pub source: String,
    pub target: String,
    pub apex: String,
    pub denominator: String,
    pub numerator: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationSummary {
    pub base: String,
    pub category: String,
    pub fingerprint: String,
    pub denominators: Vec<String>,
    pub arrows: Vec<ArrowSummary>,
    pub functor: FunctorWitness,
    pub diagnostics: LocalizationDiagnostics,
}
