//! Lawfulness checks for a localization.
//!
//! | Check | Law | Holds when |
//! |---|---|---|
//! | identity closure | LOC-1.1 | every object's identity is a denominator |
//! | composition closure | LOC-1.2 | composable denominators compose to a denominator |
//! | Ore condition | LOC-1.3 | every object-compatible pair of localized morphisms composes |
//!
//! Failures are data. Each failure record carries a witness id derived from
//! its content, so the same failure gets the same id across runs.

use crate::category::FiniteCategory;
use crate::error::{Law, LocalizationError};
use crate::fraction::FractionEngine;
use crate::localized::{Composite, LocalizedCategory};
use crate::options::LocalizationOptions;
use crate::witness::compute_witness_id;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// An object whose identity is not among the denominators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingIdentity {
    pub object: String,
    pub witness_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClosureCheck {
    pub holds: bool,
    pub checked_objects: usize,
    pub missing: Vec<MissingIdentity>,
}

/// Two composable denominators whose composite is not a denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionViolation {
    pub after: String,
    pub before: String,
    pub composite: String,
    pub witness_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionClosureCheck {
    pub holds: bool,
    pub checked_pairs: usize,
    pub violations: Vec<CompositionViolation>,
}

/// Two compatible localized morphisms without an Ore square.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreFailure {
    pub left: String,
    pub right: String,
    pub reason: String,
    pub witness_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OreConditionCheck {
    pub holds: bool,
    pub skipped: bool,
    pub checked_pairs: usize,
    pub failures: Vec<OreFailure>,
}

/// All three checks and their conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationDiagnostics {
    pub identity_closure: IdentityClosureCheck,
    pub composition_closure: CompositionClosureCheck,
    pub ore_condition: OreConditionCheck,
    pub holds: bool,
    pub details: Vec<String>,
}

impl LocalizationDiagnostics {
    /// Witness ids of every failure, in check order.
    pub fn witness_ids(&self) -> Vec<&str> {
        let identity = self
            .identity_closure
            .missing
            .iter()
            .map(|m| m.witness_id.as_str());
        let composition = self
            .composition_closure
            .violations
            .iter()
            .map(|v| v.witness_id.as_str());
        let ore = self
            .ore_condition
            .failures
            .iter()
            .map(|f| f.witness_id.as_str());
        identity.chain(composition).chain(ore).collect()
    }
}

/// Run every check against a freshly assembled localized category.
pub fn diagnose<C: FiniteCategory>(
    category: &LocalizedCategory<C>,
    options: &LocalizationOptions,
) -> Result<LocalizationDiagnostics, LocalizationError> {
    let engine = category.context().engine();
    let identity_closure = check_identity_closure(engine)?;
    let composition_closure = check_composition_closure(engine)?;
    let ore_condition = if options.check_ore {
        check_ore_condition(category)?
    } else {
        OreConditionCheck {
            holds: true,
            skipped: true,
            checked_pairs: 0,
            failures: Vec::new(),
        }
    };

    let mut details = Vec::with_capacity(4);
    details.push(if identity_closure.holds {
        format!(
            "identity closure: {} objects, all identities inverted",
            identity_closure.checked_objects
        )
    } else {
        let objects: Vec<&str> = identity_closure
            .missing
            .iter()
            .map(|m| m.object.as_str())
            .collect();
        format!(
            "identity closure: missing identities on {}",
            objects.join(", ")
        )
    });
    details.push(format!(
        "composition closure: {} pairs checked, {} violations",
        composition_closure.checked_pairs,
        composition_closure.violations.len()
    ));
    details.push(if ore_condition.skipped {
        "Ore condition: skipped; lawfulness does not cover it".to_string()
    } else {
        format!(
            "Ore condition: {} pairs checked, {} obstructions",
            ore_condition.checked_pairs,
            ore_condition.failures.len()
        )
    });

    Ok(LocalizationDiagnostics {
        holds: identity_closure.holds && composition_closure.holds && ore_condition.holds,
        identity_closure,
        composition_closure,
        ore_condition,
        details,
    })
}

fn check_identity_closure<C: FiniteCategory>(
    engine: &FractionEngine<C>,
) -> Result<IdentityClosureCheck, LocalizationError> {
    let index = engine.index();
    let objects = index.category().objects();
    let mut missing = Vec::new();
    for object in objects {
        if engine.is_denominator(index.identity_of(object)?) {
            continue;
        }
        let object = object.to_string();
        missing.push(MissingIdentity {
            witness_id: compute_witness_id(Law::IdentityClosure, &object, &json!(null)),
            object,
        });
    }
    Ok(IdentityClosureCheck {
        holds: missing.is_empty(),
        checked_objects: objects.len(),
        missing,
    })
}

fn check_composition_closure<C: FiniteCategory>(
    engine: &FractionEngine<C>,
) -> Result<CompositionClosureCheck, LocalizationError> {
    let index = engine.index();
    let mut checked_pairs = 0;
    let mut violations = Vec::new();
    for &after in engine.denominators() {
        for &before in engine.denominators() {
            if index.target_of(before)? != index.source_of(after)? {
                continue;
            }
            checked_pairs += 1;
            let composite = index.compose(after, before)?;
            if engine.is_denominator(composite) {
                continue;
            }
            let after = index
                .arrow_at(after, "reporting a closure violation")?
                .to_string();
            let before = index
                .arrow_at(before, "reporting a closure violation")?
                .to_string();
            let composite = index
                .arrow_at(composite, "reporting a closure violation")?
                .to_string();
            let context = json!({ "after": after, "before": before, "composite": composite });
            violations.push(CompositionViolation {
                witness_id: compute_witness_id(
                    Law::CompositionClosure,
                    &format!("{after} ∘ {before}"),
                    &context,
                ),
                after,
                before,
                composite,
            });
        }
    }
    Ok(CompositionClosureCheck {
        holds: violations.is_empty(),
        checked_pairs,
        violations,
    })
}

fn check_ore_condition<C: FiniteCategory>(
    category: &LocalizedCategory<C>,
) -> Result<OreConditionCheck, LocalizationError> {
    let arrows = category.arrows();
    let mut checked_pairs = 0;
    let mut failures = Vec::new();
    for left in arrows {
        for right in arrows {
            if left.target != right.source {
                continue;
            }
            checked_pairs += 1;
            if let Composite::Obstructed(obstruction) = category.compose_fractions(right, left)? {
                let context = json!({ "left": obstruction.left, "right": obstruction.right });
                failures.push(OreFailure {
                    witness_id: compute_witness_id(
                        Law::OreCondition,
                        &format!("{} after {}", obstruction.right, obstruction.left),
                        &context,
                    ),
                    left: obstruction.left,
                    right: obstruction.right,
                    reason: obstruction.reason,
                });
            }
        }
    }
    Ok(OreConditionCheck {
        holds: failures.is_empty(),
        skipped: false,
        checked_pairs,
        failures,
    })
}
