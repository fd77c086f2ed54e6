//! Isomorphism detection for arrows of an arbitrary category.
//!
//! Finite categories are searched exhaustively for a two-sided inverse.
//! Other categories can only answer through [`Category::declared_inverse`].

use crate::category::Category;

/// Whether an arrow is invertible, with the inverse as witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IsoVerdict<A> {
    Invertible { inverse: A },
    NotInvertible { reason: String },
}

impl<A> IsoVerdict<A> {
    pub fn is_invertible(&self) -> bool {
        matches!(self, Self::Invertible { .. })
    }

    pub fn inverse(&self) -> Option<&A> {
        match self {
            Self::Invertible { inverse } => Some(inverse),
            Self::NotInvertible { .. } => None,
        }
    }
}

/// Search for a two-sided inverse of `arrow` in `category`.
pub fn find_inverse<C: Category + ?Sized>(category: &C, arrow: &C::Arrow) -> IsoVerdict<C::Arrow> {
    let (source, target) = (category.source(arrow), category.target(arrow));

    let candidates: Vec<C::Arrow> = match category.as_finite() {
        Some(finite) => finite
            .arrows()
            .iter()
            .filter(|g| category.source(g) == target && category.target(g) == source)
            .cloned()
            .collect(),
        None => match category.declared_inverse(arrow) {
            Some(declared) => vec![declared],
            None => {
                return IsoVerdict::NotInvertible {
                    reason: format!(
                        "{arrow} in {}: category is not finite and declares no inverse",
                        category.name()
                    ),
                };
            }
        },
    };

    let (id_source, id_target) = match (category.identity(&source), category.identity(&target)) {
        (Ok(s), Ok(t)) => (s, t),
        (Err(e), _) | (_, Err(e)) => {
            return IsoVerdict::NotInvertible {
                reason: format!("{arrow}: {e}"),
            };
        }
    };

    for candidate in candidates {
        let left = category.compose(&candidate, arrow);
        let right = category.compose(arrow, &candidate);
        if let (Ok(left), Ok(right)) = (left, right)
            && category.arrows_equal(&left, &id_source)
            && category.arrows_equal(&right, &id_target)
        {
            return IsoVerdict::Invertible { inverse: candidate };
        }
    }

    IsoVerdict::NotInvertible {
        reason: format!("{arrow} has no two-sided inverse in {}", category.name()),
    }
}
