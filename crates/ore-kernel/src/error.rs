//! Error types for Ore kernel operations.
//!
//! Only contract violations live here. Mathematical outcomes (an Ore square
//! that does not exist, a functor that fails to invert a denominator) are
//! returned as data by the components that detect them.

/// Errors arising from caller contract violations or malformed inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocalizationError {
    /// An arrow is not part of the category's arrow list.
    #[error("arrow not found in {category}: {arrow}")]
    ArrowNotFound { category: String, arrow: String },

    /// A dense arrow index does not address any arrow.
    #[error("arrow index {index} out of range (len {len}) while {context}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        context: String,
    },

    /// A roof class came back empty. The seed is always part of its own
    /// class, so this signals a broken category implementation.
    #[error("empty closure for roof ({denominator}, {numerator})")]
    EmptyClosure {
        denominator: usize,
        numerator: usize,
    },

    /// A canonical fraction key has no registered localized morphism.
    #[error("no localized morphism registered for fraction {key}")]
    MissingFraction { key: String },

    /// Two localized morphisms do not meet at a common object.
    #[error("boundary mismatch: {left} ends at {left_target}, {right} starts at {right_source}")]
    BoundaryMismatch {
        left: String,
        right: String,
        left_target: String,
        right_source: String,
    },

    /// Universal-property inputs do not share the expected categories.
    #[error("category mismatch for {role}: expected {expected}, got {actual}")]
    CategoryMismatch {
        role: String,
        expected: String,
        actual: String,
    },

    /// Base composition asked for a pair that does not compose.
    #[error("not composable in {category}: {after} after {before}")]
    NotComposable {
        category: String,
        after: String,
        before: String,
    },

    /// An object is not part of the category.
    #[error("unknown object in {category}: {object}")]
    UnknownObject { category: String, object: String },

    /// A category description is malformed (bad table, associativity failure).
    #[error("invalid category {category}: {description}")]
    InvalidCategory {
        category: String,
        description: String,
    },

    /// Raw composition of two localized morphisms admits no Ore square.
    ///
    /// Only surfaced by `Category::compose` on the localized category; the
    /// diagnostics path records obstructions as data instead.
    #[error("Ore obstruction composing {right} after {left}: {reason}")]
    OreObstruction {
        left: String,
        right: String,
        reason: String,
    },
}

/// Errors loading [`crate::options::LocalizationOptions`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("failed to read options file: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Which localization law a failure record is evidence against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    IdentityClosure,
    CompositionClosure,
    OreCondition,
    DenominatorInversion,
    Factorization,
    FractionAgreement,
}

impl Law {
    /// Stable failure class used when deriving witness identifiers.
    pub fn failure_class(self) -> &'static str {
        match self {
            Self::IdentityClosure => "identity_closure_failure",
            Self::CompositionClosure => "composition_closure_failure",
            Self::OreCondition => "ore_obstruction",
            Self::DenominatorInversion => "denominator_not_inverted",
            Self::Factorization => "factorization_mismatch",
            Self::FractionAgreement => "fraction_mismatch",
        }
    }

    /// Stable law reference used when deriving witness identifiers.
    pub fn law_ref(self) -> &'static str {
        match self {
            Self::IdentityClosure => "LOC-1.1",
            Self::CompositionClosure => "LOC-1.2",
            Self::OreCondition => "LOC-1.3",
            Self::DenominatorInversion => "UP-2.1",
            Self::Factorization => "UP-2.2",
            Self::FractionAgreement => "UP-2.3",
        }
    }
}
