//! # Ore Kernel
//!
//! Localization of a finite category at a set of morphisms by a calculus of
//! fractions: every denominator becomes invertible, every new morphism is a
//! roof `n ∘ d⁻¹`, and the construction reports whether it is lawful.
//!
//! This crate is **category-agnostic**: it works against any finite category
//! exposed through [`Category`] / [`FiniteCategory`]. [`TableCategory`] is the
//! concrete, table-driven implementation used by tests and the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ArrowIndex            ← Dense indices, predicate fallback
//!     │
//! FractionEngine        ← Closure, equivalence class, canonical roof
//!     │
//! Registry              ← One localized morphism per canonical class
//!     │
//! LocalizedCategory     ← Composition by Ore squares (or an obstruction)
//!     │
//! Localization          ← Category + loc functor + diagnostics
//!     │
//! check_universal_property ← Inversion, factorization, fraction agreement
//! ```

pub mod category;
pub mod diagnostics;
pub mod error;
pub mod fraction;
pub mod functor;
pub mod index;
pub mod iso;
pub mod localization;
pub mod localized;
pub mod options;
pub mod registry;
pub mod table;
pub mod toy;
pub mod universal;
pub mod witness;

pub use category::{Category, FiniteCategory, Morphism, ObjectId};
pub use diagnostics::{
    CompositionClosureCheck, CompositionViolation, IdentityClosureCheck, LocalizationDiagnostics,
    MissingIdentity, OreConditionCheck, OreFailure,
};
pub use error::{Law, LocalizationError, OptionsError};
pub use fraction::{FractionEngine, FractionKey, RoofIndex};
pub use functor::{
    Functor, FunctorComparison, FunctorMismatch, FunctorSamples, FunctorWitness, compare_functors,
};
pub use index::ArrowIndex;
pub use iso::{IsoVerdict, find_inverse};
pub use localization::{ArrowSummary, Localization, LocalizationSummary, localize};
pub use localized::{Composite, FractionContext, LocalizedCategory, OreObstruction};
pub use options::LocalizationOptions;
pub use registry::{LocalizedArrow, LocalizedMorphism, Registry};
pub use table::{ArrowSpec, CategorySpec, CompositionSpec, TableCategory};
pub use universal::{
    DenominatorInversion, FractionCheck, FractionMismatch, InversionFailure,
    UniversalPropertyReport, check_universal_property,
};
