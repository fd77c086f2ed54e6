//! Small named categories for tests and the `ore toy` command.
//!
//! ## Categories
//!
//! - **walking_arrow**: `A --f--> B`. Inverting `f` yields the walking
//!   isomorphism.
//!
//! - **path2**: `A --f--> B --g--> C` with `h = g ∘ f`. Inverting `g` alone
//!   needs non-trivial Ore squares for `loc(g) ∘ loc(f)`.
//!
//! - **cospan**: `A --s--> C <--t-- B`. Inverting both legs has no Ore square
//!   for `t⁻¹ ∘ s` (nothing maps `A → B`).
//!
//! - **span**: `B <--s-- A --t--> C`.
//!
//! - **walking_iso**: `f: A → B`, `g: B → A`, mutually inverse.
//!
//! - **iso_with_idempotent**: the walking isomorphism with an idempotent
//!   `e = e ∘ e` on `A`. Every hom-set has two arrows: a plain one and one
//!   passing through `e`. Composition ORs the "through e" bit.

use crate::table::TableCategory;

/// Names accepted by [`get_category`].
pub const TOY_NAMES: &[&str] = &[
    "walking_arrow",
    "path2",
    "cospan",
    "span",
    "walking_iso",
    "iso_with_idempotent",
];

/// Get a toy category by name.
pub fn get_category(name: &str) -> Option<TableCategory> {
    let built = match name {
        "walking_arrow" => TableCategory::builder(name)
            .object("A")
            .object("B")
            .arrow("f", "A", "B")
            .build(),
        "path2" => TableCategory::builder(name)
            .object("A")
            .object("B")
            .object("C")
            .arrow("f", "A", "B")
            .arrow("g", "B", "C")
            .arrow("h", "A", "C")
            .compose("g", "f", "h")
            .build(),
        "cospan" => TableCategory::builder(name)
            .object("A")
            .object("B")
            .object("C")
            .arrow("s", "A", "C")
            .arrow("t", "B", "C")
            .build(),
        "span" => TableCategory::builder(name)
            .object("A")
            .object("B")
            .object("C")
            .arrow("s", "A", "B")
            .arrow("t", "A", "C")
            .build(),
        "walking_iso" => TableCategory::builder(name)
            .object("A")
            .object("B")
            .arrow("f", "A", "B")
            .arrow("g", "B", "A")
            .compose("g", "f", "id_A")
            .compose("f", "g", "id_B")
            .build(),
        "iso_with_idempotent" => iso_with_idempotent(),
        _ => return None,
    };
    built.ok()
}

/// (name, source, target, passes through e)
const IDEMPOTENT_ARROWS: &[(&str, &str, &str, bool)] = &[
    ("id_A", "A", "A", false),
    ("id_B", "B", "B", false),
    ("e", "A", "A", true),
    ("f", "A", "B", false),
    ("fe", "A", "B", true),
    ("g", "B", "A", false),
    ("eg", "B", "A", true),
    ("feg", "B", "B", true),
];

fn iso_with_idempotent() -> Result<TableCategory, crate::error::LocalizationError> {
    let mut builder = TableCategory::builder("iso_with_idempotent")
        .object("A")
        .object("B");
    for &(name, source, target, _) in &IDEMPOTENT_ARROWS[2..] {
        builder = builder.arrow(name, source, target);
    }
    for &(after, mid, after_target, after_bit) in &IDEMPOTENT_ARROWS[2..] {
        for &(before, before_source, before_target, before_bit) in &IDEMPOTENT_ARROWS[2..] {
            if before_target != mid {
                continue;
            }
            let bit = after_bit || before_bit;
            let result = IDEMPOTENT_ARROWS
                .iter()
                .find(|(_, s, t, b)| *s == before_source && *t == after_target && *b == bit)
                .map(|(name, ..)| *name);
            if let Some(result) = result {
                builder = builder.compose(after, before, result);
            }
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, FiniteCategory};

    #[test]
    fn every_toy_builds() {
        for name in TOY_NAMES {
            let cat = get_category(name).unwrap_or_else(|| panic!("toy {name} failed to build"));
            assert_eq!(cat.name(), *name);
        }
        assert!(get_category("nope").is_none());
    }

    #[test]
    fn toy_sizes() {
        let arrows = |name| get_category(name).unwrap().arrows().len();
        assert_eq!(arrows("walking_arrow"), 3);
        assert_eq!(arrows("path2"), 6);
        assert_eq!(arrows("cospan"), 5);
        assert_eq!(arrows("span"), 5);
        assert_eq!(arrows("walking_iso"), 4);
        assert_eq!(arrows("iso_with_idempotent"), 8);
    }

    #[test]
    fn idempotent_composition_ors_the_bit() {
        let cat = get_category("iso_with_idempotent").unwrap();
        let arrow = |name| cat.morphism(name).unwrap().clone();
        assert_eq!(cat.compose(&arrow("e"), &arrow("e")).unwrap(), arrow("e"));
        assert_eq!(
            cat.compose(&arrow("g"), &arrow("f")).unwrap(),
            arrow("id_A")
        );
        assert_eq!(cat.compose(&arrow("eg"), &arrow("f")).unwrap(), arrow("e"));
        assert_eq!(
            cat.compose(&arrow("f"), &arrow("eg")).unwrap(),
            arrow("feg")
        );
    }
}
