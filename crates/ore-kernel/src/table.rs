//! Finite categories given by an explicit composition table.
//!
//! A table category lists its objects, its named morphisms and, for every
//! composable pair of non-identity morphisms, the name of the composite.
//! Identities `id_X` are generated per object and compose implicitly.
//!
//! ```text
//! objects      A, B, C
//! arrows       f: A → B, g: B → C, h: A → C
//! composition  g ∘ f = h
//! ```
//!
//! The builder validates the table: endpoints must match, every composable
//! pair must have exactly one composite, and composition must be associative.

use crate::category::{Category, FiniteCategory, Morphism, ObjectId};
use crate::error::LocalizationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Serializable description of a table category (the JSON input format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpec {
    pub name: String,
    pub objects: Vec<String>,
    #[serde(default)]
    pub arrows: Vec<ArrowSpec>,
    #[serde(default)]
    pub compositions: Vec<CompositionSpec>,
}

/// A declared non-identity arrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrowSpec {
    pub name: String,
    pub source: String,
    pub target: String,
}

/// One table entry: `after ∘ before = result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionSpec {
    pub after: String,
    pub before: String,
    pub result: String,
}

/// A validated finite category backed by a composition table.
#[derive(Debug, Clone)]
pub struct TableCategory {
    name: String,
    objects: Vec<ObjectId>,
    arrows: Vec<Morphism>,
    by_name: HashMap<String, usize>,
    identities: HashMap<ObjectId, usize>,
    table: HashMap<(usize, usize), usize>,
}

/// Incremental builder for [`TableCategory`].
#[derive(Debug, Clone)]
pub struct TableCategoryBuilder {
    spec: CategorySpec,
}

impl TableCategoryBuilder {
    pub fn object(mut self, name: &str) -> Self {
        self.spec.objects.push(name.to_string());
        self
    }

    pub fn arrow(mut self, name: &str, source: &str, target: &str) -> Self {
        self.spec.arrows.push(ArrowSpec {
            name: name.to_string(),
            source: source.to_string(),
            target: target.to_string(),
        });
        self
    }

    /// Declare `after ∘ before = result`.
    pub fn compose(mut self, after: &str, before: &str, result: &str) -> Self {
        self.spec.compositions.push(CompositionSpec {
            after: after.to_string(),
            before: before.to_string(),
            result: result.to_string(),
        });
        self
    }

    pub fn build(self) -> Result<TableCategory, LocalizationError> {
        TableCategory::from_spec(&self.spec)
    }
}

impl TableCategory {
    /// Start building a category called `name`.
    pub fn builder(name: &str) -> TableCategoryBuilder {
        TableCategoryBuilder {
            spec: CategorySpec {
                name: name.to_string(),
                objects: Vec::new(),
                arrows: Vec::new(),
                compositions: Vec::new(),
            },
        }
    }

    /// Validate a spec and build the category.
    pub fn from_spec(spec: &CategorySpec) -> Result<Self, LocalizationError> {
        let invalid = |description: String| LocalizationError::InvalidCategory {
            category: spec.name.clone(),
            description,
        };

        let mut objects: Vec<ObjectId> = Vec::new();
        for name in &spec.objects {
            let object = ObjectId::new(name.as_str());
            if objects.contains(&object) {
                return Err(invalid(format!("duplicate object {name}")));
            }
            objects.push(object);
        }

        let mut arrows: Vec<Morphism> = objects.iter().cloned().map(Morphism::identity).collect();
        for declared in &spec.arrows {
            let source = ObjectId::new(declared.source.as_str());
            let target = ObjectId::new(declared.target.as_str());
            for endpoint in [&source, &target] {
                if !objects.contains(endpoint) {
                    return Err(LocalizationError::UnknownObject {
                        category: spec.name.clone(),
                        object: endpoint.to_string(),
                    });
                }
            }
            arrows.push(Morphism::new(declared.name.as_str(), source, target));
        }

        let mut by_name = HashMap::new();
        for (index, arrow) in arrows.iter().enumerate() {
            if by_name.insert(arrow.name.clone(), index).is_some() {
                return Err(invalid(format!("duplicate arrow name {}", arrow.name)));
            }
        }
        let identities: HashMap<ObjectId, usize> = objects
            .iter()
            .enumerate()
            .map(|(index, object)| (object.clone(), index))
            .collect();

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| invalid(format!("unknown arrow {name} in composition table")))
        };

        let mut table: HashMap<(usize, usize), usize> = HashMap::new();
        for entry in &spec.compositions {
            let after = lookup(&entry.after)?;
            let before = lookup(&entry.before)?;
            let result = lookup(&entry.result)?;
            let (a, b, r) = (&arrows[after], &arrows[before], &arrows[result]);
            if b.target != a.source {
                return Err(invalid(format!(
                    "{} ∘ {} declared but {} ends at {} and {} starts at {}",
                    a.name, b.name, b.name, b.target, a.name, a.source
                )));
            }
            if r.source != b.source || r.target != a.target {
                return Err(invalid(format!(
                    "{} ∘ {} = {} has wrong endpoints",
                    a.name, b.name, r.name
                )));
            }
            if let Some(previous) = table.insert((after, before), result)
                && previous != result
            {
                return Err(invalid(format!(
                    "conflicting composites for {} ∘ {}: {} and {}",
                    a.name, b.name, arrows[previous].name, r.name
                )));
            }
        }

        // Identity laws: fill in implicit entries, reject contradicting ones.
        for (index, arrow) in arrows.iter().enumerate() {
            let left_unit = identities[&arrow.target];
            let right_unit = identities[&arrow.source];
            for key in [(left_unit, index), (index, right_unit)] {
                match table.insert(key, index) {
                    Some(previous) if previous != index => {
                        return Err(invalid(format!(
                            "identity law violated: {} ∘ {} declared as {}",
                            arrows[key.0].name,
                            arrows[key.1].name,
                            arrows[previous].name
                        )));
                    }
                    _ => {}
                }
            }
        }

        for (after, a) in arrows.iter().enumerate() {
            for (before, b) in arrows.iter().enumerate() {
                if b.target == a.source && !table.contains_key(&(after, before)) {
                    return Err(invalid(format!("missing composite {} ∘ {}", a.name, b.name)));
                }
            }
        }

        let category = Self {
            name: spec.name.clone(),
            objects,
            arrows,
            by_name,
            identities,
            table,
        };
        category.check_associativity()?;
        Ok(category)
    }

    /// The serializable description of this category.
    ///
    /// Only non-identity table entries are emitted.
    pub fn to_spec(&self) -> CategorySpec {
        let mut compositions: Vec<CompositionSpec> = self
            .table
            .iter()
            .filter(|((after, before), _)| {
                !self.arrows[*after].is_identity() && !self.arrows[*before].is_identity()
            })
            .map(|((after, before), result)| CompositionSpec {
                after: self.arrows[*after].name.clone(),
                before: self.arrows[*before].name.clone(),
                result: self.arrows[*result].name.clone(),
            })
            .collect();
        compositions.sort_by(|x, y| (&x.after, &x.before).cmp(&(&y.after, &y.before)));

        CategorySpec {
            name: self.name.clone(),
            objects: self.objects.iter().map(|o| o.0.clone()).collect(),
            arrows: self
                .arrows
                .iter()
                .filter(|a| !a.is_identity())
                .map(|a| ArrowSpec {
                    name: a.name.clone(),
                    source: a.source.0.clone(),
                    target: a.target.0.clone(),
                })
                .collect(),
            compositions,
        }
    }

    /// Look up a morphism by name.
    pub fn morphism(&self, name: &str) -> Option<&Morphism> {
        self.by_name.get(name).map(|&index| &self.arrows[index])
    }

    /// Look up several morphisms by name, failing on the first unknown one.
    pub fn morphisms(&self, names: &[&str]) -> Result<Vec<Morphism>, LocalizationError> {
        names
            .iter()
            .map(|name| {
                self.morphism(name)
                    .cloned()
                    .ok_or_else(|| LocalizationError::ArrowNotFound {
                        category: self.name.clone(),
                        arrow: (*name).to_string(),
                    })
            })
            .collect()
    }

    fn index_of(&self, arrow: &Morphism) -> Result<usize, LocalizationError> {
        self.by_name
            .get(&arrow.name)
            .copied()
            .filter(|&index| self.arrows[index] == *arrow)
            .ok_or_else(|| LocalizationError::ArrowNotFound {
                category: self.name.clone(),
                arrow: arrow.to_string(),
            })
    }

    fn check_associativity(&self) -> Result<(), LocalizationError> {
        for ((g, f), gf) in &self.table {
            for (h, arrow) in self.arrows.iter().enumerate() {
                if arrow.source != self.arrows[*g].target {
                    continue;
                }
                let hg = self.table[&(h, *g)];
                let left = self.table[&(hg, *f)];
                let right = self.table[&(h, *gf)];
                if left != right {
                    return Err(LocalizationError::InvalidCategory {
                        category: self.name.clone(),
                        description: format!(
                            "composition is not associative at ({} ∘ {}) ∘ {}: {} vs {}",
                            self.arrows[h].name,
                            self.arrows[*g].name,
                            self.arrows[*f].name,
                            self.arrows[left].name,
                            self.arrows[right].name
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

impl Category for TableCategory {
    type Obj = ObjectId;
    type Arrow = Morphism;

    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self, object: &ObjectId) -> Result<Morphism, LocalizationError> {
        self.identities
            .get(object)
            .map(|&index| self.arrows[index].clone())
            .ok_or_else(|| LocalizationError::UnknownObject {
                category: self.name.clone(),
                object: object.to_string(),
            })
    }

    fn source(&self, arrow: &Morphism) -> ObjectId {
        arrow.source.clone()
    }

    fn target(&self, arrow: &Morphism) -> ObjectId {
        arrow.target.clone()
    }

    fn compose(&self, after: &Morphism, before: &Morphism) -> Result<Morphism, LocalizationError> {
        let a = self.index_of(after)?;
        let b = self.index_of(before)?;
        self.table
            .get(&(a, b))
            .map(|&index| self.arrows[index].clone())
            .ok_or_else(|| LocalizationError::NotComposable {
                category: self.name.clone(),
                after: after.to_string(),
                before: before.to_string(),
            })
    }

    fn as_finite(&self) -> Option<&dyn FiniteCategory<Obj = ObjectId, Arrow = Morphism>> {
        Some(self)
    }
}

impl FiniteCategory for TableCategory {
    fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    fn arrows(&self) -> &[Morphism] {
        &self.arrows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path2() -> TableCategory {
        TableCategory::builder("path2")
            .object("A")
            .object("B")
            .object("C")
            .arrow("f", "A", "B")
            .arrow("g", "B", "C")
            .arrow("h", "A", "C")
            .compose("g", "f", "h")
            .build()
            .unwrap()
    }

    #[test]
    fn identities_come_first() {
        let cat = path2();
        let names: Vec<&str> = cat.arrows().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["id_A", "id_B", "id_C", "f", "g", "h"]);
    }

    #[test]
    fn composition_uses_table_and_units() {
        let cat = path2();
        let f = cat.morphism("f").unwrap().clone();
        let g = cat.morphism("g").unwrap().clone();
        assert_eq!(cat.compose(&g, &f).unwrap().name, "h");

        let id_b = cat.identity(&ObjectId::new("B")).unwrap();
        assert_eq!(cat.compose(&id_b, &f).unwrap(), f);
        assert_eq!(cat.compose(&g, &id_b).unwrap(), g);
    }

    #[test]
    fn non_composable_pair_is_an_error() {
        let cat = path2();
        let f = cat.morphism("f").unwrap().clone();
        let err = cat.compose(&f, &f).unwrap_err();
        assert!(matches!(err, LocalizationError::NotComposable { .. }));
    }

    #[test]
    fn missing_composite_is_rejected() {
        let err = TableCategory::builder("broken")
            .object("A")
            .object("B")
            .object("C")
            .arrow("f", "A", "B")
            .arrow("g", "B", "C")
            .build()
            .unwrap_err();
        match err {
            LocalizationError::InvalidCategory { description, .. } => {
                assert!(description.contains("missing composite g ∘ f"));
            }
            other => panic!("expected invalid category, got {other:?}"),
        }
    }

    #[test]
    fn non_associative_table_is_rejected() {
        // e is idempotent on A, but u ∘ e is declared as something that breaks
        // (u ∘ e) ∘ e = u ∘ (e ∘ e).
        let err = TableCategory::builder("skewed")
            .object("A")
            .object("B")
            .arrow("e", "A", "A")
            .arrow("u", "A", "B")
            .arrow("v", "A", "B")
            .compose("e", "e", "e")
            .compose("u", "e", "v")
            .compose("v", "e", "u")
            .build()
            .unwrap_err();
        assert!(matches!(err, LocalizationError::InvalidCategory { .. }));
    }

    #[test]
    fn conflicting_composites_are_rejected() {
        let builder = TableCategory::builder("parallel")
            .object("A")
            .object("B")
            .object("C")
            .arrow("f", "A", "B")
            .arrow("g", "B", "C")
            .arrow("h", "A", "C")
            .arrow("k", "A", "C")
            .compose("g", "f", "h");
        assert!(builder.clone().compose("g", "f", "h").build().is_ok());

        let err = builder.compose("g", "f", "k").build().unwrap_err();
        match err {
            LocalizationError::InvalidCategory { description, .. } => {
                assert!(description.contains("conflicting composites for g ∘ f: h and k"));
            }
            other => panic!("expected invalid category, got {other:?}"),
        }
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let err = TableCategory::builder("dangling")
            .object("A")
            .arrow("f", "A", "Z")
            .build()
            .unwrap_err();
        assert!(matches!(err, LocalizationError::UnknownObject { .. }));
    }

    #[test]
    fn spec_round_trip_preserves_structure() {
        let cat = path2();
        let spec = cat.to_spec();
        assert_eq!(spec.compositions.len(), 1);
        let rebuilt = TableCategory::from_spec(&spec).unwrap();
        assert_eq!(rebuilt.arrows(), cat.arrows());

        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["compositions"][0]["result"], "h");
    }
}
