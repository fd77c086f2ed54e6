use crate::support::print_json_or_exit;
use ore_kernel::toy::{TOY_NAMES, get_category};
use ore_kernel::{FiniteCategory, TableCategory};
use serde_json::json;

pub fn run(json_output: bool) {
    let toys: Vec<(&str, TableCategory)> = TOY_NAMES
        .iter()
        .filter_map(|name| get_category(name).map(|category| (*name, category)))
        .collect();

    if json_output {
        let payload: Vec<_> = toys
            .iter()
            .map(|(name, category)| {
                json!({
                    "name": name,
                    "objects": category.objects().len(),
                    "arrows": category.arrows().len(),
                })
            })
            .collect();
        print_json_or_exit(&payload);
    } else {
        for (name, category) in &toys {
            println!(
                "{name:<22} {} objects, {} arrows",
                category.objects().len(),
                category.arrows().len()
            );
        }
    }
}
