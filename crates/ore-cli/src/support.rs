use ore_kernel::{
    Category, CategorySpec, FiniteCategory, Localization, LocalizationOptions, Morphism,
    TableCategory, localize,
};
use serde::Serialize;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

pub fn read_category_or_exit(path: &str) -> TableCategory {
    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {path}: {e}");
        std::process::exit(1);
    });
    let spec: CategorySpec = serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: invalid category json at {path}: {e}");
        std::process::exit(1);
    });
    TableCategory::from_spec(&spec).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_options_or_exit(path: Option<&str>) -> LocalizationOptions {
    match path {
        None => LocalizationOptions::default(),
        Some(path) => LocalizationOptions::load(path).unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        }),
    }
}

/// The named arrows, or every arrow when `names` is empty.
pub fn select_denominators_or_exit(category: &TableCategory, names: &[String]) -> Vec<Morphism> {
    if names.is_empty() {
        return category.arrows().to_vec();
    }
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    category.morphisms(&names).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn localize_or_exit(
    base: TableCategory,
    denominators: &[Morphism],
    options: &LocalizationOptions,
) -> Localization<TableCategory> {
    tracing::debug!(
        category = base.name(),
        denominators = denominators.len(),
        "localizing"
    );
    localize(Arc::new(base), denominators, options).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn print_json_or_exit<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: failed to serialize output: {e}");
            std::process::exit(1);
        }
    }
}

pub fn print_report(header: &str, localization: &Localization<TableCategory>, json_output: bool) {
    let summary = localization.summary();
    if json_output {
        print_json_or_exit(&summary);
        return;
    }

    let diagnostics = &summary.diagnostics;
    let functor = &summary.functor;
    println!("{header}");
    println!("  Denominators: {}", summary.denominators.len());
    println!(
        "  Localized: {} ({} arrows)",
        summary.category,
        summary.arrows.len()
    );
    println!("  Fingerprint: {}", summary.fingerprint);
    println!(
        "  Functor: {} ({} objects, {} arrows, {} composites checked)",
        if functor.holds { "lawful" } else { "unlawful" },
        functor.checked_objects,
        functor.checked_arrows,
        functor.checked_composites
    );
    println!(
        "  Identity closure: {}",
        yes_no(diagnostics.identity_closure.holds)
    );
    println!(
        "  Composition closure: {}",
        yes_no(diagnostics.composition_closure.holds)
    );
    println!(
        "  Ore condition: {}",
        if diagnostics.ore_condition.skipped {
            "skipped"
        } else {
            yes_no(diagnostics.ore_condition.holds)
        }
    );
    let lawful = match (diagnostics.holds, diagnostics.ore_condition.skipped) {
        (true, true) => "yes (Ore condition skipped)",
        (holds, _) => yes_no(holds),
    };
    println!("  Lawful: {lawful}");

    print_block("Details", &diagnostics.details);
    print_block(
        "Arrows",
        &summary
            .arrows
            .iter()
            .map(|a| {
                format!(
                    "[{}] {} → {} ({} over {})",
                    a.key, a.source, a.target, a.numerator, a.denominator
                )
            })
            .collect::<Vec<_>>(),
    );
    print_block(
        "Missing identities",
        &diagnostics
            .identity_closure
            .missing
            .iter()
            .map(|m| format!("{} ({})", m.object, m.witness_id))
            .collect::<Vec<_>>(),
    );
    print_block(
        "Closure violations",
        &diagnostics
            .composition_closure
            .violations
            .iter()
            .map(|v| {
                format!(
                    "{} ∘ {} = {} ({})",
                    v.after, v.before, v.composite, v.witness_id
                )
            })
            .collect::<Vec<_>>(),
    );
    print_block(
        "Ore obstructions",
        &diagnostics
            .ore_condition
            .failures
            .iter()
            .map(|f| {
                format!(
                    "{} after {}: {} ({})",
                    f.right, f.left, f.reason, f.witness_id
                )
            })
            .collect::<Vec<_>>(),
    );
    print_block("Functor failures", &functor.failures);
}

fn print_block(header: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {header}:");
    for item in items {
        println!("    - {item}");
    }
}

fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
