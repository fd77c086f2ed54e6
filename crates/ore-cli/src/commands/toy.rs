use crate::support::{
    load_options_or_exit, localize_or_exit, print_report, select_denominators_or_exit,
};
use ore_kernel::toy::{TOY_NAMES, get_category};

pub fn run(name: String, denominator: Vec<String>, config: Option<String>, json_output: bool) {
    let options = load_options_or_exit(config.as_deref());
    let Some(base) = get_category(&name) else {
        eprintln!(
            "error: unknown toy category `{name}` (expected one of: {})",
            TOY_NAMES.join(", ")
        );
        std::process::exit(1);
    };
    let denominators = select_denominators_or_exit(&base, &denominator);
    let localization = localize_or_exit(base, &denominators, &options);
    print_report(&format!("ore toy {name}"), &localization, json_output);
}
