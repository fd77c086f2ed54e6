use crate::support::{
    load_options_or_exit, localize_or_exit, print_report, read_category_or_exit,
    select_denominators_or_exit,
};

pub fn run(
    category: String,
    denominator: Vec<String>,
    all: bool,
    config: Option<String>,
    json_output: bool,
) {
    let options = load_options_or_exit(config.as_deref());
    let base = read_category_or_exit(&category);
    if denominator.is_empty() && !all {
        eprintln!("error: no denominators given (use --denominator or --all)");
        std::process::exit(1);
    }
    let denominators = select_denominators_or_exit(&base, &denominator);
    let localization = localize_or_exit(base, &denominators, &options);
    print_report(
        &format!("ore localize {category}"),
        &localization,
        json_output,
    );
}
