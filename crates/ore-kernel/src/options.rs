//! Knobs for a localization run, loadable from TOML.
//!
//! ```toml
//! documentation = ["inverting the weak equivalences"]
//! witness-sample-limit = 64
//! check-ore = true
//! ```

use crate::error::OptionsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LocalizationOptions {
    /// Echoed verbatim into the localization functor's witness.
    pub documentation: Vec<String>,

    /// Cap on base arrows used to check the localization functor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub witness_sample_limit: Option<usize>,

    /// When false the Ore check is reported as skipped. A skipped check
    /// counts as passing, and the diagnostics details say so.
    pub check_ore: bool,
}

impl Default for LocalizationOptions {
    fn default() -> Self {
        Self {
            documentation: Vec::new(),
            witness_sample_limit: None,
            check_ore: true,
        }
    }
}

impl LocalizationOptions {
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        Self::parse(text, "<inline>")
    }

    /// Read and parse an options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| OptionsError::Read {
            path: display.clone(),
            source,
        })?;
        Self::parse(&text, &display)
    }

    /// Builder-style documentation setter.
    pub fn with_documentation(
        mut self,
        lines: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.documentation = lines.into_iter().map(Into::into).collect();
        self
    }

    fn parse(text: &str, path: &str) -> Result<Self, OptionsError> {
        toml::from_str(text).map_err(|source| OptionsError::ParseToml {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let options = LocalizationOptions::from_toml_str("").unwrap();
        assert_eq!(options, LocalizationOptions::default());
        assert!(options.check_ore);
    }

    #[test]
    fn kebab_case_keys() {
        let options = LocalizationOptions::from_toml_str(
            r#"
documentation = ["first", "second"]
witness-sample-limit = 4
check-ore = false
"#,
        )
        .unwrap();
        assert_eq!(options.documentation, ["first", "second"]);
        assert_eq!(options.witness_sample_limit, Some(4));
        assert!(!options.check_ore);
    }

    #[test]
    fn bad_toml_names_the_source() {
        let err = LocalizationOptions::from_toml_str("check-ore = \"yes\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid toml at <inline>"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = LocalizationOptions::load("/nonexistent/ore/options.toml").unwrap_err();
        assert!(matches!(err, OptionsError::Read { .. }));
    }
}
