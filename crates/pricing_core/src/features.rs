//! Feature naming helpers

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static NON_IDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^0-9a-zA-Z_]+").expect("identifier pattern is a valid regex")
});

/// Convert a column name to a safe field identifier.
///
/// Surrounding whitespace is dropped and every run of characters outside
/// `[0-9A-Za-z_]` collapses to a single underscore.
pub fn slugify(name: &str) -> String {
    NON_IDENT.replace_all(name.trim(), "_").into_owned()
}

/// Map each feature name to its sanitized identifier
pub fn feature_field_map<S: AsRef<str>>(features: &[S]) -> BTreeMap<String, String> {
    features
        .iter()
        .map(|f| (f.as_ref().to_string(), slugify(f.as_ref())))
        .collect()
}
