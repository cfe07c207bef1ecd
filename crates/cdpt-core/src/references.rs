use std::sync::LazyLock;

use regex::Regex;

/// Citation markers of the form `【12:3†source】`.
static SOURCE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"【\d+:\d+†[^】]+】").expect("reference pattern is valid"));

/// Remove citation markers from an accepted response. All other text is
/// left as is, so stripping twice is the same as stripping once.
pub fn strip_source_references(text: &str) -> String {
    SOURCE_REFERENCE.replace_all(text, "").into_owned()
}
