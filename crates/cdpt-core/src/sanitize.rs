//! Input normalization applied to every user utterance before it reaches
//! the policy gate or the model.

use std::sync::LazyLock;

use regex::Regex;

/// Framing prepended to every utterance so the model reads it in-domain.
pub const DOMAIN_PREFIX: &str = "In the context of Cardano development: ";

/// Domain-term substitutions, applied in order.
const SUBSTITUTIONS: &[(&str, &str)] = &[(r"(?i)\bADA\b", "Cardano Native Token ADA")];

static SUBSTITUTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    SUBSTITUTIONS
        .iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(pattern).expect("substitution pattern is valid"),
                *replacement,
            )
        })
        .collect()
});

static LIST_ENUMERATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\.\s+").expect("enumerator pattern is valid"));

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("line break pattern is valid"));

/// Normalize a raw utterance.
///
/// Missing input is treated as empty. Domain abbreviations are expanded,
/// bullet glyphs and leading list enumerators are dropped, the domain prefix
/// is prepended, line breaks collapse to single spaces, and the result is
/// trimmed. This never fails: malformed input degrades to the bare prefix.
pub fn sanitize_input(raw: Option<&str>) -> String {
    let mut text = raw.unwrap_or_default().replace('•', "");

    text = LIST_ENUMERATOR.replace_all(&text, "").into_owned();

    for (pattern, replacement) in SUBSTITUTION_PATTERNS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    let framed = format!("{DOMAIN_PREFIX}{text}");
    LINE_BREAKS.replace_all(&framed, " ").trim().to_string()
}
