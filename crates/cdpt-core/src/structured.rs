//! Structured reply parsing.
//!
//! The answer call prefills the assistant message with the opening of a
//! JSON object, so the full reply is `prefill + continuation`. Parsing is
//! two-stage: a strict `serde_json` parse, then (only if that fails) one
//! named textual repair and a second parse.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ParseError;
use crate::models::generation::GenerationResult;

/// The JSON object the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredReply {
    #[serde(default)]
    pub user_query: Option<String>,
    #[serde(default)]
    pub contextual_query: Option<String>,
    #[serde(default)]
    pub category_title: Option<String>,
    pub response: String,
}

impl StructuredReply {
    /// Convert into a turn result, normalizing the response text.
    pub fn into_result(self) -> GenerationResult {
        GenerationResult {
            response: normalize_response(&self.response),
            category_title: self.category_title.filter(|t| !t.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ParseOutcome {
    /// Parsed as returned.
    Strict(StructuredReply),
    /// Parsed after [`repair_escaped_separators`].
    Repaired(StructuredReply),
    Failed(ParseError),
}

impl ParseOutcome {
    pub fn into_result(self) -> Result<StructuredReply, ParseError> {
        match self {
            ParseOutcome::Strict(reply) | ParseOutcome::Repaired(reply) => Ok(reply),
            ParseOutcome::Failed(err) => Err(err),
        }
    }
}

/// The opening of the structured reply, sent as the assistant prefill.
/// Both values are JSON-escaped.
pub fn reply_prefill(user_query: &str, contextual_query: &str) -> String {
    format!(
        r#"{{ "userQuery": {}, "contextualQuery": {}, "categoryTitle":""#,
        serde_json::Value::from(user_query),
        serde_json::Value::from(contextual_query),
    )
}

/// Parse `text` as a [`StructuredReply`], repairing once on failure.
pub fn parse_structured_reply(text: &str) -> ParseOutcome {
    if text.trim().is_empty() {
        return ParseOutcome::Failed(ParseError::Empty);
    }

    let strict_err = match serde_json::from_str::<StructuredReply>(text) {
        Ok(reply) => return ParseOutcome::Strict(reply),
        Err(e) => e,
    };

    let repaired = repair_escaped_separators(text);
    if let Cow::Borrowed(_) = repaired {
        return ParseOutcome::Failed(ParseError::Malformed(strict_err.to_string()));
    }

    match serde_json::from_str::<StructuredReply>(&repaired) {
        Ok(reply) => ParseOutcome::Repaired(reply),
        Err(e) => ParseOutcome::Failed(ParseError::Malformed(e.to_string())),
    }
}

/// Matches `",\\n`: a field separator followed by a double-escaped newline
/// the model sometimes emits between object members.
static ESCAPED_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"",\\\\n"#).expect("separator pattern is valid"));

/// Rewrite `",\\n` to `",`. Returns the input unchanged (borrowed) when no
/// malformed separator is present.
pub fn repair_escaped_separators(text: &str) -> Cow<'_, str> {
    ESCAPED_SEPARATOR.replace_all(text, "\",")
}

static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s").expect("numbered item pattern is valid"));

/// Unescape literal `\n` sequences and reflow numbered lists.
pub fn normalize_response(text: &str) -> String {
    reflow_numbered_list(&unescape_newlines(text))
}

pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Ensure every numbered list item is followed by exactly one blank line
/// before the next non-blank line. Indented lines directly under an item
/// belong to it and stay attached. Trailing blank lines after a final item
/// are dropped. Applying this to its own output changes nothing.
pub fn reflow_numbered_list(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        out.push(line);
        i += 1;

        if NUMBERED_ITEM.is_match(line) {
            while i < lines.len() && is_item_continuation(lines[i]) {
                out.push(lines[i]);
                i += 1;
            }
            while i < lines.len() && lines[i].trim().is_empty() {
                i += 1;
            }
            if i < lines.len() {
                out.push("");
            }
        }
    }

    out.join("\n")
}

fn is_item_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) && !line.trim().is_empty() && !NUMBERED_ITEM.is_match(line)
}
