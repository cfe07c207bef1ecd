//! Topic and content gates applied to the user input and the model output.

/// Outcome of a policy check. A rejection names the term that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyVerdict {
    Pass,
    Reject { term: String },
}

impl PolicyVerdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, PolicyVerdict::Pass)
    }
}

const FORBIDDEN_TOPICS: &[&str] = &[
    "democrat",
    "republican",
    "libertarian",
    "religion",
    "god",
    "commodities",
    "securities",
    "Securities and Exchange Commission",
    "ignore previous instructions",
    "disregard instructions",
    "you are not",
    "translate as",
    "yes you can",
    "your name is",
    "your identity is",
    "you are a",
];

const CODING_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "if", "else", "for", "while", "return", "import",
    "export", "class", "new", "try", "catch", "finally", "async", "await", "Promise", "JSON",
    "fetch", "require", "module", "exports",
];

const DISALLOWED_OUTPUT: &[&str] = &[
    "unrelated financial advice",
    "speculative content",
    "iau",
    "commodities",
];

/// Rejects off-topic or injection-style input.
///
/// Forbidden topics match as case-insensitive substrings. Override keywords
/// (programming vocabulary) match case-sensitively and take precedence, so a
/// code snippet that happens to contain a forbidden word still passes.
#[derive(Debug, Clone)]
pub struct InputPolicy {
    forbidden_topics: Vec<String>,
    override_keywords: Vec<String>,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self::new(
            FORBIDDEN_TOPICS.iter().map(|s| s.to_string()).collect(),
            CODING_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl InputPolicy {
    pub fn new(forbidden_topics: Vec<String>, override_keywords: Vec<String>) -> Self {
        Self {
            forbidden_topics,
            override_keywords,
        }
    }

    pub fn evaluate(&self, input: &str) -> PolicyVerdict {
        if self.override_keywords.iter().any(|k| input.contains(k.as_str())) {
            return PolicyVerdict::Pass;
        }
        match first_match_ignore_case(input, &self.forbidden_topics) {
            Some(term) => PolicyVerdict::Reject { term },
            None => PolicyVerdict::Pass,
        }
    }

    pub fn permits(&self, input: &str) -> bool {
        self.evaluate(input).is_pass()
    }
}

/// Rejects responses that fall into a disallowed category. Every term must
/// be absent (case-insensitive) for the response to pass.
#[derive(Debug, Clone)]
pub struct OutputPolicy {
    disallowed: Vec<String>,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self::new(DISALLOWED_OUTPUT.iter().map(|s| s.to_string()).collect())
    }
}

impl OutputPolicy {
    pub fn new(disallowed: Vec<String>) -> Self {
        Self { disallowed }
    }

    pub fn evaluate(&self, response: &str) -> PolicyVerdict {
        match first_match_ignore_case(response, &self.disallowed) {
            Some(term) => PolicyVerdict::Reject { term },
            None => PolicyVerdict::Pass,
        }
    }

    pub fn permits(&self, response: &str) -> bool {
        self.evaluate(response).is_pass()
    }
}

fn first_match_ignore_case(text: &str, terms: &[String]) -> Option<String> {
    let haystack = text.to_lowercase();
    terms
        .iter()
        .find(|term| haystack.contains(&term.to_lowercase()))
        .cloned()
}
