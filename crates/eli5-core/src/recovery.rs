//! Recovery strategy chain.
//!
//! Ordered, pure extraction functions applied to a body that failed strict
//! JSON parsing. The first strategy that yields a value wins.

use std::sync::OnceLock;

use eli5_protocols::{RecoveryOutcome, RecoveryStrategy};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// A single recovery attempt over the raw body.
pub type RecoveryFn = fn(&str) -> RecoveryOutcome;

/// Strategies in decreasing order of structural confidence.
pub const STRATEGIES: &[(RecoveryStrategy, RecoveryFn)] = &[
    (RecoveryStrategy::BraceExtraction, brace_extraction),
    (RecoveryStrategy::BracketExtraction, bracket_extraction),
    (RecoveryStrategy::PropertyReconstruction, property_reconstruction),
    (RecoveryStrategy::FieldScrape, field_scrape),
];

const EXPLANATION_KEY: &str = "\"explanation\":";

/// Run every strategy in order, stopping at the first success.
pub fn recover(raw: &str) -> RecoveryOutcome {
    recover_with(raw, |_| true)
}

/// Run every strategy in order, stopping at the first value `accept` takes.
///
/// A strategy whose value is rejected does not end the chain, so a later,
/// less structured strategy can still reach the field the caller needs.
pub fn recover_with(raw: &str, accept: impl Fn(&Value) -> bool) -> RecoveryOutcome {
    for (strategy, attempt) in STRATEGIES {
        match attempt(raw) {
            RecoveryOutcome::Recovered { data, .. } if accept(&data) => {
                debug!(%strategy, "Recovery strategy succeeded");
                return RecoveryOutcome::recovered(*strategy, data);
            }
            RecoveryOutcome::Recovered { .. } => {
                trace!(%strategy, "Recovered value rejected, trying next strategy");
            }
            RecoveryOutcome::Failed => trace!(%strategy, "Recovery strategy did not match"),
        }
    }
    debug!("All recovery strategies failed");
    RecoveryOutcome::Failed
}

/// Parse the slice between the first `{` and the last `}`.
pub fn brace_extraction(raw: &str) -> RecoveryOutcome {
    match parse_delimited(raw, '{', '}') {
        Some(value) => RecoveryOutcome::recovered(RecoveryStrategy::BraceExtraction, value),
        None => RecoveryOutcome::Failed,
    }
}

/// Parse the slice between the first `[` and the last `]`.
pub fn bracket_extraction(raw: &str) -> RecoveryOutcome {
    match parse_delimited(raw, '[', ']') {
        Some(value) => RecoveryOutcome::recovered(RecoveryStrategy::BracketExtraction, value),
        None => RecoveryOutcome::Failed,
    }
}

/// Locate the outermost JSON array in free-form model output.
pub fn extract_json_array(raw: &str) -> Option<Vec<Value>> {
    match parse_delimited(raw, '[', ']')? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

fn parse_delimited(raw: &str, open: char, close: char) -> Option<Value> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

fn property_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"("(?:[^"\\]|\\.)*")\s*:\s*("(?:[^"\\]|\\.)*"|-?\d+(?:\.\d+)?(?:[eE][+-]?\d+)?|true|false|null|[\[{])"#,
            )
            .ok()
        })
        .as_ref()
}

/// Rebuild an object from every `"key": value` pair found in the body.
pub fn property_reconstruction(raw: &str) -> RecoveryOutcome {
    let Some(pattern) = property_pattern() else {
        return RecoveryOutcome::Failed;
    };
    let mut object = Map::new();
    let mut pos = 0;

    while pos < raw.len() {
        let Some(caps) = pattern.captures_at(raw, pos) else {
            break;
        };
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            break;
        };
        let key = decode_string(key.as_str());

        match value.as_str() {
            "{" | "[" => {
                let start = value.start();
                match balanced_end(raw, start) {
                    Some(end) => {
                        let slice = &raw[start..=end];
                        let parsed = serde_json::from_str(slice)
                            .unwrap_or_else(|_| Value::String(slice.to_string()));
                        object.insert(key, parsed);
                        pos = end + 1;
                    }
                    None => {
                        object.insert(key, Value::String(raw[start..].trim_end().to_string()));
                        break;
                    }
                }
            }
            literal => {
                object.insert(key, parse_literal(literal));
                pos = value.end();
            }
        }
    }

    if object.is_empty() {
        return RecoveryOutcome::Failed;
    }
    RecoveryOutcome::recovered(RecoveryStrategy::PropertyReconstruction, Value::Object(object))
}

/// Scrape the string value following the literal `"explanation":`.
pub fn field_scrape(raw: &str) -> RecoveryOutcome {
    let Some(idx) = raw.find(EXPLANATION_KEY) else {
        return RecoveryOutcome::Failed;
    };
    let rest = raw[idx + EXPLANATION_KEY.len()..].trim_start();
    let Some(quoted) = leading_string_literal(rest) else {
        return RecoveryOutcome::Failed;
    };

    let mut object = Map::new();
    object.insert(
        "explanation".to_string(),
        Value::String(decode_string(quoted)),
    );
    RecoveryOutcome::recovered(RecoveryStrategy::FieldScrape, Value::Object(object))
}

/// The quoted literal at the start of `s`, quotes included.
fn leading_string_literal(s: &str) -> Option<&str> {
    if !s.starts_with('"') {
        return None;
    }
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(&s[..=i]),
            _ => {}
        }
    }
    None
}

/// Index of the bracket closing the one at `start`, skipping string contents.
fn balanced_end(raw: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in raw[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + i);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_literal(literal: &str) -> Value {
    if literal.starts_with('"') {
        return Value::String(decode_string(literal));
    }
    serde_json::from_str(literal).unwrap_or_else(|_| Value::String(literal.to_string()))
}

/// Unescape a quoted JSON string literal, degrading to a lenient unquote.
fn decode_string(quoted: &str) -> String {
    serde_json::from_str::<String>(quoted).unwrap_or_else(|_| {
        quoted
            .trim_matches('"')
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    })
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
