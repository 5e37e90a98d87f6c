//! Deterministic cleaning of raw model output into a single candidate fact.

use std::sync::LazyLock;

use regex::Regex;

static NUMBERED_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s*").unwrap());
static BULLET_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*\u{2022}]\s*").unwrap());

/// Quote pairs stripped when they wrap the whole candidate.
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('\u{201c}', '\u{201d}'),
    ('\u{2018}', '\u{2019}'),
];

/// Reduce raw model output to one cleaned candidate fact.
///
/// Pure function of its input: takes the first non-empty line, strips leading
/// list markers (`1.`, `2)`, `-`, `*`, `•`) and surrounding quotation marks,
/// and collapses whitespace runs to single spaces. Returns an empty string
/// when nothing usable remains.
pub fn clean_fact(raw: &str) -> String {
    let line = match raw.lines().find(|line| !line.trim().is_empty()) {
        Some(line) => line,
        None => return String::new(),
    };

    let stripped = NUMBERED_PREFIX_RE.replace(line, "");
    let stripped = BULLET_PREFIX_RE.replace(&stripped, "");
    let unquoted = strip_surrounding_quotes(stripped.trim());

    unquoted.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip matched quote pairs that wrap the entire candidate.
fn strip_surrounding_quotes(text: &str) -> &str {
    let mut current = text;
    loop {
        let mut chars = current.chars();
        let (first, last) = match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) => (first, last),
            _ => return current,
        };
        let wrapped = QUOTE_PAIRS
            .iter()
            .any(|&(open, close)| first == open && last == close);
        if !wrapped {
            return current;
        }
        current = current[first.len_utf8()..current.len() - last.len_utf8()].trim();
    }
}
