//! Fact records and the append-only accepted set.

use serde::Serialize;

/// One accepted, cleaned unit of generated text about the keyword.
///
/// Immutable once accepted: the collector never mutates or removes records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    /// 1-based, contiguous position in the accepted set.
    pub sequence_number: u32,
    /// Cleaned fact text.
    pub text: String,
    /// The run's keyword, repeated per record for the tabular export.
    pub keyword: String,
    /// Number of characters in `text` (Unicode scalar values, not bytes).
    pub character_count: usize,
}

/// Ordered, append-only collection of accepted facts.
///
/// Maintains a case-folded index so duplicate checks stay O(1) as the set
/// grows toward the target count.
#[derive(Debug, Default)]
pub struct AcceptedSet {
    facts: Vec<Fact>,
    seen: std::collections::HashSet<String>,
}

impl AcceptedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Whether `text` case-insensitively equals any accepted fact.
    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(&fold(text))
    }

    /// Append a new fact, assigning the next contiguous sequence number.
    ///
    /// Callers must check [`AcceptedSet::contains`] first; accepting a
    /// duplicate would break the uniqueness invariant.
    pub fn accept(&mut self, text: String, keyword: &str) -> &Fact {
        debug_assert!(!self.contains(&text));
        self.seen.insert(fold(&text));
        let character_count = text.chars().count();
        self.facts.push(Fact {
            sequence_number: self.facts.len() as u32 + 1,
            text,
            keyword: keyword.to_string(),
            character_count,
        });
        self.facts.last().expect("just pushed")
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Most recent `limit` fact texts, oldest first.
    pub fn recent_texts(&self, limit: usize) -> Vec<String> {
        let start = self.facts.len().saturating_sub(limit);
        self.facts[start..].iter().map(|f| f.text.clone()).collect()
    }

    pub fn into_facts(self) -> Vec<Fact> {
        self.facts
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_contiguous_from_one() {
        let mut set = AcceptedSet::new();
        set.accept("First".to_string(), "kw");
        set.accept("Second".to_string(), "kw");
        set.accept("Third".to_string(), "kw");

        let numbers: Vec<u32> = set.facts().iter().map(|f| f.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn contains_is_case_insensitive() {
        let mut set = AcceptedSet::new();
        set.accept("Paris is the capital of France".to_string(), "paris");

        assert!(set.contains("PARIS IS THE CAPITAL OF FRANCE"));
        assert!(set.contains("paris is the capital of france"));
        assert!(!set.contains("Paris is in Europe"));
    }

    #[test]
    fn character_count_uses_chars_not_bytes() {
        let mut set = AcceptedSet::new();
        let fact = set.accept("caf\u{e9} \u{2014} 5".to_string(), "kw");
        assert_eq!(fact.character_count, 8);
        assert!(fact.text.len() > fact.character_count);
    }

    #[test]
    fn recent_texts_returns_tail_oldest_first() {
        let mut set = AcceptedSet::new();
        for i in 1..=5 {
            set.accept(format!("fact {i}"), "kw");
        }
        assert_eq!(set.recent_texts(2), vec!["fact 4", "fact 5"]);
        assert_eq!(set.recent_texts(10).len(), 5);
    }
}
