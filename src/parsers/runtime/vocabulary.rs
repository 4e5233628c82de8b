//! Keyword vocabularies laid out as contiguous symbol ranges

use std::ops::RangeInclusive;

use rustc_hash::FxHashMap;

use super::token::SymbolId;

/// A block of keywords sharing one classification. The keyword at index `i`
/// has symbol `first + i`.
#[derive(Debug)]
pub struct KeywordGroup {
    pub first: SymbolId,
    pub words: &'static [&'static str],
}

impl KeywordGroup {
    pub const fn new(first: SymbolId, words: &'static [&'static str]) -> Self {
        Self { first, words }
    }

    pub const fn last(&self) -> SymbolId {
        self.first + self.words.len() as SymbolId - 1
    }

    pub const fn range(&self) -> RangeInclusive<SymbolId> {
        self.first..=self.last()
    }

    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.range().contains(&symbol)
    }

    pub fn word(&self, symbol: SymbolId) -> Option<&'static str> {
        if self.contains(symbol) {
            Some(self.words[(symbol - self.first) as usize])
        } else {
            None
        }
    }
}

/// Case-insensitive keyword lookup over a set of groups.
pub struct Vocabulary {
    groups: Vec<&'static KeywordGroup>,
    index: FxHashMap<&'static str, SymbolId>,
}

impl Vocabulary {
    pub fn new(groups: &[&'static KeywordGroup]) -> Self {
        let mut index = FxHashMap::default();
        for group in groups {
            for (i, word) in group.words.iter().enumerate() {
                index.entry(*word).or_insert(group.first + i as SymbolId);
            }
        }
        Self {
            groups: groups.to_vec(),
            index,
        }
    }

    /// Symbol of `word` when it is a keyword of this vocabulary.
    pub fn keyword(&self, word: &str) -> Option<SymbolId> {
        if word.bytes().all(|b| !b.is_ascii_lowercase()) {
            return self.index.get(word).copied();
        }
        self.index.get(word.to_ascii_uppercase().as_str()).copied()
    }

    /// Canonical (upper-case) spelling of a keyword symbol.
    pub fn word(&self, symbol: SymbolId) -> Option<&'static str> {
        self.groups.iter().find_map(|g| g.word(symbol))
    }

    pub fn is_keyword(&self, symbol: SymbolId) -> bool {
        self.groups.iter().any(|g| g.contains(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static GROUP_A: KeywordGroup = KeywordGroup::new(100, &["FROM", "SELECT", "WHERE"]);
    static GROUP_B: KeywordGroup = KeywordGroup::new(200, &["COUNT", "SUM"]);

    #[test]
    fn test_group_ranges_are_contiguous() {
        assert_eq!(GROUP_A.last(), 102);
        assert_eq!(GROUP_A.word(101), Some("SELECT"));
        assert_eq!(GROUP_A.word(103), None);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let vocabulary = Vocabulary::new(&[&GROUP_A, &GROUP_B]);
        assert_eq!(vocabulary.keyword("select"), Some(101));
        assert_eq!(vocabulary.keyword("Sum"), Some(201));
        assert_eq!(vocabulary.keyword("owner"), None);
        assert_eq!(vocabulary.word(200), Some("COUNT"));
    }
}
