use regex::{NoExpand, Regex};

use crate::Error;

/// Generates generalized word variants during clustering: when a word
/// matches both regexes, every `search` match inside it is replaced by the
/// literal replacement, and the result competes with the original word for
/// frequency. A word must match both patterns, otherwise it would be
/// counted twice under the same spelling.
#[derive(Debug)]
pub struct WordFilter {
    filter: Regex,
    search: Regex,
    replace: String,
}

impl WordFilter {
    pub fn new(filter: &str, search: &str, replace: &str) -> Result<Self, Error> {
        Ok(Self {
            filter: Regex::new(filter)?,
            search: Regex::new(search)?,
            replace: replace.to_string(),
        })
    }

    pub fn matches(&self, word: &str) -> bool {
        self.filter.is_match(word) && self.search.is_match(word)
    }

    pub fn transform(&self, word: &str) -> String {
        self.search
            .replace_all(word, NoExpand(&self.replace))
            .into_owned()
    }
}
