use ahash::AHashSet;

use crate::sketch::Sketch;
use crate::table::{EntryId, FreqTable};
use crate::wordfilter::WordFilter;

/// Vocabulary distribution gathered while pruning: how much of the
/// vocabulary sits in the long infrequent tail.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocabStats {
    pub total_words: u64,
    pub ones: u64,
    pub twos: u64,
    pub fives: u64,
    pub tens: u64,
    pub twenties: u64,
}

/// Accumulates the vocabulary over one pass. A word's count is the number
/// of lines it occurs in, not its raw token count, so repeats within a line
/// are rolled back.
pub struct VocabularyBuilder<'a> {
    table: FreqTable,
    word_filter: Option<&'a WordFilter>,
    sketch: Option<(&'a Sketch, u64)>,
    seen: AHashSet<EntryId>,
}

impl<'a> VocabularyBuilder<'a> {
    pub fn new(
        table_size: usize,
        seed: u64,
        word_filter: Option<&'a WordFilter>,
        sketch: Option<(&'a Sketch, u64)>,
    ) -> Self {
        Self {
            table: FreqTable::new(table_size, seed),
            word_filter,
            sketch,
            seen: AHashSet::new(),
        }
    }

    pub fn observe_line(&mut self, words: &[String]) {
        self.seen.clear();
        for word in words {
            self.observe_word(word);
            if let Some(wf) = self.word_filter {
                if wf.matches(word) {
                    let variant = wf.transform(word);
                    self.observe_word(&variant);
                }
            }
        }
    }

    fn observe_word(&mut self, word: &str) {
        if let Some((sketch, support)) = self.sketch {
            if sketch.count(word) < support {
                return;
            }
        }
        let id = self.table.upsert(word);
        if !self.seen.insert(id) {
            self.table.get_mut(id).count -= 1;
        }
    }

    /// Prunes words under `support` and renumbers the survivors densely
    /// 1..F; the dense ids index the dependency matrix later.
    pub fn finish(mut self, support: u64) -> (Vocabulary, VocabStats) {
        let mut stats = VocabStats {
            total_words: self.table.len() as u64,
            ..VocabStats::default()
        };
        let ids: Vec<EntryId> = self.table.ids().collect();
        let mut frequent = 0u64;
        for id in ids {
            let count = self.table.get(id).count;
            if count == 1 {
                stats.ones += 1;
            }
            if count <= 2 {
                stats.twos += 1;
            }
            if count <= 5 {
                stats.fives += 1;
            }
            if count <= 10 {
                stats.tens += 1;
            }
            if count <= 20 {
                stats.twenties += 1;
            }
            if count < support {
                self.table.unlink(id);
            } else {
                frequent += 1;
                self.table.get_mut(id).number = frequent;
            }
        }
        (
            Vocabulary {
                table: self.table,
                frequent,
            },
            stats,
        )
    }
}

/// The frequent-word set after pruning. Lookups hit only frequent words;
/// everything else was unlinked.
#[derive(Debug)]
pub struct Vocabulary {
    table: FreqTable,
    frequent: u64,
}

impl Vocabulary {
    pub fn lookup(&mut self, word: &str) -> Option<EntryId> {
        self.table.lookup(word)
    }

    pub fn word(&self, id: EntryId) -> &str {
        self.table.get(id).key()
    }

    /// Dense frequent-word id in 1..=F.
    pub fn number(&self, id: EntryId) -> u64 {
        self.table.get(id).number
    }

    /// Number of lines the word occurred in.
    pub fn line_count(&self, id: EntryId) -> u64 {
        self.table.get(id).count
    }

    pub fn frequent_count(&self) -> u64 {
        self.frequent
    }
}
