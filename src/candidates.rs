use ahash::AHashSet;

use crate::depmatrix::DepMatrix;
use crate::join::JoinedCandidate;
use crate::sketch::Sketch;
use crate::table::{EntryId, FreqTable};
use crate::vocab::Vocabulary;
use crate::wordfilter::WordFilter;

/// Separator used to build candidate keys from constant words. Never part
/// of a word, since words come from splitting single lines.
pub const KEY_SEPARATOR: char = '\n';

/// Inclusive range of wildcard tokens observed at one gap position.
/// `max == 0` marks an absent wildcard: the position never held a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapRange {
    pub min: u32,
    pub max: u32,
}

impl GapRange {
    pub fn point(n: u32) -> Self {
        Self { min: n, max: n }
    }

    /// Ranges only widen; folding in an observation never narrows them.
    pub fn widen(&mut self, n: u32) {
        if n < self.min {
            self.min = n;
        } else if n > self.max {
            self.max = n;
        }
    }

    pub fn cover(&mut self, other: GapRange) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
    }

    pub fn is_absent(&self) -> bool {
        self.max == 0
    }
}

/// Which cluster object a candidate-table entry backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterRef {
    Candidate(usize),
    Joined(usize),
}

/// A generalized line pattern: ordered constants with a wildcard range
/// before each one and a trailing tail range.
#[derive(Debug)]
pub struct Candidate {
    /// Vocabulary entries, in line order.
    pub words: Vec<EntryId>,
    /// Gap before `words[i]`.
    pub gaps: Vec<GapRange>,
    pub tail: GapRange,
    /// Raw occurrence count; fixed once building ends.
    pub count: u64,
    /// Effective support: the raw count, raised by aggregation.
    pub support: u64,
    pub joined: bool,
    /// Backing entry in the candidate table.
    pub entry: EntryId,
    /// Terminal trie node, set while the aggregator indexes candidates.
    pub terminal: Option<usize>,
}

impl Candidate {
    fn new(shape: &LineShape, entry: EntryId) -> Self {
        Self {
            words: shape.words.clone(),
            gaps: shape.gaps.iter().map(|&g| GapRange::point(g)).collect(),
            tail: GapRange::point(shape.tail),
            count: 0,
            support: 0,
            joined: false,
            entry,
            terminal: None,
        }
    }

    pub fn constants(&self) -> usize {
        self.words.len()
    }

    fn absorb(&mut self, shape: &LineShape) {
        self.count += 1;
        for (range, &gap) in self.gaps.iter_mut().zip(&shape.gaps) {
            range.widen(gap);
        }
        self.tail.widen(shape.tail);
    }
}

/// One line reduced to its pattern shape: the candidate key, the frequent
/// words in order, and the wildcard gap observed at each position.
#[derive(Debug)]
pub struct LineShape {
    pub key: String,
    pub words: Vec<EntryId>,
    pub gaps: Vec<u32>,
    pub tail: u32,
}

/// Classifies a tokenized line against the vocabulary. Returns None when no
/// token is a frequent word: such a line cannot anchor any candidate.
/// A token that is not frequent itself may still contribute through its
/// word-filter variant; the literal form wins when both are frequent.
pub fn line_shape(
    tokens: &[String],
    vocab: &mut Vocabulary,
    word_filter: Option<&WordFilter>,
) -> Option<LineShape> {
    let mut key = String::new();
    let mut words = Vec::new();
    let mut gaps = Vec::new();
    let mut pending = 0u32;
    for token in tokens {
        let mut id = vocab.lookup(token);
        if id.is_none() {
            if let Some(wf) = word_filter {
                if wf.matches(token) {
                    id = vocab.lookup(&wf.transform(token));
                }
            }
        }
        match id {
            Some(id) => {
                key.push_str(vocab.word(id));
                key.push(KEY_SEPARATOR);
                words.push(id);
                gaps.push(pending);
                pending = 0;
            }
            None => pending += 1,
        }
    }
    if words.is_empty() {
        return None;
    }
    Some(LineShape {
        key,
        words,
        gaps,
        tail: pending,
    })
}

/// The candidate universe: the dedup table plus the cluster objects built
/// from it, including joined clusters produced later.
#[derive(Debug)]
pub struct CandidateSet {
    pub table: FreqTable,
    pub candidates: Vec<Option<Candidate>>,
    pub joined: Vec<JoinedCandidate>,
}

impl CandidateSet {
    pub fn new(table_size: usize, seed: u64) -> Self {
        Self {
            table: FreqTable::new(table_size, seed),
            candidates: Vec::new(),
            joined: Vec::new(),
        }
    }

    pub fn get(&self, id: usize) -> Option<&Candidate> {
        self.candidates.get(id).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: usize) -> Option<&mut Candidate> {
        self.candidates.get_mut(id).and_then(Option::as_mut)
    }

    pub fn retained(&self) -> impl Iterator<Item = (usize, &Candidate)> {
        self.candidates
            .iter()
            .enumerate()
            .filter_map(|(id, c)| c.as_ref().map(|c| (id, c)))
    }

    pub fn retained_ids(&self) -> Vec<usize> {
        self.retained().map(|(id, _)| id).collect()
    }

    /// Drops candidates under the support threshold, freeing their range
    /// storage. Their table entries stay behind so a line's pattern key
    /// still resolves to a count during outlier detection. Survivors get
    /// their effective support initialized to the raw count.
    pub fn filter_by_support(&mut self, support: u64) -> u64 {
        let mut kept = 0;
        for slot in self.candidates.iter_mut() {
            let dropped_entry = match slot.as_mut() {
                None => continue,
                Some(candidate) if candidate.count < support => Some(candidate.entry),
                Some(candidate) => {
                    candidate.support = candidate.count;
                    kept += 1;
                    None
                }
            };
            if let Some(entry) = dropped_entry {
                self.table.get_mut(entry).cluster = None;
                *slot = None;
            }
        }
        kept
    }

    /// Effective support recorded for a pattern key, if the key was ever
    /// observed.
    pub fn support_for_key(&mut self, key: &str) -> Option<u64> {
        let id = self.table.lookup(key)?;
        Some(self.table.get(id).count)
    }
}

/// Builds cluster candidates over one pass. Optional capabilities are
/// wired in at construction: a word-filter hook, a dependency-matrix sink,
/// and a sketch prefilter. One loop serves every combination.
pub struct CandidateBuilder<'a> {
    set: CandidateSet,
    vocab: &'a mut Vocabulary,
    word_filter: Option<&'a WordFilter>,
    sketch: Option<(&'a Sketch, u64)>,
    deps: Option<&'a mut DepMatrix>,
    distinct: AHashSet<u64>,
}

impl<'a> CandidateBuilder<'a> {
    pub fn new(
        vocab: &'a mut Vocabulary,
        table_size: usize,
        seed: u64,
        word_filter: Option<&'a WordFilter>,
        sketch: Option<(&'a Sketch, u64)>,
        deps: Option<&'a mut DepMatrix>,
    ) -> Self {
        Self {
            set: CandidateSet::new(table_size, seed),
            vocab,
            word_filter,
            sketch,
            deps,
            distinct: AHashSet::new(),
        }
    }

    pub fn observe_line(&mut self, tokens: &[String]) {
        let Some(shape) = line_shape(tokens, self.vocab, self.word_filter) else {
            return;
        };
        if let Some(deps) = self.deps.as_deref_mut() {
            self.distinct.clear();
            let mut ids = Vec::with_capacity(shape.words.len());
            for &word in &shape.words {
                let number = self.vocab.number(word);
                if self.distinct.insert(number) {
                    ids.push(number);
                }
            }
            deps.record_line(&ids);
        }
        if let Some((sketch, support)) = self.sketch {
            if sketch.count(&shape.key) < support {
                return;
            }
        }
        let entry = self.set.table.upsert(&shape.key);
        if self.set.table.get(entry).count == 1 {
            let id = self.set.candidates.len();
            self.set.candidates.push(Some(Candidate::new(&shape, entry)));
            self.set.table.get_mut(entry).cluster = Some(ClusterRef::Candidate(id));
        }
        if let Some(ClusterRef::Candidate(id)) = self.set.table.get(entry).cluster {
            if let Some(candidate) = self.set.candidates[id].as_mut() {
                candidate.absorb(&shape);
            }
        }
    }

    /// Distinct candidates seen so far.
    pub fn found(&self) -> u64 {
        self.set.candidates.len() as u64
    }

    pub fn set(&self) -> &CandidateSet {
        &self.set
    }

    pub fn finish(self) -> CandidateSet {
        self.set
    }
}
