use crate::candidates::{Candidate, CandidateSet, GapRange};
use crate::table::{str_hash, EntryId};
use crate::vocab::Vocabulary;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Root,
    Word(EntryId),
    Wildcard(GapRange),
}

/// One segment of the shared prefix structure. Nodes live in the trie's
/// arena and refer to each other by index, so dropping the trie is a flat
/// deallocation whatever the tree's depth or width.
#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    /// Ordered by descending comparison hash; the wildcard sentinel is the
    /// largest value, so wildcard siblings group at the front and are
    /// visited first.
    children: Vec<NodeId>,
    segment: Segment,
    hash: u64,
    terminal: Option<usize>,
}

enum FirstWildcard {
    Gap(usize),
    Tail,
}

/// Shared prefix trie over the surviving candidates' segment sequences,
/// used to fold the supports of more specific candidates into their
/// generalizations.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
    hash_space: u64,
    wildcard_hash: u64,
    seed: u64,
}

impl PrefixTrie {
    /// Indexes every retained candidate and records its terminal node.
    /// The word hash space is 3F so word hashes stay below the wildcard
    /// sentinel.
    pub fn build(set: &mut CandidateSet, vocab: &Vocabulary, seed: u64) -> Self {
        let hash_space = (vocab.frequent_count() * 3).max(1);
        let root = Node {
            parent: None,
            children: Vec::new(),
            segment: Segment::Root,
            hash: hash_space + 1,
            terminal: None,
        };
        let mut trie = Self {
            nodes: vec![root],
            hash_space,
            wildcard_hash: hash_space,
            seed,
        };
        for id in set.retained_ids() {
            let Some((words, gaps, tail)) = set
                .get(id)
                .map(|c| (c.words.clone(), c.gaps.clone(), c.tail))
            else {
                continue;
            };
            let terminal = trie.insert(&words, &gaps, tail, id, vocab);
            if let Some(c) = set.get_mut(id) {
                c.terminal = Some(terminal);
            }
        }
        trie
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn insert(
        &mut self,
        words: &[EntryId],
        gaps: &[GapRange],
        tail: GapRange,
        candidate: usize,
        vocab: &Vocabulary,
    ) -> NodeId {
        let mut cursor = 0;
        for (i, &word) in words.iter().enumerate() {
            if !gaps[i].is_absent() {
                cursor = self.child_wildcard(cursor, gaps[i]);
            }
            cursor = self.child_word(cursor, word, vocab);
        }
        if !tail.is_absent() {
            cursor = self.child_wildcard(cursor, tail);
        }
        self.nodes[cursor].terminal = Some(candidate);
        cursor
    }

    fn child_wildcard(&mut self, parent: NodeId, range: GapRange) -> NodeId {
        for &child in &self.nodes[parent].children {
            if self.nodes[child].hash != self.wildcard_hash {
                break;
            }
            if matches!(self.nodes[child].segment, Segment::Wildcard(r) if r == range) {
                return child;
            }
        }
        self.new_node(parent, 0, Segment::Wildcard(range), self.wildcard_hash)
    }

    fn child_word(&mut self, parent: NodeId, word: EntryId, vocab: &Vocabulary) -> NodeId {
        let hash = str_hash(vocab.word(word), self.hash_space, self.seed);
        let mut insert_at = self.nodes[parent].children.len();
        for (pos, &child) in self.nodes[parent].children.iter().enumerate() {
            let child_hash = self.nodes[child].hash;
            if child_hash > hash {
                continue;
            }
            if child_hash == hash {
                if matches!(self.nodes[child].segment, Segment::Word(w) if w == word) {
                    return child;
                }
                continue;
            }
            insert_at = pos;
            break;
        }
        self.new_node(parent, insert_at, Segment::Word(word), hash)
    }

    fn new_node(&mut self, parent: NodeId, position: usize, segment: Segment, hash: u64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            segment,
            hash,
            terminal: None,
        });
        self.nodes[parent].children.insert(position, id);
        id
    }

    /// Recomputes every retained candidate's effective support as its raw
    /// count plus the raw counts of all more specific candidates reachable
    /// under its wildcard windows. Raw counts are snapshotted first, so the
    /// result is independent of processing order and a repeated pass yields
    /// the same supports.
    pub fn aggregate_supports(&self, set: &mut CandidateSet) {
        let raw: Vec<u64> = set
            .candidates
            .iter()
            .map(|c| c.as_ref().map_or(0, |c| c.count))
            .collect();
        let mut totals = Vec::new();
        for id in set.retained_ids() {
            let Some(candidate) = set.get(id) else { continue };
            let Some(terminal) = candidate.terminal else {
                continue;
            };
            let Some(first) = first_wildcard(candidate) else {
                continue;
            };
            let start = self.common_ancestor(candidate, terminal, &first);
            let mut gained = 0u64;
            match first {
                FirstWildcard::Gap(position) => {
                    self.descend(start, candidate, id, position, 0, 0, &raw, &mut gained)
                }
                FirstWildcard::Tail => {
                    self.descend_tail(start, candidate, id, 0, 0, &raw, &mut gained)
                }
            }
            totals.push((id, raw[id] + gained));
        }
        for (id, total) in totals {
            let Some(candidate) = set.get_mut(id) else { continue };
            candidate.support = total;
            let entry = candidate.entry;
            set.table.get_mut(entry).count = total;
        }
    }

    fn common_ancestor(
        &self,
        candidate: &Candidate,
        terminal: NodeId,
        first: &FirstWildcard,
    ) -> NodeId {
        let depth = match *first {
            FirstWildcard::Tail => 1,
            FirstWildcard::Gap(position) => {
                let mut d = 0;
                for i in position..candidate.words.len() {
                    d += 1;
                    if !candidate.gaps[i].is_absent() {
                        d += 1;
                    }
                }
                if !candidate.tail.is_absent() {
                    d += 1;
                }
                d
            }
        };
        let mut node = terminal;
        for _ in 0..depth {
            if let Some(parent) = self.nodes[node].parent {
                node = parent;
            }
        }
        node
    }

    /// A step down the trie consumes one token (a constant) or a token
    /// range (a wildcard).
    fn step(&self, node: NodeId) -> (i64, i64) {
        match self.nodes[node].segment {
            Segment::Wildcard(r) => (r.min as i64, r.max as i64),
            _ => (1, 1),
        }
    }

    fn take_terminal(&self, node: NodeId, this: usize, raw: &[u64], gained: &mut u64) {
        if let Some(other) = self.nodes[node].terminal {
            if other != this {
                *gained += raw[other];
            }
        }
    }

    /// Hunts for the candidate's constant at `position` below `node`,
    /// carrying the cumulative (min, max) gap consumed on the path so far.
    fn descend(
        &self,
        node: NodeId,
        candidate: &Candidate,
        this: usize,
        position: usize,
        min_sum: i64,
        max_sum: i64,
        raw: &[u64],
        gained: &mut u64,
    ) {
        let window = candidate.gaps[position];
        for &child in &self.nodes[node].children {
            let (step_min, step_max) = self.step(child);
            let min = min_sum + step_min;
            let max = max_sum + step_max;
            if min - 1 < window.min as i64 {
                // Not enough gap consumed yet to reach this position.
                self.descend(child, candidate, this, position, min, max, raw, gained);
                continue;
            }
            if max - 1 > window.max as i64 {
                // Overshot the window; nothing below can line up.
                continue;
            }
            let matched = matches!(
                self.nodes[child].segment,
                Segment::Word(w) if w == candidate.words[position]
            );
            if matched {
                if position + 1 < candidate.words.len() {
                    self.descend(child, candidate, this, position + 1, 0, 0, raw, gained);
                } else if candidate.tail.is_absent() {
                    self.take_terminal(child, this, raw, gained);
                } else {
                    if candidate.tail.min == 0 {
                        self.take_terminal(child, this, raw, gained);
                    }
                    self.descend_tail(child, candidate, this, 0, 0, raw, gained);
                }
            } else {
                self.descend(child, candidate, this, position, min, max, raw, gained);
            }
        }
    }

    /// Same window logic against the trailing range only; no further
    /// constant needs to match, so every in-window terminal aggregates.
    fn descend_tail(
        &self,
        node: NodeId,
        candidate: &Candidate,
        this: usize,
        min_sum: i64,
        max_sum: i64,
        raw: &[u64],
        gained: &mut u64,
    ) {
        let window = candidate.tail;
        for &child in &self.nodes[node].children {
            let (step_min, step_max) = self.step(child);
            let min = min_sum + step_min;
            let max = max_sum + step_max;
            if min < window.min as i64 {
                self.descend_tail(child, candidate, this, min, max, raw, gained);
                continue;
            }
            if max > window.max as i64 {
                continue;
            }
            self.take_terminal(child, this, raw, gained);
            self.descend_tail(child, candidate, this, min, max, raw, gained);
        }
    }
}

fn first_wildcard(candidate: &Candidate) -> Option<FirstWildcard> {
    (0..candidate.words.len())
        .find(|&i| !candidate.gaps[i].is_absent())
        .map(FirstWildcard::Gap)
        .or_else(|| (!candidate.tail.is_absent()).then_some(FirstWildcard::Tail))
}
