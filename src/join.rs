use ahash::AHashSet;

use crate::candidates::{Candidate, CandidateSet, ClusterRef, GapRange, KEY_SEPARATOR};
use crate::config::WeightFunc;
use crate::depmatrix::DepMatrix;
use crate::table::EntryId;
use crate::vocab::Vocabulary;

pub const DEFAULT_TOKEN: &str = "token";

/// A cluster produced by joining candidates that differ only in low-weight
/// words. Marked positions carry a token slot listing the original words
/// seen there across the merged candidates.
#[derive(Debug)]
pub struct JoinedCandidate {
    /// First contributor's words; unmarked positions are identical across
    /// all contributors.
    pub words: Vec<EntryId>,
    /// `Some` marks a token slot; alternatives in contribution order,
    /// deduplicated by vocabulary entry.
    pub slots: Vec<Option<Vec<EntryId>>>,
    pub gaps: Vec<GapRange>,
    pub tail: GapRange,
    pub support: u64,
    pub entry: EntryId,
}

#[derive(Debug)]
pub struct JoinOutcome {
    pub token: String,
    pub joined_input: u64,
    pub joined_output: u64,
}

/// Picks the token placeholder. Probes deterministically until the literal
/// does not collide with any frequent word.
pub fn choose_token(vocab: &mut Vocabulary) -> String {
    if vocab.lookup(DEFAULT_TOKEN).is_none() {
        return DEFAULT_TOKEN.to_string();
    }
    let mut n = 0u64;
    loop {
        let probe = format!("{DEFAULT_TOKEN}{n}");
        if vocab.lookup(&probe).is_none() {
            return probe;
        }
        n += 1;
    }
}

/// Weight of the word at `position` within its candidate, in [0, 1].
/// `distinct` is the candidate's deduplicated word-id list, shared across
/// positions of one candidate.
pub fn word_weight(
    candidate: &Candidate,
    position: usize,
    distinct: &[u64],
    func: WeightFunc,
    deps: &DepMatrix,
    vocab: &Vocabulary,
) -> f64 {
    let target = vocab.number(candidate.words[position]);
    match func {
        WeightFunc::Mean => {
            let sum: f64 = candidate
                .words
                .iter()
                .map(|&w| deps.dependency(vocab.number(w), target))
                .sum();
            sum / candidate.words.len() as f64
        }
        WeightFunc::DistinctMean => {
            // A candidate built from one distinct word trivially has
            // maximal self-weight.
            if distinct.len() == 1 {
                return 1.0;
            }
            let sum: f64 = distinct.iter().map(|&u| deps.dependency(u, target)).sum();
            (sum - 1.0) / (distinct.len() - 1) as f64
        }
    }
}

pub fn distinct_numbers(candidate: &Candidate, vocab: &Vocabulary) -> Vec<u64> {
    let mut seen = AHashSet::new();
    candidate
        .words
        .iter()
        .map(|&w| vocab.number(w))
        .filter(|&n| seen.insert(n))
        .collect()
}

fn mark_low_weight(
    candidate: &Candidate,
    threshold: f64,
    func: WeightFunc,
    deps: &DepMatrix,
    vocab: &Vocabulary,
) -> Option<Vec<bool>> {
    let distinct = distinct_numbers(candidate, vocab);
    let mut marks = vec![false; candidate.words.len()];
    let mut any = false;
    for (i, mark) in marks.iter_mut().enumerate() {
        if word_weight(candidate, i, &distinct, func, deps, vocab) < threshold {
            *mark = true;
            any = true;
        }
    }
    any.then_some(marks)
}

fn joined_key(candidate: &Candidate, marks: &[bool], token: &str, vocab: &Vocabulary) -> String {
    let mut key = String::new();
    for (i, &word) in candidate.words.iter().enumerate() {
        if marks[i] {
            key.push_str(token);
        } else {
            key.push_str(vocab.word(word));
        }
        key.push(KEY_SEPARATOR);
    }
    key
}

/// Joins every retained candidate containing a word under the weight
/// threshold into a re-keyed cluster. Joined sources are flagged and
/// excluded from direct output; only their targets are emitted.
pub fn join_clusters(
    set: &mut CandidateSet,
    vocab: &mut Vocabulary,
    deps: &DepMatrix,
    threshold: f64,
    func: WeightFunc,
) -> JoinOutcome {
    let token = choose_token(vocab);
    let mut joined_input = 0u64;

    for id in set.retained_ids() {
        let (marks, key, support, gaps, tail, words) = {
            let Some(candidate) = set.get(id) else { continue };
            let Some(marks) = mark_low_weight(candidate, threshold, func, deps, vocab) else {
                continue;
            };
            let key = joined_key(candidate, &marks, &token, vocab);
            (
                marks,
                key,
                candidate.support,
                candidate.gaps.clone(),
                candidate.tail,
                candidate.words.clone(),
            )
        };
        joined_input += 1;

        let entry = set.table.upsert(&key);
        if set.table.get(entry).count == 1 {
            let target = set.joined.len();
            set.joined.push(JoinedCandidate {
                words: words.clone(),
                slots: marks.iter().map(|&m| m.then(Vec::new)).collect(),
                gaps: gaps.clone(),
                tail,
                support: 0,
                entry,
            });
            set.table.get_mut(entry).cluster = Some(ClusterRef::Joined(target));
        }
        let Some(ClusterRef::Joined(target)) = set.table.get(entry).cluster else {
            continue;
        };

        if let Some(candidate) = set.get_mut(id) {
            candidate.joined = true;
        }
        let joined = &mut set.joined[target];
        joined.support += support;
        for (range, gap) in joined.gaps.iter_mut().zip(&gaps) {
            range.cover(*gap);
        }
        joined.tail.cover(tail);
        for (i, &marked) in marks.iter().enumerate() {
            if !marked {
                continue;
            }
            if let Some(slot) = joined.slots[i].as_mut() {
                if !slot.contains(&words[i]) {
                    slot.push(words[i]);
                }
            }
        }
    }

    let totals: Vec<(EntryId, u64)> = set.joined.iter().map(|j| (j.entry, j.support)).collect();
    for (entry, support) in totals {
        set.table.get_mut(entry).count = support;
    }

    JoinOutcome {
        token,
        joined_input,
        joined_output: set.joined.len() as u64,
    }
}
