use itertools::Itertools;
use serde::Serialize;

use crate::candidates::{Candidate, CandidateSet, GapRange};
use crate::config::SortOrder;
use crate::join::JoinedCandidate;
use crate::vocab::Vocabulary;

/// One output row: the rendered pattern and its support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub pattern: String,
    pub support: u64,
    pub constants: usize,
}

fn wildcard(range: GapRange) -> String {
    format!("*{{{},{}}}", range.min, range.max)
}

pub fn render_candidate(candidate: &Candidate, vocab: &Vocabulary) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (i, &word) in candidate.words.iter().enumerate() {
        if !candidate.gaps[i].is_absent() {
            parts.push(wildcard(candidate.gaps[i]));
        }
        parts.push(vocab.word(word).to_string());
    }
    if !candidate.tail.is_absent() {
        parts.push(wildcard(candidate.tail));
    }
    parts.join(" ")
}

/// Token slots render as `(a|b)` alternations. A single-word slot renders
/// as the bare word, matching the non-joined style, unless the detailed
/// mode marks every slot.
pub fn render_joined(joined: &JoinedCandidate, vocab: &Vocabulary, detailed: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (i, &word) in joined.words.iter().enumerate() {
        if !joined.gaps[i].is_absent() {
            parts.push(wildcard(joined.gaps[i]));
        }
        match joined.slots[i].as_deref() {
            Some([only]) if !detailed => parts.push(vocab.word(*only).to_string()),
            Some([]) | None => parts.push(vocab.word(word).to_string()),
            Some(alternatives) => parts.push(format!(
                "({})",
                alternatives.iter().map(|&w| vocab.word(w)).join("|")
            )),
        }
    }
    if !joined.tail.is_absent() {
        parts.push(wildcard(joined.tail));
    }
    parts.join(" ")
}

/// Renders every surviving cluster. Joined sources are skipped; their
/// targets are emitted instead.
pub fn collect_patterns(
    set: &CandidateSet,
    vocab: &Vocabulary,
    sort: SortOrder,
    detailed: bool,
) -> Vec<Pattern> {
    let mut out: Vec<Pattern> = Vec::new();
    for (_, candidate) in set.retained() {
        if candidate.joined {
            continue;
        }
        out.push(Pattern {
            pattern: render_candidate(candidate, vocab),
            support: candidate.support,
            constants: candidate.constants(),
        });
    }
    for joined in &set.joined {
        out.push(Pattern {
            pattern: render_joined(joined, vocab, detailed),
            support: joined.support,
            constants: joined.words.len(),
        });
    }
    match sort {
        SortOrder::Support => out.sort_by(|a, b| b.support.cmp(&a.support)),
        SortOrder::Constants => out.sort_by_key(|p| p.constants),
    }
    out
}
