use logsieve::candidates::{CandidateBuilder, CandidateSet};
use logsieve::config::Config;
use logsieve::tokenize::Tokenizer;
use logsieve::trie::PrefixTrie;
use logsieve::vocab::{Vocabulary, VocabularyBuilder};

fn build(lines: &[String], support: u64) -> (Vocabulary, CandidateSet) {
    let tok = Tokenizer::from_config(&Config::default()).unwrap();
    let mut vb = VocabularyBuilder::new(4096, 7, None, None);
    for line in lines {
        vb.observe_line(&tok.split(line));
    }
    let (mut vocab, _) = vb.finish(support);
    let mut cb = CandidateBuilder::new(&mut vocab, 4096, 11, None, None, None);
    for line in lines {
        cb.observe_line(&tok.split(line));
    }
    let mut set = cb.finish();
    set.filter_by_support(support);
    (vocab, set)
}

fn interface_corpus() -> Vec<String> {
    let mut lines = Vec::new();
    for _ in 0..10 {
        lines.push("Interface eth0 down".to_string());
    }
    for _ in 0..5 {
        lines.push("Interface eth1 down".to_string());
    }
    for i in 0..20 {
        lines.push(format!("Interface card{i:02} down"));
    }
    lines
}

fn support_of(set: &CandidateSet, constants: usize, count: u64) -> u64 {
    set.retained()
        .find(|(_, c)| c.constants() == constants && c.count == count)
        .map(|(_, c)| c.support)
        .unwrap()
}

#[test]
fn folds_more_specific_candidate_counts_into_the_general_one() {
    let (vocab, mut set) = build(&interface_corpus(), 5);
    assert_eq!(set.retained().count(), 3);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    // "Interface *{1,1} down" absorbs both eth candidates: 20 + 10 + 5.
    assert_eq!(support_of(&set, 2, 20), 35);
    assert_eq!(support_of(&set, 3, 10), 10);
    assert_eq!(support_of(&set, 3, 5), 5);
}

#[test]
fn aggregated_supports_are_visible_to_key_resolution() {
    let (vocab, mut set) = build(&interface_corpus(), 5);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    assert_eq!(set.support_for_key("Interface\ndown\n"), Some(35));
}

#[test]
fn a_second_pass_changes_nothing() {
    let (vocab, mut set) = build(&interface_corpus(), 5);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    let first: Vec<u64> = set.retained().map(|(_, c)| c.support).collect();
    trie.aggregate_supports(&mut set);
    let second: Vec<u64> = set.retained().map(|(_, c)| c.support).collect();
    assert_eq!(first, second);
}

#[test]
fn a_candidate_never_absorbs_itself() {
    let mut lines = Vec::new();
    for i in 0..20 {
        lines.push(format!("Interface card{i:02} down"));
    }
    let (vocab, mut set) = build(&lines, 5);
    assert_eq!(set.retained().count(), 1);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    let (_, only) = set.retained().next().unwrap();
    assert_eq!(only.support, 20);
}

#[test]
fn trailing_wildcards_absorb_longer_specializations() {
    let mut lines = Vec::new();
    for i in 0..6 {
        lines.push(format!("job done batch{i}"));
    }
    for _ in 0..6 {
        lines.push("job done ok".to_string());
    }
    let (vocab, mut set) = build(&lines, 6);
    // Two candidates: "job done *{1,1}" (6) and "job done ok" (6).
    assert_eq!(set.retained().count(), 2);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    assert_eq!(support_of(&set, 2, 6), 12);
    assert_eq!(support_of(&set, 3, 6), 6);
}

#[test]
fn disjoint_candidates_do_not_cross_aggregate() {
    let mut lines = Vec::new();
    for i in 0..8 {
        lines.push(format!("login from host{i}"));
    }
    for i in 0..8 {
        lines.push(format!("logout from host{i}"));
    }
    let (vocab, mut set) = build(&lines, 8);
    let trie = PrefixTrie::build(&mut set, &vocab, 13);
    trie.aggregate_supports(&mut set);
    for (_, candidate) in set.retained() {
        assert_eq!(candidate.support, 8);
    }
}
