use logsieve::candidates::{Candidate, GapRange};
use logsieve::config::Config;
use logsieve::join::JoinedCandidate;
use logsieve::render::{render_candidate, render_joined};
use logsieve::tokenize::Tokenizer;
use logsieve::vocab::{Vocabulary, VocabularyBuilder};

fn vocabulary(words: &str) -> Vocabulary {
    let tok = Tokenizer::from_config(&Config::default()).unwrap();
    let mut builder = VocabularyBuilder::new(256, 7, None, None);
    builder.observe_line(&tok.split(words));
    builder.finish(1).0
}

fn id(vocab: &mut Vocabulary, word: &str) -> usize {
    vocab.lookup(word).unwrap()
}

#[test]
fn renders_wildcard_ranges_between_constants_and_at_the_tail() {
    let mut vocab = vocabulary("Interface down");
    let candidate = Candidate {
        words: vec![id(&mut vocab, "Interface"), id(&mut vocab, "down")],
        gaps: vec![GapRange::point(0), GapRange { min: 0, max: 7 }],
        tail: GapRange { min: 1, max: 2 },
        count: 20,
        support: 20,
        joined: false,
        entry: 0,
        terminal: None,
    };
    assert_eq!(
        render_candidate(&candidate, &vocab),
        "Interface *{0,7} down *{1,2}"
    );
}

#[test]
fn absent_ranges_are_omitted() {
    let mut vocab = vocabulary("user login");
    let candidate = Candidate {
        words: vec![id(&mut vocab, "user"), id(&mut vocab, "login")],
        gaps: vec![GapRange::point(0), GapRange::point(0)],
        tail: GapRange::point(0),
        count: 9,
        support: 9,
        joined: false,
        entry: 0,
        terminal: None,
    };
    assert_eq!(render_candidate(&candidate, &vocab), "user login");
}

#[test]
fn rendered_literals_round_trip_to_the_constant_sequence() {
    let mut vocab = vocabulary("session opened for root");
    let words = vec![
        id(&mut vocab, "session"),
        id(&mut vocab, "opened"),
        id(&mut vocab, "root"),
    ];
    let candidate = Candidate {
        words: words.clone(),
        gaps: vec![
            GapRange::point(0),
            GapRange::point(0),
            GapRange { min: 1, max: 3 },
        ],
        tail: GapRange { min: 0, max: 1 },
        count: 4,
        support: 4,
        joined: false,
        entry: 0,
        terminal: None,
    };
    let rendered = render_candidate(&candidate, &vocab);
    let recovered: Vec<usize> = rendered
        .split_whitespace()
        .filter(|part| !part.starts_with("*{"))
        .map(|part| vocab.lookup(part).unwrap())
        .collect();
    assert_eq!(recovered, words);
}

fn joined_fixture(vocab: &mut Vocabulary, alternatives: &[&str]) -> JoinedCandidate {
    let words = vec![
        id(vocab, "Interface"),
        id(vocab, alternatives[0]),
        id(vocab, "up"),
    ];
    let slot: Vec<usize> = alternatives.iter().map(|w| id(vocab, w)).collect();
    JoinedCandidate {
        words,
        slots: vec![None, Some(slot), None],
        gaps: vec![GapRange::point(0); 3],
        tail: GapRange::point(0),
        support: 60,
        entry: 0,
    }
}

#[test]
fn token_slots_render_as_alternations() {
    let mut vocab = vocabulary("Interface eth0 eth1 up");
    let joined = joined_fixture(&mut vocab, &["eth0", "eth1"]);
    assert_eq!(render_joined(&joined, &vocab, false), "Interface (eth0|eth1) up");
}

#[test]
fn single_alternative_slots_render_as_the_bare_word() {
    let mut vocab = vocabulary("Interface eth0 up");
    let joined = joined_fixture(&mut vocab, &["eth0"]);
    assert_eq!(render_joined(&joined, &vocab, false), "Interface eth0 up");
}

#[test]
fn detailed_mode_marks_every_token_slot() {
    let mut vocab = vocabulary("Interface eth0 up");
    let joined = joined_fixture(&mut vocab, &["eth0"]);
    assert_eq!(render_joined(&joined, &vocab, true), "Interface (eth0) up");
}
