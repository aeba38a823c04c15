use serde::Serialize;

use crate::candidates::{line_shape, CandidateBuilder};
use crate::config::Config;
use crate::depmatrix::DepMatrix;
use crate::input::InputSet;
use crate::join::join_clusters;
use crate::outliers::write_outliers;
use crate::render::{collect_patterns, Pattern};
use crate::sketch::Sketch;
use crate::table::SeedSequence;
use crate::tokenize::Tokenizer;
use crate::trie::PrefixTrie;
use crate::vocab::{VocabStats, VocabularyBuilder};
use crate::wordfilter::WordFilter;
use crate::Error;

/// Aggregate counters produced by one run, for logging and JSON output.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MiningStats {
    pub lines: u64,
    pub support: u64,
    pub vocabulary_words: u64,
    pub frequent_words: u64,
    pub candidates_found: u64,
    pub clusters: u64,
    pub joined_input: u64,
    pub joined_output: u64,
    pub trie_nodes: u64,
    pub outliers: u64,
}

#[derive(Debug)]
pub struct MiningResult {
    pub patterns: Vec<Pattern>,
    pub stats: MiningStats,
}

/// Runs the full mining pipeline over `input`: word sketch, vocabulary,
/// cluster sketch, candidates (with the dependency matrix when joining is
/// enabled), support filter, aggregation, join, and the outlier pass.
/// Passes are strictly ordered; each re-reads the input from disk.
pub fn run(config: &Config, input: &InputSet) -> Result<MiningResult, Error> {
    config.validate()?;
    let tokenizer = Tokenizer::from_config(config)?;
    let word_filter = match (&config.word_filter, &config.word_search, &config.word_replace) {
        (Some(filter), Some(search), Some(replace)) => {
            Some(WordFilter::new(filter, search, replace)?)
        }
        _ => None,
    };

    let mut seeds = SeedSequence::new(config.seed);
    let word_table_seed = seeds.next_seed();
    let word_sketch_seed = seeds.next_seed();
    let cluster_table_seed = seeds.next_seed();
    let cluster_sketch_seed = seeds.next_seed();
    let trie_seed = seeds.next_seed();

    log::info!("Starting: {} input file(s).", input.files().len());

    let mut stats = MiningStats::default();
    let mut support = config.support;
    let mut total_lines = 0u64;

    let word_sketch = if config.word_sketch_size > 0 {
        log::info!("Creating the word sketch...");
        let mut sketch = Sketch::new(config.word_sketch_size, word_sketch_seed);
        total_lines = input.try_for_each_line(|line| {
            for token in tokenizer.split(line) {
                sketch.bump(&token);
                if let Some(wf) = &word_filter {
                    if wf.matches(&token) {
                        sketch.bump(&wf.transform(&token));
                    }
                }
            }
            Ok(())
        })?;
        if support == 0 {
            support = relative_support(total_lines, config.relative_support);
        }
        log::info!(
            "{} slots in the word sketch >= support threshold.",
            group_digits(sketch.slots_at_least(support) as u64)
        );
        Some(sketch)
    } else {
        None
    };

    log::info!("Creating vocabulary...");
    let mut vocab_builder = VocabularyBuilder::new(
        config.word_table_size,
        word_table_seed,
        word_filter.as_ref(),
        word_sketch.as_ref().map(|s| (s, support)),
    );
    let lines = input.try_for_each_line(|line| {
        vocab_builder.observe_line(&tokenizer.split(line));
        Ok(())
    })?;
    if total_lines == 0 {
        total_lines = lines;
    }
    if support == 0 {
        support = relative_support(total_lines, config.relative_support);
    }
    stats.lines = total_lines;
    stats.support = support;

    log::info!("Finding frequent words from vocabulary...");
    let (mut vocab, vocab_stats) = vocab_builder.finish(support);
    stats.vocabulary_words = vocab_stats.total_words;
    stats.frequent_words = vocab.frequent_count();
    log::info!(
        "{} words were inserted into the vocabulary.",
        group_digits(vocab_stats.total_words)
    );
    log::info!(
        "{} frequent words were found.",
        group_digits(vocab.frequent_count())
    );
    log_vocab_distribution(&vocab_stats);

    if vocab.frequent_count() == 0 {
        return Ok(MiningResult {
            patterns: Vec::new(),
            stats,
        });
    }

    let cluster_sketch = if config.cluster_sketch_size > 0 {
        log::info!("Creating the cluster sketch...");
        let mut sketch = Sketch::new(config.cluster_sketch_size, cluster_sketch_seed);
        input.try_for_each_line(|line| {
            let tokens = tokenizer.split(line);
            if let Some(shape) = line_shape(&tokens, &mut vocab, word_filter.as_ref()) {
                sketch.bump(&shape.key);
            }
            Ok(())
        })?;
        log::info!(
            "{} slots in the cluster sketch >= support threshold.",
            group_digits(sketch.slots_at_least(support) as u64)
        );
        Some(sketch)
    } else {
        None
    };

    log::info!("Finding cluster candidates...");
    let cluster_table_size = if config.cluster_table_size > 0 {
        config.cluster_table_size
    } else {
        (vocab.frequent_count() as usize).saturating_mul(100).max(1)
    };
    let mut deps = config
        .word_weight_threshold
        .map(|_| DepMatrix::new(vocab.frequent_count()));
    let mut candidate_builder = CandidateBuilder::new(
        &mut vocab,
        cluster_table_size,
        cluster_table_seed,
        word_filter.as_ref(),
        cluster_sketch.as_ref().map(|s| (s, support)),
        deps.as_mut(),
    );
    input.try_for_each_line(|line| {
        candidate_builder.observe_line(&tokenizer.split(line));
        Ok(())
    })?;
    stats.candidates_found = candidate_builder.found();
    let mut set = candidate_builder.finish();
    log::info!(
        "{} cluster candidates were found.",
        group_digits(stats.candidates_found)
    );

    log::info!("Finding clusters...");
    stats.clusters = set.filter_by_support(support);
    log::info!("{} clusters were found.", group_digits(stats.clusters));

    if config.aggregate_supports {
        log::info!("Aggregating cluster supports...");
        let trie = PrefixTrie::build(&mut set, &vocab, trie_seed);
        trie.aggregate_supports(&mut set);
        stats.trie_nodes = trie.node_count() as u64;
        log::info!("{} nodes in the prefix tree.", group_digits(stats.trie_nodes));
    }

    if let (Some(threshold), Some(deps)) = (config.word_weight_threshold, deps.as_ref()) {
        log::info!("Joining clusters...");
        let outcome = join_clusters(&mut set, &mut vocab, deps, threshold, config.weight_function);
        stats.joined_input = outcome.joined_input;
        stats.joined_output = outcome.joined_output;
        log::info!(
            "{} clusters contain frequent words under the weight threshold.",
            group_digits(outcome.joined_input)
        );
        log::info!(
            "Those clusters were joined into {} clusters.",
            group_digits(outcome.joined_output)
        );
    }

    let patterns = collect_patterns(&set, &vocab, config.sort, config.detailed_tokens);
    log::info!(
        "Total number of clusters: {}",
        group_digits(patterns.len() as u64)
    );

    if let Some(path) = &config.outlier_file {
        log::info!("Finding outliers...");
        stats.outliers = write_outliers(
            input,
            &tokenizer,
            &mut vocab,
            word_filter.as_ref(),
            &mut set,
            support,
            path,
        )?;
        log::info!(
            "{} outliers were written to {}.",
            group_digits(stats.outliers),
            path.display()
        );
    }

    Ok(MiningResult { patterns, stats })
}

fn relative_support(lines: u64, pct: f64) -> u64 {
    (lines as f64 * pct / 100.0) as u64
}

fn log_vocab_distribution(stats: &VocabStats) {
    if stats.total_words == 0 {
        return;
    }
    let total = stats.total_words as f64;
    for (count, label) in [
        (stats.ones, "occur 1 time"),
        (stats.twos, "occur 2 times or less"),
        (stats.fives, "occur 5 times or less"),
        (stats.tens, "occur 10 times or less"),
        (stats.twenties, "occur 20 times or less"),
    ] {
        log::info!(
            "{}% - {} words in vocabulary {}.",
            (count as f64 / total * 100.0) as u32,
            group_digits(count),
            label
        );
    }
}

/// Inserts commas between every three digits.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
