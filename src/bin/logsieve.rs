use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Env;

use logsieve::config::{Config, SortOrder, WeightFunc};
use logsieve::engine;
use logsieve::input::InputSet;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    /// Highest support first.
    Support,
    /// Fewest constants first.
    Constants,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "logsieve", version, about = "Mines recurring line patterns from event logs")]
struct Cli {
    /// Input files or glob patterns. May be repeated.
    #[arg(required = true)]
    input: Vec<String>,

    /// Report patterns matching at least this many lines
    #[arg(long)]
    support: Option<u64>,
    /// Support threshold as a percentage of the input line count
    #[arg(long = "rsupport")]
    relative_support: Option<f64>,

    /// Word separator regex (default: whitespace)
    #[arg(long)]
    separator: Option<String>,
    /// Only process lines matching this regex
    #[arg(long = "lfilter")]
    line_filter: Option<String>,
    /// Capture expansion template applied after --lfilter matches
    #[arg(long)]
    template: Option<String>,
    /// Skip this many bytes at the start of every line
    #[arg(long = "byte-offset", default_value_t = 0)]
    byte_offset: usize,

    /// Word sketch slots for memory-bounded frequent word detection
    #[arg(long = "word-sketch", default_value_t = 0)]
    word_sketch: usize,
    /// Cluster candidate sketch slots (incompatible with --aggregate-supports)
    #[arg(long = "cluster-sketch", default_value_t = 0)]
    cluster_sketch: usize,
    /// Vocabulary hash table slots
    #[arg(long = "word-table-size", default_value_t = 100_000)]
    word_table_size: usize,

    /// Fold supports of more specific patterns into their generalizations
    #[arg(long = "aggregate-supports", default_value_t = false)]
    aggregate_supports: bool,

    /// Join clusters whose words fall below this dependency weight (0..1]
    #[arg(long = "word-weight")]
    word_weight: Option<f64>,
    /// Word weight function: 1 or 2
    #[arg(long = "weight-function", default_value_t = 1)]
    weight_function: u8,
    /// Parenthesize every token slot, even single-word ones
    #[arg(long = "detailed-tokens", default_value_t = false)]
    detailed_tokens: bool,

    /// Words matching this regex gain a generalized variant
    #[arg(long = "word-filter")]
    word_filter: Option<String>,
    /// Substrings replaced inside filtered words
    #[arg(long = "word-search")]
    word_search: Option<String>,
    /// Replacement text for --word-search matches
    #[arg(long = "word-replace")]
    word_replace: Option<String>,

    /// Write lines not explained by any cluster to this file
    #[arg(long)]
    outliers: Option<PathBuf>,

    /// Seed for the hash table seed sequence
    #[arg(long, default_value_t = 1)]
    seed: u64,
    #[arg(long, value_enum, default_value = "support")]
    sort: SortArg,
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = Config {
        support: cli.support.unwrap_or(0),
        relative_support: cli.relative_support.unwrap_or(0.0),
        separator: cli.separator,
        line_filter: cli.line_filter,
        template: cli.template,
        byte_offset: cli.byte_offset,
        word_sketch_size: cli.word_sketch,
        cluster_sketch_size: cli.cluster_sketch,
        word_table_size: cli.word_table_size,
        aggregate_supports: cli.aggregate_supports,
        word_weight_threshold: cli.word_weight,
        weight_function: WeightFunc::try_from(cli.weight_function)?,
        word_filter: cli.word_filter,
        word_search: cli.word_search,
        word_replace: cli.word_replace,
        outlier_file: cli.outliers,
        seed: cli.seed,
        detailed_tokens: cli.detailed_tokens,
        sort: match cli.sort {
            SortArg::Support => SortOrder::Support,
            SortArg::Constants => SortOrder::Constants,
        },
        ..Config::default()
    };

    let input = InputSet::from_patterns(&cli.input)?;
    let result = engine::run(&config, &input)?;

    match cli.format {
        FormatArg::Text => {
            println!();
            for pattern in &result.patterns {
                println!("{}", pattern.pattern);
                println!("Support: {}", engine::group_digits(pattern.support));
                println!();
            }
        }
        FormatArg::Json => {
            let out = serde_json::json!({
                "patterns": result.patterns,
                "stats": result.stats,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
