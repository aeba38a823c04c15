use std::path::PathBuf;
use thiserror::Error;

/// Word weight function used by the join heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightFunc {
    /// Mean dependency from every constant of the cluster, repeats
    /// included.
    #[default]
    Mean,
    /// Mean cross-dependency over the cluster's distinct words, with the
    /// guaranteed self-dependency term removed.
    DistinctMean,
}

impl TryFrom<u8> for WeightFunc {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, ConfigError> {
        match value {
            1 => Ok(WeightFunc::Mean),
            2 => Ok(WeightFunc::DistinctMean),
            other => Err(ConfigError::UnknownWeightFunction(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest support first.
    #[default]
    Support,
    /// Simplest patterns (fewest constants) first.
    Constants,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a support threshold is required (absolute or relative)")]
    MissingSupport,
    #[error("relative support must be in the range 0..100, got {0}")]
    InvalidRelativeSupport(f64),
    #[error("the cluster sketch cannot be combined with support aggregation: aggregation requires the full candidate set")]
    SketchWithAggregation,
    #[error("a line template requires a line filter")]
    TemplateWithoutFilter,
    #[error("the word filter requires both a search pattern and a replacement")]
    WordFilterIncomplete,
    #[error("word weight threshold must be in the range (0, 1], got {0}")]
    InvalidWordWeight(f64),
    #[error("unknown word weight function {0} (valid: 1, 2)")]
    UnknownWeightFunction(u8),
    #[error("the word table needs at least one slot")]
    EmptyWordTable,
}

/// Read-only run configuration. Validated as a whole before any pass
/// begins; the engine never discovers an invalid combination mid-run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absolute support threshold; 0 means derive it from
    /// `relative_support` after the first pass.
    pub support: u64,
    /// Support threshold as a percentage of the total input line count.
    pub relative_support: f64,
    /// Word separator regex; None uses whitespace.
    pub separator: Option<String>,
    /// Only lines matching this regex are processed.
    pub line_filter: Option<String>,
    /// Capture expansion template applied after the line filter matches.
    pub template: Option<String>,
    /// Bytes to skip at the start of every line.
    pub byte_offset: usize,
    /// Word sketch slots; 0 disables the word sketch pass.
    pub word_sketch_size: usize,
    /// Cluster candidate sketch slots; 0 disables the sketch pass.
    pub cluster_sketch_size: usize,
    /// Vocabulary hash table slots.
    pub word_table_size: usize,
    /// Candidate hash table slots; 0 sizes it from the frequent word count.
    pub cluster_table_size: usize,
    /// Fold supports of more specific candidates into their
    /// generalizations.
    pub aggregate_supports: bool,
    /// Join clusters whose words fall below this weight; None disables the
    /// join heuristic.
    pub word_weight_threshold: Option<f64>,
    pub weight_function: WeightFunc,
    /// Words matching this regex gain a generalized variant.
    pub word_filter: Option<String>,
    /// Substrings replaced inside filtered words.
    pub word_search: Option<String>,
    /// Replacement text for `word_search` matches.
    pub word_replace: Option<String>,
    /// Write lines not explained by any cluster to this file.
    pub outlier_file: Option<PathBuf>,
    /// Seed for the hash-table seed sequence.
    pub seed: u64,
    /// Parenthesize every token slot, even single-word ones.
    pub detailed_tokens: bool,
    pub sort: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            support: 1,
            relative_support: 0.0,
            separator: None,
            line_filter: None,
            template: None,
            byte_offset: 0,
            word_sketch_size: 0,
            cluster_sketch_size: 0,
            word_table_size: 100_000,
            cluster_table_size: 0,
            aggregate_supports: false,
            word_weight_threshold: None,
            weight_function: WeightFunc::Mean,
            word_filter: None,
            word_search: None,
            word_replace: None,
            outlier_file: None,
            seed: 1,
            detailed_tokens: false,
            sort: SortOrder::Support,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.support == 0 && self.relative_support <= 0.0 {
            return Err(ConfigError::MissingSupport);
        }
        if self.relative_support < 0.0 || self.relative_support > 100.0 {
            return Err(ConfigError::InvalidRelativeSupport(self.relative_support));
        }
        if self.cluster_sketch_size > 0 && self.aggregate_supports {
            return Err(ConfigError::SketchWithAggregation);
        }
        if self.template.is_some() && self.line_filter.is_none() {
            return Err(ConfigError::TemplateWithoutFilter);
        }
        if self.word_filter.is_some() && (self.word_search.is_none() || self.word_replace.is_none()) {
            return Err(ConfigError::WordFilterIncomplete);
        }
        if let Some(w) = self.word_weight_threshold {
            if !(w > 0.0 && w <= 1.0) {
                return Err(ConfigError::InvalidWordWeight(w));
            }
        }
        if self.word_table_size == 0 {
            return Err(ConfigError::EmptyWordTable);
        }
        Ok(())
    }
}
