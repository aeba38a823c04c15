pub mod candidates;
pub mod config;
pub mod depmatrix;
pub mod engine;
pub mod input;
pub mod join;
pub mod outliers;
pub mod render;
pub mod sketch;
pub mod table;
pub mod tokenize;
pub mod trie;
pub mod vocab;
pub mod wordfilter;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
    #[error("invalid input pattern: {0}")]
    Glob(#[from] glob::PatternError),
    #[error("no input files")]
    NoInput,
}
