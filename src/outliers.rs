use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::candidates::{line_shape, CandidateSet};
use crate::input::InputSet;
use crate::tokenize::Tokenizer;
use crate::vocab::Vocabulary;
use crate::wordfilter::WordFilter;
use crate::Error;

/// Extra pass writing every line not explained by a sufficiently supported
/// cluster to `path`: lines with tokens but no frequent words, and lines
/// whose pattern key is unknown or under support. Lines the tokenizer
/// rejects outright are skipped. Returns the number of outliers written.
pub fn write_outliers(
    input: &InputSet,
    tokenizer: &Tokenizer,
    vocab: &mut Vocabulary,
    word_filter: Option<&WordFilter>,
    set: &mut CandidateSet,
    support: u64,
    path: &Path,
) -> Result<u64, Error> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut outliers = 0u64;
    input.try_for_each_line(|line| {
        let tokens = tokenizer.split(line);
        if tokens.is_empty() {
            return Ok(());
        }
        let explained = match line_shape(&tokens, vocab, word_filter) {
            None => false,
            Some(shape) => set
                .support_for_key(&shape.key)
                .is_some_and(|s| s >= support),
        };
        if !explained {
            writeln!(out, "{line}")?;
            outliers += 1;
        }
        Ok(())
    })?;
    Ok(outliers)
}
