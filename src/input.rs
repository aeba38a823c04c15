use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::Error;

const PROGRESS_INTERVAL: u64 = 200_000;

/// The input corpus: files named directly or via glob patterns. Passes
/// re-read the files from disk each time; nothing is pipelined across
/// passes.
#[derive(Debug)]
pub struct InputSet {
    files: Vec<PathBuf>,
}

impl InputSet {
    /// Expands glob patterns; a pattern matching nothing is kept as a
    /// literal path so the open failure surfaces in the run log.
    pub fn from_patterns(patterns: &[String]) -> Result<Self, Error> {
        let mut files = Vec::new();
        for pattern in patterns {
            let before = files.len();
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(path) => files.push(path),
                    Err(e) => log::warn!("skipping unreadable path: {e}"),
                }
            }
            if files.len() == before {
                files.push(PathBuf::from(pattern));
            }
        }
        if files.is_empty() {
            return Err(Error::NoInput);
        }
        Ok(Self { files })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// One pass over every line of every file, in order. Unopenable files
    /// are logged and skipped. Returns the number of lines visited.
    pub fn try_for_each_line<F>(&self, mut f: F) -> Result<u64, Error>
    where
        F: FnMut(&str) -> Result<(), Error>,
    {
        let mut lines = 0u64;
        for path in &self.files {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("can't open input file {}: {e}", path.display());
                    continue;
                }
            };
            let reader = BufReader::with_capacity(1 << 20, file);
            for line in reader.lines() {
                let line = line?;
                f(&line)?;
                lines += 1;
                if lines % PROGRESS_INTERVAL == 0 {
                    log::debug!("{lines} lines processed");
                }
            }
        }
        Ok(lines)
    }
}
