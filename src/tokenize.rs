use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Config;
use crate::Error;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Splits raw lines into words: byte-offset skip, optional line filter with
/// capture-template rewriting, then separator split. Empty tokens are
/// dropped.
#[derive(Debug)]
pub struct Tokenizer {
    separator: Option<Regex>,
    filter: Option<Regex>,
    template: Option<String>,
    byte_offset: usize,
}

impl Tokenizer {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let separator = config
            .separator
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        let filter = config
            .line_filter
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        Ok(Self {
            separator,
            filter,
            template: config.template.clone(),
            byte_offset: config.byte_offset,
        })
    }

    /// Tokenizes one line. An empty result means the line was filtered out
    /// or had no content past the byte offset.
    pub fn split(&self, line: &str) -> Vec<String> {
        let rest = match line.get(self.byte_offset..) {
            Some(r) if !r.is_empty() => r,
            _ => return Vec::new(),
        };
        let rewritten;
        let subject = match &self.filter {
            None => rest,
            Some(filter) => match filter.captures(rest) {
                None => return Vec::new(),
                Some(caps) => match &self.template {
                    None => rest,
                    Some(template) => {
                        let mut out = String::new();
                        caps.expand(template, &mut out);
                        rewritten = out;
                        &rewritten
                    }
                },
            },
        };
        let separator = self.separator.as_ref().unwrap_or(&WHITESPACE);
        separator
            .split(subject)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }
}
