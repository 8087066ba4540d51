// Raw value preprocessing: splitting multi-form values and cleaning
// orthography, behind trait seams datasets override to change either step.

use std::collections::BTreeSet;

use crate::models::RawLexeme;

/// Splits one raw value cell into form candidates.
pub trait FormSplitter {
    fn split(&self, row: &RawLexeme, value: &str) -> Vec<String>;
}

/// Cleans a single form candidate. Returning an empty string drops the
/// candidate.
pub trait FormCleaner {
    fn clean(&self, row: &RawLexeme, form: &str) -> String;
}

/// Optional grapheme tokenizer applied to cleaned forms. Without one, forms
/// keep whatever segments the raw row supplied.
pub trait Tokenizer {
    fn tokenize(&self, row: &RawLexeme, form: &str) -> Vec<String>;
}

/// Default splitting and cleaning rules.
///
/// Splits on the separator characters, strips bracketed substrings, collapses
/// whitespace and turns the missing-data markers into empty candidates.
#[derive(Debug, Clone)]
pub struct FormPolicy {
    pub separators: Vec<char>,
    pub brackets: Vec<(char, char)>,
    pub missing_markers: BTreeSet<String>,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            separators: vec![';', '/', ','],
            brackets: vec![('(', ')'), ('[', ']'), ('{', '}')],
            missing_markers: ["?", "-"].into_iter().map(str::to_string).collect(),
        }
    }
}

impl FormPolicy {
    /// Remove every bracketed substring, including nested brackets of the
    /// same pair. An unclosed bracket swallows the rest of the form.
    fn strip_brackets(&self, form: &str) -> String {
        let mut out = String::with_capacity(form.len());
        let mut pair: Option<(char, char)> = None;
        let mut depth = 0usize;

        for ch in form.chars() {
            match pair {
                None => {
                    if let Some(p) = self.brackets.iter().copied().find(|(open, _)| *open == ch) {
                        pair = Some(p);
                        depth = 1;
                    } else {
                        out.push(ch);
                    }
                }
                Some((open, close)) => {
                    if ch == open {
                        depth += 1;
                    } else if ch == close {
                        depth -= 1;
                        if depth == 0 {
                            pair = None;
                        }
                    }
                }
            }
        }

        out
    }

    fn collapse_whitespace(form: &str) -> String {
        form.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl FormSplitter for FormPolicy {
    fn split(&self, _row: &RawLexeme, value: &str) -> Vec<String> {
        value
            .split(|c: char| self.separators.contains(&c))
            .map(|candidate| candidate.trim().to_string())
            .collect()
    }
}

impl FormCleaner for FormPolicy {
    fn clean(&self, _row: &RawLexeme, form: &str) -> String {
        let cleaned = Self::collapse_whitespace(&self.strip_brackets(form));
        if self.missing_markers.contains(cleaned.as_str()) {
            return String::new();
        }
        cleaned
    }
}
