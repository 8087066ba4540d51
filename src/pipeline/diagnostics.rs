// Assembly diagnostics: review buckets for problematic forms and a coverage
// rating over the assembled data.

use serde::Serialize;

use crate::models::Lexeme;

/// Coverage quality bands, derived from the share of forms that analyzed
/// cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageBand {
    Excellent,
    Good,
    Adequate,
    Fair,
    Weak,
    Poor,
}

impl CoverageBand {
    /// Band for a clean-forms ratio in `0.0..=1.0`.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.99 {
            CoverageBand::Excellent
        } else if ratio >= 0.9 {
            CoverageBand::Good
        } else if ratio >= 0.8 {
            CoverageBand::Adequate
        } else if ratio >= 0.7 {
            CoverageBand::Fair
        } else if ratio >= 0.6 {
            CoverageBand::Weak
        } else {
            CoverageBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoverageBand::Excellent => "excellent",
            CoverageBand::Good => "good",
            CoverageBand::Adequate => "adequate",
            CoverageBand::Fair => "fair",
            CoverageBand::Weak => "weak",
            CoverageBand::Poor => "poor",
        }
    }
}

/// Review buckets filled during assembly.
///
/// Flagged forms analyzed but contained unknown sounds; invalid forms could
/// not be analyzed at all. Either way the form stayed in the store, so the
/// buckets are a review queue, not a reject pile.
#[derive(Debug, Default, Serialize)]
pub struct AssemblyDiagnostics {
    lexemes: u64,
    flagged: Vec<Lexeme>,
    invalid: Vec<Lexeme>,
}

impl AssemblyDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count_lexeme(&mut self) {
        self.lexemes += 1;
    }

    pub(crate) fn flag(&mut self, lexeme: Lexeme) {
        self.flagged.push(lexeme);
    }

    pub(crate) fn mark_invalid(&mut self, lexeme: Lexeme) {
        self.invalid.push(lexeme);
    }

    /// Total number of lexemes stored during assembly.
    pub fn lexemes(&self) -> u64 {
        self.lexemes
    }

    pub fn flagged(&self) -> &[Lexeme] {
        &self.flagged
    }

    pub fn invalid(&self) -> &[Lexeme] {
        &self.invalid
    }

    /// Share of stored forms that are neither flagged nor invalid, with the
    /// band it falls into. An empty dataset counts as fully clean.
    pub fn coverage(&self) -> (f64, CoverageBand) {
        let ratio = if self.lexemes == 0 {
            1.0
        } else {
            1.0 - (self.flagged.len() + self.invalid.len()) as f64 / self.lexemes as f64
        };
        (ratio, CoverageBand::from_ratio(ratio))
    }
}
