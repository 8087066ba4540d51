// Segment analysis: the analyzer seam, its two-tier error contract and the
// per-language state accumulated across analyzed forms.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The segment sequence cannot be analyzed. Recoverable: the pipeline
    /// keeps the form and routes it to the invalid bucket.
    #[error("Malformed segment sequence: {0}")]
    MalformedSegments(String),

    /// The analyzer broke its contract or its reference data is corrupt.
    /// Fatal: assembly aborts.
    #[error("Analyzer contract violation: {0}")]
    Contract(String),
}

/// Broad phonological category of an analyzed sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SoundKind {
    Consonant,
    Vowel,
    Tone,
    Marker,
    Unknown,
}

/// One analyzed segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sound {
    pub grapheme: String,
    pub kind: SoundKind,
}

/// Result of analyzing one form's segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentAnalysis {
    /// Segments after orthography normalization.
    pub normalized: Vec<String>,
    pub sounds: Vec<Sound>,
    /// One sound-class code per segment, `"?"` where no class is known.
    pub class_codes: Vec<String>,
}

impl SegmentAnalysis {
    /// True when any segment failed to resolve to a known sound.
    pub fn needs_review(&self) -> bool {
        self.sounds.iter().any(|s| s.kind == SoundKind::Unknown)
            || self.class_codes.iter().any(|c| c == "?")
    }
}

/// Per-language analysis state, accumulated over every analyzed form of that
/// language and carried into the assembly outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisState {
    /// Occurrence count per normalized segment.
    pub segment_counts: BTreeMap<String, u64>,
    /// Segments no inventory entry resolved.
    pub unknown_segments: BTreeSet<String>,
    /// Raw graphemes and the normalized spellings they were rewritten to.
    pub rewrites: BTreeMap<String, BTreeSet<String>>,
    pub analyzed_forms: u64,
    pub malformed_forms: u64,
}

impl AnalysisState {
    /// Raw graphemes that were rewritten to more than one normalized
    /// spelling, a sign of inconsistent source transcription.
    pub fn inconsistent_rewrites(&self) -> BTreeMap<&str, &BTreeSet<String>> {
        self.rewrites
            .iter()
            .filter(|(_, targets)| targets.len() > 1)
            .map(|(raw, targets)| (raw.as_str(), targets))
            .collect()
    }
}

/// Turns a form's segments into analyzed sounds, updating the language's
/// accumulated state as it goes.
pub trait SegmentAnalyzer {
    fn analyze(
        &self,
        segments: &[String],
        state: &mut AnalysisState,
    ) -> Result<SegmentAnalysis, AnalysisError>;
}

/// Analyzer backed by an explicit sound inventory.
///
/// Aliases rewrite raw graphemes before lookup; rewrites are recorded in the
/// language state. Graphemes without an inventory entry come back as
/// [`SoundKind::Unknown`] with class code `"?"`.
#[derive(Debug, Clone, Default)]
pub struct InventoryAnalyzer {
    sounds: BTreeMap<String, (SoundKind, String)>,
    aliases: BTreeMap<String, String>,
}

impl InventoryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sound(
        mut self,
        grapheme: impl Into<String>,
        kind: SoundKind,
        class_code: impl Into<String>,
    ) -> Self {
        self.sounds.insert(grapheme.into(), (kind, class_code.into()));
        self
    }

    pub fn with_alias(mut self, raw: impl Into<String>, normalized: impl Into<String>) -> Self {
        self.aliases.insert(raw.into(), normalized.into());
        self
    }
}

impl SegmentAnalyzer for InventoryAnalyzer {
    fn analyze(
        &self,
        segments: &[String],
        state: &mut AnalysisState,
    ) -> Result<SegmentAnalysis, AnalysisError> {
        if segments.is_empty() {
            return Err(AnalysisError::MalformedSegments(
                "empty segment sequence".to_string(),
            ));
        }
        if let Some(bad) = segments
            .iter()
            .find(|s| s.trim().is_empty() || s.contains(char::is_whitespace))
        {
            return Err(AnalysisError::MalformedSegments(format!(
                "unparseable segment {:?}",
                bad
            )));
        }

        let mut normalized = Vec::with_capacity(segments.len());
        let mut sounds = Vec::with_capacity(segments.len());
        let mut class_codes = Vec::with_capacity(segments.len());

        for raw in segments {
            let segment = self.aliases.get(raw).cloned().unwrap_or_else(|| raw.clone());
            if segment != *raw {
                state
                    .rewrites
                    .entry(raw.clone())
                    .or_default()
                    .insert(segment.clone());
            }
            *state.segment_counts.entry(segment.clone()).or_default() += 1;

            match self.sounds.get(&segment) {
                Some((kind, code)) => {
                    sounds.push(Sound {
                        grapheme: segment.clone(),
                        kind: *kind,
                    });
                    class_codes.push(code.clone());
                }
                None => {
                    state.unknown_segments.insert(segment.clone());
                    sounds.push(Sound {
                        grapheme: segment.clone(),
                        kind: SoundKind::Unknown,
                    });
                    class_codes.push("?".to_string());
                }
            }
            normalized.push(segment);
        }

        Ok(SegmentAnalysis {
            normalized,
            sounds,
            class_codes,
        })
    }
}
