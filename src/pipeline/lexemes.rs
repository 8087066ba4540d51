// Lexeme assembly: the staged path from one raw value cell to zero or more
// stored, analyzed forms.

use std::collections::BTreeMap;

use crate::models::{Lexeme, RawLexeme};
use crate::store::{IdSequence, RecordTable};

use super::diagnostics::AssemblyDiagnostics;
use super::forms::{FormCleaner, FormSplitter, Tokenizer};
use super::segments::{AnalysisError, AnalysisState, SegmentAnalyzer};
use super::AssemblyError;

/// Borrowed view of everything one lexeme-intake call touches.
pub(crate) struct LexemePipeline<'a> {
    pub splitter: &'a dyn FormSplitter,
    pub cleaner: &'a dyn FormCleaner,
    pub tokenizer: Option<&'a dyn Tokenizer>,
    pub analyzer: &'a dyn SegmentAnalyzer,
    pub ids: &'a mut IdSequence,
    pub forms: &'a mut RecordTable<Lexeme>,
    pub diagnostics: &'a mut AssemblyDiagnostics,
    pub analysis: &'a mut BTreeMap<String, AnalysisState>,
}

impl LexemePipeline<'_> {
    /// Run one raw row through split → clean → tokenize → store → analyze.
    /// Returns the stored lexemes, in candidate order.
    ///
    /// Candidates that are empty after cleaning are dropped. Forms whose
    /// segments cannot be analyzed, or that contain unknown sounds, are
    /// stored anyway and collected in the diagnostics buckets.
    pub(crate) fn assemble(&mut self, row: &RawLexeme) -> Result<Vec<Lexeme>, AssemblyError> {
        let mut stored = Vec::new();

        for candidate in self.splitter.split(row, &row.value) {
            if candidate.is_empty() {
                continue;
            }
            if candidate != row.value {
                tracing::debug!(value = %row.value, form = %candidate, "split value");
            }

            let cleaned = self.cleaner.clean(row, &candidate);
            if cleaned != candidate {
                tracing::debug!(form = %candidate, cleaned = %cleaned, "cleaned form");
            }
            let form = cleaned.trim().to_string();
            if form.is_empty() {
                continue;
            }

            // Caller-supplied segments win over the tokenizer.
            let segments = if row.segments.is_empty() {
                match self.tokenizer {
                    Some(tokenizer) => tokenizer.tokenize(row, &form),
                    None => Vec::new(),
                }
            } else {
                row.segments.clone()
            };

            let lexeme = self
                .forms
                .insert(Lexeme {
                    id: self.ids.next_form_id(),
                    local_id: row.local_id.clone(),
                    language_id: row.language_id.clone(),
                    parameter_id: row.parameter_id.clone(),
                    value: row.value.clone(),
                    form,
                    segments,
                    comment: row.comment.clone(),
                    source: row.source.clone(),
                    loan: row.loan,
                    extra: row.extra.clone(),
                })?
                .clone();
            self.diagnostics.count_lexeme();

            if !lexeme.segments.is_empty() {
                self.analyze_stored(&lexeme)?;
            }

            stored.push(lexeme);
        }

        Ok(stored)
    }

    fn analyze_stored(&mut self, lexeme: &Lexeme) -> Result<(), AssemblyError> {
        let state = self
            .analysis
            .entry(lexeme.language_id.clone())
            .or_default();

        match self.analyzer.analyze(&lexeme.segments, state) {
            Ok(analysis) => {
                state.analyzed_forms += 1;
                if analysis.needs_review() {
                    self.diagnostics.flag(lexeme.clone());
                }
                Ok(())
            }
            Err(AnalysisError::MalformedSegments(reason)) => {
                state.malformed_forms += 1;
                tracing::warn!(
                    form = %lexeme.form,
                    language = %lexeme.language_id,
                    %reason,
                    "segments not analyzable, form kept and marked invalid"
                );
                self.diagnostics.mark_invalid(lexeme.clone());
                Ok(())
            }
            Err(err @ AnalysisError::Contract(_)) => {
                tracing::error!(
                    form = %lexeme.form,
                    language = %lexeme.language_id,
                    "analyzer contract violation, aborting"
                );
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::forms::FormPolicy;
    use crate::pipeline::segments::{InventoryAnalyzer, SegmentAnalysis, SoundKind};

    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn tokenize(&self, _row: &RawLexeme, form: &str) -> Vec<String> {
            form.chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect()
        }
    }

    struct BrokenAnalyzer;

    impl SegmentAnalyzer for BrokenAnalyzer {
        fn analyze(
            &self,
            _segments: &[String],
            _state: &mut AnalysisState,
        ) -> Result<SegmentAnalysis, AnalysisError> {
            Err(AnalysisError::Contract("reference data corrupt".to_string()))
        }
    }

    fn analyzer() -> InventoryAnalyzer {
        let mut analyzer = InventoryAnalyzer::new();
        for (consonant, code) in [("t", "T"), ("g", "G"), ("w", "W"), ("l", "L"), ("k", "K")] {
            analyzer = analyzer.with_sound(consonant, SoundKind::Consonant, code);
        }
        for vowel in ["a", "e", "i", "o"] {
            analyzer = analyzer.with_sound(vowel, SoundKind::Vowel, "V");
        }
        analyzer
    }

    struct Fixture {
        policy: FormPolicy,
        analyzer: InventoryAnalyzer,
        ids: IdSequence,
        forms: RecordTable<Lexeme>,
        diagnostics: AssemblyDiagnostics,
        analysis: BTreeMap<String, AnalysisState>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                policy: FormPolicy::default(),
                analyzer: analyzer(),
                ids: IdSequence::new(),
                forms: RecordTable::new(),
                diagnostics: AssemblyDiagnostics::new(),
                analysis: BTreeMap::new(),
            }
        }

        fn assemble(&mut self, row: &RawLexeme) -> Result<Vec<Lexeme>, AssemblyError> {
            LexemePipeline {
                splitter: &self.policy,
                cleaner: &self.policy,
                tokenizer: Some(&CharTokenizer),
                analyzer: &self.analyzer,
                ids: &mut self.ids,
                forms: &mut self.forms,
                diagnostics: &mut self.diagnostics,
                analysis: &mut self.analysis,
            }
            .assemble(row)
        }
    }

    #[test]
    fn multi_form_value_yields_one_lexeme_per_candidate() {
        let mut fx = Fixture::new();
        let lexemes = fx
            .assemble(&RawLexeme::new("l1", "c1", "to go; to walk"))
            .unwrap();

        assert_eq!(lexemes.len(), 2);
        assert_eq!(lexemes[0].id, "1");
        assert_eq!(lexemes[1].id, "2");
        assert_eq!(lexemes[0].form, "to go");
        assert_eq!(lexemes[1].form, "to walk");
        assert_eq!(lexemes[0].value, "to go; to walk");
        assert_eq!(lexemes[1].value, "to go; to walk");
        assert_eq!(fx.forms.len(), 2);
    }

    #[test]
    fn empty_candidates_are_dropped() {
        let mut fx = Fixture::new();
        let lexemes = fx.assemble(&RawLexeme::new("l1", "c1", "?; walk")).unwrap();
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes[0].form, "walk");
        assert_eq!(lexemes[0].id, "1");
    }

    #[test]
    fn identifiers_continue_across_rows() {
        let mut fx = Fixture::new();
        fx.assemble(&RawLexeme::new("l1", "c1", "go")).unwrap();
        let lexemes = fx.assemble(&RawLexeme::new("l1", "c2", "walk")).unwrap();
        assert_eq!(lexemes[0].id, "2");
    }

    #[test]
    fn without_tokenizer_segments_stay_empty() {
        let mut fx = Fixture::new();
        let lexemes = LexemePipeline {
            splitter: &fx.policy,
            cleaner: &fx.policy,
            tokenizer: None,
            analyzer: &fx.analyzer,
            ids: &mut fx.ids,
            forms: &mut fx.forms,
            diagnostics: &mut fx.diagnostics,
            analysis: &mut fx.analysis,
        }
        .assemble(&RawLexeme::new("l1", "c1", "walk"))
        .unwrap();

        assert!(lexemes[0].segments.is_empty());
        assert!(fx.analysis.is_empty());
    }

    #[test]
    fn caller_segments_override_the_tokenizer() {
        let mut fx = Fixture::new();
        let mut row = RawLexeme::new("l1", "c1", "walk");
        row.segments = vec!["w".to_string(), "alk".to_string()];
        let lexemes = fx.assemble(&row).unwrap();
        assert_eq!(lexemes[0].segments, vec!["w", "alk"]);
    }

    #[test]
    fn unknown_sound_goes_to_the_flagged_bucket() {
        let mut fx = Fixture::new();
        let lexemes = fx.assemble(&RawLexeme::new("l1", "c1", "tax")).unwrap();

        assert_eq!(fx.diagnostics.flagged().len(), 1);
        assert_eq!(fx.diagnostics.flagged()[0].id, lexemes[0].id);
        assert!(fx.diagnostics.invalid().is_empty());
        assert_eq!(fx.forms.len(), 1, "flagged form stays in the store");
        assert!(fx.analysis["l1"].unknown_segments.contains("x"));
    }

    #[test]
    fn malformed_segments_mark_the_form_invalid_but_keep_it() {
        let mut fx = Fixture::new();
        let mut row = RawLexeme::new("l1", "c1", "walk");
        row.segments = vec!["wa lk".to_string()];
        fx.assemble(&row).unwrap();

        assert_eq!(fx.diagnostics.invalid().len(), 1);
        assert!(fx.diagnostics.flagged().is_empty());
        assert_eq!(fx.forms.len(), 1, "invalid form stays in the store");
        assert_eq!(fx.analysis["l1"].malformed_forms, 1);
        assert_eq!(fx.analysis["l1"].analyzed_forms, 0);
    }

    #[test]
    fn contract_violation_aborts_assembly() {
        let mut fx = Fixture::new();
        let result = LexemePipeline {
            splitter: &fx.policy,
            cleaner: &fx.policy,
            tokenizer: Some(&CharTokenizer),
            analyzer: &BrokenAnalyzer,
            ids: &mut fx.ids,
            forms: &mut fx.forms,
            diagnostics: &mut fx.diagnostics,
            analysis: &mut fx.analysis,
        }
        .assemble(&RawLexeme::new("l1", "c1", "walk"));

        assert!(matches!(result, Err(AssemblyError::Analysis(_))));
    }

    #[test]
    fn row_metadata_is_copied_onto_each_lexeme() {
        let mut fx = Fixture::new();
        let mut row = RawLexeme::new("l1", "c1", "go; walk");
        row.comment = Some("elicited".to_string());
        row.source = vec!["meier1979".to_string()];
        row.loan = Some(false);
        let lexemes = fx.assemble(&row).unwrap();

        for lexeme in &lexemes {
            assert_eq!(lexeme.comment.as_deref(), Some("elicited"));
            assert_eq!(lexeme.source, vec!["meier1979"]);
            assert_eq!(lexeme.loan, Some(false));
        }
    }
}
