// The assembly session: one dataset build from raw rows to a written
// dataset directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::info;

use crate::catalogs::{Concepticon, Glottolog};
use crate::config::DatasetInfo;
use crate::models::{Cognate, Concept, Language, Lexeme, RawCognate, RawLexeme};
use crate::pipeline::lexemes::LexemePipeline;
use crate::pipeline::{
    build_cognate, concept_from_entry, entries_from_rows, with_gloss_backfilled,
    with_glottocode_backfilled, AnalysisState, AssemblyDiagnostics, AssemblyError, ConceptEntry,
    ConceptSource, FormCleaner, FormPolicy, FormSplitter, SegmentAnalyzer, Tokenizer,
};
use crate::sources::{Source, Sources};
use crate::store::{finalized_tables, FinalTables, IdSequence, RecordStore};
use crate::writer::{write_dataset, WriteReport};

/// What a finished session produced: the write report plus the diagnostics
/// and per-language analysis accumulated along the way.
#[derive(Debug)]
pub struct AssemblyOutcome {
    pub report: WriteReport,
    pub diagnostics: AssemblyDiagnostics,
    pub analysis: BTreeMap<String, AnalysisState>,
}

/// A dataset build in progress.
///
/// The session owns the record store, the identifier counters and the
/// collaborators raw material passes through. Records go in through the
/// `add_*` methods in any order; [`AssemblySession::finish`] prunes,
/// writes and closes the build. Counters and stored records never leak
/// between sessions.
pub struct AssemblySession {
    info: DatasetInfo,
    glottolog: Glottolog,
    concepticon: Concepticon,
    splitter: Box<dyn FormSplitter>,
    cleaner: Box<dyn FormCleaner>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    analyzer: Box<dyn SegmentAnalyzer>,
    ids: IdSequence,
    store: RecordStore,
    diagnostics: AssemblyDiagnostics,
    analysis: BTreeMap<String, AnalysisState>,
    sources: Sources,
}

impl AssemblySession {
    /// Open a session against pinned catalog releases.
    ///
    /// Splitting and cleaning start from [`FormPolicy::default`]; datasets
    /// with their own orthographic conventions swap in what they need.
    pub fn new(
        info: DatasetInfo,
        glottolog: Glottolog,
        concepticon: Concepticon,
        analyzer: impl SegmentAnalyzer + 'static,
    ) -> Self {
        Self {
            info,
            glottolog,
            concepticon,
            splitter: Box::new(FormPolicy::default()),
            cleaner: Box::new(FormPolicy::default()),
            tokenizer: None,
            analyzer: Box::new(analyzer),
            ids: IdSequence::new(),
            store: RecordStore::new(),
            diagnostics: AssemblyDiagnostics::new(),
            analysis: BTreeMap::new(),
            sources: Sources::new(),
        }
    }

    pub fn with_splitter(mut self, splitter: impl FormSplitter + 'static) -> Self {
        self.splitter = Box::new(splitter);
        self
    }

    pub fn with_cleaner(mut self, cleaner: impl FormCleaner + 'static) -> Self {
        self.cleaner = Box::new(cleaner);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Run one raw row through the lexeme pipeline. A row yields several
    /// lexemes when its value cell holds more than one form.
    pub fn add_lexemes(&mut self, row: &RawLexeme) -> Result<Vec<Lexeme>, AssemblyError> {
        LexemePipeline {
            splitter: self.splitter.as_ref(),
            cleaner: self.cleaner.as_ref(),
            tokenizer: self.tokenizer.as_deref(),
            analyzer: self.analyzer.as_ref(),
            ids: &mut self.ids,
            forms: &mut self.store.forms,
            diagnostics: &mut self.diagnostics,
            analysis: &mut self.analysis,
        }
        .assemble(row)
    }

    /// Attach a cognacy judgement to a lexeme. The form link defaults from
    /// the lexeme and the identifier from the session counter; explicit
    /// values in `raw` win.
    pub fn add_cognate(
        &mut self,
        lexeme: Option<&Lexeme>,
        raw: RawCognate,
    ) -> Result<Cognate, AssemblyError> {
        let cognate = build_cognate(lexeme, raw, &mut self.ids);
        Ok(self.store.cognates.insert(cognate)?.clone())
    }

    /// Store one language as given. Re-adding an identifier keeps the
    /// first record.
    pub fn add_language(&mut self, language: Language) -> Result<Language, AssemblyError> {
        Ok(self.store.languages.insert(language)?.clone())
    }

    /// Store a batch of languages. Missing glottocodes are backfilled from
    /// the catalog before `id_factory` assigns identifiers. Returns the
    /// distinct identifiers assigned.
    pub fn add_languages(
        &mut self,
        languages: Vec<Language>,
        id_factory: impl Fn(&Language) -> String,
    ) -> Result<BTreeSet<String>, AssemblyError> {
        let mut assigned = BTreeSet::new();
        for language in languages {
            let mut language = with_glottocode_backfilled(language, &self.glottolog);
            language.id = id_factory(&language);
            assigned.insert(self.add_language(language)?.id.clone());
        }
        Ok(assigned)
    }

    /// Store one concept. A record that links to the concept catalog but
    /// carries no gloss gets the catalog gloss.
    pub fn add_concept(&mut self, concept: Concept) -> Result<Concept, AssemblyError> {
        let concept = with_gloss_backfilled(concept, &self.concepticon);
        Ok(self.store.parameters.insert(concept)?.clone())
    }

    /// Store every concept of a source. Curated catalog lists are taken
    /// as-is; raw descriptor rows are converted to entries first. Returns
    /// the distinct identifiers assigned.
    pub fn add_concepts(
        &mut self,
        source: &ConceptSource,
        id_factory: impl Fn(&ConceptEntry) -> String,
    ) -> Result<BTreeSet<String>, AssemblyError> {
        let entries = match source {
            ConceptSource::Catalog(list) => list.entries.clone(),
            ConceptSource::Rows(rows) => entries_from_rows(rows),
        };

        let mut assigned = BTreeSet::new();
        for entry in &entries {
            let concept = concept_from_entry(entry, id_factory(entry));
            assigned.insert(self.add_concept(concept)?.id.clone());
        }
        Ok(assigned)
    }

    /// Register bibliography entries. The first entry per identifier wins.
    pub fn add_sources(&mut self, sources: impl IntoIterator<Item = Source>) {
        self.sources.extend(sources);
    }

    pub fn sources_mut(&mut self) -> &mut Sources {
        &mut self.sources
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn diagnostics(&self) -> &AssemblyDiagnostics {
        &self.diagnostics
    }

    pub fn analysis(&self) -> &BTreeMap<String, AnalysisState> {
        &self.analysis
    }

    /// The tables as they would be written now, unreferenced languages and
    /// concepts pruned.
    pub fn finalized(&self) -> FinalTables {
        finalized_tables(&self.store)
    }

    /// Prune, write and close the session.
    pub fn finish(self, out_dir: &Path) -> Result<AssemblyOutcome, AssemblyError> {
        let tables = finalized_tables(&self.store);
        let report = write_dataset(
            out_dir,
            &self.info,
            &tables,
            &self.sources,
            self.glottolog.version(),
            self.concepticon.version(),
        )?;

        let (ratio, band) = self.diagnostics.coverage();
        info!(
            dataset = %self.info.id,
            forms = report.forms,
            cognates = report.cognates,
            languages = report.languages,
            parameters = report.parameters,
            clean_ratio = ratio,
            coverage = band.label(),
            "dataset written"
        );

        Ok(AssemblyOutcome {
            report,
            diagnostics: self.diagnostics,
            analysis: self.analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{InventoryAnalyzer, SoundKind};
    use crate::writer::{validate_dataset, METADATA_FILENAME, SOURCES_FILENAME};

    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn tokenize(&self, _row: &RawLexeme, form: &str) -> Vec<String> {
            form.chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect()
        }
    }

    fn analyzer() -> InventoryAnalyzer {
        let mut analyzer = InventoryAnalyzer::new();
        for letter in "bdfghklnrstw".chars() {
            analyzer = analyzer.with_sound(&letter.to_string(), SoundKind::Consonant, "C");
        }
        for letter in "aeiou".chars() {
            analyzer = analyzer.with_sound(&letter.to_string(), SoundKind::Vowel, "V");
        }
        analyzer
    }

    fn session() -> AssemblySession {
        AssemblySession::new(
            DatasetInfo::new("testset").with_title("Test Set"),
            Glottolog::new("v5.0")
                .map_iso("eng", "stan1293")
                .map_iso("deu", "stan1295"),
            Concepticon::new("v3.2").map_gloss("1277", "HAND"),
            analyzer(),
        )
        .with_tokenizer(CharTokenizer)
    }

    fn english(id: &str) -> Language {
        let mut language = Language::new(id);
        language.name = Some("English".to_string());
        language.iso639p3code = Some("eng".to_string());
        language
    }

    fn row(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── Intake ──

    #[test]
    fn multi_form_value_yields_numbered_lexemes() {
        let mut session = session();
        let lexemes = session
            .add_lexemes(&RawLexeme::new("l1", "c1", "to go; to walk"))
            .unwrap();

        assert_eq!(lexemes.len(), 2);
        assert_eq!(lexemes[0].id, "1");
        assert_eq!(lexemes[1].id, "2");
        assert_eq!(session.store().forms.len(), 2);
    }

    #[test]
    fn invalid_identifier_stores_nothing() {
        let mut session = session();
        let result = session.add_lexemes(&RawLexeme::new("bad lang", "c1", "hand"));

        assert!(matches!(result, Err(AssemblyError::Store(_))));
        assert!(session.store().forms.is_empty());
    }

    #[test]
    fn batch_language_intake_backfills_glottocodes() {
        let mut session = session();
        let assigned = session
            .add_languages(vec![english("")], |l| {
                l.iso639p3code.clone().unwrap_or_default()
            })
            .unwrap();

        assert_eq!(assigned, BTreeSet::from(["eng".to_string()]));
        let stored = session.store().languages.get("eng").unwrap();
        assert_eq!(stored.glottocode.as_deref(), Some("stan1293"));
    }

    #[test]
    fn single_language_intake_stores_as_given() {
        let mut session = session();
        session.add_language(english("l1")).unwrap();
        assert!(session.store().languages.get("l1").unwrap().glottocode.is_none());
    }

    #[test]
    fn duplicate_language_keeps_the_first_record() {
        let mut session = session();
        session.add_language(english("l1")).unwrap();

        let mut other = english("l1");
        other.name = Some("Englisch".to_string());
        let stored = session.add_language(other).unwrap();

        assert_eq!(stored.name.as_deref(), Some("English"));
        assert_eq!(session.store().languages.len(), 1);
    }

    #[test]
    fn cognate_links_default_from_the_lexeme() {
        let mut session = session();
        let lexemes = session
            .add_lexemes(&RawLexeme::new("l1", "c1", "hand"))
            .unwrap();
        let cognate = session
            .add_cognate(Some(&lexemes[0]), RawCognate::new("hand-1"))
            .unwrap();

        assert_eq!(cognate.id, 1);
        assert_eq!(cognate.form_id.as_deref(), Some("1"));
        assert_eq!(cognate.form.as_deref(), Some("hand"));
    }

    #[test]
    fn explicit_cognate_id_skips_the_counter() {
        let mut session = session();
        let mut raw = RawCognate::new("hand-1");
        raw.id = Some(10);

        assert_eq!(session.add_cognate(None, raw).unwrap().id, 10);
        assert_eq!(
            session.add_cognate(None, RawCognate::new("foot-1")).unwrap().id,
            1
        );
    }

    #[test]
    fn concepts_from_rows_get_positions_and_catalog_glosses() {
        let mut session = session();
        let source = ConceptSource::Rows(vec![
            row(&[("Label", "hand"), ("Concepticon_ID", "1277")]),
            row(&[("Label", "foot")]),
        ]);
        let assigned = session
            .add_concepts(&source, |e| e.number.clone())
            .unwrap();

        assert_eq!(
            assigned,
            BTreeSet::from(["1".to_string(), "2".to_string()])
        );
        let hand = session.store().parameters.get("1").unwrap();
        assert_eq!(hand.name.as_deref(), Some("hand"));
        assert_eq!(hand.concepticon_gloss.as_deref(), Some("HAND"));
        assert!(session.store().parameters.get("2").unwrap().concepticon_gloss.is_none());
    }

    #[test]
    fn counters_are_scoped_to_a_session() {
        let mut first = session();
        first.add_lexemes(&RawLexeme::new("l1", "c1", "hand")).unwrap();

        let mut second = session();
        let lexemes = second
            .add_lexemes(&RawLexeme::new("l1", "c1", "foot"))
            .unwrap();
        assert_eq!(lexemes[0].id, "1");
    }

    #[test]
    fn later_source_with_the_same_id_is_dropped() {
        let mut session = session();
        session.add_sources([
            Source::new("book", "meier1979").with_field("title", "First Title"),
            Source::new("book", "meier1979").with_field("title", "Second Title"),
        ]);

        let bibtex = session.sources_mut().bibtex();
        assert!(bibtex.contains("First Title"));
        assert!(!bibtex.contains("Second Title"));
    }

    // ── Finishing ──

    #[test]
    fn finalized_prunes_unreferenced_records() {
        let mut session = session();
        session.add_language(Language::new("l1")).unwrap();
        session.add_language(Language::new("l2")).unwrap();
        session.add_concept(Concept::new("c1")).unwrap();
        session.add_lexemes(&RawLexeme::new("l1", "c1", "hand")).unwrap();

        let tables = session.finalized();
        assert_eq!(tables.languages.len(), 1);
        assert_eq!(tables.languages[0].id, "l1");
        assert_eq!(tables.parameters.len(), 1);
    }

    #[test]
    fn finish_writes_a_complete_dataset_that_validates() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        session
            .add_languages(vec![english("")], |l| {
                l.iso639p3code.clone().unwrap_or_default()
            })
            .unwrap();
        let mut concept = Concept::new("c1");
        concept.concepticon_id = Some("1277".to_string());
        session.add_concept(concept).unwrap();
        let lexemes = session
            .add_lexemes(&RawLexeme::new("eng", "c1", "hand"))
            .unwrap();
        session
            .add_cognate(Some(&lexemes[0]), RawCognate::new("hand-1"))
            .unwrap();
        session.add_sources([Source::new("book", "meier1979")
            .with_field("title", "Comparative Wordlists")]);

        let outcome = session.finish(dir.path()).unwrap();

        assert_eq!(outcome.report.forms, 1);
        assert_eq!(outcome.report.cognates, 1);
        assert_eq!(outcome.report.languages, 1);
        assert_eq!(outcome.report.parameters, 1);
        assert_eq!(outcome.report.sources, 1);
        for file in [
            "forms.csv",
            "cognates.csv",
            "languages.csv",
            "parameters.csv",
            METADATA_FILENAME,
            SOURCES_FILENAME,
        ] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }

        let mut problems = Vec::new();
        let count = validate_dataset(dir.path(), &outcome.report.schemas, &mut problems).unwrap();
        assert_eq!(problems, Vec::new());
        assert_eq!(count, 0);

        let metadata: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(METADATA_FILENAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(
            metadata.pointer("/notes/0/properties/glottolog_version"),
            Some(&serde_json::json!("v5.0"))
        );
        assert_eq!(metadata["rdf:ID"], serde_json::json!("testset"));
    }

    #[test]
    fn extra_fields_become_extension_columns() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session();
        session.add_language(english("l1")).unwrap();
        session.add_concept(Concept::new("c1")).unwrap();
        let mut raw = RawLexeme::new("l1", "c1", "hand");
        raw.extra.insert("Phonetic".to_string(), "hænd".to_string());
        session.add_lexemes(&raw).unwrap();

        let outcome = session.finish(dir.path()).unwrap();
        assert!(outcome.report.schemas.forms.has_column("Phonetic"));

        let forms = std::fs::read_to_string(dir.path().join("forms.csv")).unwrap();
        let header = forms.lines().next().unwrap();
        assert!(header.ends_with(",Phonetic"));
        assert!(forms.lines().nth(1).unwrap().ends_with(",hænd"));

        let mut problems = Vec::new();
        let count = validate_dataset(dir.path(), &outcome.report.schemas, &mut problems).unwrap();
        assert_eq!(count, 0, "{problems:?}");
    }
}
