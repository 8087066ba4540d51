// Referential pruning: the step between the working store and the writer.

use std::collections::BTreeSet;

use crate::models::{Cognate, Concept, Language, Lexeme};

use super::RecordStore;

/// The pruned tables of a finished dataset, ready for the writer.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalTables {
    pub forms: Vec<Lexeme>,
    pub cognates: Vec<Cognate>,
    pub languages: Vec<Language>,
    pub parameters: Vec<Concept>,
}

/// Drop languages and parameters no form refers to.
///
/// Forms and cognates are never dropped. The store is not modified, so
/// repeated calls over the same store give the same tables.
pub fn finalized_tables(store: &RecordStore) -> FinalTables {
    let languages_in_use: BTreeSet<&str> = store
        .forms
        .iter()
        .map(|form| form.language_id.as_str())
        .collect();
    let parameters_in_use: BTreeSet<&str> = store
        .forms
        .iter()
        .map(|form| form.parameter_id.as_str())
        .collect();

    let languages: Vec<Language> = store
        .languages
        .iter()
        .filter(|language| languages_in_use.contains(language.id.as_str()))
        .cloned()
        .collect();
    let parameters: Vec<Concept> = store
        .parameters
        .iter()
        .filter(|concept| parameters_in_use.contains(concept.id.as_str()))
        .cloned()
        .collect();

    let pruned = (store.languages.len() - languages.len())
        + (store.parameters.len() - parameters.len());
    if pruned > 0 {
        tracing::debug!(pruned, "dropped records not referenced by any form");
    }

    FinalTables {
        forms: store.forms.iter().cloned().collect(),
        cognates: store.cognates.iter().cloned().collect(),
        languages,
        parameters,
    }
}
