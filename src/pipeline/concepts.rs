// Concept intake: curated catalog lists, ad-hoc descriptor rows and the
// catalog gloss backfill.

use std::collections::BTreeMap;

use crate::catalogs::Concepticon;
use crate::models::Concept;

/// One concept of a concept list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConceptEntry {
    pub id: String,
    pub number: String,
    pub label: String,
    pub concepticon_id: Option<String>,
    pub concepticon_gloss: Option<String>,
    /// Descriptor fields outside the entry schema, carried onto the record.
    pub attributes: BTreeMap<String, String>,
}

/// A curated concept list from the concept catalog.
#[derive(Debug, Clone, Default)]
pub struct ConceptList {
    pub id: String,
    pub entries: Vec<ConceptEntry>,
}

/// Where a dataset's concepts come from: a curated catalog list, or raw
/// descriptor rows shipped with the dataset.
#[derive(Debug, Clone)]
pub enum ConceptSource {
    Catalog(ConceptList),
    Rows(Vec<BTreeMap<String, String>>),
}

/// Convert raw descriptor rows into concept entries.
///
/// Keys matching an entry field (case-insensitively) populate that field;
/// everything else is kept as an extra attribute. Rows without an explicit
/// id or number get their 1-based position for the missing part.
pub fn entries_from_rows(rows: &[BTreeMap<String, String>]) -> Vec<ConceptEntry> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let mut entry = ConceptEntry::default();
            for (key, value) in row {
                match key.to_lowercase().as_str() {
                    "id" => entry.id = value.clone(),
                    "number" => entry.number = value.clone(),
                    "label" => entry.label = value.clone(),
                    "concepticon_id" => entry.concepticon_id = Some(value.clone()),
                    "concepticon_gloss" => entry.concepticon_gloss = Some(value.clone()),
                    _ => {
                        entry.attributes.insert(key.clone(), value.clone());
                    }
                }
            }
            let position = (i + 1).to_string();
            if entry.id.is_empty() {
                entry.id = position.clone();
            }
            if entry.number.is_empty() {
                entry.number = position;
            }
            entry
        })
        .collect()
}

/// Build the parameter record for an entry. The record ID comes from the
/// caller's id factory; the gloss is filled in later, on insertion.
pub fn concept_from_entry(entry: &ConceptEntry, id: String) -> Concept {
    Concept {
        id,
        name: (!entry.label.is_empty()).then(|| entry.label.clone()),
        concepticon_id: entry.concepticon_id.clone(),
        concepticon_gloss: entry.concepticon_gloss.clone(),
        extra: entry.attributes.clone(),
    }
}

/// Fill a missing gloss from the concept catalog. Records without a catalog
/// link, and links the catalog does not know, pass through unchanged.
pub fn with_gloss_backfilled(mut concept: Concept, concepticon: &Concepticon) -> Concept {
    if concept.concepticon_gloss.is_none() {
        if let Some(id) = concept.concepticon_id.as_deref() {
            concept.concepticon_gloss = concepticon.gloss(id).map(str::to_string);
            if concept.concepticon_gloss.is_none() {
                tracing::debug!(concepticon_id = id, "no catalog gloss for concept link");
            }
        }
    }
    concept
}
