use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Record;

use super::StoreError;

/// Identifiers are restricted to ASCII letters, digits, underscore and
/// hyphen, with no length limit.
static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Whether a value is usable as a record identifier.
pub fn is_valid_id(value: &str) -> bool {
    ID_PATTERN.is_match(value)
}

/// Append-only table of one record type with a unique-identifier index.
///
/// Insertion order is preserved. The first record stored under an ID wins;
/// later inserts with the same ID are dropped and the earlier record is
/// handed back instead.
#[derive(Debug)]
pub struct RecordTable<R: Record> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R: Record> Default for RecordTable<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: Record> RecordTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate identifier columns and insert unless the ID is already
    /// taken. Returns the record stored under the ID after the call.
    ///
    /// A malformed identifier aborts before anything is stored.
    pub fn insert(&mut self, record: R) -> Result<&R, StoreError> {
        for (column, value) in record.identifier_fields() {
            if !is_valid_id(&value) {
                return Err(StoreError::InvalidId {
                    table: R::TABLE.component(),
                    column,
                    value,
                });
            }
        }

        let id = record.id();
        if let Some(&at) = self.index.get(&id) {
            tracing::debug!(
                table = R::TABLE.component(),
                id = %id,
                "duplicate identifier, keeping the first record"
            );
            return Ok(&self.records[at]);
        }

        let at = self.records.len();
        self.index.insert(id, at);
        self.records.push(record);
        Ok(&self.records[at])
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&at| &self.records[at])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// All records, in insertion order.
    pub fn records(&self) -> &[R] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Language, Lexeme};
    use std::collections::BTreeMap;

    fn make_lexeme(id: &str, form: &str) -> Lexeme {
        Lexeme {
            id: id.to_string(),
            local_id: None,
            language_id: "l1".to_string(),
            parameter_id: "c1".to_string(),
            value: form.to_string(),
            form: form.to_string(),
            segments: Vec::new(),
            comment: None,
            source: Vec::new(),
            loan: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn insert_accepts_pattern_conforming_ids() {
        let mut table = RecordTable::new();
        assert!(table.insert(make_lexeme("abc_01-X", "hand")).is_ok());
        assert!(table.contains("abc_01-X"));
    }

    #[test]
    fn duplicate_id_keeps_first_record() {
        let mut table = RecordTable::new();
        table.insert(make_lexeme("1", "first")).unwrap();
        let stored = table.insert(make_lexeme("1", "second")).unwrap();
        assert_eq!(stored.form, "first");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("1").unwrap().form, "first");
    }

    #[test]
    fn malformed_id_rejected_and_nothing_stored() {
        let mut table = RecordTable::new();
        let err = table.insert(make_lexeme("bad id!", "hand")).unwrap_err();
        match err {
            StoreError::InvalidId { table, column, value } => {
                assert_eq!(table, "FormTable");
                assert_eq!(column, "ID");
                assert_eq!(value, "bad id!");
            }
        }
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_reference_id_names_its_column() {
        let mut table = RecordTable::new();
        let mut lexeme = make_lexeme("1", "hand");
        lexeme.language_id = "l un".to_string();
        let err = table.insert(lexeme).unwrap_err();
        match err {
            StoreError::InvalidId { column, .. } => assert_eq!(column, "Language_ID"),
        }
        assert!(table.is_empty());
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let mut table: RecordTable<Language> = RecordTable::new();
        assert!(table.insert(Language::new("")).is_err());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut table = RecordTable::new();
        table.insert(make_lexeme("b", "two")).unwrap();
        table.insert(make_lexeme("a", "one")).unwrap();
        let ids: Vec<_> = table.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
