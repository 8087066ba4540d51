use std::collections::BTreeMap;

use serde::Serialize;

use super::{bool_cell, opt_cell, Record, TableKind};

/// A single normalized word form: one row of the form table.
///
/// `value` preserves the raw source spelling of the whole input cell; `form`
/// is the cleaned variant the rest of the pipeline works with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lexeme {
    pub id: String,
    pub local_id: Option<String>,
    pub language_id: String,
    pub parameter_id: String,
    pub value: String,
    pub form: String,
    pub segments: Vec<String>,
    pub comment: Option<String>,
    pub source: Vec<String>,
    pub loan: Option<bool>,
    pub extra: BTreeMap<String, String>,
}

impl Record for Lexeme {
    const TABLE: TableKind = TableKind::Forms;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn identifier_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Language_ID", self.language_id.clone()),
            ("Parameter_ID", self.parameter_id.clone()),
        ]
    }

    fn declared_fields() -> &'static [&'static str] {
        &[
            "ID",
            "Local_ID",
            "Language_ID",
            "Parameter_ID",
            "Value",
            "Form",
            "Segments",
            "Comment",
            "Source",
            "Loan",
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ID" => Some(self.id.clone()),
            "Local_ID" => Some(opt_cell(&self.local_id)),
            "Language_ID" => Some(self.language_id.clone()),
            "Parameter_ID" => Some(self.parameter_id.clone()),
            "Value" => Some(self.value.clone()),
            "Form" => Some(self.form.clone()),
            "Segments" => Some(self.segments.join(" ")),
            "Comment" => Some(opt_cell(&self.comment)),
            "Source" => Some(self.source.join(";")),
            "Loan" => Some(bool_cell(self.loan)),
            _ => None,
        }
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Caller-supplied material for one raw value cell: the unprocessed value
/// plus everything that is copied onto each lexeme assembled from it.
///
/// When `segments` is non-empty it overrides the session tokenizer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLexeme {
    pub language_id: String,
    pub parameter_id: String,
    pub value: String,
    pub local_id: Option<String>,
    pub segments: Vec<String>,
    pub comment: Option<String>,
    pub source: Vec<String>,
    pub loan: Option<bool>,
    pub extra: BTreeMap<String, String>,
}

impl RawLexeme {
    pub fn new(
        language_id: impl Into<String>,
        parameter_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            language_id: language_id.into(),
            parameter_id: parameter_id.into(),
            value: value.into(),
            ..Self::default()
        }
    }
}
