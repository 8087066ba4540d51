pub mod cognate;
pub mod concept;
pub mod language;
pub mod lexeme;

pub use cognate::*;
pub use concept::*;
pub use language::*;
pub use lexeme::*;

use std::collections::BTreeMap;

/// The four record tables a finished dataset is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Forms,
    Cognates,
    Languages,
    Parameters,
}

impl TableKind {
    /// Component name used in the metadata document.
    pub fn component(&self) -> &'static str {
        match self {
            TableKind::Forms => "FormTable",
            TableKind::Cognates => "CognateTable",
            TableKind::Languages => "LanguageTable",
            TableKind::Parameters => "ParameterTable",
        }
    }

    /// File the table is written to, relative to the dataset directory.
    pub fn filename(&self) -> &'static str {
        match self {
            TableKind::Forms => "forms.csv",
            TableKind::Cognates => "cognates.csv",
            TableKind::Languages => "languages.csv",
            TableKind::Parameters => "parameters.csv",
        }
    }
}

/// Common surface of the four record types, used by the store and the writer.
///
/// `field` renders a declared column for CSV output (list-valued columns are
/// joined here); anything the declared schema does not cover lives in `extra`
/// and becomes an additional string column at write time.
pub trait Record: Clone {
    /// Table this record type belongs to.
    const TABLE: TableKind;

    /// The record identifier, stringified.
    fn id(&self) -> String;

    /// Identifier-valued columns subject to the identifier pattern check,
    /// as `(column, value)` pairs.
    fn identifier_fields(&self) -> Vec<(&'static str, String)>;

    /// Declared column names, in output order.
    fn declared_fields() -> &'static [&'static str];

    /// Render a declared column for output. `None` for undeclared names.
    fn field(&self, name: &str) -> Option<String>;

    /// Free-form columns outside the declared schema.
    fn extra(&self) -> &BTreeMap<String, String>;
}

/// Render an optional value as a CSV cell, empty when unset.
pub(crate) fn opt_cell(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Render an optional boolean the way the metadata document declares it.
pub(crate) fn bool_cell(value: Option<bool>) -> String {
    match value {
        Some(true) => "true".to_string(),
        Some(false) => "false".to_string(),
        None => String::new(),
    }
}
