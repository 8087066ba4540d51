// Table schemas: declared columns, datatypes and cross-table references,
// plus schema extension for the free-form extra fields records carry.

use crate::models::{Record, TableKind};
use crate::store::FinalTables;

/// Column datatypes, named the way the metadata document declares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Datatype {
    String,
    Integer,
    Decimal,
    Boolean,
}

impl Datatype {
    pub fn name(&self) -> &'static str {
        match self {
            Datatype::String => "string",
            Datatype::Integer => "integer",
            Datatype::Decimal => "decimal",
            Datatype::Boolean => "boolean",
        }
    }

    /// Whether a non-empty cell value inhabits the datatype.
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Datatype::String => true,
            Datatype::Integer => raw.parse::<i64>().is_ok(),
            Datatype::Decimal => raw.parse::<f64>().is_ok(),
            Datatype::Boolean => raw == "true" || raw == "false",
        }
    }
}

/// One declared column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub datatype: Datatype,
    pub required: bool,
    /// List-valued columns carry their separator.
    pub separator: Option<&'static str>,
    /// Property term the column implements, when it has one.
    pub term: Option<&'static str>,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            datatype,
            required: false,
            separator: None,
            term: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn separated(mut self, separator: &'static str) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn term(mut self, term: &'static str) -> Self {
        self.term = Some(term);
        self
    }
}

/// A column referencing another table's ID column.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub target_table: &'static str,
    pub target_column: &'static str,
}

/// Schema of one table.
#[derive(Debug, Clone)]
pub struct TableSpec {
    pub kind: TableKind,
    pub columns: Vec<ColumnSpec>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSpec {
    pub fn forms() -> Self {
        Self {
            kind: TableKind::Forms,
            columns: vec![
                ColumnSpec::new("ID", Datatype::String).required().term("id"),
                ColumnSpec::new("Local_ID", Datatype::String),
                ColumnSpec::new("Language_ID", Datatype::String)
                    .required()
                    .term("languageReference"),
                ColumnSpec::new("Parameter_ID", Datatype::String)
                    .required()
                    .term("parameterReference"),
                ColumnSpec::new("Value", Datatype::String).required().term("value"),
                ColumnSpec::new("Form", Datatype::String).term("form"),
                ColumnSpec::new("Segments", Datatype::String)
                    .separated(" ")
                    .term("segments"),
                ColumnSpec::new("Comment", Datatype::String).term("comment"),
                ColumnSpec::new("Source", Datatype::String)
                    .separated(";")
                    .term("source"),
                ColumnSpec::new("Loan", Datatype::Boolean),
            ],
            foreign_keys: vec![
                ForeignKey {
                    column: "Language_ID",
                    target_table: "languages.csv",
                    target_column: "ID",
                },
                ForeignKey {
                    column: "Parameter_ID",
                    target_table: "parameters.csv",
                    target_column: "ID",
                },
            ],
        }
    }

    pub fn cognates() -> Self {
        Self {
            kind: TableKind::Cognates,
            columns: vec![
                ColumnSpec::new("ID", Datatype::Integer).required().term("id"),
                ColumnSpec::new("Form_ID", Datatype::String).term("formReference"),
                ColumnSpec::new("Form", Datatype::String),
                ColumnSpec::new("Cognateset_ID", Datatype::String)
                    .required()
                    .term("cognatesetReference"),
                ColumnSpec::new("Doubt", Datatype::Boolean),
                ColumnSpec::new("Cognate_Detection_Method", Datatype::String),
                ColumnSpec::new("Source", Datatype::String)
                    .separated(";")
                    .term("source"),
                ColumnSpec::new("Alignment", Datatype::String)
                    .separated(" ")
                    .term("alignment"),
            ],
            foreign_keys: vec![ForeignKey {
                column: "Form_ID",
                target_table: "forms.csv",
                target_column: "ID",
            }],
        }
    }

    pub fn languages() -> Self {
        Self {
            kind: TableKind::Languages,
            columns: vec![
                ColumnSpec::new("ID", Datatype::String).required().term("id"),
                ColumnSpec::new("Name", Datatype::String).term("name"),
                ColumnSpec::new("ISO639P3code", Datatype::String).term("iso639P3code"),
                ColumnSpec::new("Glottocode", Datatype::String).term("glottocode"),
                ColumnSpec::new("Macroarea", Datatype::String).term("macroarea"),
                ColumnSpec::new("Latitude", Datatype::Decimal).term("latitude"),
                ColumnSpec::new("Longitude", Datatype::Decimal).term("longitude"),
                ColumnSpec::new("Family", Datatype::String),
            ],
            foreign_keys: Vec::new(),
        }
    }

    pub fn parameters() -> Self {
        Self {
            kind: TableKind::Parameters,
            columns: vec![
                ColumnSpec::new("ID", Datatype::String).required().term("id"),
                ColumnSpec::new("Name", Datatype::String).term("name"),
                ColumnSpec::new("Concepticon_ID", Datatype::String).term("concepticonReference"),
                ColumnSpec::new("Concepticon_Gloss", Datatype::String),
            ],
            foreign_keys: Vec::new(),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append a plain string column for every extra field the records carry
    /// that the schema does not declare. Extension columns come after the
    /// declared ones and are added once, however many records carry them.
    pub fn extend_for<R: Record>(&mut self, records: &[R]) {
        for record in records {
            for name in record.extra().keys() {
                if !self.has_column(name) {
                    self.columns.push(ColumnSpec::new(name.clone(), Datatype::String));
                }
            }
        }
    }
}

/// The four table schemas of a dataset.
#[derive(Debug, Clone)]
pub struct TableSchemas {
    pub forms: TableSpec,
    pub cognates: TableSpec,
    pub languages: TableSpec,
    pub parameters: TableSpec,
}

impl TableSchemas {
    pub fn new() -> Self {
        Self {
            forms: TableSpec::forms(),
            cognates: TableSpec::cognates(),
            languages: TableSpec::languages(),
            parameters: TableSpec::parameters(),
        }
    }

    /// Extend every table's schema with the extra fields its records carry.
    pub fn extend_from(&mut self, tables: &FinalTables) {
        self.forms.extend_for(&tables.forms);
        self.cognates.extend_for(&tables.cognates);
        self.languages.extend_for(&tables.languages);
        self.parameters.extend_for(&tables.parameters);
    }

    pub fn all(&self) -> [&TableSpec; 4] {
        [&self.forms, &self.cognates, &self.languages, &self.parameters]
    }
}

impl Default for TableSchemas {
    fn default() -> Self {
        Self::new()
    }
}
