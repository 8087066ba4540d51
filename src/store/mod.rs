pub mod finalize;
pub mod ids;
pub mod table;

pub use finalize::*;
pub use ids::*;
pub use table::*;

use thiserror::Error;

use crate::models::{Cognate, Concept, Language, Lexeme};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid identifier in {table} column {column}: {value:?}")]
    InvalidId {
        table: &'static str,
        column: &'static str,
        value: String,
    },
}

/// In-memory working set of the four record tables of a session.
#[derive(Debug, Default)]
pub struct RecordStore {
    pub forms: RecordTable<Lexeme>,
    pub cognates: RecordTable<Cognate>,
    pub languages: RecordTable<Language>,
    pub parameters: RecordTable<Concept>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}
