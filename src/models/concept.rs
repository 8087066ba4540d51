use std::collections::BTreeMap;

use serde::Serialize;

use super::{opt_cell, Record, TableKind};

/// A comparison concept (the parameter a form expresses), optionally linked
/// to the concept catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Concept {
    pub id: String,
    pub name: Option<String>,
    pub concepticon_id: Option<String>,
    pub concepticon_gloss: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl Concept {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Record for Concept {
    const TABLE: TableKind = TableKind::Parameters;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn identifier_fields(&self) -> Vec<(&'static str, String)> {
        vec![("ID", self.id.clone())]
    }

    fn declared_fields() -> &'static [&'static str] {
        &["ID", "Name", "Concepticon_ID", "Concepticon_Gloss"]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ID" => Some(self.id.clone()),
            "Name" => Some(opt_cell(&self.name)),
            "Concepticon_ID" => Some(opt_cell(&self.concepticon_id)),
            "Concepticon_Gloss" => Some(opt_cell(&self.concepticon_gloss)),
            _ => None,
        }
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}
