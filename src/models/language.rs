use std::collections::BTreeMap;

use serde::Serialize;

use super::{opt_cell, Record, TableKind};

/// A language (or variety) records are keyed against.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Language {
    pub id: String,
    pub name: Option<String>,
    pub iso639p3code: Option<String>,
    pub glottocode: Option<String>,
    pub macroarea: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub family: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl Language {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Record for Language {
    const TABLE: TableKind = TableKind::Languages;

    fn id(&self) -> String {
        self.id.clone()
    }

    fn identifier_fields(&self) -> Vec<(&'static str, String)> {
        vec![("ID", self.id.clone())]
    }

    fn declared_fields() -> &'static [&'static str] {
        &[
            "ID",
            "Name",
            "ISO639P3code",
            "Glottocode",
            "Macroarea",
            "Latitude",
            "Longitude",
            "Family",
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ID" => Some(self.id.clone()),
            "Name" => Some(opt_cell(&self.name)),
            "ISO639P3code" => Some(opt_cell(&self.iso639p3code)),
            "Glottocode" => Some(opt_cell(&self.glottocode)),
            "Macroarea" => Some(opt_cell(&self.macroarea)),
            "Latitude" => Some(self.latitude.map(|v| v.to_string()).unwrap_or_default()),
            "Longitude" => Some(self.longitude.map(|v| v.to_string()).unwrap_or_default()),
            "Family" => Some(opt_cell(&self.family)),
            _ => None,
        }
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}
