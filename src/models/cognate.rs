use std::collections::BTreeMap;

use serde::Serialize;

use super::{opt_cell, Record, TableKind};

/// A cognacy judgement linking a form to a cognate set.
///
/// Judgements carry native integer identifiers; everything else in the
/// dataset uses string identifiers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cognate {
    pub id: u64,
    pub form_id: Option<String>,
    pub form: Option<String>,
    pub cognateset_id: String,
    pub doubt: bool,
    pub detection_method: Option<String>,
    pub source: Vec<String>,
    pub alignment: Vec<String>,
    pub extra: BTreeMap<String, String>,
}

impl Record for Cognate {
    const TABLE: TableKind = TableKind::Cognates;

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn identifier_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.to_string()),
            ("Cognateset_ID", self.cognateset_id.clone()),
        ]
    }

    fn declared_fields() -> &'static [&'static str] {
        &[
            "ID",
            "Form_ID",
            "Form",
            "Cognateset_ID",
            "Doubt",
            "Cognate_Detection_Method",
            "Source",
            "Alignment",
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "ID" => Some(self.id.to_string()),
            "Form_ID" => Some(opt_cell(&self.form_id)),
            "Form" => Some(opt_cell(&self.form)),
            "Cognateset_ID" => Some(self.cognateset_id.clone()),
            "Doubt" => Some(if self.doubt { "true" } else { "false" }.to_string()),
            "Cognate_Detection_Method" => Some(opt_cell(&self.detection_method)),
            "Source" => Some(self.source.join(";")),
            "Alignment" => Some(self.alignment.join(" ")),
            _ => None,
        }
    }

    fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Caller-supplied material for one cognacy judgement. Unset parts are
/// defaulted during assembly: the form link from the lexeme the judgement is
/// attached to, the identifier from the session counter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCognate {
    pub id: Option<u64>,
    pub form_id: Option<String>,
    pub form: Option<String>,
    pub cognateset_id: String,
    pub doubt: bool,
    pub detection_method: Option<String>,
    pub source: Vec<String>,
    pub alignment: Vec<String>,
    pub extra: BTreeMap<String, String>,
}

impl RawCognate {
    pub fn new(cognateset_id: impl Into<String>) -> Self {
        Self {
            cognateset_id: cognateset_id.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_renders_stringified() {
        let cognate = Cognate {
            id: 7,
            form_id: None,
            form: None,
            cognateset_id: "cs1".to_string(),
            doubt: false,
            detection_method: None,
            source: Vec::new(),
            alignment: Vec::new(),
            extra: BTreeMap::new(),
        };
        assert_eq!(Record::id(&cognate), "7");
        assert_eq!(cognate.field("ID"), Some("7".to_string()));
    }

    #[test]
    fn alignment_renders_space_separated() {
        let cognate = Cognate {
            id: 1,
            form_id: Some("1".to_string()),
            form: Some("hand".to_string()),
            cognateset_id: "cs1".to_string(),
            doubt: true,
            detection_method: Some("expert".to_string()),
            source: Vec::new(),
            alignment: vec!["h".into(), "a".into(), "-".into(), "n".into()],
            extra: BTreeMap::new(),
        };
        assert_eq!(cognate.field("Alignment"), Some("h a - n".to_string()));
        assert_eq!(cognate.field("Doubt"), Some("true".to_string()));
    }
}
