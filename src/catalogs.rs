// Reference catalog handles: versioned lookup tables resolved once when the
// session is constructed and consulted during assembly. Missing entries are
// tolerated; the lookups answer `None` instead of failing.

use std::collections::BTreeMap;

/// Language catalog handle. Pins the catalog version recorded in the dataset
/// metadata and resolves ISO 639-3 codes to glottocodes.
#[derive(Debug, Clone, Default)]
pub struct Glottolog {
    version: String,
    glottocode_by_iso: BTreeMap<String, String>,
}

impl Glottolog {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            glottocode_by_iso: BTreeMap::new(),
        }
    }

    /// Register an ISO 639-3 code → glottocode mapping.
    pub fn map_iso(mut self, iso: impl Into<String>, glottocode: impl Into<String>) -> Self {
        self.glottocode_by_iso.insert(iso.into(), glottocode.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Glottocode for an ISO code, `None` when the catalog has no entry.
    pub fn glottocode_for_iso(&self, iso: &str) -> Option<&str> {
        self.glottocode_by_iso.get(iso).map(String::as_str)
    }
}

/// Concept catalog handle. Pins the catalog version and resolves concept set
/// identifiers to their glosses.
#[derive(Debug, Clone, Default)]
pub struct Concepticon {
    version: String,
    gloss_by_id: BTreeMap<String, String>,
}

impl Concepticon {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            gloss_by_id: BTreeMap::new(),
        }
    }

    /// Register a concept set identifier → gloss mapping.
    pub fn map_gloss(mut self, id: impl Into<String>, gloss: impl Into<String>) -> Self {
        self.gloss_by_id.insert(id.into(), gloss.into());
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Gloss for a concept set identifier, `None` when the catalog has no
    /// entry.
    pub fn gloss(&self, id: &str) -> Option<&str> {
        self.gloss_by_id.get(id).map(String::as_str)
    }
}
