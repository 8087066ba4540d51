use std::collections::BTreeMap;

use serde::Serialize;

pub const ENGINE_NAME: &str = "lexiform";
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Descriptive properties of the dataset being assembled.
///
/// `id` becomes the stable dataset identifier of the metadata document;
/// everything else is optional descriptive metadata mapped onto the common
/// metadata properties at write time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetInfo {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub license: Option<String>,
    pub url: Option<String>,
    pub citation: Option<String>,
    /// GitHub repository slug (`org/name`); recorded as the dataset's
    /// access URL when present.
    pub github_repo: Option<String>,
    /// Free-form metadata document properties. Keys that collide with a
    /// property the writer builds itself are ignored.
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl DatasetInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    pub fn with_github_repo(mut self, repo: impl Into<String>) -> Self {
        self.github_repo = Some(repo.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}
