// Bibliography handling: reference resolution, source deduplication and
// BibTeX rendering.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Trailing year in an author string: `" (1979)"`, `" 1979."` or `" 1979-82."`.
static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+\(?(?P<year>[1-9][0-9]{3}(-[0-9]+)?)(\)|\.)").unwrap()
});

/// Split `"Meier 1979. Some title"` into author, year and the trailing rest.
/// Returns `(None, None, input)` when no year is present.
pub fn split_by_year(s: &str) -> (Option<&str>, Option<&str>, &str) {
    match YEAR_PATTERN.captures(s) {
        Some(caps) => {
            let all = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((0, 0));
            let year = caps.name("year").map(|m| m.as_str());
            (Some(s[..all.0].trim()), year, s[all.1..].trim())
        }
        None => (None, None, s),
    }
}

/// Lowercase a string to an identifier-safe slug: ASCII alphanumerics kept,
/// everything else dropped.
pub fn slug(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// A bibliography entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub id: String,
    pub genre: String,
    pub fields: BTreeMap<String, String>,
}

impl Source {
    pub fn new(genre: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            genre: genre.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Render as a BibTeX entry.
    pub fn bibtex(&self) -> String {
        let mut out = format!("@{}{{{}", self.genre, self.id);
        for (name, value) in &self.fields {
            out.push_str(&format!(",\n    {} = {{{}}}", name, value));
        }
        out.push_str("\n}\n");
        out
    }
}

/// A citation of a source, optionally with page numbers. Renders as `id` or
/// `id[pages]`, the representation stored in record source lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub source_id: String,
    pub pages: Option<String>,
}

impl Reference {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            pages: None,
        }
    }

    pub fn with_pages(mut self, pages: impl Into<String>) -> Self {
        self.pages = Some(pages.into());
        self
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pages {
            Some(pages) => write!(f, "{}[{}]", self.source_id, pages),
            None => write!(f, "{}", self.source_id),
        }
    }
}

/// Bibliography of a dataset under assembly. The first entry stored under an
/// ID wins, matching the record tables.
#[derive(Debug, Default)]
pub struct Sources {
    entries: Vec<Source>,
    ids: HashSet<String>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, source: Source) {
        if self.ids.contains(&source.id) {
            tracing::debug!(id = %source.id, "duplicate source id, keeping the first entry");
            return;
        }
        self.ids.insert(source.id.clone());
        self.entries.push(source);
    }

    pub fn extend(&mut self, sources: impl IntoIterator<Item = Source>) {
        for source in sources {
            self.add(source);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.iter()
    }

    /// Render the whole bibliography, entries in insertion order.
    pub fn bibtex(&self) -> String {
        self.entries
            .iter()
            .map(Source::bibtex)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Resolve a citation to a [`Reference`], creating the source entry on first
/// sight.
///
/// Without an explicit ID, the source ID is the slug of author and year when
/// both are known, the slug of the title otherwise. Returns `None` when no
/// usable ID can be derived.
pub fn reference_for(
    sources: &mut Sources,
    author: Option<&str>,
    year: Option<&str>,
    title: Option<&str>,
    pages: Option<&str>,
    explicit_id: Option<&str>,
) -> Option<Reference> {
    let mut fields: Vec<(&str, &str)> = Vec::new();
    if let Some(title) = title {
        fields.push(("title", title));
    }

    let id = match (explicit_id, author, year, title) {
        (Some(id), ..) => id.to_string(),
        (None, Some(author), Some(year), _) => {
            fields.push(("author", author));
            fields.push(("year", year));
            slug(&format!("{}{}", author, year))
        }
        (None, _, _, Some(title)) => slug(title),
        _ => String::new(),
    };
    if id.is_empty() {
        return None;
    }

    if !sources.contains(&id) {
        let mut source = Source::new("misc", &id);
        if explicit_id.is_some() {
            if let (Some(author), Some(year)) = (author, year) {
                fields.push(("author", author));
                fields.push(("year", year));
            }
        }
        for (name, value) in fields {
            source = source.with_field(name, value);
        }
        sources.add(source);
    }

    Some(Reference {
        source_id: id,
        pages: pages.map(str::to_string),
    })
}
