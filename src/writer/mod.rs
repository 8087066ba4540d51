pub mod csvout;
pub mod metadata;
pub mod schema;
pub mod validate;

pub use csvout::*;
pub use metadata::*;
pub use schema::*;
pub use validate::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::DatasetInfo;
use crate::sources::Sources;
use crate::store::FinalTables;

pub const METADATA_FILENAME: &str = "cldf-metadata.json";
pub const SOURCES_FILENAME: &str = "sources.bib";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Metadata serialization error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// What [`write_dataset`] produced.
#[derive(Debug)]
pub struct WriteReport {
    pub directory: PathBuf,
    pub forms: usize,
    pub cognates: usize,
    pub languages: usize,
    pub parameters: usize,
    pub sources: usize,
    /// The schemas as written, including columns added for extra fields.
    pub schemas: TableSchemas,
}

/// Write a full dataset directory: the four CSV tables, the JSON metadata
/// document and the BibTeX bibliography.
pub fn write_dataset(
    dir: &Path,
    info: &DatasetInfo,
    tables: &FinalTables,
    sources: &Sources,
    glottolog_version: &str,
    concepticon_version: &str,
) -> Result<WriteReport, WriteError> {
    std::fs::create_dir_all(dir)?;

    let mut schemas = TableSchemas::new();
    schemas.extend_from(tables);

    let forms = write_table(dir, &schemas.forms, &tables.forms)?;
    let cognates = write_table(dir, &schemas.cognates, &tables.cognates)?;
    let languages = write_table(dir, &schemas.languages, &tables.languages)?;
    let parameters = write_table(dir, &schemas.parameters, &tables.parameters)?;

    let document = metadata_document(info, &schemas, glottolog_version, concepticon_version);
    std::fs::write(
        dir.join(METADATA_FILENAME),
        serde_json::to_string_pretty(&document)?,
    )?;

    std::fs::write(dir.join(SOURCES_FILENAME), sources.bibtex())?;

    Ok(WriteReport {
        directory: dir.to_path_buf(),
        forms,
        cognates,
        languages,
        parameters,
        sources: sources.len(),
        schemas,
    })
}
