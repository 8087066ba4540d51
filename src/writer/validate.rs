// Post-write validation: re-read a dataset directory and check every
// table against its declared schema, then check referential integrity.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::warn;

use crate::store::is_valid_id;

use super::schema::{ColumnSpec, TableSchemas, TableSpec};
use super::WriteError;

/// Columns whose values must match the identifier pattern.
const ID_COLUMNS: [&str; 4] = ["ID", "Language_ID", "Parameter_ID", "Cognateset_ID"];

/// A single defect found while checking a written dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationProblem {
    pub table: &'static str,
    /// 1-based CSV row (the header is row 1), when tied to one.
    pub row: Option<u64>,
    pub column: Option<String>,
    pub message: String,
}

/// Receives problems as validation finds them.
pub trait ValidationSink {
    fn report(&mut self, problem: ValidationProblem);
}

impl ValidationSink for Vec<ValidationProblem> {
    fn report(&mut self, problem: ValidationProblem) {
        self.push(problem);
    }
}

/// Sink that logs every problem at warn level and keeps nothing.
#[derive(Debug, Default)]
pub struct LogSink;

impl ValidationSink for LogSink {
    fn report(&mut self, problem: ValidationProblem) {
        warn!(
            table = problem.table,
            row = problem.row,
            column = problem.column.as_deref(),
            "{}",
            problem.message
        );
    }
}

struct Counting<'a> {
    inner: &'a mut dyn ValidationSink,
    count: usize,
}

impl ValidationSink for Counting<'_> {
    fn report(&mut self, problem: ValidationProblem) {
        self.count += 1;
        self.inner.report(problem);
    }
}

struct LoadedTable {
    /// Cell values per row, in schema column order. Rows whose cell count
    /// does not match the schema are reported and left out.
    rows: Vec<Vec<String>>,
    /// Values of the ID column, for foreign key checks against this table.
    ids: HashSet<String>,
}

/// Check a written dataset directory against its table schemas.
///
/// Every problem is handed to `sink`; the total count is returned. Only
/// I/O failures are errors, a dataset full of defects still validates to
/// a (large) problem count.
pub fn validate_dataset(
    dir: &Path,
    schemas: &TableSchemas,
    sink: &mut dyn ValidationSink,
) -> Result<usize, WriteError> {
    let mut counting = Counting { inner: sink, count: 0 };

    let mut loaded: HashMap<&'static str, LoadedTable> = HashMap::new();
    for spec in schemas.all() {
        if let Some(table) = load_table(dir, spec, &mut counting)? {
            loaded.insert(spec.kind.filename(), table);
        }
    }

    for spec in schemas.all() {
        check_foreign_keys(spec, &loaded, &mut counting);
    }

    Ok(counting.count)
}

fn load_table(
    dir: &Path,
    spec: &TableSpec,
    sink: &mut dyn ValidationSink,
) -> Result<Option<LoadedTable>, WriteError> {
    let table = spec.kind.component();
    let path = dir.join(spec.kind.filename());
    if !path.exists() {
        sink.report(ValidationProblem {
            table,
            row: None,
            column: None,
            message: format!("missing file {}", spec.kind.filename()),
        });
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;

    let expected = spec.column_names();
    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if !header.iter().map(String::as_str).eq(expected.iter().copied()) {
        sink.report(ValidationProblem {
            table,
            row: Some(1),
            column: None,
            message: format!(
                "header {:?} does not match the declared schema",
                header.join(",")
            ),
        });
        return Ok(None);
    }

    let id_at = expected.iter().position(|name| *name == "ID");
    let mut rows = Vec::new();
    let mut ids = HashSet::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index as u64 + 2;
        if record.len() != spec.columns.len() {
            sink.report(ValidationProblem {
                table,
                row: Some(row),
                column: None,
                message: format!(
                    "expected {} cells, found {}",
                    spec.columns.len(),
                    record.len()
                ),
            });
            continue;
        }
        for (column, value) in spec.columns.iter().zip(record.iter()) {
            check_cell(table, row, column, value, sink);
        }
        if let Some(at) = id_at {
            ids.insert(record[at].to_string());
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Some(LoadedTable { rows, ids }))
}

fn check_cell(
    table: &'static str,
    row: u64,
    column: &ColumnSpec,
    value: &str,
    sink: &mut dyn ValidationSink,
) {
    if value.is_empty() {
        if column.required {
            sink.report(ValidationProblem {
                table,
                row: Some(row),
                column: Some(column.name.clone()),
                message: "required value is missing".to_string(),
            });
        }
        return;
    }

    let parts: Vec<&str> = match column.separator {
        Some(separator) => value.split(separator).collect(),
        None => vec![value],
    };
    for part in parts {
        if !column.datatype.accepts(part) {
            sink.report(ValidationProblem {
                table,
                row: Some(row),
                column: Some(column.name.clone()),
                message: format!("{:?} is not a valid {}", part, column.datatype.name()),
            });
        }
    }

    if ID_COLUMNS.contains(&column.name.as_str()) && !is_valid_id(value) {
        sink.report(ValidationProblem {
            table,
            row: Some(row),
            column: Some(column.name.clone()),
            message: format!("invalid identifier {:?}", value),
        });
    }
}

fn check_foreign_keys(
    spec: &TableSpec,
    loaded: &HashMap<&'static str, LoadedTable>,
    sink: &mut dyn ValidationSink,
) {
    let Some(table) = loaded.get(spec.kind.filename()) else {
        return;
    };
    for fk in &spec.foreign_keys {
        let Some(target) = loaded.get(fk.target_table) else {
            continue;
        };
        let Some(at) = spec.columns.iter().position(|c| c.name == fk.column) else {
            continue;
        };
        for (index, cells) in table.rows.iter().enumerate() {
            let value = &cells[at];
            if !value.is_empty() && !target.ids.contains(value) {
                sink.report(ValidationProblem {
                    table: spec.kind.component(),
                    row: Some(index as u64 + 2),
                    column: Some(fk.column.to_string()),
                    message: format!(
                        "{:?} does not reference a row in {}",
                        value, fk.target_table
                    ),
                });
            }
        }
    }
}
