// CSV serialization of one record table.

use std::path::Path;

use crate::models::Record;

use super::schema::TableSpec;
use super::WriteError;

/// Write one table to its CSV file in `dir`. Cells come from the record's
/// declared fields first, then from its extra fields; columns the record
/// knows nothing about stay empty. Returns the number of data rows written.
pub fn write_table<R: Record>(
    dir: &Path,
    spec: &TableSpec,
    records: &[R],
) -> Result<usize, WriteError> {
    let path = dir.join(spec.kind.filename());
    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record(spec.columns.iter().map(|c| c.name.as_str()))?;
    for record in records {
        let row: Vec<String> = spec
            .columns
            .iter()
            .map(|column| {
                record
                    .field(&column.name)
                    .or_else(|| record.extra().get(&column.name).cloned())
                    .unwrap_or_default()
            })
            .collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;

    tracing::debug!(file = %path.display(), rows = records.len(), "table written");
    Ok(records.len())
}
