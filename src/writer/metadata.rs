// The JSON metadata document that describes a written dataset: table
// schemas, catalog provenance and the dataset's descriptive properties.

use serde_json::{json, Value};

use crate::config::DatasetInfo;

use super::schema::{ColumnSpec, TableSchemas, TableSpec};
use super::SOURCES_FILENAME;

const CONFORMANCE_URL: &str = "http://cldf.clld.org/v1.0/terms.rdf#Wordlist";
const TERMS_PREFIX: &str = "http://cldf.clld.org/v1.0/terms.rdf#";
const DISTRIBUTION_TYPE: &str = "http://www.w3.org/ns/dcat#Distribution";

/// Build the metadata document for a dataset.
///
/// The catalog versions the data was assembled against are pinned in an
/// `environment` note so the output records its provenance.
pub fn metadata_document(
    info: &DatasetInfo,
    schemas: &TableSchemas,
    glottolog_version: &str,
    concepticon_version: &str,
) -> Value {
    let tables: Vec<Value> = schemas.all().into_iter().map(table_document).collect();

    let mut document = json!({
        "@context": ["http://www.w3.org/ns/csvw", {"@language": "en"}],
        "dc:conformsTo": CONFORMANCE_URL,
        "dc:source": SOURCES_FILENAME,
        "rdf:ID": info.id,
        "rdf:type": DISTRIBUTION_TYPE,
        "notes": [{
            "dc:title": "environment",
            "properties": {
                "glottolog_version": glottolog_version,
                "concepticon_version": concepticon_version,
            }
        }],
        "tables": tables,
    });

    if let Some(properties) = document.as_object_mut() {
        if let Some(title) = &info.title {
            properties.insert("dc:title".to_string(), json!(title));
        }
        if let Some(description) = &info.description {
            properties.insert("dc:description".to_string(), json!(description));
        }
        if let Some(license) = &info.license {
            properties.insert("dc:license".to_string(), json!(license));
        }
        if let Some(citation) = &info.citation {
            properties.insert("dc:bibliographicCitation".to_string(), json!(citation));
        }
        if let Some(url) = &info.url {
            properties.insert("dc:identifier".to_string(), json!(url));
        }
        if let Some(repo) = &info.github_repo {
            properties.insert(
                "dcat:accessURL".to_string(),
                json!(format!("https://github.com/{}", repo)),
            );
        }
        // Free-form properties never override the built ones.
        for (name, value) in &info.properties {
            properties
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }

    document
}

fn table_document(spec: &TableSpec) -> Value {
    let columns: Vec<Value> = spec.columns.iter().map(column_document).collect();

    let mut table = json!({
        "dc:conformsTo": format!("{}{}", TERMS_PREFIX, spec.kind.component()),
        "url": spec.kind.filename(),
        "tableSchema": {
            "columns": columns,
            "primaryKey": ["ID"],
        }
    });

    if !spec.foreign_keys.is_empty() {
        let keys: Vec<Value> = spec
            .foreign_keys
            .iter()
            .map(|fk| {
                json!({
                    "columnReference": [fk.column],
                    "reference": {
                        "resource": fk.target_table,
                        "columnReference": [fk.target_column],
                    }
                })
            })
            .collect();
        if let Some(schema) = table
            .pointer_mut("/tableSchema")
            .and_then(Value::as_object_mut)
        {
            schema.insert("foreignKeys".to_string(), Value::Array(keys));
        }
    }

    table
}

fn column_document(column: &ColumnSpec) -> Value {
    let mut cell = json!({
        "name": column.name,
        "datatype": column.datatype.name(),
    });

    if let Some(properties) = cell.as_object_mut() {
        if column.required {
            properties.insert("required".to_string(), json!(true));
        }
        if let Some(separator) = column.separator {
            properties.insert("separator".to_string(), json!(separator));
        }
        if let Some(term) = column.term {
            properties.insert(
                "propertyUrl".to_string(),
                json!(format!("{}{}", TERMS_PREFIX, term)),
            );
        }
    }

    cell
}
