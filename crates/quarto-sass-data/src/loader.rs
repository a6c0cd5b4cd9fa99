//! Loading data files.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Files are parsed as YAML (which also covers JSON) with `yaml-rust2` and
//! converted to [`DataValue`]. Only a mapping is accepted at the top level.

use std::path::Path;

use indexmap::IndexMap;
use yaml_rust2::{Yaml, YamlLoader};

use crate::error::DataImportError;
use crate::fs::ImportFs;
use crate::value::{DataDocument, DataValue, Number};

/// Parse YAML or JSON text into a [`DataDocument`].
///
/// # Errors
///
/// - `DataParsingFailed` if the text is not valid YAML or holds several documents
/// - `InvalidData` if the top level is anything other than a mapping
pub fn parse_document(contents: &str) -> Result<DataDocument, DataImportError> {
    let parsing_failed = |reason: String| DataImportError::DataParsingFailed {
        contents: contents.to_string(),
        reason,
    };

    let mut docs = YamlLoader::load_from_str(contents).map_err(|e| parsing_failed(e.to_string()))?;

    if docs.len() > 1 {
        return Err(parsing_failed(format!(
            "expected a single document, found {}",
            docs.len()
        )));
    }

    let Some(root) = docs.pop() else {
        return Err(DataImportError::InvalidData {
            found: "an empty document",
        });
    };

    match convert(&root).map_err(|reason| parsing_failed(reason.to_string()))? {
        DataValue::Mapping(entries) => Ok(DataDocument::from(entries)),
        other => Err(DataImportError::InvalidData { found: other.kind() }),
    }
}

/// Read and parse a data file.
///
/// # Errors
///
/// `Io` when the file cannot be read, otherwise as [`parse_document`].
/// Content that is not UTF-8 is reported as `DataParsingFailed`.
pub fn load_document(fs: &dyn ImportFs, path: &Path) -> Result<DataDocument, DataImportError> {
    let bytes = fs.read(path).map_err(|source| DataImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let contents = match String::from_utf8(bytes) {
        Ok(contents) => contents,
        Err(e) => {
            return Err(DataImportError::DataParsingFailed {
                contents: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                reason: e.utf8_error().to_string(),
            });
        }
    };

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Parsing data file");
    parse_document(&contents)
}

fn convert(yaml: &Yaml) -> Result<DataValue, &'static str> {
    Ok(match yaml {
        Yaml::Null => DataValue::Null,
        Yaml::Boolean(b) => DataValue::Bool(*b),
        Yaml::Integer(n) => DataValue::Number(Number::Integer(*n)),
        Yaml::Real(_) => {
            let value = yaml.as_f64().ok_or("malformed floating point number")?;
            DataValue::Number(Number::Float(value))
        }
        Yaml::String(s) => DataValue::Text(s.clone()),
        Yaml::Array(items) => DataValue::List(items.iter().map(convert).collect::<Result<_, _>>()?),
        Yaml::Hash(hash) => {
            let mut entries = IndexMap::with_capacity(hash.len());
            for (key, value) in hash {
                entries.insert(key_text(key)?, convert(value)?);
            }
            DataValue::Mapping(entries)
        }
        Yaml::Alias(_) | Yaml::BadValue => return Err("unresolvable YAML node"),
    })
}

/// Mapping keys become strings; only scalar keys are meaningful as names.
fn key_text(key: &Yaml) -> Result<String, &'static str> {
    match convert(key)? {
        DataValue::Text(s) => Ok(s),
        DataValue::Number(n) => Ok(n.to_string()),
        DataValue::Bool(b) => Ok(b.to_string()),
        DataValue::Null => Ok("null".to_string()),
        DataValue::List(_) | DataValue::Mapping(_) => Err("mapping keys must be scalars"),
    }
}
