//! CSV import pipeline
//!
//! Streams delimited files into engine indices one row at a time. A row
//! that fails to parse or index is recorded and skipped; it never aborts
//! the rest of the batch. A file only fails as a whole when not a single
//! row makes it in.

use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{Config, FileConfig};
use crate::engine::{Document, SearchEngine};
use crate::error::DatalodeError;
use crate::Result;

/// Options controlling a single-file import
#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    /// Header renames: source column name to field name. When present,
    /// columns without an entry are dropped.
    pub fields: Option<HashMap<String, String>>,

    /// Replace invalid UTF-8 byte sequences instead of failing rows
    pub force_utf8: bool,
}

impl From<&FileConfig> for ImportOptions {
    fn from(file: &FileConfig) -> Self {
        Self {
            fields: file.fields.clone(),
            force_utf8: false,
        }
    }
}

/// A row that could not be imported
#[derive(Clone, Debug)]
pub struct RowError {
    /// 1-based data row number, headers excluded
    pub row: u64,
    pub message: String,
}

/// Aggregate outcome of importing one file
#[derive(Clone, Debug, Default)]
pub struct ImportSummary {
    /// Rows successfully indexed
    pub rows: u64,
    /// Field names after header renames, in column order
    pub fields: Vec<String>,
    /// Skipped rows, in input order
    pub errors: Vec<RowError>,
}

/// Import one delimited file into the named index
///
/// Returns the aggregate summary, or `InvalidData` when the file yields no
/// importable rows at all. The index is refreshed once at the end so the
/// imported documents become searchable.
pub fn import_csv<E, R>(
    engine: &E,
    index: &str,
    mut input: R,
    options: &ImportOptions,
) -> Result<ImportSummary>
where
    E: SearchEngine + ?Sized,
    R: Read,
{
    let mut raw = Vec::new();
    input.read_to_end(&mut raw)?;
    if options.force_utf8 {
        raw = String::from_utf8_lossy(&raw).into_owned().into_bytes();
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(raw.as_slice());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut summary = ImportSummary {
        fields: output_fields(&headers, options.fields.as_ref()),
        ..Default::default()
    };

    for (i, record) in reader.records().enumerate() {
        let row = (i + 1) as u64;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row, "skipping row: {e}");
                summary.errors.push(RowError {
                    row,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let document = build_document(&headers, record.iter(), options.fields.as_ref());
        match engine.index_document(index, &document) {
            Ok(()) => summary.rows += 1,
            Err(e) => {
                warn!(row, "skipping row: {e}");
                summary.errors.push(RowError {
                    row,
                    message: e.to_string(),
                });
            }
        }
    }

    if summary.rows == 0 {
        return Err(DatalodeError::InvalidData(
            "invalid file format or zero rows".to_string(),
        ));
    }
    engine.refresh(index)?;
    Ok(summary)
}

/// Import every CSV file under a data directory into the configured index
///
/// Files are matched against the config by file name for per-file header
/// renames. A file that fails entirely is skipped with a warning; the rest
/// of the directory still imports.
pub fn import_all<E>(engine: &E, config: &Config, data_dir: &Path) -> Result<DirectoryImport>
where
    E: SearchEngine + ?Sized,
{
    let index = config.scoped_index();
    let mut outcome = DirectoryImport::default();

    for path in csv_files(data_dir)? {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let options = config
            .files
            .get(&name)
            .map(ImportOptions::from)
            .unwrap_or_default();

        let result = fs::File::open(&path)
            .map_err(DatalodeError::from)
            .and_then(|file| import_csv(engine, &index, file, &options));
        match result {
            Ok(summary) => {
                info!(file = %path.display(), rows = summary.rows, "imported");
                outcome.imported.push(FileImport {
                    file: path,
                    summary,
                });
            }
            Err(e) => {
                warn!(file = %path.display(), "skipping file: {e}");
                outcome.skipped.push(SkippedFile {
                    file: path,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

/// Aggregate outcome of a directory import
#[derive(Debug, Default)]
pub struct DirectoryImport {
    pub imported: Vec<FileImport>,
    pub skipped: Vec<SkippedFile>,
}

/// One successfully imported file
#[derive(Debug)]
pub struct FileImport {
    pub file: PathBuf,
    pub summary: ImportSummary,
}

/// One file skipped in its entirety
#[derive(Debug)]
pub struct SkippedFile {
    pub file: PathBuf,
    pub reason: String,
}

fn output_fields(headers: &[String], mapping: Option<&HashMap<String, String>>) -> Vec<String> {
    match mapping {
        Some(mapping) => headers
            .iter()
            .filter_map(|header| mapping.get(header))
            .cloned()
            .collect(),
        None => headers.to_vec(),
    }
}

fn build_document<'a>(
    headers: &[String],
    values: impl Iterator<Item = &'a str>,
    mapping: Option<&HashMap<String, String>>,
) -> Document {
    let mut document = Document::new();
    for (header, value) in headers.iter().zip(values) {
        let field = match mapping {
            Some(mapping) => match mapping.get(header) {
                Some(field) => field.clone(),
                None => continue,
            },
            None => header.clone(),
        };
        document.insert(field, Value::String(value.to_string()));
    }
    document
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_csv(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_csv(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_csv(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingEngine;
    use serde_json::json;

    #[test]
    fn test_import_rows_and_fields() {
        let engine = RecordingEngine::default();
        let csv = "name,state\nOakland,CA\nPortland,OR\n";
        let summary =
            import_csv(&engine, "cities", csv.as_bytes(), &ImportOptions::default()).unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.fields, vec!["name", "state"]);
        assert!(summary.errors.is_empty());

        let docs = engine.documents_in("cities");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["name"], json!("Oakland"));
        assert!(engine.refreshed("cities"));
    }

    #[test]
    fn test_header_mapping_renames_and_drops() {
        let engine = RecordingEngine::default();
        let csv = "NAME,STATE,IGNORED\nOakland,CA,x\n";
        let options = ImportOptions {
            fields: Some(HashMap::from([
                ("NAME".to_string(), "name".to_string()),
                ("STATE".to_string(), "state".to_string()),
            ])),
            force_utf8: false,
        };
        let summary = import_csv(&engine, "cities", csv.as_bytes(), &options).unwrap();

        assert_eq!(summary.fields, vec!["name", "state"]);
        let docs = engine.documents_in("cities");
        assert_eq!(
            serde_json::to_value(&docs[0]).unwrap(),
            json!({ "name": "Oakland", "state": "CA" })
        );
    }

    #[test]
    fn test_bad_row_is_skipped_not_fatal() {
        let engine = RecordingEngine::default();
        let csv = "name,state\nOakland,CA\n\"unclosed\nPortland,OR\n";
        let summary =
            import_csv(&engine, "cities", csv.as_bytes(), &ImportOptions::default()).unwrap();

        assert!(summary.rows >= 1);
        assert!(!summary.errors.is_empty());
    }

    #[test]
    fn test_rejected_row_is_recorded_and_batch_continues() {
        let engine = RecordingEngine::default().rejecting("state", "XX");
        let csv = "name,state\nOakland,CA\nNowhere,XX\nPortland,OR\n";
        let summary =
            import_csv(&engine, "cities", csv.as_bytes(), &ImportOptions::default()).unwrap();

        assert_eq!(summary.rows, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 2);
    }

    #[test]
    fn test_zero_rows_is_invalid_data() {
        let engine = RecordingEngine::default();
        let result = import_csv(
            &engine,
            "cities",
            "name,state\n".as_bytes(),
            &ImportOptions::default(),
        );
        assert!(matches!(
            result.unwrap_err(),
            DatalodeError::InvalidData(_)
        ));
    }

    #[test]
    fn test_force_utf8_replaces_invalid_bytes() {
        let engine = RecordingEngine::default();
        let mut csv = b"name\nOak".to_vec();
        csv.push(0xff);
        csv.extend_from_slice(b"land\n");
        let options = ImportOptions {
            force_utf8: true,
            ..Default::default()
        };
        let summary = import_csv(&engine, "cities", csv.as_slice(), &options).unwrap();
        assert_eq!(summary.rows, 1);
    }
}
