//! Grid sources: CSV and JSON files behind one trait.
//!
//! The GridSource trait abstracts over where table data comes from so the CLI
//! and TUI can load any supported file and tests can hand in fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::grid::RawGrid;

/// Errors from loading table data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported grid format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// A grid plus the entity ids of its data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedGrid {
    pub grid: RawGrid,
    pub row_ids: Vec<String>,
}

/// Anything that can produce table data.
pub trait GridSource {
    fn load(&self) -> Result<LoadedGrid, SourceError>;

    /// Short human-readable name (tab titles, log lines).
    fn name(&self) -> String;
}

/// In-memory grid, mostly for tests and the placeholder tab.
#[derive(Debug, Clone)]
pub struct StaticSource {
    pub name: String,
    pub loaded: LoadedGrid,
}

impl GridSource for StaticSource {
    fn load(&self) -> Result<LoadedGrid, SourceError> {
        Ok(self.loaded.clone())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// CSV file; every record is a row.
#[derive(Debug, Clone)]
pub struct CsvSource {
    pub path: PathBuf,
    /// Column holding entity ids; removed from the grid.
    pub id_column: Option<usize>,
    /// Drop the first record instead of keeping it as a row.
    pub skip_first_record: bool,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_column: None,
            skip_first_record: false,
        }
    }

    pub fn with_id_column(mut self, column: Option<usize>) -> Self {
        self.id_column = column;
        self
    }
}

impl GridSource for CsvSource {
    fn load(&self) -> Result<LoadedGrid, SourceError> {
        let csv_err = |source| SourceError::Csv {
            path: self.path.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.skip_first_record)
            .flexible(true)
            .from_path(&self.path)
            .map_err(csv_err)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let (rows, row_ids) = split_id_column(rows, self.id_column);
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "loaded CSV grid");
        Ok(LoadedGrid {
            grid: RawGrid::new(rows),
            row_ids,
        })
    }

    fn name(&self) -> String {
        file_stem(&self.path)
    }
}

/// JSON file: either `[[...], ...]` or `{"rows": [[...]], "rowIds": [...]}`.
#[derive(Debug, Clone)]
pub struct JsonSource {
    pub path: PathBuf,
    pub id_column: Option<usize>,
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            id_column: None,
        }
    }

    pub fn with_id_column(mut self, column: Option<usize>) -> Self {
        self.id_column = column;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonGrid {
    Bare(Vec<Vec<Value>>),
    Object {
        rows: Vec<Vec<Value>>,
        #[serde(default, alias = "row_ids", rename = "rowIds")]
        row_ids: Vec<String>,
    },
}

impl GridSource for JsonSource {
    fn load(&self) -> Result<LoadedGrid, SourceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let loaded = parse_json_grid(&content, self.id_column).map_err(|source| {
            SourceError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %self.path.display(), rows = loaded.grid.len(), "loaded JSON grid");
        Ok(loaded)
    }

    fn name(&self) -> String {
        file_stem(&self.path)
    }
}

/// Parse JSON grid text. Explicit `rowIds` win over an id column.
pub fn parse_json_grid(
    content: &str,
    id_column: Option<usize>,
) -> Result<LoadedGrid, serde_json::Error> {
    let (rows, explicit_ids) = match serde_json::from_str::<JsonGrid>(content)? {
        JsonGrid::Bare(rows) => (rows, Vec::new()),
        JsonGrid::Object { rows, row_ids } => (rows, row_ids),
    };
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(value_to_text).collect())
        .collect();
    let (rows, column_ids) = split_id_column(rows, id_column);
    let row_ids = if explicit_ids.is_empty() {
        column_ids
    } else {
        explicit_ids
    };
    Ok(LoadedGrid {
        grid: RawGrid::new(rows),
        row_ids,
    })
}

/// Pick a source by file extension.
pub fn source_for_path(
    path: &Path,
    id_column: Option<usize>,
    skip_first_record: bool,
) -> Result<Box<dyn GridSource>, SourceError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => Ok(Box::new(CsvSource {
            path: path.to_path_buf(),
            id_column,
            skip_first_record,
        })),
        "json" => Ok(Box::new(JsonSource::new(path).with_id_column(id_column))),
        other => Err(SourceError::UnsupportedFormat(other.to_string())),
    }
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Remove `column` from every row, returning its values as ids.
///
/// Rows too short to have the column contribute an empty id.
fn split_id_column(
    rows: Vec<Vec<String>>,
    column: Option<usize>,
) -> (Vec<Vec<String>>, Vec<String>) {
    let Some(column) = column else {
        return (rows, Vec::new());
    };
    let mut ids = Vec::with_capacity(rows.len());
    let rows = rows
        .into_iter()
        .map(|mut row| {
            if column < row.len() {
                ids.push(row.remove(column));
            } else {
                ids.push(String::new());
            }
            row
        })
        .collect();
    (rows, ids)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_bare_json() {
        let loaded = parse_json_grid(r#"[["a", 1, null], ["b", 2.5, true]]"#, None).unwrap();
        assert_eq!(
            loaded.grid.rows(),
            &[
                vec!["a".to_string(), "1".into(), "".into()],
                vec!["b".to_string(), "2.5".into(), "true".into()],
            ]
        );
        assert!(loaded.row_ids.is_empty());
    }

    #[test]
    fn test_parse_object_json_with_ids() {
        let loaded =
            parse_json_grid(r#"{"rows": [["a"], ["b"]], "rowIds": ["id-a", "id-b"]}"#, None)
                .unwrap();
        assert_eq!(loaded.grid.len(), 2);
        assert_eq!(loaded.row_ids, vec!["id-a", "id-b"]);
    }

    #[test]
    fn test_id_column_split() {
        let loaded = parse_json_grid(r#"[["x1", "a"], ["x2", "b"], []]"#, Some(0)).unwrap();
        assert_eq!(loaded.row_ids, vec!["x1", "x2", ""]);
        assert_eq!(loaded.grid.rows()[0], vec!["a".to_string()]);
    }

    #[test]
    fn test_csv_source_reads_rows() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,total").unwrap();
        writeln!(file, "acc-1,Checking,1000").unwrap();
        writeln!(file, "acc-2,Savings,500").unwrap();

        let source = CsvSource {
            path: file.path().to_path_buf(),
            id_column: Some(0),
            skip_first_record: true,
        };
        let loaded = source.load().unwrap();
        assert_eq!(loaded.grid.len(), 2);
        assert_eq!(loaded.row_ids, vec!["acc-1", "acc-2"]);
        assert_eq!(
            loaded.grid.rows()[1],
            vec!["Savings".to_string(), "500".to_string()]
        );
    }

    #[test]
    fn test_static_source_behind_trait_object() {
        let source: Box<dyn GridSource> = Box::new(StaticSource {
            name: "fixture".into(),
            loaded: LoadedGrid {
                grid: RawGrid::from_rows([["a", "1"]]),
                row_ids: vec!["id-a".into()],
            },
        });
        assert_eq!(source.name(), "fixture");
        let loaded = source.load().unwrap();
        assert_eq!(loaded.grid.len(), 1);
        assert_eq!(loaded.row_ids, vec!["id-a"]);
    }

    #[test]
    fn test_source_for_unknown_extension() {
        let err = source_for_path(Path::new("table.xlsx"), None, false).err().unwrap();
        assert!(matches!(err, SourceError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn test_missing_json_file_is_io_error() {
        let err = JsonSource::new("/definitely/not/here.json").load().unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
