//! Tabular exports as named sheets of string cells.
//!
//! A spreadsheet file (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) keeps its
//! own sheet names and order. A single `.csv` file is a one-sheet workbook
//! named after the file stem. A directory is a workbook with one sheet per
//! `.csv` file, ordered by file name.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Extensions read through the spreadsheet reader rather than as CSV.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// One sheet of raw rows. Rows keep their original width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Load a workbook from a spreadsheet, a `.csv` file or a directory of
/// `.csv` files.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let sheets = if path.is_dir() {
        let files = list_csv_files(path)?;
        let mut sheets = Vec::with_capacity(files.len());
        for file in &files {
            sheets.push(read_sheet(file)?);
        }
        sheets
    } else if is_spreadsheet(path) {
        read_spreadsheet(path)?
    } else {
        vec![read_sheet(path)?]
    };
    if sheets.is_empty() {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), sheets = sheets.len(), "loaded workbook");
    Ok(Workbook::new(sheets))
}

/// Lists all CSV files in a directory, sorted by file name.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Read every sheet of a spreadsheet file, dropping rows with no content.
pub fn read_spreadsheet(path: &Path) -> Result<Vec<Sheet>> {
    let spreadsheet_error = |source| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(spreadsheet_error)?;
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .collect();
        debug!(sheet = %name, rows = rows.len(), "read spreadsheet sheet");
        sheets.push(Sheet::new(name, rows));
    }
    Ok(sheets)
}

/// Cell text as the export shows it; whole numbers lose their `.0`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => normalize_cell(&other.to_string()),
    }
}

/// Read one CSV file into a sheet, dropping rows with no content.
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| csv_error(path, source))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        rows.push(row);
    }
    let name = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or("Sheet1")
        .to_string();
    Ok(Sheet::new(name, rows))
}

fn csv_error(path: &Path, source: csv::Error) -> IngestError {
    if let csv::ErrorKind::Io(io) = source.kind()
        && io.kind() == std::io::ErrorKind::NotFound
    {
        return IngestError::FileNotFound {
            path: path.to_path_buf(),
        };
    }
    IngestError::CsvParse {
        path: path.to_path_buf(),
        source,
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_single_file_is_one_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Vendor Tests.csv");
        std::fs::write(&path, "Id,Name\nTC-1,First\n,,\nTC-2,Second\n").unwrap();

        let workbook = load_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Vendor Tests"]);
        let sheet = workbook.sheet("Vendor Tests").unwrap();
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[2], vec!["TC-2", "Second"]);
    }

    #[test]
    fn test_directory_sheets_sorted_by_file_name() {
        let dir = TempDir::new().unwrap();
        for name in ["b_tests.csv", "a_cover.csv", "notes.txt"] {
            std::fs::write(dir.path().join(name), "x\n1\n").unwrap();
        }

        let workbook = load_workbook(dir.path()).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["a_cover", "b_tests"]);
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_workbook(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, IngestError::FileNotFound { .. }));
    }

    #[test]
    fn test_directory_without_csv_is_empty_workbook() {
        let dir = TempDir::new().unwrap();
        let err = load_workbook(dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::EmptyWorkbook { .. }));
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_spreadsheet_keeps_sheet_names_and_order() {
        let workbook = load_workbook(&fixture("qtest_export.xlsx")).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Cover", "Test Cases"]);

        let tests = workbook.sheet("Test Cases").unwrap();
        assert_eq!(tests.rows.len(), 4);
        assert_eq!(tests.rows[0][0], "Id");
        assert_eq!(tests.rows[1][3], "2");
        assert_eq!(tests.rows[2][0], "");
        assert_eq!(tests.rows[2][4], "Open Vendor Inbound screen");
    }

    #[test]
    fn test_spreadsheet_extension_detection() {
        assert!(is_spreadsheet(Path::new("export.XLSX")));
        assert!(is_spreadsheet(Path::new("export.ods")));
        assert!(!is_spreadsheet(Path::new("export.csv")));
        assert!(!is_spreadsheet(Path::new("export")));
    }

    #[test]
    fn test_unreadable_spreadsheet_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, "Id,Name\nTC-1,First\n").unwrap();

        let err = load_workbook(&path).unwrap_err();
        assert!(matches!(err, IngestError::Spreadsheet { .. }));
        assert!(err.is_format());
    }

    #[test]
    fn test_cells_are_trimmed_and_bom_stripped() {
        assert_eq!(normalize_cell("\u{feff}Id "), "Id");
        assert_eq!(normalize_cell("  step  "), "step");
    }
}
