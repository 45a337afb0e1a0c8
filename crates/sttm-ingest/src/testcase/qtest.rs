//! qTest-style exports: one row per step, test case columns merged
//! vertically across a test case's rows.

use sttm_model::TestStep;
use tracing::{debug, trace};

use super::adapter::{RawTestCase, TestCaseAdapter, TestCaseExtraction};
use super::columns::{ColumnMap, ColumnRole, detect_header_row, map_columns};
use super::sheet::select_test_sheet;
use crate::error::{IngestError, Result};
use crate::workbook::{Sheet, Workbook};

#[derive(Debug, Clone, Copy, Default)]
pub struct QTestAdapter;

impl QTestAdapter {
    pub const NAME: &'static str = "QTEST Excel Export Format";

    /// Cases come out in the order their ids first appear in the sheet,
    /// not sorted by id, so report order follows the export.
    fn extract_sheet(&self, sheet: &Sheet) -> Result<Vec<RawTestCase>> {
        let header_index = detect_header_row(&sheet.rows);
        let headers = sheet.rows.get(header_index).cloned().unwrap_or_default();
        let columns = map_columns(&headers);

        let missing = columns.missing_required();
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                sheet: sheet.name.clone(),
                missing: missing.iter().map(ToString::to_string).collect(),
                available: headers.into_iter().filter(|h| !h.is_empty()).collect(),
            });
        }
        debug!(
            sheet = %sheet.name,
            header_row = header_index,
            mapped = columns.len(),
            "mapped test case columns"
        );

        let rows = sheet.rows.get(header_index + 1..).unwrap_or_default();
        let filled = forward_fill(rows, &columns);

        let mut cases: Vec<RawTestCase> = Vec::new();
        for (offset, row) in filled.iter().enumerate() {
            if row.id.is_empty() {
                trace!(row = header_index + offset + 2, "skipping row without test id");
                continue;
            }
            let position = match cases.iter().position(|c| c.id == row.id) {
                Some(position) => position,
                None => {
                    cases.push(RawTestCase {
                        id: row.id.clone(),
                        name: row.name.clone(),
                        description: row.description.clone(),
                        precondition: row.precondition.clone(),
                        steps: Vec::new(),
                    });
                    cases.len() - 1
                }
            };
            if let Some(step) = parse_step(&rows[offset], &columns, header_index + offset + 2) {
                cases[position].steps.push(step);
            }
        }
        for case in &mut cases {
            case.steps.sort_by_key(|step| step.step_number);
        }
        Ok(cases)
    }
}

impl TestCaseAdapter for QTestAdapter {
    fn format_name(&self) -> &str {
        Self::NAME
    }

    fn validate_format(&self, workbook: &Workbook) -> bool {
        !workbook.sheets.is_empty()
    }

    fn extract_test_cases(&self, workbook: &Workbook) -> Result<TestCaseExtraction> {
        let names = workbook.sheet_names();
        let sheet = select_test_sheet(&names)
            .and_then(|name| workbook.sheet(name))
            .ok_or(IngestError::NoTestSheet)?;
        debug!(sheet = %sheet.name, "selected test case sheet");

        let test_cases = self.extract_sheet(sheet)?;
        Ok(TestCaseExtraction {
            selected_sheet: sheet.name.clone(),
            test_cases,
            rows_processed: sheet.rows.len(),
        })
    }
}

/// Test case columns of one row after filling merged cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct CaseColumns {
    id: String,
    name: String,
    description: String,
    precondition: String,
}

/// Fill blank test case cells from the row above. A new id starts a new
/// test case, so name, description and precondition do not carry across ids:
/// a case with a blank description keeps it blank rather than inheriting
/// the previous case's text.
fn forward_fill(rows: &[Vec<String>], columns: &ColumnMap) -> Vec<CaseColumns> {
    let mut current = CaseColumns::default();
    let mut filled = Vec::with_capacity(rows.len());
    for row in rows {
        let id = columns.cell(row, ColumnRole::Id);
        if !id.is_empty() && id != current.id {
            current = CaseColumns {
                id: id.to_string(),
                ..CaseColumns::default()
            };
        }
        for (role, slot) in [
            (ColumnRole::Name, &mut current.name),
            (ColumnRole::Description, &mut current.description),
            (ColumnRole::Precondition, &mut current.precondition),
        ] {
            let value = columns.cell(row, role);
            if !value.is_empty() {
                *slot = value.to_string();
            }
        }
        filled.push(current.clone());
    }
    filled
}

/// Step on `row`, if it has a usable number and any text.
fn parse_step(row: &[String], columns: &ColumnMap, line: usize) -> Option<TestStep> {
    columns.get(ColumnRole::StepNumber)?;
    let raw_number = columns.cell(row, ColumnRole::StepNumber);
    let Some(step_number) = parse_step_number(raw_number) else {
        if !raw_number.is_empty() {
            trace!(line, value = raw_number, "skipping row with unparseable step number");
        }
        return None;
    };
    let description = columns.cell(row, ColumnRole::StepDescription);
    let expected = columns.cell(row, ColumnRole::StepExpectedResult);
    if description.is_empty() && expected.is_empty() {
        trace!(line, step_number, "skipping empty step");
        return None;
    }
    Some(TestStep::new(step_number, description, expected))
}

/// Integer or float text, truncated toward zero.
fn parse_step_number(raw: &str) -> Option<u32> {
    if let Ok(n) = raw.parse::<u32>() {
        return Some(n);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value <= f64::from(u32::MAX)).then(|| value.trunc() as u32)
}
