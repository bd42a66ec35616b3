// 📂 Reference Data Loader
// CSV tables → GradeScale / ModuleCatalog, plus batch selection files

use crate::error::{LedgerError, Result};
use crate::reference::{GradeScale, ModuleCatalog};
use crate::semester::SemesterId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const GRADE_COLUMN: &str = "grade";
pub const POINTS_COLUMN: &str = "points";
pub const MODULE_COLUMN: &str = "module";
pub const CREDITS_COLUMN: &str = "credits";

// ============================================================================
// TWO-COLUMN TABLES
// ============================================================================

/// A parsed row of a label/number table.
#[derive(Debug, Clone, PartialEq)]
struct LabelRow {
    label: String,
    value: f64,
    line: Option<u64>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

/// Reads `label_col`/`value_col` from a headed CSV. Extra columns are ignored.
fn read_label_table<R: Read>(
    reader: R,
    source_name: &str,
    label_col: &str,
    value_col: &str,
) -> Result<Vec<LabelRow>> {
    let mut rdr = csv_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LedgerError::malformed(source_name, Some(1), e.to_string()))?
        .clone();

    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                LedgerError::malformed(source_name, Some(1), format!("missing required column '{}'", name))
            })
    };
    let label_idx = find(label_col)?;
    let value_idx = find(value_col)?;

    let mut rows = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line());
            LedgerError::malformed(source_name, line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line());

        let label = match record.get(label_idx) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => {
                return Err(LedgerError::malformed(
                    source_name,
                    line,
                    format!("row is missing a value for '{}'", label_col),
                ))
            }
        };

        let raw = match record.get(value_idx) {
            Some(v) if !v.is_empty() => v,
            _ => {
                return Err(LedgerError::malformed(
                    source_name,
                    line,
                    format!("row '{}' is missing a value for '{}'", label, value_col),
                ))
            }
        };

        let value = match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(LedgerError::malformed(
                    source_name,
                    line,
                    format!("{} for '{}' is not numeric: '{}'", value_col, label, raw),
                ))
            }
        };

        rows.push(LabelRow { label, value, line });
    }

    Ok(rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| LedgerError::unreadable(path, e))
}

// ============================================================================
// GRADE SCALE
// ============================================================================

/// Columns `grade`, `points`. Repeated grades keep the last value.
pub fn load_grade_scale_from_reader<R: Read>(reader: R, source_name: &str) -> Result<GradeScale> {
    let rows = read_label_table(reader, source_name, GRADE_COLUMN, POINTS_COLUMN)?;

    let mut scale = GradeScale::new();
    for row in rows {
        if let Some(previous) = scale.insert(row.label.clone(), row.value) {
            warn!(
                source = source_name,
                line = row.line,
                grade = %row.label,
                previous,
                points = row.value,
                "duplicate grade label, keeping the later value"
            );
        }
    }

    info!(source = source_name, grades = scale.len(), "loaded grade scale");
    Ok(scale)
}

pub fn load_grade_scale(path: &Path) -> Result<GradeScale> {
    let file = open(path)?;
    load_grade_scale_from_reader(file, &path.display().to_string())
}

// ============================================================================
// MODULE CATALOG
// ============================================================================

/// Columns `module`, `credits`. Repeated modules keep the last value.
pub fn load_module_catalog_from_reader<R: Read>(reader: R, source_name: &str) -> Result<ModuleCatalog> {
    let rows = read_label_table(reader, source_name, MODULE_COLUMN, CREDITS_COLUMN)?;

    let mut catalog = ModuleCatalog::new();
    for row in rows {
        if let Some(previous) = catalog.insert(row.label.clone(), row.value) {
            warn!(
                source = source_name,
                line = row.line,
                module = %row.label,
                previous,
                credits = row.value,
                "duplicate module, keeping the later value"
            );
        }
    }

    info!(source = source_name, modules = catalog.len(), "loaded module catalog");
    Ok(catalog)
}

pub fn load_module_catalog(path: &Path) -> Result<ModuleCatalog> {
    let file = open(path)?;
    load_module_catalog_from_reader(file, &path.display().to_string())
}

// ============================================================================
// BATCH SELECTIONS
// ============================================================================

/// One row of a batch file: `semester,module,grade`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub semester: SemesterId,
    pub module: String,
    pub grade: String,
}

pub fn load_selections_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Vec<Selection>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut selections = Vec::new();

    for result in rdr.deserialize() {
        let selection: Selection = result.map_err(|e| {
            let line = e.position().map(|p| p.line());
            LedgerError::malformed(source_name, line, e.to_string())
        })?;
        selections.push(selection);
    }

    debug!(source = source_name, count = selections.len(), "loaded selections");
    Ok(selections)
}

pub fn load_selections(path: &Path) -> Result<Vec<Selection>> {
    let file = open(path)?;
    load_selections_from_reader(file, &path.display().to_string())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_grade_scale() {
        let data = "grade,points\nA,4.0\nB+,3.3\nB,3.0\nF,0\n";
        let scale = load_grade_scale_from_reader(data.as_bytes(), "grades").unwrap();

        assert_eq!(scale.len(), 4);
        assert_eq!(scale.points("B+"), Some(3.3));
        assert_eq!(scale.points("F"), Some(0.0));
        assert_eq!(scale.grades().collect::<Vec<_>>(), vec!["A", "B+", "B", "F"]);
    }

    #[test]
    fn test_load_trims_and_ignores_extra_columns() {
        let data = "module , credits, lecturer\n Networks , 3 , Smith\nDatabases,4,Jones\n";
        let catalog = load_module_catalog_from_reader(data.as_bytes(), "sem1").unwrap();

        assert_eq!(catalog.credits("Networks"), Some(3.0));
        assert_eq!(catalog.credits("Databases"), Some(4.0));
    }

    #[test]
    fn test_columns_in_any_order() {
        let data = "points,grade\n4.0,A\n";
        let scale = load_grade_scale_from_reader(data.as_bytes(), "grades").unwrap();
        assert_eq!(scale.points("A"), Some(4.0));
    }

    #[test]
    fn test_non_numeric_points_rejected() {
        let data = "grade,points\nA,4.0\nB,three\n";
        let err = load_grade_scale_from_reader(data.as_bytes(), "grades").unwrap_err();

        match err {
            LedgerError::MalformedInput { source_name, line, reason } => {
                assert_eq!(source_name, "grades");
                assert_eq!(line, Some(3));
                assert!(reason.contains("not numeric"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_nan_rejected() {
        let data = "module,credits\nMath,NaN\n";
        let err = load_module_catalog_from_reader(data.as_bytes(), "sem1").unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_missing_value_rejected() {
        let short_row = "module,credits\nMath\n";
        assert!(load_module_catalog_from_reader(short_row.as_bytes(), "sem1").is_err());

        let empty_value = "module,credits\nMath,\n";
        assert!(load_module_catalog_from_reader(empty_value.as_bytes(), "sem1").is_err());

        let empty_label = "grade,points\n,4.0\n";
        assert!(load_grade_scale_from_reader(empty_label.as_bytes(), "grades").is_err());
    }

    #[test]
    fn test_missing_column_rejected() {
        let data = "module,weight\nMath,3\n";
        let err = load_module_catalog_from_reader(data.as_bytes(), "sem1").unwrap_err();
        assert!(err.to_string().contains("missing required column 'credits'"));
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let data = "grade,points\nA,4.0\nA,3.8\n";
        let scale = load_grade_scale_from_reader(data.as_bytes(), "grades").unwrap();
        assert_eq!(scale.len(), 1);
        assert_eq!(scale.points("A"), Some(3.8));
    }

    #[test]
    fn test_header_only_is_empty() {
        let data = "grade,points\n";
        let scale = load_grade_scale_from_reader(data.as_bytes(), "grades").unwrap();
        assert!(scale.is_empty());
    }

    #[test]
    fn test_load_selections() {
        let data = "semester,module,grade\n1,Math,A\n2, Eng ,B\n";
        let selections = load_selections_from_reader(data.as_bytes(), "batch").unwrap();

        assert_eq!(selections.len(), 2);
        assert_eq!(
            selections[1],
            Selection {
                semester: SemesterId::new(2),
                module: "Eng".to_string(),
                grade: "B".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_selection_semester() {
        let data = "semester,module,grade\nfirst,Math,A\n";
        assert!(load_selections_from_reader(data.as_bytes(), "batch").is_err());

        let zero = "semester,module,grade\n0,Math,A\n";
        assert!(load_selections_from_reader(zero.as_bytes(), "batch").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_grade_scale(Path::new("/nonexistent/grade_points.csv")).unwrap_err();
        assert!(err.is_load_error());
    }
}
