//! Import batch types for spreadsheet import functionality

use serde::{Deserialize, Serialize};

use crate::defaults::MAX_REPORT_ERRORS;

/// One spreadsheet row as loaded from the grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    /// 1-based row number in the source sheet (header included)
    pub number: usize,
    pub cells: Vec<String>,
}

impl RawRow {
    pub fn new(number: usize, cells: Vec<String>) -> Self {
        Self { number, cells }
    }

    /// Cell at `index`, empty when the row is shorter
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    /// Cell at an optional layout position
    pub fn field(&self, index: Option<usize>) -> &str {
        index.map(|i| self.cell(i)).unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// A rejected or failed row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportError {
    pub row: usize,
    pub messages: Vec<String>,
    pub raw_data: RawRow,
}

/// Batch import summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub total_rows: usize,
    pub success_count: usize,
    pub inserted_count: usize,
    pub updated_count: usize,
    pub error_count: usize,
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    /// Human-readable error report, capped at the first 20 errors
    pub fn error_report(&self) -> String {
        if self.errors.is_empty() {
            return "Ошибок не обнаружено.".to_string();
        }

        let mut report = format!("Обнаружено ошибок: {}\n\n", self.errors.len());
        for error in self.errors.iter().take(MAX_REPORT_ERRORS) {
            report.push_str(&format!("Строка {}:\n", error.row));
            for message in &error.messages {
                report.push_str(&format!("  - {}\n", message));
            }
            report.push('\n');
        }

        if self.errors.len() > MAX_REPORT_ERRORS {
            report.push_str(&format!(
                "... и ещё {} ошибок\n",
                self.errors.len() - MAX_REPORT_ERRORS
            ));
        }

        report
    }

    /// One-line summary for logs and CLI output
    pub fn summary(&self) -> String {
        format!(
            "Всего строк: {}, успешно: {} (добавлено {}, обновлено {}), ошибок: {}",
            self.total_rows,
            self.success_count,
            self.inserted_count,
            self.updated_count,
            self.error_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_for_row(row: usize) -> ImportError {
        ImportError {
            row,
            messages: vec!["Отсутствует имя".to_string()],
            raw_data: RawRow::new(row, vec![]),
        }
    }

    #[test]
    fn test_raw_row_cell_out_of_range_is_empty() {
        let row = RawRow::new(2, vec!["1".to_string()]);
        assert_eq!(row.cell(0), "1");
        assert_eq!(row.cell(5), "");
        assert_eq!(row.field(None), "");
    }

    #[test]
    fn test_error_report_empty() {
        let result = ImportResult::default();
        assert_eq!(result.error_report(), "Ошибок не обнаружено.");
    }

    #[test]
    fn test_error_report_lists_rows_in_order() {
        let result = ImportResult {
            errors: vec![error_for_row(3), error_for_row(7)],
            error_count: 2,
            ..Default::default()
        };
        let report = result.error_report();
        assert!(report.starts_with("Обнаружено ошибок: 2"));
        let pos3 = report.find("Строка 3:").unwrap();
        let pos7 = report.find("Строка 7:").unwrap();
        assert!(pos3 < pos7);
        assert!(report.contains("  - Отсутствует имя"));
        assert!(!report.contains("... и ещё"));
    }

    #[test]
    fn test_error_report_truncates_after_twenty() {
        let errors: Vec<ImportError> = (1..=25).map(error_for_row).collect();
        let result = ImportResult {
            error_count: errors.len(),
            errors,
            ..Default::default()
        };
        let report = result.error_report();
        assert!(report.contains("Строка 20:"));
        assert!(!report.contains("Строка 21:"));
        assert!(report.contains("... и ещё 5 ошибок"));
    }
}
