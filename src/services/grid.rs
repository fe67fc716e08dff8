//! Spreadsheet grid loading (CSV and Excel/ODS workbooks)

use std::path::Path;

use anyhow::{bail, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::types::RawRow;

/// Load every row of the first sheet. Row numbers are 1-based sheet rows.
pub fn load_grid(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        bail!("Файл не найден: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "csv" => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
            parse_csv(&content)?
        }
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path)?,
        other => bail!("Неподдерживаемый формат файла: .{}", other),
    };

    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse CSV text; `;` or `,` delimiter, ragged rows allowed
pub fn parse_csv(content: &str) -> Result<Vec<RawRow>> {
    let content = content.trim_start_matches('\u{feff}');
    let delimiter = detect_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Invalid CSV at row {}", idx + 1))?;
        rows.push(RawRow::new(
            idx + 1,
            record.iter().map(|s| s.to_string()).collect(),
        ));
    }

    Ok(rows)
}

/// Semicolon when the first line has more of them than commas
fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

fn load_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.with_context(|| format!("Failed to read first sheet of {}", path.display()))?,
        None => bail!("Книга не содержит листов: {}", path.display()),
    };

    // Ranges start at the first used cell, not necessarily A1
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let leading_cols = start_col as usize;

    let rows = range
        .rows()
        .enumerate()
        .map(|(idx, row)| {
            let cells = std::iter::repeat(String::new())
                .take(leading_cols)
                .chain(row.iter().map(cell_text))
                .collect();
            RawRow::new(start_row as usize + idx + 1, cells)
        })
        .collect();

    Ok(rows)
}

/// Cell as text; integral floats lose their `.0`, date cells become `DD.MM.YYYY`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => datetime.format("%d.%m.%Y").to_string(),
            None => dt.to_string(),
        },
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or_default().to_string(),
        other => other.to_string(),
    }
}

/// A first cell that is not a row index ("№", "ФИО") marks a header row
pub fn is_header(row: &RawRow) -> bool {
    row.cell(0).trim().parse::<i64>().is_err()
}

/// Separate the header row (if any) from the data rows
pub fn split_header(mut rows: Vec<RawRow>) -> (Option<RawRow>, Vec<RawRow>) {
    match rows.first() {
        Some(first) if is_header(first) => {
            let header = rows.remove(0);
            (Some(header), rows)
        }
        _ => (None, rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dates::parse_full_date;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;

    #[test]
    fn test_parse_csv_semicolon_with_multiline_cell() {
        let content = "№;ФИО;Сан\n1;Иванов Петр;\"прот.\"\n2;\"Петров\nИоанн\";свящ.\n";
        let rows = parse_csv(content).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].number, 2);
        assert_eq!(rows[1].cell(1), "Иванов Петр");
        assert_eq!(rows[2].cell(1), "Петров\nИоанн");
    }

    #[test]
    fn test_parse_csv_comma_and_ragged_rows() {
        let content = "\u{feff}Фамилия,Имя,Сан\nИванов,Петр\n";
        let rows = parse_csv(content).unwrap();
        assert_eq!(rows[0].cell(0), "Фамилия");
        assert_eq!(rows[1].cells.len(), 2);
        assert_eq!(rows[1].cell(2), "");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a,b;c,d"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn test_cell_text_renders_integral_floats() {
        assert_eq!(cell_text(&Data::Float(1984.0)), "1984");
        assert_eq!(cell_text(&Data::Float(23.1)), "23.1");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("прот.".to_string())), "прот.");
    }

    #[test]
    fn test_cell_text_renders_dates() {
        let born = Data::DateTime(ExcelDateTime::new(11206.0, ExcelDateTimeType::DateTime, false));
        assert_eq!(cell_text(&born), "05.09.1930");
        assert_eq!(parse_full_date(&cell_text(&born)), NaiveDate::from_ymd_opt(1930, 9, 5));

        let iso = Data::DateTimeIso("1955-08-04T00:00:00".to_string());
        assert_eq!(cell_text(&iso), "1955-08-04");
        assert_eq!(parse_full_date(&cell_text(&iso)), NaiveDate::from_ymd_opt(1955, 8, 4));
    }

    #[test]
    fn test_header_detection() {
        let rows = parse_csv("№;ФИО\n1;Иванов Петр\n").unwrap();
        let (header, data) = split_header(rows);
        assert_eq!(header.map(|h| h.cell(1).to_string()), Some("ФИО".to_string()));
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].number, 2);

        let rows = parse_csv(" 1 ;Иванов Петр\n2;Петров Иоанн\n").unwrap();
        let (header, data) = split_header(rows);
        assert!(header.is_none());
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_split_header_empty_grid() {
        let (header, data) = split_header(Vec::new());
        assert!(header.is_none());
        assert!(data.is_empty());
    }

    #[test]
    fn test_load_grid_rejects_unknown_extension_and_missing_file() {
        let missing = load_grid(Path::new("/nonexistent/registry.xlsx"));
        assert!(missing.is_err());

        let path = std::env::temp_dir().join(format!("clergy-import-{}.txt", uuid::Uuid::new_v4()));
        std::fs::write(&path, "1;Иванов").unwrap();
        let err = load_grid(&path).unwrap_err();
        assert!(err.to_string().contains(".txt"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_grid_reads_csv_file() {
        let path = std::env::temp_dir().join(format!("clergy-import-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "1;Иванов Петр;прот.\n").unwrap();
        let rows = load_grid(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell(2), "прот.");
    }
}
