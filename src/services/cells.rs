//! Cell segmentation and date token classification
//!
//! A cell such as `"1984\n23.10.\n08.10."` becomes the lines
//! `["1984", "23.10", "08.10"]`, then the tokens
//! `years = [1984]`, `day_months = [(23, 10), (8, 10)]`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::BOILERPLATE_MARKERS;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));
static DAY_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.?$").expect("valid day.month regex"));

/// Day and month without a year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

impl DayMonth {
    pub fn new(day: u32, month: u32) -> Self {
        Self { day, month }
    }
}

/// Date tokens of one cell, each list in order of appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTokens {
    pub years: Vec<i32>,
    pub day_months: Vec<DayMonth>,
}

/// Split a raw cell into trimmed, non-empty lines without trailing periods.
/// Boilerplate lines are dropped.
pub fn segment(cell: &str) -> Vec<String> {
    cell.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .map(|line| line.trim().trim_end_matches(|c: char| c == '.' || c.is_whitespace()))
        .filter(|line| !line.is_empty())
        .filter(|line| !is_boilerplate(line))
        .map(str::to_string)
        .collect()
}

fn is_boilerplate(line: &str) -> bool {
    let lower = line.to_lowercase();
    BOILERPLATE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Sort segmented lines into year tokens and day.month tokens.
/// Lines that are neither are ignored.
pub fn classify(lines: &[String]) -> ClassifiedTokens {
    let mut tokens = ClassifiedTokens::default();

    for line in lines {
        let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();

        if YEAR_RE.is_match(&compact) {
            if let Ok(year) = compact.parse() {
                tokens.years.push(year);
            }
            continue;
        }

        if let Some(caps) = DAY_MONTH_RE.captures(&compact) {
            let day = caps[1].parse();
            let month = caps[2].parse();
            if let (Ok(day), Ok(month)) = (day, month) {
                tokens.day_months.push(DayMonth::new(day, month));
            }
        }
    }

    tokens
}

/// Segment and classify in one step
pub fn tokenize(cell: &str) -> ClassifiedTokens {
    classify(&segment(cell))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_handles_both_line_endings() {
        assert_eq!(segment("1930\r\n05.09.\r12.10"), vec!["1930", "05.09", "12.10"]);
    }

    #[test]
    fn test_segment_strips_trailing_periods_and_blank_lines() {
        assert_eq!(segment("  укр.  \n\n   \nМосква..."), vec!["укр", "Москва"]);
    }

    #[test]
    fn test_segment_strips_mixed_periods_and_spaces() {
        assert_eq!(segment("укр. .\n23.10 . \n1984. . ."), vec!["укр", "23.10", "1984"]);
    }

    #[test]
    fn test_segment_empty_cell() {
        assert!(segment("").is_empty());
        assert!(segment(" \n \n").is_empty());
    }

    #[test]
    fn test_segment_drops_boilerplate() {
        let lines = segment("Настоятель прот. Иоанн\nобслуживается клириками храма\nПетров");
        assert_eq!(lines, vec!["Настоятель прот. Иоанн", "Петров"]);
    }

    #[test]
    fn test_classify_preserves_order() {
        let tokens = tokenize("2008\n29.09.\n2013\n28.08.");
        assert_eq!(tokens.years, vec![2008, 2013]);
        assert_eq!(
            tokens.day_months,
            vec![DayMonth::new(29, 9), DayMonth::new(28, 8)]
        );
    }

    #[test]
    fn test_classify_ignores_non_date_lines() {
        let tokens = tokenize("около 1950\n19\n5.9\n123.4\nг. Одесса");
        assert!(tokens.years.is_empty());
        assert_eq!(tokens.day_months, vec![DayMonth::new(5, 9)]);
    }

    #[test]
    fn test_classify_removes_inner_whitespace() {
        let tokens = tokenize("19 56\n04. 08");
        assert_eq!(tokens.years, vec![1956]);
        assert_eq!(tokens.day_months, vec![DayMonth::new(4, 8)]);
    }
}
