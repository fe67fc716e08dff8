//! Date disambiguation for multi-line register cells
//!
//! The same column means different things depending on how many year and
//! day.month tokens it holds. The shape is decided first from token counts
//! alone (the policy tables below), then tokens are assigned by position.

use std::fmt;

use chrono::NaiveDate;

use super::cells::{ClassifiedTokens, DayMonth};

/// Annual name-day (tezoimenitstvo), no year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameDay(DayMonth);

impl NameDay {
    /// Accepts only day.month pairs that exist in some year (29.02 included)
    pub fn new(dm: DayMonth) -> Option<Self> {
        NaiveDate::from_ymd_opt(2000, dm.month, dm.day).map(|_| Self(dm))
    }
}

impl fmt::Display for NameDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.0.day, self.0.month)
    }
}

/// Combine a day.month token with a year; `None` for impossible dates
pub fn with_year(dm: DayMonth, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, dm.month, dm.day)
}

// =============================================================================
// BIRTH / NAME-DAY CELL
// =============================================================================

/// Token-count shape of a birth cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthShape {
    SingleDate,
    DateWithNameDay,
    Dateless,
}

/// Policy table: (years, day.months) -> shape
pub fn birth_shape(years: usize, day_months: usize) -> BirthShape {
    match (years, day_months) {
        (1, 1) => BirthShape::SingleDate,
        (1, n) if n >= 2 => BirthShape::DateWithNameDay,
        _ => BirthShape::Dateless,
    }
}

/// Parsed birth cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthCell {
    /// `1930 / 05.09` -> born 05.09.1930
    SingleDate { birth_date: Option<NaiveDate> },
    /// `1984 / 23.10 / 08.10` -> born 23.10.1984, name-day 08.10
    DateWithNameDay {
        birth_date: Option<NaiveDate>,
        name_day: Option<NameDay>,
    },
    /// Not enough (or too many) tokens to say anything
    Dateless,
}

impl BirthCell {
    pub fn parse(tokens: &ClassifiedTokens) -> Self {
        let years = &tokens.years;
        let dms = &tokens.day_months;

        match birth_shape(years.len(), dms.len()) {
            BirthShape::SingleDate => BirthCell::SingleDate {
                birth_date: with_year(dms[0], years[0]),
            },
            BirthShape::DateWithNameDay => BirthCell::DateWithNameDay {
                birth_date: with_year(dms[0], years[0]),
                name_day: NameDay::new(dms[1]),
            },
            BirthShape::Dateless => BirthCell::Dateless,
        }
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        match self {
            BirthCell::SingleDate { birth_date } => *birth_date,
            BirthCell::DateWithNameDay { birth_date, .. } => *birth_date,
            BirthCell::Dateless => None,
        }
    }

    /// `DD.MM`, or empty when the cell has no name-day
    pub fn name_day(&self) -> String {
        match self {
            BirthCell::DateWithNameDay { name_day: Some(nd), .. } => nd.to_string(),
            _ => String::new(),
        }
    }
}

// =============================================================================
// ORDINATION CELL
// =============================================================================

/// Token-count shape of an ordination cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinationShape {
    SharedYear,
    SeparateYears,
    Undated,
}

/// Policy table: (years, day.months) -> shape
pub fn ordination_shape(years: usize, day_months: usize) -> OrdinationShape {
    match (years, day_months) {
        (1, n) if n >= 1 => OrdinationShape::SharedYear,
        (y, n) if y >= 2 && n >= 2 => OrdinationShape::SeparateYears,
        _ => OrdinationShape::Undated,
    }
}

/// Parsed ordination cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdinationCell {
    /// `1956 / 04.08 / 05.08`: both ordinations in the same year
    /// (the priest date is absent when only one day.month is given)
    SharedYear {
        deacon: Option<NaiveDate>,
        priest: Option<NaiveDate>,
    },
    /// `2008 / 29.09 / 2013 / 28.08`: each ordination with its own year
    SeparateYears {
        deacon: Option<NaiveDate>,
        priest: Option<NaiveDate>,
    },
    Undated,
}

impl OrdinationCell {
    pub fn parse(tokens: &ClassifiedTokens) -> Self {
        let years = &tokens.years;
        let dms = &tokens.day_months;

        match ordination_shape(years.len(), dms.len()) {
            OrdinationShape::SharedYear => OrdinationCell::SharedYear {
                deacon: with_year(dms[0], years[0]),
                priest: dms.get(1).and_then(|dm| with_year(*dm, years[0])),
            },
            OrdinationShape::SeparateYears => OrdinationCell::SeparateYears {
                deacon: with_year(dms[0], years[0]),
                priest: with_year(dms[1], years[1]),
            },
            OrdinationShape::Undated => OrdinationCell::Undated,
        }
    }

    pub fn deacon(&self) -> Option<NaiveDate> {
        match self {
            OrdinationCell::SharedYear { deacon, .. } | OrdinationCell::SeparateYears { deacon, .. } => *deacon,
            OrdinationCell::Undated => None,
        }
    }

    pub fn priest(&self) -> Option<NaiveDate> {
        match self {
            OrdinationCell::SharedYear { priest, .. } | OrdinationCell::SeparateYears { priest, .. } => *priest,
            OrdinationCell::Undated => None,
        }
    }
}

// =============================================================================
// FULL DATES (flat layouts)
// =============================================================================

/// `DD.MM.YYYY` or `YYYY-MM-DD`
pub fn parse_full_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}
