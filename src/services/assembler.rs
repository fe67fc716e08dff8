//! Row -> PersonRecord assembly and required-field validation

use thiserror::Error;

use crate::types::{ColumnLayout, PersonRecord, RawRow};

use super::cells::tokenize;
use super::codes::{normalize_nationality, normalize_phone, normalize_rank};
use super::dates::{parse_full_date, BirthCell, OrdinationCell};
use super::names::{split_full_name, NameParts};

/// Required field that was empty after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Surname,
    Name,
    Status,
}

impl MissingField {
    pub fn message(&self) -> &'static str {
        match self {
            MissingField::Surname => "Отсутствует фамилия",
            MissingField::Name => "Отсутствует имя",
            MissingField::Status => "Отсутствует статус (сан)",
        }
    }
}

/// Why a row did not make it into the store
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Не удалось распарсить ФИО")]
    UnparseableName,

    #[error("Не заполнены обязательные поля: {0:?}")]
    MissingFields(Vec<MissingField>),

    #[error("Священник {0} уже существует")]
    Duplicate(String),

    #[error("Не удалось обновить запись {0}")]
    UpdateNotApplied(String),

    #[error("Исключение при обработке строки: {0}")]
    Unexpected(String),
}

impl RowError {
    /// Messages for the import report, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            RowError::MissingFields(fields) => {
                fields.iter().map(|f| f.message().to_string()).collect()
            }
            other => vec![other.to_string()],
        }
    }
}

impl From<anyhow::Error> for RowError {
    fn from(e: anyhow::Error) -> Self {
        RowError::Unexpected(format!("{:#}", e))
    }
}

/// Build a record from one row. Date cells that fit no known shape leave
/// the dates empty; only identity and rank problems reject the row.
pub fn assemble(row: &RawRow, layout: &ColumnLayout) -> Result<PersonRecord, RowError> {
    let identity = identity_from_row(row, layout)?;

    let (birth_date, name_day) = match (layout.birth_cell, layout.birth_date) {
        (Some(idx), _) => {
            let cell = BirthCell::parse(&tokenize(row.cell(idx)));
            (cell.birth_date(), cell.name_day())
        }
        (None, Some(idx)) => (parse_full_date(row.cell(idx)), String::new()),
        (None, None) => (None, String::new()),
    };

    let (deacon_ordination_date, priest_ordination_date) =
        match (layout.ordination_cell, layout.ordination_date) {
            (Some(idx), _) => {
                let cell = OrdinationCell::parse(&tokenize(row.cell(idx)));
                (cell.deacon(), cell.priest())
            }
            (None, Some(idx)) => (None, parse_full_date(row.cell(idx))),
            (None, None) => (None, None),
        };

    let text = |idx: Option<usize>| row.field(idx).trim().to_string();

    let person = PersonRecord {
        id: None,
        name: identity.name,
        patronymic: identity.patronymic,
        surname: identity.surname,
        birth_date,
        birth_place: text(layout.birth_place),
        nationality: normalize_nationality(row.field(layout.nationality)),
        status: normalize_rank(row.field(layout.status)),
        name_day,
        deacon_ordination_date,
        priest_ordination_date,
        service_place: text(layout.service_place),
        spiritual_education: text(layout.spiritual_education),
        secular_education: text(layout.secular_education),
        last_reward: text(layout.last_reward),
        phone: normalize_phone(row.field(layout.phone)),
    };

    validate_required(&person)?;
    Ok(person)
}

fn identity_from_row(row: &RawRow, layout: &ColumnLayout) -> Result<NameParts, RowError> {
    if let Some(idx) = layout.full_name {
        return split_full_name(row.cell(idx)).ok_or(RowError::UnparseableName);
    }

    Ok(NameParts {
        surname: row.field(layout.surname).trim().to_string(),
        name: row.field(layout.name).trim().to_string(),
        patronymic: row.field(layout.patronymic).trim().to_string(),
    })
}

/// Check surname, name and status in that order; every empty one is reported
pub fn validate_required(person: &PersonRecord) -> Result<(), RowError> {
    let mut missing = Vec::new();
    if person.surname.is_empty() {
        missing.push(MissingField::Surname);
    }
    if person.name.is_empty() {
        missing.push(MissingField::Name);
    }
    if person.status.is_empty() {
        missing.push(MissingField::Status);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RowError::MissingFields(missing))
    }
}
