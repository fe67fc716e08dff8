//! Person (clergy) record types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Canonical clergy record, the unit of storage.
///
/// Optional text fields are empty strings rather than `None` so nothing
/// null-like reaches the store; only dates are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    /// Assigned by the store on first insert
    pub id: Option<Uuid>,
    pub name: String,
    pub patronymic: String,
    pub surname: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: String,
    pub nationality: String,
    /// Canonical rank label (Иерей, Протоиерей, ...) or raw passthrough
    pub status: String,
    /// Annual name-day in `DD.MM` form, empty when unknown
    pub name_day: String,
    pub deacon_ordination_date: Option<NaiveDate>,
    pub priest_ordination_date: Option<NaiveDate>,
    pub service_place: String,
    pub spiritual_education: String,
    pub secular_education: String,
    pub last_reward: String,
    pub phone: String,
}

impl PersonRecord {
    /// "Surname Name Patronymic" with empty parts skipped
    pub fn full_name(&self) -> String {
        [&self.surname, &self.name, &self.patronymic]
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_skips_empty_parts() {
        let person = PersonRecord {
            surname: "Иванов".to_string(),
            name: "Петр".to_string(),
            ..Default::default()
        };
        assert_eq!(person.full_name(), "Иванов Петр");
    }

    #[test]
    fn test_person_serializes_camel_case() {
        let person = PersonRecord {
            name_day: "08.10".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&person).unwrap();
        assert!(json.contains("nameDay"));
        assert!(json.contains("deaconOrdinationDate"));
    }
}
