//! Phone numbers from a clergy contact list
//!
//! The contact list holds a free-text person cell (column D, name first,
//! surname last) and a phone cell (column E). Entries are matched against
//! the registry with the same identity rules as the import.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::defaults::MAX_REPORT_ERRORS;
use crate::types::RawRow;

use super::codes::normalize_phone;
use super::duplicates::Identity;
use super::names::split_directory_name;
use super::store::PersonStore;

pub const DIRECTORY_PERSON_COLUMN: usize = 3;
pub const DIRECTORY_PHONE_COLUMN: usize = 4;

/// One person found in the contact list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub row: usize,
    pub surname: String,
    pub name: String,
    pub patronymic: String,
    pub phone: String,
}

impl DirectoryEntry {
    fn identity(&self) -> Identity {
        Identity::new(&self.surname, &self.name, &self.patronymic)
    }

    fn display_name(&self) -> String {
        [&self.surname, &self.name, &self.patronymic]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneMergeResult {
    pub total_entries: usize,
    pub matched_count: usize,
    pub updated_count: usize,
    pub unmatched: Vec<DirectoryEntry>,
    /// Matched entries whose phone could not be written
    pub failed: Vec<DirectoryEntry>,
}

impl PhoneMergeResult {
    pub fn report(&self) -> String {
        let mut report = String::from("Импорт телефонов\n");
        report.push_str(&format!("Всего записей в списке: {}\n", self.total_entries));
        report.push_str(&format!("Найдено совпадений: {}\n", self.matched_count));
        report.push_str(&format!("Обновлено телефонов: {}\n", self.updated_count));
        report.push_str(&format!("Не найдено совпадений: {}\n", self.unmatched.len()));
        report.push_str(&format!("Не удалось обновить: {}\n", self.failed.len()));

        append_entries(&mut report, "Записи без совпадений", &self.unmatched);
        append_entries(&mut report, "Ошибки обновления", &self.failed);

        report
    }
}

/// Titled list of entries, capped like the import error report
fn append_entries(report: &mut String, title: &str, entries: &[DirectoryEntry]) {
    if entries.is_empty() {
        return;
    }

    report.push_str(&format!("\n{}:\n", title));
    for entry in entries.iter().take(MAX_REPORT_ERRORS) {
        report.push_str(&format!(
            "  - Строка {}: {} (тел: {})\n",
            entry.row,
            entry.display_name(),
            entry.phone
        ));
    }
    if entries.len() > MAX_REPORT_ERRORS {
        report.push_str(&format!(
            "  ... и ещё {} записей\n",
            entries.len() - MAX_REPORT_ERRORS
        ));
    }
}

/// Entries from contact-list rows. Rows without a usable name are skipped.
pub fn parse_directory(rows: &[RawRow]) -> Vec<DirectoryEntry> {
    rows.iter()
        .filter_map(|row| {
            let parts = split_directory_name(row.cell(DIRECTORY_PERSON_COLUMN))?;
            if parts.surname.is_empty() && parts.name.is_empty() {
                return None;
            }
            Some(DirectoryEntry {
                row: row.number,
                surname: parts.surname,
                name: parts.name,
                patronymic: parts.patronymic,
                phone: normalize_phone(row.cell(DIRECTORY_PHONE_COLUMN)),
            })
        })
        .collect()
}

/// Match entries against the registry and write their phones.
/// With `dry_run` nothing is written and `updated_count` counts the writes
/// that would have happened.
pub async fn merge_phones(
    store: &dyn PersonStore,
    entries: Vec<DirectoryEntry>,
    dry_run: bool,
) -> anyhow::Result<PhoneMergeResult> {
    let registry = store.list_all().await?;
    info!(
        "Phone merge: {} entries against {} records (dry_run={})",
        entries.len(),
        registry.len(),
        dry_run
    );

    let mut result = PhoneMergeResult {
        total_entries: entries.len(),
        ..Default::default()
    };

    for entry in entries {
        let identity = entry.identity();
        let Some(person) = registry.iter().find(|p| identity.matches(&Identity::of(p))) else {
            debug!("Row {}: no match for {}", entry.row, entry.display_name());
            result.unmatched.push(entry);
            continue;
        };

        result.matched_count += 1;
        if entry.phone.is_empty() {
            continue;
        }

        if dry_run {
            result.updated_count += 1;
            continue;
        }

        let mut updated = person.clone();
        updated.phone = entry.phone.clone();
        match store.update(&updated).await {
            Ok(true) => {
                debug!("Row {}: phone {} -> {}", entry.row, person.full_name(), entry.phone);
                result.updated_count += 1;
            }
            Ok(false) => {
                warn!("Row {}: record {} was not updated", entry.row, person.full_name());
                result.failed.push(entry);
            }
            Err(e) => {
                warn!("Row {}: failed to update {}: {:#}", entry.row, person.full_name(), e);
                result.failed.push(entry);
            }
        }
    }

    info!(
        "Phone merge finished: {} matched, {} updated, {} unmatched, {} failed",
        result.matched_count,
        result.updated_count,
        result.unmatched.len(),
        result.failed.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::MemoryPersonStore;
    use crate::types::PersonRecord;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Registry that refuses writes: one record reports no rows, the rest error
    struct ReadOnlyStore {
        inner: MemoryPersonStore,
        vanished: &'static str,
    }

    #[async_trait]
    impl PersonStore for ReadOnlyStore {
        async fn find_by_name_query(&self, query: &str) -> Result<Vec<PersonRecord>> {
            self.inner.find_by_name_query(query).await
        }

        async fn insert(&self, person: &PersonRecord) -> Result<Uuid> {
            self.inner.insert(person).await
        }

        async fn update(&self, person: &PersonRecord) -> Result<bool> {
            if person.surname == self.vanished {
                return Ok(false);
            }
            bail!("connection reset")
        }

        async fn list_all(&self) -> Result<Vec<PersonRecord>> {
            self.inner.list_all().await
        }

        fn name(&self) -> &str {
            "ReadOnly"
        }
    }

    fn directory_row(number: usize, person: &str, phone: &str) -> RawRow {
        RawRow::new(
            number,
            vec![
                String::new(),
                "Храм".to_string(),
                String::new(),
                person.to_string(),
                phone.to_string(),
            ],
        )
    }

    fn registry() -> MemoryPersonStore {
        MemoryPersonStore::with_records(vec![
            PersonRecord {
                surname: "Иванов".to_string(),
                name: "Иоанн".to_string(),
                patronymic: "Петрович".to_string(),
                status: "Протоиерей".to_string(),
                ..Default::default()
            },
            PersonRecord {
                surname: "Сидоренко".to_string(),
                name: "Павел".to_string(),
                status: "Диакон".to_string(),
                ..Default::default()
            },
        ])
    }

    #[test]
    fn test_parse_directory() {
        let rows = vec![
            directory_row(1, "Настоятель, прот. Иоанн Петрович\nИванов", "+38 (050) 123-45-67"),
            directory_row(2, "обслуживается клириками", ""),
            directory_row(3, "", "0501112233"),
        ];
        let entries = parse_directory(&rows);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].row, 1);
        assert_eq!(entries[0].name, "Иоанн");
        assert_eq!(entries[0].patronymic, "Петрович");
        assert_eq!(entries[0].surname, "Иванов");
        assert_eq!(entries[0].phone, "+380501234567");
    }

    #[tokio::test]
    async fn test_merge_updates_matched_phones() {
        let store = registry();
        let entries = parse_directory(&[
            directory_row(1, "прот. Иоанн Петрович Иванов", "380501234567.0"),
            directory_row(2, "диак. Павел Сидоренко", ""),
            directory_row(3, "свящ. Николай Андреевич Коваль", "0671234567"),
        ]);

        let result = merge_phones(&store, entries, false).await.unwrap();

        assert_eq!(result.total_entries, 3);
        assert_eq!(result.matched_count, 2);
        assert_eq!(result.updated_count, 1);
        assert_eq!(result.unmatched.len(), 1);
        assert_eq!(result.unmatched[0].surname, "Коваль");

        let ivanov = store.find_by_name_query("Иоанн Иванов").await.unwrap();
        assert_eq!(ivanov[0].phone, "380501234567");
    }

    #[tokio::test]
    async fn test_merge_dry_run_writes_nothing() {
        let store = registry();
        let entries = parse_directory(&[directory_row(1, "прот. Иоанн Петрович Иванов", "0501234567")]);

        let result = merge_phones(&store, entries, true).await.unwrap();
        assert_eq!(result.updated_count, 1);

        let all = store.list_all().await.unwrap();
        assert!(all.iter().all(|p| p.phone.is_empty()));
    }

    #[tokio::test]
    async fn test_merge_reports_failed_updates() {
        let store = ReadOnlyStore {
            inner: registry(),
            vanished: "Сидоренко",
        };
        let entries = parse_directory(&[
            directory_row(1, "прот. Иоанн Петрович Иванов", "0501234567"),
            directory_row(2, "диак. Павел Сидоренко", "0671234567"),
        ]);

        let result = merge_phones(&store, entries, false).await.unwrap();

        assert_eq!(result.matched_count, 2);
        assert_eq!(result.updated_count, 0);
        assert_eq!(result.failed.len(), 2);
        assert_eq!(result.failed[0].surname, "Иванов");
        assert_eq!(result.failed[1].surname, "Сидоренко");

        let report = result.report();
        assert!(report.contains("Не удалось обновить: 2"));
        assert!(report.contains("Ошибки обновления:"));
        assert!(report.contains("Строка 2: Сидоренко Павел (тел: 0671234567)"));
    }

    #[test]
    fn test_report_truncates_unmatched() {
        let unmatched = (1..=23)
            .map(|i| DirectoryEntry {
                row: i,
                surname: format!("Фамилия{}", i),
                name: "Имя".to_string(),
                patronymic: String::new(),
                phone: String::new(),
            })
            .collect();
        let result = PhoneMergeResult {
            total_entries: 23,
            unmatched,
            ..Default::default()
        };

        let report = result.report();
        assert!(report.contains("Строка 20: Фамилия20 Имя"));
        assert!(!report.contains("Строка 21:"));
        assert!(report.contains("... и ещё 3 записей"));
    }
}
