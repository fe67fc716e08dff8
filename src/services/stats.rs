//! Registry statistics

use std::collections::HashMap;

use serde::Serialize;

use crate::defaults::STATS_SAMPLE_SIZE;
use crate::types::PersonRecord;

use super::codes::is_deacon_rank;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    /// (status, count), most common first; ties by status name
    pub by_status: Vec<(String, usize)>,
    pub deacon_count: usize,
    pub without_birth_date: usize,
    pub without_service_place: usize,
    /// First records by surname
    pub sample: Vec<String>,
}

impl RegistryStats {
    pub fn collect(persons: &[PersonRecord]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for person in persons {
            let status = if person.status.is_empty() { "-" } else { person.status.as_str() };
            *counts.entry(status).or_insert(0) += 1;
        }

        let mut by_status: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();
        by_status.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut sorted: Vec<&PersonRecord> = persons.iter().collect();
        sorted.sort_by(|a, b| a.surname.cmp(&b.surname).then_with(|| a.name.cmp(&b.name)));

        Self {
            total: persons.len(),
            by_status,
            deacon_count: persons.iter().filter(|p| is_deacon_rank(&p.status)).count(),
            without_birth_date: persons.iter().filter(|p| p.birth_date.is_none()).count(),
            without_service_place: persons.iter().filter(|p| p.service_place.trim().is_empty()).count(),
            sample: sorted
                .into_iter()
                .take(STATS_SAMPLE_SIZE)
                .map(|p| format!("{} ({})", p.full_name(), p.status))
                .collect(),
        }
    }

    pub fn report(&self) -> String {
        let mut report = format!("Всего записей: {}\n", self.total);

        if !self.by_status.is_empty() {
            report.push_str("\nПо сану:\n");
            for (status, count) in &self.by_status {
                report.push_str(&format!("  {}: {}\n", status, count));
            }
        }

        report.push_str(&format!("\nДиаконов: {}\n", self.deacon_count));
        report.push_str(&format!("Без даты рождения: {}\n", self.without_birth_date));
        report.push_str(&format!("Без места служения: {}\n", self.without_service_place));

        if !self.sample.is_empty() {
            report.push_str("\nПримеры:\n");
            for (i, line) in self.sample.iter().enumerate() {
                report.push_str(&format!("  {}. {}\n", i + 1, line));
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn person(surname: &str, status: &str) -> PersonRecord {
        PersonRecord {
            surname: surname.to_string(),
            name: "Иоанн".to_string(),
            status: status.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_collect_counts() {
        let mut with_details = person("Андреев", "Иерей");
        with_details.birth_date = NaiveDate::from_ymd_opt(1970, 1, 7);
        with_details.service_place = "Собор".to_string();

        let persons = vec![
            person("Яковлев", "Протоиерей"),
            with_details,
            person("Борисов", "Иерей"),
            person("Власов", "Диакон"),
            person("Гусев", "Протодиакон"),
            person("Дьяченко", "Иерей"),
            person("Ежов", "Протоиерей"),
        ];
        let stats = RegistryStats::collect(&persons);

        assert_eq!(stats.total, 7);
        assert_eq!(stats.by_status[0], ("Иерей".to_string(), 3));
        assert_eq!(stats.by_status[1], ("Протоиерей".to_string(), 2));
        assert_eq!(stats.deacon_count, 2);
        assert_eq!(stats.without_birth_date, 6);
        assert_eq!(stats.without_service_place, 6);
        assert_eq!(stats.sample.len(), 5);
        assert_eq!(stats.sample[0], "Андреев Иоанн (Иерей)");
    }

    #[test]
    fn test_empty_registry() {
        let stats = RegistryStats::collect(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_status.is_empty());
        let report = stats.report();
        assert!(report.starts_with("Всего записей: 0"));
        assert!(!report.contains("По сану"));
    }
}
