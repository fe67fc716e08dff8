//! Person storage
//!
//! Uses PostgreSQL for real imports, in-memory store for dry runs and tests.

mod postgres;

pub use postgres::PgPersonStore;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::PersonRecord;

/// Storage collaborator used by the importers
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Records whose name, surname, patronymic, "name surname" or
    /// "surname name patronymic" contains the query
    async fn find_by_name_query(&self, query: &str) -> Result<Vec<PersonRecord>>;

    /// Store a new record, returning its generated id
    async fn insert(&self, person: &PersonRecord) -> Result<Uuid>;

    /// Overwrite the record with `person.id`. `Ok(false)` when nothing matched.
    async fn update(&self, person: &PersonRecord) -> Result<bool>;

    async fn list_all(&self) -> Result<Vec<PersonRecord>>;

    /// Store name for logging
    fn name(&self) -> &str;
}

/// In-memory registry
#[derive(Default)]
pub struct MemoryPersonStore {
    persons: RwLock<Vec<PersonRecord>>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryPersonStore {
    /// Start from existing records; records without an id get one
    pub fn with_records(records: Vec<PersonRecord>) -> Self {
        let persons = records
            .into_iter()
            .map(|mut p| {
                p.id.get_or_insert_with(Uuid::new_v4);
                p
            })
            .collect();
        Self {
            persons: RwLock::new(persons),
        }
    }

    pub fn len(&self) -> usize {
        self.persons.read().len()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn find_by_name_query(&self, query: &str) -> Result<Vec<PersonRecord>> {
        let needle = query.trim().to_lowercase();
        let persons = self.persons.read();

        Ok(persons
            .iter()
            .filter(|p| {
                [
                    p.name.clone(),
                    p.surname.clone(),
                    p.patronymic.clone(),
                    format!("{} {}", p.name, p.surname),
                    format!("{} {} {}", p.surname, p.name, p.patronymic),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, person: &PersonRecord) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let mut stored = person.clone();
        stored.id = Some(id);
        self.persons.write().push(stored);
        Ok(id)
    }

    async fn update(&self, person: &PersonRecord) -> Result<bool> {
        let Some(id) = person.id else {
            return Ok(false);
        };

        let mut persons = self.persons.write();
        match persons.iter_mut().find(|p| p.id == Some(id)) {
            Some(slot) => {
                *slot = person.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<PersonRecord>> {
        Ok(self.persons.read().clone())
    }

    fn name(&self) -> &str {
        "Memory"
    }
}

/// Create the store for a run: PostgreSQL when a pool is given, otherwise
/// an empty in-memory registry
pub fn create_person_store(pool: Option<PgPool>) -> Box<dyn PersonStore> {
    match pool {
        Some(pool) => Box::new(PgPersonStore::new(pool)),
        None => Box::new(MemoryPersonStore::new()),
    }
}
