//! PostgreSQL-backed person store

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::PersonStore;
use crate::db::queries;
use crate::types::PersonRecord;

pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PersonStore for PgPersonStore {
    async fn find_by_name_query(&self, query: &str) -> Result<Vec<PersonRecord>> {
        queries::person::find_by_name_query(&self.pool, query).await
    }

    async fn insert(&self, person: &PersonRecord) -> Result<Uuid> {
        queries::person::insert_person(&self.pool, person).await
    }

    async fn update(&self, person: &PersonRecord) -> Result<bool> {
        match person.id {
            Some(id) => queries::person::update_person(&self.pool, id, person).await,
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<PersonRecord>> {
        queries::person::list_persons(&self.pool).await
    }

    fn name(&self) -> &str {
        "PostgreSQL"
    }
}
