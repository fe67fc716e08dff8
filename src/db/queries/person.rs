//! Person (clergy registry) database queries

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::types::PersonRecord;

/// Insert a new person, returning the generated id
pub async fn insert_person(pool: &PgPool, person: &PersonRecord) -> Result<Uuid> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO persons (
            id, name, patronymic, surname,
            birth_date, birth_place, nationality, status, name_day,
            deacon_ordination_date, priest_ordination_date,
            service_place, spiritual_education, secular_education,
            last_reward, phone, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4,
            $5, $6, $7, $8, $9,
            $10, $11,
            $12, $13, $14,
            $15, $16, NOW(), NOW()
        )
        "#
    )
    .bind(id)
    .bind(&person.name)
    .bind(&person.patronymic)
    .bind(&person.surname)
    .bind(person.birth_date)
    .bind(&person.birth_place)
    .bind(&person.nationality)
    .bind(&person.status)
    .bind(&person.name_day)
    .bind(person.deacon_ordination_date)
    .bind(person.priest_ordination_date)
    .bind(&person.service_place)
    .bind(&person.spiritual_education)
    .bind(&person.secular_education)
    .bind(&person.last_reward)
    .bind(&person.phone)
    .execute(pool)
    .await?;

    Ok(id)
}

/// Overwrite every field of an existing person. Returns false when no row
/// has that id.
pub async fn update_person(pool: &PgPool, id: Uuid, person: &PersonRecord) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE persons SET
            name = $2,
            patronymic = $3,
            surname = $4,
            birth_date = $5,
            birth_place = $6,
            nationality = $7,
            status = $8,
            name_day = $9,
            deacon_ordination_date = $10,
            priest_ordination_date = $11,
            service_place = $12,
            spiritual_education = $13,
            secular_education = $14,
            last_reward = $15,
            phone = $16,
            updated_at = NOW()
        WHERE id = $1
        "#
    )
    .bind(id)
    .bind(&person.name)
    .bind(&person.patronymic)
    .bind(&person.surname)
    .bind(person.birth_date)
    .bind(&person.birth_place)
    .bind(&person.nationality)
    .bind(&person.status)
    .bind(&person.name_day)
    .bind(person.deacon_ordination_date)
    .bind(person.priest_ordination_date)
    .bind(&person.service_place)
    .bind(&person.spiritual_education)
    .bind(&person.secular_education)
    .bind(&person.last_reward)
    .bind(&person.phone)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Case-insensitive search over each name part and the joined full name
pub async fn find_by_name_query(pool: &PgPool, query: &str) -> Result<Vec<PersonRecord>> {
    let pattern = format!("%{}%", escape_like(query.trim()));

    let persons = sqlx::query_as::<_, PersonRecord>(
        r#"
        SELECT
            id, name, patronymic, surname,
            birth_date, birth_place, nationality, status, name_day,
            deacon_ordination_date, priest_ordination_date,
            service_place, spiritual_education, secular_education,
            last_reward, phone
        FROM persons
        WHERE name ILIKE $1 ESCAPE '\'
           OR surname ILIKE $1 ESCAPE '\'
           OR patronymic ILIKE $1 ESCAPE '\'
           OR (name || ' ' || surname) ILIKE $1 ESCAPE '\'
           OR (surname || ' ' || name || ' ' || patronymic) ILIKE $1 ESCAPE '\'
        ORDER BY surname ASC, name ASC
        "#
    )
    .bind(pattern)
    .fetch_all(pool)
    .await?;

    Ok(persons)
}

/// Make LIKE wildcards in user input literal (`\` is the escape character)
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Whole registry ordered by surname
pub async fn list_persons(pool: &PgPool) -> Result<Vec<PersonRecord>> {
    let persons = sqlx::query_as::<_, PersonRecord>(
        r#"
        SELECT
            id, name, patronymic, surname,
            birth_date, birth_place, nationality, status, name_day,
            deacon_ordination_date, priest_ordination_date,
            service_place, spiritual_education, secular_education,
            last_reward, phone
        FROM persons
        ORDER BY surname ASC, name ASC
        "#
    )
    .fetch_all(pool)
    .await?;

    Ok(persons)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_makes_wildcards_literal() {
        assert_eq!(escape_like("Иванов"), "Иванов");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("C:\\x"), "C:\\\\x");
    }
}
