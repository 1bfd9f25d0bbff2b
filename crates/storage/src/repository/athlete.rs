use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::AthleteStore;
use crate::error::{Result, StorageError};
use crate::models::{Athlete, AthleteFields};
use crate::query::{AthleteFilter, Page, PageRequest};

const ATHLETE_COLUMNS: &str = "id, first_name, last_name, birth_timestamp, nationality, \
                               discipline, personal_best, bio";

/// PostgreSQL-backed athlete store
#[derive(Debug, Clone)]
pub struct AthleteRepository {
    pool: PgPool,
}

impl AthleteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count_matching(&self, filter: &AthleteFilter) -> Result<u64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM athletes WHERE 1=1");
        filter.push_conditions(&mut query);

        let count = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }
}

/// `SELECT` for one page of matching athletes, ordered and bounded.
fn page_query(filter: &AthleteFilter, request: &PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT ");
    query.push(ATHLETE_COLUMNS);
    query.push(" FROM athletes WHERE 1=1");
    filter.push_conditions(&mut query);
    query.push(" ORDER BY ");
    query.push(request.sort.to_sql());
    query.push(" LIMIT ");
    query.push_bind(i64::from(request.limit()));
    query.push(" OFFSET ");
    query.push_bind(i64::try_from(request.offset()).unwrap_or(i64::MAX));
    query
}

#[async_trait]
impl AthleteStore for AthleteRepository {
    async fn find_page(
        &self,
        filter: &AthleteFilter,
        request: &PageRequest,
    ) -> Result<Page<Athlete>> {
        let total_elements = self.count_matching(filter).await?;

        let mut query = page_query(filter, request);
        let athletes: Vec<Athlete> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(Page::new(athletes, request, total_elements))
    }

    async fn find_all(&self) -> Result<Vec<Athlete>> {
        let athletes = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(athletes)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Athlete>> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(athlete)
    }

    async fn exists_by_identity(
        &self,
        first_name: &str,
        last_name: &str,
        birth_timestamp: i64,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM athletes
                WHERE first_name = $1 AND last_name = $2 AND birth_timestamp = $3
            )
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(birth_timestamp)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, fields: &AthleteFields) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            r#"
            INSERT INTO athletes (first_name, last_name, birth_timestamp, nationality,
                                  discipline, personal_best, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ATHLETE_COLUMNS}
            "#
        ))
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birth_timestamp)
        .bind(&fields.nationality)
        .bind(&fields.discipline)
        .bind(&fields.personal_best)
        .bind(&fields.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                StorageError::Duplicate {
                    first_name: fields.first_name.clone(),
                    last_name: fields.last_name.clone(),
                }
            } else {
                e
            }
        })?;

        Ok(athlete)
    }

    async fn update(&self, id: i64, fields: &AthleteFields) -> Result<Athlete> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            r#"
            UPDATE athletes
            SET first_name = $2,
                last_name = $3,
                birth_timestamp = $4,
                nationality = $5,
                discipline = $6,
                personal_best = $7,
                bio = $8
            WHERE id = $1
            RETURNING {ATHLETE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.first_name)
        .bind(&fields.last_name)
        .bind(fields.birth_timestamp)
        .bind(&fields.nationality)
        .bind(&fields.discipline)
        .bind(&fields.personal_best)
        .bind(&fields.bio)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound { id })?;

        Ok(athlete)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
