use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use super::models::{NewWebtoon, Webtoon, WebtoonSummary};
use super::store::{parse_id, StoreError, WebtoonStore};
use crate::config::DatabaseConfig;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS webtoons (
    id UUID PRIMARY KEY,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

/// Webtoon documents stored as JSONB rows in Postgres
pub struct PgWebtoonStore {
    pool: PgPool,
}

impl PgWebtoonStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        let store = Self::from_pool(pool).await?;
        info!("Connected to database: {}", redact_url(url));
        Ok(store)
    }

    /// Wrap an existing pool, creating the webtoons table if needed
    pub async fn from_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl WebtoonStore for PgWebtoonStore {
    async fn list(&self) -> Result<Vec<WebtoonSummary>, StoreError> {
        let rows = sqlx::query(
            "SELECT document->>'title' AS title,
                    document->>'description' AS description,
                    document->'characters' AS characters
             FROM webtoons
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<WebtoonSummary, StoreError> {
                let Json(characters) = row.try_get::<Json<Vec<String>>, _>("characters")?;
                Ok(WebtoonSummary {
                    title: row.try_get("title")?,
                    description: row.try_get("description")?,
                    characters,
                })
            })
            .collect()
    }

    async fn get(&self, id: &str) -> Result<Webtoon, StoreError> {
        let id = parse_id(id)?;

        let row = sqlx::query("SELECT document FROM webtoons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("Webtoon"))?;

        let Json(doc) = row.try_get::<Json<NewWebtoon>, _>("document")?;
        Ok(Webtoon::from_document(id, doc))
    }

    async fn create(&self, doc: NewWebtoon) -> Result<Webtoon, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO webtoons (id, document) VALUES ($1, $2)")
            .bind(id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await?;

        debug!("Inserted webtoon {}", id);
        Ok(Webtoon::from_document(id, doc))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;

        let result = sqlx::query("DELETE FROM webtoons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("Webtoon"));
        }
        debug!("Deleted webtoon {}", id);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Strip credentials from a connection string before it is logged
fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.into()
        }
        Err(_) => "<unparseable url>".to_string(),
    }
}
