use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::models::{NewWebtoon, Webtoon, WebtoonSummary};

/// Errors from a webtoon store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Cast to UUID failed for value \"{0}\" at path \"id\"")]
    InvalidId(String),

    #[error("Cast to string failed for value {value} at path \"{path}\"")]
    Cast { path: String, value: String },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence operations behind the webtoon routes.
///
/// Implementations are shared across all requests for the life of the
/// process; `close` is called once on shutdown.
#[async_trait]
pub trait WebtoonStore: Send + Sync {
    /// All records, reduced to title, description and characters.
    async fn list(&self) -> Result<Vec<WebtoonSummary>, StoreError>;

    async fn get(&self, id: &str) -> Result<Webtoon, StoreError>;

    /// Persist a new document and return it with its assigned id.
    async fn create(&self, doc: NewWebtoon) -> Result<Webtoon, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn close(&self);
}

pub(crate) fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}
