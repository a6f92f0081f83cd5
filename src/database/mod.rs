pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use tracing::warn;

use crate::config::DatabaseConfig;

pub use memory::MemoryWebtoonStore;
pub use models::{NewWebtoon, Webtoon, WebtoonSummary};
pub use postgres::PgWebtoonStore;
pub use store::{StoreError, WebtoonStore};

/// Open the store described by the configuration. Falls back to the
/// in-memory store when no database URL is set.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn WebtoonStore>, StoreError> {
    match &config.url {
        Some(url) => Ok(Arc::new(PgWebtoonStore::connect(url, config).await?)),
        None => {
            warn!("DATABASE_URL not set; webtoons are kept in memory and lost on exit");
            Ok(Arc::new(MemoryWebtoonStore::new()))
        }
    }
}
