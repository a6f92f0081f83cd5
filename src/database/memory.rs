use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{NewWebtoon, Webtoon, WebtoonSummary};
use super::store::{parse_id, StoreError, WebtoonStore};

/// Process-local store. Records keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryWebtoonStore {
    records: RwLock<Vec<Webtoon>>,
}

impl MemoryWebtoonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebtoonStore for MemoryWebtoonStore {
    async fn list(&self) -> Result<Vec<WebtoonSummary>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().map(WebtoonSummary::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Webtoon, StoreError> {
        let id = parse_id(id)?;
        let records = self.records.read().await;
        records
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or(StoreError::NotFound("Webtoon"))
    }

    async fn create(&self, doc: NewWebtoon) -> Result<Webtoon, StoreError> {
        let webtoon = Webtoon::from_document(Uuid::new_v4(), doc);
        self.records.write().await.push(webtoon.clone());
        Ok(webtoon)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id(id)?;
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|w| w.id == id)
            .ok_or(StoreError::NotFound("Webtoon"))?;
        records.remove(position);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {
        self.records.write().await.clear();
    }
}
