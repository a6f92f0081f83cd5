use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::database::store::StoreError;
use crate::validation::ValidatedWebtoon;

/// A stored webtoon. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webtoon {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author: String,
    pub characters: Vec<String>,
}

/// Reduced view returned by the listing endpoint (no `id`, no `author`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebtoonSummary {
    pub title: String,
    pub description: String,
    pub characters: Vec<String>,
}

/// Document body persisted for a webtoon, everything except the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWebtoon {
    pub title: String,
    pub description: String,
    pub author: String,
    pub characters: Vec<String>,
}

impl Webtoon {
    pub fn from_document(id: Uuid, doc: NewWebtoon) -> Self {
        Self {
            id,
            title: doc.title,
            description: doc.description,
            author: doc.author,
            characters: doc.characters,
        }
    }
}

impl From<&Webtoon> for WebtoonSummary {
    fn from(webtoon: &Webtoon) -> Self {
        Self {
            title: webtoon.title.clone(),
            description: webtoon.description.clone(),
            characters: webtoon.characters.clone(),
        }
    }
}

impl TryFrom<ValidatedWebtoon> for NewWebtoon {
    type Error = StoreError;

    /// Casts fields the way a document mapper would: strings pass, numbers
    /// and booleans are stringified, anything else is rejected.
    fn try_from(payload: ValidatedWebtoon) -> Result<Self, Self::Error> {
        let characters = payload
            .characters
            .into_iter()
            .enumerate()
            .map(|(index, value)| cast_text(format!("characters.{}", index), value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: cast_text("title".to_string(), payload.title)?,
            description: cast_text("description".to_string(), payload.description)?,
            author: cast_text("author".to_string(), payload.author)?,
            characters,
        })
    }
}

fn cast_text(path: String, value: Value) -> Result<String, StoreError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(StoreError::Cast {
            path,
            value: other.to_string(),
        }),
    }
}
