//! Per-user word and phrase collections plus the user records behind
//! authentication. Uniqueness is per `(user_id, normalized_text)`.
//! Two backends share one surface: MongoDB for real deployments and a
//! DashMap-backed store for tests and local runs.

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,

    #[error("record not found")]
    NotFound,

    #[error("invalid id format")]
    InvalidId,

    #[error("storage backend error: {0}")]
    Backend(#[from] mongodb::error::Error),
}

/// Uniqueness key normalization: trim and lowercase.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewWord {
    pub word: String,
    pub meanings: Vec<Value>,
    pub sentences: Vec<String>,
    pub part_of_speech: Vec<String>,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordRecord {
    pub word_id: String,
    pub word: String,
    pub meanings: Vec<Value>,
    pub sentences: Vec<String>,
    pub part_of_speech: Vec<String>,
    pub synonyms: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPhrase {
    pub phrase: String,
    pub meanings: Vec<Value>,
    pub examples: Vec<String>,
    pub contexts: Vec<String>,
    pub similar_phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseRecord {
    pub phrase_id: String,
    pub phrase: String,
    pub meanings: Vec<Value>,
    pub examples: Vec<String>,
    pub contexts: Vec<String>,
    pub similar_phrases: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Concrete backend dispatch. An enum rather than a trait object keeps
/// the async methods plain and the API state `Clone`.
#[derive(Clone)]
pub enum Store {
    Mongo(MongoStore),
    Memory(MemoryStore),
}

impl Store {
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        Ok(Store::Mongo(MongoStore::connect(uri).await?))
    }

    pub fn memory() -> Self {
        Store::Memory(MemoryStore::new())
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.create_user(email, password_hash, name).await,
            Store::Memory(s) => s.create_user(email, password_hash, name),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.find_user_by_email(email).await,
            Store::Memory(s) => Ok(s.find_user_by_email(email)),
        }
    }

    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.find_user_by_id(user_id).await,
            Store::Memory(s) => Ok(s.find_user_by_id(user_id)),
        }
    }

    pub async fn touch_login(&self, user_id: &str) -> Result<(), StoreError> {
        match self {
            Store::Mongo(s) => s.touch_login(user_id).await,
            Store::Memory(s) => s.touch_login(user_id),
        }
    }

    pub async fn insert_word(&self, user_id: &str, word: NewWord) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.insert_word(user_id, word).await,
            Store::Memory(s) => s.insert_word(user_id, word),
        }
    }

    pub async fn list_words(&self, user_id: &str) -> Result<Vec<WordRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.list_words(user_id).await,
            Store::Memory(s) => s.list_words(user_id),
        }
    }

    pub async fn delete_word(&self, user_id: &str, word: &str) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.delete_word(user_id, word).await,
            Store::Memory(s) => s.delete_word(user_id, word),
        }
    }

    pub async fn delete_word_by_id(
        &self,
        user_id: &str,
        word_id: &str,
    ) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.delete_word_by_id(user_id, word_id).await,
            Store::Memory(s) => s.delete_word_by_id(user_id, word_id),
        }
    }

    pub async fn insert_phrase(
        &self,
        user_id: &str,
        phrase: NewPhrase,
    ) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.insert_phrase(user_id, phrase).await,
            Store::Memory(s) => s.insert_phrase(user_id, phrase),
        }
    }

    pub async fn list_phrases(&self, user_id: &str) -> Result<Vec<PhraseRecord>, StoreError> {
        match self {
            Store::Mongo(s) => s.list_phrases(user_id).await,
            Store::Memory(s) => s.list_phrases(user_id),
        }
    }

    pub async fn delete_phrase(&self, user_id: &str, phrase: &str) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.delete_phrase(user_id, phrase).await,
            Store::Memory(s) => s.delete_phrase(user_id, phrase),
        }
    }

    pub async fn delete_phrase_by_id(
        &self,
        user_id: &str,
        phrase_id: &str,
    ) -> Result<String, StoreError> {
        match self {
            Store::Mongo(s) => s.delete_phrase_by_id(user_id, phrase_id).await,
            Store::Memory(s) => s.delete_phrase_by_id(user_id, phrase_id),
        }
    }
}
