use std::sync::Arc;

use dashmap::DashMap;
use mongodb::bson::DateTime;
use uuid::Uuid;

use crate::{NewPhrase, NewWord, PhraseRecord, StoreError, UserRecord, WordRecord, normalize};

#[derive(Clone)]
struct MemUser {
    record: UserRecord,
    last_login: Option<String>,
}

#[derive(Clone)]
struct Owned<T> {
    user_id: String,
    record: T,
}

/// DashMap-backed store, keyed by record id. Collections here are
/// per-user and small, so duplicate checks are linear scans.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, MemUser>>,
    words: Arc<DashMap<String, Owned<WordRecord>>>,
    phrases: Arc<DashMap<String, Owned<PhraseRecord>>>,
}

fn now_rfc3339() -> String {
    DateTime::now().try_to_rfc3339_string().unwrap_or_default()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<String, StoreError> {
        let email = normalize(email);
        if self.users.iter().any(|u| u.record.email == email) {
            return Err(StoreError::AlreadyExists);
        }
        let user_id = Uuid::new_v4().to_string();
        self.users.insert(
            user_id.clone(),
            MemUser {
                record: UserRecord {
                    user_id: user_id.clone(),
                    email,
                    password_hash: password_hash.to_string(),
                    name: name.to_string(),
                },
                last_login: None,
            },
        );
        Ok(user_id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = normalize(email);
        self.users
            .iter()
            .find(|u| u.record.email == email)
            .map(|u| u.record.clone())
    }

    pub fn find_user_by_id(&self, user_id: &str) -> Option<UserRecord> {
        self.users.get(user_id).map(|u| u.record.clone())
    }

    pub fn touch_login(&self, user_id: &str) -> Result<(), StoreError> {
        match self.users.get_mut(user_id) {
            Some(mut u) => {
                u.last_login = Some(now_rfc3339());
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    pub fn insert_word(&self, user_id: &str, word: NewWord) -> Result<String, StoreError> {
        let text = normalize(&word.word);
        if self
            .words
            .iter()
            .any(|w| w.user_id == user_id && w.record.word == text)
        {
            return Err(StoreError::AlreadyExists);
        }
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        self.words.insert(
            id.clone(),
            Owned {
                user_id: user_id.to_string(),
                record: WordRecord {
                    word_id: id.clone(),
                    word: text,
                    meanings: word.meanings,
                    sentences: word.sentences,
                    part_of_speech: word.part_of_speech,
                    synonyms: word.synonyms,
                    created_at: now.clone(),
                    updated_at: now,
                },
            },
        );
        Ok(id)
    }

    pub fn list_words(&self, user_id: &str) -> Result<Vec<WordRecord>, StoreError> {
        let mut out: Vec<WordRecord> = self
            .words
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|w| w.record.clone())
            .collect();
        // RFC 3339 strings sort chronologically; newest first.
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    pub fn delete_word(&self, user_id: &str, word: &str) -> Result<String, StoreError> {
        let text = normalize(word);
        let id = self
            .words
            .iter()
            .find(|w| w.user_id == user_id && w.record.word == text)
            .map(|w| w.key().clone())
            .ok_or(StoreError::NotFound)?;
        self.words.remove(&id);
        Ok(text)
    }

    pub fn delete_word_by_id(&self, user_id: &str, word_id: &str) -> Result<String, StoreError> {
        let owned = match self.words.get(word_id) {
            Some(w) if w.user_id == user_id => w.record.word.clone(),
            _ => return Err(StoreError::NotFound),
        };
        self.words.remove(word_id);
        Ok(owned)
    }

    pub fn insert_phrase(&self, user_id: &str, phrase: NewPhrase) -> Result<String, StoreError> {
        let text = normalize(&phrase.phrase);
        if self
            .phrases
            .iter()
            .any(|p| p.user_id == user_id && p.record.phrase == text)
        {
            return Err(StoreError::AlreadyExists);
        }
        let id = Uuid::new_v4().to_string();
        let now = now_rfc3339();
        self.phrases.insert(
            id.clone(),
            Owned {
                user_id: user_id.to_string(),
                record: PhraseRecord {
                    phrase_id: id.clone(),
                    phrase: text,
                    meanings: phrase.meanings,
                    examples: phrase.examples,
                    contexts: phrase.contexts,
                    similar_phrases: phrase.similar_phrases,
                    created_at: now.clone(),
                    updated_at: now,
                },
            },
        );
        Ok(id)
    }

    pub fn list_phrases(&self, user_id: &str) -> Result<Vec<PhraseRecord>, StoreError> {
        let mut out: Vec<PhraseRecord> = self
            .phrases
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.record.clone())
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }

    pub fn delete_phrase(&self, user_id: &str, phrase: &str) -> Result<String, StoreError> {
        let text = normalize(phrase);
        let id = self
            .phrases
            .iter()
            .find(|p| p.user_id == user_id && p.record.phrase == text)
            .map(|p| p.key().clone())
            .ok_or(StoreError::NotFound)?;
        self.phrases.remove(&id);
        Ok(text)
    }

    pub fn delete_phrase_by_id(
        &self,
        user_id: &str,
        phrase_id: &str,
    ) -> Result<String, StoreError> {
        let owned = match self.phrases.get(phrase_id) {
            Some(p) if p.user_id == user_id => p.record.phrase.clone(),
            _ => return Err(StoreError::NotFound),
        };
        self.phrases.remove(phrase_id);
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_word_per_user_is_rejected() {
        let store = MemoryStore::new();
        let word = NewWord {
            word: "Run".to_string(),
            ..NewWord::default()
        };
        store.insert_word("u1", word.clone()).unwrap();
        // Normalizes to the same key.
        let dup = NewWord {
            word: "  run ".to_string(),
            ..NewWord::default()
        };
        assert!(matches!(
            store.insert_word("u1", dup),
            Err(StoreError::AlreadyExists)
        ));
        // Same word under a different user is fine.
        store.insert_word("u2", word).unwrap();
    }

    #[test]
    fn delete_missing_word_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_word("u1", "ghost"),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.delete_word_by_id("u1", "no-such-id"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn delete_by_id_checks_ownership() {
        let store = MemoryStore::new();
        let id = store
            .insert_word(
                "u1",
                NewWord {
                    word: "run".to_string(),
                    ..NewWord::default()
                },
            )
            .unwrap();
        assert!(matches!(
            store.delete_word_by_id("u2", &id),
            Err(StoreError::NotFound)
        ));
        assert_eq!(store.delete_word_by_id("u1", &id).unwrap(), "run");
    }

    #[test]
    fn user_email_is_unique_and_normalized() {
        let store = MemoryStore::new();
        store.create_user("Learner@Example.com", "hash", "L").unwrap();
        assert!(matches!(
            store.create_user("learner@example.com", "hash2", "L2"),
            Err(StoreError::AlreadyExists)
        ));
        let user = store.find_user_by_email("LEARNER@example.com").unwrap();
        assert_eq!(user.email, "learner@example.com");
        store.touch_login(&user.user_id).unwrap();
        assert!(matches!(
            store.touch_login("no-such-user"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn phrases_live_in_their_own_collection() {
        let store = MemoryStore::new();
        store
            .insert_word(
                "u1",
                NewWord {
                    word: "ice".to_string(),
                    ..NewWord::default()
                },
            )
            .unwrap();
        let id = store
            .insert_phrase(
                "u1",
                NewPhrase {
                    phrase: "Break the Ice".to_string(),
                    ..NewPhrase::default()
                },
            )
            .unwrap();
        assert_eq!(store.list_phrases("u1").unwrap().len(), 1);
        assert_eq!(store.list_words("u1").unwrap().len(), 1);
        assert_eq!(store.delete_phrase_by_id("u1", &id).unwrap(), "break the ice");
        assert!(store.list_phrases("u1").unwrap().is_empty());
    }
}
