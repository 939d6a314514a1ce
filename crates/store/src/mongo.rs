use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{DateTime, doc, oid::ObjectId},
    options::FindOptions,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{NewPhrase, NewWord, PhraseRecord, StoreError, UserRecord, WordRecord, normalize};

const DB_NAME: &str = "dictionary_app";

#[derive(Serialize, Deserialize)]
struct WordDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: ObjectId,
    word: String,
    #[serde(default)]
    meanings: Vec<Value>,
    #[serde(default)]
    sentences: Vec<String>,
    #[serde(default)]
    part_of_speech: Vec<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

#[derive(Serialize, Deserialize)]
struct PhraseDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: ObjectId,
    phrase: String,
    #[serde(default)]
    meanings: Vec<Value>,
    #[serde(default)]
    examples: Vec<String>,
    #[serde(default)]
    contexts: Vec<String>,
    #[serde(default)]
    similar_phrases: Vec<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

#[derive(Serialize, Deserialize)]
struct UserDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    email: String,
    password: String,
    #[serde(default)]
    name: String,
    created_at: DateTime,
    updated_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login: Option<DateTime>,
}

#[derive(Clone)]
pub struct MongoStore {
    words: Collection<WordDoc>,
    phrases: Collection<PhraseDoc>,
    users: Collection<UserDoc>,
}

fn oid(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId)
}

fn rfc3339(ts: DateTime) -> String {
    ts.try_to_rfc3339_string().unwrap_or_default()
}

fn hex_id(id: Option<ObjectId>) -> String {
    id.map(|o| o.to_hex()).unwrap_or_default()
}

impl From<WordDoc> for WordRecord {
    fn from(doc: WordDoc) -> Self {
        WordRecord {
            word_id: hex_id(doc.id),
            word: doc.word,
            meanings: doc.meanings,
            sentences: doc.sentences,
            part_of_speech: doc.part_of_speech,
            synonyms: doc.synonyms,
            created_at: rfc3339(doc.created_at),
            updated_at: rfc3339(doc.updated_at),
        }
    }
}

impl From<PhraseDoc> for PhraseRecord {
    fn from(doc: PhraseDoc) -> Self {
        PhraseRecord {
            phrase_id: hex_id(doc.id),
            phrase: doc.phrase,
            meanings: doc.meanings,
            examples: doc.examples,
            contexts: doc.contexts,
            similar_phrases: doc.similar_phrases,
            created_at: rfc3339(doc.created_at),
            updated_at: rfc3339(doc.updated_at),
        }
    }
}

impl From<UserDoc> for UserRecord {
    fn from(doc: UserDoc) -> Self {
        UserRecord {
            user_id: hex_id(doc.id),
            email: doc.email,
            password_hash: doc.password,
            name: doc.name,
        }
    }
}

impl MongoStore {
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client.database(DB_NAME);
        Ok(Self {
            words: db.collection("words"),
            phrases: db.collection("phrases"),
            users: db.collection("users"),
        })
    }

    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        name: &str,
    ) -> Result<String, StoreError> {
        let email = normalize(email);
        if self.users.find_one(doc! { "email": &email }, None).await?.is_some() {
            return Err(StoreError::AlreadyExists);
        }
        let now = DateTime::now();
        let result = self
            .users
            .insert_one(
                UserDoc {
                    id: None,
                    email,
                    password: password_hash.to_string(),
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                    last_login: None,
                },
                None,
            )
            .await?;
        Ok(hex_id(result.inserted_id.as_object_id()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let email = normalize(email);
        let doc = self.users.find_one(doc! { "email": &email }, None).await?;
        Ok(doc.map(UserRecord::from))
    }

    pub async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let doc = self
            .users
            .find_one(doc! { "_id": oid(user_id)? }, None)
            .await?;
        Ok(doc.map(UserRecord::from))
    }

    pub async fn touch_login(&self, user_id: &str) -> Result<(), StoreError> {
        let result = self
            .users
            .update_one(
                doc! { "_id": oid(user_id)? },
                doc! { "$set": { "last_login": DateTime::now() } },
                None,
            )
            .await?;
        // Same contract as the memory backend: unknown user is an error.
        if result.matched_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub async fn insert_word(&self, user_id: &str, word: NewWord) -> Result<String, StoreError> {
        let user_id = oid(user_id)?;
        let text = normalize(&word.word);
        let existing = self
            .words
            .find_one(doc! { "user_id": user_id, "word": &text }, None)
            .await?;
        if existing.is_some() {
            return Err(StoreError::AlreadyExists);
        }
        let now = DateTime::now();
        let result = self
            .words
            .insert_one(
                WordDoc {
                    id: None,
                    user_id,
                    word: text,
                    meanings: word.meanings,
                    sentences: word.sentences,
                    part_of_speech: word.part_of_speech,
                    synonyms: word.synonyms,
                    created_at: now,
                    updated_at: now,
                },
                None,
            )
            .await?;
        Ok(hex_id(result.inserted_id.as_object_id()))
    }

    pub async fn list_words(&self, user_id: &str) -> Result<Vec<WordRecord>, StoreError> {
        let cursor = self
            .words
            .find(
                doc! { "user_id": oid(user_id)? },
                FindOptions::builder().sort(doc! { "updated_at": -1 }).build(),
            )
            .await?;
        let docs: Vec<WordDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(WordRecord::from).collect())
    }

    pub async fn delete_word(&self, user_id: &str, word: &str) -> Result<String, StoreError> {
        let text = normalize(word);
        let result = self
            .words
            .delete_one(doc! { "user_id": oid(user_id)?, "word": &text }, None)
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(text)
    }

    pub async fn delete_word_by_id(
        &self,
        user_id: &str,
        word_id: &str,
    ) -> Result<String, StoreError> {
        let filter = doc! { "_id": oid(word_id)?, "user_id": oid(user_id)? };
        let doc = self
            .words
            .find_one(filter.clone(), None)
            .await?
            .ok_or(StoreError::NotFound)?;
        self.words.delete_one(filter, None).await?;
        Ok(doc.word)
    }

    pub async fn insert_phrase(
        &self,
        user_id: &str,
        phrase: NewPhrase,
    ) -> Result<String, StoreError> {
        let user_id = oid(user_id)?;
        let text = normalize(&phrase.phrase);
        let existing = self
            .phrases
            .find_one(doc! { "user_id": user_id, "phrase": &text }, None)
            .await?;
        if existing.is_some() {
            return Err(StoreError::AlreadyExists);
        }
        let now = DateTime::now();
        let result = self
            .phrases
            .insert_one(
                PhraseDoc {
                    id: None,
                    user_id,
                    phrase: text,
                    meanings: phrase.meanings,
                    examples: phrase.examples,
                    contexts: phrase.contexts,
                    similar_phrases: phrase.similar_phrases,
                    created_at: now,
                    updated_at: now,
                },
                None,
            )
            .await?;
        Ok(hex_id(result.inserted_id.as_object_id()))
    }

    pub async fn list_phrases(&self, user_id: &str) -> Result<Vec<PhraseRecord>, StoreError> {
        let cursor = self
            .phrases
            .find(
                doc! { "user_id": oid(user_id)? },
                FindOptions::builder().sort(doc! { "updated_at": -1 }).build(),
            )
            .await?;
        let docs: Vec<PhraseDoc> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(PhraseRecord::from).collect())
    }

    pub async fn delete_phrase(&self, user_id: &str, phrase: &str) -> Result<String, StoreError> {
        let text = normalize(phrase);
        let result = self
            .phrases
            .delete_one(doc! { "user_id": oid(user_id)?, "phrase": &text }, None)
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(text)
    }

    pub async fn delete_phrase_by_id(
        &self,
        user_id: &str,
        phrase_id: &str,
    ) -> Result<String, StoreError> {
        let filter = doc! { "_id": oid(phrase_id)?, "user_id": oid(user_id)? };
        let doc = self
            .phrases
            .find_one(filter.clone(), None)
            .await?
            .ok_or(StoreError::NotFound)?;
        self.phrases.delete_one(filter, None).await?;
        Ok(doc.phrase)
    }
}
