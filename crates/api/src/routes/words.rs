use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};
use store::{NewWord, StoreError};
use tracing::info;

use crate::error::ApiError;
use crate::routes::current_user;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WordRequest {
    pub word: String,
}

#[derive(Deserialize)]
pub struct AddWordRequest {
    pub word: String,
    #[serde(default)]
    pub meanings: Vec<Value>,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub part_of_speech: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// Look up definitions without saving anything. Provider outages come
/// back as a placeholder result, not an error.
pub async fn define(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<WordRequest>,
) -> Result<Json<Value>, ApiError> {
    current_user(&state, &headers).await?;
    let word = store::normalize(&req.word);
    if word.is_empty() {
        return Err(ApiError::bad_request("Word cannot be empty"));
    }

    info!(%word, "looking up definitions");
    let result = state.generator.define_word(&word).await?;

    Ok(Json(json!({
        "word": word,
        "meanings": result.meanings,
        "total_meanings": result.meanings.len(),
        "source": "gemini_api"
    })))
}

pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddWordRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let word = store::normalize(&req.word);
    if word.is_empty() {
        return Err(ApiError::bad_request("Word cannot be empty"));
    }

    let record = NewWord {
        word,
        meanings: req.meanings,
        sentences: req.sentences,
        part_of_speech: req.part_of_speech,
        synonyms: req.synonyms,
    };
    let saved = record.word.clone();

    match state.store.insert_word(&user_id, record).await {
        Ok(word_id) => Ok(Json(json!({
            "message": "Word added successfully",
            "word_id": word_id,
            "word": saved
        }))),
        Err(StoreError::AlreadyExists) => {
            Err(ApiError::conflict("Word already exists in your collection"))
        }
        Err(e) => Err(ApiError::internal(format!("Failed to add word: {e}"))),
    }
}

pub async fn my_words(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let words = state
        .store
        .list_words(&user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch words: {e}")))?;

    Ok(Json(json!({
        "total_words": words.len(),
        "words": words
    })))
}

pub async fn delete_by_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(word): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let normalized = store::normalize(&word);
    if normalized.is_empty() {
        return Err(ApiError::bad_request("Word cannot be empty"));
    }

    match state.store.delete_word(&user_id, &normalized).await {
        Ok(deleted) => Ok(Json(json!({
            "message": format!("Word '{word}' deleted successfully"),
            "deleted_word": deleted,
            "deleted_count": 1
        }))),
        Err(StoreError::NotFound) => Err(ApiError::not_found(format!(
            "Word '{word}' not found in your collection"
        ))),
        Err(e) => Err(ApiError::internal(format!("Failed to delete word: {e}"))),
    }
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(word_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;

    match state.store.delete_word_by_id(&user_id, &word_id).await {
        Ok(deleted) => Ok(Json(json!({
            "message": format!("Word '{deleted}' deleted successfully"),
            "deleted_word": deleted,
            "deleted_word_id": word_id,
            "deleted_count": 1
        }))),
        Err(StoreError::InvalidId) => Err(ApiError::bad_request("Invalid word ID format")),
        Err(StoreError::NotFound) => {
            Err(ApiError::not_found("Word not found in your collection"))
        }
        Err(e) => Err(ApiError::internal(format!("Failed to delete word: {e}"))),
    }
}
