use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use generate::PhraseSeed;
use serde::Deserialize;
use serde_json::{Value, json};
use store::{NewPhrase, StoreError};
use tracing::info;

use crate::error::ApiError;
use crate::routes::current_user;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PhraseRequest {
    pub phrase: String,
}

#[derive(Deserialize)]
pub struct AddPhraseRequest {
    pub phrase: String,
    #[serde(default)]
    pub meanings: Vec<Value>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub contexts: Vec<String>,
    #[serde(default)]
    pub similar_phrases: Vec<String>,
}

#[derive(Deserialize)]
pub struct PhraseSentenceRequest {
    pub phrases: Vec<PhraseSeed>,
}

pub async fn define(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<PhraseRequest>,
) -> Result<Json<Value>, ApiError> {
    current_user(&state, &headers).await?;
    let phrase = store::normalize(&req.phrase);
    if phrase.is_empty() {
        return Err(ApiError::bad_request("Phrase cannot be empty"));
    }

    info!(%phrase, "looking up phrase meanings");
    let result = state.generator.define_phrase(&phrase).await?;

    Ok(Json(json!({
        "phrase": phrase,
        "meanings": result.meanings,
        "total_meanings": result.meanings.len(),
        "source": "gemini_api"
    })))
}

pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AddPhraseRequest>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let phrase = store::normalize(&req.phrase);
    if phrase.is_empty() {
        return Err(ApiError::bad_request("Phrase cannot be empty"));
    }

    let record = NewPhrase {
        phrase,
        meanings: req.meanings,
        examples: req.examples,
        contexts: req.contexts,
        similar_phrases: req.similar_phrases,
    };
    let saved = record.phrase.clone();

    match state.store.insert_phrase(&user_id, record).await {
        Ok(phrase_id) => Ok(Json(json!({
            "message": "Phrase added successfully",
            "phrase_id": phrase_id,
            "phrase": saved
        }))),
        Err(StoreError::AlreadyExists) => {
            Err(ApiError::conflict("Phrase already exists in your collection"))
        }
        Err(e) => Err(ApiError::internal(format!("Failed to add phrase: {e}"))),
    }
}

pub async fn my_phrases(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let phrases = state
        .store
        .list_phrases(&user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to fetch phrases: {e}")))?;

    Ok(Json(json!({
        "total_phrases": phrases.len(),
        "phrases": phrases
    })))
}

pub async fn delete_by_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(phrase): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;
    let normalized = store::normalize(&phrase);
    if normalized.is_empty() {
        return Err(ApiError::bad_request("Phrase cannot be empty"));
    }

    match state.store.delete_phrase(&user_id, &normalized).await {
        Ok(deleted) => Ok(Json(json!({
            "message": format!("Phrase '{phrase}' deleted successfully"),
            "deleted_phrase": deleted,
            "deleted_count": 1
        }))),
        Err(StoreError::NotFound) => Err(ApiError::not_found(format!(
            "Phrase '{phrase}' not found in your collection"
        ))),
        Err(e) => Err(ApiError::internal(format!("Failed to delete phrase: {e}"))),
    }
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(phrase_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = current_user(&state, &headers).await?;

    match state.store.delete_phrase_by_id(&user_id, &phrase_id).await {
        Ok(deleted) => Ok(Json(json!({
            "message": format!("Phrase '{deleted}' deleted successfully"),
            "deleted_phrase": deleted,
            "deleted_phrase_id": phrase_id,
            "deleted_count": 1
        }))),
        Err(StoreError::InvalidId) => Err(ApiError::bad_request("Invalid phrase ID format")),
        Err(StoreError::NotFound) => {
            Err(ApiError::not_found("Phrase not found in your collection"))
        }
        Err(e) => Err(ApiError::internal(format!("Failed to delete phrase: {e}"))),
    }
}

/// Batch sentence framing. Unlike single lookups this path does not
/// degrade: a provider failure is a hard 500.
pub async fn frame_sentences(
    State(state): State<AppState>,
    Json(req): Json<PhraseSentenceRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.phrases.is_empty() {
        return Err(ApiError::bad_request("Phrases must be a non-empty array"));
    }

    info!(count = req.phrases.len(), "framing phrase sentences");
    let batch = state.generator.frame_phrase_sentences(&req.phrases).await?;

    Ok(Json(json!({
        "phrases_processed": req.phrases.len(),
        "sentences": batch.sentences,
        "total_phrases": batch.sentences.len(),
        "source": "gemini_api"
    })))
}
