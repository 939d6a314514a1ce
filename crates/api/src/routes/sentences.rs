use axum::{Json, extract::State};
use generate::WordSeed;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SentenceRequest {
    pub words: Vec<WordSeed>,
}

/// Batch sentence framing for words with known meanings. Provider
/// failures propagate as a hard 500; there is no fallback here.
pub async fn frame_sentences(
    State(state): State<AppState>,
    Json(req): Json<SentenceRequest>,
) -> Result<Json<Value>, ApiError> {
    if req.words.is_empty() {
        return Err(ApiError::bad_request("Words must be a non-empty array"));
    }

    info!(count = req.words.len(), "framing word sentences");
    let batch = state.generator.frame_word_sentences(&req.words).await?;

    Ok(Json(json!({
        "words_processed": req.words.len(),
        "sentences": batch.sentences,
        "total_words": batch.sentences.len(),
        "source": "gemini_api"
    })))
}
