pub mod accounts;
pub mod phrases;
pub mod sentences;
pub mod words;

use axum::http::{HeaderMap, header};
use axum::routing::{delete, get, post};
use axum::{Json, Router, extract::State};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/signup", post(accounts::signup))
        .route("/auth/login", post(accounts::login))
        .route("/words/define", post(words::define))
        .route("/words/add", post(words::add))
        .route("/words/my_words", get(words::my_words))
        .route("/words/delete/:word", delete(words::delete_by_text))
        .route("/words/delete_by_id/:word_id", delete(words::delete_by_id))
        .route("/phrases/define", post(phrases::define))
        .route("/phrases/add", post(phrases::add))
        .route("/phrases/my_phrases", get(phrases::my_phrases))
        .route("/phrases/delete/:phrase", delete(phrases::delete_by_text))
        .route("/phrases/delete_by_id/:phrase_id", delete(phrases::delete_by_id))
        .route("/phrases/frame_sentences", post(phrases::frame_sentences))
        .route("/sentences/frame_sentences", post(sentences::frame_sentences))
        .layer(cors)
        .with_state(state)
}

/// Resolves the bearer token to an existing user id. Expired and
/// tampered tokens, and tokens for deleted users, are all 401.
pub(crate) async fn current_user(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

    let user_id = state.tokens.verify(token)?;
    match state.store.find_user_by_id(&user_id).await {
        Ok(Some(_)) => Ok(user_id),
        Ok(None) => Err(auth::AuthError::SubjectNotFound.into()),
        Err(store::StoreError::InvalidId) => Err(ApiError::unauthorized("Invalid user ID")),
        Err(e) => Err(ApiError::internal(e.to_string())),
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Wordify API is running!",
        "version": "1.0.0",
        "endpoints": {
            "auth": "/auth/signup, /auth/login",
            "words": "/words/add, /words/my_words, /words/define, /words/delete/{word}, /words/delete_by_id/{word_id}",
            "sentences": "/sentences/frame_sentences",
            "phrases": "/phrases/add, /phrases/my_phrases, /phrases/define, /phrases/frame_sentences, /phrases/delete/{phrase}, /phrases/delete_by_id/{phrase_id}",
            "health": "/health"
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let backend = match state.store {
        store::Store::Mongo(_) => "mongodb",
        store::Store::Memory(_) => "memory",
    };
    Json(json!({
        "status": "healthy",
        "service": "Wordify API",
        "gemini_api_configured": state.generator.is_configured(),
        "storage_backend": backend
    }))
}
