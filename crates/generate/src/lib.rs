pub mod client;
pub mod error;
pub mod extract;
pub mod prompt;
pub mod schema;

pub use client::{GeminiClient, ProviderConfig};
pub use error::GenerateError;
pub use schema::{
    PhraseDefinitions, PhraseMeaning, PhraseSeed, PhraseSentenceBatch, SentenceBatch,
    WordDefinitions, WordMeaning, WordSeed,
};

use tracing::warn;

/// The definition/sentence generation pipeline: prompt construction,
/// provider call with retry escalation, and structured extraction.
///
/// Single lookups degrade to a placeholder when the provider is
/// unreachable; batch sentence framing propagates failure instead.
/// Callers of the batch paths must handle a hard error.
#[derive(Clone)]
pub struct Generator {
    client: GeminiClient,
}

impl Generator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn define_word(&self, word: &str) -> Result<WordDefinitions, GenerateError> {
        let prompt = prompt::word_definitions(word);
        match self.client.generate_escalating(&prompt).await {
            Ok(raw) => Ok(extract::word_definitions(&raw)),
            Err(e) if e.is_degradable() => {
                warn!(word, error = %e, "returning fallback definition");
                Ok(WordDefinitions::unavailable(word))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn define_phrase(&self, phrase: &str) -> Result<PhraseDefinitions, GenerateError> {
        let prompt = prompt::phrase_meanings(phrase);
        match self.client.generate_escalating(&prompt).await {
            Ok(raw) => Ok(extract::phrase_definitions(&raw)),
            Err(e) if e.is_degradable() => {
                warn!(phrase, error = %e, "returning fallback phrase definition");
                Ok(PhraseDefinitions::unavailable(phrase))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn frame_word_sentences(
        &self,
        words: &[WordSeed],
    ) -> Result<SentenceBatch, GenerateError> {
        if words.is_empty() {
            return Err(GenerateError::EmptyBatch);
        }
        let raw = self.client.generate_batch(&prompt::word_sentences(words)).await?;
        Ok(extract::word_sentences(&raw))
    }

    pub async fn frame_phrase_sentences(
        &self,
        phrases: &[PhraseSeed],
    ) -> Result<PhraseSentenceBatch, GenerateError> {
        if phrases.is_empty() {
            return Err(GenerateError::EmptyBatch);
        }
        let raw = self
            .client
            .generate_batch(&prompt::phrase_sentences(phrases))
            .await?;
        Ok(extract::phrase_sentences(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{UNAVAILABLE_DEFINITION, UNKNOWN};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            data.extend_from_slice(&buf[..n]);
            if let Some(pos) = find_subslice(&data, b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&data[..pos]).to_lowercase();
                let content_length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if data.len() >= pos + 4 + content_length {
                    return;
                }
            }
        }
    }

    /// Serves exactly one canned provider reply on a local port and
    /// returns the base URL to point the client at.
    async fn serve_one_reply(reply_text: &str) -> String {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": reply_text }] } }]
        })
        .to_string();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    fn generator_for(base_url: String) -> Generator {
        Generator::new(GeminiClient::new(ProviderConfig {
            api_key: Some("test-key".to_string()),
            base_url,
            ..ProviderConfig::default()
        }))
    }

    fn unreachable_generator() -> Generator {
        generator_for("http://127.0.0.1:9".to_string())
    }

    fn unconfigured_generator() -> Generator {
        Generator::new(GeminiClient::new(ProviderConfig::default()))
    }

    #[tokio::test]
    async fn healthy_provider_yields_only_genuine_meanings() {
        let reply = r#"Here you go: {"word":"run","meanings":[
            {"definition":"to move quickly on foot","part_of_speech":"verb","examples":["I run every morning."],"synonyms":["sprint","jog"]},
            {"definition":"a period of continuous success","part_of_speech":"noun","examples":["The team is on a winning run."],"synonyms":["streak"]},
            {"definition":"to manage or operate something","part_of_speech":"verb","examples":["She runs a small bakery."],"synonyms":["manage"]}
        ]}"#;
        let base_url = serve_one_reply(reply).await;
        let result = generator_for(base_url).define_word("run").await.unwrap();
        assert_eq!(result.word, "run");
        assert_eq!(result.meanings.len(), 3);
        for meaning in &result.meanings {
            assert_ne!(meaning.part_of_speech, UNKNOWN);
            assert!(!meaning.definition.contains("temporarily unavailable"));
            assert!(!meaning.examples.is_empty());
        }
        assert_eq!(result.meanings[1].synonyms, vec!["streak"]);
    }

    #[tokio::test]
    async fn word_lookup_degrades_when_provider_is_down() {
        let result = unreachable_generator().define_word("xyzzy123").await.unwrap();
        assert_eq!(result.word, "xyzzy123");
        assert_eq!(result.meanings.len(), 1);
        assert_eq!(result.meanings[0].definition, UNAVAILABLE_DEFINITION);
        assert!(result.meanings[0].definition.contains("temporarily unavailable"));
        assert_eq!(result.meanings[0].part_of_speech, UNKNOWN);
    }

    #[tokio::test]
    async fn phrase_lookup_degrades_when_provider_is_down() {
        let result = unreachable_generator()
            .define_phrase("break the ice")
            .await
            .unwrap();
        assert_eq!(result.phrase, "break the ice");
        assert_eq!(result.meanings.len(), 1);
        assert_eq!(result.meanings[0].context, "general");
        assert!(result.meanings[0].definition.contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn missing_key_is_never_downgraded_to_fallback() {
        let err = unconfigured_generator().define_word("run").await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
    }

    #[tokio::test]
    async fn batch_framing_propagates_provider_failure() {
        let seeds = vec![WordSeed {
            word: "run".into(),
            meaning: "to move fast".into(),
            part_of_speech: "verb".into(),
        }];
        let err = unreachable_generator()
            .frame_word_sentences(&seeds)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::Transport(_)));
    }

    #[tokio::test]
    async fn empty_batch_is_rejected_before_any_provider_call() {
        // Unconfigured client: reaching the provider path would surface
        // MissingApiKey instead of EmptyBatch.
        let generator = unconfigured_generator();
        let err = generator.frame_word_sentences(&[]).await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyBatch));
        let err = generator.frame_phrase_sentences(&[]).await.unwrap_err();
        assert!(matches!(err, GenerateError::EmptyBatch));
    }
}
