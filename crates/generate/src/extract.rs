//! Best-effort recovery of structured JSON from provider replies, which
//! may arrive wrapped in prose or markdown code fences. Extraction never
//! fails: when nothing parseable is found the entire raw reply is handed
//! back inside a degraded wrapper tagged "unknown".

use serde::de::DeserializeOwned;

use crate::schema::{PhraseDefinitions, PhraseSentenceBatch, SentenceBatch, WordDefinitions};

/// Strategy for locating a JSON candidate inside free-form text. Kept
/// behind a trait so the greedy scanner can be swapped for a balanced
/// one without touching the extraction functions.
pub trait JsonSpanner {
    fn locate<'a>(&self, text: &'a str) -> Option<&'a str>;
}

/// First `{` to last `}`, inclusive. Not a balanced scan: two unrelated
/// brace fragments in one reply produce a span covering both plus the
/// prose between them, which then fails to parse and degrades. Stored
/// records may depend on that exact behavior, so it stays.
pub struct GreedySpan;

impl JsonSpanner for GreedySpan {
    fn locate<'a>(&self, text: &'a str) -> Option<&'a str> {
        let start = text.find('{')?;
        let end = text.rfind('}')?;
        if end < start {
            return None;
        }
        Some(&text[start..=end])
    }
}

fn strip_fences(span: &str) -> String {
    span.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_span<T: DeserializeOwned>(spanner: &dyn JsonSpanner, text: &str) -> Option<T> {
    let span = spanner.locate(text)?;
    serde_json::from_str(&strip_fences(span)).ok()
}

pub fn word_definitions(raw: &str) -> WordDefinitions {
    parse_span(&GreedySpan, raw).unwrap_or_else(|| WordDefinitions::degraded(raw))
}

pub fn phrase_definitions(raw: &str) -> PhraseDefinitions {
    parse_span(&GreedySpan, raw).unwrap_or_else(|| PhraseDefinitions::degraded(raw))
}

pub fn word_sentences(raw: &str) -> SentenceBatch {
    parse_span(&GreedySpan, raw).unwrap_or_else(|| SentenceBatch::degraded(raw))
}

pub fn phrase_sentences(raw: &str) -> PhraseSentenceBatch {
    parse_span(&GreedySpan, raw).unwrap_or_else(|| PhraseSentenceBatch::degraded(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UNKNOWN;

    const CLEAN: &str = r#"{"word":"run","meanings":[{"definition":"to move fast","part_of_speech":"verb","examples":["I run daily."],"synonyms":["sprint"]}]}"#;

    #[test]
    fn clean_json_round_trips_exactly() {
        let parsed = word_definitions(CLEAN);
        assert_eq!(parsed.word, "run");
        assert_eq!(parsed.meanings.len(), 1);
        assert_eq!(parsed.meanings[0].definition, "to move fast");
        assert_eq!(parsed.meanings[0].part_of_speech, "verb");
        assert_eq!(parsed.meanings[0].examples, vec!["I run daily."]);
        assert_eq!(parsed.meanings[0].synonyms, vec!["sprint"]);
    }

    #[test]
    fn prose_prefix_is_stripped() {
        let raw = format!("Sure! Here you go: {CLEAN}");
        assert_eq!(word_definitions(&raw), word_definitions(CLEAN));
    }

    #[test]
    fn code_fences_are_stripped() {
        let raw = format!("```json\n{CLEAN}\n```");
        // The fence's own text precedes the first brace, so the located
        // span starts inside the fence body.
        let parsed = word_definitions(&raw);
        assert_eq!(parsed.word, "run");
        assert_ne!(parsed.meanings[0].part_of_speech, UNKNOWN);
    }

    #[test]
    fn no_braces_degrades_with_full_raw_text() {
        let raw = "I could not produce a definition for that.";
        let parsed = word_definitions(raw);
        assert_eq!(parsed.word, UNKNOWN);
        assert_eq!(parsed.meanings.len(), 1);
        assert_eq!(parsed.meanings[0].definition, raw);
        assert_eq!(parsed.meanings[0].part_of_speech, UNKNOWN);
        assert!(parsed.meanings[0].examples.is_empty());
        assert!(parsed.meanings[0].synonyms.is_empty());
    }

    #[test]
    fn two_fragments_produce_one_unparseable_span() {
        // Greedy span covers both fragments and the prose between them,
        // so parsing fails even though each fragment alone is valid.
        let raw = r#"{"a":1} and also {"b":2}"#;
        assert_eq!(GreedySpan.locate(raw), Some(raw));
        let parsed = word_definitions(raw);
        assert_eq!(parsed.word, UNKNOWN);
        assert_eq!(parsed.meanings[0].definition, raw);
    }

    #[test]
    fn reversed_braces_count_as_no_span() {
        let raw = "} nothing here {";
        assert!(GreedySpan.locate(raw).is_none());
        let parsed = phrase_definitions(raw);
        assert_eq!(parsed.phrase, UNKNOWN);
        assert_eq!(parsed.meanings[0].definition, raw);
    }

    #[test]
    fn extraction_is_idempotent() {
        for raw in [CLEAN, "no json at all", r#"{"a":1} and {"b":2}"#] {
            assert_eq!(word_definitions(raw), word_definitions(raw));
        }
    }

    #[test]
    fn missing_fields_default_instead_of_degrading() {
        let parsed = word_definitions(r#"{"word":"run","meanings":[{"definition":"d"}]}"#);
        assert_eq!(parsed.meanings[0].definition, "d");
        assert_eq!(parsed.meanings[0].part_of_speech, "");
        assert!(parsed.meanings[0].synonyms.is_empty());
    }

    #[test]
    fn phrase_flavor_parses_its_own_schema() {
        let raw = r#"{"phrase":"break the ice","meanings":[{"definition":"to start a conversation","context":"informal","examples":["He broke the ice with a joke."],"similar_phrases":["get things going"]}]}"#;
        let parsed = phrase_definitions(raw);
        assert_eq!(parsed.phrase, "break the ice");
        assert_eq!(parsed.meanings[0].context, "informal");
    }

    #[test]
    fn sentence_batch_degrades_into_single_group() {
        let raw = "Here are some sentences without any JSON.";
        let parsed = word_sentences(raw);
        assert_eq!(parsed.sentences.len(), 1);
        assert_eq!(parsed.sentences[0].word, UNKNOWN);
        assert_eq!(parsed.sentences[0].sentences, vec![raw.to_string()]);

        let parsed = phrase_sentences(raw);
        assert_eq!(parsed.sentences.len(), 1);
        assert_eq!(parsed.sentences[0].context, UNKNOWN);
    }

    #[test]
    fn sentence_batch_parses_groups() {
        let raw = r#"Sure. {"sentences":[{"word":"run","meaning":"to move fast","part_of_speech":"verb","sentences":["I run.","You run."]}]}"#;
        let parsed = word_sentences(raw);
        assert_eq!(parsed.sentences.len(), 1);
        assert_eq!(parsed.sentences[0].sentences.len(), 2);
    }
}
