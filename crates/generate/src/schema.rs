use serde::{Deserialize, Serialize};

pub const UNAVAILABLE_DEFINITION: &str =
    "Definition temporarily unavailable. Please try again later.";

/// Sentinel category used when the extractor cannot recover structure.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordMeaning {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordDefinitions {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meanings: Vec<WordMeaning>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseMeaning {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub similar_phrases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseDefinitions {
    #[serde(default)]
    pub phrase: String,
    #[serde(default)]
    pub meanings: Vec<PhraseMeaning>,
}

/// A word whose meaning and part of speech are already known, to be
/// worked into example sentences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordSeed {
    pub word: String,
    pub meaning: String,
    pub part_of_speech: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseSeed {
    pub phrase: String,
    pub meaning: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordSentences {
    #[serde(default)]
    pub word: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceBatch {
    #[serde(default)]
    pub sentences: Vec<WordSentences>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseSentences {
    #[serde(default)]
    pub phrase: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub sentences: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhraseSentenceBatch {
    #[serde(default)]
    pub sentences: Vec<PhraseSentences>,
}

impl WordDefinitions {
    /// Placeholder returned when the provider cannot be reached within
    /// the retry budget. Same shape as a genuine answer.
    pub fn unavailable(word: &str) -> Self {
        Self {
            word: word.to_string(),
            meanings: vec![WordMeaning {
                definition: UNAVAILABLE_DEFINITION.to_string(),
                part_of_speech: UNKNOWN.to_string(),
                examples: vec![format!("The word '{word}' is being processed.")],
                synonyms: Vec::new(),
            }],
        }
    }

    /// Degraded wrapper carrying raw provider text the extractor could
    /// not parse.
    pub fn degraded(raw: &str) -> Self {
        Self {
            word: UNKNOWN.to_string(),
            meanings: vec![WordMeaning {
                definition: raw.to_string(),
                part_of_speech: UNKNOWN.to_string(),
                examples: Vec::new(),
                synonyms: Vec::new(),
            }],
        }
    }
}

impl PhraseDefinitions {
    pub fn unavailable(phrase: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            meanings: vec![PhraseMeaning {
                definition: UNAVAILABLE_DEFINITION.to_string(),
                context: "general".to_string(),
                examples: vec![format!("The phrase '{phrase}' is being processed.")],
                similar_phrases: Vec::new(),
            }],
        }
    }

    pub fn degraded(raw: &str) -> Self {
        Self {
            phrase: UNKNOWN.to_string(),
            meanings: vec![PhraseMeaning {
                definition: raw.to_string(),
                context: UNKNOWN.to_string(),
                examples: Vec::new(),
                similar_phrases: Vec::new(),
            }],
        }
    }
}

impl SentenceBatch {
    pub fn degraded(raw: &str) -> Self {
        Self {
            sentences: vec![WordSentences {
                word: UNKNOWN.to_string(),
                meaning: UNKNOWN.to_string(),
                part_of_speech: UNKNOWN.to_string(),
                sentences: vec![raw.to_string()],
            }],
        }
    }
}

impl PhraseSentenceBatch {
    pub fn degraded(raw: &str) -> Self {
        Self {
            sentences: vec![PhraseSentences {
                phrase: UNKNOWN.to_string(),
                meaning: UNKNOWN.to_string(),
                context: UNKNOWN.to_string(),
                sentences: vec![raw.to_string()],
            }],
        }
    }
}
