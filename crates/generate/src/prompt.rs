use crate::schema::{PhraseSeed, WordSeed};

pub fn word_definitions(word: &str) -> String {
    format!(
        r#"Meaning will be read by new English learners. Give simple, clear, and easy-to-understand sentences.
Provide all meanings/definitions of the word "{word}".
If the word has multiple meanings or can be used as different parts of speech, list them all. (Limit to 2 or 3 with valid and easy-to-understand meanings)

Return the response as a JSON object with this exact structure:
{{
    "word": "{word}",
    "meanings": [
        {{
            "definition": "definition text here",
            "part_of_speech": "noun/verb/adjective etc",
            "examples": ["example sentence 1", "example sentence 2"],
            "synonyms": ["synonym1", "synonym2"]
        }}
    ]
}}

Make sure to include all different meanings if the word has multiple definitions."#
    )
}

pub fn phrase_meanings(phrase: &str) -> String {
    format!(
        r#"This will be read by new English learners. Give simple, clear, and easy-to-understand explanations.
Provide all meanings and usage contexts of the English phrase "{phrase}".
If the phrase has multiple meanings or can be used in different contexts, list them all. (Limit to 2 or 3 with valid and easy-to-understand meanings)

Return the response as a JSON object with this exact structure:
{{
    "phrase": "{phrase}",
    "meanings": [
        {{
            "definition": "definition text here",
            "context": "formal/informal/business/daily conversation etc",
            "examples": ["example sentence 1", "example sentence 2"],
            "similar_phrases": ["similar phrase 1", "similar phrase 2"]
        }}
    ]
}}

Make sure to include all different meanings if the phrase has multiple definitions or usage contexts.
Focus on practical usage that English learners would encounter in daily conversation."#
    )
}

pub fn word_sentences(words: &[WordSeed]) -> String {
    let listing = words
        .iter()
        .map(|w| {
            format!(
                "- \"{}\" (meaning: {}, part of speech: {})",
                w.word, w.meaning, w.part_of_speech
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Meaning will be read by new English learners. Give simple, clear, and easy-to-understand sentences.
Provide sentences that are in daily conversation and easy to understand. Sentences should be new and easy to grasp.
Create sentences using these words with their specific meanings and parts of speech:

{listing}

For each word, create 2-3 example sentences that clearly demonstrate the given meaning and part of speech.

Return the response as a JSON object with this exact structure:
{{
    "sentences": [
        {{
            "word": "word here",
            "meaning": "the specific meaning used",
            "part_of_speech": "noun/verb/adjective etc",
            "sentences": ["sentence 1 using the word", "sentence 2 using the word", "sentence 3 using the word"]
        }}
    ]
}}

Make sure each sentence clearly shows the word being used in the context of the given meaning and part of speech."#
    )
}

pub fn phrase_sentences(phrases: &[PhraseSeed]) -> String {
    let listing = phrases
        .iter()
        .map(|p| {
            format!(
                "- \"{}\" (meaning: {}, context: {})",
                p.phrase, p.meaning, p.context
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"These sentences will be read by new English learners. Give simple, clear, and easy-to-understand sentences.
Provide sentences that are in daily conversation and easy to understand.
Create sentences using these English phrases with their specific meanings and contexts:

{listing}

For each phrase, create 2-3 example sentences that clearly demonstrate the given meaning and context.
Make sure the sentences show natural usage of the phrase in conversation.

Return the response as a JSON object with this exact structure:
{{
    "sentences": [
        {{
            "phrase": "phrase here",
            "meaning": "the specific meaning used",
            "context": "formal/informal/business etc",
            "sentences": ["sentence 1 using the phrase", "sentence 2 using the phrase", "sentence 3 using the phrase"]
        }}
    ]
}}

Make sure each sentence clearly shows the phrase being used in the context of the given meaning and situation."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_prompt_embeds_word_and_schema() {
        let p = word_definitions("run");
        assert!(p.contains("\"run\""));
        assert!(p.contains("\"part_of_speech\""));
        assert!(p.contains("\"synonyms\""));
        assert!(p.contains("Limit to 2 or 3"));
    }

    #[test]
    fn sentence_prompt_lists_every_seed() {
        let seeds = vec![
            WordSeed {
                word: "run".into(),
                meaning: "to move fast".into(),
                part_of_speech: "verb".into(),
            },
            WordSeed {
                word: "bank".into(),
                meaning: "side of a river".into(),
                part_of_speech: "noun".into(),
            },
        ];
        let p = word_sentences(&seeds);
        assert!(p.contains("- \"run\" (meaning: to move fast, part of speech: verb)"));
        assert!(p.contains("- \"bank\" (meaning: side of a river, part of speech: noun)"));
    }
}
