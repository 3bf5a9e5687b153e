//! Frequency-based extractive summarization.
//!
//! Scores sentences by how many high-frequency content words they contain
//! and keeps the top-ranked ones in document order. Deterministic and
//! dependency-free, which keeps the enrichment job fast and testable.

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have", "he",
    "her", "his", "i", "in", "is", "it", "its", "not", "of", "on", "or", "she", "that", "the",
    "their", "them", "they", "this", "to", "was", "we", "were", "which", "will", "with", "you",
];

/// Derive a short summary from extracted page text.
///
/// Returns at most `max_sentences` sentences, preserving document order.
/// Short inputs are returned whole (whitespace-normalized).
pub fn summarize(text: &str, max_sentences: usize) -> String {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() || max_sentences == 0 {
        return String::new();
    }

    let sentences = split_sentences(&normalized);
    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let frequencies = word_frequencies(&normalized);

    // Score each sentence by average content-word frequency
    let mut scored: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words: Vec<String> = content_words(sentence).collect();
            let score = if words.is_empty() {
                0.0
            } else {
                let total: u32 = words
                    .iter()
                    .map(|w| frequencies.get(w.as_str()).copied().unwrap_or(0))
                    .sum();
                total as f64 / words.len() as f64
            };
            (i, score)
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut selected: Vec<usize> = scored.into_iter().take(max_sentences).map(|(i, _)| i).collect();
    selected.sort_unstable();

    selected
        .into_iter()
        .map(|i| sentences[i].clone())
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences on terminal punctuation, keeping the
/// terminator attached.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trailing = current.trim();
    if !trailing.is_empty() {
        sentences.push(trailing.to_string());
    }

    sentences
}

fn content_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 2 && !STOPWORDS.contains(&w.as_str()))
}

fn word_frequencies(text: &str) -> std::collections::HashMap<String, u32> {
    let mut frequencies = std::collections::HashMap::new();
    for word in content_words(text) {
        *frequencies.entry(word).or_insert(0) += 1;
    }
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(summarize("", 5), "");
        assert_eq!(summarize("   \n  ", 5), "");
    }

    #[test]
    fn test_short_input_returned_whole() {
        let text = "Rust is a systems language. It is fast.";
        assert_eq!(summarize(text, 5), text);
    }

    #[test]
    fn test_whitespace_normalized() {
        let text = "Rust is a systems\n\nlanguage.   It is fast.";
        assert_eq!(summarize(text, 5), "Rust is a systems language. It is fast.");
    }

    #[test]
    fn test_limits_sentence_count() {
        let text = "One sentence here. Two sentence here. Three sentence here. \
                    Four sentence here. Five sentence here. Six sentence here.";
        let summary = summarize(text, 2);
        let count = summary.matches('.').count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_preserves_document_order() {
        // "compiler" repeated makes those two sentences score highest
        let text = "The compiler checks the compiler rules. Bananas ripen slowly. \
                    Compiler internals describe compiler design. Squirrels gather acorns quietly. \
                    Rivers flow downhill. Clouds drift overhead.";
        let summary = summarize(text, 2);
        let first = summary.find("checks").unwrap();
        let second = summary.find("internals").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_split_sentences_keeps_terminator() {
        let sentences = split_sentences("Hello there! How are you? Fine.");
        assert_eq!(sentences, vec!["Hello there!", "How are you?", "Fine."]);
    }

    #[test]
    fn test_split_sentences_trailing_fragment() {
        let sentences = split_sentences("Complete sentence. trailing fragment");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1], "trailing fragment");
    }

    #[test]
    fn test_content_words_skip_stopwords() {
        let words: Vec<String> = content_words("the quick brown fox").collect();
        assert_eq!(words, vec!["quick", "brown", "fox"]);
    }
}
