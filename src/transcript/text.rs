use super::TranscriptSegment;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Segments grouped into one topic window
const TOPIC_WINDOW: usize = 5;
const TOPIC_KEYWORDS: usize = 3;
const SENTENCES_PER_PARAGRAPH: usize = 3;

const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
    "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
    "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
    "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
    "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
    "with", "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
    "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
    "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
    "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
    "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
    "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();

    /// Patterns that suggest spoken or captioned code, checked in this order
    static ref CODE_INDICATORS: Vec<Regex> = [
        r"function\s+\w+\s*\([^)]*\)\s*\{",
        r"def\s+\w+\s*\([^)]*\):",
        r"class\s+\w+(\s*\([^)]*\))?:",
        r"class\s+\w+\s*\{",
        r"import\s+[\w.]+",
        r"from\s+[\w.]+\s+import",
        r"const\s+\w+\s*=",
        r"let\s+\w+\s*=",
        r"var\s+\w+\s*=",
        r"\w+\s*:\s*\w+",
        r"<[a-zA-Z][^>]*>.*</[a-zA-Z][^>]*>",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid code indicator regex"))
    .collect();
}

/// A transcript window start time with its dominant keywords
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicTimestamp {
    /// Window start, in seconds
    pub time: f64,
    /// Top keywords of the window joined by spaces
    pub topic: String,
}

/// Joins segment texts with single spaces
pub fn transcript_to_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits text into sentences ending in `.`, `!` or `?` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |next| next.is_whitespace());
            if at_boundary {
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                current.clear();
            }
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// Groups sentences into paragraphs
///
/// A paragraph closes after three sentences or after a question or exclamation.
pub fn extract_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for sentence in split_sentences(text) {
        let closes = sentence.ends_with('?') || sentence.ends_with('!');
        current.push(sentence);
        if current.len() >= SENTENCES_PER_PARAGRAPH || closes {
            paragraphs.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }
    paragraphs
}

/// Most frequent non-stopword tokens, ties broken by first occurrence
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, word) in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOPWORD_SET.contains(w))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(top_n)
        .map(|(word, _, _)| word.to_string())
        .collect()
}

/// Fragments of the text that look like source code
pub fn detect_code_snippets(text: &str) -> Vec<String> {
    CODE_INDICATORS
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.as_str().to_string()))
        .collect()
}

/// Start time and top keywords for every window of five segments
pub fn extract_timestamps_with_topics(segments: &[TranscriptSegment]) -> Vec<TopicTimestamp> {
    segments
        .chunks(TOPIC_WINDOW)
        .map(|window| TopicTimestamp {
            time: window[0].start,
            topic: extract_keywords(&transcript_to_text(window), TOPIC_KEYWORDS).join(" "),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn segment(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment { text: text.to_string(), start, duration: 2.0 }
    }

    #[test]
    fn test_paragraphs_close_after_three_sentences_or_question() {
        let text = "First we install it. Then we configure it. Then we run it. Does it work? Yes. Done.";
        assert_eq!(
            extract_paragraphs(text),
            vec![
                "First we install it. Then we configure it. Then we run it.",
                "Does it work?",
                "Yes. Done.",
            ]
        );
    }

    #[test]
    fn test_sentence_split_ignores_inner_dots() {
        assert_eq!(
            split_sentences("We use Node.js here. Version 1.2 works"),
            vec!["We use Node.js here.", "Version 1.2 works"]
        );
    }

    #[test]
    fn test_keywords_skip_stopwords_and_rank_by_frequency() {
        let text = "Rust is fast. Rust is safe, and the borrow checker keeps Rust safe.";
        assert_eq!(extract_keywords(text, 3), vec!["rust", "safe", "fast"]);
    }

    #[test]
    fn test_keywords_empty_text() {
        assert!(extract_keywords("", 10).is_empty());
        assert!(extract_keywords("the and of it", 10).is_empty());
    }

    #[test]
    fn test_detect_code_snippets() {
        let text = "so we write def handler(event): and then import numpy.linalg";
        let snippets = detect_code_snippets(text);
        assert!(snippets.contains(&"def handler(event):".to_string()));
        assert!(snippets.contains(&"import numpy.linalg".to_string()));
    }

    #[test]
    fn test_timestamps_use_window_start() {
        let segments: Vec<TranscriptSegment> = (0..7)
            .map(|i| segment(if i < 5 { "docker compose docker" } else { "kubernetes cluster" }, i as f64 * 3.0))
            .collect();

        let topics = extract_timestamps_with_topics(&segments);
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].time, 0.0);
        assert_eq!(topics[0].topic, "docker compose");
        assert_eq!(topics[1].time, 15.0);
        assert_eq!(topics[1].topic, "kubernetes cluster");
    }
}
