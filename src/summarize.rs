//! Extractive summarizer.
//!
//! Picks the highest scoring sentences of an article body and returns them
//! in their original order. A sentence scores well when it is dense in the
//! article's most frequent keywords, shares words with the title, and
//! appears early in the text.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Sentences kept in a summary.
pub const SUMMARY_SENTENCES: usize = 5;

const TOP_KEYWORDS: usize = 10;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?").expect("word regex"));

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
        "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
        "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
        "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
        "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
        "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
        "own", "said", "same", "she", "should", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
        "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
        "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
        "yours", "yourself", "yourselves", "says", "say", "one", "two", "new", "like", "get",
    ]
    .into_iter()
    .collect()
});

const ABBREVIATIONS: [&str; 16] = [
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "inc", "ltd", "co", "gen",
    "u.s", "u.k",
];

/// Lowercased keyword tokens of `text`, stopwords and short words removed.
fn keywords(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| w.chars().count() > 2 && !STOPWORDS.contains(w.as_str()))
        .collect()
}

/// Split text into sentences.
///
/// Blank lines always end a sentence. Terminal punctuation ends one when it
/// is followed by whitespace and a capital, digit or opening quote, and the
/// word before it is not a common abbreviation or an initial.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for paragraph in text.split("\n\n") {
        let chars: Vec<char> = paragraph.chars().collect();
        let mut current = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            current.push(c);

            if matches!(c, '.' | '!' | '?') {
                while i + 1 < chars.len() && matches!(chars[i + 1], '"' | '\'' | ')' | '”' | '’') {
                    i += 1;
                    current.push(chars[i]);
                }
                let next = chars.get(i + 1);
                let boundary = match next {
                    None => true,
                    Some(n) if n.is_whitespace() => {
                        let following = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                        starts_sentence(following) && !ends_with_abbreviation(&current)
                    }
                    Some(_) => false,
                };
                if boundary {
                    push_sentence(&mut sentences, &current);
                    current.clear();
                }
            }
            i += 1;
        }
        push_sentence(&mut sentences, &current);
    }

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = crate::utils::collapse_whitespace(raw);
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

fn starts_sentence(c: Option<&char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '“' | '\'' | '‘' | '('),
    }
}

fn ends_with_abbreviation(sentence: &str) -> bool {
    let trimmed = sentence.trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | '"' | '\'' | ')' | '”' | '’'));
    let last = trimmed
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(|c: char| matches!(c, '"' | '“' | '(' | '\''))
        .to_lowercase();
    let is_initial = last.chars().count() == 1 && last.chars().all(char::is_alphabetic);
    is_initial || ABBREVIATIONS.contains(&last.as_str())
}

/// Extractive summary of `text` with at most `max_sentences` sentences.
///
/// Returns an empty string when the text has no sentences.
pub fn summarize(title: &str, text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.len() <= max_sentences {
        return sentences.join(" ");
    }

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for word in keywords(text) {
        *frequencies.entry(word).or_insert(0) += 1;
    }
    let top: HashMap<String, f64> = frequencies
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .take(TOP_KEYWORDS)
        .map(|(word, count)| (word, count as f64))
        .collect();
    let max_count = top.values().cloned().fold(1.0, f64::max);

    let title_words: HashSet<String> = keywords(title).into_iter().collect();
    let total = sentences.len() as f64;

    sentences
        .iter()
        .enumerate()
        .map(|(i, sentence)| {
            let words = keywords(sentence);
            let density = if words.is_empty() {
                0.0
            } else {
                words.iter().filter_map(|w| top.get(w)).sum::<f64>() / (words.len() as f64 * max_count)
            };
            let title_overlap = if title_words.is_empty() {
                0.0
            } else {
                words.iter().unique().filter(|w| title_words.contains(*w)).count() as f64
                    / title_words.len() as f64
            };
            let position = 1.0 - i as f64 / total;
            (i, 2.0 * density + 1.5 * title_overlap + position)
        })
        .sorted_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)))
        .take(max_sentences)
        .map(|(i, _)| i)
        .sorted()
        .map(|i| sentences[i].as_str())
        .join(" ")
}
