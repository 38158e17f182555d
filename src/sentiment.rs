//! Sentiment scoring.
//!
//! # Architecture
//!
//! - [`TextAnalyzer`]: the text-analytics seam; anything that can turn text
//!   into polarity and subjectivity scores
//! - [`LexiconAnalyzer`]: the built-in analyzer, averaging per-word scores
//!   from an English opinion lexicon with intensifier and negation handling
//! - [`score`]: runs an analyzer and attaches the [`SentimentLabel`]
//!
//! # Labeling
//!
//! Polarity inside the dead zone `[-0.1, 0.1]` is `Neutral`; above it is
//! `Positive`, below it `Negative`.

use crate::models::{SentimentLabel, SentimentResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Half-width of the neutral band around zero polarity.
pub const NEUTRAL_BAND: f64 = 0.1;

/// Raw scores produced by a [`TextAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scores {
    pub polarity: f64,
    pub subjectivity: f64,
}

/// Anything that can score a text for polarity and subjectivity.
pub trait TextAnalyzer {
    fn analyze(&self, text: &str) -> Scores;
}

/// Map polarity to a label using [`NEUTRAL_BAND`].
pub fn label_for(polarity: f64) -> SentimentLabel {
    if polarity > NEUTRAL_BAND {
        SentimentLabel::Positive
    } else if polarity < -NEUTRAL_BAND {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Score `text` with `analyzer`, clamping the result into range.
#[instrument(level = "info", skip_all, fields(chars = text.chars().count()))]
pub fn score(analyzer: &dyn TextAnalyzer, text: &str) -> SentimentResult {
    let Scores {
        polarity,
        subjectivity,
    } = analyzer.analyze(text);
    let polarity = if polarity.is_finite() { polarity.clamp(-1.0, 1.0) } else { 0.0 };
    let subjectivity = if subjectivity.is_finite() { subjectivity.clamp(0.0, 1.0) } else { 0.0 };
    let label = label_for(polarity);
    info!(polarity, subjectivity, %label, "Scored sentiment");
    SentimentResult {
        polarity,
        subjectivity,
        label,
    }
}

/// Built-in lexicon analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconAnalyzer;

const NEGATION_FACTOR: f64 = -0.5;
const NEGATION_WINDOW: usize = 2;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("token regex"));

// (word, polarity, subjectivity)
const LEXICON_ENTRIES: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("brilliant", 0.9, 1.0),
    ("celebrated", 0.5, 0.6),
    ("delighted", 0.7, 0.9),
    ("easy", 0.43, 0.83),
    ("effective", 0.6, 0.8),
    ("excellent", 1.0, 1.0),
    ("exciting", 0.3, 0.8),
    ("fantastic", 0.4, 0.9),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("helpful", 0.6, 0.8),
    ("hopeful", 0.5, 0.8),
    ("impressive", 1.0, 1.0),
    ("improved", 0.5, 0.5),
    ("love", 0.5, 0.6),
    ("nice", 0.6, 1.0),
    ("optimistic", 0.4, 0.7),
    ("outstanding", 0.5, 0.5),
    ("perfect", 1.0, 1.0),
    ("pleased", 0.5, 1.0),
    ("positive", 0.23, 0.55),
    ("praised", 0.5, 0.6),
    ("proud", 0.8, 1.0),
    ("remarkable", 0.75, 0.75),
    ("safe", 0.5, 0.5),
    ("strong", 0.43, 0.73),
    ("stunning", 0.5, 0.9),
    ("successful", 0.75, 0.95),
    ("thriving", 0.6, 0.7),
    ("welcome", 0.8, 0.9),
    ("wonderful", 1.0, 1.0),
    ("angry", -0.5, 1.0),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("collapse", -0.4, 0.5),
    ("corrupt", -0.5, 0.5),
    ("crisis", -0.4, 0.6),
    ("dangerous", -0.6, 0.9),
    ("deadly", -0.6, 0.7),
    ("devastating", -0.8, 0.9),
    ("difficult", -0.5, 1.0),
    ("disappointed", -0.75, 0.75),
    ("disappointing", -0.6, 0.7),
    ("disaster", -0.8, 0.8),
    ("failed", -0.5, 0.3),
    ("failure", -0.3, 0.4),
    ("fear", -0.5, 0.8),
    ("grim", -0.5, 0.8),
    ("harmful", -0.6, 0.8),
    ("hate", -0.8, 0.9),
    ("horrible", -1.0, 1.0),
    ("negative", -0.3, 0.4),
    ("painful", -0.7, 0.9),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("scandal", -0.5, 0.7),
    ("shocking", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("tragic", -0.75, 1.0),
    ("troubling", -0.5, 0.7),
    ("ugly", -0.7, 1.0),
    ("unfair", -0.5, 0.9),
    ("violent", -0.8, 0.9),
    ("weak", -0.38, 0.6),
    ("worried", -0.4, 0.8),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("highly", 1.3),
    ("incredibly", 1.4),
    ("quite", 1.1),
    ("really", 1.3),
    ("truly", 1.2),
    ("very", 1.3),
];

const NEGATIONS: &[&str] = &["not", "no", "never", "cannot", "nor", "neither", "hardly", "without"];

static LEXICON: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    info!(entries = LEXICON_ENTRIES.len(), "Loading sentiment lexicon");
    LEXICON_ENTRIES
        .iter()
        .map(|&(word, polarity, subjectivity)| (word, (polarity, subjectivity)))
        .collect()
});

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

fn intensity(token: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, factor)| *factor)
}

impl TextAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Scores {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = TOKEN_RE.find_iter(&lowered).map(|m| m.as_str()).collect();

        let mut assessments: Vec<(f64, f64)> = Vec::new();
        for (i, token) in tokens.iter().enumerate() {
            let Some(&(mut polarity, mut subjectivity)) = LEXICON.get(*token) else {
                continue;
            };
            if let Some(factor) = i.checked_sub(1).and_then(|j| intensity(tokens[j])) {
                polarity *= factor;
                subjectivity *= factor;
            }
            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| is_negation(t)) {
                polarity *= NEGATION_FACTOR;
            }
            assessments.push((polarity.clamp(-1.0, 1.0), subjectivity.clamp(0.0, 1.0)));
        }

        if assessments.is_empty() {
            debug!(tokens = tokens.len(), "No opinion words found");
            return Scores::default();
        }

        let n = assessments.len() as f64;
        let scores = Scores {
            polarity: assessments.iter().map(|a| a.0).sum::<f64>() / n,
            subjectivity: assessments.iter().map(|a| a.1).sum::<f64>() / n,
        };
        debug!(matched = assessments.len(), tokens = tokens.len(), ?scores, "Lexicon analysis");
        scores
    }
}
