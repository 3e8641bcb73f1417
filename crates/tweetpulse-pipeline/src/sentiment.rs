//! Sentiment classification over cleaned post text.
//!
//! The continuous polarity score comes from a pluggable scorer capability;
//! the classifier owns only the sign mapping onto the three labels.

use serde::{Serialize, Serializer};

use crate::clean::clean;

/// Three-valued sentiment label derived from a continuous polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Polarity {
    /// Integer form used in tabular output: -1, 0, or 1.
    #[must_use]
    pub fn value(self) -> i8 {
        match self {
            Polarity::Negative => -1,
            Polarity::Neutral => 0,
            Polarity::Positive => 1,
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for Polarity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

/// A lexical polarity scorer: maps text to a score in `[-1.0, 1.0]`.
pub trait PolarityScorer {
    fn score(&self, text: &str) -> f32;
}

/// General-purpose English word weights for the default scorer.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
const LEXICON: &[(&str, f32)] = &[
    // Positive signals
    ("love", 0.5),
    ("loved", 0.5),
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("best", 0.5),
    ("happy", 0.4),
    ("beautiful", 0.4),
    ("wonderful", 0.5),
    ("fun", 0.3),
    ("thanks", 0.3),
    ("thank", 0.3),
    ("win", 0.4),
    ("winning", 0.4),
    ("congrats", 0.4),
    ("congratulations", 0.4),
    ("perfect", 0.5),
    ("nice", 0.3),
    // Negative signals
    ("hate", -0.6),
    ("hated", -0.6),
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("horrible", -0.6),
    ("sad", -0.4),
    ("angry", -0.5),
    ("fail", -0.4),
    ("failed", -0.4),
    ("failure", -0.4),
    ("broken", -0.4),
    ("disaster", -0.6),
    ("wrong", -0.3),
    ("problem", -0.3),
    ("annoying", -0.4),
    ("boring", -0.3),
    ("scam", -0.7),
    ("disappointed", -0.5),
];

/// Default scorer backed by the word-weight lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexiconScorer;

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> f32 {
        let mut score = 0.0_f32;
        for word in text.split_whitespace() {
            let w = word
                .trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase();
            for &(lex_word, weight) in LEXICON {
                if w == lex_word {
                    score += weight;
                    break;
                }
            }
        }
        score.clamp(-1.0, 1.0)
    }
}

/// Maps post text onto a [`Polarity`] label.
///
/// Text is cleaned first, then scored; the label is the sign of the score.
/// Deterministic given a deterministic scorer; holds no state of its own.
#[derive(Debug, Clone)]
pub struct SentimentClassifier<S = LexiconScorer> {
    scorer: S,
}

impl SentimentClassifier<LexiconScorer> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scorer: LexiconScorer,
        }
    }
}

impl Default for SentimentClassifier<LexiconScorer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PolarityScorer> SentimentClassifier<S> {
    pub fn with_scorer(scorer: S) -> Self {
        Self { scorer }
    }

    /// Classifies `text`: positive score → `Positive`, zero → `Neutral`,
    /// negative → `Negative`.
    #[must_use]
    pub fn classify(&self, text: &str) -> Polarity {
        let polarity = self.scorer.score(&clean(text));
        if polarity > 0.0 {
            Polarity::Positive
        } else if polarity < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}
