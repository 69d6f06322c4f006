use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentiment label announced in the log; the numeric score never leaves the
/// analyzer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// `p > 0.5` positive, `p < -0.5` negative, otherwise neutral.
    pub fn from_polarity(p: f32) -> Self {
        if p > 0.5 {
            SentimentLabel::Positive
        } else if p < -0.5 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Polarity scorer boundary: text in, score in `[-1, 1]` out.
pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> f32;
}

// ── Keyword sets ───────────────────────────────────────────

const POSITIVE_KW: &[&str] = &[
    // Japanese
    "嬉しい",
    "楽しい",
    "良い",
    "好き",
    "できた",
    "わくわく",
    "前向き",
    "ありがとう",
    // English
    "happy",
    "glad",
    "excited",
    "great",
    "good",
    "confident",
    "motivated",
    "thankful",
];

const NEGATIVE_KW: &[&str] = &[
    // Japanese
    "落ち込ん",
    "悲しい",
    "辛い",
    "不安",
    "疲れ",
    "嫌",
    "苦しい",
    "イライラ",
    // English
    "sad",
    "down",
    "anxious",
    "tired",
    "frustrated",
    "stuck",
    "worried",
    "depressed",
];

/// Keyword-lexicon polarity scorer. Hit counts on the two lists are folded
/// into `(pos - neg) / (pos + neg)`; no hits score 0.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl SentimentAnalyzer for LexiconSentiment {
    fn polarity(&self, text: &str) -> f32 {
        let lower = text.to_lowercase();
        let pos = POSITIVE_KW.iter().filter(|k| lower.contains(**k)).count() as f32;
        let neg = NEGATIVE_KW.iter().filter(|k| lower.contains(**k)).count() as f32;
        if pos + neg == 0.0 {
            return 0.0;
        }
        (pos - neg) / (pos + neg)
    }
}
