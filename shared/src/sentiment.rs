//! Keyword-based sentiment classification for chat messages and journal entries.
//!
//! Two independent category sets exist. Chat messages are scored on a binary
//! positive/negative scale, journal entries across four emotional categories.
//! Both fall back to neutral when no category clearly dominates.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which classifier a text is routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Chat,
    Journal,
}

/// Sentiment of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSentiment {
    Positive,
    Negative,
    Neutral,
}

impl ChatSentiment {
    pub const ALL: [ChatSentiment; 3] = [
        ChatSentiment::Positive,
        ChatSentiment::Negative,
        ChatSentiment::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChatSentiment::Positive => "positive",
            ChatSentiment::Negative => "negative",
            ChatSentiment::Neutral => "neutral",
        }
    }
}

/// Sentiment of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSentiment {
    Positive,
    Negative,
    Neutral,
    Anxious,
    Depressed,
}

impl JournalSentiment {
    pub const ALL: [JournalSentiment; 5] = [
        JournalSentiment::Positive,
        JournalSentiment::Negative,
        JournalSentiment::Neutral,
        JournalSentiment::Anxious,
        JournalSentiment::Depressed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalSentiment::Positive => "positive",
            JournalSentiment::Negative => "negative",
            JournalSentiment::Neutral => "neutral",
            JournalSentiment::Anxious => "anxious",
            JournalSentiment::Depressed => "depressed",
        }
    }
}

/// Result of classifying a text in a given domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Sentiment {
    Chat(ChatSentiment),
    Journal(JournalSentiment),
}

impl Sentiment {
    pub fn domain(&self) -> Domain {
        match self {
            Sentiment::Chat(_) => Domain::Chat,
            Sentiment::Journal(_) => Domain::Journal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Chat(s) => s.as_str(),
            Sentiment::Journal(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const JOURNAL_ANXIOUS: &[&str] = &[
    "worry", "anxious", "nervous", "panic", "stress", "overwhelm", "afraid",
];
const JOURNAL_DEPRESSED: &[&str] = &[
    "sad", "depress", "hopeless", "tired", "exhaust", "lonely", "empty", "unmotivated",
];
const JOURNAL_POSITIVE: &[&str] = &[
    "happy", "grateful", "joy", "excit", "accomplish", "proud", "relax", "calm", "peace",
];
const JOURNAL_NEGATIVE: &[&str] = &[
    "angry", "frustrat", "upset", "annoyed", "disappoint", "irritat",
];

const CHAT_POSITIVE: &[&str] = &[
    "good", "great", "happy", "better", "improve", "hope", "calm", "relaxed", "motivated",
];
const CHAT_NEGATIVE: &[&str] = &[
    "sad", "depressed", "anxious", "worried", "stress", "bad", "afraid", "scared", "overwhelmed",
];

/// Keyword tables compiled once per cold start.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    journal: Vec<(JournalSentiment, Regex)>,
    chat_positive: Vec<String>,
    chat_negative: Vec<String>,
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        let journal = [
            (JournalSentiment::Anxious, JOURNAL_ANXIOUS),
            (JournalSentiment::Depressed, JOURNAL_DEPRESSED),
            (JournalSentiment::Positive, JOURNAL_POSITIVE),
            (JournalSentiment::Negative, JOURNAL_NEGATIVE),
        ]
        .into_iter()
        .map(|(category, keywords)| (category, alternation(keywords)))
        .collect();

        Self {
            journal,
            chat_positive: CHAT_POSITIVE.iter().map(|s| s.to_string()).collect(),
            chat_negative: CHAT_NEGATIVE.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Build a single alternation so overlapping keywords are counted once per position.
fn alternation(keywords: &[&str]) -> Regex {
    let pattern = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("({})", pattern)).expect("escaped keyword alternation is a valid pattern")
}

impl SentimentClassifier {
    /// Classify `text` using the keyword table of `domain`.
    pub fn classify(&self, text: &str, domain: Domain) -> Sentiment {
        match domain {
            Domain::Chat => Sentiment::Chat(self.classify_chat(text)),
            Domain::Journal => Sentiment::Journal(self.classify_journal(text)),
        }
    }

    /// Score a chat message: each keyword present counts once.
    pub fn classify_chat(&self, text: &str) -> ChatSentiment {
        let lower = text.to_lowercase();
        let score = |keywords: &[String]| {
            keywords
                .iter()
                .filter(|k| lower.contains(k.as_str()))
                .count()
        };

        let positive = score(&self.chat_positive);
        let negative = score(&self.chat_negative);

        if positive > negative {
            ChatSentiment::Positive
        } else if negative > positive {
            ChatSentiment::Negative
        } else {
            ChatSentiment::Neutral
        }
    }

    /// Score a journal entry: every keyword occurrence counts.
    ///
    /// The category with the strictly highest count wins. A zero top count or a
    /// tie between the two highest categories yields [`JournalSentiment::Neutral`].
    pub fn classify_journal(&self, text: &str) -> JournalSentiment {
        let lower = text.to_lowercase();

        let mut counts: Vec<(JournalSentiment, usize)> = self
            .journal
            .iter()
            .map(|(category, pattern)| (*category, pattern.find_iter(&lower).count()))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        match counts.as_slice() {
            [(_, 0), ..] | [] => JournalSentiment::Neutral,
            [(_, top), (_, second), ..] if top == second => JournalSentiment::Neutral,
            [(category, _), ..] => *category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SentimentClassifier {
        SentimentClassifier::default()
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(
            classifier().classify("", Domain::Journal),
            Sentiment::Journal(JournalSentiment::Neutral)
        );
        assert_eq!(
            classifier().classify("", Domain::Chat),
            Sentiment::Chat(ChatSentiment::Neutral)
        );
    }

    #[test]
    fn test_journal_anxious() {
        assert_eq!(
            classifier().classify_journal("I am so anxious and worried"),
            JournalSentiment::Anxious
        );
    }

    #[test]
    fn test_journal_counts_repeated_keywords() {
        // two depressed hits against one positive hit
        assert_eq!(
            classifier().classify_journal("Sad, so sad today. At least I stayed calm."),
            JournalSentiment::Depressed
        );
    }

    #[test]
    fn test_journal_stems_match_inflections() {
        assert_eq!(
            classifier().classify_journal("Feeling FRUSTRATED and irritated"),
            JournalSentiment::Negative
        );
        assert_eq!(
            classifier().classify_journal("So excited, I accomplished everything"),
            JournalSentiment::Positive
        );
    }

    #[test]
    fn test_journal_tie_is_neutral() {
        assert_eq!(
            classifier().classify_journal("happy but nervous"),
            JournalSentiment::Neutral
        );
    }

    #[test]
    fn test_journal_no_keywords_is_neutral() {
        assert_eq!(
            classifier().classify_journal("Went to the store and bought bread."),
            JournalSentiment::Neutral
        );
    }

    #[test]
    fn test_chat_positive() {
        assert_eq!(
            classifier().classify("I feel happy and calm", Domain::Chat),
            Sentiment::Chat(ChatSentiment::Positive)
        );
    }

    #[test]
    fn test_chat_negative() {
        assert_eq!(
            classifier().classify_chat("I'm scared and worried about tomorrow"),
            ChatSentiment::Negative
        );
    }

    #[test]
    fn test_chat_scores_presence_not_frequency() {
        // "sad" three times is still one negative point, matched by "good" + "hope"
        assert_eq!(
            classifier().classify_chat("sad sad sad, but good news and some hope"),
            ChatSentiment::Positive
        );
    }

    #[test]
    fn test_chat_balanced_is_neutral() {
        assert_eq!(
            classifier().classify_chat("good day, bad night"),
            ChatSentiment::Neutral
        );
    }

    #[test]
    fn test_classification_stays_in_domain() {
        let c = classifier();
        for text in ["", "calm", "panic attack", "angry and upset", "lonely", "ok"] {
            assert_eq!(c.classify(text, Domain::Chat).domain(), Domain::Chat);
            assert_eq!(c.classify(text, Domain::Journal).domain(), Domain::Journal);
        }
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_value(Sentiment::Journal(JournalSentiment::Depressed)).unwrap(),
            serde_json::json!("depressed")
        );
        assert_eq!(Sentiment::Chat(ChatSentiment::Neutral).to_string(), "neutral");
    }
}
