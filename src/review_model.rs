//! Vocabulary items under spaced repetition.
//!
//! A [`ReviewWord`] is persisted as part of a JSON array under the
//! review key, with camelCase field names and an ISO `YYYY-MM-DD` date:
//!
//! ```rust
//! use lingo_review_core::review_model::ReviewWord;
//!
//! let json = r#"{"id":"1718","word":"Bonjour","translation":"Hello","level":2,"reviewDate":"2024-01-05"}"#;
//! let word: ReviewWord = serde_json::from_str(json)?;
//! assert_eq!(word.level, 2);
//! assert_eq!(word.review_date.to_string(), "2024-01-05");
//! # Ok::<(), serde_json::Error>(())
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWord {
    /// Opaque identifier, stable for the word's lifetime.
    pub id: String,

    /// Source-language text. Compared case-insensitively for identity.
    pub word: String,

    pub translation: String,

    /// Mastery level. Starts at 0 and only ever grows by one per review.
    pub level: u32,

    /// Day on which the word becomes due.
    pub review_date: NaiveDate,
}

impl ReviewWord {
    /// A word seen for the first time: level 0, due immediately.
    pub fn new(details: &WordDetails, today: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            word: details.word.clone(),
            translation: details.translation.clone(),
            level: 0,
            review_date: today,
        }
    }

    pub fn same_word(&self, other: &str) -> bool {
        self.word.to_lowercase() == other.to_lowercase()
    }

    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.review_date <= as_of
    }
}

/// Text needed to create a word that is not in the store yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetails {
    pub word: String,
    pub translation: String,
}

impl WordDetails {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }
}
