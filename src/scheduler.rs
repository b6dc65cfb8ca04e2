//! Spacing curve and the pure operations over a review collection.
//!
//! A successful review moves a word from `level` to `level + 1` and pushes
//! its next review out by `INTERVAL_TABLE[min(level, 5)]` days, so the gap
//! saturates at 90 days.

use chrono::{Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::review_model::{ReviewWord, WordDetails};

pub const INTERVAL_TABLE: [u64; 6] = [1, 3, 7, 14, 30, 90];

pub fn interval_days(level: u32) -> u64 {
    let index = (level as usize).min(INTERVAL_TABLE.len() - 1);
    INTERVAL_TABLE[index]
}

pub fn next_review_date(level: u32, today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(interval_days(level)))
        .unwrap_or(NaiveDate::MAX)
}

/// Which branch an upsert took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum UpsertOutcome {
    Updated { id: String },
    Created { id: String },
    Ignored,
}

impl UpsertOutcome {
    pub fn id(&self) -> Option<&str> {
        match self {
            UpsertOutcome::Updated { id } | UpsertOutcome::Created { id } => Some(id),
            UpsertOutcome::Ignored => None,
        }
    }
}

/// Index of the first word matching by `id` or, when `details` is given,
/// by case-insensitive word text. An empty `id` never matches.
pub fn find_match(words: &[ReviewWord], id: &str, details: Option<&WordDetails>) -> Option<usize> {
    let word_key = details
        .map(|d| d.word.as_str())
        .filter(|w| !w.trim().is_empty());

    words.iter().position(|w| {
        (!id.is_empty() && w.id == id) || word_key.is_some_and(|key| w.same_word(key))
    })
}

/// Records a review of the word identified by `id` (or `details.word`).
///
/// `level` is the level before this review. A matched word advances one
/// step from the higher of `level` and its stored level, with a review
/// date taken from the interval table; its text and id stay as they are.
/// An unmatched word with details is created at level 0, due `today`. Anything else leaves `words` untouched.
pub fn upsert_review(
    words: &mut Vec<ReviewWord>,
    id: &str,
    level: u32,
    details: Option<&WordDetails>,
    today: NaiveDate,
) -> UpsertOutcome {
    if let Some(index) = find_match(words, id, details) {
        let entry = &mut words[index];
        // A stale caller level never pulls a word back down.
        let from = level.max(entry.level);
        entry.level = from.saturating_add(1);
        entry.review_date = next_review_date(from, today);
        debug!(
            "word {} moved to level {} (due {})",
            entry.id, entry.level, entry.review_date
        );
        return UpsertOutcome::Updated { id: entry.id.clone() };
    }

    match details {
        Some(details) if !details.word.trim().is_empty() => {
            let created = ReviewWord::new(details, today);
            let id = created.id.clone();
            debug!("new review word '{}' as {id}", created.word);
            words.push(created);
            UpsertOutcome::Created { id }
        }
        Some(_) => {
            debug!("ignoring review word with empty text");
            UpsertOutcome::Ignored
        }
        None => {
            debug!("no review word matches id '{id}'");
            UpsertOutcome::Ignored
        }
    }
}

/// Words whose review date is on or before `as_of`, in stored order.
pub fn due_words(words: &[ReviewWord], as_of: NaiveDate) -> Vec<ReviewWord> {
    words.iter().filter(|w| w.is_due(as_of)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_table_is_monotonic_and_saturates() {
        let mut previous = 0;
        for level in 0..20 {
            let days = interval_days(level);
            assert!(days >= previous, "interval shrank at level {level}");
            previous = days;
        }
        for level in 5..50 {
            assert_eq!(interval_days(level), 90);
        }
        assert_eq!(interval_days(u32::MAX), 90);
    }

    #[test]
    fn test_next_review_date_uses_level_before_review() {
        let today = day(2024, 1, 1);
        assert_eq!(next_review_date(0, today), day(2024, 1, 2));
        assert_eq!(next_review_date(2, today), day(2024, 1, 8));
        assert_eq!(next_review_date(9, today), day(2024, 3, 31));
    }

    #[test]
    fn test_next_review_date_saturates_at_calendar_end() {
        assert_eq!(next_review_date(5, NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn test_create_path_stamps_level_zero_due_today() {
        let today = day(2024, 6, 1);
        let mut words = Vec::new();
        let outcome = upsert_review(&mut words, "", 0, Some(&WordDetails::new("Chat", "Cat")), today);

        assert!(matches!(outcome, UpsertOutcome::Created { .. }));
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].level, 0);
        assert_eq!(words[0].review_date, today);
        assert_eq!(outcome.id(), Some(words[0].id.as_str()));
    }

    #[test]
    fn test_second_sighting_matches_case_insensitively() {
        let today = day(2024, 6, 1);
        let mut words = Vec::new();
        let first = upsert_review(&mut words, "", 0, Some(&WordDetails::new("Bonjour", "Hello")), today);
        let second = upsert_review(&mut words, "", 0, Some(&WordDetails::new("bonjour", "Hi")), today);

        assert_eq!(words.len(), 1);
        assert_eq!(second, UpsertOutcome::Updated { id: first.id().unwrap().to_string() });
        assert_eq!(words[0].word, "Bonjour");
        assert_eq!(words[0].translation, "Hello");
        assert_eq!(words[0].level, 1);
        assert_eq!(words[0].review_date, day(2024, 6, 2));
    }

    #[test]
    fn test_unknown_id_without_details_is_ignored() {
        let mut words = vec![ReviewWord {
            id: "a".to_string(),
            word: "Merci".to_string(),
            translation: "Thanks".to_string(),
            level: 1,
            review_date: day(2024, 1, 1),
        }];
        let before = words.clone();

        assert_eq!(upsert_review(&mut words, "zzz", 1, None, day(2024, 1, 1)), UpsertOutcome::Ignored);
        assert_eq!(upsert_review(&mut words, "", 1, None, day(2024, 1, 1)), UpsertOutcome::Ignored);
        assert_eq!(words, before);
    }

    #[test]
    fn test_stale_level_does_not_lower_stored_level() {
        let today = day(2024, 1, 1);
        let mut words = vec![ReviewWord {
            id: "chat".to_string(),
            word: "Chat".to_string(),
            translation: "Cat".to_string(),
            level: 4,
            review_date: day(2024, 1, 15),
        }];

        let seen_again = upsert_review(&mut words, "", 0, Some(&WordDetails::new("chat", "cat")), today);
        assert_eq!(seen_again, UpsertOutcome::Updated { id: "chat".to_string() });
        assert_eq!(words[0].level, 5);
        assert_eq!(words[0].review_date, day(2024, 1, 31));

        upsert_review(&mut words, "chat", 0, None, today);
        assert_eq!(words[0].level, 6);
        assert_eq!(words[0].review_date, day(2024, 3, 31));
    }

    #[test]
    fn test_blank_word_is_not_created() {
        let mut words = Vec::new();
        let outcome = upsert_review(&mut words, "", 0, Some(&WordDetails::new("   ", "nothing")), day(2024, 1, 1));
        assert_eq!(outcome, UpsertOutcome::Ignored);
        assert!(words.is_empty());
    }

    #[test]
    fn test_first_match_wins_by_position() {
        let today = day(2024, 1, 1);
        let mut words = vec![
            ReviewWord {
                id: "1".to_string(),
                word: "Pain".to_string(),
                translation: "Bread".to_string(),
                level: 0,
                review_date: today,
            },
            ReviewWord {
                id: "2".to_string(),
                word: "Eau".to_string(),
                translation: "Water".to_string(),
                level: 0,
                review_date: today,
            },
        ];

        // id points at the second entry, word text at the first: position decides.
        let outcome = upsert_review(&mut words, "2", 0, Some(&WordDetails::new("PAIN", "Bread")), today);
        assert_eq!(outcome, UpsertOutcome::Updated { id: "1".to_string() });
        assert_eq!(words[0].level, 1);
        assert_eq!(words[1].level, 0);
    }
}
