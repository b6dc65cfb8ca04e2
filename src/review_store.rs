//! Owner of the learned-word collection.
//!
//! The collection is loaded once from the review key and rewritten in
//! full after every change. Unreadable stored data opens as an empty
//! collection instead of failing.

use chrono::NaiveDate;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::app_response::AppResponse;
use crate::clock::Clock;
use crate::kv_store::KeyValueStore;
use crate::review_model::{ReviewWord, WordDetails};
use crate::scheduler::{self, UpsertOutcome};

pub struct ReviewStore<S, C> {
    storage: S,
    clock: C,
    key: String,
    words: Vec<ReviewWord>,
}

impl<S: KeyValueStore, C: Clock> ReviewStore<S, C> {
    pub fn open(storage: S, clock: C, key: impl Into<String>) -> Self {
        let key = key.into();
        let words = load_words(&storage, &key);
        info!("Review store '{key}' opened with {} words", words.len());
        Self {
            storage,
            clock,
            key,
            words,
        }
    }

    pub fn words(&self) -> &[ReviewWord] {
        &self.words
    }

    pub fn word_by_id(&self, id: &str) -> Option<&ReviewWord> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Create-or-update, then persist. See [`scheduler::upsert_review`].
    ///
    /// If the write fails the collection is left exactly as it was.
    pub fn upsert_review(
        &mut self,
        id: &str,
        level: u32,
        details: Option<&WordDetails>,
    ) -> Result<UpsertOutcome, AppResponse> {
        let mut next = self.words.clone();
        let outcome = scheduler::upsert_review(&mut next, id, level, details, self.clock.today());

        if outcome != UpsertOutcome::Ignored {
            self.persist(&next)?;
            self.words = next;
        }
        Ok(outcome)
    }

    /// A word surfaced in conversation. Matches by text only.
    pub fn observe_word(&mut self, details: &WordDetails) -> Result<UpsertOutcome, AppResponse> {
        self.upsert_review("", 0, Some(details))
    }

    /// A reviewed word the user marked as learned. Never creates.
    pub fn mark_learned(&mut self, id: &str, current_level: u32) -> Result<UpsertOutcome, AppResponse> {
        self.upsert_review(id, current_level, None)
    }

    pub fn due_words(&self, as_of: NaiveDate) -> Vec<ReviewWord> {
        scheduler::due_words(&self.words, as_of)
    }

    pub fn due_today(&self) -> Vec<ReviewWord> {
        self.due_words(self.clock.today())
    }

    pub fn due_count(&self) -> usize {
        let today = self.clock.today();
        self.words.iter().filter(|w| w.is_due(today)).count()
    }

    /// Today's due words in random order, as dealt onto the review screen.
    pub fn review_deck<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ReviewWord> {
        let mut deck = self.due_today();
        deck.shuffle(rng);
        deck
    }

    fn persist(&self, words: &[ReviewWord]) -> Result<(), AppResponse> {
        let json = serde_json::to_string(words)?;
        self.storage.write(&self.key, &json).inspect_err(|e| {
            warn!("Failed to persist review words under '{}': {e}", self.key);
        })
    }
}

fn load_words<S: KeyValueStore>(storage: &S, key: &str) -> Vec<ReviewWord> {
    match storage.read(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(words) => words,
            Err(e) => {
                warn!("Stored review words under '{key}' are unreadable, starting empty: {e}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Could not read review words under '{key}', starting empty: {e}");
            Vec::new()
        }
    }
}
