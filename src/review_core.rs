//! The review store and streak tracker wired to one storage medium,
//! driven by the events the rest of the app emits.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::clock::{Clock, SystemClock};
use crate::config::CoreConfig;
use crate::kv_store::KeyValueStore;
use crate::local_db_state::AppDbState;
use crate::review_model::{ReviewWord, WordDetails};
use crate::review_store::ReviewStore;
use crate::scheduler::UpsertOutcome;
use crate::session::{DailyProgress, SessionKind, SessionSummary};
use crate::streak::StreakTracker;

/// Inputs from the conversation, review and tools screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CoreEvent {
    /// A correction surfaced a vocabulary item.
    VocabularyObserved { word: String, translation: String },

    #[serde(rename_all = "camelCase")]
    WordMarkedLearned { id: String, current_level: i64 },

    /// Manually added from the tools screen with a host-chosen id.
    WordAdded {
        id: String,
        word: String,
        translation: String,
    },

    SessionCompleted { kind: SessionKind },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventOutcome {
    Review(UpsertOutcome),
    Session(SessionSummary),
}

pub struct ReviewCore<S, C> {
    reviews: ReviewStore<Arc<S>, C>,
    streak: StreakTracker<Arc<S>, C>,
    progress: DailyProgress,
}

impl ReviewCore<AppDbState, SystemClock> {
    /// Opens the LMDB environment from `config` on the system clock.
    pub fn open(config: &CoreConfig) -> Result<Self, AppResponse> {
        config.validate()?;
        let db = AppDbState::init(config)?;
        Ok(Self::new(db, SystemClock, config))
    }
}

impl<S: KeyValueStore, C: Clock + Clone> ReviewCore<S, C> {
    pub fn new(storage: S, clock: C, config: &CoreConfig) -> Self {
        let storage = Arc::new(storage);
        let reviews = ReviewStore::open(Arc::clone(&storage), clock.clone(), config.review_key.as_str());
        let streak = StreakTracker::new(storage, clock, config.streak_key.as_str());
        info!("Review core ready, displayed streak {}", streak.displayed_streak());

        Self {
            reviews,
            streak,
            progress: DailyProgress::new(config.daily_goal),
        }
    }

    pub fn handle(&mut self, event: CoreEvent) -> Result<EventOutcome, AppResponse> {
        debug!("handling {event:?}");
        match event {
            CoreEvent::VocabularyObserved { word, translation } => self
                .reviews
                .observe_word(&WordDetails::new(word, translation))
                .map(EventOutcome::Review),
            CoreEvent::WordMarkedLearned { id, current_level } => self
                .reviews
                .mark_learned(&id, clamp_level(current_level))
                .map(EventOutcome::Review),
            CoreEvent::WordAdded {
                id,
                word,
                translation,
            } => self
                .reviews
                .upsert_review(&id, 0, Some(&WordDetails::new(word, translation)))
                .map(EventOutcome::Review),
            CoreEvent::SessionCompleted { kind } => {
                self.complete_session(kind).map(EventOutcome::Session)
            }
        }
    }

    pub fn complete_session(&mut self, kind: SessionKind) -> Result<SessionSummary, AppResponse> {
        let streak = self.streak.record_completion()?;
        let xp_gained = self.progress.credit(kind);
        Ok(SessionSummary {
            streak,
            xp_gained,
            daily_xp: self.progress.daily_xp,
            daily_goal: self.progress.daily_goal,
            goal_reached: self.progress.goal_reached(),
        })
    }

    /// Recomputed from the current collection on every call.
    pub fn due_words(&self, as_of: NaiveDate) -> Vec<ReviewWord> {
        self.reviews.due_words(as_of)
    }

    pub fn due_today(&self) -> Vec<ReviewWord> {
        self.reviews.due_today()
    }

    pub fn displayed_streak(&self) -> u32 {
        self.streak.displayed_streak()
    }

    pub fn reviews(&self) -> &ReviewStore<Arc<S>, C> {
        &self.reviews
    }
}

/// Levels arrive from the host as JSON numbers; negatives count as 0.
pub fn clamp_level(level: i64) -> u32 {
    u32::try_from(level.max(0)).unwrap_or(u32::MAX)
}
