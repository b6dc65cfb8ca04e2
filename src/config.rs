//! Runtime configuration for a [`ReviewCore`](crate::review_core::ReviewCore).
//!
//! Hosts either pass a bare database name (every other field takes its
//! default) or a JSON object in camelCase:
//!
//! ```rust
//! use lingo_review_core::config::CoreConfig;
//!
//! let config = CoreConfig::from_json(r#"{"dbPath":"learner_42","dailyGoal":150}"#)?;
//! assert_eq!(config.db_path, "learner_42");
//! assert_eq!(config.review_key, "reviewWords");
//! assert_eq!(config.daily_goal, 150);
//! # Ok::<(), lingo_review_core::AppResponse>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;

pub const DEFAULT_DB_PATH: &str = "lingo_review";
pub const DEFAULT_MAP_SIZE: usize = 10 * 1024 * 1024;
pub const REVIEW_WORDS_KEY: &str = "reviewWords";
pub const STREAK_DATA_KEY: &str = "streakData";
pub const DEFAULT_DAILY_GOAL: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Base path; the LMDB environment lives in `<db_path>.lmdb`.
    pub db_path: String,
    pub map_size: usize,
    pub review_key: String,
    pub streak_key: String,
    pub daily_goal: u32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            review_key: REVIEW_WORDS_KEY.to_string(),
            streak_key: STREAK_DATA_KEY.to_string(),
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

impl CoreConfig {
    pub fn with_path(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Parses a host-supplied JSON config and rejects values the store
    /// cannot work with.
    pub fn from_json(json: &str) -> Result<Self, AppResponse> {
        let config: CoreConfig = serde_json::from_str(json)
            .map_err(|e| AppResponse::BadRequest(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppResponse> {
        if self.db_path.trim().is_empty() {
            return Err(AppResponse::ValidationError("dbPath must not be empty".to_string()));
        }
        if self.review_key.is_empty() || self.streak_key.is_empty() {
            return Err(AppResponse::ValidationError("storage keys must not be empty".to_string()));
        }
        if self.review_key == self.streak_key {
            return Err(AppResponse::ValidationError(
                "reviewKey and streakKey must differ".to_string(),
            ));
        }
        if self.map_size == 0 {
            return Err(AppResponse::ValidationError("mapSize must be positive".to_string()));
        }
        Ok(())
    }

    pub fn lmdb_dir(&self) -> String {
        format!("{}.lmdb", self.db_path)
    }
}
