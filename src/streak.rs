//! Daily engagement streak.
//!
//! Only a completed session writes the record, and only once per day.
//! Reading never writes: a streak whose last completion is older than
//! yesterday is shown as 0 while the stored count stays untouched until
//! the next completion restarts it.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::clock::Clock;
use crate::kv_store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub count: u32,
    pub last_completed_date: NaiveDate,
}

/// Streak as it should be displayed on `today`.
pub fn displayed_count(state: Option<&StreakState>, today: NaiveDate) -> u32 {
    match state {
        Some(state) if is_alive(state, today) => state.count,
        _ => 0,
    }
}

/// State after a session completed on `today`, or `None` if today was
/// already counted.
pub fn advance(state: Option<&StreakState>, today: NaiveDate) -> Option<StreakState> {
    let count = match state {
        Some(state) if state.last_completed_date == today => return None,
        Some(state) if Some(state.last_completed_date) == today.pred_opt() => {
            state.count.saturating_add(1)
        }
        _ => 1,
    };
    Some(StreakState {
        count,
        last_completed_date: today,
    })
}

fn is_alive(state: &StreakState, today: NaiveDate) -> bool {
    state.last_completed_date == today || Some(state.last_completed_date) == today.pred_opt()
}

pub struct StreakTracker<S, C> {
    storage: S,
    clock: C,
    key: String,
}

impl<S: KeyValueStore, C: Clock> StreakTracker<S, C> {
    pub fn new(storage: S, clock: C, key: impl Into<String>) -> Self {
        Self {
            storage,
            clock,
            key: key.into(),
        }
    }

    /// The stored record; corrupt data reads as absent.
    pub fn state(&self) -> Option<StreakState> {
        match self.storage.read(&self.key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("Stored streak under '{}' is unreadable, treating as absent: {e}", self.key);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Could not read streak under '{}', treating as absent: {e}", self.key);
                None
            }
        }
    }

    pub fn displayed_streak(&self) -> u32 {
        displayed_count(self.state().as_ref(), self.clock.today())
    }

    /// Counts today's completion and returns the resulting streak.
    pub fn record_completion(&self) -> Result<u32, AppResponse> {
        let current = self.state();
        let today = self.clock.today();

        match advance(current.as_ref(), today) {
            Some(next) => {
                let json = serde_json::to_string(&next)?;
                self.storage.write(&self.key, &json)?;
                debug!("streak is now {} as of {today}", next.count);
                Ok(next.count)
            }
            None => {
                let count = current.map(|s| s.count).unwrap_or(0);
                debug!("session already counted for {today}, streak stays {count}");
                Ok(count)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_advance_from_nothing_starts_at_one() {
        assert_eq!(advance(None, day(1)), Some(StreakState { count: 1, last_completed_date: day(1) }));
    }

    #[test]
    fn test_advance_same_day_is_noop() {
        let state = StreakState { count: 4, last_completed_date: day(10) };
        assert_eq!(advance(Some(&state), day(10)), None);
    }

    #[test]
    fn test_advance_after_gap_restarts() {
        let state = StreakState { count: 9, last_completed_date: day(2) };
        assert_eq!(advance(Some(&state), day(4)).map(|s| s.count), Some(1));
    }

    #[test]
    fn test_displayed_count_across_month_boundary() {
        let state = StreakState {
            count: 6,
            last_completed_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        };
        assert_eq!(displayed_count(Some(&state), day(1)), 6);
        assert_eq!(displayed_count(Some(&state), day(2)), 0);
    }

    #[test]
    fn test_displayed_count_with_future_date_is_zero() {
        let state = StreakState { count: 3, last_completed_date: day(20) };
        assert_eq!(displayed_count(Some(&state), day(5)), 0);
    }
}
