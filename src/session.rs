//! Practice sessions and the daily XP bar.
//!
//! XP lives only for the life of the core; it is not persisted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionKind {
    Chat,
    Game,
}

impl SessionKind {
    pub fn xp_reward(self) -> u32 {
        match self {
            SessionKind::Chat => 20,
            SessionKind::Game => 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub daily_xp: u32,
    pub daily_goal: u32,
}

impl DailyProgress {
    pub fn new(daily_goal: u32) -> Self {
        Self {
            daily_xp: 0,
            daily_goal,
        }
    }

    /// Adds the session's reward, capped at the goal. Returns the XP
    /// actually credited.
    pub fn credit(&mut self, kind: SessionKind) -> u32 {
        let before = self.daily_xp;
        self.daily_xp = before.saturating_add(kind.xp_reward()).min(self.daily_goal);
        self.daily_xp.saturating_sub(before)
    }

    pub fn goal_reached(&self) -> bool {
        self.daily_xp >= self.daily_goal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub streak: u32,
    pub xp_gained: u32,
    pub daily_xp: u32,
    pub daily_goal: u32,
    pub goal_reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_caps_at_goal() {
        let mut progress = DailyProgress::new(100);
        assert_eq!(progress.credit(SessionKind::Game), 30);
        assert_eq!(progress.credit(SessionKind::Game), 30);
        assert_eq!(progress.credit(SessionKind::Chat), 20);
        assert_eq!(progress.credit(SessionKind::Game), 20);
        assert_eq!(progress.daily_xp, 100);
        assert!(progress.goal_reached());
        assert_eq!(progress.credit(SessionKind::Chat), 0);
    }
}
