//! UI notifications and encounter outcome

use serde::{Deserialize, Serialize};

/// How an encounter stands. Leaves `Running` at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Running,
    Victory,
    Defeat,
}

impl Outcome {
    pub fn is_over(self) -> bool {
        self != Outcome::Running
    }
}

/// Change notifications for HUD front-ends, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    LivesChanged { lives: u32 },
    PlayerHealth { current: f32, max: f32 },
    BossHealth { current: f32, max: f32 },
    /// Banner text; an empty string hides the banner
    Banner { text: String },
    ModeActivated { name: &'static str },
    ModeExpired { name: &'static str },
    HealUsed { gained: f32 },
    BoostCollected { name: &'static str, stacks: usize },
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32 },
    BossSpawned { kind: &'static str },
    Ended { outcome: Outcome },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_tagged() {
        let json = serde_json::to_string(&GameEvent::WaveCleared { wave: 4 }).unwrap();
        assert_eq!(json, r#"{"event":"wave_cleared","wave":4}"#);
    }

    #[test]
    fn test_outcome_is_over() {
        assert!(!Outcome::Running.is_over());
        assert!(Outcome::Victory.is_over());
        assert!(Outcome::Defeat.is_over());
    }
}
