//! Events fed into the engine and events it reports back.

use serde::{Deserialize, Serialize};

use crate::level::PowerUpKind;

/// Inputs applied to [`crate::GameEngine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Start { speedrun: bool },
    Restart,
    /// Leaves a running game for the menu; ticks stop until resumed.
    Pause,
    /// Continues a paused run where it left off.
    Resume,
    Input(InputState),
    /// Elapsed time since the previous tick, in milliseconds.
    Tick { dt_ms: f64 },
}

/// Held movement keys for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Survival,
    Speedrun,
}

impl RunMode {
    pub fn from_speedrun(speedrun: bool) -> Self {
        if speedrun {
            RunMode::Speedrun
        } else {
            RunMode::Survival
        }
    }
}

/// Something that happened during a tick, for audio/persistence layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameEvent {
    PlayerDamaged { damage: f64 },
    PowerUpCollected { kind: PowerUpKind },
    LevelCompleted { new_level: u32 },
    HallucinationSpawned,
    GameOver {
        score: u64,
        level: u32,
        time_ms: f64,
        mode: RunMode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tick_serialization() {
        let event = Event::Tick { dt_ms: 16.5 };
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_event_input_serialization() {
        let event = Event::Input(InputState {
            left: true,
            run: true,
            ..InputState::default()
        });
        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deserialized);
    }

    #[test]
    fn test_input_state_missing_keys_default_to_released() {
        let input: InputState = serde_json::from_str(r#"{"up": true}"#).unwrap();
        assert_eq!(
            input,
            InputState {
                up: true,
                ..InputState::default()
            }
        );
    }

    #[test]
    fn test_frame_event_tagging() {
        let event = FrameEvent::GameOver {
            score: 1200,
            level: 2,
            time_ms: 5000.0,
            mode: RunMode::Speedrun,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "game_over");
        assert_eq!(json["mode"], "speedrun");
    }
}
