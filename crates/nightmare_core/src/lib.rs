//! Core simulation for Nightmare Survival: procedural level generation,
//! adaptive enemy AI, and the tick-driven engine that wires them together.

pub mod ai;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod level;
pub mod noise;
pub mod player;
pub mod selector;
pub mod world;

pub use ai::{AISystem, Behavior, BehaviorKind};
pub use config::{GameConfig, Viewport};
pub use engine::GameEngine;
pub use error::{ConfigError, SelectError};
pub use events::{Event, FrameEvent, InputState};
pub use level::{LevelDescriptor, ProceduralGenerator};
pub use world::{GameSnapshot, Session};
