//! Session resources and the outward snapshot of a running game.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::enemy::{Enemy, EnemyKind};
use crate::events::RunMode;
use crate::level::{Obstacle, PowerUp};
use crate::player::Player;

pub const MAX_HEALTH: f64 = 100.0;
pub const MAX_SANITY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Menu,
    Playing,
    GameOver,
}

/// Per-run resources: level, score, health and sanity.
///
/// Health and sanity are kept within `[0, 100]` by their setters.
#[derive(Debug, Clone)]
pub struct Session {
    phase: GamePhase,
    mode: RunMode,
    level: u32,
    score: u64,
    health: f64,
    sanity: f64,
    game_time_ms: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: GamePhase::Menu,
            mode: RunMode::Survival,
            level: 1,
            score: 0,
            health: MAX_HEALTH,
            sanity: MAX_SANITY,
            game_time_ms: 0.0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh run resources in the given mode, already playing.
    pub fn start(mode: RunMode) -> Self {
        Self {
            phase: GamePhase::Playing,
            mode,
            ..Self::default()
        }
    }

    // Getters
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn sanity(&self) -> f64 {
        self.sanity
    }

    pub fn game_time_ms(&self) -> f64 {
        self.game_time_ms
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    // Setters
    pub fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// NaN is ignored so the resource stays inside `[0, MAX_HEALTH]`.
    pub fn set_health(&mut self, value: f64) {
        if !value.is_nan() {
            self.health = value.clamp(0., MAX_HEALTH);
        }
    }

    pub fn set_sanity(&mut self, value: f64) {
        if !value.is_nan() {
            self.sanity = value.clamp(0., MAX_SANITY);
        }
    }

    pub fn advance_time(&mut self, dt_ms: f64) {
        self.game_time_ms += dt_ms.max(0.0);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub skill_level: f64,
    pub damaged: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub position: DVec2,
    pub kind: EnemyKind,
    pub rotation: f64,
    pub radius: f64,
    pub hallucination: bool,
}

impl From<&Enemy> for EnemyView {
    fn from(enemy: &Enemy) -> Self {
        Self {
            position: enemy.position,
            kind: enemy.kind,
            rotation: enemy.rotation,
            radius: enemy.radius,
            hallucination: enemy.is_hallucination(),
        }
    }
}

/// Game state to share outwardly at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub mode: RunMode,
    pub level: u32,
    pub score: u64,
    pub health: f64,
    pub sanity: f64,
    pub game_time_ms: f64,
    pub difficulty: f64,
    pub player: Option<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
}

impl GameSnapshot {
    pub fn empty() -> Self {
        Self::capture(&Session::new(), 1.0, None, false, &[], &[], &[])
    }

    pub fn capture(
        session: &Session,
        difficulty: f64,
        player: Option<&Player>,
        player_damaged: bool,
        enemies: &[Enemy],
        obstacles: &[Obstacle],
        power_ups: &[PowerUp],
    ) -> Self {
        Self {
            phase: session.phase(),
            mode: session.mode(),
            level: session.level(),
            score: session.score(),
            health: session.health(),
            sanity: session.sanity(),
            game_time_ms: session.game_time_ms(),
            difficulty,
            player: player.map(|player| PlayerView {
                position: player.position,
                velocity: player.velocity,
                radius: player.radius,
                skill_level: player.skill_level(),
                damaged: player_damaged,
            }),
            enemies: enemies.iter().map(EnemyView::from).collect(),
            obstacles: obstacles.to_vec(),
            power_ups: power_ups.to_vec(),
        }
    }
}
