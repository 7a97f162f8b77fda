//! Player entity as seen by the simulation.

use glam::DVec2;

use crate::config::Viewport;
use crate::events::InputState;

pub const PLAYER_RADIUS: f64 = 15.0;
pub const PLAYER_SPEED: f64 = 3.0;
const FRICTION: f64 = 0.8;
const RUN_FACTOR: f64 = 1.5;
const SKILL_GAIN_PER_UPDATE: f64 = 0.001;

#[derive(Debug, Clone)]
pub struct Player {
    pub position: DVec2,
    pub velocity: DVec2,
    pub speed: f64,
    pub radius: f64,
    skill_level: f64,
}

impl Player {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            skill_level: 1.0,
        }
    }

    /// Experience proxy that only ever grows during a run.
    pub fn skill_level(&self) -> f64 {
        self.skill_level
    }

    /// Applies one frame of input, moves, and clamps to the viewport.
    pub fn update(&mut self, input: &InputState, viewport: &Viewport) {
        let drive = if input.run {
            self.speed * RUN_FACTOR
        } else {
            self.speed
        };
        // Run boosts only the axes being driven; released axes keep decaying.
        self.velocity.x = match (input.left, input.right) {
            (true, _) => -drive,
            (false, true) => drive,
            _ => self.velocity.x * FRICTION,
        };
        self.velocity.y = match (input.up, input.down) {
            (true, _) => -drive,
            (false, true) => drive,
            _ => self.velocity.y * FRICTION,
        };

        self.position += self.velocity;
        self.position = viewport.clamp_inset(self.position, self.radius);

        self.skill_level += SKILL_GAIN_PER_UPDATE;
    }
}
