//! Enemy entity and its motion strategies.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{AISystem, Behavior};
use crate::config::Viewport;
use crate::history::BoundedHistory;
use crate::player::Player;

pub const ENEMY_RADIUS: f64 = 20.0;
pub const ENEMY_HEALTH: f64 = 100.0;
pub const ROUTE_MEMORY_CAPACITY: usize = 100;
/// Lifetime of a hallucination from spawn to forced removal.
pub const HALLUCINATION_LIFETIME_MS: f64 = 2000.0;

const MIN_SPEED: f64 = 1.0;
const SPEED_RANGE: f64 = 2.0;
/// Frames of linear extrapolation used to predict the player.
const PREDICTION_HORIZON: f64 = 10.0;
const AMBUSH_SPEED_FACTOR: f64 = 1.5;
const PATROL_TURN_CHANCE: f64 = 0.01;

/// Threat tiers, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Demon,
    Shadow,
    Nightmare,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Demon, EnemyKind::Shadow, EnemyKind::Nightmare];
}

/// A player position observed while chasing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSample {
    pub position: DVec2,
    pub time_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub position: DVec2,
    pub kind: EnemyKind,
    pub velocity: DVec2,
    pub speed: f64,
    pub health: f64,
    pub radius: f64,
    pub rotation: f64,
    route_memory: BoundedHistory<RouteSample>,
    hallucination_expires_at_ms: Option<f64>,
}

impl Enemy {
    /// Creates an enemy at rest with a speed drawn from `[1, 3)`.
    pub fn spawn(position: DVec2, kind: EnemyKind, rng: &mut impl Rng) -> Self {
        Self {
            position,
            kind,
            velocity: DVec2::ZERO,
            speed: MIN_SPEED + rng.random::<f64>() * SPEED_RANGE,
            health: ENEMY_HEALTH,
            radius: ENEMY_RADIUS,
            rotation: 0.0,
            route_memory: BoundedHistory::new(ROUTE_MEMORY_CAPACITY),
            hallucination_expires_at_ms: None,
        }
    }

    /// Creates a non-scoring enemy that expires [`HALLUCINATION_LIFETIME_MS`] after `now_ms`.
    pub fn hallucination(position: DVec2, now_ms: f64, rng: &mut impl Rng) -> Self {
        let mut enemy = Self::spawn(position, EnemyKind::Shadow, rng);
        enemy.hallucination_expires_at_ms = Some(now_ms + HALLUCINATION_LIFETIME_MS);
        enemy
    }

    pub fn is_hallucination(&self) -> bool {
        self.hallucination_expires_at_ms.is_some()
    }

    /// Only hallucinations ever expire.
    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.hallucination_expires_at_ms
            .is_some_and(|expires_at| now_ms >= expires_at)
    }

    pub fn route_memory(&self) -> &BoundedHistory<RouteSample> {
        &self.route_memory
    }

    /// Asks the AI for a decision and steers accordingly.
    ///
    /// Without a player there is nothing to react to and nothing changes.
    pub fn update(
        &mut self,
        player: Option<&Player>,
        ai: &mut AISystem,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Option<Behavior> {
        let player = player?;
        let behavior = ai.calculate_enemy_behavior(self, player, now_ms, rng);
        self.apply_behavior(behavior, player, now_ms, rng);
        Some(behavior)
    }

    pub fn apply_behavior(
        &mut self,
        behavior: Behavior,
        player: &Player,
        now_ms: f64,
        rng: &mut impl Rng,
    ) {
        match behavior {
            Behavior::Chase { .. } => self.chase(player, now_ms),
            Behavior::Ambush { .. } => self.ambush(player),
            Behavior::Patrol { .. } => self.patrol(rng),
        }
    }

    /// Direct pursuit at base speed, remembering where the player was.
    pub fn chase(&mut self, player: &Player, now_ms: f64) {
        self.steer_towards(player.position, self.speed);
        self.route_memory.push(RouteSample {
            position: player.position,
            time_ms: now_ms,
        });
    }

    /// Pursuit of the player's extrapolated position at boosted speed.
    pub fn ambush(&mut self, player: &Player) {
        let target = Self::predict_player_movement(player);
        self.steer_towards(target, self.speed * AMBUSH_SPEED_FACTOR);
    }

    /// Occasionally picks a new random drift; otherwise keeps moving.
    pub fn patrol(&mut self, rng: &mut impl Rng) {
        if rng.random::<f64>() < PATROL_TURN_CHANCE {
            self.velocity = DVec2::new(
                (rng.random::<f64>() - 0.5) * self.speed,
                (rng.random::<f64>() - 0.5) * self.speed,
            );
        }
    }

    pub fn predict_player_movement(player: &Player) -> DVec2 {
        player.position + player.velocity * PREDICTION_HORIZON
    }

    /// Integrates one frame of velocity and faces the direction of travel.
    pub fn advance(&mut self, viewport: &Viewport) {
        self.position += self.velocity;
        self.position = viewport.clamp_inset(self.position, self.radius);
        self.rotation = self.velocity.y.atan2(self.velocity.x);
    }

    fn steer_towards(&mut self, target: DVec2, speed: f64) {
        let delta = target - self.position;
        let distance = delta.length();
        // A non-finite target leaves the current heading untouched.
        if distance > 0.0 && distance.is_finite() {
            self.velocity = delta / distance * speed;
        }
    }
}
