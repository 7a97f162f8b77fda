//! Procedural level population.

use glam::DVec2;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::config::Viewport;
use crate::enemy::{Enemy, EnemyKind};
use crate::noise::PerlinNoise;
use crate::selector::weighted_random;

pub const MAX_ENEMIES: usize = 8;
pub const SPAWN_INSET: f64 = 50.0;
pub const POWER_UP_RADIUS: f64 = 10.0;
const MAX_SEED: f64 = 1_000_000.0;
const LEVELS_PER_STEP: u32 = 5;
const BASE_COUNT: usize = 2;
const OBSTACLE_MIN_SIZE: f64 = 30.0;
const OBSTACLE_SIZE_RANGE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Wall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    pub position: DVec2,
    pub width: f64,
    pub height: f64,
    pub kind: ObstacleKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Health,
    Sanity,
    Score,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Sanity, PowerUpKind::Score];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUp {
    pub position: DVec2,
    pub kind: PowerUpKind,
    pub radius: f64,
}

/// Everything that populates one level.
#[derive(Debug, Clone)]
pub struct LevelDescriptor {
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
}

/// Builds fresh level content for a level index.
///
/// The seed fixes the noise permutation for the lifetime of the generator.
/// Per-level placement draws from the caller's random source, so the same
/// seed and level do not reproduce the same layout.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator {
    seed: f64,
    noise: PerlinNoise,
    viewport: Viewport,
}

impl ProceduralGenerator {
    /// Picks a random seed in `[0, 1_000_000)`.
    pub fn new(viewport: Viewport) -> Self {
        Self::with_seed(rand::random::<f64>() * MAX_SEED, viewport)
    }

    pub fn with_seed(seed: f64, viewport: Viewport) -> Self {
        Self {
            seed,
            noise: PerlinNoise::new(seed),
            viewport,
        }
    }

    pub fn seed(&self) -> f64 {
        self.seed
    }

    pub fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn generate_level(&self, level: u32, rng: &mut impl Rng) -> LevelDescriptor {
        let descriptor = LevelDescriptor {
            enemies: self.generate_enemies(level, rng),
            obstacles: self.generate_obstacles(level, rng),
            power_ups: self.generate_power_ups(rng),
        };
        tracing::debug!(
            level,
            enemies = descriptor.enemies.len(),
            obstacles = descriptor.obstacles.len(),
            power_ups = descriptor.power_ups.len(),
            "level generated"
        );
        descriptor
    }

    pub fn enemy_count(level: u32) -> usize {
        (BASE_COUNT + (level / LEVELS_PER_STEP) as usize).min(MAX_ENEMIES)
    }

    pub fn obstacle_count(level: u32) -> usize {
        (level / LEVELS_PER_STEP) as usize + BASE_COUNT
    }

    /// Spawn weights for [`EnemyKind::ALL`], in the same order.
    ///
    /// Demons dominate early, shadows take over mid-game, and nightmares only
    /// appear past level 50.
    pub fn enemy_weights(level: u32) -> [f64; 3] {
        let level = f64::from(level);
        [
            (100.0 - level * 2.0).max(0.0),
            (level * 1.5).min(100.0),
            (level - 50.0).max(0.0),
        ]
    }

    pub fn select_enemy_kind(level: u32, rng: &mut impl Rng) -> EnemyKind {
        weighted_random(&EnemyKind::ALL, &Self::enemy_weights(level), rng)
            .copied()
            .unwrap_or(EnemyKind::Demon)
    }

    /// One or two: the floor of a draw from `[0, 3)`, raised to at least one.
    pub fn power_up_count(rng: &mut impl Rng) -> usize {
        ((rng.random::<f64>() * 3.0).floor() as usize).max(1)
    }

    fn generate_enemies(&self, level: u32, rng: &mut impl Rng) -> Vec<Enemy> {
        (0..Self::enemy_count(level))
            .map(|_| {
                let position = self.inset_position(rng);
                let kind = Self::select_enemy_kind(level, rng);
                Enemy::spawn(position, kind, rng)
            })
            .collect()
    }

    fn generate_obstacles(&self, level: u32, rng: &mut impl Rng) -> Vec<Obstacle> {
        let span = DVec2::new(
            self.viewport.span_x(SPAWN_INSET * 2.0),
            self.viewport.span_y(SPAWN_INSET * 2.0),
        );
        (0..Self::obstacle_count(level))
            .map(|_| Obstacle {
                position: DVec2::new(rng.random::<f64>() * span.x, rng.random::<f64>() * span.y),
                width: OBSTACLE_MIN_SIZE + rng.random::<f64>() * OBSTACLE_SIZE_RANGE,
                height: OBSTACLE_MIN_SIZE + rng.random::<f64>() * OBSTACLE_SIZE_RANGE,
                kind: ObstacleKind::Wall,
            })
            .collect()
    }

    fn generate_power_ups(&self, rng: &mut impl Rng) -> Vec<PowerUp> {
        (0..Self::power_up_count(rng))
            .map(|_| PowerUp {
                position: self.inset_position(rng),
                kind: PowerUpKind::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(PowerUpKind::Health),
                radius: POWER_UP_RADIUS,
            })
            .collect()
    }

    fn inset_position(&self, rng: &mut impl Rng) -> DVec2 {
        DVec2::new(
            SPAWN_INSET + rng.random::<f64>() * self.viewport.span_x(SPAWN_INSET * 2.0),
            SPAWN_INSET + rng.random::<f64>() * self.viewport.span_y(SPAWN_INSET * 2.0),
        )
    }
}
