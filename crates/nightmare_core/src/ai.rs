//! Adaptive enemy AI: difficulty scaling and per-enemy behavior decisions.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::enemy::Enemy;
use crate::history::BoundedHistory;
use crate::player::Player;

pub const PLAYER_HISTORY_CAPACITY: usize = 50;
/// Enemies closer than this always chase.
pub const CHASE_RADIUS: f64 = 150.0;
const LEVEL_STEP: f64 = 0.05;
const SKILL_DIVISOR: f64 = 5.0;
const MIN_SKILL_ADJUSTMENT: f64 = 0.5;
const MAX_SKILL_ADJUSTMENT: f64 = 2.0;
const AMBUSH_WINDOW: usize = 5;
const AMBUSH_MIN_SPEED: f64 = 2.0;
const AMBUSH_CHANCE: f64 = 0.05;
const AMBUSH_INTENSITY: f64 = 1.5;
const PATROL_INTENSITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorKind {
    Chase,
    Ambush,
    Patrol,
}

/// What an enemy should do this tick, and how hard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Behavior {
    Chase { intensity: f64 },
    Ambush { intensity: f64 },
    Patrol { intensity: f64 },
}

impl Behavior {
    pub fn kind(&self) -> BehaviorKind {
        match self {
            Behavior::Chase { .. } => BehaviorKind::Chase,
            Behavior::Ambush { .. } => BehaviorKind::Ambush,
            Behavior::Patrol { .. } => BehaviorKind::Patrol,
        }
    }

    pub fn intensity(&self) -> f64 {
        match *self {
            Behavior::Chase { intensity }
            | Behavior::Ambush { intensity }
            | Behavior::Patrol { intensity } => intensity,
        }
    }
}

/// One observation of the player's motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerSample {
    pub position: DVec2,
    pub velocity: DVec2,
    pub timestamp_ms: f64,
}

#[derive(Debug, Clone)]
pub struct AISystem {
    difficulty_multiplier: f64,
    history: BoundedHistory<PlayerSample>,
}

impl Default for AISystem {
    fn default() -> Self {
        Self::new()
    }
}

impl AISystem {
    pub fn new() -> Self {
        Self {
            difficulty_multiplier: 1.0,
            history: BoundedHistory::new(PLAYER_HISTORY_CAPACITY),
        }
    }

    pub fn difficulty_multiplier(&self) -> f64 {
        self.difficulty_multiplier
    }

    pub fn history(&self) -> &BoundedHistory<PlayerSample> {
        &self.history
    }

    /// Recomputes the multiplier from the level index and the player's skill.
    pub fn adjust_difficulty(&mut self, player_skill: f64, level: u32) {
        let base = 1.0 + (f64::from(level) - 1.0) * LEVEL_STEP;
        let skill_adjustment =
            (player_skill / SKILL_DIVISOR).clamp(MIN_SKILL_ADJUSTMENT, MAX_SKILL_ADJUSTMENT);
        self.difficulty_multiplier = base * skill_adjustment;
        tracing::debug!(
            level,
            player_skill,
            multiplier = self.difficulty_multiplier,
            "difficulty adjusted"
        );
    }

    /// Decides how `enemy` reacts to `player` this tick.
    ///
    /// Every call records a player sample, so the history fills once per
    /// evaluated enemy rather than once per tick.
    pub fn calculate_enemy_behavior(
        &mut self,
        enemy: &Enemy,
        player: &Player,
        now_ms: f64,
        rng: &mut impl Rng,
    ) -> Behavior {
        let distance = enemy.position.distance(player.position);
        self.record_player_behavior(player, now_ms);

        let behavior = if distance < CHASE_RADIUS {
            Behavior::Chase {
                intensity: self.difficulty_multiplier,
            }
        } else if self.should_ambush(rng) {
            Behavior::Ambush {
                intensity: self.difficulty_multiplier * AMBUSH_INTENSITY,
            }
        } else {
            Behavior::Patrol {
                intensity: self.difficulty_multiplier * PATROL_INTENSITY,
            }
        };
        tracing::trace!(?behavior, distance, "enemy behavior");
        behavior
    }

    pub fn record_player_behavior(&mut self, player: &Player, now_ms: f64) {
        self.history.push(PlayerSample {
            position: player.position,
            velocity: player.velocity,
            timestamp_ms: now_ms,
        });
    }

    /// Stochastic gate that only opens while the player moves fast.
    pub fn should_ambush(&self, rng: &mut impl Rng) -> bool {
        self.recent_mean_velocity()
            .is_some_and(|mean| mean.length() > AMBUSH_MIN_SPEED)
            && rng.random::<f64>() < AMBUSH_CHANCE
    }

    /// Mean velocity over the last few samples, if enough exist.
    pub fn recent_mean_velocity(&self) -> Option<DVec2> {
        if self.history.len() < AMBUSH_WINDOW {
            return None;
        }
        let sum = self
            .history
            .recent(AMBUSH_WINDOW)
            .fold(DVec2::ZERO, |acc, sample| acc + sample.velocity);
        Some(sum / AMBUSH_WINDOW as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn enemy_at(x: f64, y: f64) -> Enemy {
        let mut rng = StdRng::seed_from_u64(0);
        Enemy::spawn(DVec2::new(x, y), EnemyKind::Demon, &mut rng)
    }

    fn moving_player(velocity: DVec2) -> Player {
        let mut player = Player::new(DVec2::new(0.0, 0.0));
        player.velocity = velocity;
        player
    }

    #[test]
    fn test_default_multiplier() {
        assert_eq!(AISystem::new().difficulty_multiplier(), 1.0);
    }

    #[test]
    fn test_adjust_difficulty() {
        let mut ai = AISystem::new();
        ai.adjust_difficulty(5.0, 1);
        assert_eq!(ai.difficulty_multiplier(), 1.0);

        ai.adjust_difficulty(1.0, 1);
        assert_eq!(ai.difficulty_multiplier(), 0.5);

        ai.adjust_difficulty(50.0, 21);
        assert!((ai.difficulty_multiplier() - 4.0).abs() < 1e-12);

        ai.adjust_difficulty(7.5, 11);
        assert!((ai.difficulty_multiplier() - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_close_enemy_always_chases() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ai = AISystem::new();
        ai.adjust_difficulty(10.0, 3);
        let player = moving_player(DVec2::new(5.0, 5.0));
        let enemy = enemy_at(100.0, 100.0);
        for i in 0..200 {
            let behavior = ai.calculate_enemy_behavior(&enemy, &player, i as f64, &mut rng);
            assert_eq!(
                behavior,
                Behavior::Chase {
                    intensity: ai.difficulty_multiplier()
                }
            );
        }
    }

    #[test]
    fn test_far_enemy_patrols_or_ambushes() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut ai = AISystem::new();
        let player = moving_player(DVec2::new(3.0, 0.0));
        let enemy = enemy_at(500.0, 500.0);
        let mut ambushes = 0;
        for i in 0..4000 {
            match ai.calculate_enemy_behavior(&enemy, &player, i as f64, &mut rng) {
                Behavior::Ambush { intensity } => {
                    assert_eq!(intensity, 1.5);
                    ambushes += 1;
                }
                Behavior::Patrol { intensity } => assert_eq!(intensity, 0.5),
                Behavior::Chase { .. } => panic!("far enemy must not chase"),
            }
        }
        // 5% gate over ~4000 eligible calls
        assert!((100..350).contains(&ambushes), "ambushes: {ambushes}");
    }

    #[test]
    fn test_ambush_requires_five_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ai = AISystem::new();
        let player = moving_player(DVec2::new(50.0, 50.0));
        for i in 0..4 {
            ai.record_player_behavior(&player, i as f64);
            for _ in 0..500 {
                assert!(!ai.should_ambush(&mut rng));
            }
        }
        assert!(ai.recent_mean_velocity().is_none());
        ai.record_player_behavior(&player, 4.0);
        assert!(ai.recent_mean_velocity().is_some());
    }

    #[test]
    fn test_slow_player_is_never_ambushed() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut ai = AISystem::new();
        let player = moving_player(DVec2::new(1.0, 1.0));
        for i in 0..10 {
            ai.record_player_behavior(&player, i as f64);
        }
        for _ in 0..2000 {
            assert!(!ai.should_ambush(&mut rng));
        }
    }

    #[test]
    fn test_mean_uses_only_last_five_samples() {
        let mut ai = AISystem::new();
        for i in 0..10 {
            let velocity = if i < 5 {
                DVec2::new(100.0, 0.0)
            } else {
                DVec2::new(1.0, 0.0)
            };
            ai.record_player_behavior(&moving_player(velocity), i as f64);
        }
        assert_eq!(ai.recent_mean_velocity(), Some(DVec2::new(1.0, 0.0)));
    }

    #[test]
    fn test_history_records_once_per_enemy_and_is_capped() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ai = AISystem::new();
        let player = moving_player(DVec2::ZERO);
        let enemies = [enemy_at(10.0, 10.0), enemy_at(400.0, 400.0), enemy_at(900.0, 0.0)];
        for enemy in &enemies {
            ai.calculate_enemy_behavior(enemy, &player, 0.0, &mut rng);
        }
        assert_eq!(ai.history().len(), 3);
        for tick in 0..30 {
            for enemy in &enemies {
                ai.calculate_enemy_behavior(enemy, &player, tick as f64, &mut rng);
            }
        }
        assert_eq!(ai.history().len(), PLAYER_HISTORY_CAPACITY);
    }

    #[test]
    fn test_behavior_accessors() {
        let behavior = Behavior::Ambush { intensity: 2.5 };
        assert_eq!(behavior.kind(), BehaviorKind::Ambush);
        assert_eq!(behavior.intensity(), 2.5);
        assert_eq!(Behavior::Patrol { intensity: 0.1 }.kind(), BehaviorKind::Patrol);
    }
}
