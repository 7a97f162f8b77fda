use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ai::AISystem;
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::events::{Event, FrameEvent, InputState, RunMode};
use crate::level::{Obstacle, PowerUp, PowerUpKind, ProceduralGenerator};
use crate::player::Player;
use crate::world::{GamePhase, GameSnapshot, Session};

const CONTACT_DAMAGE: f64 = 20.0;
const SANITY_LOSS_PER_DAMAGE: f64 = 0.5;
const DAMAGE_FLASH_MS: f64 = 500.0;
const HEALTH_PICKUP: f64 = 25.0;
const SANITY_PICKUP: f64 = 30.0;
const SCORE_PICKUP: u64 = 100;
const SANITY_DECAY_PER_MS: f64 = 0.005;
const HALLUCINATION_SANITY: f64 = 20.0;
const HALLUCINATION_CHANCE: f64 = 0.0001;
const LEVEL_BONUS: u64 = 1000;
const LEVEL_HEAL: f64 = 10.0;
const LEVEL_SANITY_RESTORE: f64 = 5.0;
const FINAL_LEVEL: u32 = 500;

/// Frame-driven game loop: owns the generator, the AI and the entities of the
/// current level, and advances them one tick at a time.
pub struct GameEngine<R = StdRng> {
    config: GameConfig,
    generator: ProceduralGenerator,
    ai: AISystem,
    session: Session,
    player: Option<Player>,
    enemies: Vec<Enemy>,
    obstacles: Vec<Obstacle>,
    power_ups: Vec<PowerUp>,
    input: InputState,
    damaged_until_ms: f64,
    frame_events: Vec<FrameEvent>,
    rng: R,
}

impl Default for GameEngine<StdRng> {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameEngine<StdRng> {
    /// Engine backed by an OS-seeded ambient random source.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        let seed = rng.random_range(0.0..1_000_000.0);
        Self {
            config,
            generator: ProceduralGenerator::with_seed(seed, config.viewport),
            ai: AISystem::new(),
            session: Session::new(),
            player: None,
            enemies: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            input: InputState::default(),
            damaged_until_ms: 0.0,
            frame_events: Vec::new(),
            rng,
        }
    }

    /// Apply event.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Start { speedrun } => self.start(RunMode::from_speedrun(speedrun)),
            Event::Restart => self.start(self.session.mode()),
            Event::Pause => self.pause(),
            Event::Resume => self.resume(),
            Event::Input(input) => self.input = input,
            Event::Tick { dt_ms } => self.tick(dt_ms),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn ai(&self) -> &AISystem {
        &self.ai
    }

    pub fn generator(&self) -> &ProceduralGenerator {
        &self.generator
    }

    /// Events produced since the previous drain.
    pub fn drain_frame_events(&mut self) -> Vec<FrameEvent> {
        std::mem::take(&mut self.frame_events)
    }

    /// Retrieves the current game state snapshot.
    pub fn get_snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(
            &self.session,
            self.ai.difficulty_multiplier(),
            self.player.as_ref(),
            self.session.game_time_ms() < self.damaged_until_ms,
            &self.enemies,
            &self.obstacles,
            &self.power_ups,
        )
    }

    fn start(&mut self, mode: RunMode) {
        self.session = Session::start(mode);
        self.player = Some(Player::new(self.config.viewport.center()));
        self.ai = AISystem::new();
        self.input = InputState::default();
        self.damaged_until_ms = 0.0;
        self.frame_events.clear();
        tracing::info!(?mode, seed = self.generator.seed(), "run started");
        self.generate_level();
    }

    fn generate_level(&mut self) {
        let level = self.session.level();
        let descriptor = self.generator.generate_level(level, &mut self.rng);
        self.enemies = descriptor.enemies;
        self.obstacles = descriptor.obstacles;
        self.power_ups = descriptor.power_ups;

        let skill = self.player.as_ref().map_or(1.0, Player::skill_level);
        self.ai.adjust_difficulty(skill, level);
    }

    fn pause(&mut self) {
        if self.session.is_playing() {
            self.session.set_phase(GamePhase::Menu);
            tracing::debug!(level = self.session.level(), "run paused");
        }
    }

    fn resume(&mut self) {
        if self.session.phase() == GamePhase::Menu && self.player.is_some() {
            self.session.set_phase(GamePhase::Playing);
            tracing::debug!(level = self.session.level(), "run resumed");
        }
    }

    fn tick(&mut self, dt_ms: f64) {
        if !self.session.is_playing() {
            return;
        }
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.session.advance_time(dt_ms);
        let now = self.session.game_time_ms();
        let viewport = self.config.viewport;

        if let Some(player) = self.player.as_mut() {
            player.update(&self.input, &viewport);
        }
        self.check_player_collisions(now);
        if !self.session.is_playing() {
            return;
        }

        let player = self.player.as_ref();
        for enemy in &mut self.enemies {
            if enemy.update(player, &mut self.ai, now, &mut self.rng).is_some() {
                enemy.advance(&viewport);
            }
        }
        self.enemies.retain(|enemy| !enemy.is_expired(now));

        self.update_sanity(dt_ms, now);
        self.check_game_conditions();
    }

    fn check_player_collisions(&mut self, now: f64) {
        let Some(player) = self.player.as_ref() else {
            return;
        };

        let mut hits = 0;
        self.enemies.retain(|enemy| {
            let touching = circles_touch(player.position, player.radius, enemy.position, enemy.radius);
            if touching && !enemy.is_hallucination() {
                hits += 1;
            }
            !touching
        });

        let mut collected = Vec::new();
        self.power_ups.retain(|power_up| {
            let touching =
                circles_touch(player.position, player.radius, power_up.position, power_up.radius);
            if touching {
                collected.push(power_up.kind);
            }
            !touching
        });

        for _ in 0..hits {
            self.take_damage(CONTACT_DAMAGE, now);
        }
        for kind in collected {
            self.collect_power_up(kind);
        }
    }

    fn take_damage(&mut self, amount: f64, now: f64) {
        self.session.set_health(self.session.health() - amount);
        self.session
            .set_sanity(self.session.sanity() - amount * SANITY_LOSS_PER_DAMAGE);
        self.damaged_until_ms = now + DAMAGE_FLASH_MS;
        self.frame_events
            .push(FrameEvent::PlayerDamaged { damage: amount });
        if self.session.health() <= 0.0 {
            self.game_over();
        }
    }

    fn collect_power_up(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Health => self
                .session
                .set_health(self.session.health() + HEALTH_PICKUP),
            PowerUpKind::Sanity => self
                .session
                .set_sanity(self.session.sanity() + SANITY_PICKUP),
            PowerUpKind::Score => self.session.add_score(SCORE_PICKUP),
        }
        self.frame_events.push(FrameEvent::PowerUpCollected { kind });
    }

    fn update_sanity(&mut self, dt_ms: f64, now: f64) {
        self.session
            .set_sanity(self.session.sanity() - dt_ms * SANITY_DECAY_PER_MS);
        if self.session.sanity() < HALLUCINATION_SANITY
            && self.rng.random::<f64>() < HALLUCINATION_CHANCE
        {
            self.spawn_hallucination(now);
        }
    }

    fn spawn_hallucination(&mut self, now: f64) {
        let viewport = self.config.viewport;
        let position = DVec2::new(
            self.rng.random::<f64>() * viewport.width,
            self.rng.random::<f64>() * viewport.height,
        );
        tracing::debug!(x = position.x, y = position.y, "hallucination spawned");
        self.enemies
            .push(Enemy::hallucination(position, now, &mut self.rng));
        self.frame_events.push(FrameEvent::HallucinationSpawned);
    }

    fn check_game_conditions(&mut self) {
        let real_enemies = self
            .enemies
            .iter()
            .filter(|enemy| !enemy.is_hallucination())
            .count();
        if real_enemies == 0 && self.session.level() < FINAL_LEVEL {
            self.next_level();
        }

        if self.session.health() <= 0.0 || self.session.sanity() <= 0.0 {
            self.game_over();
        }
    }

    fn next_level(&mut self) {
        let level = self.session.level() + 1;
        self.session.set_level(level);
        self.session.add_score(LEVEL_BONUS * u64::from(level));
        self.session
            .set_health(self.session.health() + LEVEL_HEAL);
        self.session
            .set_sanity(self.session.sanity() + LEVEL_SANITY_RESTORE);
        self.frame_events
            .push(FrameEvent::LevelCompleted { new_level: level });
        tracing::info!(level, score = self.session.score(), "level completed");
        self.generate_level();
    }

    fn game_over(&mut self) {
        if self.session.phase() == GamePhase::GameOver {
            return;
        }
        self.session.set_phase(GamePhase::GameOver);
        let event = FrameEvent::GameOver {
            score: self.session.score(),
            level: self.session.level(),
            time_ms: self.session.game_time_ms(),
            mode: self.session.mode(),
        };
        tracing::info!(
            score = self.session.score(),
            level = self.session.level(),
            "game over"
        );
        self.frame_events.push(event);
    }
}

fn circles_touch(a: DVec2, radius_a: f64, b: DVec2, radius_b: f64) -> bool {
    a.distance(b) < radius_a + radius_b
}
