/// The live enemy population of a level.
///
/// Owns the enemies plus the formation's drift state (direction and
/// speed).  Each frame the red formation slides sideways, bouncing and
/// dropping at the walls; then every enemy runs its own behaviour.

use log::debug;
use rand::Rng;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DIFFICULTY_SPEED_INCREMENT, ENEMY_DROP_DISTANCE,
    LOSE_CONDITION_Y_OFFSET,
};
use crate::enemy::{Enemy, UpdateContext};
use crate::entities::BulletSpawn;
use crate::formation::generate_formation;
use crate::level::LevelConfig;

/// Outcome of one wave update.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveUpdate {
    /// `false` once an enemy has reached the lose line.
    pub keep_running: bool,
    /// Bullets the enemies asked for this frame.  Empty when the wave stopped.
    pub pending_bullets: Vec<BulletSpawn>,
}

#[derive(Clone, Debug)]
pub struct EnemyWave {
    enemies: Vec<Enemy>,
    /// +1.0 rightward, -1.0 leftward.
    direction: f64,
    speed: f64,
}

impl EnemyWave {
    /// An empty wave drifting rightward at `speed`.
    pub fn new(speed: f64) -> Self {
        Self::with_enemies(speed, Vec::new())
    }

    pub fn with_enemies(speed: f64, enemies: Vec<Enemy>) -> Self {
        Self {
            enemies,
            direction: 1.0,
            speed,
        }
    }

    /// A wave freshly generated from `config`.
    pub fn from_config(config: &LevelConfig, rng: &mut impl Rng) -> Self {
        let mut wave = Self::new(config.speed);
        wave.spawn_enemies(config, rng);
        wave
    }

    /// Append a newly generated formation.  Survivors are kept.
    pub fn spawn_enemies(&mut self, config: &LevelConfig, rng: &mut impl Rng) {
        let fresh = generate_formation(config, rng);
        self.enemies.extend(fresh);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// The level is cleared exactly when this turns false.
    pub fn has_red_enemies(&self) -> bool {
        self.enemies.iter().any(Enemy::in_formation)
    }

    pub fn remove_enemy(&mut self, index: usize) -> Option<Enemy> {
        (index < self.enemies.len()).then(|| self.enemies.remove(index))
    }

    /// Drop every enemy whose slot in `marked` is `true`; returns how many
    /// went.  `marked` must be as long as the enemy list.
    pub fn remove_marked(&mut self, marked: &[bool]) -> usize {
        assert_eq!(
            marked.len(),
            self.enemies.len(),
            "removal mask does not match the enemy list"
        );
        let before = self.enemies.len();
        let mut flags = marked.iter();
        self.enemies.retain(|_| !flags.next().copied().unwrap_or(false));
        before - self.enemies.len()
    }

    /// Advance one frame.
    pub fn update<R: Rng>(
        &mut self,
        player_x: f64,
        player_y: f64,
        timestamp: f64,
        rng: &mut R,
    ) -> WaveUpdate {
        self.advance_formation();

        let mut pending_bullets = Vec::new();
        let mut ctx = UpdateContext {
            player_x,
            player_y,
            timestamp,
            rng,
            spawns: &mut pending_bullets,
        };
        for enemy in &mut self.enemies {
            enemy.update(&mut ctx);
        }

        if self.reached_lose_line() {
            return WaveUpdate {
                keep_running: false,
                pending_bullets: Vec::new(),
            };
        }
        WaveUpdate {
            keep_running: true,
            pending_bullets,
        }
    }

    /// Slide the red formation; on touching a wall, reverse, drop and speed up.
    fn advance_formation(&mut self) {
        let dx = self.speed * self.direction;
        let direction = self.direction;
        let mut hit_edge = false;

        for enemy in self.enemies.iter_mut().filter(|e| e.in_formation()) {
            enemy.move_by(dx, 0.0);
            let b = enemy.bounds();
            if (direction < 0.0 && b.x <= 0.0) || (direction > 0.0 && b.right() >= CANVAS_WIDTH) {
                hit_edge = true;
            }
        }

        if hit_edge {
            self.direction = -self.direction;
            for enemy in self.enemies.iter_mut().filter(|e| e.in_formation()) {
                enemy.move_by(0.0, ENEMY_DROP_DISTANCE);
            }
            self.speed *= DIFFICULTY_SPEED_INCREMENT;
            debug!("formation bounced, speed now {:.4}", self.speed);
        }
    }

    fn reached_lose_line(&self) -> bool {
        let lose_line = CANVAS_HEIGHT - LOSE_CONDITION_Y_OFFSET;
        self.enemies.iter().any(|e| e.bounds().bottom() >= lose_line)
    }
}
