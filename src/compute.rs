/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus the level table and an RNG handle where needed) and
/// returns a brand-new `GameState`.  Side effects are limited to the
/// injected RNG.

use log::info;
use rand::Rng;

use crate::collision::{handle_collisions, CollisionContext, CollisionTally};
use crate::constants::{
    CANVAS_WIDTH, COUNTDOWN_FRAMES, EXTRA_LIFE_COST, GAME_PADDING, HEDGE_DEFENSE_COST, HEDGE_Y,
    PLAYER_SPEED, PLAYER_WIDTH, SHOOT_INTERVAL,
};
use crate::entities::{Bullet, BulletSpawn, GameStatus, HedgeDefense, Player};
use crate::level::{LevelConfig, LevelTable};
use crate::wave::EnemyWave;

// ── State ─────────────────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub wave: EnemyWave,
    pub bullets: Vec<Bullet>,
    pub defenses: Vec<HedgeDefense>,
    pub score: u32,
    /// 1-based level number.
    pub level: u32,
    pub level_config: LevelConfig,
    pub status: GameStatus,
    pub paused: bool,
    /// Frames left before the simulation unfreezes.
    pub countdown: u32,
    /// Frames left before the player may fire again.
    pub shoot_cooldown: u32,
    pub frame: u64,
}

impl GameState {
    /// Accepting movement and fire input right now.
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Playing && !self.paused && self.countdown == 0
    }
}

/// Upgrades that can be bought with score while paused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketItem {
    ExtraLife,
    HedgeDefense,
}

impl MarketItem {
    pub const ALL: [MarketItem; 2] = [MarketItem::ExtraLife, MarketItem::HedgeDefense];

    pub fn cost(self) -> u32 {
        match self {
            MarketItem::ExtraLife => EXTRA_LIFE_COST,
            MarketItem::HedgeDefense => HEDGE_DEFENSE_COST,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketItem::ExtraLife => "Extra life",
            MarketItem::HedgeDefense => "Hedge defense",
        }
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Level 1, populated, waiting for the player to press start.
pub fn init_state(levels: &LevelTable, rng: &mut impl Rng) -> GameState {
    let level_config = levels.resolve(1);
    let wave = EnemyWave::from_config(&level_config, rng);
    GameState {
        player: Player::spawn(),
        wave,
        bullets: Vec::new(),
        defenses: Vec::new(),
        score: 0,
        level: 1,
        level_config,
        status: GameStatus::Waiting,
        paused: false,
        countdown: 0,
        shoot_cooldown: 0,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Leave the start screen and begin the countdown.
pub fn start_game(state: &GameState) -> GameState {
    if state.status != GameStatus::Waiting {
        return state.clone();
    }
    GameState {
        status: GameStatus::Playing,
        countdown: COUNTDOWN_FRAMES,
        ..state.clone()
    }
}

pub fn toggle_pause(state: &GameState) -> GameState {
    if state.status != GameStatus::Playing {
        return state.clone();
    }
    GameState {
        paused: !state.paused,
        ..state.clone()
    }
}

pub fn move_player_left(state: &GameState) -> GameState {
    if !state.is_live() {
        return state.clone();
    }
    let new_x = (state.player.x - PLAYER_SPEED).max(GAME_PADDING);
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    if !state.is_live() {
        return state.clone();
    }
    let new_x = (state.player.x + PLAYER_SPEED).min(CANVAS_WIDTH - PLAYER_WIDTH - GAME_PADDING);
    GameState {
        player: Player {
            x: new_x,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire from the ship's nose, at most once per `SHOOT_INTERVAL` frames.
pub fn player_shoot(state: &GameState) -> GameState {
    if !state.is_live() || state.shoot_cooldown > 0 {
        return state.clone();
    }
    let (x, y) = state.player.shoot_position();
    let mut bullets = state.bullets.clone();
    bullets.push(BulletSpawn::player(x, y).into_bullet());
    GameState {
        bullets,
        shoot_cooldown: SHOOT_INTERVAL,
        ..state.clone()
    }
}

/// Buy an upgrade with score.  Only possible while paused; refused when the
/// score does not cover the price.
pub fn purchase(state: &GameState, item: MarketItem) -> GameState {
    if state.status != GameStatus::Playing || !state.paused || state.score < item.cost() {
        return state.clone();
    }
    let mut next = state.clone();
    next.score -= item.cost();
    match item {
        MarketItem::ExtraLife => next.player.add_life(),
        MarketItem::HedgeDefense => next.defenses.push(HedgeDefense::new(HEDGE_Y)),
    }
    info!("bought {} for {} points", item.label(), item.cost());
    next
}

// ── Per-frame tick (nearly pure: RNG is injected) ───────────────────────────

/// Advance the simulation by one frame.  `timestamp` is a monotonic clock
/// in milliseconds.  All randomness comes through `rng` so callers control
/// determinism (useful for tests with a seeded RNG).
pub fn tick(
    state: &GameState,
    levels: &LevelTable,
    timestamp: f64,
    rng: &mut impl Rng,
) -> GameState {
    if state.status != GameStatus::Playing || state.paused {
        return state.clone();
    }

    let mut next = state.clone();
    next.frame += 1;
    next.shoot_cooldown = next.shoot_cooldown.saturating_sub(1);

    if next.countdown > 0 {
        next.countdown -= 1;
        return next;
    }

    // ── 1. Move bullets ──────────────────────────────────────────────────────
    next.bullets.retain_mut(Bullet::advance);

    // ── 2. Enemy wave ────────────────────────────────────────────────────────
    let (player_x, player_y) = next.player.center();
    let outcome = next.wave.update(player_x, player_y, timestamp, rng);
    if !outcome.keep_running {
        info!("level {} failed: an enemy reached the lose line", next.level);
        next.status = GameStatus::LevelFailed;
        return next;
    }
    next.bullets.extend(
        outcome
            .pending_bullets
            .into_iter()
            .map(BulletSpawn::into_bullet),
    );

    // ── 3. Collisions ────────────────────────────────────────────────────────
    let mut tally = CollisionTally::default();
    handle_collisions(CollisionContext {
        bullets: &mut next.bullets,
        player: &mut next.player,
        wave: &mut next.wave,
        defenses: &mut next.defenses,
        events: &mut tally,
    });
    next.score += tally.score;
    if tally.game_over {
        info!("game over on level {} with score {}", next.level, next.score);
        next.status = GameStatus::GameOver;
        return next;
    }

    // ── 4. Level clear ───────────────────────────────────────────────────────
    // Only the frame that kills the last red counts; a wave that never had
    // reds does not clear.
    if state.wave.has_red_enemies() && !next.wave.has_red_enemies() {
        advance_level(&mut next, levels, rng);
    }

    next
}

fn advance_level(state: &mut GameState, levels: &LevelTable, rng: &mut impl Rng) {
    state.level += 1;
    let config = levels.resolve(state.level);
    state.wave.set_speed(config.speed);
    state.wave.spawn_enemies(&config, rng);
    info!(
        "level {} cleared, starting level {} ({} enemies, speed {:.3})",
        state.level - 1,
        state.level,
        state.wave.len(),
        config.speed
    );
    state.level_config = config;
}
