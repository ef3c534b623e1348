/// Playfield geometry and tuning values.
///
/// Everything is expressed in canvas units: origin at the top-left corner,
/// `x` grows rightward, `y` grows downward.  The renderer scales canvas
/// units onto terminal cells; the simulation never sees cells.

// ── Playfield ─────────────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: f64 = 1000.0;
pub const CANVAS_HEIGHT: f64 = 800.0;
pub const GAME_PADDING: f64 = 20.0;

/// Any enemy whose bottom edge reaches `CANVAS_HEIGHT - LOSE_CONDITION_Y_OFFSET`
/// fails the level.
pub const LOSE_CONDITION_Y_OFFSET: f64 = 100.0;

pub const SCORE_PER_ENEMY: u32 = 10;

/// Simulation rate the tuning values assume.
pub const TICKS_PER_SECOND: u32 = 60;

/// Frames of frozen simulation between pressing start and the first tick.
pub const COUNTDOWN_FRAMES: u32 = 3 * TICKS_PER_SECOND;

// ── Formation ─────────────────────────────────────────────────────────────────

pub const ENEMY_WAVE_START_X: f64 = 50.0;
pub const ENEMY_WAVE_START_Y: f64 = 50.0;
pub const ENEMY_SPACING_X: f64 = 60.0;
pub const ENEMY_SPACING_Y: f64 = 50.0;
pub const ENEMY_DROP_DISTANCE: f64 = 20.0;

/// Formation speed multiplier applied on every wall bounce.
pub const DIFFICULTY_SPEED_INCREMENT: f64 = 1.001;

/// Rejection-sampling budget for scattered (non-formation) enemies.
pub const PLACEMENT_ATTEMPTS: u32 = 50;
/// Minimum centre-to-centre distance, as a multiple of `ENEMY_WIDTH`.
pub const PLACEMENT_SPACING_FACTOR: f64 = 1.5;

/// Row where kamikaze enemies are scattered.
pub const BLUE_ENEMY_Y: f64 = CANVAS_HEIGHT * 0.25;

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_WIDTH: f64 = 30.0;
pub const ENEMY_HEIGHT: f64 = 20.0;

pub const YELLOW_ENEMY_SPEED: f64 = 0.5;

/// Per-tick probability that an off-cooldown orange enemy fires.
pub const ENEMY_SHOOT_CHANCE: f64 = 0.005;
pub const ORANGE_SHOOT_COOLDOWN_MS: f64 = 1000.0;

pub const VIOLET_HEALTH_MULTIPLIER: i32 = 10;
/// Horizontal offset between the three drawn violet sub-units.
pub const VIOLET_SPACING: f64 = 12.0;

/// Kamikaze burst targets: the HUD, then the bottom-left and bottom-right corners.
pub const KAMIKAZE_TARGETS: [(f64, f64); 3] = [
    (CANVAS_WIDTH / 2.0, 30.0),
    (GAME_PADDING, CANVAS_HEIGHT - GAME_PADDING),
    (CANVAS_WIDTH - GAME_PADDING, CANVAS_HEIGHT - GAME_PADDING),
];

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f64 = 40.0;
pub const PLAYER_HEIGHT: f64 = 30.0;
pub const PLAYER_SPEED: f64 = 5.0;
pub const PLAYER_START_Y_OFFSET: f64 = 50.0;
pub const STARTING_LIVES: u32 = 3;

/// Min frames between player shots.
pub const SHOOT_INTERVAL: u32 = 10;

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const BULLET_WIDTH: f64 = 5.0;
pub const BULLET_HEIGHT: f64 = 15.0;
pub const BULLET_SPEED: f64 = 7.0;

// ── Defenses & market ─────────────────────────────────────────────────────────

/// Hedge lines sit just above the lose line so they absorb first.
pub const HEDGE_Y: f64 = CANVAS_HEIGHT - LOSE_CONDITION_Y_OFFSET - 20.0;

pub const EXTRA_LIFE_COST: u32 = 100;
pub const HEDGE_DEFENSE_COST: u32 = 50;
