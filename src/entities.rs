/// Game entity types shared by the simulation and the renderer.
///
/// These are mostly plain data; the only behaviour here is geometry
/// (bounding boxes) and the trivial bookkeeping each entity owns.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BULLET_HEIGHT, BULLET_SPEED, BULLET_WIDTH, CANVAS_HEIGHT, CANVAS_WIDTH, PLAYER_HEIGHT,
    PLAYER_START_Y_OFFSET, PLAYER_WIDTH, STARTING_LIVES,
};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap: boxes that merely share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ── Enemy tags ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Formation unit; moves with the wave and gates level completion.
    Red,
    /// Drifts straight down.
    Yellow,
    /// Fires aimed, friendly-fire-proof shots at the player.
    Orange,
    /// Static, ten times the health, three units wide.
    Violet,
    /// Inert until killed, then bursts three bullets.
    Blue,
}

impl EnemyKind {
    /// Allocation order used when splitting a level's enemy count by type.
    pub const FORMATION_ORDER: [EnemyKind; 5] = [
        EnemyKind::Red,
        EnemyKind::Yellow,
        EnemyKind::Orange,
        EnemyKind::Violet,
        EnemyKind::Blue,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            EnemyKind::Red => "red",
            EnemyKind::Yellow => "yellow",
            EnemyKind::Orange => "orange",
            EnemyKind::Violet => "violet",
            EnemyKind::Blue => "blue",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::FORMATION_ORDER.into_iter().find(|kind| kind.tag() == tag)
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub owner: BulletOwner,
    /// Special enemy bullets pass through other enemies unharmed.
    pub special: bool,
}

impl Bullet {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
        }
    }

    pub fn is_player_bullet(&self) -> bool {
        self.owner == BulletOwner::Player
    }

    /// Move one frame along the velocity.  Returns `false` once the bullet
    /// is entirely outside the canvas and should be dropped.
    pub fn advance(&mut self) -> bool {
        self.x += self.vx;
        self.y += self.vy;
        let b = self.bounds();
        b.bottom() > 0.0 && b.y < CANVAS_HEIGHT && b.right() > 0.0 && b.x < CANVAS_WIDTH
    }
}

/// A request to create a bullet.  Enemies emit these during their update;
/// the driver turns them into live bullets.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletSpawn {
    pub x: f64,
    pub y: f64,
    pub owner: BulletOwner,
    /// `None` means "straight along the owner's default direction".
    pub velocity: Option<(f64, f64)>,
    pub special: bool,
}

impl BulletSpawn {
    pub fn player(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            owner: BulletOwner::Player,
            velocity: None,
            special: false,
        }
    }

    pub fn enemy(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self {
            x,
            y,
            owner: BulletOwner::Enemy,
            velocity: Some((vx, vy)),
            special: false,
        }
    }

    /// Player bullets default to travelling up, enemy bullets down.  The
    /// bullet is centred horizontally on the spawn point.
    pub fn into_bullet(self) -> Bullet {
        let (vx, vy) = self.velocity.unwrap_or(match self.owner {
            BulletOwner::Player => (0.0, -BULLET_SPEED),
            BulletOwner::Enemy => (0.0, BULLET_SPEED),
        });
        Bullet {
            x: self.x - BULLET_WIDTH / 2.0,
            y: self.y,
            vx,
            vy,
            owner: self.owner,
            special: self.special,
        }
    }
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub lives: u32,
}

impl Player {
    /// Horizontally centred, near the bottom, with a full set of lives.
    pub fn spawn() -> Self {
        Self {
            x: Self::spawn_x(),
            y: CANVAS_HEIGHT - PLAYER_START_Y_OFFSET,
            lives: STARTING_LIVES,
        }
    }

    fn spawn_x() -> f64 {
        CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            x: self.x,
            y: self.y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        self.bounds().center()
    }

    /// Nose of the ship, where player bullets originate.
    pub fn shoot_position(&self) -> (f64, f64) {
        (self.x + PLAYER_WIDTH / 2.0, self.y)
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    pub fn reset_position(&mut self) {
        self.x = Self::spawn_x();
    }
}

// ── Defenses ──────────────────────────────────────────────────────────────────

/// A one-shot barrier line.  Absorbs the first enemy that reaches it, then
/// stays in the collection inactive.
#[derive(Clone, Debug, PartialEq)]
pub struct HedgeDefense {
    pub y: f64,
    pub active: bool,
}

impl HedgeDefense {
    pub fn new(y: f64) -> Self {
        Self { y, active: true }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

// ── Game status ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Waiting for the player to press start.
    Waiting,
    Playing,
    /// An enemy reached the lose line.
    LevelFailed,
    /// The player ran out of lives.
    GameOver,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::LevelFailed | GameStatus::GameOver)
    }
}
