/// Enemy variants and their per-frame behaviour.
///
/// Every enemy is one `Enemy` value tagged with an `EnemyKind`; behaviour is
/// dispatched on the tag.  Randomness and bullet creation go through the
/// `UpdateContext` so callers control both.

use rand::Rng;

use crate::constants::{
    BULLET_SPEED, ENEMY_HEIGHT, ENEMY_SHOOT_CHANCE, ENEMY_WIDTH, KAMIKAZE_TARGETS,
    ORANGE_SHOOT_COOLDOWN_MS, VIOLET_HEALTH_MULTIPLIER, VIOLET_SPACING, YELLOW_ENEMY_SPEED,
};
use crate::entities::{BulletOwner, BulletSpawn, Bounds, EnemyKind};

/// What an enemy may observe and produce during its update.
pub struct UpdateContext<'a, R: Rng> {
    /// Centre of the player ship.
    pub player_x: f64,
    pub player_y: f64,
    /// Monotonic clock in milliseconds, supplied by the driver.
    pub timestamp: f64,
    pub rng: &'a mut R,
    pub spawns: &'a mut Vec<BulletSpawn>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Top-left of the single-unit box.
    pub x: f64,
    pub y: f64,
    pub health: i32,
    /// Timestamp of the last orange shot.
    last_shot: Option<f64>,
}

impl Enemy {
    /// `health` is the level's base health; violet enemies get ten times it.
    pub fn new(kind: EnemyKind, x: f64, y: f64, health: i32) -> Self {
        let health = match kind {
            EnemyKind::Violet => health.saturating_mul(VIOLET_HEALTH_MULTIPLIER),
            _ => health,
        };
        Self {
            kind,
            x,
            y,
            health,
            last_shot: None,
        }
    }

    /// Collision box.  Violet enemies are drawn as three side-by-side units
    /// and are hit across all three.
    pub fn bounds(&self) -> Bounds {
        match self.kind {
            EnemyKind::Violet => Bounds {
                x: self.x - VIOLET_SPACING,
                y: self.y,
                width: ENEMY_WIDTH + 2.0 * VIOLET_SPACING,
                height: ENEMY_HEIGHT,
            },
            _ => Bounds {
                x: self.x,
                y: self.y,
                width: ENEMY_WIDTH,
                height: ENEMY_HEIGHT,
            },
        }
    }

    /// Only red enemies move with the wave formation.
    pub fn in_formation(&self) -> bool {
        self.kind == EnemyKind::Red
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Own behaviour for one frame.  Formation movement is not part of this;
    /// the wave applies it separately.
    pub fn update<R: Rng>(&mut self, ctx: &mut UpdateContext<'_, R>) {
        match self.kind {
            EnemyKind::Yellow => self.y += YELLOW_ENEMY_SPEED,
            EnemyKind::Orange => self.try_fire(ctx),
            EnemyKind::Red | EnemyKind::Violet | EnemyKind::Blue => {}
        }
    }

    /// Subtract `amount` health and report whether the enemy is now dead.
    /// A blue enemy killed this way pushes its kamikaze burst into `spawns`.
    pub fn take_damage(&mut self, amount: i32, spawns: &mut Vec<BulletSpawn>) -> bool {
        self.health -= amount;
        let dead = self.is_dead();
        if dead && self.kind == EnemyKind::Blue {
            self.kamikaze_burst(spawns);
        }
        dead
    }

    fn try_fire<R: Rng>(&mut self, ctx: &mut UpdateContext<'_, R>) {
        let cooled_down = self
            .last_shot
            .map_or(true, |last| ctx.timestamp - last >= ORANGE_SHOOT_COOLDOWN_MS);
        if !cooled_down || !ctx.rng.gen_bool(ENEMY_SHOOT_CHANCE) {
            return;
        }

        let origin_x = self.x + ENEMY_WIDTH / 2.0;
        let origin_y = self.y + ENEMY_HEIGHT;
        let (vx, vy) = aim(origin_x, origin_y, ctx.player_x, ctx.player_y)
            .unwrap_or((0.0, BULLET_SPEED));
        ctx.spawns.push(BulletSpawn {
            x: origin_x,
            y: origin_y,
            owner: BulletOwner::Enemy,
            velocity: Some((vx, vy)),
            special: true,
        });
        self.last_shot = Some(ctx.timestamp);
    }

    fn kamikaze_burst(&self, spawns: &mut Vec<BulletSpawn>) {
        let (cx, cy) = self.bounds().center();
        for (tx, ty) in KAMIKAZE_TARGETS {
            if let Some((vx, vy)) = aim(cx, cy, tx, ty) {
                spawns.push(BulletSpawn::enemy(cx, cy, vx, vy));
            }
        }
    }
}

/// Velocity of length `BULLET_SPEED` pointing from one point to another,
/// or `None` when the points coincide.
fn aim(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> Option<(f64, f64)> {
    let dx = to_x - from_x;
    let dy = to_y - from_y;
    let dist = dx.hypot(dy);
    (dist > 0.0).then(|| (dx / dist * BULLET_SPEED, dy / dist * BULLET_SPEED))
}
