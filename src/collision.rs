/// Per-frame collision sweep.
///
/// Resolves, in order:
///   1. enemy bullets hitting the player,
///   2. bullets hitting enemies,
///   3. enemies reaching an active hedge line.
///
/// Removal is mark-then-compact: nothing is taken out of a list while it is
/// being walked.  Side effects the driver cares about (score, lives, game
/// over) are reported through `CollisionEvents`.

use crate::constants::SCORE_PER_ENEMY;
use crate::entities::{Bullet, BulletSpawn, HedgeDefense, Player};
use crate::wave::EnemyWave;

/// Callbacks fired while collisions are resolved.
pub trait CollisionEvents {
    /// An enemy was destroyed and `points` should be awarded.
    fn enemy_destroyed(&mut self, points: u32);

    /// The player was hit and lost a life (after the life was removed).
    fn life_lost(&mut self) {}

    /// The player has no lives left.
    fn game_over(&mut self);
}

/// Plain accumulator for the driver and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CollisionTally {
    pub score: u32,
    pub enemies_destroyed: u32,
    pub lives_lost: u32,
    pub game_over: bool,
}

impl CollisionEvents for CollisionTally {
    fn enemy_destroyed(&mut self, points: u32) {
        self.score += points;
        self.enemies_destroyed += 1;
    }

    fn life_lost(&mut self) {
        self.lives_lost += 1;
    }

    fn game_over(&mut self) {
        self.game_over = true;
    }
}

/// Everything one sweep reads or mutates.
pub struct CollisionContext<'a, E: CollisionEvents> {
    pub bullets: &'a mut Vec<Bullet>,
    pub player: &'a mut Player,
    pub wave: &'a mut EnemyWave,
    pub defenses: &'a mut [HedgeDefense],
    pub events: &'a mut E,
}

pub fn handle_collisions<E: CollisionEvents>(ctx: CollisionContext<'_, E>) {
    let CollisionContext {
        bullets,
        player,
        wave,
        defenses,
        events,
    } = ctx;

    let mut spent = vec![false; bullets.len()];
    let mut destroyed = vec![false; wave.len()];
    let mut burst: Vec<BulletSpawn> = Vec::new();

    // ── Bullets ───────────────────────────────────────────────────────────────
    for i in (0..bullets.len()).rev() {
        let bullet = &bullets[i];
        let bullet_box = bullet.bounds();

        if !bullet.is_player_bullet() && bullet_box.intersects(&player.bounds()) {
            player.lose_life();
            events.life_lost();
            spent[i] = true;
            if player.lives > 0 {
                player.reset_position();
            } else {
                events.game_over();
            }
            continue;
        }

        let friendly_fire_proof = !bullet.is_player_bullet() && bullet.special;
        let enemies = wave.enemies_mut();
        for j in (0..enemies.len()).rev() {
            if destroyed[j] || !bullet_box.intersects(&enemies[j].bounds()) {
                continue;
            }
            if friendly_fire_proof {
                continue;
            }
            if enemies[j].take_damage(1, &mut burst) {
                destroyed[j] = true;
                events.enemy_destroyed(SCORE_PER_ENEMY);
            }
            spent[i] = true;
            // One impact per bullet per frame.
            break;
        }
    }

    // ── Hedge lines ───────────────────────────────────────────────────────────
    for (j, enemy) in wave.enemies().iter().enumerate() {
        if destroyed[j] {
            continue;
        }
        let bottom = enemy.bounds().bottom();
        if let Some(hedge) = defenses.iter_mut().find(|h| h.active && bottom >= h.y) {
            hedge.deactivate();
            destroyed[j] = true;
            events.enemy_destroyed(SCORE_PER_ENEMY);
        }
    }

    let _ = wave.remove_marked(&destroyed);
    let mut flags = spent.iter();
    bullets.retain(|_| !flags.next().copied().unwrap_or(false));
    bullets.extend(burst.into_iter().map(BulletSpawn::into_bullet));
}
