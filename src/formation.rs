/// Turns a resolved `LevelConfig` into concrete enemies.
///
/// Red enemies fill the grid formation row by row.  Every other type is
/// scattered across the canvas with best-effort spacing: a candidate spot
/// is re-rolled while it crowds an already-placed enemy, and after the
/// attempt budget runs out the last roll is taken as is.

use log::debug;
use rand::Rng;

use crate::constants::{
    BLUE_ENEMY_Y, CANVAS_HEIGHT, CANVAS_WIDTH, ENEMY_HEIGHT, ENEMY_SPACING_X, ENEMY_SPACING_Y,
    ENEMY_WAVE_START_X, ENEMY_WAVE_START_Y, ENEMY_WIDTH, GAME_PADDING, PLACEMENT_ATTEMPTS,
    PLACEMENT_SPACING_FACTOR,
};
use crate::enemy::Enemy;
use crate::entities::EnemyKind;
use crate::level::{EnemyTypeMix, LevelConfig};

/// Absorbs float noise so that 100% of `n` is exactly `n`.
const CEIL_TOLERANCE: f64 = 1e-9;

/// Generate the enemies for one level.  Order of the result is not significant.
pub fn generate_formation(config: &LevelConfig, rng: &mut impl Rng) -> Vec<Enemy> {
    let health = i32::try_from(config.enemy_health).unwrap_or(i32::MAX);
    let mut enemies = Vec::new();

    match config.enemy_types.as_ref().filter(|mix| !mix.is_empty()) {
        None => enemies.extend(red_formation(config, config.enemy_count, health)),
        Some(mix) => {
            for (kind, count) in allocate_type_counts(config.enemy_count, mix) {
                match kind {
                    EnemyKind::Red => enemies.extend(red_formation(config, count, health)),
                    EnemyKind::Yellow | EnemyKind::Orange => {
                        scatter(&mut enemies, kind, count, 0.0, health, rng)
                    }
                    EnemyKind::Violet => {
                        let middle_y = CANVAS_HEIGHT * 0.5 - ENEMY_HEIGHT * 0.5;
                        scatter(&mut enemies, kind, count, middle_y, health, rng)
                    }
                    EnemyKind::Blue => scatter(&mut enemies, kind, count, BLUE_ENEMY_Y, health, rng),
                }
            }
        }
    }

    debug!(
        "generated formation: {} enemies ({} rows x {} cols, health {})",
        enemies.len(),
        config.rows,
        config.cols,
        config.enemy_health
    );
    enemies
}

/// Split `enemy_count` by type.  Each type in priority order gets
/// `ceil(count * cumulative% / 100)` minus what earlier types already took,
/// so the running total never exceeds the cumulative target.  Types absent
/// from `mix` are skipped.  Shares are clamped to `0..=100` and the total
/// never exceeds `enemy_count`, even when the shares add up past 100.
pub fn allocate_type_counts(enemy_count: u32, mix: &EnemyTypeMix) -> Vec<(EnemyKind, u32)> {
    let mut counts = Vec::new();
    let mut allocated: u32 = 0;
    let mut cumulative_pct = 0.0;

    for kind in EnemyKind::FORMATION_ORDER {
        let Some(&pct) = mix.get(&kind) else {
            continue;
        };
        let pct = if pct.is_nan() { 0.0 } else { pct.clamp(0.0, 100.0) };
        cumulative_pct += pct;
        let target = (f64::from(enemy_count) * cumulative_pct / 100.0 - CEIL_TOLERANCE).ceil();
        let wanted = (target - f64::from(allocated)).max(0.0) as u32;
        let count = wanted.min(enemy_count.saturating_sub(allocated));
        allocated = allocated.saturating_add(count);
        counts.push((kind, count));
    }
    counts
}

/// Red enemies on the `rows x cols` grid, filled row-major from the top-left
/// and truncated to `count`.
fn red_formation(config: &LevelConfig, count: u32, health: i32) -> Vec<Enemy> {
    let cols = config.cols;
    (0..config.rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .take(count as usize)
        .map(|(row, col)| {
            let x = ENEMY_WAVE_START_X + f64::from(col) * ENEMY_SPACING_X;
            let y = ENEMY_WAVE_START_Y + f64::from(row) * ENEMY_SPACING_Y;
            Enemy::new(EnemyKind::Red, x, y, health)
        })
        .collect()
}

fn scatter(
    placed: &mut Vec<Enemy>,
    kind: EnemyKind,
    count: u32,
    y: f64,
    health: i32,
    rng: &mut impl Rng,
) {
    for _ in 0..count {
        let mut candidate = Enemy::new(kind, random_x(rng), y, health);
        for _ in 1..PLACEMENT_ATTEMPTS {
            if has_room(&candidate, placed) {
                break;
            }
            candidate.x = random_x(rng);
        }
        placed.push(candidate);
    }
}

fn random_x(rng: &mut impl Rng) -> f64 {
    let span = CANVAS_WIDTH - 2.0 * GAME_PADDING - ENEMY_WIDTH;
    GAME_PADDING + rng.gen::<f64>() * span
}

fn has_room(candidate: &Enemy, placed: &[Enemy]) -> bool {
    let min_distance = PLACEMENT_SPACING_FACTOR * ENEMY_WIDTH;
    let (cx, cy) = candidate.bounds().center();
    placed.iter().all(|other| {
        let (ox, oy) = other.bounds().center();
        (cx - ox).hypot(cy - oy) >= min_distance
    })
}
