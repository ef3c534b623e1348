//! Level table loading and per-level configuration resolution.
//!
//! The table is sparse: most level numbers have no entry.  An entry is
//! either a *baseline* (absolute values only) or carries `+`-prefixed
//! *increments*, which grow linearly with the distance from the last
//! baseline entry.  Resolution is a pure function of the table and the
//! target level and never fails; it falls back to built-in defaults for
//! anything the table does not say.
//!
//! ```json
//! {
//!   "1": { "rows": 5, "cols": 6, "speed": 1.0, "enemyCount": 30, "enemyHealth": 1 },
//!   "2": { "rows": 6, "cols": 8 },
//!   "3": { "+speed": 0.5, "+enemyHealth": 1 }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::EnemyKind;

/// Percentage of a level's enemies per type.  Percentages need not sum to 100.
pub type EnemyTypeMix = BTreeMap<EnemyKind, f64>;

const DEFAULT_ROWS: u32 = 5;
const DEFAULT_COLS: u32 = 6;
const DEFAULT_SPEED: f64 = 1.0;
const DEFAULT_ENEMY_COUNT: u32 = 30;
const DEFAULT_ENEMY_HEALTH: u32 = 1;

const BUNDLED_LEVELS: &str = include_str!("../assets/levels.json");

// ── Resolved configuration ───────────────────────────────────────────────────

/// Fully-populated configuration for one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub rows: u32,
    pub cols: u32,
    pub speed: f64,
    pub enemy_count: u32,
    pub enemy_health: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_types: Option<EnemyTypeMix>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            speed: DEFAULT_SPEED,
            enemy_count: DEFAULT_ENEMY_COUNT,
            enemy_health: DEFAULT_ENEMY_HEALTH,
            enemy_types: None,
        }
    }
}

// ── Raw table entries ────────────────────────────────────────────────────────

/// Numeric fields a level entry may set or grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LevelField {
    Rows,
    Cols,
    Speed,
    EnemyCount,
    EnemyHealth,
}

impl LevelField {
    pub fn key(self) -> &'static str {
        match self {
            LevelField::Rows => "rows",
            LevelField::Cols => "cols",
            LevelField::Speed => "speed",
            LevelField::EnemyCount => "enemyCount",
            LevelField::EnemyHealth => "enemyHealth",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        [
            LevelField::Rows,
            LevelField::Cols,
            LevelField::Speed,
            LevelField::EnemyCount,
            LevelField::EnemyHealth,
        ]
        .into_iter()
        .find(|field| field.key() == key)
    }
}

/// One sparse entry of the level table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawLevelEntry {
    absolute: BTreeMap<LevelField, f64>,
    increments: BTreeMap<LevelField, f64>,
    enemy_types: Option<EnemyTypeMix>,
}

impl RawLevelEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute value.
    pub fn with(mut self, field: LevelField, value: f64) -> Self {
        let _ = self.absolute.insert(field, value);
        self
    }

    /// Set a per-level increment (the `+field` form).
    pub fn with_increment(mut self, field: LevelField, per_level: f64) -> Self {
        let _ = self.increments.insert(field, per_level);
        self
    }

    /// Replace the inherited type mix.
    pub fn with_enemy_types(mut self, mix: EnemyTypeMix) -> Self {
        self.enemy_types = Some(mix);
        self
    }

    /// A baseline entry carries no increments.
    pub fn is_baseline(&self) -> bool {
        self.increments.is_empty()
    }

    /// Lenient conversion from a JSON object; anything unusable is logged
    /// and skipped.
    fn from_json(level: u32, fields: &Map<String, Value>) -> Self {
        let mut entry = Self::new();
        for (key, value) in fields {
            if key == "enemyTypes" {
                entry.enemy_types = parse_enemy_types(level, value);
                continue;
            }
            let (name, increment) = match key.strip_prefix('+') {
                Some(name) => (name, true),
                None => (key.as_str(), false),
            };
            let Some(field) = LevelField::from_key(name) else {
                warn!("level {level}: ignoring unknown field {key:?}");
                continue;
            };
            let Some(number) = value.as_f64() else {
                warn!("level {level}: ignoring non-numeric {key:?} = {value}");
                continue;
            };
            let target = if increment {
                &mut entry.increments
            } else {
                &mut entry.absolute
            };
            let _ = target.insert(field, number);
        }
        entry
    }
}

fn parse_enemy_types(level: u32, value: &Value) -> Option<EnemyTypeMix> {
    let Some(object) = value.as_object() else {
        warn!("level {level}: enemyTypes is not an object, ignoring");
        return None;
    };
    let mut mix = EnemyTypeMix::new();
    for (tag, pct) in object {
        match (EnemyKind::from_tag(tag), pct.as_f64()) {
            (Some(kind), Some(pct)) if (0.0..=100.0).contains(&pct) => {
                let _ = mix.insert(kind, pct);
            }
            (Some(kind), Some(pct)) if pct.is_finite() => {
                let clamped = pct.clamp(0.0, 100.0);
                warn!("level {level}: {tag} share {pct} is outside 0..=100, using {clamped}");
                let _ = mix.insert(kind, clamped);
            }
            _ => warn!("level {level}: ignoring enemy type {tag:?} = {pct}"),
        }
    }
    Some(mix)
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failure to load a level table.  Resolution itself cannot fail.
#[derive(thiserror::Error, Debug)]
pub enum LevelTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level table must be a JSON object keyed by level number")]
    NotAnObject,
}

// ── Table & resolution ───────────────────────────────────────────────────────

/// The static level table.  Read-only once loaded.
#[derive(Clone, Debug, Default)]
pub struct LevelTable {
    entries: BTreeMap<u32, RawLevelEntry>,
}

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `level`.  Level 0 is not a valid key
    /// and is ignored.
    pub fn insert(&mut self, level: u32, entry: RawLevelEntry) {
        if level == 0 {
            warn!("ignoring level-table entry for level 0");
            return;
        }
        let _ = self.entries.insert(level, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, LevelTableError> {
        let root: Value = serde_json::from_str(json)?;
        let Value::Object(levels) = root else {
            return Err(LevelTableError::NotAnObject);
        };

        let mut table = Self::new();
        for (key, value) in &levels {
            let level = match key.trim().parse::<u32>() {
                Ok(level) if level > 0 => level,
                _ => {
                    warn!("ignoring level-table key {key:?}: not a positive level number");
                    continue;
                }
            };
            match value.as_object() {
                Some(fields) => table.insert(level, RawLevelEntry::from_json(level, fields)),
                None => warn!("ignoring level {level}: entry is not an object"),
            }
        }
        debug!("loaded level table with {} entries", table.len());
        Ok(table)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelTableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The table shipped with the game.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED_LEVELS).unwrap_or_else(|e| {
            error!("bundled level table is invalid ({e}); using defaults");
            Self::new()
        })
    }

    /// Configuration for `target_level`.  Levels past the last entry keep
    /// growing by that entry's rule.
    pub fn resolve(&self, target_level: u32) -> LevelConfig {
        self.resolve_effective(target_level).finish()
    }

    fn resolve_effective(&self, target_level: u32) -> Effective {
        let Some((&defined, entry)) = self.entries.range(..=target_level).next_back() else {
            return Effective::defaults();
        };
        if entry.is_baseline() {
            return self.accumulate_baselines(defined);
        }

        let baseline = self
            .entries
            .range(..defined)
            .rev()
            .find(|(_, e)| e.is_baseline())
            .map(|(&level, _)| level);
        let mut effective = match baseline {
            Some(level) => self.accumulate_baselines(level),
            None => Effective::defaults(),
        };
        effective.apply_absolute(entry);

        // Deltas always count from the last baseline, not from the entry.
        let distance = f64::from(target_level - baseline.unwrap_or(0));
        for (&field, &per_level) in &entry.increments {
            let grown = effective.get(field) + per_level * distance;
            let grown = match field {
                LevelField::EnemyHealth => grown.floor(),
                _ => grown,
            };
            effective.set(field, grown);
        }
        effective
    }

    /// Overlay every baseline entry in `1..=level`, in order, onto the defaults.
    fn accumulate_baselines(&self, level: u32) -> Effective {
        let mut effective = Effective::defaults();
        for entry in self.entries.range(..=level).map(|(_, e)| e) {
            if entry.is_baseline() {
                effective.apply_absolute(entry);
            }
        }
        effective
    }
}

/// Unrounded working copy of a configuration during resolution.
#[derive(Clone, Debug)]
struct Effective {
    rows: f64,
    cols: f64,
    speed: f64,
    enemy_count: f64,
    enemy_health: f64,
    enemy_types: Option<EnemyTypeMix>,
}

impl Effective {
    fn defaults() -> Self {
        Self {
            rows: f64::from(DEFAULT_ROWS),
            cols: f64::from(DEFAULT_COLS),
            speed: DEFAULT_SPEED,
            enemy_count: f64::from(DEFAULT_ENEMY_COUNT),
            enemy_health: f64::from(DEFAULT_ENEMY_HEALTH),
            enemy_types: None,
        }
    }

    fn get(&self, field: LevelField) -> f64 {
        match field {
            LevelField::Rows => self.rows,
            LevelField::Cols => self.cols,
            LevelField::Speed => self.speed,
            LevelField::EnemyCount => self.enemy_count,
            LevelField::EnemyHealth => self.enemy_health,
        }
    }

    fn set(&mut self, field: LevelField, value: f64) {
        match field {
            LevelField::Rows => self.rows = value,
            LevelField::Cols => self.cols = value,
            LevelField::Speed => self.speed = value,
            LevelField::EnemyCount => self.enemy_count = value,
            LevelField::EnemyHealth => self.enemy_health = value,
        }
    }

    fn apply_absolute(&mut self, entry: &RawLevelEntry) {
        for (&field, &value) in &entry.absolute {
            self.set(field, value);
        }
        if let Some(mix) = &entry.enemy_types {
            self.enemy_types = Some(mix.clone());
        }
    }

    fn finish(self) -> LevelConfig {
        let speed = if self.speed.is_finite() && self.speed > 0.0 {
            self.speed
        } else {
            warn!("resolved speed {} is unusable, using default", self.speed);
            DEFAULT_SPEED
        };
        LevelConfig {
            rows: whole(self.rows, 1),
            cols: whole(self.cols, 1),
            speed,
            enemy_count: whole(self.enemy_count, 0),
            enemy_health: whole(self.enemy_health, 1),
            enemy_types: self.enemy_types,
        }
    }
}

/// Floor to an integer no smaller than `min`.  NaN maps to `min`.
fn whole(value: f64, min: u32) -> u32 {
    if value.is_nan() {
        return min;
    }
    // `as` saturates at the u32 range.
    (value.floor() as u32).max(min)
}
