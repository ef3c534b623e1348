use std::collections::BTreeMap;

use wave_shooter::entities::EnemyKind;
use wave_shooter::level::*;

fn full_baseline() -> RawLevelEntry {
    RawLevelEntry::new()
        .with(LevelField::Rows, 5.0)
        .with(LevelField::Cols, 6.0)
        .with(LevelField::Speed, 1.0)
        .with(LevelField::EnemyCount, 30.0)
        .with(LevelField::EnemyHealth, 1.0)
}

fn table(entries: Vec<(u32, RawLevelEntry)>) -> LevelTable {
    let mut table = LevelTable::new();
    for (level, entry) in entries {
        table.insert(level, entry);
    }
    table
}

fn mix(pairs: &[(EnemyKind, f64)]) -> EnemyTypeMix {
    pairs.iter().copied().collect::<BTreeMap<_, _>>()
}

// ── Defaults ──────────────────────────────────────────────────────────────────

#[test]
fn empty_table_resolves_to_defaults() {
    let t = LevelTable::new();
    for level in [1, 2, 50, 10_000] {
        assert_eq!(t.resolve(level), LevelConfig::default());
    }
}

#[test]
fn defaults_values() {
    let d = LevelConfig::default();
    assert_eq!(d.rows, 5);
    assert_eq!(d.cols, 6);
    assert_eq!(d.speed, 1.0);
    assert_eq!(d.enemy_count, 30);
    assert_eq!(d.enemy_health, 1);
    assert!(d.enemy_types.is_none());
}

#[test]
fn level_below_first_entry_uses_defaults() {
    let t = table(vec![(5, RawLevelEntry::new().with(LevelField::Rows, 9.0))]);
    assert_eq!(t.resolve(4), LevelConfig::default());
    assert_eq!(t.resolve(5).rows, 9);
}

// ── Baselines ─────────────────────────────────────────────────────────────────

#[test]
fn sparse_override_inherits_from_earlier_baseline() {
    let t = table(vec![
        (
            1,
            full_baseline()
                .with(LevelField::Speed, 1.5)
                .with(LevelField::EnemyCount, 20.0)
                .with(LevelField::EnemyHealth, 2.0),
        ),
        (
            2,
            RawLevelEntry::new()
                .with(LevelField::Rows, 6.0)
                .with(LevelField::Cols, 8.0),
        ),
    ]);
    let c = t.resolve(2);
    assert_eq!(c.rows, 6);
    assert_eq!(c.cols, 8);
    assert_eq!(c.speed, 1.5);
    assert_eq!(c.enemy_count, 20);
    assert_eq!(c.enemy_health, 2);
}

#[test]
fn baseline_level_between_entries_uses_nearest_lower() {
    let t = table(vec![
        (1, full_baseline()),
        (10, RawLevelEntry::new().with(LevelField::Speed, 2.0)),
    ]);
    assert_eq!(t.resolve(9).speed, 1.0);
    assert_eq!(t.resolve(10).speed, 2.0);
    assert_eq!(t.resolve(15).speed, 2.0);
}

#[test]
fn enemy_types_replace_rather_than_merge() {
    let t = table(vec![
        (
            1,
            full_baseline().with_enemy_types(mix(&[
                (EnemyKind::Red, 50.0),
                (EnemyKind::Yellow, 50.0),
            ])),
        ),
        (
            2,
            RawLevelEntry::new().with_enemy_types(mix(&[(EnemyKind::Orange, 100.0)])),
        ),
    ]);
    let types = t.resolve(2).enemy_types.unwrap();
    assert_eq!(types.len(), 1);
    assert_eq!(types.get(&EnemyKind::Orange), Some(&100.0));
}

#[test]
fn enemy_types_inherited_when_not_overridden() {
    let t = table(vec![
        (1, full_baseline().with_enemy_types(mix(&[(EnemyKind::Red, 100.0)]))),
        (2, RawLevelEntry::new().with(LevelField::Rows, 7.0)),
        (3, RawLevelEntry::new().with_increment(LevelField::Speed, 0.1)),
    ]);
    assert_eq!(t.resolve(2).enemy_types, Some(mix(&[(EnemyKind::Red, 100.0)])));
    assert_eq!(t.resolve(4).enemy_types, Some(mix(&[(EnemyKind::Red, 100.0)])));
}

// ── Deltas ────────────────────────────────────────────────────────────────────

#[test]
fn delta_scales_from_last_baseline() {
    let t = table(vec![
        (1, full_baseline()),
        (
            2,
            RawLevelEntry::new()
                .with(LevelField::Rows, 6.0)
                .with(LevelField::Cols, 8.0),
        ),
        (
            3,
            RawLevelEntry::new()
                .with_increment(LevelField::Speed, 0.5)
                .with_increment(LevelField::EnemyHealth, 1.0),
        ),
    ]);
    let c3 = t.resolve(3);
    assert!((c3.speed - 1.5).abs() < 1e-9);
    assert_eq!(c3.enemy_health, 2);
    assert_eq!(c3.rows, 6);
    assert_eq!(c3.cols, 8);
    assert_eq!(c3.enemy_count, 30);

    let c5 = t.resolve(5);
    assert!((c5.speed - 2.5).abs() < 1e-9);
    assert_eq!(c5.enemy_health, 4);
}

#[test]
fn delta_distance_counts_from_baseline_not_delta_entry() {
    let t = table(vec![
        (1, full_baseline()),
        (
            3,
            RawLevelEntry::new()
                .with_increment(LevelField::Speed, 0.5)
                .with_increment(LevelField::EnemyHealth, 1.0),
        ),
    ]);
    // Distance from baseline 1: 2 at level 3, 4 at level 5.
    let c3 = t.resolve(3);
    assert!((c3.speed - 2.0).abs() < 1e-9);
    assert_eq!(c3.enemy_health, 3);
    let c5 = t.resolve(5);
    assert!((c5.speed - 3.0).abs() < 1e-9);
    assert_eq!(c5.enemy_health, 5);
    // Level 2 precedes the delta entry and stays on the baseline.
    assert_eq!(t.resolve(2).speed, 1.0);
}

#[test]
fn delta_grows_without_bound_past_last_entry() {
    let t = table(vec![
        (1, full_baseline()),
        (2, RawLevelEntry::new().with_increment(LevelField::Speed, 0.01)),
    ]);
    let far = t.resolve(10_001);
    assert!((far.speed - (1.0 + 0.01 * 10_000.0)).abs() < 1e-6);
}

#[test]
fn delta_health_is_floored() {
    let t = table(vec![
        (1, full_baseline()),
        (2, RawLevelEntry::new().with_increment(LevelField::EnemyHealth, 0.5)),
    ]);
    assert_eq!(t.resolve(2).enemy_health, 1); // 1.5
    assert_eq!(t.resolve(3).enemy_health, 2); // 2.0
    assert_eq!(t.resolve(4).enemy_health, 2); // 2.5
}

#[test]
fn delta_without_any_baseline_grows_from_defaults() {
    let t = table(vec![(
        2,
        RawLevelEntry::new().with_increment(LevelField::Speed, 0.25),
    )]);
    assert!((t.resolve(2).speed - 1.5).abs() < 1e-9);
    assert!((t.resolve(4).speed - 2.0).abs() < 1e-9);
}

#[test]
fn absolute_fields_on_a_delta_entry_apply_before_growth() {
    let t = table(vec![
        (1, full_baseline()),
        (
            2,
            RawLevelEntry::new()
                .with(LevelField::Rows, 9.0)
                .with_increment(LevelField::EnemyCount, 2.0),
        ),
    ]);
    let c = t.resolve(4);
    assert_eq!(c.rows, 9);
    assert_eq!(c.enemy_count, 36);
}

#[test]
fn later_baseline_resets_delta_growth() {
    let t = table(vec![
        (1, full_baseline()),
        (2, RawLevelEntry::new().with_increment(LevelField::Speed, 0.1)),
        (10, RawLevelEntry::new().with(LevelField::Speed, 5.0)),
    ]);
    assert!((t.resolve(9).speed - 1.8).abs() < 1e-9);
    assert_eq!(t.resolve(10).speed, 5.0);
    assert_eq!(t.resolve(12).speed, 5.0);
}

// ── Clamping ──────────────────────────────────────────────────────────────────

#[test]
fn nonsensical_values_are_clamped() {
    let t = table(vec![(
        1,
        RawLevelEntry::new()
            .with(LevelField::Rows, -3.0)
            .with(LevelField::Cols, 2.7)
            .with(LevelField::Speed, -1.0)
            .with(LevelField::EnemyCount, -10.0)
            .with(LevelField::EnemyHealth, 0.0),
    )]);
    let c = t.resolve(1);
    assert_eq!(c.rows, 1);
    assert_eq!(c.cols, 2);
    assert_eq!(c.speed, 1.0);
    assert_eq!(c.enemy_count, 0);
    assert_eq!(c.enemy_health, 1);
}

#[test]
fn resolved_configs_are_always_usable() {
    let t = LevelTable::bundled();
    for level in (1..=1200).chain([5_000, 100_000]) {
        let c = t.resolve(level);
        assert!(c.speed > 0.0 && c.speed.is_finite(), "level {level}");
        assert!(c.enemy_health >= 1, "level {level}");
        assert!(c.rows >= 1 && c.cols >= 1, "level {level}");
    }
}

#[test]
fn resolve_is_pure() {
    let t = LevelTable::bundled();
    for level in [1, 2, 26, 101, 777, 1500] {
        assert_eq!(t.resolve(level), t.resolve(level));
    }
}

// ── JSON loading ──────────────────────────────────────────────────────────────

#[test]
fn json_table_parses_plain_and_increment_fields() {
    let json = r#"{
        "1": { "rows": 5, "cols": 6, "speed": 1.0, "enemyCount": 30, "enemyHealth": 1 },
        "2": { "rows": 6, "cols": 8 },
        "3": { "+speed": 0.5, "+enemyHealth": 1 }
    }"#;
    let t = LevelTable::from_json_str(json).unwrap();
    assert_eq!(t.len(), 3);
    let c = t.resolve(5);
    assert!((c.speed - 2.5).abs() < 1e-9);
    assert_eq!(c.enemy_health, 4);
    assert_eq!(c.rows, 6);
}

#[test]
fn json_enemy_types_parse_by_tag() {
    let json = r#"{ "1": { "enemyTypes": { "red": 60, "violet": 25.5, "blue": 14.5 } } }"#;
    let t = LevelTable::from_json_str(json).unwrap();
    let types = t.resolve(1).enemy_types.unwrap();
    assert_eq!(types.get(&EnemyKind::Red), Some(&60.0));
    assert_eq!(types.get(&EnemyKind::Violet), Some(&25.5));
    assert_eq!(types.get(&EnemyKind::Blue), Some(&14.5));
}

#[test]
fn json_skips_bad_keys_and_values() {
    let json = r#"{
        "0": { "rows": 99 },
        "abc": { "rows": 99 },
        "1": { "rows": "many", "cols": 7, "wobble": 3, "enemyTypes": { "green": 50, "red": 50 } },
        "2": 17
    }"#;
    let t = LevelTable::from_json_str(json).unwrap();
    assert_eq!(t.len(), 1);
    let c = t.resolve(1);
    assert_eq!(c.rows, 5);
    assert_eq!(c.cols, 7);
    assert_eq!(c.enemy_types, Some(mix(&[(EnemyKind::Red, 50.0)])));
}

#[test]
fn json_out_of_range_shares_are_clamped() {
    let json = r#"{ "1": { "enemyTypes": { "red": 1e12, "yellow": -5, "blue": 40 } } }"#;
    let t = LevelTable::from_json_str(json).unwrap();
    let types = t.resolve(1).enemy_types.unwrap();
    assert_eq!(types.get(&EnemyKind::Red), Some(&100.0));
    assert_eq!(types.get(&EnemyKind::Yellow), Some(&0.0));
    assert_eq!(types.get(&EnemyKind::Blue), Some(&40.0));
}

#[test]
fn level_config_json_round_trip() {
    let config = LevelConfig {
        rows: 6,
        cols: 8,
        speed: 1.25,
        enemy_count: 40,
        enemy_health: 2,
        enemy_types: Some(mix(&[(EnemyKind::Red, 70.0), (EnemyKind::Blue, 30.0)])),
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"enemyCount\":40"));
    assert!(json.contains("\"enemyTypes\":{\"red\":70.0,\"blue\":30.0}"));
    let back: LevelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn level_config_without_types_omits_the_key() {
    let json = serde_json::to_string(&LevelConfig::default()).unwrap();
    assert!(!json.contains("enemyTypes"));
    let back: LevelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, LevelConfig::default());
}

#[test]
fn json_root_must_be_an_object() {
    assert!(matches!(
        LevelTable::from_json_str("[1, 2, 3]"),
        Err(LevelTableError::NotAnObject)
    ));
    assert!(matches!(
        LevelTable::from_json_str("{ not json"),
        Err(LevelTableError::Parse(_))
    ));
}

#[test]
fn load_missing_file_is_an_io_error() {
    let result = LevelTable::load("/definitely/not/a/levels.json");
    assert!(matches!(result, Err(LevelTableError::Io(_))));
}

#[test]
fn level_zero_is_ignored() {
    let mut t = LevelTable::new();
    t.insert(0, full_baseline());
    assert!(t.is_empty());
}

// ── Bundled table ─────────────────────────────────────────────────────────────

#[test]
fn bundled_table_loads() {
    let t = LevelTable::bundled();
    assert!(!t.is_empty());
    let first = t.resolve(1);
    assert_eq!(first.enemy_count, 30);
    assert_eq!(first.enemy_types, Some(mix(&[(EnemyKind::Red, 100.0)])));
}

#[test]
fn bundled_table_speed_grows_between_baselines() {
    let t = LevelTable::bundled();
    assert!((t.resolve(2).speed - 1.01).abs() < 1e-9);
    assert!((t.resolve(9).speed - 1.08).abs() < 1e-9);
    assert!(t.resolve(1500).speed > t.resolve(1000).speed);
}

#[test]
fn field_keys_round_trip() {
    for field in [
        LevelField::Rows,
        LevelField::Cols,
        LevelField::Speed,
        LevelField::EnemyCount,
        LevelField::EnemyHealth,
    ] {
        assert_eq!(LevelField::from_key(field.key()), Some(field));
    }
    assert_eq!(LevelField::from_key("+speed"), None);
}
