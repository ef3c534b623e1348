use wave_shooter::constants::*;
use wave_shooter::entities::*;

#[test]
fn entity_clone_and_eq() {
    // Enums derive PartialEq, so equality comparisons must work
    assert_eq!(EnemyKind::Red, EnemyKind::Red);
    assert_ne!(EnemyKind::Red, EnemyKind::Violet);
    assert_eq!(GameStatus::Playing, GameStatus::Playing);
    assert_ne!(GameStatus::Playing, GameStatus::GameOver);
    assert_eq!(BulletOwner::Player, BulletOwner::Player);
    assert_ne!(BulletOwner::Player, BulletOwner::Enemy);

    // Clone must produce an equal value
    let hedge = HedgeDefense::new(HEDGE_Y);
    assert_eq!(hedge.clone(), hedge);
}

// ── Bounds ────────────────────────────────────────────────────────────────────

#[test]
fn bounds_overlap() {
    let a = Bounds { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
    let b = Bounds { x: 5.0, y: 5.0, width: 10.0, height: 10.0 };
    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
}

#[test]
fn bounds_touching_edges_do_not_intersect() {
    let a = Bounds { x: 0.0, y: 0.0, width: 10.0, height: 10.0 };
    let right = Bounds { x: 10.0, y: 0.0, width: 10.0, height: 10.0 };
    let below = Bounds { x: 0.0, y: 10.0, width: 10.0, height: 10.0 };
    assert!(!a.intersects(&right));
    assert!(!a.intersects(&below));
}

#[test]
fn bounds_centre_and_edges() {
    let b = Bounds { x: 10.0, y: 20.0, width: 30.0, height: 40.0 };
    assert_eq!(b.right(), 40.0);
    assert_eq!(b.bottom(), 60.0);
    assert_eq!(b.center(), (25.0, 40.0));
}

// ── Enemy tags ────────────────────────────────────────────────────────────────

#[test]
fn enemy_tags_round_trip() {
    for kind in EnemyKind::FORMATION_ORDER {
        assert_eq!(EnemyKind::from_tag(kind.tag()), Some(kind));
    }
    assert_eq!(EnemyKind::from_tag("green"), None);
    assert_eq!(EnemyKind::from_tag("Red"), None);
}

#[test]
fn enemy_kind_serialises_lowercase() {
    assert_eq!(serde_json::to_string(&EnemyKind::Violet).unwrap(), "\"violet\"");
    let kind: EnemyKind = serde_json::from_str("\"blue\"").unwrap();
    assert_eq!(kind, EnemyKind::Blue);
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn player_spawn_travels_up_and_is_centred() {
    let b = BulletSpawn::player(100.0, 500.0).into_bullet();
    assert_eq!(b.x, 100.0 - BULLET_WIDTH / 2.0);
    assert_eq!(b.y, 500.0);
    assert_eq!((b.vx, b.vy), (0.0, -BULLET_SPEED));
    assert!(b.is_player_bullet());
    assert!(!b.special);
}

#[test]
fn enemy_spawn_keeps_its_velocity() {
    let b = BulletSpawn::enemy(100.0, 100.0, 3.0, 4.0).into_bullet();
    assert_eq!((b.vx, b.vy), (3.0, 4.0));
    assert_eq!(b.owner, BulletOwner::Enemy);
}

#[test]
fn enemy_spawn_defaults_downward() {
    let spawn = BulletSpawn {
        velocity: None,
        ..BulletSpawn::enemy(100.0, 100.0, 0.0, 0.0)
    };
    let b = spawn.into_bullet();
    assert_eq!((b.vx, b.vy), (0.0, BULLET_SPEED));
}

#[test]
fn bullet_advances_until_off_canvas() {
    let mut b = BulletSpawn::player(500.0, 20.0).into_bullet();
    assert!(b.advance()); // y = 13, still partly visible
    assert!(b.advance()); // y = 6
    assert!(b.advance()); // y = -1, bottom = 14
    assert!(b.advance()); // y = -8, bottom = 7
    assert!(!b.advance()); // y = -15, bottom = 0
}

#[test]
fn bullet_leaving_sideways_is_dropped() {
    let mut b = BulletSpawn::enemy(CANVAS_WIDTH - 10.0, 300.0, 7.0, 0.0).into_bullet();
    assert!(b.advance());
    assert!(!b.advance());
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_spawns_centred_at_bottom() {
    let p = Player::spawn();
    assert_eq!(p.x, CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0);
    assert_eq!(p.y, CANVAS_HEIGHT - PLAYER_START_Y_OFFSET);
    assert_eq!(p.lives, STARTING_LIVES);
    assert_eq!(p.shoot_position(), (CANVAS_WIDTH / 2.0, p.y));
}

#[test]
fn player_lives_never_underflow() {
    let mut p = Player::spawn();
    for _ in 0..10 {
        p.lose_life();
    }
    assert_eq!(p.lives, 0);
    p.add_life();
    assert_eq!(p.lives, 1);
}

#[test]
fn reset_position_only_recentres_x() {
    let mut p = Player::spawn();
    p.x = 20.0;
    p.y = 123.0;
    p.reset_position();
    assert_eq!(p.x, Player::spawn().x);
    assert_eq!(p.y, 123.0);
}

// ── Status ────────────────────────────────────────────────────────────────────

#[test]
fn terminal_statuses() {
    assert!(!GameStatus::Waiting.is_terminal());
    assert!(!GameStatus::Playing.is_terminal());
    assert!(GameStatus::LevelFailed.is_terminal());
    assert!(GameStatus::GameOver.is_terminal());
}
