/// Rendering layer. All terminal I/O lives here.
///
/// Reads `GameState`, never changes it.  Canvas coordinates are mapped onto
/// the current terminal size every frame.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use wave_shooter::compute::{GameState, MarketItem};
use wave_shooter::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, TICKS_PER_SECOND};
use wave_shooter::enemy::Enemy;
use wave_shooter::entities::{Bullet, BulletOwner, EnemyKind, GameStatus};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LEVEL: Color = Color::White;
const C_HUD_LIVES: Color = Color::Green;
const C_PLAYER: Color = Color::Green;
const C_BULLET_PLAYER: Color = Color::White;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_BULLET_SPECIAL: Color = Color::Rgb { r: 255, g: 165, b: 0 };
const C_HEDGE: Color = Color::DarkGreen;
const C_HEALTH: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Red => Color::Red,
        EnemyKind::Yellow => Color::Yellow,
        EnemyKind::Orange => Color::Rgb { r: 255, g: 165, b: 0 },
        EnemyKind::Violet => Color::Magenta,
        EnemyKind::Blue => Color::Blue,
    }
}

// ── Canvas → cell mapping ─────────────────────────────────────────────────────

/// Row 0 is the HUD, row 1 and row `height - 2` are the border, and the
/// last row holds the controls hint.  The canvas is stretched over the
/// cells in between.
#[derive(Clone, Copy)]
struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    fn inner_cols(&self) -> f64 {
        f64::from(self.width.saturating_sub(2).max(1))
    }

    fn inner_rows(&self) -> f64 {
        f64::from(self.height.saturating_sub(4).max(1))
    }

    fn col(&self, x: f64) -> u16 {
        let c = (x / CANVAS_WIDTH * self.inner_cols()).floor();
        1 + c.clamp(0.0, self.inner_cols() - 1.0) as u16
    }

    fn row(&self, y: f64) -> u16 {
        let r = (y / CANVAS_HEIGHT * self.inner_rows()).floor();
        2 + r.clamp(0.0, self.inner_rows() - 1.0) as u16
    }

    fn cell(&self, x: f64, y: f64) -> (u16, u16) {
        (self.col(x), self.row(y))
    }

    fn centre_col(&self, text: &str) -> u16 {
        (self.width / 2).saturating_sub(text.chars().count() as u16 / 2)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `width` × `height` terminal.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let view = Viewport { width, height };
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, view)?;
    draw_hud(out, state, view)?;
    draw_hedges(out, state, view)?;

    for enemy in state.wave.enemies() {
        draw_enemy(out, enemy, view)?;
    }
    for bullet in &state.bullets {
        draw_bullet(out, bullet, view)?;
    }

    draw_player(out, state, view)?;
    draw_controls_hint(out, view)?;
    draw_overlay(out, state, view)?;

    // Cursor to the bottom corner, then one flush per frame.
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}", state.score)))?;

    let level_str = format!("[ LEVEL {} ]", state.level);
    out.queue(cursor::MoveTo(view.centre_col(&level_str), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Lives:{}", "●".repeat(state.player.lives as usize));
    let rx = view
        .width
        .saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_hedges<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_HEDGE))?;
    for hedge in state.defenses.iter().filter(|h| h.active) {
        out.queue(cursor::MoveTo(1, view.row(hedge.y)))?;
        out.queue(Print("≈".repeat(view.width.saturating_sub(2) as usize)))?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    // Sprite:
    //   ▲       ← nose
    //  /█\      ← fuselage + wings
    let (nose_x, nose_y) = state.player.shoot_position();
    let (col, row) = view.cell(nose_x, nose_y);
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(Print("▲"))?;
    if row + 1 < view.height.saturating_sub(2) {
        out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row + 1))?;
        out.queue(Print("/█\\"))?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, enemy: &Enemy, view: Viewport) -> std::io::Result<()> {
    let b = enemy.bounds();
    let (cx, cy) = b.center();
    let (col, row) = view.cell(cx, cy);
    let sprite = match enemy.kind {
        EnemyKind::Red => "<▼>",
        EnemyKind::Yellow => "\\▼/",
        EnemyKind::Orange => "(◎)",
        EnemyKind::Violet => "⬟⬟⬟",
        EnemyKind::Blue => "{⬢}",
    };
    out.queue(style::SetForegroundColor(enemy_color(enemy.kind)))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print(sprite))?;
    draw_health_label(out, enemy, col, row, view)
}

/// Health number under any enemy that takes more than one hit.
fn draw_health_label<W: Write>(
    out: &mut W,
    enemy: &Enemy,
    col: u16,
    row: u16,
    view: Viewport,
) -> std::io::Result<()> {
    if enemy.health <= 1 || row + 1 >= view.height.saturating_sub(2) {
        return Ok(());
    }
    let label = enemy.health.to_string();
    out.queue(style::SetForegroundColor(C_HEALTH))?;
    out.queue(cursor::MoveTo(
        col.saturating_sub(label.len() as u16 / 2).max(1),
        row + 1,
    ))?;
    out.queue(Print(label))?;
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, view: Viewport) -> std::io::Result<()> {
    let (cx, cy) = bullet.bounds().center();
    let (col, row) = view.cell(cx, cy);
    let (glyph, color) = match (bullet.owner, bullet.special) {
        (BulletOwner::Player, _) => ("║", C_BULLET_PLAYER),
        (BulletOwner::Enemy, true) => ("•", C_BULLET_SPECIAL),
        (BulletOwner::Enemy, false) => ("↓", C_BULLET_ENEMY),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Shoot   ESC/P : Pause   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_overlay<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    match state.status {
        GameStatus::Waiting => draw_box(
            out,
            view,
            &[("Press SPACE to start".to_string(), Color::White)],
        ),
        GameStatus::Playing if state.paused => draw_market(out, state, view),
        GameStatus::Playing if state.countdown > 0 => {
            let secs = state.countdown.div_ceil(TICKS_PER_SECOND);
            draw_box(out, view, &[(secs.to_string(), Color::Red)])
        }
        GameStatus::Playing => Ok(()),
        GameStatus::LevelFailed => draw_end_screen(out, state, view, "LEVEL  FAILED"),
        GameStatus::GameOver => draw_end_screen(out, state, view, "GAME  OVER"),
    }
}

fn draw_market<W: Write>(out: &mut W, state: &GameState, view: Viewport) -> std::io::Result<()> {
    let mut lines = vec![
        ("PAUSED - ESC to resume".to_string(), Color::White),
        (String::new(), Color::White),
    ];
    for (i, item) in MarketItem::ALL.into_iter().enumerate() {
        let affordable = state.score >= item.cost();
        lines.push((
            format!("[{}] {:<14} {:>4} pts", i, item.label(), item.cost()),
            if affordable { Color::Yellow } else { Color::DarkGrey },
        ));
    }
    lines.push((String::new(), Color::White));
    lines.push(("R - Restart".to_string(), Color::DarkGrey));
    draw_box(out, view, &lines)
}

fn draw_end_screen<W: Write>(
    out: &mut W,
    state: &GameState,
    view: Viewport,
    title: &str,
) -> std::io::Result<()> {
    draw_box(
        out,
        view,
        &[
            ("╔════════════════════╗".to_string(), Color::Red),
            (format!("║{:^20}║", title), Color::Red),
            ("╚════════════════════╝".to_string(), Color::Red),
            (format!("Final Score: {:>6}", state.score), Color::Yellow),
            (format!("Reached level {}", state.level), Color::White),
            ("ENTER/R - Play Again  Q - Quit".to_string(), Color::White),
        ],
    )
}

/// Lines centred horizontally and vertically.
fn draw_box<W: Write>(
    out: &mut W,
    view: Viewport,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(view.centre_col(msg), start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}
