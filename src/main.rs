mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use wave_shooter::compute::{init_state, tick};
use wave_shooter::constants::TICKS_PER_SECOND;
use wave_shooter::input::{Action, Controls, InputSource};
use wave_shooter::level::LevelTable;

const FRAME: Duration = Duration::from_micros(1_000_000 / TICKS_PER_SECOND as u64);

/// Path to a level table that replaces the bundled one.
const LEVELS_ENV: &str = "WAVE_SHOOTER_LEVELS";
/// Log file used when `RUST_LOG` is set; stderr belongs to the TUI.
const LOG_FILE: &str = "wave_shooter.log";

// ── Held-key input ────────────────────────────────────────────────────────────

/// Frames a key stays down after its last press or repeat event.  Terminals
/// without release events rely on auto-repeat (15 Hz or faster) to refresh
/// it; 8 frames is about 133 ms.
const HOLD_WINDOW: u64 = 8;

/// Keyboard state for one frame: each key maps to the frame it was last
/// seen (press or repeat).
struct HeldKeys<'a> {
    key_frame: &'a HashMap<KeyCode, u64>,
    frame: u64,
}

impl HeldKeys<'_> {
    fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.is_held(key))
    }
}

impl InputSource for HeldKeys<'_> {
    fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => {
                self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')])
            }
            Action::MoveRight => {
                self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')])
            }
            Action::Fire => self.is_held(KeyCode::Char(' ')),
            Action::Pause => self.any_held(&[KeyCode::Esc, KeyCode::Char('p'), KeyCode::Char('P')]),
            Action::Restart => self.any_held(&[KeyCode::Char('r'), KeyCode::Char('R')]),
            Action::Confirm => self.is_held(KeyCode::Enter),
            Action::BuyLife => self.is_held(KeyCode::Char('0')),
            Action::BuyHedge => self.is_held(KeyCode::Char('1')),
        }
    }
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Runs until the player quits.
///
/// `key_frame` remembers the frame of each key's latest press or repeat.
/// `Controls` gets one snapshot per frame, so movement and fire can be held
/// together.
fn game_loop<W: Write>(
    out: &mut W,
    levels: &LevelTable,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut state = init_state(levels, &mut rng);
    let mut controls = Controls::new();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let clock = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input: take everything queued since last frame ────────────────────
        while let Ok(Event::Key(KeyEvent {
            code,
            kind,
            modifiers,
            ..
        })) = rx.try_recv()
        {
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        _ => {}
                    }
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let held = HeldKeys {
            key_frame: &key_frame,
            frame,
        };
        state = controls.apply(&state, &held, levels, &mut rng);

        let timestamp = clock.elapsed().as_secs_f64() * 1000.0;
        state = tick(&state, levels, timestamp, &mut rng);

        let (width, height) = terminal::size()?;
        display::render(out, &state, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    match File::create(LOG_FILE) {
        Ok(file) => {
            let _ = env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(e) => eprintln!("could not open {LOG_FILE}: {e}"),
    }
}

fn load_levels() -> LevelTable {
    let Some(path) = std::env::var_os(LEVELS_ENV) else {
        return LevelTable::bundled();
    };
    match LevelTable::load(&path) {
        Ok(table) => {
            info!("loaded level table from {:?}", path);
            table
        }
        Err(e) => {
            warn!("could not load level table {:?}: {}; using bundled levels", path, e);
            LevelTable::bundled()
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    init_logging();
    let levels = load_levels();

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Release and repeat events, where the terminal supports them.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; the loop only polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // game loop has exited
            }
        }
    });

    let result = game_loop(&mut out, &levels, &rx);

    // Restore the terminal even when the loop failed.
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
