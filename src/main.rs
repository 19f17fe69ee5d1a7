use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_invaders::config::{check_terminal, Cli, Config};
use space_invaders::display::TerminalRenderer;
use space_invaders::entities::GameStatus;
use space_invaders::input::{HeldKeys, Key};
use space_invaders::render::Renderer;
use space_invaders::{Game, Tuning};

// ── Key bindings ──────────────────────────────────────────────────────────────

const BINDINGS: &[(Key, &[KeyCode])] = &[
    (Key::Left, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
    (Key::Right, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
    (Key::Fire, &[KeyCode::Char(' ')]),
];

fn bound_key(code: &KeyCode) -> Option<Key> {
    BINDINGS
        .iter()
        .find(|(_, codes)| codes.contains(code))
        .map(|(key, _)| *key)
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is the game screen, so logs only go to a file when asked.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: `HeldKeys` records when each bound key was last pressed or
/// repeated. Each frame the held set is pushed into the game's input sampler
/// as press/release, so Space + direction can be held together.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
    cols: u16,
    rows: u16,
) -> anyhow::Result<()> {
    let mut game = Game::new(Tuning::default(), StdRng::seed_from_u64(config.seed));
    let mut renderer = TerminalRenderer::new(out, config.skin, cols, rows);
    log::info!("seed {} skin {}", config.seed, config.skin.as_str());

    let mut held = HeldKeys::default();
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => match kind {
                    KeyEventKind::Press => {
                        if let Some(key) = bound_key(&code) {
                            held.seen(key, game.status(), frame_start);
                        }
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Enter | KeyCode::Char(' ')
                                if game.status() == GameStatus::Menu =>
                            {
                                if game.start() {
                                    held.clear();
                                }
                            }
                            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter
                                if game.status().is_terminal() =>
                            {
                                if game.restart() {
                                    held.clear();
                                }
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        if let Some(key) = bound_key(&code) {
                            held.seen(key, game.status(), frame_start);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(key) = bound_key(&code) {
                            held.released(key);
                        }
                    }
                },
                Event::Resize(c, r) => {
                    if let Err(e) = check_terminal(c, r) {
                        log::warn!("{}", e);
                    }
                    renderer.resize(c, r);
                }
                _ => {}
            }
        }

        // ── Held keys → input sampler ─────────────────────────────────────────
        held.apply(&mut game, frame_start);

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;
        game.frame(elapsed_ms);

        renderer.render(&game.snapshot())?;

        let elapsed = frame_start.elapsed();
        if elapsed < config.frame {
            thread::sleep(config.frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    init_logging(config.log_file.as_deref())?;

    let (cols, rows) = terminal::size().context("failed to query terminal size")?;
    check_terminal(cols, rows)?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without the kitty protocol fall
    // back to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicated thread for blocking event reads so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &rx, &config, cols, rows);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("exiting with error: {:#}", e);
    }
    result
}
