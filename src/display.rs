/// Rendering layer — all terminal I/O lives here.
///
/// The logical field is rasterized onto terminal cells: row 0 is the HUD,
/// the last row is the controls hint, everything in between is the field.
/// No game logic is performed; this module only translates a `Snapshot`
/// into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::config::check_terminal;
use crate::entities::GameStatus;
use crate::render::{frame_ops, DrawOp, Renderer, Rgb, Skin, Snapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_HUD: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_LOSE: Color = Color::Red;
const C_WIN: Color = Color::Green;
const C_TEXT: Color = Color::White;

const PIXEL: &str = "█";

// ── Rasterizer ────────────────────────────────────────────────────────────────

/// Cell grid for the playfield, row-major, `None` = background.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGrid {
    pub cols: u16,
    pub rows: u16,
    pub cells: Vec<Option<Rgb>>,
}

impl CellGrid {
    pub fn get(&self, col: u16, row: u16) -> Option<Rgb> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }
}

/// Cells touched by `[start, start + len)` once scaled; never empty so thin
/// projectiles stay visible.
fn cell_span(start: f32, len: f32, scale: f32, max: u16) -> Option<(u16, u16)> {
    let lo = (start * scale).floor();
    let hi = ((start + len) * scale).ceil();
    if hi <= 0.0 || lo >= max as f32 {
        return None;
    }
    let lo = lo.max(0.0) as u16;
    let hi = (hi.min(max as f32) as u16).max(lo + 1);
    Some((lo, hi))
}

/// Paint draw ops, back to front, onto a `cols`×`rows` grid covering a
/// `width`×`height` field.
pub fn rasterize(ops: &[DrawOp], width: f32, height: f32, cols: u16, rows: u16) -> CellGrid {
    let mut grid = CellGrid {
        cols,
        rows,
        cells: vec![None; cols as usize * rows as usize],
    };
    if width <= 0.0 || height <= 0.0 {
        return grid;
    }
    let sx = cols as f32 / width;
    let sy = rows as f32 / height;

    for op in ops {
        let DrawOp::FillRect { rect, color } = op;
        let (Some((c0, c1)), Some((r0, r1))) = (
            cell_span(rect.x, rect.w, sx, cols),
            cell_span(rect.y, rect.h, sy, rows),
        ) else {
            continue;
        };
        for row in r0..r1 {
            for col in c0..c1 {
                grid.cells[row as usize * cols as usize + col as usize] = Some(*color);
            }
        }
    }
    grid
}

// ── Terminal renderer ─────────────────────────────────────────────────────────

pub struct TerminalRenderer<W: Write> {
    out: W,
    skin: Skin,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, skin: Skin, cols: u16, rows: u16) -> Self {
        Self { out, skin, cols, rows }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(2)
    }

    fn draw_field(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        let ops = frame_ops(snap, self.skin);
        let grid = rasterize(&ops, snap.width, snap.height, self.cols, self.field_rows());
        for row in 0..grid.rows {
            for col in 0..grid.cols {
                if let Some(Rgb(r, g, b)) = grid.get(col, row) {
                    self.out.queue(cursor::MoveTo(col, row + 1))?;
                    self.out.queue(style::SetForegroundColor(Color::Rgb { r, g, b }))?;
                    self.out.queue(Print(PIXEL))?;
                }
            }
        }
        Ok(())
    }

    fn draw_hud(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        self.out.queue(style::SetForegroundColor(C_HUD))?;
        self.out.queue(cursor::MoveTo(1, 0))?;
        self.out.queue(Print(format!("SCORE: {}", snap.score)))?;

        let lives = format!("LIVES: {}", snap.lives);
        let x = self.cols.saturating_sub(lives.chars().count() as u16 + 1);
        self.out.queue(cursor::MoveTo(x, 0))?;
        self.out.queue(Print(lives))?;
        Ok(())
    }

    fn draw_controls_hint(&mut self) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(1, self.rows.saturating_sub(1)))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("← → : Move   SPACE : Shoot   Q : Quit"))?;
        Ok(())
    }

    /// Centred block of lines over the field.
    fn draw_overlay(&mut self, lines: &[(String, Color)]) -> std::io::Result<()> {
        let cx = self.cols / 2;
        let start_row = (self.rows / 2).saturating_sub(lines.len() as u16 / 2);
        for (i, (msg, color)) in lines.iter().enumerate() {
            let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
            self.out.queue(cursor::MoveTo(col, start_row + i as u16))?;
            self.out.queue(style::SetForegroundColor(*color))?;
            self.out.queue(Print(msg))?;
        }
        Ok(())
    }
}

fn overlay_lines(snap: &Snapshot<'_>) -> Option<Vec<(String, Color)>> {
    match snap.status {
        GameStatus::Playing => None,
        GameStatus::Menu => Some(vec![
            ("╔════════════════════╗".to_string(), C_TITLE),
            ("║   SPACE INVADERS   ║".to_string(), C_TITLE),
            ("╚════════════════════╝".to_string(), C_TITLE),
            ("Move: ← →    Shoot: Space".to_string(), C_TEXT),
            ("ENTER - Start Game  Q - Quit".to_string(), C_TEXT),
        ]),
        GameStatus::GameOver => Some(vec![
            ("╔════════════════════╗".to_string(), C_LOSE),
            ("║     GAME  OVER     ║".to_string(), C_LOSE),
            ("╚════════════════════╝".to_string(), C_LOSE),
            (format!("Score: {}", snap.score), C_TEXT),
            ("R - Restart  Q - Quit".to_string(), C_TEXT),
        ]),
        GameStatus::Win => Some(vec![
            ("╔════════════════════╗".to_string(), C_WIN),
            ("║      YOU WIN!      ║".to_string(), C_WIN),
            ("╚════════════════════╝".to_string(), C_WIN),
            (format!("Score: {}", snap.score), C_TEXT),
            ("R - Restart  Q - Quit".to_string(), C_TEXT),
        ]),
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = std::io::Error;

    /// Render one complete frame.
    fn render(&mut self, snap: &Snapshot<'_>) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;

        if let Err(e) = check_terminal(self.cols, self.rows) {
            self.out.queue(style::SetForegroundColor(C_LOSE))?;
            self.out.queue(cursor::MoveTo(0, 0))?;
            self.out.queue(Print(e.to_string()))?;
            self.out.queue(style::ResetColor)?;
            self.out.flush()?;
            return Ok(());
        }

        if snap.status != GameStatus::Menu {
            self.draw_field(snap)?;
            self.draw_hud(snap)?;
        }
        self.draw_controls_hint()?;

        if let Some(lines) = overlay_lines(snap) {
            self.draw_overlay(&lines)?;
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}
