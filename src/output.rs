//! Non-interactive outputs: one tree to stdout, or one tree to a PNG file

use crate::config::TreeConfig;
use crate::export::save_png;
use crate::raster::draw_scene;
use crate::session::Session;
use crate::terminal::Terminal;
use crate::tree::{DrawStats, Scene};
use std::io;
use std::path::Path;

const FALLBACK_SIZE: (u16, u16) = (80, 24);

fn grow(config: &TreeConfig) -> (Scene, DrawStats) {
    let seed = config.seed_or_clock();
    let mut session = Session::new(config.params, config.canvas, seed);
    let mut scene = Scene::new(config.canvas.width, config.canvas.height);
    let stats = session.redraw(&mut scene);

    if stats.truncated {
        tracing::info!(segments = stats.segments, visits = stats.visits, "segment budget reached, tree truncated");
    }
    tracing::debug!(seed, "tree grown");
    (scene, stats)
}

/// Print one tree with ANSI colors, sized to the terminal unless overridden
pub fn run_print(config: &TreeConfig, cols: Option<u16>, rows: Option<u16>) -> io::Result<()> {
    let (scene, _) = grow(config);

    let (term_cols, term_rows) = crossterm::terminal::size().unwrap_or(FALLBACK_SIZE);
    let cols = cols.unwrap_or(term_cols).max(1);
    // Leave a line for the shell prompt
    let rows = rows.unwrap_or(term_rows.saturating_sub(1)).max(1);

    let mut term = Terminal::offscreen(cols, rows);
    draw_scene(&scene, &mut term, 0, rows);
    term.print_to_stdout()
}

/// Write one tree to `path` as an image
pub fn run_export(config: &TreeConfig, path: &Path) -> io::Result<()> {
    let (scene, _) = grow(config);
    save_png(&scene, path).map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
