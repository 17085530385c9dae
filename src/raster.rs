//! Braille rasterization of a [`Scene`] into terminal cells
//!
//! Each character cell holds a 2x4 dot grid. The scene is scaled uniformly to
//! fit the dot grid and centered; line thickness scales with it.

use crate::config::colors;
use crate::terminal::Terminal;
use crate::tree::{Scene, SegmentKind, Surface};

// Braille constants (2x4 dot grid per character)
const BRAILLE_BASE: u32 = 0x2800;
const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;

// Widest brush half-width, in dots, a single segment may use
const MAX_BRUSH_DOTS: i32 = 16;

/// Dot-resolution image of the scene; trunk wins over foliage on overlap
pub struct DotGrid {
    width: usize,
    height: usize,
    dots: Vec<Option<SegmentKind>>,
}

impl DotGrid {
    /// Grid covering `cols` x `rows` character cells
    pub fn for_cells(cols: u16, rows: u16) -> Self {
        let width = cols as usize * DOTS_X;
        let height = rows as usize * DOTS_Y;
        Self {
            width,
            height,
            dots: vec![None; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<SegmentKind> {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x]
        } else {
            None
        }
    }

    pub fn plot(&mut self, x: i32, y: i32, kind: SegmentKind) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let slot = &mut self.dots[y as usize * self.width + x as usize];
        if *slot != Some(SegmentKind::Trunk) {
            *slot = Some(kind);
        }
    }

    /// Square brush of half-width `radius` at every Bresenham step
    pub fn line(&mut self, from: (i32, i32), to: (i32, i32), radius: i32, kind: SegmentKind) {
        let (x1, y1) = to;
        let dx = (x1 - from.0).abs();
        let dy = -(y1 - from.1).abs();
        let sx = if from.0 < x1 { 1 } else { -1 };
        let sy = if from.1 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = from;

        loop {
            for oy in -radius..=radius {
                for ox in -radius..=radius {
                    self.plot(x + ox, y + oy, kind);
                }
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

/// Mapping from canvas units to dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    /// Largest uniform scale that fits `extent` into the grid, centered
    pub fn fit(extent: (f64, f64), grid: &DotGrid) -> Self {
        let (w, h) = extent;
        if w <= 0.0 || h <= 0.0 {
            return Self { scale: 0.0, offset_x: 0.0, offset_y: 0.0 };
        }
        let scale = (grid.width as f64 / w).min(grid.height as f64 / h);
        Self {
            scale,
            offset_x: (grid.width as f64 - w * scale) / 2.0,
            offset_y: (grid.height as f64 - h * scale) / 2.0,
        }
    }

    /// Position in dots, not yet snapped to the grid
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (self.offset_x + x * self.scale, self.offset_y + y * self.scale)
    }

    /// Brush half-width in dots for a line of `thickness` canvas units
    pub fn brush_radius(&self, thickness: f64) -> i32 {
        let radius = ((thickness * self.scale - 1.0) / 2.0).round();
        radius.clamp(0.0, MAX_BRUSH_DOTS as f64) as i32
    }
}

/// Liang-Barsky: the part of `a`-`b` inside the box `min`..`max`, if any
fn clip_line(a: (f64, f64), b: (f64, f64), min: (f64, f64), max: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [(-dx, a.0 - min.0), (dx, max.0 - a.0), (-dy, a.1 - min.1), (dy, max.1 - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }

    Some(((a.0 + t0 * dx, a.1 + t0 * dy), (a.0 + t1 * dx, a.1 + t1 * dy)))
}

/// Draw every segment of `scene` into `grid`
///
/// Segments are clipped to the grid (plus the brush reach) before stepping,
/// so the work per segment is bounded by the grid size whatever the scale.
pub fn rasterize(scene: &Scene, grid: &mut DotGrid) -> Viewport {
    let view = Viewport::fit(scene.extent(), grid);
    if !(view.scale.is_finite() && view.scale > 0.0) {
        return view;
    }

    for seg in scene.segments() {
        let radius = view.brush_radius(seg.thickness);
        let margin = radius as f64 + 1.0;
        let min = (-margin, -margin);
        let max = (grid.width as f64 + margin, grid.height as f64 + margin);

        let Some((from, to)) = clip_line(view.project(seg.start.x, seg.start.y), view.project(seg.end.x, seg.end.y), min, max)
        else {
            continue;
        };
        let snap = |p: (f64, f64)| (p.0.floor() as i32, p.1.floor() as i32);
        grid.line(snap(from), snap(to), radius, seg.kind);
    }
    view
}

/// Rasterized scene kept between frames; rebuilt only when the scene or the
/// cell area changes
pub struct CanvasCache {
    cols: u16,
    rows: u16,
    generation: Option<u64>,
    grid: DotGrid,
}

impl Default for CanvasCache {
    fn default() -> Self {
        Self {
            cols: 0,
            rows: 0,
            generation: None,
            grid: DotGrid::for_cells(0, 0),
        }
    }
}

impl CanvasCache {
    /// Bring the grid up to date. Returns true when it had to re-rasterize.
    pub fn refresh(&mut self, scene: &Scene, cols: u16, rows: u16) -> bool {
        let needs_update = self.generation != Some(scene.generation()) || self.cols != cols || self.rows != rows;
        if !needs_update {
            return false;
        }

        self.grid = DotGrid::for_cells(cols, rows);
        rasterize(scene, &mut self.grid);
        self.cols = cols;
        self.rows = rows;
        self.generation = Some(scene.generation());
        true
    }

    pub fn grid(&self) -> &DotGrid {
        &self.grid
    }
}

/// Encode one cell's 2x4 dots to a braille character
fn encode_braille(dots: &[[bool; DOTS_X]; DOTS_Y]) -> char {
    // Braille dot positions:
    // 0 3
    // 1 4
    // 2 5
    // 6 7
    let mut code: u32 = 0;
    if dots[0][0] { code |= 1 << 0; }
    if dots[1][0] { code |= 1 << 1; }
    if dots[2][0] { code |= 1 << 2; }
    if dots[0][1] { code |= 1 << 3; }
    if dots[1][1] { code |= 1 << 4; }
    if dots[2][1] { code |= 1 << 5; }
    if dots[3][0] { code |= 1 << 6; }
    if dots[3][1] { code |= 1 << 7; }

    char::from_u32(BRAILLE_BASE + code).unwrap_or(' ')
}

/// Copy the grid into the terminal buffer starting at row `top`
pub fn blit(grid: &DotGrid, term: &mut Terminal, top: i32) {
    let cols = grid.width / DOTS_X;
    let rows = grid.height / DOTS_Y;

    for cy in 0..rows {
        for cx in 0..cols {
            let mut dots = [[false; DOTS_X]; DOTS_Y];
            let mut any = false;
            let mut trunk = false;

            for (dy, row) in dots.iter_mut().enumerate() {
                for (dx, dot) in row.iter_mut().enumerate() {
                    if let Some(kind) = grid.get(cx * DOTS_X + dx, cy * DOTS_Y + dy) {
                        *dot = true;
                        any = true;
                        trunk |= kind == SegmentKind::Trunk;
                    }
                }
            }

            if any {
                let color = if trunk { colors::TRUNK } else { colors::FOLIAGE };
                term.set(cx as i32, top + cy as i32, encode_braille(&dots), Some(color), false);
            }
        }
    }
}

/// Rasterize `scene` into `rows` terminal rows starting at `top`
pub fn draw_scene(scene: &Scene, term: &mut Terminal, top: u16, rows: u16) {
    let (cols, _) = term.size();
    let mut grid = DotGrid::for_cells(cols, rows);
    rasterize(scene, &mut grid);
    blit(&grid, term, top as i32);
}
