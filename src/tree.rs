//! Fractal tree geometry
//!
//! A tree is grown by recursive line drawing: every branch emits one segment,
//! then (if the per-node probability gate passes) spawns a fan of shorter
//! children rooted at random points along itself. Segments go to a
//! [`SegmentSink`], so the geometry never touches a concrete renderer.

use crate::config::{TreeParameters, ANGLE_JITTER, MIN_BRANCH_LENGTH, REDUCTION_MAX, REDUCTION_MIN};
use rand::Rng;

/// Point in canvas units (screen coordinates, +y is down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at fraction `t` of the way from `self` to `other`
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Step `length` units along a heading given in degrees
    pub fn step(self, angle_deg: f64, length: f64) -> Point {
        let rad = angle_deg.to_radians();
        Point {
            x: self.x + rad.cos() * length,
            y: self.y + rad.sin() * length,
        }
    }
}

/// Color category of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Trunk,
    Foliage,
}

/// One straight line of the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub kind: SegmentKind,
    pub thickness: f64,
}

/// Anything that can receive drawn segments
pub trait SegmentSink {
    fn add_segment(&mut self, segment: Segment);
    fn clear(&mut self);
}

impl SegmentSink for Vec<Segment> {
    fn add_segment(&mut self, segment: Segment) {
        self.push(segment);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// A segment sink with a known logical size
pub trait Surface: SegmentSink {
    fn extent(&self) -> (f64, f64);
}

/// Retained drawing: the segments of the current tree on a fixed-size canvas
#[derive(Debug, Clone, Default)]
pub struct Scene {
    width: f64,
    height: f64,
    segments: Vec<Segment>,
    // Bumped on every change, so renderers can tell a stale copy
    generation: u64,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            segments: Vec::new(),
            generation: 0,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl SegmentSink for Scene {
    fn add_segment(&mut self, segment: Segment) {
        self.segments.push(segment);
        self.generation = self.generation.wrapping_add(1);
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl Surface for Scene {
    fn extent(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

/// Fixed presentation rule: the first three levels are trunk, thicker near the root
pub fn style_for_level(level: u32, max_level: u32) -> (SegmentKind, f64) {
    if level < 3 {
        (SegmentKind::Trunk, max_level as f64 - level as f64 + 1.0)
    } else {
        (SegmentKind::Foliage, 1.0)
    }
}

/// Outcome of one draw
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub segments: usize,
    /// Calls to `draw_branch`, including ones that hit the base case
    pub visits: usize,
    /// The budget ran out before the tree was complete
    pub truncated: bool,
}

/// Recursion state shared by every branch of one tree
pub struct Brancher<'a, R: Rng, S: SegmentSink> {
    params: TreeParameters,
    rng: &'a mut R,
    sink: &'a mut S,
    limit: Option<usize>,
    stats: DrawStats,
}

impl<'a, R: Rng, S: SegmentSink> Brancher<'a, R, S> {
    pub fn new(params: TreeParameters, rng: &'a mut R, sink: &'a mut S) -> Self {
        Self {
            params,
            rng,
            sink,
            limit: None,
            stats: DrawStats::default(),
        }
    }

    /// Stop after `limit` branch visits (None = unbounded). Every visit is
    /// charged, including children that turn out too short or too deep.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    fn budget_spent(&self) -> bool {
        matches!(self.limit, Some(limit) if self.stats.visits >= limit)
    }

    /// Draw one branch and, recursively, all of its descendants
    pub fn draw_branch(&mut self, origin: Point, angle: f64, length: f64, level: u32, max_level: u32) {
        if self.budget_spent() {
            self.stats.truncated = true;
            return;
        }
        self.stats.visits += 1;

        if level > max_level || length < MIN_BRANCH_LENGTH {
            return;
        }

        let end = origin.step(angle, length);
        let (kind, thickness) = style_for_level(level, max_level);
        self.sink.add_segment(Segment {
            start: origin,
            end,
            kind,
            thickness,
        });
        self.stats.segments += 1;

        // One gate per node, not per child
        if self.rng.gen::<f64>() > self.params.branch_probability {
            return;
        }

        // No child could be drawn: all would be too deep or shorter than the floor
        if level >= max_level || length * REDUCTION_MAX <= MIN_BRANCH_LENGTH {
            return;
        }

        let angle_step = self.params.angle_step();
        for i in 0..self.params.branches_per_node {
            let branching_point: f64 = self.rng.gen();
            let child_origin = origin.lerp(end, branching_point);

            let jitter: f64 = self.rng.gen_range(-ANGLE_JITTER..ANGLE_JITTER);
            let child_angle = angle - self.params.base_angle + i as f64 * angle_step + jitter;

            let reduction: f64 = self.rng.gen_range(REDUCTION_MIN..REDUCTION_MAX);

            self.draw_branch(child_origin, child_angle, length * reduction, level + 1, max_level);

            if self.stats.truncated {
                return;
            }
        }
    }
}

/// Clear `surface` and grow a fresh tree from the fixed root
pub fn draw_tree<R, S>(params: TreeParameters, rng: &mut R, surface: &mut S, limit: Option<usize>) -> DrawStats
where
    R: Rng,
    S: Surface,
{
    use crate::config::{ROOT_ANGLE, ROOT_LENGTH, ROOT_MARGIN};

    surface.clear();
    // A negative depth puts even the trunk below the base case
    let Ok(max_level) = u32::try_from(params.recursion_depth) else {
        return DrawStats::default();
    };
    let (width, height) = surface.extent();
    let root = Point::new(width / 2.0, height - ROOT_MARGIN);

    let mut brancher = Brancher::new(params, rng, surface).with_limit(limit);
    brancher.draw_branch(root, ROOT_ANGLE, ROOT_LENGTH, 0, max_level);
    brancher.stats()
}
