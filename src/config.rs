use crossterm::style::Color;

/// Lengths below this never produce a segment
pub const MIN_BRANCH_LENGTH: f64 = 5.0;

/// Root of every tree: distance above the canvas bottom, heading and length
pub const ROOT_MARGIN: f64 = 50.0;
pub const ROOT_ANGLE: f64 = -90.0;
pub const ROOT_LENGTH: f64 = 100.0;

/// Child length is the parent's times a factor drawn from this range
pub const REDUCTION_MIN: f64 = 0.6;
pub const REDUCTION_MAX: f64 = 0.8;

/// Random perturbation of each child heading, in degrees either way
pub const ANGLE_JITTER: f64 = 5.0;

/// Accepted logical canvas side lengths
pub const MIN_CANVAS_SIDE: f64 = 1.0;
pub const MAX_CANVAS_SIDE: f64 = 16_384.0;

/// Default cap on work done by a single redraw
pub const DEFAULT_MAX_SEGMENTS: usize = 200_000;

/// The four user-adjustable tree parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParameters {
    /// Negative depths are accepted and draw nothing
    pub recursion_depth: i32,
    pub branch_probability: f64,
    pub base_angle: f64,
    pub branches_per_node: u32,
}

impl Default for TreeParameters {
    fn default() -> Self {
        Self {
            recursion_depth: 6,
            branch_probability: 0.8,
            base_angle: 30.0,
            branches_per_node: 3,
        }
    }
}

impl TreeParameters {
    /// Clamp a probability into [0, 1]
    pub fn clamp_probability(p: f64) -> f64 {
        p.clamp(0.0, 1.0)
    }

    /// At least two children per node, so the angle step is always defined
    pub fn clamp_branches(n: i64) -> u32 {
        n.clamp(2, u32::MAX as i64) as u32
    }

    /// Spread between neighbouring children, in degrees
    pub fn angle_step(&self) -> f64 {
        2.0 * self.base_angle / (self.branches_per_node.max(2) - 1) as f64
    }
}

/// Raw text for the four form fields, exactly as the user typed it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs {
    pub depth: String,
    pub probability: String,
    pub angle: String,
    pub branches: String,
}

impl RawInputs {
    /// Render current parameters back into editable text
    pub fn from_params(params: &TreeParameters) -> Self {
        Self {
            depth: params.recursion_depth.to_string(),
            probability: params.branch_probability.to_string(),
            angle: params.base_angle.to_string(),
            branches: params.branches_per_node.to_string(),
        }
    }
}

/// Logical drawing surface dimensions and per-redraw budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    /// Branch visits allowed per redraw; 0 disables the budget
    pub max_segments: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            max_segments: DEFAULT_MAX_SEGMENTS,
        }
    }
}

impl CanvasConfig {
    /// Whether `side` is usable as a canvas width or height
    pub fn valid_side(side: f64) -> bool {
        side.is_finite() && (MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).contains(&side)
    }

    pub fn segment_limit(&self) -> Option<usize> {
        if self.max_segments == 0 {
            None
        } else {
            Some(self.max_segments)
        }
    }
}

/// Configuration for one run of the program
#[derive(Debug, Clone)]
pub struct TreeConfig {
    pub params: TreeParameters,
    pub canvas: CanvasConfig,
    pub seed: Option<u64>,
}

impl TreeConfig {
    /// The configured seed, or one taken from the clock
    pub fn seed_or_clock(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) // Fallback seed for misconfigured system clocks
        })
    }
}

/// Tree colors
pub mod colors {
    use super::Color;

    // Saddle brown
    pub const TRUNK_RGB: (u8, u8, u8) = (139, 69, 19);
    // Forest green
    pub const FOLIAGE_RGB: (u8, u8, u8) = (34, 139, 34);
    pub const BACKGROUND_RGB: (u8, u8, u8) = (255, 255, 255);

    pub const TRUNK: Color = Color::Rgb { r: TRUNK_RGB.0, g: TRUNK_RGB.1, b: TRUNK_RGB.2 };
    pub const FOLIAGE: Color = Color::Rgb { r: FOLIAGE_RGB.0, g: FOLIAGE_RGB.1, b: FOLIAGE_RGB.2 };

    // Form colors
    pub const LABEL: Color = Color::Grey;
    pub const FIELD: Color = Color::White;
    pub const FIELD_FOCUSED: Color = Color::Yellow;
    pub const STATUS: Color = Color::DarkGrey;
    pub const WARNING: Color = Color::DarkYellow;
}
