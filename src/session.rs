//! Session state: the current parameters, the random source, and redraws

use crate::config::{CanvasConfig, RawInputs, TreeParameters};
use crate::tree::{draw_tree, DrawStats, Surface};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The four editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Depth,
    Probability,
    Angle,
    Branches,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Depth, Field::Probability, Field::Angle, Field::Branches];

    pub fn label(self) -> &'static str {
        match self {
            Field::Depth => "Depth",
            Field::Probability => "Probability",
            Field::Angle => "Angle",
            Field::Branches => "Branches",
        }
    }

    pub fn next(self) -> Field {
        match self {
            Field::Depth => Field::Probability,
            Field::Probability => Field::Angle,
            Field::Angle => Field::Branches,
            Field::Branches => Field::Depth,
        }
    }

    pub fn prev(self) -> Field {
        match self {
            Field::Depth => Field::Branches,
            Field::Probability => Field::Depth,
            Field::Angle => Field::Probability,
            Field::Branches => Field::Angle,
        }
    }
}

fn parse_real(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Apply one raw value to `params`. Returns false (leaving `params` untouched)
/// when the text does not parse.
pub fn apply_field(params: &mut TreeParameters, field: Field, raw: &str) -> bool {
    match field {
        Field::Depth => match raw.trim().parse::<i32>() {
            Ok(depth) => params.recursion_depth = depth,
            Err(_) => return false,
        },
        Field::Probability => match parse_real(raw) {
            Some(p) => params.branch_probability = TreeParameters::clamp_probability(p),
            None => return false,
        },
        Field::Angle => match parse_real(raw) {
            Some(a) => params.base_angle = a,
            None => return false,
        },
        Field::Branches => match raw.trim().parse::<i64>() {
            Ok(n) => params.branches_per_node = TreeParameters::clamp_branches(n),
            Err(_) => return false,
        },
    }
    true
}

/// Owns the tree parameters and the shared random source
pub struct Session {
    params: TreeParameters,
    canvas: CanvasConfig,
    rng: StdRng,
    seed: u64,
    last: DrawStats,
}

impl Session {
    pub fn new(params: TreeParameters, canvas: CanvasConfig, seed: u64) -> Self {
        Self {
            params,
            canvas,
            rng: StdRng::seed_from_u64(seed),
            seed,
            last: DrawStats::default(),
        }
    }

    pub fn params(&self) -> TreeParameters {
        self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn last_stats(&self) -> DrawStats {
        self.last
    }

    /// Read all four fields; malformed ones keep their previous value.
    /// Returns the fields that were rejected.
    pub fn apply_inputs(&mut self, inputs: &RawInputs) -> Vec<Field> {
        let mut rejected = Vec::new();
        for field in Field::ALL {
            let raw = match field {
                Field::Depth => &inputs.depth,
                Field::Probability => &inputs.probability,
                Field::Angle => &inputs.angle,
                Field::Branches => &inputs.branches,
            };
            if !apply_field(&mut self.params, field, raw) {
                rejected.push(field);
            }
        }
        rejected
    }

    /// Clear `surface` and draw a new tree with the current parameters
    pub fn redraw<S: Surface>(&mut self, surface: &mut S) -> DrawStats {
        self.last = draw_tree(self.params, &mut self.rng, surface, self.canvas.segment_limit());
        tracing::debug!(
            segments = self.last.segments,
            truncated = self.last.truncated,
            depth = self.params.recursion_depth,
            "redraw"
        );
        self.last
    }

    /// The redraw trigger: take the form values, then redraw from scratch
    pub fn reset<S: Surface>(&mut self, inputs: &RawInputs, surface: &mut S) -> DrawStats {
        self.apply_inputs(inputs);
        self.redraw(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Scene;

    fn inputs(depth: &str, probability: &str, angle: &str, branches: &str) -> RawInputs {
        RawInputs {
            depth: depth.to_string(),
            probability: probability.to_string(),
            angle: angle.to_string(),
            branches: branches.to_string(),
        }
    }

    fn session() -> Session {
        Session::new(TreeParameters::default(), CanvasConfig::default(), 12)
    }

    #[test]
    fn probability_is_clamped() {
        let mut s = session();
        s.apply_inputs(&inputs("6", "1.5", "30", "3"));
        assert_eq!(s.params().branch_probability, 1.0);
        s.apply_inputs(&inputs("6", "-0.3", "30", "3"));
        assert_eq!(s.params().branch_probability, 0.0);
    }

    #[test]
    fn branches_clamped_to_two() {
        let mut s = session();
        s.apply_inputs(&inputs("6", "0.8", "30", "1"));
        assert_eq!(s.params().branches_per_node, 2);
        s.apply_inputs(&inputs("6", "0.8", "30", "-4"));
        assert_eq!(s.params().branches_per_node, 2);
    }

    #[test]
    fn angle_is_not_clamped() {
        let mut s = session();
        s.apply_inputs(&inputs("6", "0.8", "-400.5", "3"));
        assert_eq!(s.params().base_angle, -400.5);
    }

    #[test]
    fn malformed_values_keep_previous() {
        let mut s = session();
        let rejected = s.apply_inputs(&inputs("abc", "x", "", "2.5"));
        assert_eq!(rejected, Field::ALL.to_vec());
        assert_eq!(s.params(), TreeParameters::default());
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        let mut s = session();
        s.apply_inputs(&inputs("6", "NaN", "inf", "3"));
        assert_eq!(s.params(), TreeParameters::default());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut s = session();
        let rejected = s.apply_inputs(&inputs(" 4 ", "\t0.5", "45 ", " 5"));
        assert!(rejected.is_empty());
        let p = s.params();
        assert_eq!(p.recursion_depth, 4);
        assert_eq!(p.branch_probability, 0.5);
        assert_eq!(p.base_angle, 45.0);
        assert_eq!(p.branches_per_node, 5);
    }

    #[test]
    fn bad_depth_still_redraws_with_prior_value() {
        let mut s = Session::new(
            TreeParameters { recursion_depth: 0, ..Default::default() },
            CanvasConfig::default(),
            3,
        );
        let mut scene = Scene::new(800.0, 600.0);
        let stats = s.reset(&inputs("abc", "1", "30", "3"), &mut scene);
        assert_eq!(s.params().recursion_depth, 0);
        assert_eq!(stats.segments, 1);
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn negative_depth_is_accepted_and_draws_nothing() {
        let mut s = session();
        let mut scene = Scene::new(800.0, 600.0);
        s.reset(&inputs("4", "1", "30", "3"), &mut scene);
        assert!(scene.len() > 1);

        let stats = s.reset(&inputs("-3", "1", "30", "3"), &mut scene);
        assert_eq!(s.params().recursion_depth, -3);
        assert_eq!(stats.segments, 0);
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn reset_replaces_the_drawing() {
        let mut s = session();
        let mut scene = Scene::new(800.0, 600.0);
        s.reset(&inputs("5", "1", "30", "3"), &mut scene);
        assert!(scene.len() > 1);
        s.reset(&inputs("6", "0", "30", "3"), &mut scene);
        assert_eq!(scene.len(), 1);
        assert_eq!(s.last_stats().segments, 1);
    }

    #[test]
    fn same_seed_same_tree() {
        let mut a = session();
        let mut b = session();
        let mut scene_a = Scene::new(800.0, 600.0);
        let mut scene_b = Scene::new(800.0, 600.0);
        a.redraw(&mut scene_a);
        b.redraw(&mut scene_b);
        assert_eq!(scene_a.segments(), scene_b.segments());
    }

    #[test]
    fn field_focus_cycles() {
        let mut f = Field::Depth;
        for _ in 0..4 {
            f = f.next();
        }
        assert_eq!(f, Field::Depth);
        assert_eq!(Field::Depth.prev(), Field::Branches);
    }
}
