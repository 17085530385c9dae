use crate::config::{CanvasConfig, TreeParameters, DEFAULT_MAX_SEGMENTS};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from reading the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub tree: TreeSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct TreeSettings {
    pub depth: Option<i32>,
    pub probability: Option<f64>,
    pub angle: Option<f64>,
    pub branches: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CanvasSettings {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub max_segments: Option<usize>,
}

impl Settings {
    /// Load from the default location, falling back to built-in defaults
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("{}; using defaults", err);
                Self::default()
            }
        }
    }

    /// A missing file is not an error
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fractree")
            .join("config.toml")
    }

    /// Initial parameters, sanitized with the same rules as form input
    pub fn params(&self) -> TreeParameters {
        let mut params = TreeParameters::default();
        let t = &self.tree;

        if let Some(depth) = t.depth {
            params.recursion_depth = depth;
        }
        if let Some(p) = t.probability.filter(|p| p.is_finite()) {
            params.branch_probability = TreeParameters::clamp_probability(p);
        }
        if let Some(a) = t.angle.filter(|a| a.is_finite()) {
            params.base_angle = a;
        }
        if let Some(n) = t.branches {
            params.branches_per_node = TreeParameters::clamp_branches(n);
        }
        params
    }

    pub fn canvas(&self) -> CanvasConfig {
        let defaults = CanvasConfig::default();
        let c = &self.canvas;
        let valid = |v: &f64| CanvasConfig::valid_side(*v);

        CanvasConfig {
            width: c.width.filter(valid).unwrap_or(defaults.width),
            height: c.height.filter(valid).unwrap_or(defaults.height),
            max_segments: c.max_segments.unwrap_or(DEFAULT_MAX_SEGMENTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let s = Settings::parse("").unwrap();
        assert_eq!(s.params(), TreeParameters::default());
        assert_eq!(s.canvas(), CanvasConfig::default());
    }

    #[test]
    fn values_are_sanitized() {
        let s = Settings::parse(
            r#"
            [tree]
            depth = 9
            probability = 3.0
            angle = 12.5
            branches = 1

            [canvas]
            width = -10.0
            height = 900.0
            max_segments = 0
            "#,
        )
        .unwrap();

        let p = s.params();
        assert_eq!(p.recursion_depth, 9);
        assert_eq!(p.branch_probability, 1.0);
        assert_eq!(p.base_angle, 12.5);
        assert_eq!(p.branches_per_node, 2);

        let c = s.canvas();
        assert_eq!(c.width, 800.0);
        assert_eq!(c.height, 900.0);
        assert_eq!(c.segment_limit(), None);
    }

    #[test]
    fn tiny_or_huge_canvas_falls_back() {
        let s = Settings::parse("[canvas]\nwidth = 0.1\nheight = 1e9").unwrap();
        let c = s.canvas();
        assert_eq!(c.width, 800.0);
        assert_eq!(c.height, 600.0);

        let s = Settings::parse("[canvas]\nwidth = 1.0\nheight = 2.5").unwrap();
        assert_eq!(s.canvas().width, 1.0);
        assert_eq!(s.canvas().height, 2.5);
    }

    #[test]
    fn negative_depth_is_kept() {
        let s = Settings::parse("[tree]\ndepth = -2").unwrap();
        assert_eq!(s.params().recursion_depth, -2);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Settings::parse("[tree\ndepth = ").is_err());
        assert!(Settings::parse("[tree]\ndepth = \"six\"").is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("fractree-settings-does-not-exist.toml");
        let s = Settings::load_from(&path).unwrap();
        assert_eq!(s.params(), TreeParameters::default());
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let path = std::env::temp_dir().join(format!("fractree-bad-{}.toml", std::process::id()));
        fs::write(&path, "not = [valid").unwrap();
        let err = Settings::load_from(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("fractree-bad-"));
    }
}
