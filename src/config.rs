//! Sketch construction options.
//!
//! All fields have defaults, so `SketchConfig::default()` gives a playable
//! 400x400 single-layer sketch at 30 fps. Configs can also be deserialized
//! from TOML (e.g. embedder-provided sketch presets); missing fields fall
//! back to the same defaults, and loaded values are validated and clamped
//! before use.

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};

/// A width or height specification.
///
/// # Examples
/// ```toml
/// # Fixed pixel size
/// width = 400
///
/// # Take the container's size at creation time
/// width = "inherit"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    /// Fixed size in pixels.
    Px(u32),
    /// Sizing keyword; `"inherit"` takes the container's size.
    Word(String),
}

impl Dimension {
    /// The `"inherit"` keyword.
    pub fn inherit() -> Self {
        Self::Word("inherit".to_string())
    }

    /// Resolves the dimension against the container's measured size.
    ///
    /// Unknown keywords inherit the container size with a warning.
    pub(crate) fn resolve(&self, container: u32) -> u32 {
        match self {
            Self::Px(px) => *px,
            Self::Word(word) if word.eq_ignore_ascii_case("inherit") => container,
            Self::Word(word) => {
                warn!("unknown dimension keyword '{word}', inheriting container size");
                container
            }
        }
    }
}

impl From<u32> for Dimension {
    fn from(px: u32) -> Self {
        Self::Px(px)
    }
}

/// Construction-time options for a sketch.
///
/// # Example TOML
/// ```toml
/// width = 640
/// height = 480
/// container = "stage"
/// layers = 2
/// frame_rate = 60.0
/// autoplay = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchConfig {
    /// Sketch width (default 400 px).
    #[serde(default = "default_width")]
    pub width: Dimension,

    /// Sketch height; defaults to the same value as `width`.
    #[serde(default)]
    pub height: Option<Dimension>,

    /// Name of an existing host container to attach to. When absent, a
    /// fresh container is created and named by the host.
    #[serde(default)]
    pub container: Option<String>,

    /// How many layers to create (at least 1).
    #[serde(default = "default_layers")]
    pub layers: usize,

    /// Target frames per second (valid range: above 0, at most 240).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Horizontal scale applied to every layer once at construction.
    #[serde(default = "default_scale")]
    pub scale_x: f64,

    /// Vertical scale; defaults to the same value as `scale_x`.
    #[serde(default)]
    pub scale_y: Option<f64>,

    /// Whether the sketch starts playing (false = start paused).
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Whether the sketch is registered with the scheduler at creation.
    #[serde(default = "default_register")]
    pub register: bool,
}

fn default_width() -> Dimension {
    Dimension::Px(400)
}

fn default_layers() -> usize {
    1
}

fn default_frame_rate() -> f64 {
    30.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_autoplay() -> bool {
    true
}

fn default_register() -> bool {
    true
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: None,
            container: None,
            layers: default_layers(),
            frame_rate: default_frame_rate(),
            scale_x: default_scale(),
            scale_y: None,
            autoplay: default_autoplay(),
            register: default_register(),
        }
    }
}

impl SketchConfig {
    /// Parses a config from TOML, validating and clamping loaded values.
    ///
    /// # Errors
    /// Returns an error when the string is not valid TOML for this type.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        let mut config: Self =
            toml::from_str(toml_str).context("failed to parse sketch config")?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Clamps out-of-range values to safe ones, logging each adjustment.
    ///
    /// Validated ranges:
    /// - `layers`: at least 1
    /// - `frame_rate`: above 0.0, at most 240.0
    /// - `scale_x` / `scale_y`: finite and non-zero
    pub fn validate_and_clamp(&mut self) {
        if self.layers < 1 {
            warn!("a sketch needs at least one layer, raising {} to 1", self.layers);
            self.layers = 1;
        }

        if !(self.frame_rate > 0.0 && self.frame_rate <= 240.0) {
            warn!(
                "invalid frame_rate {:.1}, clamping to 0.1-240.0 range",
                self.frame_rate
            );
            self.frame_rate = self.frame_rate.clamp(0.1, 240.0);
            if !self.frame_rate.is_finite() {
                self.frame_rate = default_frame_rate();
            }
        }

        if !(self.scale_x.is_finite() && self.scale_x != 0.0) {
            warn!("invalid scale_x {}, falling back to 1.0", self.scale_x);
            self.scale_x = default_scale();
        }

        if let Some(scale_y) = self.scale_y {
            if !(scale_y.is_finite() && scale_y != 0.0) {
                warn!("invalid scale_y {scale_y}, falling back to scale_x");
                self.scale_y = None;
            }
        }
    }

    /// The effective height specification (`height`, else `width`).
    pub(crate) fn height_or_width(&self) -> Dimension {
        self.height.clone().unwrap_or_else(|| self.width.clone())
    }

    /// The effective vertical scale (`scale_y`, else `scale_x`).
    pub(crate) fn scale_y_or_x(&self) -> f64 {
        self.scale_y.unwrap_or(self.scale_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_give_a_square_autoplay_sketch() {
        let config = SketchConfig::default();
        assert_eq!(config.width, Dimension::Px(400));
        assert_eq!(config.height_or_width(), Dimension::Px(400));
        assert_eq!(config.layers, 1);
        assert_eq!(config.frame_rate, 30.0);
        assert!(config.autoplay);
        assert!(config.register);
    }

    #[test]
    fn height_and_scale_y_follow_their_partners() {
        let config = SketchConfig {
            width: Dimension::Px(200),
            scale_x: 2.0,
            ..Default::default()
        };
        assert_eq!(config.height_or_width(), Dimension::Px(200));
        assert_eq!(config.scale_y_or_x(), 2.0);

        let explicit = SketchConfig {
            height: Some(Dimension::Px(50)),
            scale_y: Some(0.5),
            ..config
        };
        assert_eq!(explicit.height_or_width(), Dimension::Px(50));
        assert_eq!(explicit.scale_y_or_x(), 0.5);
    }

    #[test]
    fn toml_round_trip_with_inherit_keyword() {
        let config = SketchConfig::from_toml(
            r#"
            width = "inherit"
            height = 300
            container = "stage"
            frame_rate = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.width, Dimension::inherit());
        assert_eq!(config.height, Some(Dimension::Px(300)));
        assert_eq!(config.container.as_deref(), Some("stage"));
        assert_eq!(config.frame_rate, 60.0);
        assert_eq!(config.layers, 1);
    }

    #[test]
    fn clamping_repairs_bad_values() {
        let mut config = SketchConfig {
            layers: 0,
            frame_rate: -5.0,
            scale_x: 0.0,
            scale_y: Some(f64::NAN),
            ..Default::default()
        };
        config.validate_and_clamp();

        assert_eq!(config.layers, 1);
        assert_eq!(config.frame_rate, 0.1);
        assert_eq!(config.scale_x, 1.0);
        assert_eq!(config.scale_y, None);
    }

    #[test]
    fn unknown_keywords_inherit_with_warning() {
        let dimension = Dimension::Word("fill-parent".to_string());
        assert_eq!(dimension.resolve(123), 123);
        assert_eq!(Dimension::inherit().resolve(640), 640);
        assert_eq!(Dimension::Px(50).resolve(640), 50);
    }
}
