//! Color model: RGB/HSL colors, paint inputs, and the named-color table.

use log::warn;

/// How numeric paint inputs are interpreted.
///
/// The mode only affects inputs given as raw numbers; a [`Color`] built with
/// one of the mode-specific constructors keeps its channels no matter what
/// mode is active later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Channels are red/green/blue in 0-255.
    #[default]
    Rgb,
    /// Channels are hue in degrees and saturation/lightness in percent.
    Hsl,
}

/// A resolved color in either RGB or HSL form.
///
/// Channel ranges follow the usual 2D-canvas conventions: RGB channels are
/// 0-255, hue is in degrees, saturation/lightness are percentages, and alpha
/// is 0.0-1.0. The backend is responsible for turning a `Color` into
/// whatever its paint API wants; this type only carries the values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Red/green/blue channels (0-255) plus alpha (0-1).
    Rgb {
        /// Red channel.
        r: f64,
        /// Green channel.
        g: f64,
        /// Blue channel.
        b: f64,
        /// Opacity.
        a: f64,
    },
    /// Hue (degrees), saturation and lightness (percent) plus alpha (0-1).
    Hsl {
        /// Hue in degrees.
        h: f64,
        /// Saturation in percent.
        s: f64,
        /// Lightness in percent.
        l: f64,
        /// Opacity.
        a: f64,
    },
}

/// Opaque black.
pub const BLACK: Color = Color::Rgb {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Opaque white.
pub const WHITE: Color = Color::Rgb {
    r: 255.0,
    g: 255.0,
    b: 255.0,
    a: 1.0,
};

/// Opaque red.
pub const RED: Color = Color::Rgb {
    r: 255.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Opaque green (the full-intensity channel, not CSS `green`).
pub const GREEN: Color = Color::Rgb {
    r: 0.0,
    g: 255.0,
    b: 0.0,
    a: 1.0,
};

/// Opaque blue.
pub const BLUE: Color = Color::Rgb {
    r: 0.0,
    g: 0.0,
    b: 255.0,
    a: 1.0,
};

/// Fully transparent black.
pub const TRANSPARENT: Color = Color::Rgb {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

impl Color {
    /// Creates an opaque RGB color (channels 0-255).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates an RGB color with explicit alpha (0-1).
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self::Rgb { r, g, b, a }
    }

    /// Creates an opaque HSL color (hue in degrees, s/l in percent).
    pub fn hsl(h: f64, s: f64, l: f64) -> Self {
        Self::hsla(h, s, l, 1.0)
    }

    /// Creates an HSL color with explicit alpha (0-1).
    pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self::Hsl { h, s, l, a }
    }

    /// Creates an opaque gray with the same value on every RGB channel.
    pub fn gray(v: f64) -> Self {
        Self::rgb(v, v, v)
    }

    /// Parses `#rgb`, `#rrggbb`, or `#rrggbbaa` hex notation.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |pair: &str| u8::from_str_radix(pair, 16).ok().map(f64::from);
        match digits.len() {
            3 => {
                let mut chars = digits.chars();
                let mut next = || {
                    let c = chars.next()?;
                    channel(&format!("{c}{c}"))
                };
                let (r, g, b) = (next()?, next()?, next()?);
                Some(Self::rgb(r, g, b))
            }
            6 | 8 => {
                let r = channel(digits.get(0..2)?)?;
                let g = channel(digits.get(2..4)?)?;
                let b = channel(digits.get(4..6)?)?;
                let a = match digits.get(6..8) {
                    Some(pair) => channel(pair)? / 255.0,
                    None => 1.0,
                };
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// The color's opacity, 0.0-1.0.
    pub fn alpha(&self) -> f64 {
        match self {
            Self::Rgb { a, .. } | Self::Hsl { a, .. } => *a,
        }
    }
}

/// What [`fill`](crate::sketch::Sketch::fill) and
/// [`stroke`](crate::sketch::Sketch::stroke) accept.
///
/// Numeric forms are interpreted through the sketch's active [`ColorMode`]
/// at the time of the call; single values are replicated across channels,
/// matching the shorthand people expect for quick grays.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// One value replicated across the mode's three channels.
    Value(f64),
    /// One replicated value plus alpha.
    ValueAlpha(f64, f64),
    /// Three explicit channels, opaque.
    Channels(f64, f64, f64),
    /// Three explicit channels plus alpha.
    ChannelsAlpha(f64, f64, f64, f64),
    /// A pre-built color; the active mode is ignored.
    Ready(Color),
    /// A named color or hex string, e.g. `"tomato"` or `"#ff6347"`.
    Named(String),
    /// Disables the fill or stroke channel instead of setting a color.
    Off,
}

impl Paint {
    /// Resolves the input to a concrete color under the given mode.
    ///
    /// Returns `None` for [`Paint::Off`]. Unknown color names resolve to
    /// black with a warning rather than failing the draw call.
    pub(crate) fn resolve(&self, mode: ColorMode) -> Option<Color> {
        let from_channels = |c1: f64, c2: f64, c3: f64, a: f64| match mode {
            ColorMode::Rgb => Color::rgba(c1, c2, c3, a),
            ColorMode::Hsl => Color::hsla(c1, c2, c3, a),
        };
        match self {
            Self::Value(v) => Some(from_channels(*v, *v, *v, 1.0)),
            Self::ValueAlpha(v, a) => Some(from_channels(*v, *v, *v, *a)),
            Self::Channels(c1, c2, c3) => Some(from_channels(*c1, *c2, *c3, 1.0)),
            Self::ChannelsAlpha(c1, c2, c3, a) => Some(from_channels(*c1, *c2, *c3, *a)),
            Self::Ready(color) => Some(*color),
            Self::Named(name) => Some(Color::from_hex(name).or_else(|| named(name)).unwrap_or_else(|| {
                warn!("unknown color '{name}', using black");
                BLACK
            })),
            Self::Off => None,
        }
    }
}

impl From<f64> for Paint {
    fn from(v: f64) -> Self {
        Self::Value(v)
    }
}

impl From<i32> for Paint {
    fn from(v: i32) -> Self {
        Self::Value(v.into())
    }
}

impl From<(f64, f64)> for Paint {
    fn from((v, a): (f64, f64)) -> Self {
        Self::ValueAlpha(v, a)
    }
}

impl From<(f64, f64, f64)> for Paint {
    fn from((c1, c2, c3): (f64, f64, f64)) -> Self {
        Self::Channels(c1, c2, c3)
    }
}

impl From<(f64, f64, f64, f64)> for Paint {
    fn from((c1, c2, c3, a): (f64, f64, f64, f64)) -> Self {
        Self::ChannelsAlpha(c1, c2, c3, a)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Ready(color)
    }
}

impl From<&str> for Paint {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// Looks up a color by its common name.
///
/// Covers the usual web color names; lookup is case-insensitive.
pub fn named(name: &str) -> Option<Color> {
    let hex = match name.to_ascii_lowercase().as_str() {
        "aliceblue" => "#f0f8ff",
        "antiquewhite" => "#faebd7",
        "aqua" | "cyan" => "#00ffff",
        "aquamarine" => "#7fffd4",
        "azure" => "#f0ffff",
        "beige" => "#f5f5dc",
        "bisque" => "#ffe4c4",
        "black" => "#000000",
        "blanchedalmond" => "#ffebcd",
        "blue" => "#0000ff",
        "blueviolet" => "#8a2be2",
        "brown" => "#6b3500",
        "burlywood" => "#deb887",
        "cadetblue" => "#5f9ea0",
        "chartreuse" => "#7fff00",
        "chocolate" => "#d2691e",
        "coral" => "#ff7f50",
        "cornflowerblue" => "#6495ed",
        "cornsilk" => "#fff8dc",
        "crimson" => "#dc143c",
        "darkblue" => "#00008b",
        "darkcyan" => "#008b8b",
        "darkgoldenrod" => "#b8860b",
        "darkgray" | "darkgrey" => "#a9a9a9",
        "darkgreen" => "#006400",
        "darkkhaki" => "#bdb76b",
        "darkmagenta" => "#8b008b",
        "darkolivegreen" => "#556b2f",
        "darkorange" => "#ff8c00",
        "darkorchid" => "#9932cc",
        "darkred" => "#8b0000",
        "darksalmon" => "#e9967a",
        "darkseagreen" => "#8fbc8f",
        "darkslateblue" => "#483d8b",
        "darkslategray" | "darkslategrey" => "#2f4f4f",
        "darkturquoise" => "#00ced1",
        "darkviolet" => "#9400d3",
        "deeppink" => "#ff1493",
        "deepskyblue" => "#00bfff",
        "dimgray" | "dimgrey" => "#696969",
        "dodgerblue" => "#1e90ff",
        "firebrick" => "#b22222",
        "floralwhite" => "#fffaf0",
        "forestgreen" => "#228b22",
        "fuchsia" | "magenta" => "#ff00ff",
        "gainsboro" => "#dcdcdc",
        "ghostwhite" => "#f8f8ff",
        "gold" => "#ffd700",
        "goldenrod" => "#daa520",
        "gray" | "grey" => "#808080",
        "green" => "#008000",
        "greenyellow" => "#adff2f",
        "honeydew" => "#f0fff0",
        "hotpink" => "#ff69b4",
        "indianred" => "#cd5c5c",
        "indigo" => "#4b0082",
        "ivory" => "#fffff0",
        "khaki" => "#f0e68c",
        "lavender" => "#e6e6fa",
        "lavenderblush" => "#fff0f5",
        "lawngreen" => "#7cfc00",
        "lemonchiffon" => "#fffacd",
        "lightblue" => "#add8e6",
        "lightcoral" => "#f08080",
        "lightcyan" => "#e0ffff",
        "lightgoldenrodyellow" => "#fafad2",
        "lightgray" | "lightgrey" => "#d3d3d3",
        "lightgreen" => "#90ee90",
        "lightpink" => "#ffb6c1",
        "lightsalmon" => "#ffa07a",
        "lightseagreen" => "#20b2aa",
        "lightskyblue" => "#87cefa",
        "lightslategray" | "lightslategrey" => "#778899",
        "lightsteelblue" => "#b0c4de",
        "lightyellow" => "#ffffe0",
        "lime" => "#00ff00",
        "limegreen" => "#32cd32",
        "linen" => "#faf0e6",
        "maroon" => "#800000",
        "mediumaquamarine" => "#66cdaa",
        "mediumblue" => "#0000cd",
        "mediumorchid" => "#ba55d3",
        "mediumpurple" => "#9370db",
        "mediumseagreen" => "#3cb371",
        "mediumslateblue" => "#7b68ee",
        "mediumspringgreen" => "#00fa9a",
        "mediumturquoise" => "#48d1cc",
        "mediumvioletred" => "#c71585",
        "midnightblue" => "#191970",
        "mintcream" => "#f5fffa",
        "mistyrose" => "#ffe4e1",
        "moccasin" => "#ffe4b5",
        "navajowhite" => "#ffdead",
        "navy" => "#000080",
        "oldlace" => "#fdf5e6",
        "olive" => "#808000",
        "olivedrab" => "#6b8e23",
        "orange" => "#ffa500",
        "orangered" => "#ff4500",
        "orchid" => "#da70d6",
        "palegoldenrod" => "#eee8aa",
        "palegreen" => "#98fb98",
        "paleturquoise" => "#afeeee",
        "palevioletred" => "#db7093",
        "papayawhip" => "#ffefd5",
        "peachpuff" => "#ffdab9",
        "peru" => "#cd853f",
        "pink" => "#ffc0cb",
        "plum" => "#dda0dd",
        "powderblue" => "#b0e0e6",
        "purple" => "#800080",
        "red" => "#ff0000",
        "rosybrown" => "#bc8f8f",
        "royalblue" => "#4169e1",
        "saddlebrown" => "#8b4513",
        "salmon" => "#fa8072",
        "sandybrown" => "#f4a460",
        "seagreen" => "#2e8b57",
        "seashell" => "#fff5ee",
        "sienna" => "#a0522d",
        "silver" => "#c0c0c0",
        "skyblue" => "#87ceeb",
        "slateblue" => "#6a5acd",
        "slategray" | "slategrey" => "#708090",
        "snow" => "#fffafa",
        "springgreen" => "#00ff7f",
        "steelblue" => "#4682b4",
        "tan" => "#d2b48c",
        "teal" => "#008080",
        "thistle" => "#d8bfd8",
        "tomato" => "#ff6347",
        "turquoise" => "#40e0d0",
        "violet" => "#ee82ee",
        "wheat" => "#f5deb3",
        "white" => "#ffffff",
        "whitesmoke" => "#f5f5f5",
        "yellow" => "#ffff00",
        "yellowgreen" => "#9acd32",
        _ => return None,
    };
    Color::from_hex(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_short_long_and_alpha_forms() {
        assert_eq!(Color::from_hex("#f00"), Some(RED));
        assert_eq!(Color::from_hex("#ff0000"), Some(RED));
        assert_eq!(Color::from_hex("#ff000000"), Some(Color::rgba(255.0, 0.0, 0.0, 0.0)));
        assert_eq!(Color::from_hex("ff0000"), None);
        assert_eq!(Color::from_hex("#ff00"), None);
    }

    #[test]
    fn named_lookup_is_case_insensitive() {
        assert_eq!(named("Tomato"), Color::from_hex("#ff6347"));
        assert_eq!(named("SLATEGREY"), named("slategray"));
        assert_eq!(named("not-a-color"), None);
    }

    #[test]
    fn single_value_replicates_per_mode() {
        assert_eq!(
            Paint::Value(128.0).resolve(ColorMode::Rgb),
            Some(Color::rgb(128.0, 128.0, 128.0))
        );
        assert_eq!(
            Paint::ValueAlpha(50.0, 0.5).resolve(ColorMode::Hsl),
            Some(Color::hsla(50.0, 50.0, 50.0, 0.5))
        );
    }

    #[test]
    fn ready_colors_ignore_the_active_mode() {
        let c = Color::hsl(200.0, 80.0, 40.0);
        assert_eq!(Paint::Ready(c).resolve(ColorMode::Rgb), Some(c));
    }

    #[test]
    fn off_resolves_to_no_color() {
        assert_eq!(Paint::Off.resolve(ColorMode::Rgb), None);
    }

    #[test]
    fn unknown_names_fall_back_to_black() {
        assert_eq!(Paint::Named("blorp".into()).resolve(ColorMode::Rgb), Some(BLACK));
    }
}
