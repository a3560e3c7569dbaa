//! Canvas configuration.
//!
//! Every field has a default, so a config file only needs to list what it
//! overrides:
//!
//! ```json
//! { "highlight_color": "#ff8800", "arrow": { "head_length": 14 } }
//! ```

use crate::error::ConfigError;
use crate::path::{ArrowStyle, Size};
use crate::text::MonospaceMetrics;
use serde::{Deserialize, Serialize};
use slint::Color;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Outline color for selected concepts.
    #[serde(with = "hex_color")]
    pub highlight_color: Color,
    /// Color given to links created without an explicit color.
    #[serde(with = "hex_color")]
    pub default_link_color: Color,
    /// Size of the inline text-entry frame, centered on the click point.
    pub text_entry_size: Size,
    pub arrow: ArrowStyle,
    pub metrics: MonospaceMetrics,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            highlight_color: Color::from_rgb_u8(255, 0, 0),
            default_link_color: crate::graph::default_link_color(),
            text_entry_size: Size::new(60.0, 40.0),
            arrow: ArrowStyle::default(),
            metrics: MonospaceMetrics::default(),
        }
    }
}

impl CanvasConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every length is finite and not negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("metrics.char_width", self.metrics.char_width),
            ("metrics.line_height", self.metrics.line_height),
            ("text_entry_size.width", self.text_entry_size.width),
            ("text_entry_size.height", self.text_entry_size.height),
            ("arrow.shaft_width", self.arrow.shaft_width),
            ("arrow.head_length", self.arrow.head_length),
            ("arrow.head_width", self.arrow.head_width),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { field, value });
            }
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Format a color as `#rrggbbaa`.
pub fn color_to_hex(color: Color) -> String {
    format!(
        "#{:02x}{:02x}{:02x}{:02x}",
        color.red(),
        color.green(),
        color.blue(),
        color.alpha()
    )
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(text: &str) -> Result<Color, ConfigError> {
    let invalid = || ConfigError::InvalidColor(text.to_owned());
    let digits = text.strip_prefix('#').ok_or_else(invalid)?;
    if !digits.is_ascii() || !(digits.len() == 6 || digits.len() == 8) {
        return Err(invalid());
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
    let a = if digits.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::from_argb_u8(a, r, g, b))
}

/// Serde adapter storing a [`Color`] as a hex string.
pub(crate) mod hex_color {
    use super::{color_to_hex, parse_hex_color};
    use serde::{Deserialize, Deserializer, Serializer};
    use slint::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color_to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_hex_color(&text).map_err(serde::de::Error::custom)
    }
}
