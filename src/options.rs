//! Typed widget configuration.
//!
//! Every recognized option is a field of [`PanelOptions`]; anything not
//! supplied takes its default. After construction options are read and
//! written through [`OptionKey`] / [`OptionValue`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Rgba;

/// Credential mode used when fetching images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossOrigin {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "anonymous")]
    Anonymous,
    #[serde(rename = "use-credentials")]
    UseCredentials,
}

impl FromStr for CrossOrigin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(CrossOrigin::Unset),
            "anonymous" => Ok(CrossOrigin::Anonymous),
            "use-credentials" => Ok(CrossOrigin::UseCredentials),
            _ => Err(Error::OptionType { key: "crossOrigin", expected: "\"\", \"anonymous\" or \"use-credentials\"" }),
        }
    }
}

/// What the container shows once the foreground is scratched away.
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Color(Rgba),
    Image(String),
}

impl Background {
    /// `None` for an empty reference. Hex colors become [`Background::Color`].
    pub fn parse(reference: &str) -> Option<Background> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if reference.starts_with('#') {
            if let Ok(color) = reference.parse::<Rgba>() {
                return Some(Background::Color(color));
            }
        }
        Some(Background::Image(reference.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelOptions {
    /// Id of the container the surface is mounted in.
    #[serde(alias = "elementId")]
    pub element_id: String,
    /// Percent of the surface that must be erased before completion.
    pub threshold: f32,
    /// Foreground image reference. Required.
    pub foreground: String,
    /// Background image reference or hex color. Optional.
    pub background: String,
    #[serde(alias = "crossOrigin")]
    pub cross_origin: CrossOrigin,
    /// Brush diameter in surface pixels.
    #[serde(alias = "scratchSize")]
    pub scratch_size: f32,
    pub enabled: bool,
    /// Milliseconds between foreground load and background reveal.
    #[serde(alias = "backgroundLoadDelay")]
    pub background_load_delay: u64,
    #[serde(alias = "autoResize")]
    pub auto_resize: bool,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            element_id: "scratch-panel".to_string(),
            threshold: 65.0,
            foreground: String::new(),
            background: String::new(),
            cross_origin: CrossOrigin::Unset,
            scratch_size: 40.0,
            enabled: true,
            background_load_delay: 300,
            auto_resize: true,
        }
    }
}

impl PanelOptions {
    /// Parse a TOML table of options, filling in defaults for missing keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn background_delay(&self) -> Duration {
        Duration::from_millis(self.background_load_delay)
    }

    pub fn get(&self, key: OptionKey) -> OptionValue {
        match key {
            OptionKey::ElementId => OptionValue::Text(self.element_id.clone()),
            OptionKey::Threshold => OptionValue::Number(self.threshold),
            OptionKey::Foreground => OptionValue::Text(self.foreground.clone()),
            OptionKey::Background => OptionValue::Text(self.background.clone()),
            OptionKey::CrossOrigin => OptionValue::CrossOrigin(self.cross_origin),
            OptionKey::ScratchSize => OptionValue::Number(self.scratch_size),
            OptionKey::Enabled => OptionValue::Flag(self.enabled),
            OptionKey::BackgroundLoadDelay => OptionValue::Millis(self.background_load_delay),
            OptionKey::AutoResize => OptionValue::Flag(self.auto_resize),
        }
    }

    /// Store `value` under `key`. Only the type is checked, not the range.
    pub fn set(&mut self, key: OptionKey, value: OptionValue) -> Result<()> {
        let mismatch = || Error::OptionType { key: key.name(), expected: key.expected() };
        match (key, value) {
            (OptionKey::ElementId, OptionValue::Text(v)) => self.element_id = v,
            (OptionKey::Foreground, OptionValue::Text(v)) => self.foreground = v,
            (OptionKey::Background, OptionValue::Text(v)) => self.background = v,
            (OptionKey::Threshold, OptionValue::Number(v)) => self.threshold = v,
            (OptionKey::ScratchSize, OptionValue::Number(v)) => self.scratch_size = v,
            (OptionKey::CrossOrigin, OptionValue::CrossOrigin(v)) => self.cross_origin = v,
            (OptionKey::Enabled, OptionValue::Flag(v)) => self.enabled = v,
            (OptionKey::AutoResize, OptionValue::Flag(v)) => self.auto_resize = v,
            (OptionKey::BackgroundLoadDelay, OptionValue::Millis(v)) => self.background_load_delay = v,
            _ => return Err(mismatch()),
        }
        Ok(())
    }

    /// String-keyed write, e.g. from a command line or a script.
    pub fn set_str(&mut self, name: &str, raw: &str) -> Result<()> {
        let key: OptionKey = name.parse()?;
        let mismatch = || Error::OptionType { key: key.name(), expected: key.expected() };
        let value = match key {
            OptionKey::ElementId | OptionKey::Foreground | OptionKey::Background => {
                OptionValue::Text(raw.to_string())
            }
            OptionKey::Threshold | OptionKey::ScratchSize => {
                OptionValue::Number(raw.trim().parse().map_err(|_| mismatch())?)
            }
            OptionKey::Enabled | OptionKey::AutoResize => {
                OptionValue::Flag(raw.trim().parse().map_err(|_| mismatch())?)
            }
            OptionKey::BackgroundLoadDelay => {
                OptionValue::Millis(raw.trim().parse().map_err(|_| mismatch())?)
            }
            OptionKey::CrossOrigin => OptionValue::CrossOrigin(raw.trim().parse()?),
        };
        self.set(key, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    ElementId,
    Threshold,
    Foreground,
    Background,
    CrossOrigin,
    ScratchSize,
    Enabled,
    BackgroundLoadDelay,
    AutoResize,
}

impl OptionKey {
    pub const ALL: [OptionKey; 9] = [
        OptionKey::ElementId,
        OptionKey::Threshold,
        OptionKey::Foreground,
        OptionKey::Background,
        OptionKey::CrossOrigin,
        OptionKey::ScratchSize,
        OptionKey::Enabled,
        OptionKey::BackgroundLoadDelay,
        OptionKey::AutoResize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptionKey::ElementId => "elementId",
            OptionKey::Threshold => "threshold",
            OptionKey::Foreground => "foreground",
            OptionKey::Background => "background",
            OptionKey::CrossOrigin => "crossOrigin",
            OptionKey::ScratchSize => "scratchSize",
            OptionKey::Enabled => "enabled",
            OptionKey::BackgroundLoadDelay => "backgroundLoadDelay",
            OptionKey::AutoResize => "autoResize",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            OptionKey::ElementId | OptionKey::Foreground | OptionKey::Background => "text",
            OptionKey::Threshold | OptionKey::ScratchSize => "a number",
            OptionKey::Enabled | OptionKey::AutoResize => "a boolean",
            OptionKey::BackgroundLoadDelay => "milliseconds",
            OptionKey::CrossOrigin => "a cross-origin mode",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = Error;

    /// Accepts both the camelCase and the snake_case spelling.
    fn from_str(s: &str) -> Result<Self> {
        OptionKey::ALL
            .into_iter()
            .find(|k| k.name() == s || k.name().to_ascii_lowercase() == s.replace('_', "").to_ascii_lowercase())
            .ok_or_else(|| Error::UnknownOption(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Number(f32),
    Flag(bool),
    Millis(u64),
    CrossOrigin(CrossOrigin),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let opts = PanelOptions::from_toml_str("").unwrap();
        assert_eq!(opts, PanelOptions::default());
        assert_eq!(opts.element_id, "scratch-panel");
        assert_eq!(opts.threshold, 65.0);
        assert_eq!(opts.scratch_size, 40.0);
        assert_eq!(opts.background_load_delay, 300);
        assert!(opts.enabled);
        assert!(opts.auto_resize);
        assert_eq!(opts.cross_origin, CrossOrigin::Unset);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let opts = PanelOptions::from_toml_str(
            r#"
            elementId = "x"
            foreground = "f.png"
            threshold = 50
            crossOrigin = "anonymous"
            "#,
        )
        .unwrap();
        let defaults = PanelOptions::default();

        assert_eq!(opts.element_id, "x");
        assert_eq!(opts.foreground, "f.png");
        assert_eq!(opts.threshold, 50.0);
        assert_eq!(opts.cross_origin, CrossOrigin::Anonymous);
        assert_eq!(opts.scratch_size, defaults.scratch_size);
        assert_eq!(opts.background, defaults.background);
        assert_eq!(opts.background_load_delay, defaults.background_load_delay);
        assert_eq!(opts.auto_resize, defaults.auto_resize);
        assert_eq!(opts.enabled, defaults.enabled);
    }

    #[test]
    fn test_snake_case_keys_accepted() {
        let opts = PanelOptions::from_toml_str("scratch_size = 12\nauto_resize = false").unwrap();
        assert_eq!(opts.scratch_size, 12.0);
        assert!(!opts.auto_resize);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PanelOptions::from_toml_str("brushColor = \"red\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_get_set_roundtrip_and_type_check() {
        let mut opts = PanelOptions::default();
        opts.set(OptionKey::Enabled, OptionValue::Flag(false)).unwrap();
        assert_eq!(opts.get(OptionKey::Enabled), OptionValue::Flag(false));

        let err = opts.set(OptionKey::Threshold, OptionValue::Flag(true)).unwrap_err();
        assert!(matches!(err, Error::OptionType { key: "threshold", .. }));
        assert_eq!(opts.threshold, 65.0);

        // No range validation.
        opts.set(OptionKey::Threshold, OptionValue::Number(250.0)).unwrap();
        assert_eq!(opts.get(OptionKey::Threshold), OptionValue::Number(250.0));
    }

    #[test]
    fn test_set_str() {
        let mut opts = PanelOptions::default();
        opts.set_str("scratchSize", "12.5").unwrap();
        opts.set_str("background_load_delay", "10").unwrap();
        opts.set_str("crossOrigin", "use-credentials").unwrap();
        assert_eq!(opts.scratch_size, 12.5);
        assert_eq!(opts.background_load_delay, 10);
        assert_eq!(opts.cross_origin, CrossOrigin::UseCredentials);

        assert!(matches!(opts.set_str("width", "3"), Err(Error::UnknownOption(_))));
        assert!(matches!(opts.set_str("enabled", "yes"), Err(Error::OptionType { .. })));
    }

    #[test]
    fn test_background_parse() {
        assert_eq!(Background::parse(""), None);
        assert_eq!(Background::parse("#000"), Some(Background::Color(Rgba::opaque(0, 0, 0))));
        assert_eq!(Background::parse("b.png"), Some(Background::Image("b.png".to_string())));
        // Not a valid color, treated as an image reference.
        assert_eq!(Background::parse("#nope"), Some(Background::Image("#nope".to_string())));
    }
}
