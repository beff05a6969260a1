//! Configuration types for ruler rendering.

use crate::error::{Result, RulerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// An RGB triple with components in `[0, 1]`.
pub type Rgb = [f64; 3];

/// Convert a unit-range color to 8-bit channels.
pub fn to_rgb8(color: Rgb) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Ruler appearance and behaviour settings.
///
/// Field names mirror the keys carried by configuration-change notifications,
/// see [`ConfigKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulerConfig {
    /// Pixel size of the ruler glyph font. Selects the
    /// `fonts/ruler-font{N}px` asset directory.
    /// Default: 5.
    pub ruler_font_size: u32,

    /// Foreground (ticks, labels) color.
    /// Default: black.
    pub ruler_fg: Rgb,

    /// Background color.
    /// Default: white.
    pub ruler_bg: Rgb,

    /// Length of unlabeled ticks in pixels.
    /// Default: 5.
    pub ruler_small_tick: u32,

    /// Length of labeled ticks in pixels.
    /// Default: 10.
    pub ruler_large_tick: u32,

    /// Label offset across the ruler strip.
    /// Default: 0.
    pub ruler_text_vshift: i32,

    /// Label offset along the ruler axis.
    /// Default: 3.
    pub ruler_text_hshift: i32,

    /// Snap distance in pixels; ticks are never denser than `snap_distance + 3`.
    /// Default: 10.
    pub snap_distance: f64,

    /// Root of the `fonts/` and `icons/` asset directories.
    /// Default: `resources`.
    pub resource_dir: PathBuf,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            ruler_font_size: 5,
            ruler_fg: [0.0, 0.0, 0.0],
            ruler_bg: [1.0, 1.0, 1.0],
            ruler_small_tick: 5,
            ruler_large_tick: 10,
            ruler_text_vshift: 0,
            ruler_text_hshift: 3,
            snap_distance: 10.0,
            resource_dir: PathBuf::from("resources"),
        }
    }
}

impl RulerConfig {
    /// Create a config reading assets from `resource_dir`.
    pub fn with_resource_dir(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            ..Default::default()
        }
    }

    /// Set the glyph font size.
    pub fn font_size(mut self, size: u32) -> Self {
        self.ruler_font_size = size;
        self
    }

    /// Set the foreground color.
    pub fn foreground(mut self, color: Rgb) -> Self {
        self.ruler_fg = color;
        self
    }

    /// Set the background color.
    pub fn background(mut self, color: Rgb) -> Self {
        self.ruler_bg = color;
        self
    }

    /// Set the small and large tick lengths.
    pub fn tick_lengths(mut self, small: u32, large: u32) -> Self {
        self.ruler_small_tick = small;
        self.ruler_large_tick = large;
        self
    }

    /// Set the snap distance.
    pub fn snap_distance(mut self, distance: f64) -> Self {
        self.snap_distance = distance;
        self
    }

    /// Minimum on-screen tick pitch in pixels.
    pub fn min_tick_pitch(&self) -> f64 {
        self.snap_distance + crate::ticks::SNAP_PITCH_MARGIN
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.ruler_font_size == 0 {
            return Err(RulerError::InvalidConfig(
                "ruler_font_size must be at least 1".to_string(),
            ));
        }
        for (name, color) in [("ruler_fg", self.ruler_fg), ("ruler_bg", self.ruler_bg)] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(RulerError::InvalidConfig(format!(
                    "{} components must be within [0, 1], got {:?}",
                    name, color
                )));
            }
        }
        if !self.snap_distance.is_finite() || self.snap_distance < 0.0 {
            return Err(RulerError::InvalidConfig(format!(
                "snap_distance must be a non-negative number, got {}",
                self.snap_distance
            )));
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save_json_file(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Merge a JSON object of `key -> value` overrides into this config.
    ///
    /// The merge is all-or-nothing: an unknown key, a badly typed value or a
    /// result that fails validation leaves `self` untouched. Returns the keys
    /// whose values actually changed, in the order they were given.
    pub fn apply_overrides(&mut self, overrides: &serde_json::Value) -> Result<Vec<ConfigKey>> {
        let overrides = overrides.as_object().ok_or_else(|| {
            RulerError::InvalidConfig("overrides must be a JSON object".to_string())
        })?;

        let current = serde_json::to_value(&*self)?;
        let mut merged = current.clone();
        let mut keys = Vec::with_capacity(overrides.len());
        if let Some(fields) = merged.as_object_mut() {
            for (name, value) in overrides {
                keys.push(name.parse::<ConfigKey>()?);
                fields.insert(name.clone(), value.clone());
            }
        }

        let updated: Self = serde_json::from_value(merged)?;
        updated.validate()?;
        let updated_value = serde_json::to_value(&updated)?;

        let changed = keys
            .into_iter()
            .filter(|key| current.get(key.as_str()) != updated_value.get(key.as_str()))
            .collect();
        *self = updated;
        Ok(changed)
    }
}

/// Names of the configuration entries a ruler reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    FontSize,
    Foreground,
    Background,
    SmallTick,
    LargeTick,
    TextVShift,
    TextHShift,
    SnapDistance,
    ResourceDir,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::FontSize,
        ConfigKey::Foreground,
        ConfigKey::Background,
        ConfigKey::SmallTick,
        ConfigKey::LargeTick,
        ConfigKey::TextVShift,
        ConfigKey::TextHShift,
        ConfigKey::SnapDistance,
        ConfigKey::ResourceDir,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::FontSize => "ruler_font_size",
            ConfigKey::Foreground => "ruler_fg",
            ConfigKey::Background => "ruler_bg",
            ConfigKey::SmallTick => "ruler_small_tick",
            ConfigKey::LargeTick => "ruler_large_tick",
            ConfigKey::TextVShift => "ruler_text_vshift",
            ConfigKey::TextHShift => "ruler_text_hshift",
            ConfigKey::SnapDistance => "snap_distance",
            ConfigKey::ResourceDir => "resource_dir",
        }
    }

    /// Whether a change to this key invalidates the tinted glyph atlases.
    ///
    /// A new `resource_dir` needs a new glyph source, which is the owner of
    /// the [`AtlasCache`](crate::atlas::AtlasCache)'s business.
    pub fn affects_glyphs(&self) -> bool {
        matches!(self, ConfigKey::FontSize | ConfigKey::Foreground)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = RulerError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| RulerError::UnknownConfigKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ruler_config_defaults() {
        let config = RulerConfig::default();
        assert_eq!(config.ruler_font_size, 5);
        assert_eq!(config.ruler_fg, [0.0, 0.0, 0.0]);
        assert_eq!(config.ruler_bg, [1.0, 1.0, 1.0]);
        assert_eq!(config.ruler_small_tick, 5);
        assert_eq!(config.ruler_large_tick, 10);
        assert_eq!(config.snap_distance, 10.0);
        assert_eq!(config.min_tick_pitch(), 13.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ruler_config_builder_pattern() {
        let config = RulerConfig::with_resource_dir("/opt/res")
            .font_size(7)
            .foreground([0.2, 0.2, 0.2])
            .tick_lengths(3, 8)
            .snap_distance(4.0);

        assert_eq!(config.resource_dir, PathBuf::from("/opt/res"));
        assert_eq!(config.ruler_font_size, 7);
        assert_eq!(config.ruler_small_tick, 3);
        assert_eq!(config.ruler_large_tick, 8);
        assert_eq!(config.min_tick_pitch(), 7.0);
    }

    #[test]
    fn test_ruler_config_validation_zero_font() {
        let config = RulerConfig::default().font_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ruler_config_validation_color_out_of_range() {
        let config = RulerConfig::default().foreground([0.0, 1.5, 0.0]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ruler_config_validation_negative_snap() {
        let config = RulerConfig::default().snap_distance(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_rgb8() {
        assert_eq!(to_rgb8([0.0, 0.5, 1.0]), [0, 128, 255]);
        assert_eq!(to_rgb8([-0.1, 2.0, 0.2]), [0, 255, 51]);
    }

    #[test]
    fn test_config_key_round_trip_names() {
        for key in ConfigKey::ALL {
            assert_eq!(key.as_str().parse::<ConfigKey>().unwrap(), key);
        }
        assert!("grid_color".parse::<ConfigKey>().is_err());
    }

    #[test]
    fn test_config_key_affects_glyphs() {
        assert!(ConfigKey::FontSize.affects_glyphs());
        assert!(ConfigKey::Foreground.affects_glyphs());
        assert!(!ConfigKey::Background.affects_glyphs());
        assert!(!ConfigKey::SnapDistance.affects_glyphs());
        assert!(!ConfigKey::ResourceDir.affects_glyphs());
    }

    #[test]
    fn test_apply_overrides_reports_changed_keys() {
        let mut config = RulerConfig::default();
        let changed = config
            .apply_overrides(&json!({
                "ruler_font_size": 7,
                "ruler_bg": [1.0, 1.0, 1.0],
                "snap_distance": 4.0,
            }))
            .unwrap();

        assert_eq!(changed, vec![ConfigKey::FontSize, ConfigKey::SnapDistance]);
        assert_eq!(config.ruler_font_size, 7);
        assert_eq!(config.snap_distance, 4.0);
    }

    #[test]
    fn test_apply_overrides_unknown_key_leaves_config() {
        let mut config = RulerConfig::default();
        let err = config
            .apply_overrides(&json!({"ruler_font_size": 9, "grid_color": "red"}))
            .unwrap_err();
        assert!(matches!(err, RulerError::UnknownConfigKey(_)));
        assert_eq!(config, RulerConfig::default());
    }

    #[test]
    fn test_apply_overrides_invalid_value_leaves_config() {
        let mut config = RulerConfig::default();
        assert!(config.apply_overrides(&json!({"ruler_font_size": 0})).is_err());
        assert!(config.apply_overrides(&json!({"ruler_fg": "black"})).is_err());
        assert!(config.apply_overrides(&json!([1, 2])).is_err());
        assert_eq!(config, RulerConfig::default());
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ruler.json");
        let config = RulerConfig::default().font_size(6).snap_distance(2.0);
        config.save_json_file(&path).unwrap();
        assert_eq!(RulerConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_json_missing_keys_take_defaults() {
        let config: RulerConfig = serde_json::from_str(r#"{"ruler_font_size": 8}"#).unwrap();
        assert_eq!(config.ruler_font_size, 8);
        assert_eq!(config.ruler_large_tick, 10);
    }
}
