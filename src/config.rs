use crate::decoration::DecorationSettings;

use grotto_map::{FieldSettings, GrammarConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub grammar: GrammarConfig,
    pub field: FieldSettings,
    pub textures: TextureSettings,
    pub decorations: DecorationSettings,
    pub brush: BrushSettings,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

impl Config {
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let reader = std::fs::File::open(path)?;

        Ok(ron::de::from_reader(reader)?)
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }
}

/// Texture names by depth band. Index 0 is the deepest band.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TextureSettings {
    pub textures: Vec<String>,
    /// Normal maps matching `textures` index for index. May be empty.
    pub normal_maps: Vec<String>,
    pub texture_scale: f32,
}

impl TextureSettings {
    pub fn texture(&self, band: usize) -> Option<&str> {
        self.textures.get(band).map(String::as_str)
    }

    pub fn normal_map(&self, band: usize) -> Option<&str> {
        self.normal_maps.get(band).map(String::as_str)
    }
}

/// Defaults for brush edits made through [`Cave::brush_with`](crate::Cave::brush_with).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BrushSettings {
    /// L∞ radius in samples.
    pub radius: i32,
    pub strength: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            radius: 2,
            strength: 1.0,
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = Config::from_ron_str("(brush: (radius: 4), field: (tunnel_radius: 3.5))").unwrap();
        assert_eq!(config.brush.radius, 4);
        assert_eq!(config.brush.strength, 1.0);
        assert_eq!(config.field.tunnel_radius, 3.5);
        assert_eq!(config.grammar, GrammarConfig::default());
    }

    #[test]
    fn bad_syntax_is_a_parse_error() {
        assert!(matches!(Config::from_ron_str("(brush: "), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Config::read_file("/definitely/not/a/cave.ron"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn texture_lookup_tolerates_missing_normal_maps() {
        let textures = TextureSettings {
            textures: vec!["mud".into(), "limestone".into()],
            ..Default::default()
        };
        assert_eq!(textures.texture(1), Some("limestone"));
        assert_eq!(textures.texture(2), None);
        assert_eq!(textures.normal_map(0), None);
    }
}
