//! Procedural caves: an L-system skeleton, thickened into an anisotropic distance field, meshed chunk by chunk with
//! marching cubes.
//!
//! [`Cave`] runs whole generation passes and brush edits. The model itself lives in [`grotto_map`].

mod cave;
mod config;

pub mod decoration;

pub use cave::{Cave, ChunkTextures, GenerationStats};
pub use config::{BrushSettings, Config, ConfigError, TextureSettings};
pub use decoration::{DecorationPlanner, DecorationRay, DecorationSettings};

pub use grotto_map as map;
