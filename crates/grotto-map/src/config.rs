use crate::capsule::{capsule_reach, DepthWeights, WeightTriple};
use crate::coordinates::chunk_extent;
use crate::core::ilattice::prelude::Extent;
use crate::noise::CaveNoise;
use crate::skeleton::Extremes;
use crate::texture::TextureBands;
use crate::units::{ChunkUnits, WorldUnits};
use crate::glam::{IVec3, Vec3};

use serde::{Deserialize, Serialize};

pub const MAX_WALL_BUMPINESS: f32 = 0.999;
pub const MAX_WALL_BUMPINESS_AMP: f32 = 100.0;

/// Chunk edges are capped here, so that near-zero weight components can't blow a chunk's grid up to gigabytes.
pub const MAX_CHUNK_EDGE: i32 = 64;

/// Samples that belong to no capsule get this multiple of the terrain surface, which is always outside.
pub const OUTSIDE_SAMPLE_SCALE: f32 = 1.5;

/// User-facing settings of the capsule field.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct FieldSettings {
    /// Terrain surface threshold.
    pub tunnel_radius: f32,
    pub top_weight: WeightTriple,
    pub bottom_weight: WeightTriple,
    /// Frequency scale of the wall noise, in `[0, 0.999]`.
    pub wall_bumpiness: f32,
    /// Amplitude of the wall noise, in `[0, 100]`.
    pub wall_bumpiness_amp: f32,
    pub noise_seed: u32,
    pub octree_capacity: usize,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            tunnel_radius: 8.0,
            top_weight: WeightTriple::default(),
            bottom_weight: WeightTriple::default(),
            wall_bumpiness: 0.187,
            wall_bumpiness_amp: 0.0,
            noise_seed: 0,
            octree_capacity: 8,
        }
    }
}

impl FieldSettings {
    /// Clamps out-of-range values, logging each one.
    pub fn sanitized(mut self) -> Self {
        let bumpiness = self.wall_bumpiness.clamp(0.0, MAX_WALL_BUMPINESS);
        if bumpiness != self.wall_bumpiness {
            log::warn!("wall_bumpiness {} clamped to {}", self.wall_bumpiness, bumpiness);
            self.wall_bumpiness = bumpiness;
        }
        let amp = self.wall_bumpiness_amp.clamp(0.0, MAX_WALL_BUMPINESS_AMP);
        if amp != self.wall_bumpiness_amp {
            log::warn!("wall_bumpiness_amp {} clamped to {}", self.wall_bumpiness_amp, amp);
            self.wall_bumpiness_amp = amp;
        }
        if self.octree_capacity == 0 {
            log::warn!("octree_capacity 0 raised to 1");
            self.octree_capacity = 1;
        }
        self
    }
}

/// Everything one generation pass derives before building chunks. Read-only for the rest of the pass.
#[derive(Clone, Debug)]
pub struct CaveConfig {
    /// Samples below this value are inside the cave.
    pub terrain_surface: f32,
    /// The terrain surface plus the weight anisotropy. Capsules reach past the surface so that samples just outside of
    /// it still hold their true distance.
    pub capsule_radius: f32,
    pub chunk_edge: i32,
    pub weights: DepthWeights,
    /// Euclidean bound on the distance from a contained point to its capsule's segment.
    pub capsule_reach: f32,
    /// Chunks whose center is farther than this from every skeleton segment are culled.
    pub cull_distance: f32,
    pub extremes: Extremes,
    pub textures: TextureBands,
    pub bumpiness: f32,
    pub bumpiness_amp: f32,
    pub octree_capacity: usize,
    pub noise: CaveNoise,
}

impl CaveConfig {
    pub fn derive(settings: &FieldSettings, extremes: &Extremes, texture_count: usize) -> Self {
        let settings = settings.sanitized();
        let terrain_surface = settings.tunnel_radius;
        let weights = DepthWeights::new(settings.top_weight, settings.bottom_weight, extremes);
        let capsule_radius = terrain_surface + weights.anisotropy();
        let chunk_edge = chunk_edge_length(terrain_surface, weights.anisotropy());
        let capsule_reach = capsule_reach(capsule_radius, weights.min_component());
        let half_diagonal = 0.5 * 3f32.sqrt() * chunk_edge as f32;

        Self {
            terrain_surface,
            capsule_radius,
            chunk_edge,
            weights,
            capsule_reach,
            cull_distance: half_diagonal + capsule_reach,
            extremes: *extremes,
            textures: TextureBands::new(extremes, chunk_edge, texture_count),
            bumpiness: settings.wall_bumpiness,
            bumpiness_amp: settings.wall_bumpiness_amp,
            octree_capacity: settings.octree_capacity,
            noise: CaveNoise::new(settings.noise_seed),
        }
    }

    pub fn outside_sample(&self) -> f32 {
        OUTSIDE_SAMPLE_SCALE * self.terrain_surface
    }

    pub fn chunk_extent(&self, key: ChunkUnits<IVec3>) -> WorldUnits<Extent<Vec3>> {
        chunk_extent(key, self.chunk_edge)
    }
}

/// `floor(terrain_surface + anisotropy)` in `[1, MAX_CHUNK_EDGE]`. Hitting the cap is logged.
pub fn chunk_edge_length(terrain_surface: f32, anisotropy: f32) -> i32 {
    let edge = (terrain_surface + anisotropy).floor();
    if edge.is_nan() {
        return 1;
    }
    if edge > MAX_CHUNK_EDGE as f32 {
        log::warn!(
            "Chunk edge {} (terrain surface {} + anisotropy {}) capped to {}",
            edge,
            terrain_surface,
            anisotropy,
            MAX_CHUNK_EDGE
        );
        return MAX_CHUNK_EDGE;
    }
    (edge as i32).max(1)
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
