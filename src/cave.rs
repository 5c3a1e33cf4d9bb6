use crate::config::{BrushSettings, Config};
use crate::decoration::{DecorationPlanner, DecorationRay};

use grotto_map::coordinates::{checked_in_chunk, in_chunk_extent};
use grotto_map::core::work_timer::WorkTimer;
use grotto_map::core::SmallKeyHashMap;
use grotto_map::glam::{IVec3, Vec3};
use grotto_map::{CapsuleField, CaveConfig, Chunk, ChunkBuild, ChunkUnits, Skeleton, SkeletonGrammar, TextureBlend, WorldUnits};

use std::time::Duration;

/// What one generation pass did with its candidate chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GenerationStats {
    pub candidates: usize,
    /// Too far from every skeleton segment to be sampled.
    pub culled: usize,
    /// Sampled or tested, but without any surface.
    pub empty: usize,
    pub kept: usize,
    pub triangles: usize,
    pub elapsed: Duration,
}

/// Texture names for a chunk's blend pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChunkTextures<'a> {
    pub blend: TextureBlend,
    pub lower: &'a str,
    pub upper: &'a str,
    pub lower_normal_map: Option<&'a str>,
    pub upper_normal_map: Option<&'a str>,
}

/// Everything derived by the latest generation pass.
struct Generated {
    skeleton: Skeleton,
    config: CaveConfig,
    field: CapsuleField,
    chunks: SmallKeyHashMap<ChunkUnits<IVec3>, Chunk>,
}

/// Owns the configuration and the chunks of the latest generation pass.
pub struct Cave {
    config: Config,
    generated: Option<Generated>,
}

impl Cave {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generated: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Takes effect on the next [`Self::generate`].
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Grows a new skeleton and rebuilds every chunk. Chunks of the previous pass are dropped first.
    pub fn generate(&mut self) -> GenerationStats {
        self.generated = None;
        let mut timer = WorkTimer::start();

        let skeleton = SkeletonGrammar::generate(&self.config.grammar);
        let config = CaveConfig::derive(
            &self.config.field,
            skeleton.extremes(),
            self.config.textures.textures.len(),
        );
        let field = CapsuleField::build(&skeleton, config.capsule_radius, config.weights);

        let extent = skeleton.extremes().extent();
        log::info!(
            "Cave extent {} to {}, {} capsules, chunk edge {}",
            extent.minimum,
            extent.least_upper_bound(),
            field.len(),
            config.chunk_edge
        );

        let mut stats = GenerationStats::default();
        let mut chunks = SmallKeyHashMap::default();
        let ChunkUnits(candidates) = in_chunk_extent(WorldUnits(extent.padded(config.capsule_reach)), config.chunk_edge);
        for key in candidates.iter3().map(ChunkUnits) {
            stats.candidates += 1;

            let WorldUnits(chunk_extent) = config.chunk_extent(key);
            let too_far = field
                .nearest_segment_distance(chunk_extent.center())
                .map_or(true, |d| d > config.cull_distance);
            if too_far {
                stats.culled += 1;
                continue;
            }

            match timer.time_item(|| Chunk::generate(key, &config, &field)) {
                ChunkBuild::NoCapsules => {
                    log::debug!("Chunk {} has no capsules", key.0);
                    stats.empty += 1;
                }
                ChunkBuild::Empty(_) => {
                    log::debug!("Chunk {} has no surface", key.0);
                    stats.empty += 1;
                }
                ChunkBuild::Meshed(chunk) => {
                    log::debug!("Chunk {} meshed {} triangles", key.0, chunk.num_triangles());
                    stats.kept += 1;
                    stats.triangles += chunk.num_triangles();
                    chunks.insert(key, chunk);
                }
            }
        }

        stats.elapsed = timer.elapsed();
        log::info!(
            "Generated cave in {:?}: {} candidate chunks, {} culled, {} empty, {} kept with {} triangles ({} us per sampled chunk)",
            stats.elapsed,
            stats.candidates,
            stats.culled,
            stats.empty,
            stats.kept,
            stats.triangles,
            timer.average_item_time_us()
        );

        self.generated = Some(Generated {
            skeleton,
            config,
            field,
            chunks,
        });
        stats
    }

    /// The chunk covering `p`, built on demand. A chunk that no capsule reaches starts out entirely outside of the surface.
    ///
    /// `None` until the first [`Self::generate`], and for points that are not finite or lie beyond
    /// [`MAX_WORLD_COORDINATE`](grotto_map::coordinates::MAX_WORLD_COORDINATE).
    pub fn get_or_create_chunk(&mut self, p: WorldUnits<Vec3>) -> Option<&mut Chunk> {
        let Generated {
            config,
            field,
            chunks,
            ..
        } = self.generated.as_mut()?;

        let key = match checked_in_chunk(p, config.chunk_edge) {
            Some(key) => key,
            None => {
                log::warn!("No chunk covers {}", p.0);
                return None;
            }
        };
        let chunk = chunks.entry(key).or_insert_with(|| {
            Chunk::generate(key, config, field)
                .into_chunk()
                .unwrap_or_else(|| Chunk::outside(key, config))
        });
        Some(chunk)
    }

    /// Edits the chunk covering `world_point`. Returns the number of edited samples, or `None` when
    /// [`Self::get_or_create_chunk`] has no chunk for it.
    pub fn brush(&mut self, world_point: Vec3, add: bool, radius: i32, strength: f32) -> Option<usize> {
        let p = WorldUnits(world_point);
        let chunk = self.get_or_create_chunk(p)?;
        Some(chunk.brush(p, add, radius, strength))
    }

    pub fn brush_with(&mut self, world_point: Vec3, add: bool, settings: BrushSettings) -> Option<usize> {
        self.brush(world_point, add, settings.radius, settings.strength)
    }

    /// Resolves the chunk's texture bands to configured names.
    pub fn chunk_textures(&self, chunk: &Chunk) -> Option<ChunkTextures<'_>> {
        let blend = chunk.texture()?;
        let textures = &self.config.textures;
        let lower = textures.texture(blend.lower())?;
        Some(ChunkTextures {
            blend,
            lower,
            upper: textures.texture(blend.upper()).unwrap_or(lower),
            lower_normal_map: textures.normal_map(blend.lower()),
            upper_normal_map: textures.normal_map(blend.upper()),
        })
    }

    /// Rays for stalactites and stalagmites along the current skeleton.
    pub fn plan_decorations(&self) -> Vec<DecorationRay> {
        match self.skeleton() {
            Some(skeleton) => DecorationPlanner::new(self.config.decorations.clone()).plan(skeleton),
            None => Vec::new(),
        }
    }

    pub fn skeleton(&self) -> Option<&Skeleton> {
        self.generated.as_ref().map(|g| &g.skeleton)
    }

    pub fn field(&self) -> Option<&CapsuleField> {
        self.generated.as_ref().map(|g| &g.field)
    }

    pub fn cave_config(&self) -> Option<&CaveConfig> {
        self.generated.as_ref().map(|g| &g.config)
    }

    pub fn chunk(&self, key: ChunkUnits<IVec3>) -> Option<&Chunk> {
        self.generated.as_ref()?.chunks.get(&key)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.generated.iter().flat_map(|g| g.chunks.values())
    }

    pub fn num_chunks(&self) -> usize {
        self.generated.as_ref().map_or(0, |g| g.chunks.len())
    }
}
