//! The grotto cave model.
//!
//! # Skeleton
//!
//! A cave starts as a [`Skeleton`](crate::skeleton::Skeleton): a forest of polylines traced by a turtle that interprets
//! the word of a small rewriting grammar. Every rewrite replaces each forward move `F` with one row of the
//! [`RuleTable`](crate::skeleton::RuleTable), so the word (and the cave) grows with every generation.
//!
//! # Field
//!
//! Each consecutive pair of skeleton points becomes a [`Capsule`](crate::capsule::Capsule). The field value at a point is
//! the smallest anisotropic distance to a capsule that contains it, where the per-axis weights are interpolated between
//! the top and bottom of the skeleton. Values below the terrain surface are open cave; everything else is rock.
//!
//! # Chunks
//!
//! Space is cut into cube [`Chunk`](crate::chunk::Chunk)s whose edge is derived from the tunnel radius and the weight
//! anisotropy. A chunk indexes its grid corners in a [`SpatialOctree`](crate::octree::SpatialOctree), samples the field
//! only where a capsule reaches, and meshes the result with marching cubes. Neighboring chunks share their boundary
//! samples, and brush edits never touch them, so meshes meet without seams.

pub mod capsule;
pub mod chunk;
pub mod config;
pub mod coordinates;
pub mod grid;
pub mod marching_cubes;
pub mod noise;
pub mod octree;
pub mod skeleton;
pub mod texture;
pub mod units;

pub use capsule::{Capsule, CapsuleField, CapsuleId, DepthWeights, WeightTriple};
pub use chunk::{Chunk, ChunkBuild};
pub use config::{CaveConfig, FieldSettings};
pub use marching_cubes::ChunkMesh;
pub use skeleton::{GrammarConfig, GrammarError, Skeleton, SkeletonGrammar};
pub use texture::{TextureBands, TextureBlend};
pub use units::{ChunkUnits, WorldUnits};

pub use grotto_core as core;
pub use grotto_core::glam;
