//! World-space voxel coordinates and their chunk decomposition.
//!
//! Chunks are full-height columns of `16 x 16` voxels. The chunk a voxel
//! belongs to is found with an arithmetic right shift, so negative
//! coordinates floor toward negative infinity (`-1` lives in chunk `-1`).

use serde::{Deserialize, Serialize};

/// Bits to shift a world X/Z coordinate by to get its chunk coordinate.
pub const CHUNK_SHIFT: u32 = 4;

/// Width of a chunk along X and Z, in voxels.
pub const CHUNK_WIDTH: i32 = 1 << CHUNK_SHIFT;

const LOCAL_MASK: i32 = CHUNK_WIDTH - 1;

/// A voxel position in world space. No bounds are enforced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    /// World X.
    pub x: i32,
    /// World Y.
    pub y: i32,
    /// World Z.
    pub z: i32,
}

impl VoxelCoord {
    /// Creates a new coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the key of the chunk column containing this voxel.
    pub const fn chunk_key(self) -> ChunkKey {
        ChunkKey {
            x: self.x >> CHUNK_SHIFT,
            z: self.z >> CHUNK_SHIFT,
        }
    }

    /// Returns this voxel's position relative to its chunk.
    pub const fn local(self) -> LocalPos {
        LocalPos {
            x: (self.x & LOCAL_MASK) as u8,
            y: self.y,
            z: (self.z & LOCAL_MASK) as u8,
        }
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

/// Identifies a chunk column by its chunk-grid X and Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkKey {
    /// Creates a new chunk key.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// World coordinate of this chunk's minimum corner at height `y`.
    pub const fn origin(self, y: i32) -> VoxelCoord {
        VoxelCoord {
            x: self.x << CHUNK_SHIFT,
            y,
            z: self.z << CHUNK_SHIFT,
        }
    }

    /// Converts a local position inside this chunk back to world space.
    pub const fn to_world(self, local: LocalPos) -> VoxelCoord {
        VoxelCoord {
            x: (self.x << CHUNK_SHIFT) + local.x as i32,
            y: local.y,
            z: (self.z << CHUNK_SHIFT) + local.z as i32,
        }
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Position inside a chunk column: `x` and `z` in `[0, 16)`, `y` unchanged.
///
/// Fields are private so every value goes through the masking in
/// [`LocalPos::new`] or [`VoxelCoord::local`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalPos {
    x: u8,
    y: i32,
    z: u8,
}

impl LocalPos {
    /// Creates a local position. `x` and `z` are masked into `[0, 16)`.
    pub const fn new(x: u8, y: i32, z: u8) -> Self {
        Self {
            x: x & LOCAL_MASK as u8,
            y,
            z: z & LOCAL_MASK as u8,
        }
    }

    /// Local X in `[0, 16)`.
    pub const fn x(self) -> u8 {
        self.x
    }

    /// World Y (chunks span the full height).
    pub const fn y(self) -> i32 {
        self.y
    }

    /// Local Z in `[0, 16)`.
    pub const fn z(self) -> u8 {
        self.z
    }
}
