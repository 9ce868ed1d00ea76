use thiserror::Error;

/// Errors surfaced by cubic surface extraction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractError {
    /// A region axis exceeds the 255-voxel limit imposed by the single-byte
    /// vertex position encoding. Checked before any allocation.
    #[error("extraction region {width}x{height}x{depth} exceeds 255 voxels on an axis")]
    RegionTooLarge { width: i32, height: i32, depth: i32 },

    /// All eight dedup slots at one grid column were occupied and none
    /// matched the incoming (material, AO) pair. The slot bound is tight for
    /// geometric reasons, so this indicates an internal invariant violation.
    #[error("all eight vertex slots at column ({x}, {y}) are full with no match")]
    SlotSaturated { x: u32, y: u32 },
}
