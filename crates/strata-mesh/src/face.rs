use strata_geom::Vec3;

/// The six axis-aligned face directions, grouped per axis. Quads emitted by
/// the extractor are bucketed per direction and per slice along the axis the
/// face is orthogonal to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    /// Every direction, ordered by `index()`.
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Position of this direction in per-face arrays such as the quad
    /// buckets.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis the face is orthogonal to: 0 for X, 1 for Y, 2 for Z. Picks the
    /// region dimension that slices this face's buckets.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Face::PosX | Face::NegX => 0,
            Face::PosY | Face::NegY => 1,
            Face::PosZ | Face::NegZ => 2,
        }
    }

    /// Grid step from a voxel out through this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Outward unit normal of quads emitted for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }
}
