use strata_geom::Vec3;

/// Packed vertex record emitted by the cubic extractor.
///
/// The position is stored as the corner's 0-based offset from the region's
/// lower corner, one byte per axis; this is what caps extraction regions at
/// 255 voxels per axis. Decoding shifts by half a voxel so corners land
/// between voxel centres.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CubicVertex<V> {
    pub encoded_position: [u8; 3],
    pub data: V,
    /// 0 darkest, 3 unoccluded.
    pub ambient_occlusion: u8,
}

/// Decoded vertex in the mesh's local frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex<V> {
    pub position: Vec3,
    /// Not calculated by the cubic extractor; downstream code may derive
    /// normals from face orientation.
    pub normal: Vec3,
    pub data: V,
    pub ambient_occlusion: u8,
}

/// Maps an encoded corner offset to its local-frame position.
#[inline]
pub fn decode_position(encoded_position: [u8; 3]) -> Vec3 {
    Vec3::new(
        encoded_position[0] as f32 - 0.5,
        encoded_position[1] as f32 - 0.5,
        encoded_position[2] as f32 - 0.5,
    )
}

/// Expands a packed cubic vertex into its decoded form.
#[inline]
pub fn decode_vertex<V: Copy>(cubic: CubicVertex<V>) -> Vertex<V> {
    Vertex {
        position: decode_position(cubic.encoded_position),
        normal: Vec3::ZERO,
        data: cubic.data,
        ambient_occlusion: cubic.ambient_occlusion,
    }
}
