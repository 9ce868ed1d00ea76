use strata_geom::IVec3;

use crate::RawVolume;

/// Positioned cursor over a voxel volume.
///
/// The mesher walks rows with `set_position` plus `move_positive_x`, reads
/// the 26 unit neighbours through the named peeks, and briefly steps
/// backwards along an axis when emitting the positive-direction faces. The
/// named peeks follow the `<dx><dy><dz>` sign-and-magnitude convention
/// (`1nx` = one step along negative X, `0py` = no Y step) and are all
/// provided in terms of [`VolumeSampler::peek_voxel`].
pub trait VolumeSampler {
    type Voxel: Copy + Eq;

    fn set_position(&mut self, x: i32, y: i32, z: i32);
    fn position(&self) -> IVec3;
    fn get_voxel(&self) -> Self::Voxel;

    /// Reads the voxel at the given offset from the current position without
    /// moving. Offsets are expected to be in `-1..=1` per axis.
    fn peek_voxel(&self, dx: i32, dy: i32, dz: i32) -> Self::Voxel;

    fn move_positive_x(&mut self);
    fn move_positive_y(&mut self);
    fn move_positive_z(&mut self);
    fn move_negative_x(&mut self);
    fn move_negative_y(&mut self);
    fn move_negative_z(&mut self);

    // Face neighbours.
    #[inline]
    fn peek_voxel_1nx0py0pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 0, 0)
    }
    #[inline]
    fn peek_voxel_1px0py0pz(&self) -> Self::Voxel {
        self.peek_voxel(1, 0, 0)
    }
    #[inline]
    fn peek_voxel_0px1ny0pz(&self) -> Self::Voxel {
        self.peek_voxel(0, -1, 0)
    }
    #[inline]
    fn peek_voxel_0px1py0pz(&self) -> Self::Voxel {
        self.peek_voxel(0, 1, 0)
    }
    #[inline]
    fn peek_voxel_0px0py1nz(&self) -> Self::Voxel {
        self.peek_voxel(0, 0, -1)
    }
    #[inline]
    fn peek_voxel_0px0py1pz(&self) -> Self::Voxel {
        self.peek_voxel(0, 0, 1)
    }

    // Edge neighbours.
    #[inline]
    fn peek_voxel_1nx1ny0pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, -1, 0)
    }
    #[inline]
    fn peek_voxel_1nx1py0pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 1, 0)
    }
    #[inline]
    fn peek_voxel_1px1ny0pz(&self) -> Self::Voxel {
        self.peek_voxel(1, -1, 0)
    }
    #[inline]
    fn peek_voxel_1px1py0pz(&self) -> Self::Voxel {
        self.peek_voxel(1, 1, 0)
    }
    #[inline]
    fn peek_voxel_1nx0py1nz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 0, -1)
    }
    #[inline]
    fn peek_voxel_1nx0py1pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 0, 1)
    }
    #[inline]
    fn peek_voxel_1px0py1nz(&self) -> Self::Voxel {
        self.peek_voxel(1, 0, -1)
    }
    #[inline]
    fn peek_voxel_1px0py1pz(&self) -> Self::Voxel {
        self.peek_voxel(1, 0, 1)
    }
    #[inline]
    fn peek_voxel_0px1ny1nz(&self) -> Self::Voxel {
        self.peek_voxel(0, -1, -1)
    }
    #[inline]
    fn peek_voxel_0px1ny1pz(&self) -> Self::Voxel {
        self.peek_voxel(0, -1, 1)
    }
    #[inline]
    fn peek_voxel_0px1py1nz(&self) -> Self::Voxel {
        self.peek_voxel(0, 1, -1)
    }
    #[inline]
    fn peek_voxel_0px1py1pz(&self) -> Self::Voxel {
        self.peek_voxel(0, 1, 1)
    }

    // Corner neighbours.
    #[inline]
    fn peek_voxel_1nx1ny1nz(&self) -> Self::Voxel {
        self.peek_voxel(-1, -1, -1)
    }
    #[inline]
    fn peek_voxel_1nx1ny1pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, -1, 1)
    }
    #[inline]
    fn peek_voxel_1nx1py1nz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 1, -1)
    }
    #[inline]
    fn peek_voxel_1nx1py1pz(&self) -> Self::Voxel {
        self.peek_voxel(-1, 1, 1)
    }
    #[inline]
    fn peek_voxel_1px1ny1nz(&self) -> Self::Voxel {
        self.peek_voxel(1, -1, -1)
    }
    #[inline]
    fn peek_voxel_1px1ny1pz(&self) -> Self::Voxel {
        self.peek_voxel(1, -1, 1)
    }
    #[inline]
    fn peek_voxel_1px1py1nz(&self) -> Self::Voxel {
        self.peek_voxel(1, 1, -1)
    }
    #[inline]
    fn peek_voxel_1px1py1pz(&self) -> Self::Voxel {
        self.peek_voxel(1, 1, 1)
    }
}

/// Sampler over a [`RawVolume`].
#[derive(Clone, Debug)]
pub struct RawVolumeSampler<'a, V> {
    volume: &'a RawVolume<V>,
    x: i32,
    y: i32,
    z: i32,
}

impl<'a, V: Copy + Eq> RawVolumeSampler<'a, V> {
    #[inline]
    pub fn new(volume: &'a RawVolume<V>) -> Self {
        let lower = volume.extent().lower_corner();
        Self {
            volume,
            x: lower.x,
            y: lower.y,
            z: lower.z,
        }
    }
}

impl<V: Copy + Eq> VolumeSampler for RawVolumeSampler<'_, V> {
    type Voxel = V;

    #[inline]
    fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    #[inline]
    fn position(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    #[inline]
    fn get_voxel(&self) -> V {
        self.volume.voxel_at(self.x, self.y, self.z)
    }

    #[inline]
    fn peek_voxel(&self, dx: i32, dy: i32, dz: i32) -> V {
        self.volume.voxel_at(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    fn move_positive_x(&mut self) {
        self.x += 1;
    }

    #[inline]
    fn move_positive_y(&mut self) {
        self.y += 1;
    }

    #[inline]
    fn move_positive_z(&mut self) {
        self.z += 1;
    }

    #[inline]
    fn move_negative_x(&mut self) {
        self.x -= 1;
    }

    #[inline]
    fn move_negative_y(&mut self) {
        self.y -= 1;
    }

    #[inline]
    fn move_negative_z(&mut self) {
        self.z -= 1;
    }
}
