/// Maximum number of vertices that may share one grid position.
///
/// Vertices at the same corner are reused when material and AO match, but a
/// corner surrounded by a 2x2x2 group of distinct, partially transparent
/// voxels can legitimately need one vertex per voxel: eight in total.
pub const MAX_VERTICES_PER_POSITION: usize = 8;

/// One occupied dedup slot: the mesh index of a vertex already emitted at
/// this position, plus the attributes that decide reuse.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VertexSlot<V> {
    pub index: u32,
    pub material: V,
    pub ambient_occlusion: u8,
}

/// Per-slice vertex dedup table: for every (x, y) corner of a slice, up to
/// [`MAX_VERTICES_PER_POSITION`] candidate vertices. Stored as one flat
/// buffer, contiguous along the slot axis; `None` marks an unused slot.
///
/// The extractor keeps two of these (the slice being finished and the next
/// one) and swaps them after every z step.
pub(crate) struct VertexSlots<V> {
    dim_x: usize,
    slots: Vec<Option<VertexSlot<V>>>,
}

impl<V: Copy> VertexSlots<V> {
    pub fn new(dim_x: usize, dim_y: usize) -> Self {
        Self {
            dim_x,
            slots: vec![None; dim_x * dim_y * MAX_VERTICES_PER_POSITION],
        }
    }

    /// Marks every slot unused.
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    /// The slot run for one (x, y) corner.
    #[inline]
    pub fn column_mut(&mut self, x: u32, y: u32) -> &mut [Option<VertexSlot<V>>] {
        let base = (y as usize * self.dim_x + x as usize) * MAX_VERTICES_PER_POSITION;
        &mut self.slots[base..base + MAX_VERTICES_PER_POSITION]
    }
}
