use strata_geom::IVec3;

/// Index width for a mesh's triangle list. Small regions fit u16 indices,
/// which halves index-buffer memory.
pub trait MeshIndex: Copy + Eq {
    fn from_usize(i: usize) -> Self;
    fn to_usize(self) -> usize;
}

impl MeshIndex for u16 {
    #[inline]
    fn from_usize(i: usize) -> Self {
        i as u16
    }
    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl MeshIndex for u32 {
    #[inline]
    fn from_usize(i: usize) -> Self {
        i as u32
    }
    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// Writer interface the extractor drives. Implemented by [`Mesh`] for both
/// index widths; custom back-ends (e.g. a GPU staging buffer wrapper) can
/// implement it to receive extraction output directly.
pub trait MeshSink {
    type Vertex: Copy;

    fn clear(&mut self);
    fn add_vertex(&mut self, vertex: Self::Vertex) -> u32;
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);
    fn get_vertex(&self, index: u32) -> Self::Vertex;
    fn set_offset(&mut self, offset: IVec3);
    fn remove_unused_vertices(&mut self);
}

/// Growable vertex/index mesh with a world-frame offset.
///
/// Vertices are in the frame of the extraction region; adding the offset
/// (the region's lower corner) to a decoded position yields world
/// coordinates.
#[derive(Clone, Debug)]
pub struct Mesh<V, I = u32> {
    vertices: Vec<V>,
    indices: Vec<I>,
    offset: IVec3,
}

impl<V: Copy, I: MeshIndex> Default for Mesh<V, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Copy, I: MeshIndex> Mesh<V, I> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            offset: IVec3::ZERO,
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[I] {
        &self.indices
    }

    #[inline]
    pub fn offset(&self) -> IVec3 {
        self.offset
    }

    #[inline]
    pub fn set_offset(&mut self, offset: IVec3) {
        self.offset = offset;
    }

    #[inline]
    pub fn add_vertex(&mut self, vertex: V) -> I {
        let index = I::from_usize(self.vertices.len());
        self.vertices.push(vertex);
        index
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: I, i1: I, i2: I) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    #[inline]
    pub fn get_vertex(&self, index: I) -> V {
        self.vertices[index.to_usize()]
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.offset = IVec3::ZERO;
    }

    /// Drops vertices no triangle references and remaps the index list.
    /// Triangle order and winding are preserved.
    pub fn remove_unused_vertices(&mut self) {
        let mut used = vec![false; self.vertices.len()];
        for index in &self.indices {
            used[index.to_usize()] = true;
        }

        let mut remap = vec![0usize; self.vertices.len()];
        let mut write = 0;
        for read in 0..self.vertices.len() {
            if used[read] {
                self.vertices[write] = self.vertices[read];
                remap[read] = write;
                write += 1;
            }
        }
        self.vertices.truncate(write);

        for index in &mut self.indices {
            *index = I::from_usize(remap[index.to_usize()]);
        }
    }
}

impl<V: Copy, I: MeshIndex> MeshSink for Mesh<V, I> {
    type Vertex = V;

    #[inline]
    fn clear(&mut self) {
        Mesh::clear(self);
    }

    #[inline]
    fn add_vertex(&mut self, vertex: V) -> u32 {
        Mesh::add_vertex(self, vertex).to_usize() as u32
    }

    #[inline]
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        Mesh::add_triangle(
            self,
            I::from_usize(i0 as usize),
            I::from_usize(i1 as usize),
            I::from_usize(i2 as usize),
        );
    }

    #[inline]
    fn get_vertex(&self, index: u32) -> V {
        Mesh::get_vertex(self, I::from_usize(index as usize))
    }

    #[inline]
    fn set_offset(&mut self, offset: IVec3) {
        Mesh::set_offset(self, offset);
    }

    #[inline]
    fn remove_unused_vertices(&mut self) {
        Mesh::remove_unused_vertices(self);
    }
}
