use crate::mesh::MeshSink;
use crate::vertex::CubicVertex;

/// Four mesh-vertex indices in winding order for the face's outward normal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quad {
    pub vertices: [u32; 4],
}

impl Quad {
    #[inline]
    pub fn new(v0: u32, v1: u32, v2: u32, v3: u32) -> Self {
        Self {
            vertices: [v0, v1, v2, v3],
        }
    }
}

/// Vertices are interchangeable for merging when material and AO agree;
/// position is covered by the shared-edge index checks.
#[inline]
fn is_same_vertex<V: Copy + Eq>(a: CubicVertex<V>, b: CubicVertex<V>) -> bool {
    a.data == b.data && a.ambient_occlusion == b.ambient_occlusion
}

/// Grows `q1` over `q2` when the two quads look identical corner-for-corner
/// and share exactly one edge. The second quad can sit on any of the four
/// sides of the first, giving four index patterns to test.
pub(crate) fn try_merge_quads<V, M>(q1: &mut Quad, q2: &Quad, mesh: &M) -> bool
where
    V: Copy + Eq,
    M: MeshSink<Vertex = CubicVertex<V>>,
{
    for corner in 0..4 {
        if !is_same_vertex(
            mesh.get_vertex(q1.vertices[corner]),
            mesh.get_vertex(q2.vertices[corner]),
        ) {
            return false;
        }
    }

    if q1.vertices[0] == q2.vertices[1] && q1.vertices[3] == q2.vertices[2] {
        q1.vertices[0] = q2.vertices[0];
        q1.vertices[3] = q2.vertices[3];
        true
    } else if q1.vertices[3] == q2.vertices[0] && q1.vertices[2] == q2.vertices[1] {
        q1.vertices[3] = q2.vertices[3];
        q1.vertices[2] = q2.vertices[2];
        true
    } else if q1.vertices[1] == q2.vertices[0] && q1.vertices[2] == q2.vertices[3] {
        q1.vertices[1] = q2.vertices[1];
        q1.vertices[2] = q2.vertices[2];
        true
    } else if q1.vertices[0] == q2.vertices[3] && q1.vertices[1] == q2.vertices[2] {
        q1.vertices[0] = q2.vertices[0];
        q1.vertices[1] = q2.vertices[1];
        true
    } else {
        false
    }
}

/// One greedy pass over a bucket: fixes each quad in turn and folds any
/// mergeable successor into it. Returns whether anything merged; the caller
/// repeats until a pass comes back false.
pub(crate) fn perform_quad_merging<V, M>(quads: &mut Vec<Quad>, mesh: &M) -> bool
where
    V: Copy + Eq,
    M: MeshSink<Vertex = CubicVertex<V>>,
{
    let mut did_merge = false;
    let mut outer = 0;
    while outer < quads.len() {
        let mut inner = outer + 1;
        while inner < quads.len() {
            let q2 = quads[inner];
            if try_merge_quads(&mut quads[outer], &q2, mesh) {
                did_merge = true;
                quads.remove(inner);
            } else {
                inner += 1;
            }
        }
        outer += 1;
    }
    did_merge
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn vert(data: u8, ao: u8) -> CubicVertex<u8> {
        CubicVertex {
            encoded_position: [0, 0, 0],
            data,
            ambient_occlusion: ao,
        }
    }

    /// Two unit quads sharing the v1/v2 edge of the first (second to its
    /// right), all corners identical in attributes.
    fn side_by_side(ao: [u8; 8]) -> (Mesh<CubicVertex<u8>, u32>, Quad, Quad) {
        let mut mesh = Mesh::new();
        let idx: Vec<u32> = (0..8).map(|i| mesh.add_vertex(vert(1, ao[i]))).collect();
        // q1 corners 0..4; q2 shares q1's right edge: q2.v0 == q1.v1 and
        // q2.v3 == q1.v2.
        let q1 = Quad::new(idx[0], idx[1], idx[2], idx[3]);
        let q2 = Quad::new(idx[1], idx[4], idx[5], idx[2]);
        (mesh, q1, q2)
    }

    #[test]
    fn merges_right_neighbour() {
        let (mesh, mut q1, q2) = side_by_side([3; 8]);
        assert!(try_merge_quads(&mut q1, &q2, &mesh));
        assert_eq!(q1.vertices, [0, 4, 5, 3]);
    }

    #[test]
    fn attribute_mismatch_blocks_merge() {
        let (mesh, mut q1, q2) = side_by_side([3, 3, 3, 3, 2, 3, 3, 3]);
        assert!(!try_merge_quads(&mut q1, &q2, &mesh));
    }

    #[test]
    fn disjoint_quads_do_not_merge() {
        let mut mesh: Mesh<CubicVertex<u8>, u32> = Mesh::new();
        let idx: Vec<u32> = (0..8).map(|_| mesh.add_vertex(vert(1, 3))).collect();
        let mut q1 = Quad::new(idx[0], idx[1], idx[2], idx[3]);
        let q2 = Quad::new(idx[4], idx[5], idx[6], idx[7]);
        assert!(!try_merge_quads(&mut q1, &q2, &mesh));
    }

    #[test]
    fn pass_reports_and_removes() {
        let (mesh, q1, q2) = side_by_side([3; 8]);
        let mut bucket = vec![q1, q2];
        assert!(perform_quad_merging(&mut bucket, &mesh));
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].vertices, [0, 4, 5, 3]);
        assert!(!perform_quad_merging(&mut bucket, &mesh));
    }

    #[test]
    fn strip_of_three_converges() {
        let mut mesh: Mesh<CubicVertex<u8>, u32> = Mesh::new();
        let idx: Vec<u32> = (0..12).map(|_| mesh.add_vertex(vert(2, 3))).collect();
        let a = Quad::new(idx[0], idx[1], idx[2], idx[3]);
        let b = Quad::new(idx[1], idx[4], idx[5], idx[2]);
        let c = Quad::new(idx[4], idx[6], idx[7], idx[5]);
        let mut bucket = vec![a, b, c];
        while perform_quad_merging(&mut bucket, &mesh) {}
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].vertices, [0, 6, 7, 3]);
    }
}
