//! Helpers shared by the extraction test suites: a tiny material type, quad
//! predicates, and a brute-force unit-face oracle the meshes are checked
//! against.
#![allow(dead_code)]

use hashbrown::HashSet;
use strata_geom::{Region, Vec3};
use strata_mesh::{decode_position, extract_cubic_mesh, CubicVertex, Mesh};
use strata_volume::RawVolume;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Voxel(pub u8);

pub const EMPTY: Voxel = Voxel(0);
pub const STONE: Voxel = Voxel(1);
pub const DIRT: Voxel = Voxel(2);

pub fn is_solid(v: Voxel) -> bool {
    v != EMPTY
}

/// Quad wherever a solid voxel meets an empty one, carrying the solid side.
pub fn solid_against_empty(back: Voxel, front: Voxel) -> Option<Voxel> {
    (back != EMPTY && front == EMPTY).then_some(back)
}

pub type CubicMesh = Mesh<CubicVertex<Voxel>, u32>;

/// A unit face: outward normal, face centre doubled to stay integral, and
/// the material carried by the quad.
pub type FaceKey = ((i32, i32, i32), (i32, i32, i32), Voxel);

pub fn extract(vol: &RawVolume<Voxel>, region: Region, merge: bool) -> CubicMesh {
    extract_cubic_mesh(vol, region, solid_against_empty, is_solid, merge).unwrap()
}

pub fn world_position(mesh: &CubicMesh, index: u32) -> Vec3 {
    mesh.offset().as_vec3() + decode_position(mesh.get_vertex(index).encoded_position)
}

/// Unnormalised outward normal of the quad triangulated into this chunk of
/// six indices.
pub fn quad_normal(mesh: &CubicMesh, pair: &[u32]) -> Vec3 {
    (world_position(mesh, pair[1]) - world_position(mesh, pair[0]))
        .cross(world_position(mesh, pair[2]) - world_position(mesh, pair[0]))
}

/// Up-facing quads whose corners all lie on the horizontal plane `y`.
pub fn up_quads_at(mesh: &CubicMesh, y: f32) -> Vec<Vec<u32>> {
    mesh.indices()
        .chunks(6)
        .filter(|pair| pair.iter().all(|&i| world_position(mesh, i).y == y))
        .filter(|pair| quad_normal(mesh, pair).y > 0.0)
        .map(|pair| pair.to_vec())
        .collect()
}

/// AO of the up-facing vertex at `position`. Restricting the search to
/// up-facing quads matters: side faces own different vertices at the same
/// corner position with their own AO.
pub fn top_face_ao(mesh: &CubicMesh, position: Vec3) -> u8 {
    for pair in up_quads_at(mesh, position.y) {
        for &i in &pair {
            if world_position(mesh, i) == position {
                return mesh.get_vertex(i).ambient_occlusion;
            }
        }
    }
    panic!("no up-facing vertex at {position:?}")
}

/// The faces the extractor should produce, computed by walking voxel pairs
/// directly. Faces on the region's upper boundary planes belong to the
/// neighbouring region, matching the extractor's ownership convention.
pub fn expected_faces<F>(vol: &RawVolume<Voxel>, region: Region, mut needs: F) -> HashSet<FaceKey>
where
    F: FnMut(Voxel, Voxel) -> Option<Voxel>,
{
    let mut out = HashSet::new();
    let l = region.lower_corner();
    let u = region.upper_corner();
    for z in l.z..=u.z {
        for y in l.y..=u.y {
            for x in l.x..=u.x {
                let cur = vol.voxel_at(x, y, z);
                let left = vol.voxel_at(x - 1, y, z);
                let below = vol.voxel_at(x, y - 1, z);
                let before = vol.voxel_at(x, y, z - 1);
                if let Some(m) = needs(cur, left) {
                    out.insert(((-1, 0, 0), (2 * x - 1, 2 * y, 2 * z), m));
                }
                if let Some(m) = needs(left, cur) {
                    out.insert(((1, 0, 0), (2 * x - 1, 2 * y, 2 * z), m));
                }
                if let Some(m) = needs(cur, below) {
                    out.insert(((0, -1, 0), (2 * x, 2 * y - 1, 2 * z), m));
                }
                if let Some(m) = needs(below, cur) {
                    out.insert(((0, 1, 0), (2 * x, 2 * y - 1, 2 * z), m));
                }
                if let Some(m) = needs(cur, before) {
                    out.insert(((0, 0, -1), (2 * x, 2 * y, 2 * z - 1), m));
                }
                if let Some(m) = needs(before, cur) {
                    out.insert(((0, 0, 1), (2 * x, 2 * y, 2 * z - 1), m));
                }
            }
        }
    }
    out
}

/// Decomposes every triangulated quad back into the unit faces it covers.
/// The driver emits each quad as two consecutive triangles over four
/// vertices, so chunks of six indices recover the quads.
pub fn mesh_faces(mesh: &CubicMesh) -> HashSet<FaceKey> {
    let indices = mesh.indices();
    assert_eq!(indices.len() % 6, 0, "quads triangulate to index pairs");
    let mut out = HashSet::new();

    for pair in indices.chunks(6) {
        let mut corners: Vec<u32> = pair.to_vec();
        corners.sort_unstable();
        corners.dedup();
        assert_eq!(corners.len(), 4, "a quad spans four distinct vertices");

        let material = mesh.get_vertex(corners[0]).data;
        for &c in &corners[1..] {
            assert_eq!(mesh.get_vertex(c).data, material);
        }

        let n = quad_normal(mesh, pair).normalized();
        let normal = (n.x.round() as i32, n.y.round() as i32, n.z.round() as i32);
        assert_eq!(
            normal.0.abs() + normal.1.abs() + normal.2.abs(),
            1,
            "faces are axis aligned"
        );

        // Corner coordinates are half-integers; double them to get an exact
        // integer bounding rectangle.
        let mut min2 = [i32::MAX; 3];
        let mut max2 = [i32::MIN; 3];
        for &c in &corners {
            let p = world_position(mesh, c);
            for (axis, value) in [p.x, p.y, p.z].into_iter().enumerate() {
                let doubled = (2.0 * value).round() as i32;
                min2[axis] = min2[axis].min(doubled);
                max2[axis] = max2[axis].max(doubled);
            }
        }

        let normal_axis = [normal.0, normal.1, normal.2]
            .iter()
            .position(|c| *c != 0)
            .unwrap();
        assert_eq!(min2[normal_axis], max2[normal_axis]);
        let tangents: Vec<usize> = (0..3).filter(|a| *a != normal_axis).collect();
        let (ta, tb) = (tangents[0], tangents[1]);

        let mut ua = min2[ta];
        while ua < max2[ta] {
            let mut ub = min2[tb];
            while ub < max2[tb] {
                let mut centre2 = [0i32; 3];
                centre2[normal_axis] = min2[normal_axis];
                centre2[ta] = ua + 1;
                centre2[tb] = ub + 1;
                let inserted = out.insert((normal, (centre2[0], centre2[1], centre2[2]), material));
                assert!(inserted, "no two quads cover the same unit face");
                ub += 2;
            }
            ua += 2;
        }
    }
    out
}
