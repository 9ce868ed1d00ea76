use std::time::Instant;

use strata_geom::Region;
use strata_volume::{Volume, VolumeSampler};

use crate::error::ExtractError;
use crate::face::Face;
use crate::mesh::{Mesh, MeshSink};
use crate::quad::{perform_quad_merging, Quad};
use crate::slots::{VertexSlot, VertexSlots};
use crate::vertex::CubicVertex;

/// Vertex positions are encoded with one byte per component, which caps the
/// extraction region per axis.
const MAX_REGION_DIMENSION: i32 = 255;

/// Ambient occlusion level for a face vertex from the solidity of the three
/// voxels wrapping it on the occluding side: the two edge neighbours and the
/// diagonal corner. 0 is darkest, 3 is unoccluded. When both edge neighbours
/// are solid the corner voxel cannot be seen and the vertex is a fully
/// occluded inside corner.
///
/// <https://0fps.net/2013/07/03/ambient-occlusion-for-minecraft-like-worlds/>
#[inline]
pub fn vertex_ambient_occlusion(side1: bool, side2: bool, corner: bool) -> u8 {
    if side1 && side2 {
        return 0;
    }
    3 - (side1 as u8 + side2 as u8 + corner as u8)
}

/// Returns the mesh index for a vertex at corner `(x, y, z)` of the region,
/// reusing a previously emitted vertex when one with the same material and
/// AO already sits at this position. The slice the corner lies on picks
/// which slot table the caller passes in.
#[allow(clippy::too_many_arguments)]
fn add_vertex<V, M, G>(
    x: u32,
    y: u32,
    z: u32,
    material: V,
    slots: &mut VertexSlots<V>,
    mesh: &mut M,
    face1: V,
    face2: V,
    corner: V,
    contributes_to_ao: &G,
) -> Result<u32, ExtractError>
where
    V: Copy + Eq,
    M: MeshSink<Vertex = CubicVertex<V>>,
    G: Fn(V) -> bool,
{
    let ambient_occlusion = vertex_ambient_occlusion(
        contributes_to_ao(face1),
        contributes_to_ao(face2),
        contributes_to_ao(corner),
    );

    for slot in slots.column_mut(x, y) {
        match slot {
            None => {
                // No match among the occupied slots; fill the first free one.
                let index = mesh.add_vertex(CubicVertex {
                    encoded_position: [x as u8, y as u8, z as u8],
                    data: material,
                    ambient_occlusion,
                });
                *slot = Some(VertexSlot {
                    index,
                    material,
                    ambient_occlusion,
                });
                return Ok(index);
            }
            Some(entry)
                if entry.material == material && entry.ambient_occlusion == ambient_occlusion =>
            {
                return Ok(entry.index);
            }
            Some(_) => {}
        }
    }

    Err(ExtractError::SlotSaturated { x, y })
}

/// Extracts a blocky surface mesh from `volume` over `region` into a fresh
/// u32-indexed mesh. See [`extract_cubic_mesh_custom`] for the semantics.
pub fn extract_cubic_mesh<Vol, F, G>(
    volume: &Vol,
    region: Region,
    is_quad_needed: F,
    contributes_to_ao: G,
    merge_quads: bool,
) -> Result<Mesh<CubicVertex<Vol::Voxel>, u32>, ExtractError>
where
    Vol: Volume,
    F: FnMut(Vol::Voxel, Vol::Voxel) -> Option<Vol::Voxel>,
    G: Fn(Vol::Voxel) -> bool,
{
    let mut mesh = Mesh::new();
    extract_cubic_mesh_custom(
        volume,
        region,
        &mut mesh,
        is_quad_needed,
        contributes_to_ao,
        merge_quads,
    )?;
    Ok(mesh)
}

/// Extracts a blocky surface mesh into a caller-owned mesh, which may use
/// 16-bit indices or a custom [`MeshSink`] back-end.
///
/// A quad is emitted between every pair of neighbouring voxels for which
/// `is_quad_needed(back, front)` returns the material the quad should carry,
/// wound to face from `back` towards `front`. Per-vertex ambient occlusion
/// is derived from `contributes_to_ao` over the three voxels wrapping each
/// corner. With `merge_quads`, coplanar adjacent quads whose corners agree
/// in material and AO are greedily coalesced before triangulation.
///
/// Faces on a region's upper boundary planes belong to the neighbouring
/// region and are not emitted here; extracting adjacent regions produces
/// each boundary quad exactly once.
pub fn extract_cubic_mesh_custom<Vol, M, F, G>(
    volume: &Vol,
    region: Region,
    mesh: &mut M,
    mut is_quad_needed: F,
    contributes_to_ao: G,
    merge_quads: bool,
) -> Result<(), ExtractError>
where
    Vol: Volume,
    M: MeshSink<Vertex = CubicVertex<Vol::Voxel>>,
    F: FnMut(Vol::Voxel, Vol::Voxel) -> Option<Vol::Voxel>,
    G: Fn(Vol::Voxel) -> bool,
{
    let width = region.width_in_voxels();
    let height = region.height_in_voxels();
    let depth = region.depth_in_voxels();
    if width > MAX_REGION_DIMENSION || height > MAX_REGION_DIMENSION || depth > MAX_REGION_DIMENSION
    {
        return Err(ExtractError::RegionTooLarge {
            width,
            height,
            depth,
        });
    }

    let started = Instant::now();
    mesh.clear();

    // Vertex dedup tables for the slice being finished and the one after it,
    // rotated at every z step.
    let mut previous_slice = VertexSlots::new(width as usize + 1, height as usize + 1);
    let mut current_slice = VertexSlots::new(width as usize + 1, height as usize + 1);

    // Quad lists per face direction, indexed by the slice coordinate
    // orthogonal to the face.
    let dimensions = [width, height, depth];
    let mut buckets: [Vec<Vec<Quad>>; 6] =
        Face::ALL.map(|face| vec![Vec::new(); dimensions[face.axis()] as usize + 1]);

    let lower = region.lower_corner();
    let upper = region.upper_corner();
    let mut sampler = volume.sampler();

    for z in lower.z..=upper.z {
        let reg_z = (z - lower.z) as u32;

        for y in lower.y..=upper.y {
            let reg_y = (y - lower.y) as u32;

            sampler.set_position(lower.x, y, z);

            for x in lower.x..=upper.x {
                let reg_x = (x - lower.x) as u32;

                let voxel_current = sampler.get_voxel();

                let voxel_left = sampler.peek_voxel_1nx0py0pz();
                let voxel_before = sampler.peek_voxel_0px0py1nz();
                let voxel_left_before = sampler.peek_voxel_1nx0py1nz();
                let voxel_right_before = sampler.peek_voxel_1px0py1nz();
                let voxel_left_behind = sampler.peek_voxel_1nx0py1pz();

                let voxel_above_left = sampler.peek_voxel_1nx1py0pz();
                let voxel_above_before = sampler.peek_voxel_0px1py1nz();
                let voxel_above_left_before = sampler.peek_voxel_1nx1py1nz();
                let voxel_above_right_before = sampler.peek_voxel_1px1py1nz();
                let voxel_above_left_behind = sampler.peek_voxel_1nx1py1pz();

                let voxel_below = sampler.peek_voxel_0px1ny0pz();
                let voxel_below_left = sampler.peek_voxel_1nx1ny0pz();
                let voxel_below_right = sampler.peek_voxel_1px1ny0pz();
                let voxel_below_before = sampler.peek_voxel_0px1ny1nz();
                let voxel_below_behind = sampler.peek_voxel_0px1ny1pz();
                let voxel_below_left_before = sampler.peek_voxel_1nx1ny1nz();
                let voxel_below_right_before = sampler.peek_voxel_1px1ny1nz();
                let voxel_below_left_behind = sampler.peek_voxel_1nx1ny1pz();
                let voxel_below_right_behind = sampler.peek_voxel_1px1ny1pz();

                // Negative X face, between the current voxel and its left
                // neighbour. Two corners sit on this z slice, two on the
                // next.
                if let Some(material) = is_quad_needed(voxel_current, voxel_left) {
                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_left_before,
                        voxel_below_left,
                        voxel_below_left_before,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_below_left,
                        voxel_left_behind,
                        voxel_below_left_behind,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_left_behind,
                        voxel_above_left,
                        voxel_above_left_behind,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_left,
                        voxel_left_before,
                        voxel_above_left_before,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::NegX.index()][reg_x as usize].push(Quad::new(v0, v1, v2, v3));
                }

                // Positive X face. It lies on the same plane but is
                // described from the left voxel's side, so step the sampler
                // back for the neighbour reads and restore it afterwards.
                if let Some(material) = is_quad_needed(voxel_left, voxel_current) {
                    sampler.move_negative_x();

                    let voxel_right_before = sampler.peek_voxel_1px0py1nz();
                    let voxel_right_behind = sampler.peek_voxel_1px0py1pz();
                    let voxel_above_right = sampler.peek_voxel_1px1py0pz();
                    let voxel_above_right_before = sampler.peek_voxel_1px1py1nz();
                    let voxel_above_right_behind = sampler.peek_voxel_1px1py1pz();
                    let voxel_below_right = sampler.peek_voxel_1px1ny0pz();
                    let voxel_below_right_before = sampler.peek_voxel_1px1ny1nz();
                    let voxel_below_right_behind = sampler.peek_voxel_1px1ny1pz();

                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_right,
                        voxel_right_before,
                        voxel_below_right_before,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_below_right,
                        voxel_right_behind,
                        voxel_below_right_behind,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_above_right,
                        voxel_right_behind,
                        voxel_above_right_behind,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_right,
                        voxel_right_before,
                        voxel_above_right_before,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::PosX.index()][reg_x as usize].push(Quad::new(v0, v3, v2, v1));

                    sampler.move_positive_x();
                }

                // Negative Y face, between the current voxel and the one
                // below it.
                if let Some(material) = is_quad_needed(voxel_current, voxel_below) {
                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_before,
                        voxel_below_left,
                        voxel_below_left_before,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_right,
                        voxel_below_before,
                        voxel_below_right_before,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_below_behind,
                        voxel_below_right,
                        voxel_below_right_behind,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_below_left,
                        voxel_below_behind,
                        voxel_below_left_behind,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::NegY.index()][reg_y as usize].push(Quad::new(v0, v1, v2, v3));
                }

                // Positive Y face, read from below.
                if let Some(material) = is_quad_needed(voxel_below, voxel_current) {
                    sampler.move_negative_y();

                    let voxel_above_left = sampler.peek_voxel_1nx1py0pz();
                    let voxel_above_right = sampler.peek_voxel_1px1py0pz();
                    let voxel_above_before = sampler.peek_voxel_0px1py1nz();
                    let voxel_above_behind = sampler.peek_voxel_0px1py1pz();
                    let voxel_above_left_before = sampler.peek_voxel_1nx1py1nz();
                    let voxel_above_right_before = sampler.peek_voxel_1px1py1nz();
                    let voxel_above_left_behind = sampler.peek_voxel_1nx1py1pz();
                    let voxel_above_right_behind = sampler.peek_voxel_1px1py1pz();

                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_before,
                        voxel_above_left,
                        voxel_above_left_before,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_right,
                        voxel_above_before,
                        voxel_above_right_before,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_above_behind,
                        voxel_above_right,
                        voxel_above_right_behind,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z + 1,
                        material,
                        &mut current_slice,
                        mesh,
                        voxel_above_left,
                        voxel_above_behind,
                        voxel_above_left_behind,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::PosY.index()][reg_y as usize].push(Quad::new(v0, v3, v2, v1));

                    sampler.move_positive_y();
                }

                // Negative Z face. All four corners lie on the slice this
                // sweep is finishing, so only the previous-slice table is
                // touched.
                if let Some(material) = is_quad_needed(voxel_current, voxel_before) {
                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_before,
                        voxel_left_before,
                        voxel_below_left_before,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_before,
                        voxel_left_before,
                        voxel_above_left_before,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x + 1,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_before,
                        voxel_right_before,
                        voxel_above_right_before,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_before,
                        voxel_right_before,
                        voxel_below_right_before,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::NegZ.index()][reg_z as usize].push(Quad::new(v0, v1, v2, v3));
                }

                // Positive Z face, read from the voxel before. Its corners
                // also all lie on the slice being finished.
                if let Some(material) = is_quad_needed(voxel_before, voxel_current) {
                    sampler.move_negative_z();

                    let voxel_left_behind = sampler.peek_voxel_1nx0py1pz();
                    let voxel_right_behind = sampler.peek_voxel_1px0py1pz();
                    let voxel_above_behind = sampler.peek_voxel_0px1py1pz();
                    let voxel_above_left_behind = sampler.peek_voxel_1nx1py1pz();
                    let voxel_above_right_behind = sampler.peek_voxel_1px1py1pz();
                    let voxel_below_behind = sampler.peek_voxel_0px1ny1pz();
                    let voxel_below_left_behind = sampler.peek_voxel_1nx1ny1pz();
                    let voxel_below_right_behind = sampler.peek_voxel_1px1ny1pz();

                    let v0 = add_vertex(
                        reg_x,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_behind,
                        voxel_left_behind,
                        voxel_below_left_behind,
                        &contributes_to_ao,
                    )?;
                    let v1 = add_vertex(
                        reg_x,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_behind,
                        voxel_left_behind,
                        voxel_above_left_behind,
                        &contributes_to_ao,
                    )?;
                    let v2 = add_vertex(
                        reg_x + 1,
                        reg_y + 1,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_above_behind,
                        voxel_right_behind,
                        voxel_above_right_behind,
                        &contributes_to_ao,
                    )?;
                    let v3 = add_vertex(
                        reg_x + 1,
                        reg_y,
                        reg_z,
                        material,
                        &mut previous_slice,
                        mesh,
                        voxel_below_behind,
                        voxel_right_behind,
                        voxel_below_right_behind,
                        &contributes_to_ao,
                    )?;
                    buckets[Face::PosZ.index()][reg_z as usize].push(Quad::new(v0, v3, v2, v1));

                    sampler.move_positive_z();
                }

                sampler.move_positive_x();
            }
        }

        std::mem::swap(&mut previous_slice, &mut current_slice);
        current_slice.clear();
    }

    let mut quad_count = 0usize;
    for face in Face::ALL {
        for bucket in &mut buckets[face.index()] {
            if merge_quads {
                // Each pass can open new adjacencies, so run to convergence.
                while perform_quad_merging(bucket, &*mesh) {}
            }
            quad_count += bucket.len();

            for quad in bucket.iter() {
                let [v0, v1, v2, v3] = quad.vertices;
                let ao0 = mesh.get_vertex(v0).ambient_occlusion;
                let ao1 = mesh.get_vertex(v1).ambient_occlusion;
                let ao2 = mesh.get_vertex(v2).ambient_occlusion;
                let ao3 = mesh.get_vertex(v3).ambient_occlusion;

                // Split along the diagonal whose endpoints are less
                // occluded; both windings keep the face's outward normal.
                if ao3 + ao1 > ao0 + ao2 {
                    mesh.add_triangle(v1, v2, v3);
                    mesh.add_triangle(v1, v3, v0);
                } else {
                    mesh.add_triangle(v0, v1, v2);
                    mesh.add_triangle(v0, v2, v3);
                }
            }
        }
    }

    mesh.set_offset(region.lower_corner());
    mesh.remove_unused_vertices();

    log::trace!(
        target: "mesher",
        "cubic surface extraction took {:?} (region {}x{}x{}, {} quads)",
        started.elapsed(),
        width,
        height,
        depth,
        quad_count,
    );

    Ok(())
}
