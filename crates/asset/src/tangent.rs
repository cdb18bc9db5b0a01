//! Per-vertex tangents for normal mapping.
//!
//! Face tangents/bitangents come from solving the UV-delta system of each
//! triangle and are summed, unnormalised, into every corner. Each vertex
//! tangent is then orthogonalised against its normal (Gram-Schmidt) and its
//! sign flipped when the frame is left-handed relative to the summed
//! bitangent.

use glam::Vec3;

use crate::mesh::Mesh;

/// UV parametric areas below this are treated as degenerate.
const MIN_UV_AREA: f32 = 1e-12;

pub fn generate_tangents(meshes: &mut [Mesh]) {
    for mesh in meshes {
        generate_mesh_tangents(mesh);
    }
}

pub fn generate_mesh_tangents(mesh: &mut Mesh) {
    let count = mesh.vertices.len();
    let mut tangents = vec![Vec3::ZERO; count];
    let mut bitangents = vec![Vec3::ZERO; count];
    let mut skipped = 0usize;

    for sub in &mesh.sub_meshes {
        for [i0, i1, i2] in sub.triangles() {
            let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
            let (v1, v2, v3) = (&mesh.vertices[i0], &mesh.vertices[i1], &mesh.vertices[i2]);

            let dp1 = (v2.position - v1.position).truncate();
            let dp2 = (v3.position - v1.position).truncate();
            let duv1 = v2.tex_coord - v1.tex_coord;
            let duv2 = v3.tex_coord - v1.tex_coord;

            let det = duv1.x * duv2.y - duv1.y * duv2.x;
            if det.abs() < MIN_UV_AREA {
                skipped += 1;
                continue;
            }
            let r = 1.0 / det;
            let tangent = r * (dp1 * duv2.y - dp2 * duv1.y);
            let bitangent = r * (dp2 * duv1.x - dp1 * duv2.x);

            for i in [i0, i1, i2] {
                tangents[i] += tangent;
                bitangents[i] += bitangent;
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Mesh '{}': {} triangles with zero UV area left out of tangent generation",
            mesh.name,
            skipped
        );
    }

    for ((vert, tangent), bitangent) in mesh.vertices.iter_mut().zip(tangents).zip(bitangents) {
        vert.tangent = orthogonal_tangent(vert.normal, tangent, bitangent);
    }
}

/// Final tangent for one vertex from its accumulated frame.
fn orthogonal_tangent(normal: Vec3, tangent: Vec3, bitangent: Vec3) -> Vec3 {
    let mut t = (tangent - normal * normal.dot(tangent)).normalize_or_zero();
    if t == Vec3::ZERO {
        // No usable UV frame (or tangent parallel to the normal).
        t = match normal.try_normalize() {
            Some(n) => n.any_orthonormal_vector(),
            None => Vec3::X,
        };
    }
    if tangent.cross(normal).dot(bitangent) < 0.0 {
        t = -t;
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshVertex, SubMesh};
    use glam::{Vec2, Vec4};

    fn quad_mesh(normal: Vec3) -> Mesh {
        let mut mesh = Mesh::new("quad");
        let corners = [
            (Vec4::new(0.0, 0.0, 0.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec4::new(1.0, 0.0, 0.0, 1.0), Vec2::new(1.0, 0.0)),
            (Vec4::new(1.0, 1.0, 0.0, 1.0), Vec2::new(1.0, 1.0)),
            (Vec4::new(0.0, 1.0, 0.0, 1.0), Vec2::new(0.0, 1.0)),
        ];
        mesh.vertices = corners
            .iter()
            .map(|&(p, uv)| MeshVertex::new(p, normal, uv))
            .collect();
        let mut sub = SubMesh::new("s");
        sub.indices = vec![0, 1, 2, 0, 2, 3];
        mesh.sub_meshes.push(sub);
        mesh
    }

    #[test]
    fn planar_quad_tangent_lies_on_u_axis() {
        let mut mesh = quad_mesh(Vec3::Z);
        generate_mesh_tangents(&mut mesh);
        for v in &mesh.vertices {
            // cross(t, n) must agree with the +v bitangent.
            assert!((v.tangent + Vec3::X).length() < 1e-5, "{:?}", v.tangent);
        }
    }

    #[test]
    fn tangent_sign_follows_bitangent() {
        for mirrored in [false, true] {
            let mut mesh = quad_mesh(Vec3::Z);
            if mirrored {
                for v in &mut mesh.vertices {
                    v.tex_coord.x = 1.0 - v.tex_coord.x;
                }
            }
            generate_mesh_tangents(&mut mesh);
            for v in &mesh.vertices {
                assert!(v.tangent.cross(v.normal).dot(Vec3::Y) > 0.0);
            }
        }
    }

    #[test]
    fn tangents_are_unit_and_orthogonal_to_tilted_normals() {
        let normal = Vec3::new(0.3, 0.1, 1.0).normalize();
        let mut mesh = quad_mesh(normal);
        generate_mesh_tangents(&mut mesh);
        for v in &mesh.vertices {
            assert!((v.tangent.length() - 1.0).abs() < 1e-5);
            assert!(v.tangent.dot(v.normal).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_uv_area_still_yields_unit_orthogonal_tangent() {
        let mut mesh = quad_mesh(Vec3::Y);
        for v in &mut mesh.vertices {
            v.tex_coord = Vec2::ZERO;
        }
        generate_mesh_tangents(&mut mesh);
        for v in &mesh.vertices {
            assert!(v.tangent.is_finite());
            assert!((v.tangent.length() - 1.0).abs() < 1e-5);
            assert!(v.tangent.dot(Vec3::Y).abs() < 1e-5);
        }
    }

    #[test]
    fn unreferenced_vertex_gets_a_frame() {
        let mut mesh = quad_mesh(Vec3::Z);
        mesh.vertices
            .push(MeshVertex::new(Vec4::W, Vec3::Z, Vec2::ZERO));
        generate_mesh_tangents(&mut mesh);
        let lone = mesh.vertices[4].tangent;
        assert!((lone.length() - 1.0).abs() < 1e-5);
        assert!(lone.dot(Vec3::Z).abs() < 1e-5);
    }
}
