//! CPU-side mesh representation produced by the OBJ loader.

use glam::{Vec2, Vec3, Vec4};

/// Welded vertex. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: Vec4,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub tex_coord: Vec2,
}

impl MeshVertex {
    pub fn new(position: Vec4, normal: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            normal,
            tangent: Vec3::ZERO,
            tex_coord,
        }
    }
}

/// Named, material-bound slice of a mesh's triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMesh {
    pub name: String,
    /// Key into the scene's material library.
    pub material: Option<String>,
    /// Triangle list, three indices per triangle, into [`Mesh::vertices`].
    pub indices: Vec<u32>,
}

impl SubMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Object from an `o` record: raw attribute arrays plus the welded vertices
/// its submeshes index into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec4>,
    pub normals: Vec<Vec3>,
    /// Already flipped to `(u, 1 - v)`.
    pub tex_coords: Vec<Vec2>,
    pub vertices: Vec<MeshVertex>,
    pub sub_meshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Drop the raw attribute arrays once faces no longer reference them.
    pub fn clear_raw_attributes(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.tex_coords.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.sub_meshes.iter().map(SubMesh::triangle_count).sum()
    }

    /// Returns `true` if there is something to draw.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && self.sub_meshes.iter().any(|s| !s.indices.is_empty())
    }
}
