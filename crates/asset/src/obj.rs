//! OBJ geometry parser: positions, normals and texture coordinates, `o`/`g`
//! grouping, material bindings and triangle/quad faces.
//!
//! Record types are told apart by their token count as well as their
//! keyword (see [`Record::classify`]); a known keyword with an unexpected
//! arity is ignored like any unknown record.

use std::collections::HashMap;

use glam::{Vec2, Vec3, Vec4};

use crate::{
    error::{LoadError, LoadResult},
    material::{MaterialLibrary, load_material_library},
    mesh::{Mesh, MeshVertex, SubMesh},
    reader::{TextReader, parse_f32, parse_i64, split},
    source::AssetSource,
    tangent::generate_tangents,
};

/// One classified OBJ line.
#[derive(Clone, Debug, PartialEq)]
pub enum Record<'a> {
    MaterialLibrary(&'a str),
    Object(&'a str),
    Group(&'a str),
    UseMaterial(&'a str),
    Position(Vec4),
    TexCoord(Vec2),
    Normal(Vec3),
    Triangle([&'a str; 3]),
    Quad([&'a str; 4]),
    Ignored,
}

impl<'a> Record<'a> {
    /// Arity-based dispatch over whitespace tokens.
    pub fn classify(parts: &[&'a str]) -> Self {
        match *parts {
            ["mtllib", name] => Record::MaterialLibrary(name),
            ["o", name] => Record::Object(name),
            ["g", name] => Record::Group(name),
            ["usemtl", name] => Record::UseMaterial(name),
            ["vt", u, v] => Record::TexCoord(Vec2::new(parse_f32(u), 1.0 - parse_f32(v))),
            ["v", x, y, z] => Record::Position(Vec4::new(parse_f32(x), parse_f32(y), parse_f32(z), 1.0)),
            ["v", x, y, z, w] => {
                Record::Position(Vec4::new(parse_f32(x), parse_f32(y), parse_f32(z), parse_f32(w)))
            }
            ["vn", x, y, z] => Record::Normal(Vec3::new(parse_f32(x), parse_f32(y), parse_f32(z))),
            ["f", a, b, c] => Record::Triangle([a, b, c]),
            ["f", a, b, c, d] => Record::Quad([a, b, c, d]),
            _ => Record::Ignored,
        }
    }
}

/// Raw-array indices a face corner names; welding identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexKey {
    pub position: i64,
    pub tex_coord: Option<i64>,
    pub normal: Option<i64>,
}

impl VertexKey {
    /// Parse a `p`, `p/t`, `p//n` or `p/t/n` reference (1-based indices).
    pub fn parse(reference: &str) -> LoadResult<Self> {
        let mut fields: Vec<&str> = reference.split('/').collect();
        if fields.len() > 1 && fields.last() == Some(&"") {
            fields.pop();
        }
        if fields.len() > 3 {
            return Err(LoadError::UnrecognizedFaceFormat(reference.to_owned()));
        }
        let optional = |i: usize| {
            fields
                .get(i)
                .filter(|s| !s.is_empty())
                .map(|s| parse_i64(s))
        };
        Ok(Self {
            position: parse_i64(fields[0]),
            tex_coord: optional(1),
            normal: optional(2),
        })
    }
}

/// Convert a 1-based OBJ index into a slot of an array of `len` items.
fn zero_based(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index)
        .ok()
        .and_then(|i| i.checked_sub(1))
        .filter(|&i| i < len)
}

/// Streaming state for one geometry file.
pub struct ObjParser<'s> {
    source: &'s dyn AssetSource,
    materials: MaterialLibrary,
    meshes: Vec<Mesh>,
    current_sub_mesh: Option<usize>,
    vertex_map: HashMap<VertexKey, u32>,
}

impl<'s> ObjParser<'s> {
    pub fn new(source: &'s dyn AssetSource) -> Self {
        Self::with_materials(source, MaterialLibrary::new())
    }

    /// Parser that resolves `usemtl` against, and adds new `newmtl` records
    /// to, an existing library.
    pub fn with_materials(source: &'s dyn AssetSource, materials: MaterialLibrary) -> Self {
        Self {
            source,
            materials,
            meshes: Vec::new(),
            current_sub_mesh: None,
            vertex_map: HashMap::new(),
        }
    }

    /// Parse a whole geometry buffer.
    pub fn parse(&mut self, src: &[u8]) -> LoadResult<()> {
        let mut reader = TextReader::new(src);
        while let Some(line) = reader.read_line() {
            if line.starts_with('#') {
                continue;
            }
            let parts = split(line, ' ');
            self.apply(Record::classify(&parts))?;
        }
        Ok(())
    }

    /// Apply one record to the parse state.
    pub fn apply(&mut self, record: Record<'_>) -> LoadResult<()> {
        match record {
            Record::MaterialLibrary(name) => {
                load_material_library(self.source, name, &mut self.materials)?;
            }
            Record::Object(name) => {
                log::debug!("o {}", name);
                if let Some(previous) = self.meshes.last_mut() {
                    previous.clear_raw_attributes();
                }
                self.meshes.push(Mesh::new(name));
                self.current_sub_mesh = None;
                self.vertex_map.clear();
            }
            Record::Group(name) => {
                let mesh = self.meshes.last_mut().ok_or(LoadError::GroupWithoutMesh)?;
                log::debug!("g {} (in {})", name, mesh.name);
                mesh.sub_meshes.push(SubMesh::new(name));
                self.current_sub_mesh = Some(mesh.sub_meshes.len() - 1);
            }
            Record::UseMaterial(name) => {
                if self.sub_mesh_mut().is_none() {
                    return Err(LoadError::MaterialWithoutGroup);
                }
                if !self.materials.contains_key(name) {
                    return Err(LoadError::UnknownMaterial(name.to_owned()));
                }
                if let Some(sub) = self.sub_mesh_mut() {
                    sub.material = Some(name.to_owned());
                }
            }
            Record::Position(p) => self.mesh_mut()?.positions.push(p),
            Record::TexCoord(t) => self.mesh_mut()?.tex_coords.push(t),
            Record::Normal(n) => self.mesh_mut()?.normals.push(n),
            Record::Triangle(refs) => {
                let [a, b, c] = self.weld_all(refs)?;
                self.push_indices(&[a, b, c])?;
            }
            Record::Quad(refs) => {
                let [a, b, c, d] = self.weld_all(refs)?;
                self.push_indices(&[a, b, c, a, c, d])?;
            }
            Record::Ignored => {}
        }
        Ok(())
    }

    /// Finish the load: generate tangents and hand back meshes and materials.
    pub fn finish(mut self) -> (Vec<Mesh>, MaterialLibrary) {
        generate_tangents(&mut self.meshes);
        (self.meshes, self.materials)
    }

    /// Give up on the load and return the material library alone.
    pub fn into_materials(self) -> MaterialLibrary {
        self.materials
    }

    fn mesh_mut(&mut self) -> LoadResult<&mut Mesh> {
        self.meshes.last_mut().ok_or(LoadError::VerticesWithoutMesh)
    }

    fn sub_mesh_mut(&mut self) -> Option<&mut SubMesh> {
        let index = self.current_sub_mesh?;
        self.meshes.last_mut()?.sub_meshes.get_mut(index)
    }

    fn weld_all<const N: usize>(&mut self, refs: [&str; N]) -> LoadResult<[u32; N]> {
        if self.sub_mesh_mut().is_none() {
            return Err(LoadError::FaceWithoutGroup);
        }
        let mut out = [0u32; N];
        for (slot, reference) in out.iter_mut().zip(refs) {
            *slot = self.weld(VertexKey::parse(reference)?)?;
        }
        Ok(out)
    }

    /// Output index for a face corner, creating the vertex on first sight.
    fn weld(&mut self, key: VertexKey) -> LoadResult<u32> {
        if let Some(&index) = self.vertex_map.get(&key) {
            return Ok(index);
        }
        let mesh = self.meshes.last_mut().ok_or(LoadError::FaceWithoutGroup)?;

        let position = zero_based(key.position, mesh.positions.len())
            .map(|i| mesh.positions[i])
            .ok_or(LoadError::FaceIndexOutOfRange {
                index: key.position,
                available: mesh.positions.len(),
            })?;
        let tex_coord = key
            .tex_coord
            .and_then(|t| zero_based(t, mesh.tex_coords.len()))
            .map_or(Vec2::ZERO, |i| mesh.tex_coords[i]);
        let normal = key
            .normal
            .and_then(|n| zero_based(n, mesh.normals.len()))
            .map_or(Vec3::ZERO, |i| mesh.normals[i]);

        let index = mesh.vertices.len() as u32;
        mesh.vertices.push(MeshVertex::new(position, normal, tex_coord));
        self.vertex_map.insert(key, index);
        Ok(index)
    }

    fn push_indices(&mut self, indices: &[u32]) -> LoadResult<()> {
        let sub = self.sub_mesh_mut().ok_or(LoadError::FaceWithoutGroup)?;
        sub.indices.extend_from_slice(indices);
        Ok(())
    }
}

/// Parse a geometry buffer whose `mtllib` references resolve through `source`.
pub fn parse_obj(
    source: &dyn AssetSource,
    src: &[u8],
) -> LoadResult<(Vec<Mesh>, MaterialLibrary)> {
    let mut parser = ObjParser::new(source);
    parser.parse(src)?;
    Ok(parser.finish())
}
