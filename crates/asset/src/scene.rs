//! Scene container: owns the meshes and materials of one loaded OBJ file.

use std::{fmt, path::PathBuf};

use crate::{
    error::LoadResult,
    material::{Material, MaterialLibrary},
    mesh::{Mesh, SubMesh},
    obj::ObjParser,
    source::{AssetSource, DataRoot},
};

/// Receives `(code, message)` for every load failure.
pub type ErrorCallback = Box<dyn FnMut(i32, &str)>;

/// Counts for logging and sanity checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub meshes: usize,
    pub sub_meshes: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub materials: usize,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} meshes, {} submeshes, {} vertices, {} triangles, {} materials",
            self.meshes, self.sub_meshes, self.vertices, self.triangles, self.materials
        )
    }
}

/// Meshes and materials loaded from a data root.
///
/// After a failed [`Scene::load_file`] the contents are unspecified and the
/// scene should be discarded.
pub struct Scene {
    source: Box<dyn AssetSource>,
    error_callback: Option<ErrorCallback>,
    materials: MaterialLibrary,
    meshes: Vec<Mesh>,
}

impl Scene {
    /// Scene reading from a directory on disk.
    pub fn new(data_root: impl Into<String>) -> Self {
        Self::with_source(DataRoot::new(data_root))
    }

    pub fn with_source(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            error_callback: None,
            materials: MaterialLibrary::new(),
            meshes: Vec::new(),
        }
    }

    pub fn set_error_callback(&mut self, callback: impl FnMut(i32, &str) + 'static) {
        self.error_callback = Some(Box::new(callback));
    }

    /// Parse `filename` (and every library it references) into this scene,
    /// then generate tangents.
    pub fn load_file(&mut self, filename: &str) -> LoadResult<()> {
        let result = self.load_inner(filename);
        if let Err(err) = &result {
            if let Some(callback) = self.error_callback.as_mut() {
                callback(err.code(), &err.to_string());
            }
        }
        result
    }

    fn load_inner(&mut self, filename: &str) -> LoadResult<()> {
        let bytes = self.source.read(filename)?;
        log::info!("Loading scene: {}", self.source.resolve(filename).display());

        let materials = std::mem::take(&mut self.materials);
        let mut parser = ObjParser::with_materials(self.source.as_ref(), materials);
        if let Err(err) = parser.parse(&bytes) {
            self.materials = parser.into_materials();
            return Err(err);
        }
        let (meshes, materials) = parser.finish();
        self.meshes.extend(meshes);
        self.materials = materials;
        log::info!("Loaded {}: {}", filename, self.stats());
        Ok(())
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Material bound to a submesh, if any.
    pub fn material_for(&self, sub_mesh: &SubMesh) -> Option<&Material> {
        sub_mesh.material.as_deref().and_then(|name| self.material(name))
    }

    /// Full path of an asset named relative to the data root.
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.source.resolve(name)
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            meshes: self.meshes.len(),
            sub_meshes: self.meshes.iter().map(|m| m.sub_meshes.len()).sum(),
            vertices: self.meshes.iter().map(|m| m.vertices.len()).sum(),
            triangles: self.meshes.iter().map(Mesh::triangle_count).sum(),
            materials: self.materials.len(),
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene").field("stats", &self.stats()).finish()
    }
}

/// Load a scene in one call.
pub fn load_scene(source: impl AssetSource + 'static, filename: &str) -> LoadResult<Scene> {
    let mut scene = Scene::with_source(source);
    scene.load_file(filename)?;
    Ok(scene)
}
