//! Shader sources the demo edits live: one vertex shader and a pixel shader
//! per lighting model, read from and written back to a shader directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{CoreError, CoreResult, lights::ShaderKind};

/// Capacity of the editor buffer, terminator included.
pub const MAX_SHADER_LEN: usize = 8192;

pub const VERTEX_SHADER_FILE: &str = "vertex.glsl";

/// Text of one shader and the file it came from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub path: PathBuf,
    pub code: String,
}

impl ShaderSource {
    pub fn read(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| CoreError::ShaderRead {
            path: path.clone(),
            source,
        })?;
        let mut code = String::from_utf8_lossy(&bytes).into_owned();
        if code.len() >= MAX_SHADER_LEN {
            log::warn!(
                "{} is {} bytes, truncating to {}",
                path.display(),
                code.len(),
                MAX_SHADER_LEN - 1
            );
            let mut cut = MAX_SHADER_LEN - 1;
            while !code.is_char_boundary(cut) {
                cut -= 1;
            }
            code.truncate(cut);
        }
        Ok(Self { path, code })
    }

    pub fn write(&self) -> CoreResult<()> {
        fs::write(&self.path, &self.code).map_err(|source| CoreError::ShaderWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// All shader sources below one directory.
#[derive(Clone, Debug)]
pub struct ShaderLibrary {
    root: PathBuf,
    vertex: ShaderSource,
    pixel: [ShaderSource; 4],
}

impl ShaderLibrary {
    /// Read every shader below `root`.
    pub fn load(root: impl AsRef<Path>) -> CoreResult<Self> {
        let mut lib = Self {
            root: root.as_ref().to_path_buf(),
            vertex: ShaderSource::default(),
            pixel: Default::default(),
        };
        lib.reload_from_disk()?;
        Ok(lib)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Re-read all files, discarding unsaved edits. On failure the library
    /// keeps its previous contents.
    pub fn reload_from_disk(&mut self) -> CoreResult<()> {
        let vertex = ShaderSource::read(self.root.join(VERTEX_SHADER_FILE))?;
        let mut pixel: [ShaderSource; 4] = Default::default();
        for kind in ShaderKind::ALL {
            pixel[kind.index()] = ShaderSource::read(self.root.join(kind.file_name()))?;
        }
        self.vertex = vertex;
        self.pixel = pixel;
        log::info!("Loaded shaders from {}", self.root.display());
        Ok(())
    }

    /// Write every pixel shader back to its file.
    pub fn save_to_disk(&self) -> CoreResult<()> {
        for source in &self.pixel {
            source.write()?;
        }
        log::info!("Saved pixel shaders to {}", self.root.display());
        Ok(())
    }

    pub fn vertex(&self) -> &ShaderSource {
        &self.vertex
    }

    pub fn source(&self, kind: ShaderKind) -> &ShaderSource {
        &self.pixel[kind.index()]
    }

    pub fn source_mut(&mut self, kind: ShaderKind) -> &mut ShaderSource {
        &mut self.pixel[kind.index()]
    }
}
