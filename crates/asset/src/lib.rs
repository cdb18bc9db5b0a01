//! Asset loading: OBJ scenes with MTL material libraries, tangent
//! generation, and PNG texture data for the material maps.

pub mod error;
pub mod material;
pub mod mesh;
pub mod obj;
pub mod reader;
pub mod scene;
pub mod source;
pub mod tangent;
pub mod texture;

pub use error::{LoadError, LoadResult};
pub use material::{Fallback, Material, MaterialLibrary, TextureSlot};
pub use mesh::{Mesh, MeshVertex, SubMesh};
pub use scene::{Scene, SceneStats, load_scene};
pub use source::{AssetSource, DataRoot, MemorySource};
pub use texture::TextureData;
