//! Load failures and their stable numeric codes.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Every way a scene or material-library load can fail. All of them abort
/// the load in progress.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot open file: '{}'", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Trying to create a meshgroup without an active mesh")]
    GroupWithoutMesh,
    #[error("Trying to define vertices without an active mesh")]
    VerticesWithoutMesh,
    #[error("Trying to use material outside of mesh group")]
    MaterialWithoutGroup,
    #[error("Trying to define face outside of mesh group")]
    FaceWithoutGroup,
    #[error("Unknown face format: '{0}'")]
    UnrecognizedFaceFormat(String),
    #[error("Unknown material: '{0}'")]
    UnknownMaterial(String),
    #[error("Duplicate material: '{0}'")]
    DuplicateMaterialName(String),
    #[error("Face references position {index} but mesh has {available}")]
    FaceIndexOutOfRange { index: i64, available: usize },
    #[error("Trying to define material without an active material")]
    PropertyWithoutActiveMaterial,
}

impl LoadError {
    /// Stable code reported through the error callback.
    pub fn code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } => 1,
            LoadError::GroupWithoutMesh => 2,
            LoadError::VerticesWithoutMesh => 3,
            LoadError::MaterialWithoutGroup => 4,
            LoadError::FaceWithoutGroup => 5,
            LoadError::UnrecognizedFaceFormat(_) => 10,
            LoadError::UnknownMaterial(_) => 11,
            LoadError::DuplicateMaterialName(_) => 12,
            LoadError::FaceIndexOutOfRange { .. } => 13,
            LoadError::PropertyWithoutActiveMaterial => 20,
        }
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(LoadError::GroupWithoutMesh.code(), 2);
        assert_eq!(LoadError::UnknownMaterial("x".into()).code(), 11);
        assert_eq!(LoadError::PropertyWithoutActiveMaterial.code(), 20);
        let missing = LoadError::FileNotFound {
            path: "data/x.obj".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(missing.code(), 1);
        assert_eq!(missing.to_string(), "Cannot open file: 'data/x.obj'");
    }

    #[test]
    fn messages_name_the_material() {
        assert_eq!(
            LoadError::DuplicateMaterialName("Foo".into()).to_string(),
            "Duplicate material: 'Foo'"
        );
    }
}
