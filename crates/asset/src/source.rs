//! Where asset bytes come from: a data-root directory on disk, or named
//! in-memory buffers.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::{LoadError, LoadResult};

/// Source of whole-file reads addressed by names relative to a root.
pub trait AssetSource {
    /// Full path a relative name resolves to.
    fn resolve(&self, name: &str) -> PathBuf;

    /// Read the whole named file into memory.
    fn read(&self, name: &str) -> LoadResult<Vec<u8>>;
}

/// Join `root` and `name` with exactly one separator, unless `root` already
/// ends in one. An empty root yields `name` unchanged.
pub fn combine_path(root: &str, name: &str) -> String {
    if root.is_empty() {
        return name.to_owned();
    }
    let mut out = String::with_capacity(root.len() + name.len() + 1);
    out.push_str(root);
    if !root.ends_with('/') && !root.ends_with('\\') {
        out.push('/');
    }
    out.push_str(name);
    out
}

/// Base directory all relative asset names resolve against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataRoot {
    root: String,
}

impl DataRoot {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.root
    }
}

impl AssetSource for DataRoot {
    fn resolve(&self, name: &str) -> PathBuf {
        PathBuf::from(combine_path(&self.root, name))
    }

    fn read(&self, name: &str) -> LoadResult<Vec<u8>> {
        let path = self.resolve(name);
        fs::read(&path).map_err(|source| LoadError::FileNotFound { path, source })
    }
}

/// Named in-memory files, for tools and tests that never touch the disk.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_file(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: impl Into<Vec<u8>>) {
        self.files.insert(name.to_owned(), contents.into());
    }
}

impl AssetSource for MemorySource {
    fn resolve(&self, name: &str) -> PathBuf {
        Path::new(name).to_path_buf()
    }

    fn read(&self, name: &str) -> LoadResult<Vec<u8>> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::FileNotFound {
                path: self.resolve(name),
                source: io::Error::from(io::ErrorKind::NotFound),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_inserts_single_separator() {
        assert_eq!(combine_path("../data", "sponza.obj"), "../data/sponza.obj");
        assert_eq!(combine_path("../data/", "sponza.obj"), "../data/sponza.obj");
        assert_eq!(combine_path("C:\\data\\", "a.mtl"), "C:\\data\\a.mtl");
        assert_eq!(combine_path("", "a.mtl"), "a.mtl");
    }

    #[test]
    fn data_root_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), b"hi").unwrap();

        let root = DataRoot::new(dir.path().to_string_lossy());
        assert_eq!(root.read("hello.txt").unwrap(), b"hi");

        let err = root.read("missing.txt").unwrap_err();
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn memory_source_serves_named_buffers() {
        let src = MemorySource::new().with_file("a.obj", "o A\n");
        assert_eq!(src.read("a.obj").unwrap(), b"o A\n");
        assert!(matches!(
            src.read("b.obj"),
            Err(LoadError::FileNotFound { .. })
        ));
    }
}
