//! Where geometry and companion material streams come from
//!
//! A model may live on disk, with its `.mtl` next to it, or inside an asset
//! bundle shipped with the application. Both resolve a name to a fresh
//! buffered reader; a missing name is reported as [`io::ErrorKind::NotFound`].
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// Opens named text streams.
///
/// Every call returns an independent handle, closed when dropped.
pub trait ResourceProvider {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>>;
}

/// Resolves names relative to a filesystem directory
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let path = self.root.join(name);
        tracing::debug!("Opening {}", path.display());
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// In-memory assets addressed as `<root>/<name>`
#[derive(Debug, Clone, Default)]
pub struct AssetBundle {
    root: String,
    assets: HashMap<String, Vec<u8>>,
}

impl AssetBundle {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            assets: HashMap::new(),
        }
    }

    /// Store an asset under its full path, root included
    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.assets.insert(path.into(), data.into());
    }

    /// Builder form of [`AssetBundle::insert`]
    pub fn with_asset(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    fn resolve(&self, name: &str) -> String {
        if self.root.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.root.trim_end_matches('/'), name)
        }
    }
}

impl ResourceProvider for AssetBundle {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead + '_>> {
        let path = self.resolve(name);
        match self.assets.get(&path) {
            Some(data) => Ok(Box::new(Cursor::new(data.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("asset not found: {}", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_asset_bundle_resolves_under_root() {
        let bundle = AssetBundle::new("models/").with_asset("models/cube.mtl", "newmtl a\n");

        let mut text = String::new();
        bundle
            .open("cube.mtl")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "newmtl a\n");
    }

    #[test]
    fn test_asset_bundle_missing_is_not_found() {
        let bundle = AssetBundle::new("models");
        let err = bundle.open("nope.mtl").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_directory_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resources = DirectoryResources::new(dir.path());
        let err = resources.open("absent.mtl").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
