//! Two-pass loading: analyze, allocate, decode
use std::io::{self, BufRead};
use std::path::Path;

use crate::analyze::{analyze, Counts};
use crate::assignment::MaterialAssignment;
use crate::buffers::MeshBuffers;
use crate::config::DecoderConfig;
use crate::decode::Decoder;
use crate::error::{Error, LineFailure, Result};
use crate::geometry::BoundingExtents;
use crate::material::MaterialLibrary;
use crate::report::ModelReport;
use crate::resource::{DirectoryResources, ResourceProvider};

/// A fully decoded model, owned by the caller and read-only from here on
#[derive(Debug, Clone, PartialEq)]
pub struct ObjModel {
    pub counts: Counts,
    pub buffers: MeshBuffers,
    pub materials: MaterialLibrary,
    pub assignment: MaterialAssignment,
    pub extents: Option<BoundingExtents>,
    pub failures: Vec<LineFailure>,
    vertices_written: usize,
    normals_written: usize,
    triangles_written: usize,
}

impl ObjModel {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Vertices the decoder wrote. Below the buffer capacity only if the
    /// stream shrank between passes.
    pub fn vertex_count(&self) -> usize {
        self.vertices_written
    }

    pub fn normal_count(&self) -> usize {
        self.normals_written
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles_written
    }

    /// Human-readable summary for logs
    pub fn report(&self) -> ModelReport<'_> {
        ModelReport::new(self)
    }
}

/// Loads models and their material libraries through one provider
pub struct ObjLoader<'a> {
    resources: &'a dyn ResourceProvider,
    config: DecoderConfig,
}

impl<'a> ObjLoader<'a> {
    pub fn new(resources: &'a dyn ResourceProvider) -> Self {
        Self {
            resources,
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the geometry resource `name`, opening it once per pass
    pub fn load(&self, name: &str) -> Result<ObjModel> {
        tracing::info!("Loading model {}", name);
        self.load_streams(|| self.resources.open(name))
            .map_err(|err| match err {
                Error::Io(source) if source.kind() == io::ErrorKind::NotFound => Error::Resource {
                    name: name.to_string(),
                    source,
                },
                other => other,
            })
    }

    /// Load from streams produced by `open`. It is called twice and must
    /// yield the same content both times.
    pub fn load_streams<F, R>(&self, mut open: F) -> Result<ObjModel>
    where
        F: FnMut() -> io::Result<R>,
        R: BufRead,
    {
        tracing::debug!("Analyzing model");
        let counts = analyze(open()?)?;

        tracing::debug!("Allocating buffers");
        let mut buffers = MeshBuffers::allocate(&counts);

        tracing::debug!("Decoding model");
        let decoded = Decoder::new(self.config)
            .with_resources(self.resources)
            .decode(open()?, &mut buffers)?;

        for (name, _) in decoded.assignment.used_materials() {
            if self.config.load_materials && !decoded.materials.contains(name) {
                tracing::warn!("Material {} is used but not defined", name);
            }
        }

        if self.config.strict && !decoded.is_clean() {
            return Err(Error::UncleanLoad {
                failures: decoded.failures.len(),
            });
        }

        Ok(ObjModel {
            counts,
            buffers,
            materials: decoded.materials,
            assignment: decoded.assignment,
            extents: decoded.extents,
            failures: decoded.failures,
            vertices_written: decoded.vertices_written,
            normals_written: decoded.normals_written,
            triangles_written: decoded.triangles_written,
        })
    }
}

/// Load an `.obj` file, resolving material libraries next to it
pub fn load_file(path: impl AsRef<Path>, config: DecoderConfig) -> Result<ObjModel> {
    let path = path.as_ref();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Err(Error::Resource {
            name: path.display().to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a file path"),
        });
    };

    let resources = DirectoryResources::new(dir);
    ObjLoader::new(&resources).with_config(config).load(name)
}
