//! obj3d Core Library - Wavefront OBJ/MTL decoding into render buffers
//!
//! Decoding takes two passes over the same content. [`analyze`] counts what
//! the stream declares, [`allocate`] sizes flat buffers from those counts
//! once, and [`Decoder::decode`] fills them while triangulating faces,
//! tracking extents and recording which material each triangle uses.
//!
//! ```
//! use obj3d_core::{analyze, allocate, decode};
//! use std::io::Cursor;
//!
//! let obj = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
//! let counts = analyze(Cursor::new(obj)).unwrap();
//! let mut buffers = allocate(&counts);
//! let decoded = decode(Cursor::new(obj), &mut buffers).unwrap();
//!
//! assert!(decoded.is_clean());
//! assert_eq!(buffers.indices(), &[0, 1, 2, 0, 2, 3]);
//! ```

pub mod analyze;
pub mod assignment;
pub mod buffers;
pub mod config;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod material;
pub mod mtl;
pub mod parse;
pub mod report;
pub mod resource;

// Re-export commonly used types
pub use analyze::{analyze, Counts};
pub use assignment::{Breakpoint, MaterialAssignment};
pub use buffers::{allocate, MeshBuffers};
pub use config::DecoderConfig;
pub use decode::{decode, Decoded, Decoder};
pub use error::{BufferKind, Error, LineFailure, LineIssue, Result};
pub use geometry::{BoundingExtents, Tuple3};
pub use loader::{load_file, ObjLoader, ObjModel};
pub use material::{Material, MaterialLibrary};
pub use mtl::{load_material_library, parse_materials};
pub use report::ModelReport;
pub use resource::{AssetBundle, DirectoryResources, ResourceProvider};
