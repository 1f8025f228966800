mod catalog;
pub mod checksum;
mod compression;
mod error;
mod handles;
mod locator;
mod manifest;
mod path;
mod reference;
mod scan;
mod schema;
mod source;
mod walker;

/// Polymorphic type identity and schema lookup.
pub use catalog::{SchemaCatalog, SchemaProvider, TypeTriple};
/// Declared payload storage.
pub use compression::Compression;
/// Error and result aliases.
pub use error::{Result, WalkError};
/// Canonical handle assignment for discovered references.
pub use handles::{RefTable, ReferenceRecord};
/// Out-of-line resource resolution.
pub use locator::{DirRoot, MemRoot, ResourceLocator, ResourceRoot, resource_basename};
/// Serialized file description and object index.
pub use manifest::{Manifest, ObjectEntry};
/// Field path builder used to label references.
pub use path::{FieldPath, PathMark};
/// Reference callback protocol.
pub use reference::{Reference, ReferenceSink};
/// Per-object failure-isolating driver.
pub use scan::{ObjectOutcome, walk_objects};
/// Schema tree representation.
pub use schema::{ALIGN_BYTES, ANY_CHILD_ALIGN, NodeKind, SchemaNode};
/// Byte source abstraction.
pub use source::{ByteSource, Endianness, FileSource, MemSource};
/// Schema-directed walker.
pub use walker::{WalkOptions, Walker};
