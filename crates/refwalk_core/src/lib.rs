//! Reference extraction and content checksums for schema-described serialized objects.

/// Schema-directed traversal, reference reporting, and resource resolution.
pub mod asset;
