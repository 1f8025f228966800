use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors produced while loading schemas and walking serialized objects.
#[derive(Debug, Error)]
pub enum WalkError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Manifest or schema JSON could not be parsed.
	#[error("manifest: {0}")]
	Manifest(#[from] serde_json::Error),
	/// Compressed payload inflated past the configured ceiling.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, source length {len}")]
	UnexpectedEof {
		/// Absolute offset where the read was attempted.
		at: u64,
		/// Requested bytes.
		need: usize,
		/// Total source length.
		len: u64,
	},
	/// A count or length prefix was negative.
	#[error("negative length {len} at offset {at}")]
	NegativeLength {
		/// Absolute offset of the prefix.
		at: u64,
		/// Parsed signed value.
		len: i64,
	},
	/// Schema shape did not match what the traversal requires.
	#[error("malformed record at {path:?}: {reason}")]
	MalformedRecord {
		/// Field path where the mismatch was found.
		path: String,
		/// Short description of the violated shape rule.
		reason: &'static str,
	},
	/// Schema recursion went deeper than the configured ceiling.
	#[error("walk depth exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Polymorphic registry reported a version outside {1, 2}.
	#[error("unsupported registry version {version}")]
	UnsupportedFormat {
		/// Parsed registry version.
		version: i32,
	},
	/// Polymorphic record type triple has no schema.
	#[error("unknown reference type {namespace}.{class} ({assembly})")]
	UnknownType {
		/// Class name.
		class: String,
		/// Namespace name.
		namespace: String,
		/// Assembly name.
		assembly: String,
	},
	/// Object type name has no root schema.
	#[error("unknown object type: {name}")]
	UnknownObjectType {
		/// Declared type name.
		name: String,
	},
	/// Out-of-line resource could not be opened from a search root.
	#[error("resource unavailable: {name}")]
	ResourceUnavailable {
		/// Resource basename.
		name: String,
	},
	/// Requested object id is not listed in the manifest.
	#[error("object not found: {id}")]
	ObjectNotFound {
		/// Requested object id.
		id: i64,
	},
}

impl WalkError {
	/// Whether this error aborts only the current object rather than the whole run.
	pub fn is_object_fatal(&self) -> bool {
		matches!(
			self,
			Self::UnexpectedEof { .. }
				| Self::NegativeLength { .. }
				| Self::MalformedRecord { .. }
				| Self::DepthExceeded { .. }
				| Self::UnsupportedFormat { .. }
				| Self::UnknownType { .. }
				| Self::UnknownObjectType { .. }
		)
	}
}
