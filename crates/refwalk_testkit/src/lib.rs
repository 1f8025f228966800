//! Shared test helpers for workspace crates.

use std::fs;
use std::path::{Path, PathBuf};

/// Little-endian payload assembler for synthetic serialized objects.
#[derive(Debug, Clone, Default)]
pub struct PayloadBuilder {
	bytes: Vec<u8>,
}

impl PayloadBuilder {
	/// Empty payload.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append one byte.
	pub fn u8(mut self, value: u8) -> Self {
		self.bytes.push(value);
		self
	}

	/// Append a 32-bit signed integer.
	pub fn i32(mut self, value: i32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append a 64-bit signed integer.
	pub fn i64(mut self, value: i64) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append raw bytes.
	pub fn raw(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Append a 4-byte length prefix and the string bytes, unpadded.
	pub fn string(self, text: &str) -> Self {
		self.i32(text.len() as i32).raw(text.as_bytes())
	}

	/// Append a length-prefixed string followed by padding to 4 bytes.
	pub fn aligned_string(self, text: &str) -> Self {
		self.string(text).align4()
	}

	/// Append a `(container id, local id)` reference.
	pub fn pptr(self, container_id: i32, local_id: i64) -> Self {
		self.i32(container_id).i64(local_id)
	}

	/// Zero-pad to the next multiple of 4.
	pub fn align4(mut self) -> Self {
		while self.bytes.len() % 4 != 0 {
			self.bytes.push(0);
		}
		self
	}

	/// Current length in bytes.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether nothing has been appended.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Finish and return the payload.
	pub fn finish(self) -> Vec<u8> {
		self.bytes
	}
}

/// Write `payload` as `data_name` and `manifest` as `manifest.json` under `dir`.
pub fn write_fixture(dir: &Path, manifest: &serde_json::Value, data_name: &str, payload: &[u8]) -> PathBuf {
	fs::write(dir.join(data_name), payload).expect("payload writes");
	let manifest_path = dir.join("manifest.json");
	let text = serde_json::to_string_pretty(manifest).expect("manifest serializes");
	fs::write(&manifest_path, text).expect("manifest writes");
	manifest_path
}

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Create a fresh temporary directory.
pub fn temp_dir() -> tempfile::TempDir {
	tempfile::tempdir().expect("tempdir creates")
}
