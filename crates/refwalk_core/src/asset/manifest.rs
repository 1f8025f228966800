use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::asset::{Compression, Endianness, MemSource, Result, SchemaCatalog, SchemaNode, TypeTriple, WalkError};

/// One object listed in a container index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectEntry {
	/// Object id (path id).
	pub id: i64,
	/// Absolute payload offset of the object data.
	pub offset: u64,
	/// Declared type name used to pick the root schema.
	#[serde(rename = "type")]
	pub type_name: String,
}

#[derive(Deserialize)]
struct RefTypeEntry {
	#[serde(flatten)]
	triple: TypeTriple,
	root: SchemaNode,
}

#[derive(Deserialize)]
struct ManifestFile {
	name: String,
	data: PathBuf,
	#[serde(default)]
	compression: Compression,
	#[serde(default)]
	big_endian: bool,
	#[serde(default)]
	externals: Vec<String>,
	#[serde(default)]
	types: HashMap<String, SchemaNode>,
	#[serde(default)]
	ref_types: Vec<RefTypeEntry>,
	#[serde(default)]
	objects: Vec<ObjectEntry>,
}

/// Parsed description of one serialized file: payload location, schemas,
/// external container table and object index.
#[derive(Debug, Clone)]
pub struct Manifest {
	/// Container name used for container id `0`.
	pub name: String,
	/// Resolved payload file path.
	pub data_path: PathBuf,
	/// Storage of the payload file; resources are never decoded.
	pub compression: Compression,
	/// Integer byte order of the payload.
	pub endianness: Endianness,
	/// External container names; container id `n` maps to `externals[n - 1]`.
	pub externals: Vec<String>,
	/// Object and polymorphic record schemas.
	pub catalog: SchemaCatalog,
	/// Objects in index order.
	pub objects: Vec<ObjectEntry>,
}

impl Manifest {
	/// Load a manifest; `data` resolves relative to the manifest's directory.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = fs::read_to_string(path)?;
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
		Self::from_json(&text, base_dir)
	}

	/// Parse manifest JSON with relative paths anchored at `base_dir`.
	pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
		let file: ManifestFile = serde_json::from_str(text)?;

		let mut catalog = SchemaCatalog::new();
		for (type_name, root) in file.types {
			catalog.insert_type(type_name, root);
		}
		for entry in file.ref_types {
			catalog.insert_ref_type(entry.triple, entry.root);
		}

		Ok(Self {
			name: file.name,
			data_path: base_dir.join(file.data),
			compression: file.compression,
			endianness: if file.big_endian { Endianness::Big } else { Endianness::Little },
			externals: file.externals,
			catalog,
			objects: file.objects,
		})
	}

	/// Read the payload file, decoding it when the manifest declares a compression.
	pub fn open_data(&self) -> Result<MemSource> {
		let bytes = self.compression.decode(fs::read(&self.data_path)?)?;
		Ok(MemSource::with_endianness(bytes, self.endianness))
	}

	/// Directory holding the payload file.
	pub fn data_dir(&self) -> PathBuf {
		self.data_path.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."))
	}

	/// Look up one object by id.
	pub fn object(&self, id: i64) -> Result<&ObjectEntry> {
		self.objects.iter().find(|item| item.id == id).ok_or(WalkError::ObjectNotFound { id })
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::Manifest;
	use crate::asset::{Compression, Endianness, SchemaProvider, TypeTriple, WalkError};

	const MANIFEST: &str = r#"{
		"name": "level0",
		"data": "level0.bin",
		"compression": "zstd",
		"big_endian": true,
		"externals": ["sharedassets0.assets"],
		"types": {
			"GameObject": { "name": "Base", "type": "GameObject", "children": [
				{ "name": "m_Layer", "type": "unsigned int", "size": 4 }
			]}
		},
		"ref_types": [
			{ "class": "Item", "namespace": "Game", "assembly": "Assembly-CSharp",
			  "root": { "name": "Base", "type": "Item", "children": [
				{ "name": "value", "type": "int", "size": 4 }
			  ]}}
		],
		"objects": [ { "id": 7, "offset": 0, "type": "GameObject" } ]
	}"#;

	#[test]
	fn manifest_builds_catalog_and_resolves_paths() {
		let manifest = Manifest::from_json(MANIFEST, Path::new("/data/build")).expect("manifest parses");

		assert_eq!(manifest.name, "level0");
		assert_eq!(manifest.data_path, Path::new("/data/build/level0.bin"));
		assert_eq!(manifest.data_dir(), Path::new("/data/build"));
		assert_eq!(manifest.endianness, Endianness::Big);
		assert_eq!(manifest.compression, Compression::Zstd);
		assert_eq!(manifest.externals, vec!["sharedassets0.assets".to_owned()]);
		assert!(manifest.catalog.object_schema("GameObject").is_some());
		assert!(manifest.catalog.ref_type_schema(&TypeTriple::new("Item", "Game", "Assembly-CSharp")).is_some());
		assert_eq!(manifest.object(7).expect("object exists").type_name, "GameObject");
	}

	#[test]
	fn unknown_object_ids_are_reported() {
		let manifest = Manifest::from_json(MANIFEST, Path::new(".")).expect("manifest parses");
		assert!(matches!(manifest.object(8), Err(WalkError::ObjectNotFound { id: 8 })));
	}

	#[test]
	fn invalid_json_is_a_manifest_error() {
		let err = Manifest::from_json("{", Path::new(".")).expect_err("parse fails");
		assert!(matches!(err, WalkError::Manifest(_)));
	}
}
