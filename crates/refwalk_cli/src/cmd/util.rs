use std::path::{Path, PathBuf};

use refwalk::asset::{DirRoot, Manifest, MemSource, ObjectEntry, ResourceLocator, Result};

/// Loaded manifest with its payload bytes.
pub(crate) struct Session {
	pub manifest: Manifest,
	pub source: MemSource,
}

impl Session {
	/// Load `manifest_path` and its payload file.
	pub(crate) fn open(manifest_path: &Path) -> Result<Self> {
		let manifest = Manifest::load(manifest_path)?;
		let source = manifest.open_data()?;
		Ok(Self { manifest, source })
	}

	/// Locator searching `archive` first, then the payload's directory.
	pub(crate) fn locator(&self, archive: Option<PathBuf>) -> ResourceLocator {
		let locator = ResourceLocator::new();
		let locator = match archive {
			Some(dir) => locator.with_container(DirRoot::new(dir)),
			None => locator,
		};
		locator.with_sibling_dir(self.manifest.data_dir())
	}

	/// Objects selected by `--object`, or all of them in index order.
	pub(crate) fn objects(&self, object: Option<i64>) -> Result<Vec<&ObjectEntry>> {
		match object {
			Some(id) => Ok(vec![self.manifest.object(id)?]),
			None => Ok(self.manifest.objects.iter().collect()),
		}
	}
}

/// Render a checksum the way every command prints it.
pub(crate) fn crc_hex(crc: u32) -> String {
	format!("0x{crc:08x}")
}

/// Pretty-print a serializable payload to stdout.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) {
	match serde_json::to_string_pretty(value) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: json output failed: {err}"),
	}
}
