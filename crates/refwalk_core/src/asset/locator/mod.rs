use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::asset::{ByteSource, FileSource, MemSource, Result, WalkError};

/// A place resource files can be opened from.
pub trait ResourceRoot {
	/// Open the resource named `name` (a basename) for positional reads.
	fn open(&self, name: &str) -> Result<Box<dyn ByteSource>>;

	/// Human-readable root label for diagnostics.
	fn label(&self) -> String;
}

/// Resources stored as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DirRoot {
	dir: PathBuf,
}

impl DirRoot {
	/// Root at `dir`.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}
}

impl ResourceRoot for DirRoot {
	fn open(&self, name: &str) -> Result<Box<dyn ByteSource>> {
		match FileSource::open(self.dir.join(name)) {
			Ok(source) => Ok(Box::new(source)),
			Err(WalkError::Io(err)) if err.kind() == io::ErrorKind::NotFound => Err(WalkError::ResourceUnavailable { name: name.to_owned() }),
			Err(err) => Err(err),
		}
	}

	fn label(&self) -> String {
		self.dir.display().to_string()
	}
}

/// Members of an already-mounted container held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemRoot {
	members: HashMap<String, Vec<u8>>,
}

impl MemRoot {
	/// Empty container.
	pub fn new() -> Self {
		Self::default()
	}

	/// Add or replace one member.
	pub fn insert(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
		self.members.insert(name.into(), bytes);
	}
}

impl ResourceRoot for MemRoot {
	fn open(&self, name: &str) -> Result<Box<dyn ByteSource>> {
		self.members
			.get(name)
			.map(|bytes| Box::new(MemSource::new(bytes.clone())) as Box<dyn ByteSource>)
			.ok_or_else(|| WalkError::ResourceUnavailable { name: name.to_owned() })
	}

	fn label(&self) -> String {
		format!("container({} members)", self.members.len())
	}
}

/// Resolves out-of-line resource names to open byte sources.
///
/// Lookups try the container root, then the sibling root. Results, including
/// misses, are cached by basename for the locator's lifetime; every handle is
/// released when the locator is dropped.
#[derive(Default)]
pub struct ResourceLocator {
	container: Option<Box<dyn ResourceRoot>>,
	sibling: Option<Box<dyn ResourceRoot>>,
	cache: HashMap<Box<str>, Option<Box<dyn ByteSource>>>,
	missing: Vec<Box<str>>,
}

impl ResourceLocator {
	/// Locator with no search roots.
	pub fn new() -> Self {
		Self::default()
	}

	/// Use `root` as the first-tier container root.
	pub fn with_container(mut self, root: impl ResourceRoot + 'static) -> Self {
		self.container = Some(Box::new(root));
		self
	}

	/// Use `root` as the second-tier sibling root.
	pub fn with_sibling(mut self, root: impl ResourceRoot + 'static) -> Self {
		self.sibling = Some(Box::new(root));
		self
	}

	/// Use the directory holding the original input file as the sibling root.
	pub fn with_sibling_dir(self, dir: impl Into<PathBuf>) -> Self {
		self.with_sibling(DirRoot::new(dir))
	}

	/// Open `name`, returning the cached handle or `None` when it is missing.
	pub fn open(&mut self, name: &str) -> Option<&dyn ByteSource> {
		let name = resource_basename(name);
		if !self.cache.contains_key(name) {
			let opened = self.open_uncached(name);
			if opened.is_none() {
				self.missing.push(name.into());
			}
			self.cache.insert(name.into(), opened);
		}

		self.cache.get(name).and_then(|entry| entry.as_deref())
	}

	/// Basenames that could not be opened, in first-miss order.
	pub fn missing(&self) -> &[Box<str>] {
		&self.missing
	}

	/// Number of successfully opened handles.
	pub fn open_count(&self) -> usize {
		self.cache.values().filter(|item| item.is_some()).count()
	}

	fn open_uncached(&self, name: &str) -> Option<Box<dyn ByteSource>> {
		let mut failures = Vec::new();
		for root in [&self.container, &self.sibling].into_iter().flatten() {
			match root.open(name) {
				Ok(source) => return Some(source),
				Err(err) => failures.push(format!("{}: {err}", root.label())),
			}
		}

		warn!(resource = name, tried = ?failures, "resource unavailable");
		None
	}
}

/// Strip directory components from a resource path.
pub fn resource_basename(name: &str) -> &str {
	name.rsplit(['/', '\\']).next().unwrap_or(name)
}
