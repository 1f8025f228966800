use tracing::{debug, warn};

use crate::asset::checksum;
use crate::asset::path::FieldPath;
use crate::asset::{
	ByteSource, NodeKind, ObjectEntry, Reference, ReferenceSink, ResourceLocator, Result, SchemaNode, SchemaProvider, TypeTriple, WalkError,
};

mod registry;

/// Traversal limits and registry sentinel configuration.
#[derive(Debug, Clone)]
pub struct WalkOptions {
	/// Type triple that terminates a version-1 polymorphic registry.
	pub terminator: TypeTriple,
	/// Maximum schema nesting depth.
	pub max_depth: u32,
}

impl Default for WalkOptions {
	fn default() -> Self {
		Self {
			terminator: TypeTriple::new("Terminus", "UnityEngine.DMAT", "FAKE_ASM"),
			max_depth: 64,
		}
	}
}

/// Schema-directed walker computing reference-independent object checksums.
///
/// One walker serves every object of one serialized file. It owns the
/// resource locator, so opened resource handles live until the walker is
/// dropped.
pub struct Walker<'a, S: ?Sized, P: ?Sized, C: ?Sized> {
	source: &'a S,
	schemas: &'a P,
	sink: &'a mut C,
	resources: ResourceLocator,
	options: WalkOptions,
	object_id: i64,
	offset: u64,
	crc: u32,
	path: FieldPath,
}

impl<'a, S, P, C> Walker<'a, S, P, C>
where
	S: ByteSource + ?Sized,
	P: SchemaProvider + ?Sized,
	C: ReferenceSink + ?Sized,
{
	/// Walker over `source` resolving schemas from `schemas` and reporting references to `sink`.
	pub fn new(source: &'a S, schemas: &'a P, resources: ResourceLocator, sink: &'a mut C) -> Self {
		Self {
			source,
			schemas,
			sink,
			resources,
			options: WalkOptions::default(),
			object_id: 0,
			offset: 0,
			crc: 0,
			path: FieldPath::new(),
		}
	}

	/// Replace traversal options.
	pub fn with_options(mut self, options: WalkOptions) -> Self {
		self.options = options;
		self
	}

	/// Walk one object laid out by `root` starting at `start`, returning its checksum.
	///
	/// An error aborts this object only; the walker stays usable for the next one.
	pub fn walk(&mut self, object_id: i64, start: u64, root: &SchemaNode) -> Result<u32> {
		self.object_id = object_id;
		self.offset = start;
		self.crc = 0;

		for child in &root.children {
			self.path.reset(&child.name);
			self.visit(child, false, 0)?;
		}

		Ok(self.crc)
	}

	/// Walk an indexed object using its declared type's root schema.
	pub fn walk_entry(&mut self, entry: &ObjectEntry) -> Result<u32> {
		let schemas = self.schemas;
		let root = schemas
			.object_schema(&entry.type_name)
			.ok_or_else(|| WalkError::UnknownObjectType { name: entry.type_name.clone() })?;
		self.walk(entry.id, entry.offset, root)
	}

	/// Cursor position after the last walk.
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// Resource locator owned by this walker.
	pub fn resources(&self) -> &ResourceLocator {
		&self.resources
	}

	fn visit(&mut self, node: &SchemaNode, in_registry: bool, depth: u32) -> Result<()> {
		if depth >= self.options.max_depth {
			return Err(WalkError::DepthExceeded {
				max_depth: self.options.max_depth,
			});
		}

		match &node.kind {
			NodeKind::Basic => {
				let size = self.basic_size(node)?;
				self.fold(size)?;
			}
			NodeKind::Array => self.visit_array(node, in_registry, depth)?,
			NodeKind::Associative => {
				let Some(array) = node.children.first().filter(|child| child.kind == NodeKind::Array) else {
					return Err(self.malformed("container without array child"));
				};
				self.visit_array(array, in_registry, depth)?;
			}
			NodeKind::FixedReference { target } => self.visit_reference(target)?,
			NodeKind::StreamedBlobInline => self.visit_streamed_inline(node)?,
			NodeKind::StreamedBlobOutOfLine => self.visit_streamed_out_of_line(node)?,
			NodeKind::String => {
				let len = self.read_len(self.offset)?;
				self.fold(4 + len)?;
			}
			NodeKind::PolymorphicRegistry => {
				if in_registry {
					debug!(path = self.path.as_str(), "skipping nested reference registry");
				} else {
					self.visit_registry(node, depth)?;
				}
			}
			NodeKind::Aggregate => {
				for child in &node.children {
					let mark = self.path.push_field(&child.name);
					self.visit(child, in_registry, depth + 1)?;
					self.path.restore(mark);
				}
			}
		}

		if node.aligns() {
			self.align4();
		}

		Ok(())
	}

	fn visit_array(&mut self, node: &SchemaNode, in_registry: bool, depth: u32) -> Result<()> {
		let Some(data) = node.children.get(1) else {
			return Err(self.malformed("array without data node"));
		};

		let count = self.read_len(self.offset)?;
		if data.is_basic() {
			let element = self.basic_size(data)?;
			let Some(total) = element.checked_mul(count).and_then(|bytes| bytes.checked_add(4)) else {
				return Err(self.malformed("array byte length overflows"));
			};
			return self.fold(total);
		}

		self.fold(4)?;
		// Bound by remaining bytes; elements may consume none.
		if count as u64 > self.source.len().saturating_sub(self.offset) {
			return Err(self.malformed("array count exceeds remaining bytes"));
		}
		for idx in 0..count {
			let mark = self.path.push_index(idx);
			self.visit(data, in_registry, depth + 1)?;
			self.path.restore(mark);
		}

		Ok(())
	}

	fn visit_reference(&mut self, target: &str) -> Result<()> {
		let container_id = self.source.read_i32(self.offset)?;
		let local_id = self.source.read_i64(self.offset + 4)?;
		self.offset += 12;

		let reference = Reference {
			owner_id: self.object_id,
			container_id,
			local_id,
			field_path: self.path.as_str(),
			type_name: target,
		};
		if reference.is_null() {
			return Ok(());
		}

		let handle = self.sink.on_reference(&reference);
		self.crc = checksum::append_handle(self.crc, handle);
		Ok(())
	}

	fn visit_streamed_inline(&mut self, node: &SchemaNode) -> Result<()> {
		if node.children.len() != 3 {
			return Err(self.malformed("streaming info requires offset, size and path"));
		}

		let offset = match node.children[0].size {
			4 => i64::from(self.source.read_i32(self.offset)?),
			8 => self.source.read_i64(self.offset)?,
			_ => return Err(self.malformed("streaming offset must be 4 or 8 bytes")),
		};
		self.offset += node.children[0].size as u64;

		let size = self.source.read_i32(self.offset)?;
		self.offset += 4;

		let name = self.read_aligned_string()?;
		self.fold_resource(&name, offset, i64::from(size));
		Ok(())
	}

	fn visit_streamed_out_of_line(&mut self, node: &SchemaNode) -> Result<()> {
		if node.children.len() != 3 {
			return Err(self.malformed("streamed resource requires path, offset and size"));
		}

		let name = self.read_aligned_string()?;
		let offset = self.source.read_i64(self.offset)?;
		self.offset += 8;
		let size = self.source.read_i64(self.offset)?;
		self.offset += 8;

		self.fold_resource(&name, offset, size);
		Ok(())
	}

	/// Fold `size` resource bytes at `offset`; any failure contributes nothing.
	fn fold_resource(&mut self, name: &str, offset: i64, size: i64) {
		if size <= 0 {
			return;
		}

		let Some(resource) = self.resources.open(name) else {
			return;
		};

		let (Ok(at), Ok(len)) = (u64::try_from(offset), usize::try_from(size)) else {
			warn!(resource = name, offset, size, "invalid resource range; contributing nothing");
			return;
		};

		match resource.crc32_update(at, len, self.crc) {
			Ok(crc) => self.crc = crc,
			Err(err) => warn!(resource = name, offset, size, error = %err, "resource read failed; contributing nothing"),
		}
	}

	fn fold(&mut self, len: usize) -> Result<()> {
		self.crc = self.source.crc32_update(self.offset, len, self.crc)?;
		self.offset += len as u64;
		Ok(())
	}

	fn read_aligned_string(&mut self) -> Result<String> {
		let len = self.read_len(self.offset)?;
		let text = self.source.read_string(self.offset + 4, len)?;
		self.offset += 4 + len as u64;
		self.align4();
		Ok(text)
	}

	fn read_len(&self, at: u64) -> Result<usize> {
		let len = self.source.read_i32(at)?;
		usize::try_from(len).map_err(|_| WalkError::NegativeLength { at, len: i64::from(len) })
	}

	fn basic_size(&self, node: &SchemaNode) -> Result<usize> {
		node.byte_size().ok_or_else(|| self.malformed("scalar without fixed size"))
	}

	fn align4(&mut self) {
		self.offset = (self.offset + 3) & !3;
	}

	fn malformed(&self, reason: &'static str) -> WalkError {
		WalkError::MalformedRecord {
			path: self.path.as_str().to_owned(),
			reason,
		}
	}
}
