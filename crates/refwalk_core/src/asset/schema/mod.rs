use serde::Deserialize;

/// Meta flag: the cursor is rounded to 4 bytes after this node.
pub const ALIGN_BYTES: u32 = 0x4000;
/// Meta flag: some descendant requests 4-byte alignment.
pub const ANY_CHILD_ALIGN: u32 = 0x8000;

/// Traversal behavior selected for a schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	/// Fixed-size scalar folded byte-for-byte.
	Basic,
	/// Count-prefixed sequence; children are `(size, data)`.
	Array,
	/// `vector`/`map`/`staticvector` wrapper around one Array child.
	Associative,
	/// Length-prefixed byte string.
	String,
	/// `(container id, local id)` pointer to an object of type `target`.
	FixedReference {
		/// Referenced type name from `PPtr<T>`.
		target: Box<str>,
	},
	/// `(offset, size, path)` triple naming bytes in an external resource.
	StreamedBlobInline,
	/// `(path, offset, size)` triple naming bytes in an external resource.
	StreamedBlobOutOfLine,
	/// Registry of polymorphic records addressed by reference id.
	PolymorphicRegistry,
	/// Plain composite visited child by child.
	Aggregate,
}

impl NodeKind {
	/// Classify a type-tree entry; the first matching rule wins.
	pub fn classify(type_name: &str, is_array: bool, has_children: bool) -> Self {
		if is_array {
			return Self::Array;
		}

		match type_name {
			"vector" | "map" | "staticvector" => return Self::Associative,
			"StreamingInfo" => return Self::StreamedBlobInline,
			"StreamedResource" => return Self::StreamedBlobOutOfLine,
			"string" => return Self::String,
			"ManagedReferencesRegistry" => return Self::PolymorphicRegistry,
			_ => {}
		}

		if let Some(target) = type_name.strip_prefix("PPtr<").and_then(|rest| rest.strip_suffix('>')) {
			return Self::FixedReference { target: target.into() };
		}

		if has_children { Self::Aggregate } else { Self::Basic }
	}

	/// Stable label for diagnostics.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Basic => "basic",
			Self::Array => "array",
			Self::Associative => "associative",
			Self::String => "string",
			Self::FixedReference { .. } => "reference",
			Self::StreamedBlobInline => "streamed_inline",
			Self::StreamedBlobOutOfLine => "streamed_out_of_line",
			Self::PolymorphicRegistry => "registry",
			Self::Aggregate => "aggregate",
		}
	}
}

/// One node of an object's self-describing layout tree.
///
/// Children are stored in on-disk field order; the walker consumes them in
/// exactly that order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawNode")]
pub struct SchemaNode {
	/// Field name.
	pub name: Box<str>,
	/// Declared type name.
	pub type_name: Box<str>,
	/// Byte size, or `-1` when variable.
	pub size: i32,
	/// Alignment meta flags.
	pub meta_flags: u32,
	/// Classified traversal behavior.
	pub kind: NodeKind,
	/// Ordered child nodes.
	pub children: Vec<SchemaNode>,
}

#[derive(Deserialize)]
struct RawNode {
	name: String,
	#[serde(rename = "type")]
	type_name: String,
	#[serde(default = "variable_size")]
	size: i32,
	#[serde(default)]
	flags: u32,
	#[serde(default)]
	is_array: bool,
	#[serde(default)]
	children: Vec<SchemaNode>,
}

fn variable_size() -> i32 {
	-1
}

impl From<RawNode> for SchemaNode {
	fn from(raw: RawNode) -> Self {
		Self::new(&raw.name, &raw.type_name, raw.size, raw.is_array, raw.children).with_flags(raw.flags)
	}
}

impl SchemaNode {
	/// Build and classify a node.
	pub fn new(name: &str, type_name: &str, size: i32, is_array: bool, children: Vec<SchemaNode>) -> Self {
		Self {
			name: name.into(),
			type_name: type_name.into(),
			size,
			meta_flags: 0,
			kind: NodeKind::classify(type_name, is_array, !children.is_empty()),
			children,
		}
	}

	/// Scalar leaf of `size` bytes.
	pub fn basic(name: &str, type_name: &str, size: i32) -> Self {
		Self::new(name, type_name, size, false, Vec::new())
	}

	/// Composite node; classification still applies to `type_name`.
	pub fn aggregate(name: &str, type_name: &str, children: Vec<SchemaNode>) -> Self {
		Self::new(name, type_name, -1, false, children)
	}

	/// Count-prefixed array named `Array` with the given element node.
	pub fn array_of(element: SchemaNode) -> Self {
		Self::new("Array", "Array", -1, true, vec![Self::basic("size", "int", 4), element])
	}

	/// `vector` wrapper around an array of `element`.
	pub fn vector(name: &str, element: SchemaNode) -> Self {
		Self::aggregate(name, "vector", vec![Self::array_of(element)])
	}

	/// Length-prefixed string field.
	pub fn string(name: &str) -> Self {
		let chars = Self::array_of(Self::basic("data", "char", 1)).with_flags(ALIGN_BYTES);
		Self::aggregate(name, "string", vec![chars]).with_flags(ANY_CHILD_ALIGN)
	}

	/// `PPtr<target>` reference field.
	pub fn pptr(name: &str, target: &str) -> Self {
		let type_name = format!("PPtr<{target}>");
		Self::aggregate(
			name,
			&type_name,
			vec![Self::basic("m_FileID", "int", 4), Self::basic("m_PathID", "SInt64", 8)],
		)
	}

	/// Replace the meta flags.
	pub fn with_flags(mut self, meta_flags: u32) -> Self {
		self.meta_flags = meta_flags;
		self
	}

	/// Whether the cursor is rounded to 4 bytes after this node.
	pub fn aligns(&self) -> bool {
		self.meta_flags & (ALIGN_BYTES | ANY_CHILD_ALIGN) != 0
	}

	/// Fixed byte size when known.
	pub fn byte_size(&self) -> Option<usize> {
		usize::try_from(self.size).ok()
	}

	/// Whether this node is a scalar leaf.
	pub fn is_basic(&self) -> bool {
		self.kind == NodeKind::Basic
	}
}
