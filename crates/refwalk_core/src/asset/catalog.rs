use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::SchemaNode;

/// `(class, namespace, assembly)` identity of a polymorphic record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeTriple {
	/// Class name.
	pub class: String,
	/// Namespace name, possibly empty.
	pub namespace: String,
	/// Assembly name.
	pub assembly: String,
}

impl TypeTriple {
	/// Build a triple from its parts.
	pub fn new(class: &str, namespace: &str, assembly: &str) -> Self {
		Self {
			class: class.to_owned(),
			namespace: namespace.to_owned(),
			assembly: assembly.to_owned(),
		}
	}
}

impl fmt::Display for TypeTriple {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.namespace.is_empty() {
			write!(f, "{} ({})", self.class, self.assembly)
		} else {
			write!(f, "{}.{} ({})", self.namespace, self.class, self.assembly)
		}
	}
}

/// Supplies root schemas for objects and for polymorphic records.
pub trait SchemaProvider {
	/// Root schema for an object of declared type `type_name`.
	fn object_schema(&self, type_name: &str) -> Option<&SchemaNode>;

	/// Root schema for a polymorphic record body of type `triple`.
	fn ref_type_schema(&self, triple: &TypeTriple) -> Option<&SchemaNode>;
}

/// In-memory lookup table implementing [`SchemaProvider`].
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
	types: HashMap<String, SchemaNode>,
	ref_types: HashMap<TypeTriple, SchemaNode>,
}

impl SchemaCatalog {
	/// Empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register an object root schema under `type_name`.
	pub fn insert_type(&mut self, type_name: impl Into<String>, root: SchemaNode) {
		self.types.insert(type_name.into(), root);
	}

	/// Register a polymorphic record schema.
	pub fn insert_ref_type(&mut self, triple: TypeTriple, root: SchemaNode) {
		self.ref_types.insert(triple, root);
	}

	/// Number of object and record schemas.
	pub fn len(&self) -> usize {
		self.types.len() + self.ref_types.len()
	}

	/// Whether no schemas are registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl SchemaProvider for SchemaCatalog {
	fn object_schema(&self, type_name: &str) -> Option<&SchemaNode> {
		self.types.get(type_name)
	}

	fn ref_type_schema(&self, triple: &TypeTriple) -> Option<&SchemaNode> {
		self.ref_types.get(triple)
	}
}

#[cfg(test)]
mod tests {
	use super::{SchemaCatalog, SchemaProvider, TypeTriple};
	use crate::asset::SchemaNode;

	#[test]
	fn lookups_are_keyed_by_name_and_triple() {
		let mut catalog = SchemaCatalog::new();
		catalog.insert_type("Material", SchemaNode::aggregate("Base", "Material", vec![SchemaNode::string("m_Name")]));
		catalog.insert_ref_type(TypeTriple::new("Foo", "Game", "Assembly-CSharp"), SchemaNode::aggregate("Base", "Foo", Vec::new()));

		assert_eq!(catalog.len(), 2);
		assert!(catalog.object_schema("Material").is_some());
		assert!(catalog.object_schema("Mesh").is_none());
		assert!(catalog.ref_type_schema(&TypeTriple::new("Foo", "Game", "Assembly-CSharp")).is_some());
		assert!(catalog.ref_type_schema(&TypeTriple::new("Foo", "", "Assembly-CSharp")).is_none());
	}

	#[test]
	fn triples_render_with_optional_namespace() {
		assert_eq!(TypeTriple::new("Foo", "Game", "Asm").to_string(), "Game.Foo (Asm)");
		assert_eq!(TypeTriple::new("Foo", "", "Asm").to_string(), "Foo (Asm)");
	}
}
