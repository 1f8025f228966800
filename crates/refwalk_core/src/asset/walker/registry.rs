//! Polymorphic reference registries.
//!
//! Version 1 stores a self-terminating run of records; version 2 stores a
//! `RefIds` array whose elements carry an explicit reference id. Either way a
//! record body is laid out by the schema registered for its type triple.

use crate::asset::walker::Walker;
use crate::asset::{ByteSource, NodeKind, ReferenceSink, Result, SchemaNode, SchemaProvider, TypeTriple, WalkError};

impl<'a, S, P, C> Walker<'a, S, P, C>
where
	S: ByteSource + ?Sized,
	P: SchemaProvider + ?Sized,
	C: ReferenceSink + ?Sized,
{
	pub(super) fn visit_registry(&mut self, node: &SchemaNode, depth: u32) -> Result<()> {
		if node.children.len() < 2 {
			return Err(self.malformed("registry requires version and records"));
		}

		let width = self.basic_size(&node.children[0])?;
		let version = self.source.read_i32(self.offset)?;
		self.fold(width)?;

		match version {
			1 => {
				let record = &node.children[1];
				let Some(type_node) = record.children.first().filter(|_| record.children.len() >= 2) else {
					return Err(self.malformed("referenced object requires type and data"));
				};

				let mut rid = 0_i64;
				while self.visit_record(type_node, rid, depth)? {
					rid += 1;
				}
			}
			2 => {
				let refs = &node.children[1];
				if refs.children.is_empty() || refs.name.as_ref() != "RefIds" {
					return Err(self.malformed("registry v2 requires RefIds vector"));
				}

				let array = &refs.children[0];
				if array.children.len() != 2 || array.kind != NodeKind::Array {
					return Err(self.malformed("registry v2 RefIds must be an array"));
				}

				let mark = self.path.push_field("RefIds");
				self.visit_ref_ids(array, depth)?;
				self.path.restore(mark);
			}
			_ => return Err(WalkError::UnsupportedFormat { version }),
		}

		Ok(())
	}

	fn visit_ref_ids(&mut self, array: &SchemaNode, depth: u32) -> Result<()> {
		let element = &array.children[1];
		let count = self.read_len(self.offset)?;
		self.fold(4)?;

		if count > 0 && element.children.len() < 3 {
			return Err(self.malformed("referenced object requires rid, type and data"));
		}

		for _ in 0..count {
			let rid = self.source.read_i64(self.offset)?;
			self.fold(8)?;
			self.visit_record(&element.children[1], rid, depth)?;
		}

		Ok(())
	}

	/// Visit one record; returns `false` when it is a terminator.
	fn visit_record(&mut self, type_node: &SchemaNode, rid: i64, depth: u32) -> Result<bool> {
		if type_node.children.len() < 3 {
			return Err(self.malformed("referenced type requires class, namespace and assembly"));
		}

		let triple = TypeTriple {
			class: self.fold_type_name()?,
			namespace: self.fold_type_name()?,
			assembly: self.fold_type_name()?,
		};

		if triple == self.options.terminator || rid == -1 || rid == -2 {
			return Ok(false);
		}

		let schemas = self.schemas;
		let Some(root) = schemas.ref_type_schema(&triple) else {
			return Err(WalkError::UnknownType {
				class: triple.class,
				namespace: triple.namespace,
				assembly: triple.assembly,
			});
		};

		let mark = self.path.push_rid(rid);
		self.visit(root, true, depth + 1)?;
		self.path.restore(mark);
		Ok(true)
	}

	/// Fold a length-prefixed name, then skip its alignment padding unfolded.
	fn fold_type_name(&mut self) -> Result<String> {
		let len = self.read_len(self.offset)?;
		let name = self.source.read_string(self.offset + 4, len)?;
		self.fold(4 + len)?;
		self.align4();
		Ok(name)
	}
}
