use std::collections::HashMap;
use std::sync::Arc;

use crate::asset::{Reference, ReferenceSink};

/// One reference as recorded by [`RefTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
	/// Owning object id.
	pub owner_id: i64,
	/// Raw target container id.
	pub container_id: i32,
	/// Raw target local id.
	pub local_id: i64,
	/// Resolved target container name.
	pub container: Arc<str>,
	/// Field path inside the owner.
	pub field_path: Arc<str>,
	/// Referenced type name.
	pub type_name: Arc<str>,
	/// Canonical handle folded into the checksum.
	pub handle: i32,
}

/// Canonical handle table keyed by `(container name, local id)`.
///
/// Container ids are file-local indices; translating them through the
/// current file's external table lets references from different files to the
/// same target share one handle. Handles start at 1 in first-seen order.
#[derive(Debug, Clone)]
pub struct RefTable {
	self_name: Arc<str>,
	externals: Vec<Arc<str>>,
	handles: HashMap<(Arc<str>, i64), i32>,
	records: Vec<ReferenceRecord>,
}

impl RefTable {
	/// Table whose current file is `self_name` with the given externals.
	pub fn new(self_name: &str, externals: &[String]) -> Self {
		let mut table = Self {
			self_name: Arc::from(""),
			externals: Vec::new(),
			handles: HashMap::new(),
			records: Vec::new(),
		};
		table.set_context(self_name, externals);
		table
	}

	/// Switch to another file's naming context, keeping assigned handles.
	pub fn set_context(&mut self, self_name: &str, externals: &[String]) {
		self.self_name = Arc::from(self_name);
		self.externals = externals.iter().map(|name| Arc::from(name.as_str())).collect();
	}

	/// Name of the container addressed by `container_id` in the current file.
	pub fn container_name(&self, container_id: i32) -> Arc<str> {
		if container_id == 0 {
			return self.self_name.clone();
		}

		usize::try_from(container_id)
			.ok()
			.and_then(|id| id.checked_sub(1))
			.and_then(|idx| self.externals.get(idx))
			.cloned()
			.unwrap_or_else(|| Arc::from(format!("#{container_id}")))
	}

	/// Canonical handle for a target, assigning the next one when new.
	pub fn handle_for(&mut self, container_id: i32, local_id: i64) -> i32 {
		let key = (self.container_name(container_id), local_id);
		let next = i32::try_from(self.handles.len() + 1).unwrap_or(i32::MAX);
		*self.handles.entry(key).or_insert(next)
	}

	/// Every recorded reference in report order.
	pub fn records(&self) -> &[ReferenceRecord] {
		&self.records
	}

	/// Number of distinct targets seen.
	pub fn target_count(&self) -> usize {
		self.handles.len()
	}
}

impl ReferenceSink for RefTable {
	fn on_reference(&mut self, reference: &Reference<'_>) -> i32 {
		let handle = self.handle_for(reference.container_id, reference.local_id);
		self.records.push(ReferenceRecord {
			owner_id: reference.owner_id,
			container_id: reference.container_id,
			local_id: reference.local_id,
			container: self.container_name(reference.container_id),
			field_path: Arc::from(reference.field_path),
			type_name: Arc::from(reference.type_name),
			handle,
		});
		handle
	}
}
