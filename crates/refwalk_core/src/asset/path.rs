use std::fmt::Write;

/// Field path built during descent, e.g. `m_Materials[2].m_Shader`.
///
/// Every `push_*` returns a mark; passing it to [`FieldPath::restore`] drops
/// everything pushed since.
#[derive(Debug, Clone, Default)]
pub struct FieldPath {
	buf: String,
}

/// Length of a [`FieldPath`] before a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMark(usize);

impl FieldPath {
	/// Empty path.
	pub fn new() -> Self {
		Self::default()
	}

	/// Reset to a root field name.
	pub fn reset(&mut self, root: &str) {
		self.buf.clear();
		self.buf.push_str(root);
	}

	/// Append `.name`.
	pub fn push_field(&mut self, name: &str) -> PathMark {
		let mark = self.mark();
		self.buf.push('.');
		self.buf.push_str(name);
		mark
	}

	/// Append `[index]`.
	pub fn push_index(&mut self, index: usize) -> PathMark {
		let mark = self.mark();
		let _ = write!(self.buf, "[{index}]");
		mark
	}

	/// Append `rid(id).data`.
	pub fn push_rid(&mut self, rid: i64) -> PathMark {
		let mark = self.mark();
		let _ = write!(self.buf, "rid({rid}).data");
		mark
	}

	/// Current length as a mark.
	pub fn mark(&self) -> PathMark {
		PathMark(self.buf.len())
	}

	/// Truncate back to `mark`.
	pub fn restore(&mut self, mark: PathMark) {
		self.buf.truncate(mark.0);
	}

	/// Rendered path.
	pub fn as_str(&self) -> &str {
		&self.buf
	}
}
