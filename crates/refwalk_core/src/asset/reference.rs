/// One non-null reference discovered during a walk.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
	/// Object whose payload holds the reference.
	pub owner_id: i64,
	/// Target container id (`0` is the owner's own container).
	pub container_id: i32,
	/// Target object id inside that container.
	pub local_id: i64,
	/// Field path of the reference inside the owner.
	pub field_path: &'a str,
	/// Referenced type name from `PPtr<T>`.
	pub type_name: &'a str,
}

impl Reference<'_> {
	/// Whether both target ids are zero.
	pub fn is_null(&self) -> bool {
		self.container_id == 0 && self.local_id == 0
	}
}

/// Receives discovered references and returns their canonical handles.
///
/// The returned handle replaces the raw reference bytes in the checksum, so
/// it must be total and deterministic for equivalent targets.
pub trait ReferenceSink {
	/// Record `reference` and return its canonical handle.
	fn on_reference(&mut self, reference: &Reference<'_>) -> i32;
}

impl<F> ReferenceSink for F
where
	F: FnMut(&Reference<'_>) -> i32,
{
	fn on_reference(&mut self, reference: &Reference<'_>) -> i32 {
		self(reference)
	}
}
