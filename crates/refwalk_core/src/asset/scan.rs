use tracing::warn;

use crate::asset::{ByteSource, ObjectEntry, ReferenceSink, Result, SchemaProvider, Walker};

/// Walk result for one indexed object.
#[derive(Debug)]
pub struct ObjectOutcome {
	/// Object id.
	pub id: i64,
	/// Declared type name.
	pub type_name: String,
	/// Checksum, or the error that aborted this object.
	pub result: Result<u32>,
}

/// Walk every object in order, isolating failures to the object that raised them.
pub fn walk_objects<'o, S, P, C>(walker: &mut Walker<'_, S, P, C>, objects: impl IntoIterator<Item = &'o ObjectEntry>) -> Vec<ObjectOutcome>
where
	S: ByteSource + ?Sized,
	P: SchemaProvider + ?Sized,
	C: ReferenceSink + ?Sized,
{
	objects
		.into_iter()
		.map(|entry| {
			let result = walker.walk_entry(entry);
			if let Err(err) = &result {
				warn!(object = entry.id, type_name = entry.type_name.as_str(), error = %err, "object walk failed");
			}
			ObjectOutcome {
				id: entry.id,
				type_name: entry.type_name.clone(),
				result,
			}
		})
		.collect()
}
