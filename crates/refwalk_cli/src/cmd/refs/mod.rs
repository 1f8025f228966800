use std::path::PathBuf;

use refwalk::asset::{RefTable, ReferenceRecord, Walker, walk_objects};

use crate::cmd::util::{Session, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub manifest: PathBuf,
	#[arg(long)]
	pub archive: Option<PathBuf>,
	#[arg(long = "object")]
	pub object_id: Option<i64>,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Walk selected objects and print every non-null reference in report order.
pub fn run(args: Args) -> refwalk::asset::Result<()> {
	let Args {
		manifest: path,
		archive,
		object_id,
		limit,
		json,
	} = args;

	let session = Session::open(&path)?;
	let objects = session.objects(object_id)?;

	let mut table = RefTable::new(&session.manifest.name, &session.manifest.externals);
	let mut walker = Walker::new(&session.source, &session.manifest.catalog, session.locator(archive), &mut table);
	let failed: Vec<(i64, String)> = walk_objects(&mut walker, objects)
		.into_iter()
		.filter_map(|outcome| outcome.result.err().map(|err| (outcome.id, err.to_string())))
		.collect();
	let missing: Vec<String> = walker.resources().missing().iter().map(|name| name.to_string()).collect();
	drop(walker);

	let mut refs = table.records().to_vec();
	if let Some(max) = limit {
		refs.truncate(max);
	}

	if json {
		print_json(&path, &refs, table.target_count(), failed, missing);
		return Ok(());
	}

	println!("manifest: {}", path.display());
	println!("refs: {}", refs.len());
	println!("targets: {}", table.target_count());
	println!("owner\tpath\ttype\tcontainer\tlocal\thandle");
	for record in &refs {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}",
			record.owner_id, record.field_path, record.type_name, record.container, record.local_id, record.handle
		);
	}
	for (id, err) in &failed {
		println!("failed: {id}\t{err}");
	}
	for name in &missing {
		println!("missing: {name}");
	}

	Ok(())
}

fn print_json(path: &std::path::Path, refs: &[ReferenceRecord], targets: usize, failed: Vec<(i64, String)>, missing: Vec<String>) {
	let payload = RefsJson {
		manifest: path.display().to_string(),
		targets,
		refs: refs
			.iter()
			.map(|record| RefJson {
				owner: record.owner_id,
				path: record.field_path.to_string(),
				type_name: record.type_name.to_string(),
				container: record.container.to_string(),
				container_id: record.container_id,
				local: record.local_id,
				handle: record.handle,
			})
			.collect(),
		failed: failed.into_iter().map(|(id, error)| FailedJson { id, error }).collect(),
		missing,
	};

	emit_json(&payload);
}

#[derive(serde::Serialize)]
struct RefJson {
	owner: i64,
	path: String,
	#[serde(rename = "type")]
	type_name: String,
	container: String,
	container_id: i32,
	local: i64,
	handle: i32,
}

#[derive(serde::Serialize)]
struct FailedJson {
	id: i64,
	error: String,
}

#[derive(serde::Serialize)]
struct RefsJson {
	manifest: String,
	targets: usize,
	refs: Vec<RefJson>,
	failed: Vec<FailedJson>,
	missing: Vec<String>,
}

#[cfg(test)]
mod tests;
