use std::path::PathBuf;

use refwalk::asset::{ObjectOutcome, RefTable, Walker, walk_objects};

use crate::cmd::util::{Session, crc_hex, emit_json};

#[derive(clap::Args)]
pub struct Args {
	pub manifest: PathBuf,
	#[arg(long)]
	pub archive: Option<PathBuf>,
	#[arg(long = "object")]
	pub object_id: Option<i64>,
	#[arg(long)]
	pub json: bool,
}

/// Walk selected objects and print one checksum (or error) per object.
pub fn run(args: Args) -> refwalk::asset::Result<()> {
	let Args {
		manifest: path,
		archive,
		object_id,
		json,
	} = args;

	let session = Session::open(&path)?;
	let objects = session.objects(object_id)?;

	let mut table = RefTable::new(&session.manifest.name, &session.manifest.externals);
	let mut walker = Walker::new(&session.source, &session.manifest.catalog, session.locator(archive), &mut table);
	let outcomes = walk_objects(&mut walker, objects);
	let missing: Vec<String> = walker.resources().missing().iter().map(|name| name.to_string()).collect();

	if json {
		print_json(&path, &outcomes, missing);
		return Ok(());
	}

	println!("manifest: {}", path.display());
	println!("objects: {}", outcomes.len());
	println!("id\ttype\tcrc32");
	for outcome in &outcomes {
		match &outcome.result {
			Ok(crc) => println!("{}\t{}\t{}", outcome.id, outcome.type_name, crc_hex(*crc)),
			Err(err) => println!("{}\t{}\terror: {err}", outcome.id, outcome.type_name),
		}
	}
	for name in &missing {
		println!("missing: {name}");
	}

	Ok(())
}

fn print_json(path: &std::path::Path, outcomes: &[ObjectOutcome], missing: Vec<String>) {
	let payload = WalkJson {
		manifest: path.display().to_string(),
		objects: outcomes
			.iter()
			.map(|outcome| ObjectJson {
				id: outcome.id,
				type_name: outcome.type_name.clone(),
				crc32: outcome.result.as_ref().ok().map(|crc| crc_hex(*crc)),
				error: outcome.result.as_ref().err().map(|err| err.to_string()),
			})
			.collect(),
		missing,
	};

	emit_json(&payload);
}

#[derive(serde::Serialize)]
struct ObjectJson {
	id: i64,
	#[serde(rename = "type")]
	type_name: String,
	crc32: Option<String>,
	error: Option<String>,
}

#[derive(serde::Serialize)]
struct WalkJson {
	manifest: String,
	objects: Vec<ObjectJson>,
	missing: Vec<String>,
}

#[cfg(test)]
mod tests;
