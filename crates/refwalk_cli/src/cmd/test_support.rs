use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::OnceLock;

use refwalk_testkit::{PayloadBuilder, target_dir as workspace_target_dir, write_fixture};
use serde_json::json;

static REFWALK_BIN: OnceLock<PathBuf> = OnceLock::new();

/// Write a two-object fixture under `dir` and return the manifest path.
///
/// Object 1 references `sharedassets0.assets:500` and streams `level0.resS`;
/// object 2 has an unsized scalar and always fails.
pub(crate) fn write_sample(dir: &Path, with_resource: bool) -> PathBuf {
	let manifest = json!({
		"name": "level0",
		"data": "level0.bin",
		"externals": ["sharedassets0.assets"],
		"types": {
			"Holder": { "name": "Base", "type": "Holder", "children": [
				{ "name": "m_Value", "type": "int", "size": 4 },
				{ "name": "m_Target", "type": "PPtr<GameObject>", "children": [
					{ "name": "m_FileID", "type": "int", "size": 4 },
					{ "name": "m_PathID", "type": "SInt64", "size": 8 }
				]},
				{ "name": "m_StreamData", "type": "StreamingInfo", "children": [
					{ "name": "offset", "type": "unsigned int", "size": 4 },
					{ "name": "size", "type": "unsigned int", "size": 4 },
					{ "name": "path", "type": "string" }
				]}
			]},
			"Broken": { "name": "Base", "type": "Broken", "children": [
				{ "name": "m_Unsized", "type": "int" }
			]}
		},
		"objects": [
			{ "id": 1, "offset": 0, "type": "Holder" },
			{ "id": 2, "offset": 0, "type": "Broken" }
		]
	});
	let payload = PayloadBuilder::new()
		.i32(7)
		.pptr(1, 500)
		.i32(0)
		.i32(4)
		.aligned_string("archive:/CAB-0/level0.resS")
		.finish();

	if with_resource {
		fs::write(dir.join("level0.resS"), b"DATA").expect("resource writes");
	}
	write_fixture(dir, &manifest, "level0.bin", &payload)
}

pub(crate) fn run_refwalk(args: &[&str]) -> Output {
	Command::new(refwalk_bin()).args(args).output().expect("refwalk command executes")
}

pub(crate) fn run_refwalk_json(args: &[&str]) -> serde_json::Value {
	let output = run_refwalk(args);
	assert!(
		output.status.success(),
		"refwalk command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn refwalk_bin() -> &'static PathBuf {
	REFWALK_BIN.get_or_init(resolve_refwalk_bin)
}

fn resolve_refwalk_bin() -> PathBuf {
	if let Some(path) = option_env!("CARGO_BIN_EXE_refwalk") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "refwalk.exe" } else { "refwalk" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "refwalk"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build refwalk binary at {}", bin.display());

	bin
}
