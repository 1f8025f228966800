use refwalk::asset::checksum::{append, append_handle};
use refwalk_testkit::temp_dir;

use crate::cmd::test_support::{run_refwalk, run_refwalk_json, write_sample};
use crate::cmd::util::crc_hex;

fn expected_crc(with_resource: bool) -> String {
	let crc = append_handle(append(0, &7_i32.to_le_bytes()), 1);
	crc_hex(if with_resource { append(crc, b"DATA") } else { crc })
}

#[test]
fn walk_json_reports_checksums_and_isolated_failures() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();
	let json = run_refwalk_json(&["walk", &manifest, "--json"]);

	let objects = json["objects"].as_array().expect("objects array");
	assert_eq!(objects.len(), 2);
	assert_eq!(objects[0]["id"], 1);
	assert_eq!(objects[0]["type"], "Holder");
	assert_eq!(objects[0]["crc32"], expected_crc(true));
	assert!(objects[0]["error"].is_null());
	assert!(objects[1]["crc32"].is_null());
	assert!(objects[1]["error"].as_str().is_some_and(|err| err.contains("m_Unsized")));
	assert_eq!(json["missing"].as_array().map(Vec::len), Some(0));
}

#[test]
fn walk_reports_missing_resources_once() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), false);
	let manifest = manifest.to_string_lossy().into_owned();
	let json = run_refwalk_json(&["walk", &manifest, "--object", "1", "--json"]);

	assert_eq!(json["objects"].as_array().map(Vec::len), Some(1));
	assert_eq!(json["objects"][0]["crc32"], expected_crc(false));
	assert_eq!(json["missing"], serde_json::json!(["level0.resS"]));
}

#[test]
fn archive_root_takes_priority_over_sibling() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();

	let archive = temp_dir();
	std::fs::write(archive.path().join("level0.resS"), b"ARCH").expect("archive resource writes");
	let archive_arg = archive.path().to_string_lossy().into_owned();
	let json = run_refwalk_json(&["walk", &manifest, "--archive", &archive_arg, "--object", "1", "--json"]);

	let crc = append(append_handle(append(0, &7_i32.to_le_bytes()), 1), b"ARCH");
	assert_eq!(json["objects"][0]["crc32"], crc_hex(crc));
}

#[test]
fn unknown_object_ids_fail_the_command() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();
	let output = run_refwalk(&["walk", &manifest, "--object", "99"]);

	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.starts_with("error: "), "unexpected stderr: {stderr}");
}

#[test]
fn walk_text_output_lists_objects() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();
	let output = run_refwalk(&["walk", &manifest]);

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("objects: 2"));
	assert!(stdout.contains(&format!("1\tHolder\t{}", expected_crc(true))));
	assert!(stdout.contains("2\tBroken\terror: "));
}
