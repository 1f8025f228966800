use refwalk_testkit::temp_dir;

use crate::cmd::test_support::{run_refwalk, run_refwalk_json, write_sample};

#[test]
fn refs_json_lists_canonical_targets() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();
	let json = run_refwalk_json(&["refs", &manifest, "--json"]);

	assert_eq!(json["targets"], 1);
	let refs = json["refs"].as_array().expect("refs array");
	assert_eq!(refs.len(), 1);
	assert_eq!(refs[0]["owner"], 1);
	assert_eq!(refs[0]["path"], "m_Target");
	assert_eq!(refs[0]["type"], "GameObject");
	assert_eq!(refs[0]["container"], "sharedassets0.assets");
	assert_eq!(refs[0]["container_id"], 1);
	assert_eq!(refs[0]["local"], 500);
	assert_eq!(refs[0]["handle"], 1);

	let failed = json["failed"].as_array().expect("failed array");
	assert_eq!(failed.len(), 1);
	assert_eq!(failed[0]["id"], 2);
}

#[test]
fn refs_limit_truncates_output() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), true);
	let manifest = manifest.to_string_lossy().into_owned();
	let json = run_refwalk_json(&["refs", &manifest, "--limit", "0", "--json"]);

	assert_eq!(json["refs"].as_array().map(Vec::len), Some(0));
	assert_eq!(json["targets"], 1);
}

#[test]
fn refs_text_output_has_header_and_rows() {
	let dir = temp_dir();
	let manifest = write_sample(dir.path(), false);
	let manifest = manifest.to_string_lossy().into_owned();
	let output = run_refwalk(&["refs", &manifest, "--object", "1"]);

	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("owner\tpath\ttype\tcontainer\tlocal\thandle"));
	assert!(stdout.contains("1\tm_Target\tGameObject\tsharedassets0.assets\t500\t1"));
	assert!(stdout.contains("missing: level0.resS"));
}
