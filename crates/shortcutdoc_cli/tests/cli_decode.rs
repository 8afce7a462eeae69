#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use shortcutdoc_testkit::{BplistBuilder, SignedDataBuilder, workflow_shortcut};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
	Command::new(env!("CARGO_BIN_EXE_shortcutdoc")).args(args).output().expect("command executes")
}

fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, bytes).expect("fixture written");
	path
}

fn two_action_shortcut() -> Vec<u8> {
	workflow_shortcut(&[
		("is.workflow.actions.comment", &[("WFCommentActionText", "hello")]),
		("is.workflow.actions.alert", &[("WFAlertActionTitle", "Done")]),
	])
}

#[test]
fn decode_both_writes_outputs_beside_input() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "Demo.shortcut", &two_action_shortcut());

	let output = run(&["decode", "-C", input.to_str().expect("utf8 path")]);
	assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("Processing:"));

	let xml = fs::read_to_string(dir.path().join("Demo.xml")).expect("xml output");
	assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
	assert!(xml.contains("<key>WFWorkflowActions</key>"));
	assert!(xml.contains("<string>is.workflow.actions.alert</string>"));

	let listing = fs::read_to_string(dir.path().join("Demo.actions.txt")).expect("actions output");
	assert_eq!(
		listing,
		concat!(
			"=== Action 1: is.workflow.actions.comment ===\n",
			"WFCommentActionText: hello\n",
			"\n",
			"=== Action 2: is.workflow.actions.alert ===\n",
			"WFAlertActionTitle: Done\n",
		)
	);
}

#[test]
fn decode_xml_only_honors_out_dir() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "one.shortcut", &two_action_shortcut());
	let out_dir = dir.path().join("out");

	let output = run(&["decode", "-A", "-o", out_dir.to_str().expect("utf8 path"), input.to_str().expect("utf8 path")]);
	assert!(output.status.success());
	assert!(out_dir.join("one.xml").is_file());
	assert!(!out_dir.join("one.actions.txt").exists());
	assert!(!dir.path().join("one.xml").exists());
}

#[test]
fn decode_requires_a_mode_flag() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "x.shortcut", &two_action_shortcut());

	let output = run(&["decode", input.to_str().expect("utf8 path")]);
	assert!(!output.status.success());
	assert!(!dir.path().join("x.xml").exists());
}

#[test]
fn batch_continues_past_failures() {
	let dir = TempDir::new().expect("tempdir");
	let missing = dir.path().join("missing.shortcut");
	let garbage = write_fixture(dir.path(), "garbage.shortcut", b"definitely not a container");
	let good = write_fixture(dir.path(), "good.shortcut", &two_action_shortcut());

	let output = run(&[
		"decode",
		"-B",
		missing.to_str().expect("utf8 path"),
		garbage.to_str().expect("utf8 path"),
		good.to_str().expect("utf8 path"),
	]);

	assert_eq!(output.status.code(), Some(1));
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(stderr.contains("missing.shortcut"));
	assert!(stderr.contains("garbage.shortcut"));
	assert!(dir.path().join("good.actions.txt").is_file());
}

#[test]
fn json_report_lists_each_file() {
	let dir = TempDir::new().expect("tempdir");
	let good = write_fixture(dir.path(), "good.shortcut", &two_action_shortcut());
	let wrong = SignedDataBuilder::new(b"bplist00".to_vec()).content_type(&[0x2A, 0x03]).build();
	let wrong = write_fixture(dir.path(), "wrong.shortcut", &wrong);

	let output = run(&[
		"decode",
		"--both",
		"--json",
		good.to_str().expect("utf8 path"),
		wrong.to_str().expect("utf8 path"),
	]);
	assert!(!output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be valid json");
	let reports = json.as_array().expect("report array");
	assert_eq!(reports.len(), 2);
	assert_eq!(reports[0]["ok"], true);
	assert_eq!(reports[0]["written"].as_array().map(Vec::len), Some(2));
	assert_eq!(reports[1]["ok"], false);
	assert_eq!(reports[1]["error_kind"], "unsupported_content_type");
}

#[test]
fn listing_failure_keeps_xml_output() {
	let mut plist = BplistBuilder::new();
	let key = plist.ascii("WFWorkflowActions");
	let value = plist.ascii("not an array");
	let root = plist.dict(&[(key, value)]);
	let bytes = SignedDataBuilder::new(plist.build(root)).build();

	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "odd.shortcut", &bytes);

	let output = run(&["decode", "-C", input.to_str().expect("utf8 path")]);
	assert!(!output.status.success());
	assert!(dir.path().join("odd.xml").is_file());
	assert!(!dir.path().join("odd.actions.txt").exists());
	assert!(String::from_utf8_lossy(&output.stderr).contains("malformed workflow"));
}

#[test]
fn info_json_reports_layout() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "info.shortcut", &two_action_shortcut());

	let output = run(&["info", input.to_str().expect("utf8 path"), "--json"]);
	assert!(output.status.success());
	let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("stdout should be valid json");

	assert_eq!(json["container"], "signed");
	assert_eq!(json["envelope_offset"], 0);
	assert_eq!(json["root_kind"], "dict");
	assert_eq!(json["action_count"], 2);
	assert_eq!(json["trailer"]["ref_size"], 1);
	assert!(json["payload_size"].as_u64().is_some_and(|item| item > 40));
}

#[test]
fn show_prints_value_tree() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "show.shortcut", &two_action_shortcut());

	let output = run(&["show", input.to_str().expect("utf8 path")]);
	assert!(output.status.success());
	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("container: signed"));
	assert!(stdout.contains("WFWorkflowClientVersion = \"2302.0.4\""));
}

#[test]
fn show_reports_fatal_error() {
	let dir = TempDir::new().expect("tempdir");
	let input = write_fixture(dir.path(), "bad.shortcut", b"\x30\x82");

	let output = run(&["show", input.to_str().expect("utf8 path")]);
	assert_eq!(output.status.code(), Some(1));
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: "));
}
