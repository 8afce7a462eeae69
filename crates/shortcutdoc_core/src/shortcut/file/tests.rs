use shortcutdoc_testkit::{BplistBuilder, SignedDataBuilder, workflow_plist, workflow_shortcut};

use super::{Container, LoadOptions, ShortcutFile, decode_shortcut};
use crate::shortcut::{ShortcutError, Value};

#[test]
fn decodes_signed_container() {
	let bytes = workflow_shortcut(&[("is.workflow.actions.comment", &[("WFCommentActionText", "hi")])]);
	let file = ShortcutFile::from_bytes(&bytes).expect("decodes");

	assert_eq!(file.container(), Container::Signed);
	assert_eq!(file.envelope_offset(), Some(0));
	assert!(file.payload().starts_with(b"bplist00"));
	assert!(file.trailer().root < file.trailer().object_count);

	let workflow = file.workflow().expect("workflow");
	assert_eq!(workflow.len(), 1);
	assert_eq!(workflow.actions[0].identifier, "is.workflow.actions.comment");
}

#[test]
fn decodes_bare_plist_container() {
	let plist = workflow_plist(&[("a.b", &[])]);
	let file = ShortcutFile::from_bytes(&plist).expect("decodes");

	assert_eq!(file.container(), Container::Unsigned);
	assert_eq!(file.envelope_offset(), None);
	assert_eq!(file.payload(), plist.as_slice());
}

#[test]
fn decode_shortcut_returns_root() {
	let mut plist = BplistBuilder::new();
	let key = plist.ascii("a");
	let one = plist.int(1);
	let root = plist.dict(&[(key, one)]);
	let bytes = SignedDataBuilder::new(plist.build(root)).build();

	let value = decode_shortcut(&bytes).expect("decodes");
	assert_eq!(value.get("a"), Some(&Value::Integer(1)));
}

#[test]
fn payload_must_be_binary_plist() {
	let bytes = SignedDataBuilder::new(b"<?xml version=\"1.0\"?>".to_vec()).build();
	let err = ShortcutFile::from_bytes(&bytes).expect_err("xml payload");
	assert!(matches!(err, ShortcutError::UnsupportedPlistVersion { .. }));
}

#[test]
fn garbage_is_malformed_envelope() {
	let err = ShortcutFile::from_bytes(b"not a shortcut at all").expect_err("garbage");
	assert!(matches!(err, ShortcutError::MalformedEnvelope { .. }));
}

#[test]
fn load_options_bound_decoding() {
	let mut plist = BplistBuilder::new();
	let leaf = plist.null();
	let inner = plist.array(&[leaf]);
	let root = plist.array(&[inner]);
	let bytes = plist.build(root);

	let mut opt = LoadOptions::default();
	opt.decode.max_depth = 1;
	let err = ShortcutFile::from_bytes_with(&bytes, &opt).expect_err("too deep");
	assert!(matches!(err, ShortcutError::MalformedPlist { .. }));
}

#[test]
fn open_reports_missing_file_as_io() {
	let err = ShortcutFile::open("/nonexistent/definitely/missing.shortcut").expect_err("missing");
	assert_eq!(err.kind(), "io");
}
