use super::{XmlOptions, format_real, render_xml, render_xml_with};
use crate::shortcut::{Dict, ShortcutError, Value};

fn body(xml: &str) -> &str {
	let start = xml.find("<plist version=\"1.0\">\n").expect("plist open") + "<plist version=\"1.0\">\n".len();
	let end = xml.rfind("</plist>\n").expect("plist close");
	&xml[start..end]
}

#[test]
fn renders_document_frame() {
	let xml = render_xml(&Value::Bool(true)).expect("renders");
	assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE plist"));
	assert!(xml.ends_with("<true/>\n</plist>\n"));
}

#[test]
fn renders_nested_dict_in_insertion_order() {
	let inner: Dict = [("z", Value::Integer(-4)), ("a", Value::from("x<y & z>"))].into_iter().collect();
	let root: Dict = [
		("name", Value::from("demo")),
		("inner", Value::from(inner)),
		("list", Value::from(vec![Value::Bool(false), Value::Real(1.5)])),
	]
	.into_iter()
	.collect();

	let expected = concat!(
		"<dict>\n",
		"\t<key>name</key>\n",
		"\t<string>demo</string>\n",
		"\t<key>inner</key>\n",
		"\t<dict>\n",
		"\t\t<key>z</key>\n",
		"\t\t<integer>-4</integer>\n",
		"\t\t<key>a</key>\n",
		"\t\t<string>x&lt;y &amp; z&gt;</string>\n",
		"\t</dict>\n",
		"\t<key>list</key>\n",
		"\t<array>\n",
		"\t\t<false/>\n",
		"\t\t<real>1.5</real>\n",
		"\t</array>\n",
		"</dict>\n",
	);
	assert_eq!(body(&render_xml(&Value::from(root)).expect("renders")), expected);
}

#[test]
fn renders_empty_containers_self_closing() {
	let root = Value::from(vec![Value::from(Vec::<Value>::new()), Value::from(Dict::new())]);
	assert_eq!(body(&render_xml(&root).expect("renders")), "<array>\n\t<array/>\n\t<dict/>\n</array>\n");
}

#[test]
fn renders_scalars() {
	let root = Value::from(vec![
		Value::Null,
		Value::Date(0.0),
		Value::ObjectRef(7),
		Value::Real(f64::NAN),
		Value::Real(2.0),
	]);
	let expected = concat!(
		"<array>\n",
		"\t<null/>\n",
		"\t<date>2001-01-01T00:00:00Z</date>\n",
		"\t<dict>\n",
		"\t\t<key>CF$UID</key>\n",
		"\t\t<integer>7</integer>\n",
		"\t</dict>\n",
		"\t<real>nan</real>\n",
		"\t<real>2.0</real>\n",
		"</array>\n",
	);
	assert_eq!(body(&render_xml(&root).expect("renders")), expected);
}

#[test]
fn wraps_data_lines_by_depth() {
	let bytes: Vec<u8> = (0..60).collect();
	let root = Value::from(vec![Value::Bytes(bytes.into())]);
	let xml = render_xml(&root).expect("renders");
	// Depth 1 leaves 68 columns, so 51 input bytes per line.
	let lines: Vec<&str> = body(&xml).lines().collect();
	assert_eq!(lines[1], "\t<data>");
	assert_eq!(lines[2].len(), 1 + 68);
	assert_eq!(lines[3].len(), 1 + 12);
	assert_eq!(lines[4], "\t</data>");
}

#[test]
fn honors_custom_indent() {
	let root = Value::from(vec![Value::Integer(1)]);
	let options = XmlOptions {
		indent: "  ",
		..XmlOptions::default()
	};
	assert_eq!(body(&render_xml_with(&root, options).expect("renders")), "<array>\n  <integer>1</integer>\n</array>\n");
}

#[test]
fn output_is_deterministic() {
	let root: Dict = [("k", Value::Bytes(vec![1_u8, 2, 3].into()))].into_iter().collect();
	let value = Value::from(root);
	assert_eq!(render_xml(&value).expect("renders"), render_xml(&value).expect("renders"));
}

#[test]
fn data_pads_partial_groups() {
	let root = Value::from(vec![
		Value::Bytes(b"f".to_vec().into()),
		Value::Bytes(b"fo".to_vec().into()),
		Value::Bytes(b"foo".to_vec().into()),
		Value::Bytes(vec![0xFB_u8, 0xFF].into()),
		Value::Bytes(Vec::<u8>::new().into()),
	]);
	let expected = concat!(
		"<array>\n",
		"\t<data>\n\tZg==\n\t</data>\n",
		"\t<data>\n\tZm8=\n\t</data>\n",
		"\t<data>\n\tZm9v\n\t</data>\n",
		"\t<data>\n\t+/8=\n\t</data>\n",
		"\t<data>\n\t</data>\n",
		"</array>\n",
	);
	assert_eq!(body(&render_xml(&root).expect("renders")), expected);
}

#[test]
fn folds_carriage_returns_into_newlines() {
	let root = Value::from(vec![Value::from("a\r\nb\rc\td")]);
	assert_eq!(body(&render_xml(&root).expect("renders")), "<array>\n\t<string>a\nb\nc\td</string>\n</array>\n");
}

#[test]
fn rejects_control_characters_in_strings() {
	let root = Value::from(vec![Value::from("a\u{1}b")]);
	let err = render_xml(&root).expect_err("control character");
	assert!(matches!(err, ShortcutError::UnrepresentableText { ref detail } if detail.contains("U+0001")));
	assert_eq!(err.kind(), "unrepresentable_text");
}

#[test]
fn rejects_control_characters_in_keys() {
	let root: Dict = [("bad\u{1b}key", Value::Null)].into_iter().collect();
	let err = render_xml(&Value::from(root)).expect_err("control character in key");
	assert!(matches!(err, ShortcutError::UnrepresentableText { .. }));
}

#[test]
fn formats_reals_like_python_repr() {
	assert_eq!(format_real(0.0), "0.0");
	assert_eq!(format_real(-0.0), "-0.0");
	assert_eq!(format_real(1.0), "1.0");
	assert_eq!(format_real(0.1), "0.1");
	assert_eq!(format_real(-2.5), "-2.5");
	assert_eq!(format_real(123.456), "123.456");
	assert_eq!(format_real(0.0001), "0.0001");
	assert_eq!(format_real(1e15), "1000000000000000.0");
	assert_eq!(format_real(1e16), "1e+16");
	assert_eq!(format_real(1.5e16), "1.5e+16");
	assert_eq!(format_real(1e-5), "1e-05");
	assert_eq!(format_real(-2.5e-7), "-2.5e-07");
	assert_eq!(format_real(1e100), "1e+100");
	assert_eq!(format_real(f64::INFINITY), "inf");
	assert_eq!(format_real(f64::NEG_INFINITY), "-inf");
}
