use shortcutdoc::shortcut::{Dict, Value};

use super::{PrintOptions, render_value, truncate};

#[test]
fn prints_nested_dict_with_indentation() {
	let inner: Dict = [("flag", Value::Bool(true))].into_iter().collect();
	let root: Dict = [
		("name", Value::from("demo")),
		("inner", Value::from(inner)),
		("list", Value::from(vec![Value::Integer(1), Value::Null])),
	]
	.into_iter()
	.collect();

	let expected = concat!(
		"{\n",
		"  name = \"demo\"\n",
		"  inner = \n",
		"    {\n",
		"      flag = true\n",
		"    }\n",
		"  list = \n",
		"    [\n",
		"      1\n",
		"      null\n",
		"    ]\n",
		"}\n",
	);
	assert_eq!(render_value(&Value::from(root), PrintOptions::default()), expected);
}

#[test]
fn truncates_long_arrays() {
	let items: Vec<Value> = (0..5).map(Value::Integer).collect();
	let options = PrintOptions {
		max_array_items: 2,
		..PrintOptions::default()
	};
	assert_eq!(render_value(&Value::from(items), options), "[\n  0\n  1\n  ... 3 more\n]\n");
}

#[test]
fn collapses_containers_past_depth_limit() {
	let nested = Value::from(vec![Value::from(vec![Value::Null]), Value::from(Dict::new())]);
	let options = PrintOptions {
		max_print_depth: 1,
		..PrintOptions::default()
	};
	assert_eq!(render_value(&nested, options), "[\n  [... 1 items]\n  { ... 0 keys }\n]\n");
}

#[test]
fn truncate_counts_chars() {
	assert_eq!(truncate("héllo", 2), "hé...");
	assert_eq!(truncate("ok", 2), "ok");
}

#[test]
fn summary_preset_is_tighter() {
	let summary = PrintOptions::for_summary();
	let default = PrintOptions::default();
	assert!(summary.max_array_items < default.max_array_items);
	assert!(summary.max_print_depth < default.max_print_depth);
}
