use std::path::PathBuf;

use shortcutdoc::shortcut::{Result, ShortcutFile, Value, format_date};

use crate::cmd::print::{PrintOptions, render_value};
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	/// Use tighter truncation limits.
	#[arg(long)]
	pub summary: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-array")]
	pub max_array: Option<usize>,
	#[arg(long = "max-string")]
	pub max_string: Option<usize>,
	/// Emit the full tree as JSON instead of truncated text.
	#[arg(long)]
	pub json: bool,
}

/// Decode one file and print its value tree.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file: path,
		summary,
		max_depth,
		max_array,
		max_string,
		json,
	} = args;

	let file = ShortcutFile::open(&path)?;

	if json {
		let payload = ShowJson {
			path: path.display().to_string(),
			container: file.container().as_str(),
			value: value_to_json(file.root()),
		};
		emit_json(&payload);
		return Ok(());
	}

	let mut print = if summary { PrintOptions::for_summary() } else { PrintOptions::default() };
	if let Some(max_depth) = max_depth {
		print.max_print_depth = max_depth;
	}
	if let Some(max_array) = max_array {
		print.max_array_items = max_array;
		print.max_dict_entries = max_array;
	}
	if let Some(max_string) = max_string {
		print.max_string_len = max_string;
	}

	println!("path: {}", path.display());
	println!("container: {}", file.container().as_str());
	print!("{}", render_value(file.root(), print));
	Ok(())
}

/// Map a value tree onto JSON.
///
/// Dates become ISO-8601 strings, bytes become integer arrays, and UIDs
/// become `{"uid": n}` objects.
pub(crate) fn value_to_json(value: &Value) -> serde_json::Value {
	use serde_json::{Map, Value as JsonValue};

	match value {
		Value::Null => JsonValue::Null,
		Value::Bool(v) => serde_json::json!(v),
		Value::Integer(v) => serde_json::json!(v),
		Value::Real(v) => serde_json::json!(v),
		Value::Date(v) => serde_json::json!(format_date(*v)),
		Value::Bytes(v) => {
			let bytes: Vec<JsonValue> = v.iter().map(|item| serde_json::json!(item)).collect();
			JsonValue::Array(bytes)
		}
		Value::String(v) => serde_json::json!(v.as_ref()),
		Value::ObjectRef(v) => serde_json::json!({ "uid": v }),
		Value::Array(items) => JsonValue::Array(items.iter().map(value_to_json).collect()),
		Value::Dict(dict) => {
			let entries: Map<String, JsonValue> = dict.iter().map(|(key, item)| (key.to_owned(), value_to_json(item))).collect();
			JsonValue::Object(entries)
		}
	}
}

#[derive(serde::Serialize)]
struct ShowJson {
	path: String,
	container: &'static str,
	value: serde_json::Value,
}
