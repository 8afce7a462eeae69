use std::fmt::Write as _;

use shortcutdoc::shortcut::{Value, format_date};

/// Output truncation limits for decoded values.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum number of entries printed for a single dict.
	pub max_dict_entries: usize,
	/// Maximum recursive print depth for nested arrays/dicts.
	pub max_print_depth: u32,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_string_len: 200,
			max_array_items: 16,
			max_dict_entries: 80,
			max_print_depth: 6,
		}
	}
}

impl PrintOptions {
	/// Preset tuned for a quick overview of large workflows.
	pub fn for_summary() -> Self {
		Self {
			max_string_len: 80,
			max_array_items: 8,
			max_dict_entries: 40,
			max_print_depth: 4,
		}
	}
}

/// Render one decoded value tree as indented text.
pub fn render_value(value: &Value, options: PrintOptions) -> String {
	let mut out = String::new();
	write_value(&mut out, value, 0, 0, options);
	out
}

fn write_value(out: &mut String, value: &Value, indent: usize, depth: u32, options: PrintOptions) {
	let pad = " ".repeat(indent);
	match value {
		Value::Array(items) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}[... {} items]", items.len());
				return;
			}
			let _ = writeln!(out, "{pad}[");
			for item in items.iter().take(options.max_array_items) {
				write_value(out, item, indent + 2, depth + 1, options);
			}
			if items.len() > options.max_array_items {
				let _ = writeln!(out, "{pad}  ... {} more", items.len() - options.max_array_items);
			}
			let _ = writeln!(out, "{pad}]");
		}
		Value::Dict(dict) => {
			if depth >= options.max_print_depth {
				let _ = writeln!(out, "{pad}{{ ... {} keys }}", dict.len());
				return;
			}
			let _ = writeln!(out, "{pad}{{");
			for (key, item) in dict.iter().take(options.max_dict_entries) {
				let _ = write!(out, "{pad}  {key} = ");
				if matches!(item, Value::Array(_) | Value::Dict(_)) {
					out.push('\n');
					write_value(out, item, indent + 4, depth + 1, options);
				} else {
					write_value(out, item, 0, depth + 1, options);
				}
			}
			if dict.len() > options.max_dict_entries {
				let _ = writeln!(out, "{pad}  ... {} more entries", dict.len() - options.max_dict_entries);
			}
			let _ = writeln!(out, "{pad}}}");
		}
		scalar => {
			let _ = writeln!(out, "{pad}{}", scalar_text(scalar, options));
		}
	}
}

fn scalar_text(value: &Value, options: PrintOptions) -> String {
	match value {
		Value::Null => "null".to_owned(),
		Value::Bool(v) => v.to_string(),
		Value::Integer(v) => v.to_string(),
		Value::Real(v) => v.to_string(),
		Value::Date(v) => format!("date({})", format_date(*v)),
		Value::Bytes(v) => format!("bytes[{}]", v.len()),
		Value::String(v) => format!("\"{}\"", truncate(v, options.max_string_len)),
		Value::ObjectRef(v) => format!("uid({v})"),
		Value::Array(items) => format!("[... {} items]", items.len()),
		Value::Dict(dict) => format!("{{ ... {} keys }}", dict.len()),
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests;
