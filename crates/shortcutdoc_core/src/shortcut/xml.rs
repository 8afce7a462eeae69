use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::shortcut::error::{Result, ShortcutError};
use crate::shortcut::value::{Value, format_date};

const XML_HEADER: &str = concat!(
	"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
	"<!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n",
	"<plist version=\"1.0\">\n",
);
const XML_FOOTER: &str = "</plist>\n";

/// Formatting switches for XML plist output.
#[derive(Debug, Clone, Copy)]
pub struct XmlOptions {
	/// Text repeated once per nesting level.
	pub indent: &'static str,
	/// Column budget for base64 `<data>` lines before indentation is subtracted.
	pub data_line_width: usize,
}

impl Default for XmlOptions {
	fn default() -> Self {
		Self {
			indent: "\t",
			data_line_width: 76,
		}
	}
}

/// Render a value tree as an XML property list document.
///
/// Fails with [`ShortcutError::UnrepresentableText`] when a string or key
/// holds a control character XML 1.0 cannot carry.
pub fn render_xml(value: &Value) -> Result<String> {
	render_xml_with(value, XmlOptions::default())
}

/// Render a value tree as an XML property list document with explicit options.
pub fn render_xml_with(value: &Value, options: XmlOptions) -> Result<String> {
	let mut writer = XmlWriter {
		out: String::from(XML_HEADER),
		options,
	};
	writer.value(value, 0)?;
	writer.out.push_str(XML_FOOTER);
	Ok(writer.out)
}

struct XmlWriter {
	out: String,
	options: XmlOptions,
}

impl XmlWriter {
	fn line(&mut self, depth: usize, text: &str) {
		for _ in 0..depth {
			self.out.push_str(self.options.indent);
		}
		self.out.push_str(text);
		self.out.push('\n');
	}

	fn element(&mut self, depth: usize, tag: &str, text: &str) -> Result<()> {
		let text = escape(text)?;
		self.line(depth, &format!("<{tag}>{text}</{tag}>"));
		Ok(())
	}

	fn value(&mut self, value: &Value, depth: usize) -> Result<()> {
		match value {
			Value::Null => self.line(depth, "<null/>"),
			Value::Bool(true) => self.line(depth, "<true/>"),
			Value::Bool(false) => self.line(depth, "<false/>"),
			Value::Integer(v) => self.element(depth, "integer", &v.to_string())?,
			Value::Real(v) => self.element(depth, "real", &format_real(*v))?,
			Value::Date(v) => self.element(depth, "date", &format_date(*v))?,
			Value::String(v) => self.element(depth, "string", v)?,
			Value::Bytes(v) => self.data(v, depth),
			Value::ObjectRef(v) => {
				self.line(depth, "<dict>");
				self.element(depth + 1, "key", "CF$UID")?;
				self.element(depth + 1, "integer", &v.to_string())?;
				self.line(depth, "</dict>");
			}
			Value::Array(items) => {
				if items.is_empty() {
					self.line(depth, "<array/>");
					return Ok(());
				}
				self.line(depth, "<array>");
				for item in items.iter() {
					self.value(item, depth + 1)?;
				}
				self.line(depth, "</array>");
			}
			Value::Dict(dict) => {
				if dict.is_empty() {
					self.line(depth, "<dict/>");
					return Ok(());
				}
				self.line(depth, "<dict>");
				for (key, item) in dict.iter() {
					self.element(depth + 1, "key", key)?;
					self.value(item, depth + 1)?;
				}
				self.line(depth, "</dict>");
			}
		}
		Ok(())
	}

	/// Base64 lines shrink as indentation grows, counting a tab as eight columns.
	fn data(&mut self, bytes: &[u8], depth: usize) {
		let indent_cols: usize = self.options.indent.chars().map(|ch| if ch == '\t' { 8 } else { 1 }).sum();
		let max_line = self.options.data_line_width.saturating_sub(indent_cols * depth).max(16);
		let chunk = max_line / 4 * 3;

		self.line(depth, "<data>");
		for part in bytes.chunks(chunk) {
			let encoded = STANDARD.encode(part);
			self.line(depth, &encoded);
		}
		self.line(depth, "</data>");
	}
}

/// Escape XML-reserved characters and fold `\r\n` and lone `\r` into `\n`.
///
/// C0 controls other than tab and newline have no XML 1.0 spelling and are rejected.
fn escape(text: &str) -> Result<String> {
	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars().peekable();
	while let Some(ch) = chars.next() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'\r' => {
				if chars.peek() == Some(&'\n') {
					chars.next();
				}
				out.push('\n');
			}
			'\t' | '\n' => out.push(ch),
			c if c.is_ascii_control() && c != '\u{7f}' => {
				return Err(ShortcutError::UnrepresentableText {
					detail: format!("control character U+{:04X}", u32::from(c)),
				});
			}
			c => out.push(c),
		}
	}
	Ok(out)
}

/// Format a real the way Python's `repr` does.
///
/// Shortest round-trip digits; positional notation for decimal exponents
/// in `-4..16` (always with a fractional part), otherwise `d.ddde+XX`.
fn format_real(value: f64) -> String {
	if value.is_nan() {
		return "nan".to_owned();
	}
	if value.is_infinite() {
		return if value > 0.0 { "inf".to_owned() } else { "-inf".to_owned() };
	}
	let sign = if value.is_sign_negative() { "-" } else { "" };
	if value == 0.0 {
		return format!("{sign}0.0");
	}

	let sci = format!("{:e}", value.abs());
	let Some((mantissa, exp)) = sci.split_once('e') else {
		return format!("{value:?}");
	};
	let Ok(exp) = exp.parse::<i32>() else {
		return format!("{value:?}");
	};

	if !(-4..16).contains(&exp) {
		let exp_sign = if exp < 0 { '-' } else { '+' };
		return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.unsigned_abs());
	}

	let digits: String = mantissa.chars().filter(|ch| *ch != '.').collect();
	if exp < 0 {
		let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
		return format!("{sign}0.{zeros}{digits}");
	}
	let int_len = exp as usize + 1;
	if digits.len() <= int_len {
		let zeros = "0".repeat(int_len - digits.len());
		format!("{sign}{digits}{zeros}.0")
	} else {
		format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
	}
}

#[cfg(test)]
mod tests;
