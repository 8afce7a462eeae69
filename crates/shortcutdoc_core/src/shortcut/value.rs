use std::collections::BTreeMap;
use std::sync::Arc;

/// Seconds between the Unix epoch and 2001-01-01T00:00:00Z.
pub const REFERENCE_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

/// Decoded property-list value.
///
/// Container and string payloads are shared handles, so every reference to
/// the same encoded object points at the same storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Null marker.
	Null,
	/// Boolean.
	Bool(bool),
	/// Signed 64-bit integer.
	Integer(i64),
	/// 64-bit float.
	Real(f64),
	/// Seconds relative to 2001-01-01T00:00:00Z.
	Date(f64),
	/// Raw bytes.
	Bytes(Arc<[u8]>),
	/// UTF-8 text.
	String(Arc<str>),
	/// Ordered sequence.
	Array(Arc<[Value]>),
	/// Insertion-ordered string-keyed mapping.
	Dict(Arc<Dict>),
	/// Opaque UID reference.
	ObjectRef(u64),
}

impl Value {
	/// Stable label for the variant.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Integer(_) => "integer",
			Self::Real(_) => "real",
			Self::Date(_) => "date",
			Self::Bytes(_) => "bytes",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Dict(_) => "dict",
			Self::ObjectRef(_) => "object_ref",
		}
	}

	/// Borrow string content.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Read an integer.
	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Self::Integer(value) => Some(*value),
			_ => None,
		}
	}

	/// Read a boolean.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// Borrow array items.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Borrow dict entries.
	pub fn as_dict(&self) -> Option<&Dict> {
		match self {
			Self::Dict(dict) => Some(dict),
			_ => None,
		}
	}

	/// Look up `key` when this is a dict.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_dict().and_then(|dict| dict.get(key))
	}

	/// Return `true` when two values share the same container storage.
	pub fn shares_storage(&self, other: &Value) -> bool {
		match (self, other) {
			(Self::Array(left), Self::Array(right)) => Arc::ptr_eq(left, right),
			(Self::Dict(left), Self::Dict(right)) => Arc::ptr_eq(left, right),
			(Self::String(left), Self::String(right)) => Arc::ptr_eq(left, right),
			(Self::Bytes(left), Self::Bytes(right)) => Arc::ptr_eq(left, right),
			_ => false,
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Real(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.into())
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::Array(items.into())
	}
}

impl From<Dict> for Value {
	fn from(dict: Dict) -> Self {
		Self::Dict(Arc::new(dict))
	}
}

/// Insertion-ordered mapping from string keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
	entries: Vec<(Arc<str>, Value)>,
	index: BTreeMap<Arc<str>, usize>,
}

impl Dict {
	/// Create an empty dict.
	pub const fn new() -> Self {
		Self {
			entries: Vec::new(),
			index: BTreeMap::new(),
		}
	}

	/// Insert or replace `key`.
	///
	/// A replaced key keeps its original position. Returns the previous value.
	pub fn insert(&mut self, key: Arc<str>, value: Value) -> Option<Value> {
		if let Some(slot) = self.index.get(&key) {
			return Some(std::mem::replace(&mut self.entries[*slot].1, value));
		}
		self.index.insert(Arc::clone(&key), self.entries.len());
		self.entries.push((key, value));
		None
	}

	/// Look up a value by key.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.index.get(key).map(|slot| &self.entries[*slot].1)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.entries.iter().map(|(key, value)| (key.as_ref(), value))
	}

	/// Iterate keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_ref())
	}
}

impl<K: Into<Arc<str>>> FromIterator<(K, Value)> for Dict {
	fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
		let mut dict = Dict::new();
		for (key, value) in iter {
			dict.insert(key.into(), value);
		}
		dict
	}
}

/// Render a reference-epoch offset as `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Fractional seconds are truncated toward negative infinity.
pub fn format_date(seconds: f64) -> String {
	let total = (seconds.floor() as i64).saturating_add(REFERENCE_EPOCH_UNIX_SECONDS);
	let days = total.div_euclid(86_400);
	let secs = total.rem_euclid(86_400);
	let (year, month, day) = civil_from_days(days);
	format!(
		"{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
		secs / 3600,
		(secs % 3600) / 60,
		secs % 60
	)
}

/// Convert days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
	let z = days + 719_468;
	let era = z.div_euclid(146_097);
	let doe = z - era * 146_097;
	let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let day = doy - (153 * mp + 2) / 5 + 1;
	let month = if mp < 10 { mp + 3 } else { mp - 9 };
	let year = yoe + era * 400 + i64::from(month <= 2);
	(year, month, day)
}

#[cfg(test)]
mod tests;
