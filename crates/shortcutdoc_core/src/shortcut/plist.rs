use std::sync::Arc;

use crate::shortcut::bytes::{Cursor, Section};
use crate::shortcut::value::{Dict, Value};
use crate::shortcut::{Result, ShortcutError};

/// Leading marker of a version-0 binary property list.
pub const BPLIST_MAGIC: &[u8; 8] = b"bplist00";
/// Fixed size of the trailing metadata block.
pub const TRAILER_SIZE: usize = 32;

/// Runtime limits for binary plist decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum container nesting depth.
	pub max_depth: u32,
	/// Maximum object count a trailer may declare.
	pub max_objects: u64,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 512,
			max_objects: 1 << 24,
		}
	}
}

/// Parsed 32-byte plist trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
	/// Byte width of each object-table entry.
	pub offset_size: u8,
	/// Byte width of object references inside containers.
	pub ref_size: u8,
	/// Number of encoded objects.
	pub object_count: u64,
	/// Index of the top-level object.
	pub root: u64,
	/// Byte offset of the object table.
	pub table_offset: u64,
}

impl Trailer {
	/// Parse and validate the trailer against the payload layout.
	pub fn parse(payload: &[u8], opt: &DecodeOptions) -> Result<Self> {
		check_magic(payload)?;
		if payload.len() < BPLIST_MAGIC.len() + TRAILER_SIZE {
			return Err(ShortcutError::plist(payload.len(), "payload too short for trailer"));
		}

		let trailer_start = payload.len() - TRAILER_SIZE;
		let mut cursor = Cursor::at(payload, trailer_start + 6, payload.len(), Section::Plist)?;
		let offset_size = cursor.read_u8()?;
		let ref_size = cursor.read_u8()?;
		let object_count = cursor.read_u64_be()?;
		let root = cursor.read_u64_be()?;
		let table_offset = cursor.read_u64_be()?;

		if !(1..=8).contains(&offset_size) {
			return Err(ShortcutError::plist(trailer_start + 6, format!("invalid offset table entry width {offset_size}")));
		}
		if !(1..=8).contains(&ref_size) {
			return Err(ShortcutError::plist(trailer_start + 7, format!("invalid object reference width {ref_size}")));
		}
		if object_count == 0 || object_count > opt.max_objects {
			return Err(ShortcutError::plist(
				trailer_start + 8,
				format!("object count {object_count} outside 1..={}", opt.max_objects),
			));
		}
		if root >= object_count {
			return Err(ShortcutError::plist(
				trailer_start + 16,
				format!("root index {root} out of range (object count {object_count})"),
			));
		}

		let table_end = object_count
			.checked_mul(u64::from(offset_size))
			.and_then(|len| len.checked_add(table_offset));
		let in_bounds = table_offset >= BPLIST_MAGIC.len() as u64 && table_end.is_some_and(|end| end <= trailer_start as u64);
		if !in_bounds {
			return Err(ShortcutError::plist(
				trailer_start + 24,
				format!("object table of {object_count} entries at offset {table_offset} does not fit before the trailer"),
			));
		}

		Ok(Self {
			offset_size,
			ref_size,
			object_count,
			root,
			table_offset,
		})
	}
}

/// Decoded plist with its trailer.
#[derive(Debug, Clone)]
pub struct Plist {
	/// Parsed trailer.
	pub trailer: Trailer,
	/// Top-level value.
	pub root: Value,
}

/// Decode a binary plist payload into its root value using default limits.
pub fn decode_plist(payload: &[u8]) -> Result<Value> {
	Ok(decode_plist_with(payload, &DecodeOptions::default())?.root)
}

/// Decode a binary plist payload, returning the trailer alongside the root value.
pub fn decode_plist_with(payload: &[u8], opt: &DecodeOptions) -> Result<Plist> {
	let trailer = Trailer::parse(payload, opt)?;
	tracing::debug!(
		object_count = trailer.object_count,
		root = trailer.root,
		offset_size = trailer.offset_size,
		ref_size = trailer.ref_size,
		"parsed plist trailer"
	);

	let offsets = read_object_table(payload, &trailer)?;
	let mut decoder = Decoder {
		payload,
		table_offset: trailer.table_offset as usize,
		ref_size: usize::from(trailer.ref_size),
		offsets,
		slots: vec![Slot::Pending; trailer.object_count as usize],
		opt,
	};
	let root = decoder.resolve(trailer.root, trailer.table_offset as usize, 0)?;
	tracing::debug!(root_kind = root.kind(), "decoded plist");

	Ok(Plist { trailer, root })
}

fn check_magic(payload: &[u8]) -> Result<()> {
	if payload.starts_with(BPLIST_MAGIC) {
		return Ok(());
	}
	let mut magic = [0_u8; 8];
	let take = payload.len().min(8);
	magic[..take].copy_from_slice(&payload[..take]);
	Err(ShortcutError::UnsupportedPlistVersion { magic })
}

fn read_object_table(payload: &[u8], trailer: &Trailer) -> Result<Vec<usize>> {
	let table_offset = trailer.table_offset as usize;
	let width = usize::from(trailer.offset_size);
	let mut cursor = Cursor::at(payload, table_offset, payload.len() - TRAILER_SIZE, Section::Plist)?;

	let mut offsets = Vec::with_capacity(trailer.object_count as usize);
	for index in 0..trailer.object_count {
		let at = cursor.pos();
		let offset = cursor.read_uint_be(width)?;
		if offset < BPLIST_MAGIC.len() as u64 || offset >= trailer.table_offset {
			return Err(ShortcutError::plist(at, format!("object {index} offset {offset} outside object area")));
		}
		offsets.push(offset as usize);
	}
	Ok(offsets)
}

#[derive(Debug, Clone)]
enum Slot {
	Pending,
	Resolving,
	Done(Value),
}

/// Memoizing resolver over the object table.
///
/// Each slot moves `Pending -> Resolving -> Done`; meeting a `Resolving`
/// slot means the object refers to itself through its own children.
struct Decoder<'a> {
	payload: &'a [u8],
	table_offset: usize,
	ref_size: usize,
	offsets: Vec<usize>,
	slots: Vec<Slot>,
	opt: &'a DecodeOptions,
}

impl Decoder<'_> {
	fn resolve(&mut self, index: u64, at: usize, depth: u32) -> Result<Value> {
		let count = self.slots.len();
		let slot = usize::try_from(index)
			.ok()
			.filter(|slot| *slot < count)
			.ok_or_else(|| ShortcutError::plist(at, format!("object reference {index} out of range (object count {count})")))?;

		match &self.slots[slot] {
			Slot::Done(value) => return Ok(value.clone()),
			Slot::Resolving => {
				return Err(ShortcutError::plist(at, format!("object {index} references itself")));
			}
			Slot::Pending => {}
		}
		if depth >= self.opt.max_depth {
			return Err(ShortcutError::plist(at, format!("nesting depth exceeds {}", self.opt.max_depth)));
		}

		self.slots[slot] = Slot::Resolving;
		let value = self.decode_object(slot, depth)?;
		self.slots[slot] = Slot::Done(value.clone());
		Ok(value)
	}

	fn decode_object(&mut self, slot: usize, depth: u32) -> Result<Value> {
		let start = self.offsets[slot];
		let mut cursor = Cursor::at(self.payload, start, self.table_offset, Section::Plist)?;
		let marker = cursor.read_u8()?;
		let info = marker & 0x0F;

		match marker >> 4 {
			0x0 => match info {
				0x0 | 0xF => Ok(Value::Null),
				0x8 => Ok(Value::Bool(false)),
				0x9 => Ok(Value::Bool(true)),
				_ => Err(unknown_marker(start, marker)),
			},
			0x1 => read_int(&mut cursor, info).map(Value::Integer),
			0x2 => match info {
				2 => Ok(Value::Real(f64::from(cursor.read_f32_be()?))),
				3 => Ok(Value::Real(cursor.read_f64_be()?)),
				_ => Err(ShortcutError::plist(start, format!("unsupported real width nibble {info}"))),
			},
			0x3 if info == 3 => Ok(Value::Date(cursor.read_f64_be()?)),
			0x4 => {
				let size = read_size(&mut cursor, info)?;
				Ok(Value::Bytes(Arc::from(cursor.read_exact(size)?)))
			}
			0x5 => {
				let size = read_size(&mut cursor, info)?;
				let raw = cursor.read_exact(size)?;
				if !raw.is_ascii() {
					return Err(ShortcutError::plist(start, "non-ASCII byte in ASCII string"));
				}
				let text = String::from_utf8_lossy(raw);
				Ok(Value::String(Arc::from(text.as_ref())))
			}
			0x6 => {
				let units = read_size(&mut cursor, info)?;
				let len = units
					.checked_mul(2)
					.ok_or_else(|| ShortcutError::plist(start, format!("UTF-16 string of {units} units too large")))?;
				let raw = cursor.read_exact(len)?;
				let units: Vec<u16> = raw.chunks_exact(2).map(|pair| u16::from_be_bytes([pair[0], pair[1]])).collect();
				let text = String::from_utf16(&units).map_err(|_| ShortcutError::plist(start, "invalid UTF-16 string"))?;
				Ok(Value::String(Arc::from(text)))
			}
			0x8 => Ok(Value::ObjectRef(cursor.read_uint_be(usize::from(info) + 1)?)),
			0xA | 0xC => {
				let size = read_size(&mut cursor, info)?;
				let refs = self.read_refs(&mut cursor, size)?;
				let mut items = Vec::with_capacity(size);
				for (at, index) in refs {
					items.push(self.resolve(index, at, depth + 1)?);
				}
				Ok(Value::Array(items.into()))
			}
			0xD => {
				let size = read_size(&mut cursor, info)?;
				let keys = self.read_refs(&mut cursor, size)?;
				let values = self.read_refs(&mut cursor, size)?;
				let mut dict = Dict::new();
				for ((key_at, key_index), (value_at, value_index)) in keys.into_iter().zip(values) {
					let key = match self.resolve(key_index, key_at, depth + 1)? {
						Value::String(key) => key,
						other => {
							return Err(ShortcutError::plist(key_at, format!("dict key must be a string, got {}", other.kind())));
						}
					};
					let value = self.resolve(value_index, value_at, depth + 1)?;
					dict.insert(key, value);
				}
				Ok(Value::Dict(Arc::new(dict)))
			}
			_ => Err(unknown_marker(start, marker)),
		}
	}

	/// Read `count` object references, keeping each one's byte offset for error reporting.
	fn read_refs(&self, cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<(usize, u64)>> {
		let need = count
			.checked_mul(self.ref_size)
			.ok_or_else(|| cursor.error(format!("reference list of {count} entries too large")))?;
		if need > cursor.remaining() {
			return Err(cursor.error(format!("reference list needs {need} bytes, remaining {}", cursor.remaining())));
		}

		let mut refs = Vec::with_capacity(count);
		for _ in 0..count {
			let at = cursor.pos();
			refs.push((at, cursor.read_uint_be(self.ref_size)?));
		}
		Ok(refs)
	}
}

fn unknown_marker(at: usize, marker: u8) -> ShortcutError {
	ShortcutError::plist(at, format!("unknown object marker 0x{marker:02x}"))
}

fn read_int(cursor: &mut Cursor<'_>, info: u8) -> Result<i64> {
	match info {
		0..=2 => Ok(cursor.read_uint_be(1 << info)? as i64),
		3 => cursor.read_i64_be(),
		4 => {
			let at = cursor.pos();
			let wide = cursor.read_i128_be()?;
			i64::try_from(wide).map_err(|_| ShortcutError::plist(at, format!("integer {wide} does not fit in 64 bits")))
		}
		_ => Err(cursor.error(format!("unsupported integer width nibble {info}"))),
	}
}

/// Read an object's element count, following the extended-size escape when the nibble is `0xF`.
fn read_size(cursor: &mut Cursor<'_>, info: u8) -> Result<usize> {
	if info != 0x0F {
		return Ok(usize::from(info));
	}

	let at = cursor.pos();
	let marker = cursor.read_u8()?;
	if marker >> 4 != 0x1 || marker & 0x0F > 3 {
		return Err(ShortcutError::plist(at, format!("invalid extended size marker 0x{marker:02x}")));
	}
	let size = cursor.read_uint_be(1 << (marker & 0x0F))?;
	usize::try_from(size).map_err(|_| ShortcutError::plist(at, format!("size {size} does not fit in memory")))
}
