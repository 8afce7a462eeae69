use std::fmt::Write as _;

use crate::shortcut::bytes::{Cursor, Section};
use crate::shortcut::{Result, ShortcutError};

/// Universal `INTEGER` tag.
pub(crate) const TAG_INTEGER: u8 = 0x02;
/// Universal primitive `OCTET STRING` tag.
pub(crate) const TAG_OCTET_STRING: u8 = 0x04;
/// Universal constructed `OCTET STRING` tag (BER fragment container).
pub(crate) const TAG_OCTET_STRING_CONSTRUCTED: u8 = 0x24;
/// Universal `OBJECT IDENTIFIER` tag.
pub(crate) const TAG_OID: u8 = 0x06;
/// Universal constructed `SEQUENCE` tag.
pub(crate) const TAG_SEQUENCE: u8 = 0x30;
/// Universal constructed `SET` tag.
pub(crate) const TAG_SET: u8 = 0x31;
/// Context-specific constructed `[0]` tag.
pub(crate) const TAG_CONTEXT_0: u8 = 0xA0;
/// Context-specific constructed `[1]` tag.
pub(crate) const TAG_CONTEXT_1: u8 = 0xA1;

const CONSTRUCTED_BIT: u8 = 0x20;
const HIGH_TAG_NUMBER: u8 = 0x1F;
const MAX_LENGTH_OCTETS: usize = 8;

/// One definite-length tag-length-value element located in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Tlv {
	/// Raw single-byte tag.
	pub tag: u8,
	/// Offset of the tag byte.
	pub offset: usize,
	/// Offset of the first content byte.
	pub content_start: usize,
	/// Offset one past the last content byte.
	pub content_end: usize,
}

impl Tlv {
	/// Return `true` when the tag's constructed bit is set.
	pub(crate) fn is_constructed(&self) -> bool {
		self.tag & CONSTRUCTED_BIT != 0
	}

	/// Content length in bytes.
	pub(crate) fn len(&self) -> usize {
		self.content_end - self.content_start
	}

	/// Borrow the content bytes.
	pub(crate) fn content<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
		&bytes[self.content_start..self.content_end]
	}

	/// Cursor over this element's children.
	pub(crate) fn children<'a>(&self, bytes: &'a [u8]) -> Result<Cursor<'a>> {
		Cursor::at(bytes, self.content_start, self.content_end, Section::Envelope)
	}
}

/// Read one element header and skip over its content.
pub(crate) fn read_tlv(cursor: &mut Cursor<'_>) -> Result<Tlv> {
	let offset = cursor.pos();
	let tag = cursor.read_u8()?;
	if tag & HIGH_TAG_NUMBER == HIGH_TAG_NUMBER {
		return Err(ShortcutError::envelope(offset, format!("multi-byte tag 0x{tag:02x} not supported")));
	}

	let first = cursor.read_u8()?;
	let len = if first < 0x80 {
		usize::from(first)
	} else if first == 0x80 {
		return Err(ShortcutError::envelope(offset, "indefinite length encoding not supported"));
	} else {
		let octets = usize::from(first & 0x7F);
		if octets > MAX_LENGTH_OCTETS {
			return Err(ShortcutError::envelope(offset, format!("length field uses {octets} octets")));
		}
		let raw = cursor.read_uint_be(octets)?;
		usize::try_from(raw).map_err(|_| ShortcutError::envelope(offset, format!("length {raw} does not fit in memory")))?
	};

	let content_start = cursor.pos();
	if len > cursor.remaining() {
		return Err(ShortcutError::envelope(
			offset,
			format!("tag 0x{tag:02x} claims {len} bytes, only {} remain", cursor.remaining()),
		));
	}
	let _ = cursor.read_exact(len)?;

	Ok(Tlv {
		tag,
		offset,
		content_start,
		content_end: content_start + len,
	})
}

/// Read one element and require a specific tag.
pub(crate) fn expect_tlv(cursor: &mut Cursor<'_>, tag: u8, field: &'static str) -> Result<Tlv> {
	let at = cursor.pos();
	let tlv = read_tlv(cursor)?;
	if tlv.tag != tag {
		return Err(ShortcutError::envelope(at, format!("{field}: expected tag 0x{tag:02x}, got 0x{:02x}", tlv.tag)));
	}
	Ok(tlv)
}

/// Render encoded object identifier content in dotted-decimal form.
///
/// Falls back to a hex dump when the arcs are not well formed.
pub(crate) fn render_oid(content: &[u8]) -> String {
	match decode_oid_arcs(content) {
		Some(arcs) => {
			let mut out = String::new();
			for (idx, arc) in arcs.iter().enumerate() {
				if idx > 0 {
					out.push('.');
				}
				let _ = write!(out, "{arc}");
			}
			out
		}
		None => {
			let mut out = String::from("0x");
			for byte in content {
				let _ = write!(out, "{byte:02x}");
			}
			out
		}
	}
}

fn decode_oid_arcs(content: &[u8]) -> Option<Vec<u64>> {
	let mut arcs = Vec::new();
	let mut acc = 0_u64;
	let mut in_arc = false;

	for byte in content {
		acc = acc.checked_mul(128)?.checked_add(u64::from(byte & 0x7F))?;
		in_arc = true;
		if byte & 0x80 == 0 {
			if arcs.is_empty() {
				let first = (acc / 40).min(2);
				arcs.push(first);
				arcs.push(acc - first * 40);
			} else {
				arcs.push(acc);
			}
			acc = 0;
			in_arc = false;
		}
	}

	if in_arc || arcs.is_empty() { None } else { Some(arcs) }
}
