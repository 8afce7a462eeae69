use crate::shortcut::{Result, ShortcutError};

/// Which structure a cursor is reading, used to pick the error kind on truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Section {
	/// Outer cryptographic envelope.
	Envelope,
	/// Embedded binary property list.
	Plist,
}

impl Section {
	/// Build the malformed-input error matching this section.
	pub(crate) fn malformed(self, at: usize, detail: impl Into<String>) -> ShortcutError {
		match self {
			Self::Envelope => ShortcutError::envelope(at, detail),
			Self::Plist => ShortcutError::plist(at, detail),
		}
	}
}

/// Simple bounded cursor over an immutable byte slice.
///
/// Offsets reported in errors are absolute within the slice the cursor was
/// created over, so sub-cursors made with [`Cursor::at`] keep meaningful
/// positions.
pub(crate) struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	end: usize,
	section: Section,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0 spanning all of `bytes`.
	pub(crate) fn new(bytes: &'a [u8], section: Section) -> Self {
		Self {
			bytes,
			pos: 0,
			end: bytes.len(),
			section,
		}
	}

	/// Create a cursor over `bytes[start..end]`, reporting absolute offsets.
	pub(crate) fn at(bytes: &'a [u8], start: usize, end: usize, section: Section) -> Result<Self> {
		if start > end || end > bytes.len() {
			return Err(section.malformed(start, format!("range {start}..{end} exceeds buffer of {} bytes", bytes.len())));
		}
		Ok(Self {
			bytes,
			pos: start,
			end,
			section,
		})
	}

	/// Return current byte offset.
	pub(crate) fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub(crate) fn remaining(&self) -> usize {
		self.end.saturating_sub(self.pos)
	}

	/// Return `true` when nothing is left to read.
	pub(crate) fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Build a malformed-input error at the current position.
	pub(crate) fn error(&self, detail: impl Into<String>) -> ShortcutError {
		self.section.malformed(self.pos, detail)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub(crate) fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(self.error(format!("unexpected end of data, need {n} bytes, remaining {}", self.remaining())));
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one byte.
	pub(crate) fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read a big-endian unsigned integer of `width` bytes (1..=8).
	pub(crate) fn read_uint_be(&mut self, width: usize) -> Result<u64> {
		if width == 0 || width > 8 {
			return Err(self.error(format!("unsupported integer width {width}")));
		}
		let raw = self.read_exact(width)?;
		Ok(raw.iter().fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte)))
	}

	/// Read a big-endian `u16`.
	pub(crate) fn read_u16_be(&mut self) -> Result<u16> {
		let raw = self.read_exact(2)?;
		Ok(u16::from_be_bytes([raw[0], raw[1]]))
	}

	/// Read a big-endian `u64`.
	pub(crate) fn read_u64_be(&mut self) -> Result<u64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(u64::from_be_bytes(buf))
	}

	/// Read a big-endian `i64`.
	pub(crate) fn read_i64_be(&mut self) -> Result<i64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(i64::from_be_bytes(buf))
	}

	/// Read a big-endian `i128`.
	pub(crate) fn read_i128_be(&mut self) -> Result<i128> {
		let raw = self.read_exact(16)?;
		let mut buf = [0_u8; 16];
		buf.copy_from_slice(raw);
		Ok(i128::from_be_bytes(buf))
	}

	/// Read a big-endian `f32`.
	pub(crate) fn read_f32_be(&mut self) -> Result<f32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(f32::from_be_bytes(buf))
	}

	/// Read a big-endian `f64`.
	pub(crate) fn read_f64_be(&mut self) -> Result<f64> {
		let raw = self.read_exact(8)?;
		let mut buf = [0_u8; 8];
		buf.copy_from_slice(raw);
		Ok(f64::from_be_bytes(buf))
	}
}
