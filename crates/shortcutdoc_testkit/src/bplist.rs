/// Trailer fields written at the end of a built plist.
///
/// Tests mutate these through [`BplistBuilder::build_with`] to produce
/// inconsistent trailers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerFields {
	/// Byte width of each object-table entry.
	pub offset_size: u8,
	/// Byte width of object references inside containers.
	pub ref_size: u8,
	/// Declared number of objects.
	pub object_count: u64,
	/// Index of the root object.
	pub root: u64,
	/// Byte offset of the object table.
	pub table_offset: u64,
}

#[derive(Debug, Clone)]
enum Obj {
	Raw(Vec<u8>),
	Refs { marker: u8, refs: Vec<usize> },
	Dict { keys: Vec<usize>, values: Vec<usize> },
}

/// Hand-assembles `bplist00` payloads one object at a time.
///
/// Every `push`-style method returns the object index, which later objects
/// use as a reference.
#[derive(Debug, Clone, Default)]
pub struct BplistBuilder {
	objects: Vec<Obj>,
	ref_size: Option<u8>,
}

impl BplistBuilder {
	/// Create an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Force the object-reference width instead of deriving it from the object count.
	pub fn with_ref_size(mut self, ref_size: u8) -> Self {
		self.ref_size = Some(ref_size);
		self
	}

	/// Index the next pushed object will receive.
	pub fn next_index(&self) -> usize {
		self.objects.len()
	}

	/// Push pre-encoded object bytes.
	pub fn raw(&mut self, bytes: &[u8]) -> usize {
		self.push(Obj::Raw(bytes.to_vec()))
	}

	/// Push a null object.
	pub fn null(&mut self) -> usize {
		self.raw(&[0x00])
	}

	/// Push a boolean object.
	pub fn bool(&mut self, value: bool) -> usize {
		self.raw(&[if value { 0x09 } else { 0x08 }])
	}

	/// Push an integer using the smallest width a binary plist writer would pick.
	pub fn int(&mut self, value: i64) -> usize {
		let bytes = encode_int(value);
		self.push(Obj::Raw(bytes))
	}

	/// Push an 8-byte real.
	pub fn real(&mut self, value: f64) -> usize {
		let mut bytes = vec![0x23];
		bytes.extend_from_slice(&value.to_be_bytes());
		self.push(Obj::Raw(bytes))
	}

	/// Push a date as seconds since 2001-01-01T00:00:00Z.
	pub fn date(&mut self, seconds: f64) -> usize {
		let mut bytes = vec![0x33];
		bytes.extend_from_slice(&seconds.to_be_bytes());
		self.push(Obj::Raw(bytes))
	}

	/// Push a data object.
	pub fn data(&mut self, value: &[u8]) -> usize {
		let mut bytes = marker_with_size(0x40, value.len());
		bytes.extend_from_slice(value);
		self.push(Obj::Raw(bytes))
	}

	/// Push a single-byte string. Panics on non-ASCII input.
	pub fn ascii(&mut self, value: &str) -> usize {
		assert!(value.is_ascii(), "ascii() needs ASCII text");
		let mut bytes = marker_with_size(0x50, value.len());
		bytes.extend_from_slice(value.as_bytes());
		self.push(Obj::Raw(bytes))
	}

	/// Push a UTF-16 string.
	pub fn utf16(&mut self, value: &str) -> usize {
		let units: Vec<u16> = value.encode_utf16().collect();
		let mut bytes = marker_with_size(0x60, units.len());
		for unit in units {
			bytes.extend_from_slice(&unit.to_be_bytes());
		}
		self.push(Obj::Raw(bytes))
	}

	/// Push a UID object.
	pub fn uid(&mut self, value: u64) -> usize {
		let width = uint_width(value);
		let mut bytes = vec![0x80 | (width as u8 - 1)];
		bytes.extend_from_slice(&value.to_be_bytes()[8 - width..]);
		self.push(Obj::Raw(bytes))
	}

	/// Push an array referencing `items`.
	pub fn array(&mut self, items: &[usize]) -> usize {
		self.push(Obj::Refs {
			marker: 0xA0,
			refs: items.to_vec(),
		})
	}

	/// Push a set referencing `items`.
	pub fn set(&mut self, items: &[usize]) -> usize {
		self.push(Obj::Refs {
			marker: 0xC0,
			refs: items.to_vec(),
		})
	}

	/// Push a dict from `(key, value)` index pairs.
	pub fn dict(&mut self, pairs: &[(usize, usize)]) -> usize {
		self.push(Obj::Dict {
			keys: pairs.iter().map(|(key, _)| *key).collect(),
			values: pairs.iter().map(|(_, value)| *value).collect(),
		})
	}

	/// Encode all objects with `root` as the top object.
	pub fn build(&self, root: usize) -> Vec<u8> {
		self.build_with(root, |_| {})
	}

	/// Encode all objects, letting `adjust` rewrite trailer fields before they are written.
	pub fn build_with(&self, root: usize, adjust: impl FnOnce(&mut TrailerFields)) -> Vec<u8> {
		let ref_size = self.ref_size.unwrap_or(if self.objects.len() <= 0xFF { 1 } else { 2 });
		let width = usize::from(ref_size);

		let mut out = b"bplist00".to_vec();
		let mut offsets = Vec::with_capacity(self.objects.len());
		for obj in &self.objects {
			offsets.push(out.len() as u64);
			match obj {
				Obj::Raw(bytes) => out.extend_from_slice(bytes),
				Obj::Refs { marker, refs } => {
					out.extend(marker_with_size(*marker, refs.len()));
					for item in refs {
						push_ref(&mut out, *item, width);
					}
				}
				Obj::Dict { keys, values } => {
					out.extend(marker_with_size(0xD0, keys.len()));
					for item in keys.iter().chain(values) {
						push_ref(&mut out, *item, width);
					}
				}
			}
		}

		let table_offset = out.len() as u64;
		let offset_size = uint_width(table_offset.max(1));
		for offset in &offsets {
			out.extend_from_slice(&offset.to_be_bytes()[8 - offset_size..]);
		}

		let mut trailer = TrailerFields {
			offset_size: offset_size as u8,
			ref_size,
			object_count: self.objects.len() as u64,
			root: root as u64,
			table_offset,
		};
		adjust(&mut trailer);

		out.extend_from_slice(&[0_u8; 6]);
		out.push(trailer.offset_size);
		out.push(trailer.ref_size);
		out.extend_from_slice(&trailer.object_count.to_be_bytes());
		out.extend_from_slice(&trailer.root.to_be_bytes());
		out.extend_from_slice(&trailer.table_offset.to_be_bytes());
		out
	}

	fn push(&mut self, obj: Obj) -> usize {
		self.objects.push(obj);
		self.objects.len() - 1
	}
}

fn push_ref(out: &mut Vec<u8>, index: usize, width: usize) {
	out.extend_from_slice(&(index as u64).to_be_bytes()[8 - width..]);
}

fn marker_with_size(marker: u8, size: usize) -> Vec<u8> {
	if size < 0x0F {
		return vec![marker | size as u8];
	}
	let mut out = vec![marker | 0x0F];
	out.extend(encode_int(size as i64));
	out
}

fn encode_int(value: i64) -> Vec<u8> {
	let (nibble, width) = if value < 0 {
		(3, 8)
	} else {
		match uint_width(value as u64) {
			1 => (0, 1),
			2 => (1, 2),
			3 | 4 => (2, 4),
			_ => (3, 8),
		}
	};
	let mut out = vec![0x10 | nibble];
	out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
	out
}

fn uint_width(value: u64) -> usize {
	let bits = 64 - value.leading_zeros() as usize;
	bits.div_ceil(8).max(1)
}
