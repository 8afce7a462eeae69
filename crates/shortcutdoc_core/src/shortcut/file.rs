use std::fs;
use std::path::Path;

use crate::shortcut::actions::Workflow;
use crate::shortcut::envelope::{EnvelopeOptions, extract_payload_with};
use crate::shortcut::error::Result;
use crate::shortcut::plist::{DecodeOptions, Trailer, decode_plist_with};
use crate::shortcut::value::Value;

/// How the plist payload is stored in a container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
	/// CMS signed-data envelope around the payload.
	Signed,
	/// Bare binary plist, as older exports were written.
	Unsigned,
}

impl Container {
	/// Detect the container kind from leading bytes.
	pub fn detect(bytes: &[u8]) -> Self {
		if bytes.starts_with(b"bplist") { Self::Unsigned } else { Self::Signed }
	}

	/// Stable label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Signed => "signed",
			Self::Unsigned => "unsigned",
		}
	}
}

/// Limits applied while loading a container.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
	/// Envelope walking limits.
	pub envelope: EnvelopeOptions,
	/// Plist decoding limits.
	pub decode: DecodeOptions,
}

/// Fully decoded `.shortcut` container.
#[derive(Debug, Clone)]
pub struct ShortcutFile {
	container: Container,
	envelope_offset: Option<usize>,
	payload: Vec<u8>,
	trailer: Trailer,
	root: Value,
}

impl ShortcutFile {
	/// Read and decode a container from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Self::open_with(path, &LoadOptions::default())
	}

	/// Read and decode a container from disk with explicit limits.
	pub fn open_with(path: impl AsRef<Path>, opt: &LoadOptions) -> Result<Self> {
		let bytes = fs::read(path)?;
		Self::from_bytes_with(&bytes, opt)
	}

	/// Decode a container already held in memory.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Self::from_bytes_with(bytes, &LoadOptions::default())
	}

	/// Decode a container already held in memory with explicit limits.
	pub fn from_bytes_with(bytes: &[u8], opt: &LoadOptions) -> Result<Self> {
		let container = Container::detect(bytes);
		let (envelope_offset, payload) = match container {
			Container::Unsigned => (None, bytes.to_vec()),
			Container::Signed => {
				let extracted = extract_payload_with(bytes, &opt.envelope)?;
				(Some(extracted.envelope_offset), extracted.bytes.into_owned())
			}
		};
		tracing::debug!(container = container.as_str(), payload_len = payload.len(), "container unpacked");

		let plist = decode_plist_with(&payload, &opt.decode)?;
		Ok(Self {
			container,
			envelope_offset,
			payload,
			trailer: plist.trailer,
			root: plist.root,
		})
	}

	/// Container kind.
	pub fn container(&self) -> Container {
		self.container
	}

	/// Offset of the CMS envelope inside the file, for signed containers.
	pub fn envelope_offset(&self) -> Option<usize> {
		self.envelope_offset
	}

	/// Raw binary plist bytes.
	pub fn payload(&self) -> &[u8] {
		&self.payload
	}

	/// Parsed plist trailer.
	pub fn trailer(&self) -> &Trailer {
		&self.trailer
	}

	/// Decoded root value.
	pub fn root(&self) -> &Value {
		&self.root
	}

	/// Consume the file and keep only the root value.
	pub fn into_root(self) -> Value {
		self.root
	}

	/// Workflow view over the root value.
	pub fn workflow(&self) -> Result<Workflow<'_>> {
		Workflow::from_value(&self.root)
	}
}

/// Decode container bytes straight to the root value.
pub fn decode_shortcut(bytes: &[u8]) -> Result<Value> {
	ShortcutFile::from_bytes(bytes).map(ShortcutFile::into_root)
}

#[cfg(test)]
mod tests;
