use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ShortcutError>;

/// Errors produced while extracting, decoding, and rendering `.shortcut` data.
#[derive(Debug, Error)]
pub enum ShortcutError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Envelope tag/length structure was inconsistent, truncated, or not found.
	#[error("malformed envelope at offset {at}: {detail}")]
	MalformedEnvelope {
		/// Byte offset in the container where the problem was detected.
		at: usize,
		/// Human-readable cause.
		detail: String,
	},
	/// Envelope content-type identifier was not the expected kind.
	#[error("unsupported content type {oid} at offset {at}")]
	UnsupportedContentType {
		/// Byte offset of the identifier.
		at: usize,
		/// Dotted rendering of the identifier found.
		oid: String,
	},
	/// Signed-data structure carried no encapsulated content.
	#[error("missing payload: {detail}")]
	MissingPayload {
		/// Human-readable cause.
		detail: String,
	},
	/// Payload did not start with the `bplist00` marker.
	#[error("unsupported plist version (magic={magic:?})")]
	UnsupportedPlistVersion {
		/// First up-to-8 bytes of the payload.
		magic: [u8; 8],
	},
	/// Trailer, object table, or object encoding was inconsistent.
	#[error("malformed plist at offset {at}: {detail}")]
	MalformedPlist {
		/// Byte offset in the payload where the problem was detected.
		at: usize,
		/// Human-readable cause.
		detail: String,
	},
	/// String content cannot appear in an XML 1.0 document.
	#[error("text not representable in XML: {detail}")]
	UnrepresentableText {
		/// Human-readable cause.
		detail: String,
	},
	/// Decoded value tree lacks the expected workflow shape.
	#[error("malformed workflow: {detail}")]
	MalformedWorkflow {
		/// Human-readable cause.
		detail: String,
	},
}

impl ShortcutError {
	/// Stable snake_case label for the error kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Io(_) => "io",
			Self::MalformedEnvelope { .. } => "malformed_envelope",
			Self::UnsupportedContentType { .. } => "unsupported_content_type",
			Self::MissingPayload { .. } => "missing_payload",
			Self::UnsupportedPlistVersion { .. } => "unsupported_plist_version",
			Self::MalformedPlist { .. } => "malformed_plist",
			Self::UnrepresentableText { .. } => "unrepresentable_text",
			Self::MalformedWorkflow { .. } => "malformed_workflow",
		}
	}

	pub(crate) fn envelope(at: usize, detail: impl Into<String>) -> Self {
		Self::MalformedEnvelope { at, detail: detail.into() }
	}

	pub(crate) fn plist(at: usize, detail: impl Into<String>) -> Self {
		Self::MalformedPlist { at, detail: detail.into() }
	}

	pub(crate) fn workflow(detail: impl Into<String>) -> Self {
		Self::MalformedWorkflow { detail: detail.into() }
	}
}
