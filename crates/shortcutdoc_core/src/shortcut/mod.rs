mod actions;
mod bytes;
mod der;
mod envelope;
mod error;
mod file;
mod plist;
mod value;
mod xml;

/// Workflow view and action-list rendering.
pub use actions::{
	ACTIONS_KEY, Action, IDENTIFIER_KEY, PARAMETERS_KEY, UNKNOWN_ACTION, WORKFLOW_KEY, Workflow, render_action_list, summarize,
};
/// CMS envelope location and payload extraction.
pub use envelope::{DATA_OID, EnvelopeOptions, EnvelopePayload, SIGNED_DATA_OID, extract_payload, extract_payload_with, locate_envelope};
/// Error and result aliases.
pub use error::{Result, ShortcutError};
/// Container loading and the decode-only entry point.
pub use file::{Container, LoadOptions, ShortcutFile, decode_shortcut};
/// Binary plist decoding entry points and options.
pub use plist::{BPLIST_MAGIC, DecodeOptions, Plist, TRAILER_SIZE, Trailer, decode_plist, decode_plist_with};
/// Decoded value types.
pub use value::{Dict, REFERENCE_EPOCH_UNIX_SECONDS, Value, format_date};
/// XML property list rendering.
pub use xml::{XmlOptions, render_xml, render_xml_with};
