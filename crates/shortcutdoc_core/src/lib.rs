//! Public library API for decoding Apple `.shortcut` containers.

/// Envelope extraction, binary plist decoding, value model, and renderers.
pub mod shortcut;
