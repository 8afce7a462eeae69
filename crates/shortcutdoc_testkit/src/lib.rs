//! Shared test helpers for workspace crates.
//!
//! Fixtures are assembled byte by byte so every test states exactly what the
//! decoder is fed.

mod bplist;
mod der;

pub use bplist::{BplistBuilder, TrailerFields};
pub use der::{DATA_OID, SIGNED_DATA_OID, SignedDataBuilder, der, der_len};

/// Build a signed `.shortcut` container around a workflow with the given actions.
///
/// Each action is `(identifier, [(parameter key, string value)])`.
pub fn workflow_shortcut(actions: &[(&str, &[(&str, &str)])]) -> Vec<u8> {
	SignedDataBuilder::new(workflow_plist(actions)).build()
}

/// Build the binary plist for a workflow with the given actions.
pub fn workflow_plist(actions: &[(&str, &[(&str, &str)])]) -> Vec<u8> {
	let mut plist = BplistBuilder::new();
	let actions_key = plist.ascii("WFWorkflowActions");
	let id_key = plist.ascii("WFWorkflowActionIdentifier");
	let params_key = plist.ascii("WFWorkflowActionParameters");
	let version_key = plist.ascii("WFWorkflowClientVersion");
	let version = plist.ascii("2302.0.4");

	let mut action_refs = Vec::with_capacity(actions.len());
	for (identifier, params) in actions {
		let id = plist.ascii(identifier);
		let mut pairs = Vec::with_capacity(params.len());
		for (key, value) in params.iter() {
			let key = plist.ascii(key);
			let value = plist.ascii(value);
			pairs.push((key, value));
		}
		let params = plist.dict(&pairs);
		action_refs.push(plist.dict(&[(id_key, id), (params_key, params)]));
	}

	let list = plist.array(&action_refs);
	let root = plist.dict(&[(version_key, version), (actions_key, list)]);
	plist.build(root)
}
