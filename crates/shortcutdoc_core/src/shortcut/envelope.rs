use std::borrow::Cow;

use crate::shortcut::bytes::{Cursor, Section};
use crate::shortcut::der::{
	TAG_CONTEXT_0, TAG_CONTEXT_1, TAG_INTEGER, TAG_OCTET_STRING, TAG_OCTET_STRING_CONSTRUCTED, TAG_OID, TAG_SEQUENCE, TAG_SET, Tlv, expect_tlv,
	read_tlv, render_oid,
};
use crate::shortcut::{Result, ShortcutError};

/// DER content of the `id-signedData` object identifier (1.2.840.113549.1.7.2).
pub const SIGNED_DATA_OID: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02];
/// DER content of the `id-data` object identifier (1.2.840.113549.1.7.1).
pub const DATA_OID: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x01];

/// Limits applied while walking the envelope.
#[derive(Debug, Clone)]
pub struct EnvelopeOptions {
	/// Maximum nesting of constructed payload fragments.
	pub max_depth: u32,
}

impl Default for EnvelopeOptions {
	fn default() -> Self {
		Self { max_depth: 32 }
	}
}

/// Payload bytes extracted from a signed-data envelope.
#[derive(Debug, Clone)]
pub struct EnvelopePayload<'a> {
	/// Offset of the outer `ContentInfo` sequence inside the container.
	pub envelope_offset: usize,
	/// Offset of the first payload byte inside the container.
	pub payload_offset: usize,
	/// Number of byte-string fragments concatenated into the payload.
	pub fragments: usize,
	/// Payload bytes, borrowed when stored as one contiguous string.
	pub bytes: Cow<'a, [u8]>,
}

/// Locate the outer `ContentInfo` sequence, skipping any leading header.
///
/// A candidate is a `SEQUENCE` tag with a definite length header immediately
/// followed by an object identifier. Candidates whose identifier is not
/// signed-data are passed over; when no candidate is signed-data, the first
/// candidate's identifier is reported. The declared length is not checked
/// here, so a truncated envelope is still found and then rejected by the walk.
pub fn locate_envelope(bytes: &[u8]) -> Result<usize> {
	let mut first_mismatch = None;
	for (pos, byte) in bytes.iter().enumerate() {
		if *byte != TAG_SEQUENCE {
			continue;
		}
		let Some((oid_at, oid)) = content_info_oid(&bytes[pos + 1..]) else {
			continue;
		};
		if oid == SIGNED_DATA_OID {
			return Ok(pos);
		}
		tracing::trace!(pos, oid = %render_oid(oid), "skipped non signed-data sequence");
		first_mismatch.get_or_insert((pos + 1 + oid_at, oid));
	}

	match first_mismatch {
		Some((at, oid)) => Err(ShortcutError::UnsupportedContentType { at, oid: render_oid(oid) }),
		None => Err(ShortcutError::envelope(0, "no ContentInfo sequence start found")),
	}
}

/// Return the offset (relative to `rest`) and content of the OID following a sequence length header.
fn content_info_oid(rest: &[u8]) -> Option<(usize, &[u8])> {
	let oid_at = length_header_len(rest)?;
	match rest.get(oid_at..oid_at + 2) {
		Some([tag, len]) if *tag == TAG_OID && (1..0x80).contains(len) => {
			let content = rest.get(oid_at + 2..oid_at + 2 + usize::from(*len))?;
			Some((oid_at, content))
		}
		_ => None,
	}
}

fn length_header_len(rest: &[u8]) -> Option<usize> {
	let first = *rest.first()?;
	match first {
		0x00..=0x7F => Some(1),
		0x80 => None,
		_ => {
			let octets = usize::from(first & 0x7F);
			if octets > 8 { None } else { Some(1 + octets) }
		}
	}
}

/// Extract the encapsulated payload using default limits.
pub fn extract_payload(bytes: &[u8]) -> Result<EnvelopePayload<'_>> {
	extract_payload_with(bytes, &EnvelopeOptions::default())
}

/// Extract the encapsulated payload from a signed-data envelope.
///
/// Certificates and signer infos are skipped; no signature is checked.
pub fn extract_payload_with<'a>(bytes: &'a [u8], opt: &EnvelopeOptions) -> Result<EnvelopePayload<'a>> {
	let envelope_offset = locate_envelope(bytes)?;
	tracing::debug!(envelope_offset, "located envelope");

	let mut outer = Cursor::at(bytes, envelope_offset, bytes.len(), Section::Envelope)?;
	let content_info = expect_tlv(&mut outer, TAG_SEQUENCE, "ContentInfo")?;
	let mut ci = content_info.children(bytes)?;

	let content_type = expect_tlv(&mut ci, TAG_OID, "ContentInfo.contentType")?;
	expect_oid(bytes, &content_type, SIGNED_DATA_OID)?;
	if ci.is_empty() {
		return Err(ShortcutError::MissingPayload {
			detail: "ContentInfo has no content".to_owned(),
		});
	}

	let explicit = expect_tlv(&mut ci, TAG_CONTEXT_0, "ContentInfo.content")?;
	let mut explicit = explicit.children(bytes)?;
	let signed_data = expect_tlv(&mut explicit, TAG_SEQUENCE, "SignedData")?;
	let mut sd = signed_data.children(bytes)?;

	let _version = expect_tlv(&mut sd, TAG_INTEGER, "SignedData.version")?;
	let _digests = expect_tlv(&mut sd, TAG_SET, "SignedData.digestAlgorithms")?;
	if sd.is_empty() {
		return Err(ShortcutError::MissingPayload {
			detail: "SignedData has no encapContentInfo".to_owned(),
		});
	}

	let encap = expect_tlv(&mut sd, TAG_SEQUENCE, "EncapsulatedContentInfo")?;
	let mut ec = encap.children(bytes)?;
	let econtent_type = expect_tlv(&mut ec, TAG_OID, "EncapsulatedContentInfo.eContentType")?;
	expect_oid(bytes, &econtent_type, DATA_OID)?;
	if ec.is_empty() {
		return Err(ShortcutError::MissingPayload {
			detail: "EncapsulatedContentInfo has no eContent".to_owned(),
		});
	}

	let wrapper = expect_tlv(&mut ec, TAG_CONTEXT_0, "EncapsulatedContentInfo.eContent")?;
	let mut wc = wrapper.children(bytes)?;
	if wc.is_empty() {
		return Err(ShortcutError::MissingPayload {
			detail: "eContent wrapper is empty".to_owned(),
		});
	}
	let octets = read_tlv(&mut wc)?;

	let mut fragments = 0;
	let payload = collect_octets(bytes, &octets, 0, opt, &mut fragments)?;
	skip_trailing_fields(&mut sd)?;

	tracing::debug!(payload_offset = octets.content_start, len = payload.len(), fragments, "extracted envelope payload");

	Ok(EnvelopePayload {
		envelope_offset,
		payload_offset: first_fragment_start(bytes, &octets),
		fragments,
		bytes: payload,
	})
}

fn expect_oid(bytes: &[u8], tlv: &Tlv, expected: &[u8]) -> Result<()> {
	let got = tlv.content(bytes);
	if got != expected {
		return Err(ShortcutError::UnsupportedContentType {
			at: tlv.offset,
			oid: render_oid(got),
		});
	}
	Ok(())
}

fn collect_octets<'a>(bytes: &'a [u8], tlv: &Tlv, depth: u32, opt: &EnvelopeOptions, fragments: &mut usize) -> Result<Cow<'a, [u8]>> {
	match tlv.tag {
		TAG_OCTET_STRING => {
			*fragments += 1;
			Ok(Cow::Borrowed(tlv.content(bytes)))
		}
		TAG_OCTET_STRING_CONSTRUCTED => {
			if depth >= opt.max_depth {
				return Err(ShortcutError::envelope(tlv.offset, format!("payload fragment nesting exceeds {}", opt.max_depth)));
			}
			let mut out = Vec::with_capacity(tlv.len());
			let mut children = tlv.children(bytes)?;
			while !children.is_empty() {
				let child = read_tlv(&mut children)?;
				out.extend_from_slice(&collect_octets(bytes, &child, depth + 1, opt, fragments)?);
			}
			Ok(Cow::Owned(out))
		}
		other => Err(ShortcutError::envelope(tlv.offset, format!("eContent: expected byte string, got tag 0x{other:02x}"))),
	}
}

fn first_fragment_start(bytes: &[u8], tlv: &Tlv) -> usize {
	if tlv.tag != TAG_OCTET_STRING_CONSTRUCTED {
		return tlv.content_start;
	}
	let Ok(mut children) = tlv.children(bytes) else {
		return tlv.content_start;
	};
	match read_tlv(&mut children) {
		Ok(child) => first_fragment_start(bytes, &child),
		Err(_) => tlv.content_start,
	}
}

fn skip_trailing_fields(sd: &mut Cursor<'_>) -> Result<()> {
	while !sd.is_empty() {
		let field = read_tlv(sd)?;
		let name = match field.tag {
			TAG_CONTEXT_0 => "certificates",
			TAG_CONTEXT_1 => "crls",
			TAG_SET => "signerInfos",
			_ => "unknown",
		};
		tracing::trace!(field = name, len = field.len(), "skipped signed-data field");
	}
	Ok(())
}
