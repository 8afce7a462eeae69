/// DER content of `id-signedData`.
pub const SIGNED_DATA_OID: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02];
/// DER content of `id-data`.
pub const DATA_OID: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x01];

const SHA256_OID: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

/// Encode a definite length field.
pub fn der_len(len: usize) -> Vec<u8> {
	if len < 0x80 {
		return vec![len as u8];
	}
	let raw = (len as u64).to_be_bytes();
	let skip = raw.iter().take_while(|byte| **byte == 0).count();
	let mut out = vec![0x80 | (8 - skip) as u8];
	out.extend_from_slice(&raw[skip..]);
	out
}

/// Encode one tag-length-value element.
pub fn der(tag: u8, content: &[u8]) -> Vec<u8> {
	let mut out = vec![tag];
	out.extend(der_len(content.len()));
	out.extend_from_slice(content);
	out
}

fn concat(parts: &[Vec<u8>]) -> Vec<u8> {
	parts.iter().flatten().copied().collect()
}

#[derive(Debug, Clone)]
enum EContent {
	Whole(Vec<u8>),
	Fragments(Vec<Vec<u8>>),
	Absent,
}

/// Assembles a CMS `ContentInfo` wrapping `SignedData` around a payload.
///
/// Defaults mirror what signed shortcuts carry: an `id-data` payload, a
/// SHA-256 digest algorithm set, a certificate blob and one signer info.
#[derive(Debug, Clone)]
pub struct SignedDataBuilder {
	prefix: Vec<u8>,
	content_type: Vec<u8>,
	econtent_type: Vec<u8>,
	econtent: EContent,
	certificates: Option<Vec<u8>>,
	signer_infos: Vec<u8>,
}

impl SignedDataBuilder {
	/// Start a builder carrying `payload` as one contiguous byte string.
	pub fn new(payload: Vec<u8>) -> Self {
		Self {
			prefix: Vec::new(),
			content_type: SIGNED_DATA_OID.to_vec(),
			econtent_type: DATA_OID.to_vec(),
			econtent: EContent::Whole(payload),
			certificates: Some(der(0x30, &der(0x02, &[0x01, 0x02, 0x03]))),
			signer_infos: der(0x30, &der(0x02, &[0x01])),
		}
	}

	/// Prepend a non-DER header before the envelope.
	pub fn prefix(mut self, prefix: &[u8]) -> Self {
		self.prefix = prefix.to_vec();
		self
	}

	/// Override the outer content-type identifier content.
	pub fn content_type(mut self, oid: &[u8]) -> Self {
		self.content_type = oid.to_vec();
		self
	}

	/// Override the encapsulated content-type identifier content.
	pub fn econtent_type(mut self, oid: &[u8]) -> Self {
		self.econtent_type = oid.to_vec();
		self
	}

	/// Split the payload into constructed byte-string fragments.
	pub fn fragments(mut self, parts: &[&[u8]]) -> Self {
		self.econtent = EContent::Fragments(parts.iter().map(|part| part.to_vec()).collect());
		self
	}

	/// Drop the encapsulated content field.
	pub fn without_econtent(mut self) -> Self {
		self.econtent = EContent::Absent;
		self
	}

	/// Drop the certificate set.
	pub fn without_certificates(mut self) -> Self {
		self.certificates = None;
		self
	}

	/// Encode the container.
	pub fn build(&self) -> Vec<u8> {
		let econtent = match &self.econtent {
			EContent::Whole(payload) => Some(der(0x04, payload)),
			EContent::Fragments(parts) => {
				let inner: Vec<Vec<u8>> = parts.iter().map(|part| der(0x04, part)).collect();
				Some(der(0x24, &concat(&inner)))
			}
			EContent::Absent => None,
		};

		let mut encap = vec![der(0x06, &self.econtent_type)];
		if let Some(econtent) = econtent {
			encap.push(der(0xA0, &econtent));
		}

		let digest = der(0x30, &concat(&[der(0x06, SHA256_OID), der(0x05, &[])]));
		let mut signed = vec![der(0x02, &[0x01]), der(0x31, &digest), der(0x30, &concat(&encap))];
		if let Some(certs) = &self.certificates {
			signed.push(der(0xA0, certs));
		}
		signed.push(der(0x31, &self.signer_infos));

		let content_info = der(0x30, &concat(&[der(0x06, &self.content_type), der(0xA0, &der(0x30, &concat(&signed)))]));
		let mut out = self.prefix.clone();
		out.extend(content_info);
		out
	}
}
