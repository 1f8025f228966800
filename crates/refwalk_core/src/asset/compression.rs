use std::io::Read;

use serde::Deserialize;

use crate::asset::{Result, WalkError};

const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;

/// How a manifest's payload file is stored on disk.
///
/// Only the payload honors this; resource files are always read as stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
	/// Stored as-is.
	#[default]
	None,
	/// One zstd stream.
	Zstd,
}

impl Compression {
	/// Turn stored bytes into payload bytes.
	pub fn decode(self, raw: Vec<u8>) -> Result<Vec<u8>> {
		match self {
			Self::None => Ok(raw),
			Self::Zstd => inflate_zstd(&raw),
		}
	}
}

fn inflate_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let mut out = Vec::new();
	zstd::stream::read::Decoder::new(raw)?
		.take(MAX_DECOMPRESSED_BYTES as u64 + 1)
		.read_to_end(&mut out)?;
	if out.len() > MAX_DECOMPRESSED_BYTES {
		return Err(WalkError::DecompressedTooLarge { limit: MAX_DECOMPRESSED_BYTES });
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::Compression;
	use crate::asset::WalkError;

	#[test]
	fn uncompressed_payloads_keep_zstd_magic_bytes() {
		let packed = zstd::encode_all(&b"HELLOWORLD"[..], 3).expect("compress");
		let bytes = Compression::None.decode(packed.clone()).expect("decode");
		assert_eq!(bytes, packed);
	}

	#[test]
	fn zstd_payloads_are_inflated() {
		let payload = vec![7_u8; 4096];
		let packed = zstd::encode_all(payload.as_slice(), 3).expect("compress");
		assert_eq!(Compression::Zstd.decode(packed).expect("decode"), payload);
	}

	#[test]
	fn invalid_zstd_payloads_are_io_errors() {
		let err = Compression::Zstd.decode(vec![0x28, 0xB5, 0x2F, 0xFD, 0, 0]).expect_err("garbage fails");
		assert!(matches!(err, WalkError::Io(_)));
	}
}
