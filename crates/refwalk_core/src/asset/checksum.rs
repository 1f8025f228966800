//! CRC32 accumulation shared by byte sources and the walker.
//!
//! The accumulator is the finalized CRC32 (IEEE) value; appending bytes to a
//! prior value equals hashing the concatenation in one pass.

use crc32fast::Hasher;

/// Continue `prior` over `bytes`.
pub fn append(prior: u32, bytes: &[u8]) -> u32 {
	let mut hasher = Hasher::new_with_initial(prior);
	hasher.update(bytes);
	hasher.finalize()
}

/// Continue `prior` over the big-endian encoding of a canonical handle.
pub fn append_handle(prior: u32, handle: i32) -> u32 {
	append(prior, &handle.to_be_bytes())
}

#[cfg(test)]
mod tests {
	use super::{append, append_handle};

	#[test]
	fn appending_from_zero_is_plain_crc() {
		assert_eq!(append(0, b"hello world"), crc32fast::hash(b"hello world"));
	}

	#[test]
	fn appending_is_split_invariant() {
		let whole = append(0, b"hello world");
		let split = append(append(0, b"hello "), b"world");
		assert_eq!(whole, split);
	}

	#[test]
	fn handles_fold_big_endian() {
		assert_eq!(append_handle(0, 0x0102_0304), crc32fast::hash(&[1, 2, 3, 4]));
		assert_eq!(append_handle(0, -1), crc32fast::hash(&[0xff; 4]));
	}
}
