use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crc32fast::Hasher;

use crate::asset::checksum;
use crate::asset::{Result, WalkError};

/// Byte order used for integer reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order.
	#[default]
	Little,
	/// Big-endian byte order.
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Chunk size used when streaming a range into the checksum.
const CRC_CHUNK_BYTES: usize = 64 * 1024;
/// Read buffer for file-backed sources.
const READ_BUFFER_BYTES: usize = 4 * 1024 * 1024;

/// Random-access reader over a serialized file or resource.
///
/// All offsets are absolute. Implementations provide bounded positional
/// reads; integer, string and checksum reads are derived from them.
pub trait ByteSource {
	/// Total number of readable bytes.
	fn len(&self) -> u64;

	/// Fill `buf` with the bytes starting at `offset`.
	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

	/// Byte order for integer reads.
	fn endianness(&self) -> Endianness {
		Endianness::Little
	}

	/// Whether the source holds no bytes.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Fail with `UnexpectedEof` unless `need` bytes are readable at `offset`.
	fn check_range(&self, offset: u64, need: usize) -> Result<()> {
		let len = self.len();
		match offset.checked_add(need as u64) {
			Some(end) if end <= len => Ok(()),
			_ => Err(WalkError::UnexpectedEof { at: offset, need, len }),
		}
	}

	/// Read a 32-bit signed integer.
	fn read_i32(&self, offset: u64) -> Result<i32> {
		let mut buf = [0_u8; 4];
		self.read_exact_at(offset, &mut buf)?;
		Ok(match self.endianness() {
			Endianness::Little => i32::from_le_bytes(buf),
			Endianness::Big => i32::from_be_bytes(buf),
		})
	}

	/// Read a 64-bit signed integer.
	fn read_i64(&self, offset: u64) -> Result<i64> {
		let mut buf = [0_u8; 8];
		self.read_exact_at(offset, &mut buf)?;
		Ok(match self.endianness() {
			Endianness::Little => i64::from_le_bytes(buf),
			Endianness::Big => i64::from_be_bytes(buf),
		})
	}

	/// Read `len` bytes as lossy UTF-8 text.
	fn read_string(&self, offset: u64, len: usize) -> Result<String> {
		self.check_range(offset, len)?;
		let mut buf = vec![0_u8; len];
		self.read_exact_at(offset, &mut buf)?;
		Ok(String::from_utf8_lossy(&buf).into_owned())
	}

	/// Continue a CRC32 accumulator over `len` bytes at `offset`, reading in chunks.
	fn crc32_update(&self, offset: u64, len: usize, prior: u32) -> Result<u32> {
		self.check_range(offset, len)?;
		let mut hasher = Hasher::new_with_initial(prior);
		let mut buf = vec![0_u8; len.min(CRC_CHUNK_BYTES)];
		let mut done = 0;
		while done < len {
			let take = (len - done).min(buf.len());
			self.read_exact_at(offset + done as u64, &mut buf[..take])?;
			hasher.update(&buf[..take]);
			done += take;
		}
		Ok(hasher.finalize())
	}
}

/// Fully buffered byte source.
#[derive(Debug, Clone)]
pub struct MemSource {
	bytes: Vec<u8>,
	endianness: Endianness,
}

impl MemSource {
	/// Wrap little-endian bytes.
	pub fn new(bytes: Vec<u8>) -> Self {
		Self {
			bytes,
			endianness: Endianness::Little,
		}
	}

	/// Wrap bytes with an explicit integer byte order.
	pub fn with_endianness(bytes: Vec<u8>, endianness: Endianness) -> Self {
		Self { bytes, endianness }
	}

	/// Read a whole file as stored on disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		Ok(Self::new(fs::read(path)?))
	}

	/// Return the backing bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Borrow exactly `len` bytes starting at `offset`.
	pub fn slice(&self, offset: u64, len: usize) -> Result<&[u8]> {
		self.check_range(offset, len)?;
		let start = usize::try_from(offset).map_err(|_| WalkError::UnexpectedEof {
			at: offset,
			need: len,
			len: self.len(),
		})?;
		Ok(&self.bytes[start..start + len])
	}
}

impl ByteSource for MemSource {
	fn len(&self) -> u64 {
		self.bytes.len() as u64
	}

	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		buf.copy_from_slice(self.slice(offset, buf.len())?);
		Ok(())
	}

	fn endianness(&self) -> Endianness {
		self.endianness
	}

	fn crc32_update(&self, offset: u64, len: usize, prior: u32) -> Result<u32> {
		Ok(checksum::append(prior, self.slice(offset, len)?))
	}
}

/// File-backed byte source reading only the requested ranges.
///
/// Holds one open handle; reads seek, so the source is not shared across threads.
#[derive(Debug)]
pub struct FileSource {
	reader: RefCell<BufReader<File>>,
	len: u64,
	endianness: Endianness,
}

impl FileSource {
	/// Open `path` for positional reads.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let file = File::open(path)?;
		let len = file.metadata()?.len();
		Ok(Self {
			reader: RefCell::new(BufReader::with_capacity(READ_BUFFER_BYTES, file)),
			len,
			endianness: Endianness::Little,
		})
	}

	/// Use an explicit integer byte order.
	pub fn with_endianness(mut self, endianness: Endianness) -> Self {
		self.endianness = endianness;
		self
	}
}

impl ByteSource for FileSource {
	fn len(&self) -> u64 {
		self.len
	}

	fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		self.check_range(offset, buf.len())?;
		let mut reader = self.reader.borrow_mut();
		reader.seek(SeekFrom::Start(offset))?;
		reader.read_exact(buf)?;
		Ok(())
	}

	fn endianness(&self) -> Endianness {
		self.endianness
	}

	fn crc32_update(&self, offset: u64, len: usize, prior: u32) -> Result<u32> {
		self.check_range(offset, len)?;
		let mut reader = self.reader.borrow_mut();
		reader.seek(SeekFrom::Start(offset))?;

		let mut hasher = Hasher::new_with_initial(prior);
		let mut buf = vec![0_u8; len.min(CRC_CHUNK_BYTES)];
		let mut done = 0;
		while done < len {
			let take = (len - done).min(buf.len());
			reader.read_exact(&mut buf[..take])?;
			hasher.update(&buf[..take]);
			done += take;
		}
		Ok(hasher.finalize())
	}
}
