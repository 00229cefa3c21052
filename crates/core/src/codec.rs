//! Container serialization and parsing.
//!
//! An `EncodedData` is stored as a small byte-aligned header followed by a
//! packed bitstream holding the tree shape and then the message.
//!
//! # File Format
//!
//! ```text
//! +----------------------+
//! | Magic (4 bytes)      |  0xC5106BA7, host-native byte order
//! +----------------------+
//! | leaf_count - 1 (1)   |  so 2..=256 leaves fit in one byte
//! +----------------------+
//! | leaves (L bytes)     |  raw symbols, traversal order
//! +----------------------+
//! | trailing_bits (1)    |  meaningful bits in the last byte, 1..=8
//! +----------------------+
//! | bitstream            |  2L-1 tree bits, then message bits,
//! | (variable)           |  LSB-first, zero padded
//! +----------------------+
//! ```
//!
//! # Length Inference
//!
//! Neither the tree-shape nor the message bit count is stored. The tree
//! always has `2L - 1` nodes, and the message length falls out of the
//! remaining byte count and the trailing-bit byte. Reading therefore needs a
//! seekable source; use [`decode_from_slice`] for in-memory data.

use crate::bit::Bit;
use crate::bitio::{BitReader, BitWriter};
use crate::container::{tree_bits_for, EncodedData};
use crate::error::{Error, FormatError, Result};
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom, Write};
use tracing::{debug, trace};

/// Magic number identifying a huffpack file.
pub const MAGIC: u32 = 0xC5106BA7;

/// Bytes before the leaf table: magic + biased leaf count.
const PREFIX_SIZE: usize = 5;

/// Byte-aligned part of a serialized container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Leaf symbols in traversal order
    pub leaves: Vec<u8>,

    /// Meaningful bits in the final bitstream byte (1-8)
    pub trailing_bits: u8,
}

impl Header {
    /// Number of distinct leaf symbols.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Total bits in a bitstream region of `remaining_bytes` bytes.
    ///
    /// Returns `None` when there are no bytes at all.
    pub fn bits_in(&self, remaining_bytes: u64) -> Option<u64> {
        remaining_bytes
            .checked_sub(1)
            .map(|full| full * 8 + u64::from(self.trailing_bits))
    }
}

/// Count of meaningful bits in the final byte for a bitstream of `total_bits`.
///
/// A whole number of bytes is recorded as 8, never 0.
pub fn trailing_bit_count(total_bits: usize) -> u8 {
    match (total_bits % 8) as u8 {
        0 => 8,
        n => n,
    }
}

/// Exact number of bytes `write_data` emits for this container.
pub fn encoded_len(data: &EncodedData) -> usize {
    PREFIX_SIZE + data.leaf_count() + 1 + data.total_bits().div_ceil(8)
}

/// Serialize a container to a byte sink.
///
/// The container is validated first; on failure nothing is written. Bytes
/// are written a few at a time, so wrap unbuffered sinks in a `BufWriter`.
///
/// # Errors
/// - `Error::Container` if the container breaks its invariants
/// - `Error::Io` if the sink fails
pub fn write_data<W: Write>(data: &EncodedData, out: &mut W) -> Result<()> {
    data.validate()?;

    let leaf_count = data.leaf_count();
    let total_bits = data.total_bits();
    let trailing_bits = trailing_bit_count(total_bits);

    out.write_all(&MAGIC.to_ne_bytes())?;
    // validate() bounds leaf_count to 2..=256
    out.write_all(&[(leaf_count - 1) as u8])?;
    out.write_all(&data.tree_leaves)?;
    out.write_all(&[trailing_bits])?;

    let mut writer = BitWriter::new(&mut *out);
    writer.put_all(data.tree_shape.iter().copied())?;
    writer.put_all(data.message_bits.iter().copied())?;
    writer.finish()?;

    debug!(
        leaf_count,
        tree_bits = data.tree_shape.len(),
        message_bits = data.message_bits.len(),
        trailing_bits,
        "wrote container"
    );
    Ok(())
}

/// Parse the byte-aligned header: magic, leaf table and trailing-bit count.
///
/// Leaves the source positioned at the start of the bitstream.
///
/// # Errors
/// - `FormatError::NotThisFormat` if the magic is missing or wrong
/// - `FormatError::TruncatedHeader` if a one-byte field is missing
/// - `FormatError::InvalidLeafCount` if the leaf count decodes below two
/// - `FormatError::TruncatedLeafTable` if the leaf table is cut short
/// - `FormatError::InvalidTrailingBitCount` if the trailing count is not 1..=8
pub fn read_header<R: Read>(input: &mut R) -> Result<Header> {
    let mut magic = [0u8; 4];
    input.read_exact(&mut magic).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => FormatError::NotThisFormat.into(),
        _ => Error::Io(e),
    })?;
    if u32::from_ne_bytes(magic) != MAGIC {
        return Err(FormatError::NotThisFormat.into());
    }

    let leaf_count = usize::from(read_byte(input, "leaf count")?) + 1;
    if leaf_count < 2 {
        return Err(FormatError::InvalidLeafCount(leaf_count).into());
    }

    let mut leaves = Vec::with_capacity(leaf_count);
    input
        .by_ref()
        .take(leaf_count as u64)
        .read_to_end(&mut leaves)?;
    if leaves.len() < leaf_count {
        return Err(FormatError::TruncatedLeafTable {
            expected: leaf_count,
            actual: leaves.len(),
        }
        .into());
    }

    let trailing_bits = read_byte(input, "trailing bit count")?;
    if !(1..=8).contains(&trailing_bits) {
        return Err(FormatError::InvalidTrailingBitCount(trailing_bits).into());
    }

    Ok(Header {
        leaves,
        trailing_bits,
    })
}

/// Parse a container from a seekable byte source.
///
/// The bitstream is assumed to run to the end of the source.
///
/// # Errors
/// - Everything [`read_header`] reports
/// - `FormatError::TruncatedBitstream` if fewer bits remain than the tree needs
/// - `FormatError::NonZeroPadding` if the unused bits of the final byte are set
/// - `BitIoError::UnexpectedEof` if the source runs dry while reading bits
/// - `Error::Io` for seek or read failures
pub fn read_data<R: Read + Seek>(input: &mut R) -> Result<EncodedData> {
    let header = read_header(input)?;
    let leaf_count = header.leaf_count();

    let position = input.stream_position()?;
    let end = input.seek(SeekFrom::End(0))?;
    input.seek(SeekFrom::Start(position))?;
    let remaining_bytes = end.saturating_sub(position);

    let tree_bits = tree_bits_for(leaf_count);
    let available = header.bits_in(remaining_bytes).unwrap_or(0);
    if available < tree_bits as u64 {
        return Err(FormatError::TruncatedBitstream {
            required: tree_bits as u64,
            available,
        }
        .into());
    }
    let message_len = usize::try_from(available - tree_bits as u64).map_err(|_| {
        Error::Io(std::io::Error::new(
            ErrorKind::InvalidData,
            "message too large for this platform",
        ))
    })?;

    trace!(
        remaining_bytes,
        trailing_bits = header.trailing_bits,
        available,
        "sized bitstream"
    );

    let mut reader = BitReader::new(&mut *input);
    let tree_shape = read_bits(&mut reader, tree_bits)?;
    let message_bits = read_bits(&mut reader, message_len)?;

    let padding = reader.unread_bits();
    if padding != 0 {
        return Err(FormatError::NonZeroPadding {
            trailing_bits: header.trailing_bits,
            padding,
        }
        .into());
    }

    let data = EncodedData::new(tree_shape, header.leaves, message_bits);
    data.validate()?;

    debug!(
        leaf_count,
        tree_bits,
        message_bits = message_len,
        "read container"
    );
    Ok(data)
}

/// Serialize a container into a fresh byte vector.
pub fn encode_to_vec(data: &EncodedData) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(encoded_len(data));
    write_data(data, &mut out)?;
    Ok(out)
}

/// Parse a container from an in-memory buffer.
pub fn decode_from_slice(bytes: &[u8]) -> Result<EncodedData> {
    read_data(&mut Cursor::new(bytes))
}

fn read_byte<R: Read>(input: &mut R, field: &'static str) -> Result<u8> {
    let mut byte = [0u8; 1];
    input.read_exact(&mut byte).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => FormatError::TruncatedHeader { field }.into(),
        _ => Error::Io(e),
    })?;
    Ok(byte[0])
}

fn read_bits<R: Read>(reader: &mut BitReader<R>, count: usize) -> Result<Vec<Bit>> {
    let mut bits = Vec::with_capacity(count);
    for _ in 0..count {
        bits.push(reader.get()?);
    }
    Ok(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BitIoError, ContainerError};

    fn bits(values: &[i32]) -> Vec<Bit> {
        values.iter().map(|&v| Bit::new(v).unwrap()).collect()
    }

    fn example() -> EncodedData {
        EncodedData::new(bits(&[1, 0, 0]), b"AB".to_vec(), bits(&[1, 0, 1, 1, 0]))
    }

    fn header_bytes(biased_count: u8, leaves: &[u8], trailing: u8) -> Vec<u8> {
        let mut bytes = MAGIC.to_ne_bytes().to_vec();
        bytes.push(biased_count);
        bytes.extend_from_slice(leaves);
        bytes.push(trailing);
        bytes
    }

    #[test]
    fn test_example_layout() {
        let bytes = encode_to_vec(&example()).unwrap();

        let mut expected = header_bytes(1, b"AB", 8);
        // 1,0,0 then 1,0,1,1,0 packed LSB-first
        expected.push(0b0110_1001);

        assert_eq!(bytes, expected);
        assert_eq!(bytes.len(), 9);
        assert_eq!(encoded_len(&example()), 9);
        assert_eq!(decode_from_slice(&bytes).unwrap(), example());
    }

    #[test]
    fn test_trailing_bit_count() {
        assert_eq!(trailing_bit_count(0), 8);
        assert_eq!(trailing_bit_count(3), 3);
        assert_eq!(trailing_bit_count(8), 8);
        assert_eq!(trailing_bit_count(9), 1);
        assert_eq!(trailing_bit_count(16), 8);
    }

    #[test]
    fn test_write_leaves_container_intact() {
        let data = example();
        let first = encode_to_vec(&data).unwrap();
        let second = encode_to_vec(&data).unwrap();

        assert_eq!(first, second);
        assert_eq!(data, example());
    }

    #[test]
    fn test_invalid_container_writes_nothing() {
        let mut out = Vec::new();
        let single = EncodedData::new(bits(&[0]), b"A".to_vec(), bits(&[1, 1]));
        let result = write_data(&single, &mut out);
        assert!(matches!(
            result,
            Err(Error::Container(ContainerError::TooFewLeaves { count: 1 }))
        ));
        assert!(out.is_empty());

        let mut bad_shape = example();
        bad_shape.tree_shape.pop();
        let result = write_data(&bad_shape, &mut out);
        assert!(matches!(
            result,
            Err(Error::Container(ContainerError::TreeShapeMismatch { .. }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = encode_to_vec(&example()).unwrap();
        bytes[..4].copy_from_slice(&[0, 0, 0, 0]);

        let result = decode_from_slice(&bytes);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::NotThisFormat))
        ));
    }

    #[test]
    fn test_short_magic() {
        let result = decode_from_slice(&MAGIC.to_ne_bytes()[..3]);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::NotThisFormat))
        ));
        assert!(matches!(
            decode_from_slice(&[]),
            Err(Error::Format(FormatError::NotThisFormat))
        ));
    }

    #[test]
    fn test_missing_leaf_count() {
        let result = decode_from_slice(&MAGIC.to_ne_bytes());
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedHeader {
                field: "leaf count"
            }))
        ));
    }

    #[test]
    fn test_zero_leaf_count_byte_rejected() {
        let bytes = header_bytes(0, b"A", 1);
        assert!(matches!(
            decode_from_slice(&bytes),
            Err(Error::Format(FormatError::InvalidLeafCount(1)))
        ));
    }

    #[test]
    fn test_truncated_leaf_table() {
        let mut bytes = MAGIC.to_ne_bytes().to_vec();
        bytes.push(3);
        bytes.extend_from_slice(b"AB");

        let result = decode_from_slice(&bytes);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedLeafTable {
                expected: 4,
                actual: 2
            }))
        ));
    }

    #[test]
    fn test_missing_trailing_count() {
        let mut bytes = MAGIC.to_ne_bytes().to_vec();
        bytes.push(1);
        bytes.extend_from_slice(b"AB");

        assert!(matches!(
            decode_from_slice(&bytes),
            Err(Error::Format(FormatError::TruncatedHeader {
                field: "trailing bit count"
            }))
        ));
    }

    #[test]
    fn test_invalid_trailing_count() {
        for trailing in [0u8, 9, 255] {
            let mut bytes = header_bytes(1, b"AB", trailing);
            bytes.push(0xFF);
            assert!(matches!(
                decode_from_slice(&bytes),
                Err(Error::Format(FormatError::InvalidTrailingBitCount(t))) if t == trailing
            ));
        }
    }

    #[test]
    fn test_missing_bitstream() {
        let bytes = header_bytes(1, b"AB", 8);
        let result = decode_from_slice(&bytes);
        assert!(matches!(
            result,
            Err(Error::Format(FormatError::TruncatedBitstream {
                required: 3,
                available: 0
            }))
        ));
        assert!(result.unwrap_err().is_truncation());
    }

    #[test]
    fn test_bitstream_shorter_than_tree() {
        // Two meaningful bits cannot hold a three-node tree
        let mut bytes = header_bytes(1, b"AB", 2);
        bytes.push(0b01);
        assert!(matches!(
            decode_from_slice(&bytes),
            Err(Error::Format(FormatError::TruncatedBitstream {
                required: 3,
                available: 2
            }))
        ));
    }

    #[test]
    fn test_dirty_padding_rejected() {
        // 3 tree bits + 2 message bits, top three bits of the last byte set
        let data = EncodedData::new(bits(&[1, 0, 0]), b"AB".to_vec(), bits(&[1, 1]));
        let mut bytes = encode_to_vec(&data).unwrap();
        *bytes.last_mut().unwrap() |= 0b1110_0000;

        let err = decode_from_slice(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::NonZeroPadding {
                trailing_bits: 5,
                padding: 0b111
            })
        ));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_empty_message() {
        let data = EncodedData::new(bits(&[1, 0, 0]), b"xy".to_vec(), Vec::new());
        let bytes = encode_to_vec(&data).unwrap();
        assert_eq!(*bytes.last().unwrap(), 0b001);
        assert_eq!(bytes[PREFIX_SIZE + 2], 3);
        assert_eq!(decode_from_slice(&bytes).unwrap(), data);
    }

    #[test]
    fn test_read_header_stops_at_bitstream() {
        let bytes = encode_to_vec(&example()).unwrap();
        let mut cursor = Cursor::new(bytes.as_slice());
        let header = read_header(&mut cursor).unwrap();

        assert_eq!(header.leaves, b"AB".to_vec());
        assert_eq!(header.trailing_bits, 8);
        assert_eq!(cursor.position(), 8);
        assert_eq!(header.bits_in(1), Some(8));
        assert_eq!(header.bits_in(0), None);
    }

    #[test]
    fn test_failing_source_is_io_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::Other, "disk on fire"))
            }
        }

        assert!(matches!(read_header(&mut Broken), Err(Error::Io(_))));
    }

    #[test]
    fn test_bit_reader_eof_maps_to_bit_io() {
        let mut reader = BitReader::new(std::io::empty());
        assert!(matches!(
            read_bits(&mut reader, 1),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }
}
