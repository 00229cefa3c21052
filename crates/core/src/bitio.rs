//! Bit-level I/O adapters over byte streams.
//!
//! `BitWriter` packs successive bits into bytes for any `std::io::Write`, and
//! `BitReader` unpacks bytes from any `std::io::Read` back into bits. Both use
//! LSB-first order: the first bit of each group of eight lands in bit 0 of
//! the byte.
//!
//! # Padding Rules
//! - BitWriter: the final partial byte is flushed with its unused high bits zero
//! - BitReader: cannot tell padding from data (caller must track exact bit count)
//!
//! # Example
//! ```
//! use huffpack_core::bit::Bit;
//! use huffpack_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new(Vec::new());
//! for bit in [Bit::ONE, Bit::ZERO, Bit::ONE] {
//!     writer.put(bit).unwrap();
//! }
//! let bytes = writer.finish().unwrap();
//! assert_eq!(bytes, vec![0b0000_0101]);
//!
//! let mut reader = BitReader::new(bytes.as_slice());
//! assert_eq!(reader.get().unwrap(), Bit::ONE);
//! assert_eq!(reader.get().unwrap(), Bit::ZERO);
//! assert_eq!(reader.get().unwrap(), Bit::ONE);
//! ```

use crate::bit::Bit;
use crate::error::{BitIoError, Error, Result};
use std::io::{self, ErrorKind, Read, Write};
use tracing::warn;

/// Writes bits LSB-first into a byte sink.
///
/// Each completed byte is written to the sink as soon as its eighth bit
/// arrives. Call [`BitWriter::finish`] to flush a partial final byte and
/// observe errors; dropping the writer flushes it too, but errors are lost.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - bits of `bit_buffer` at or above `bit_count` are zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Byte sink (taken by `finish`)
    inner: Option<W>,
    /// Accumulator for the current partial byte
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl<W: Write> BitWriter<W> {
    /// Create a writer over the given sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner: Some(inner),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append one bit, writing a byte to the sink once eight have accumulated.
    pub fn put(&mut self, bit: Bit) -> io::Result<()> {
        if bit.is_set() {
            self.bit_buffer |= 1 << self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.flush_partial()?;
        }
        Ok(())
    }

    /// Append every bit from an iterator, in order.
    pub fn put_all<I>(&mut self, bits: I) -> io::Result<()>
    where
        I: IntoIterator<Item = Bit>,
    {
        for bit in bits {
            self.put(bit)?;
        }
        Ok(())
    }

    /// Flush any partial byte and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        if self.bit_count > 0 {
            self.flush_partial()?;
        }
        self.inner
            .take()
            .ok_or_else(|| io::Error::new(ErrorKind::Other, "bit writer sink already taken"))
    }

    fn flush_partial(&mut self) -> io::Result<()> {
        let byte = self.bit_buffer;
        self.bit_buffer = 0;
        self.bit_count = 0;
        match self.inner.as_mut() {
            Some(inner) => inner.write_all(&[byte]),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        if self.inner.is_some() && self.bit_count > 0 {
            let pending = self.bit_count;
            if let Err(e) = self.flush_partial() {
                warn!(pending, error = %e, "failed to flush partial byte on drop");
            }
        }
    }
}

/// Reads bits LSB-first from a byte source.
///
/// Bytes are pulled one at a time, only when every bit of the current byte
/// has been handed out. The reader has no idea how many bits are meaningful;
/// the caller must stop at the right count.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Byte source
    inner: R,
    /// Current byte being unpacked
    bit_buffer: u8,
    /// Index of the next bit in bit_buffer (8 = exhausted)
    bit_index: u8,
}

impl<R: Read> BitReader<R> {
    /// Create a reader over the given source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bit_buffer: 0,
            bit_index: 8,
        }
    }

    /// Read the next bit.
    ///
    /// # Errors
    /// - `BitIoError::UnexpectedEof` if a new byte is needed and the source is empty
    /// - `Error::Io` for any other source failure
    pub fn get(&mut self) -> Result<Bit> {
        if self.bit_index == 8 {
            self.read_more()?;
        }

        let bit = Bit::from(self.bit_buffer & (1 << self.bit_index) != 0);
        self.bit_index += 1;
        Ok(bit)
    }

    /// The bits of the current byte that have not been handed out yet,
    /// shifted down to bit 0. Zero once the byte is used up.
    pub fn unread_bits(&self) -> u8 {
        if self.bit_index >= 8 {
            0
        } else {
            self.bit_buffer >> self.bit_index
        }
    }

    fn read_more(&mut self) -> Result<()> {
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::BitIo(BitIoError::UnexpectedEof),
            _ => Error::Io(e),
        })?;

        self.bit_buffer = byte[0];
        self.bit_index = 0;
        Ok(())
    }
}
