//! huffpack-core: bit-exact container format for Huffman-coded data
//!
//! A container holds the shape of a prefix-code tree, its leaf symbols and
//! an encoded message as individual bits. This library writes it to a byte
//! stream and reads it back with every bit intact.
//!
//! # Architecture
//!
//! - `bit`: the single-bit value type
//! - `bitio`: bit writer/reader over `std::io` byte streams
//! - `container`: the `EncodedData` aggregate and its invariants
//! - `codec`: the on-disk format
//! - `error`: structured errors
//!
//! Building the tree and mapping the message to symbols happen elsewhere;
//! this crate only moves bits.
//!
//! # Example
//! ```
//! use huffpack_core::{decode_from_slice, encode_to_vec, Bit, EncodedData};
//!
//! let data = EncodedData::new(
//!     vec![Bit::ONE, Bit::ZERO, Bit::ZERO],
//!     b"AB".to_vec(),
//!     vec![Bit::ONE, Bit::ZERO, Bit::ONE, Bit::ONE, Bit::ZERO],
//! );
//! let bytes = encode_to_vec(&data).unwrap();
//! assert_eq!(bytes.len(), 9);
//! assert_eq!(decode_from_slice(&bytes).unwrap(), data);
//! ```

pub mod bit;
pub mod bitio;
pub mod codec;
pub mod container;
pub mod error;

// Re-export commonly used types
pub use bit::Bit;
pub use codec::{decode_from_slice, encode_to_vec, read_data, write_data};
pub use container::EncodedData;
pub use error::{Error, Result};
