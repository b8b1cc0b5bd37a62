//! # huffpack
//!
//! A Huffman entropy coder with a self-describing header: the code tree is
//! serialized as escaped text, a `0x00` byte marks the header/payload
//! boundary, and the payload packs one prefix-free code per input byte
//! MSB-first, ending with a synthetic terminator code so the zero padding
//! of the final byte is never misread as data.
//!
//! ## Quick Start
//!
//! ```rust
//! let data = b"abracadabra";
//!
//! let packed = huffpack::encode(data, 0)?;
//! let unpacked = huffpack::decode(&packed, 0)?;
//!
//! assert_eq!(unpacked, data);
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```
//!
//! The second argument is a verbosity level (0 silent, 1 summary, 2 per-node
//! tree dump) routed to the `tracing` diagnostic channel; it never affects
//! the produced bytes.

pub mod error;
pub mod huffman_codec;
pub mod hufftree;
pub mod wire;

// Internal modules - not part of public API
mod bit_vec;
mod min_heap;

// Re-export main types for convenience
pub use error::{HuffmanError, Result};
pub use huffman_codec::{decode, encode, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
