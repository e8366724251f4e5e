//! Encoder for the DSC archive-entry format used by the BGI/Ethornell
//! visual-novel engine.
//!
//! A DSC entry is an LZ77 symbol stream coded with canonical Huffman codes,
//! preceded by a code-length ("depth") table that is obfuscated with a keyed
//! keystream. Decoders rebuild the canonical codes from the depth table alone,
//! so the container never stores explicit codes. See [`format`] for the exact
//! byte layout.
//!
//! ```
//! let compressed = dsc::Encoder::for_bytes(b"sam I am I am sam")
//!     .key(0x02207D06)
//!     .encode_to_vec()
//!     .unwrap();
//! let header = dsc::dsc_info(compressed.as_slice()).unwrap();
//! assert_eq!(header.decompressed_size, 17);
//! ```
//!
//! Only compression is implemented; decompression already exists in the
//! engine (and in GARbro) and is the contract this encoder satisfies.

pub mod crypt;
mod encode;
mod errors;
pub mod format;

pub use encode::{encode, Encoder};
pub use errors::DscError;
pub use format::{dsc_info, DscHeader};
