//! Information and structures for DSC files.
//!
//! A DSC file is three structures back to back:
//! 1. Header
//! 2. Obfuscated depth table
//! 3. Packed bitstream
//!
//! ## Header
//! There is a 32 byte header at the beginning of the file. All integer fields
//! are little-endian `u32`. The key data can be extracted into a [`DscHeader`]
//! by using [`dsc_info()`].
//!
//! | Byte Num | Description |
//! | :------: | ----------- |
//! | 0..16    | ASCII tag `"DSC FORMAT 1.00"`, null-padded to 16 bytes |
//! | 16..20   | obfuscation key |
//! | 20..24   | size of the decompressed data |
//! | 24..28   | number of coded symbols in the bitstream |
//! | 28..32   | reserved, zero |
//!
//! ## Depth table
//! 512 bytes, one Huffman code length per symbol of the alphabet. Symbols
//! 0–255 are literal bytes; symbol `256 + (L - 2)` is a backreference of
//! length `L` (3 to 257 bytes). A zero depth marks an unused symbol. Each
//! entry is masked by adding one keystream byte mod 256, in table order; see
//! [`crate::crypt`].
//!
//! ## Bitstream
//! Canonical Huffman codes packed MSB-first with no alignment between
//! symbols. Every backreference code is followed by a fixed 12-bit field
//! holding `offset - 2` (offsets 2 to 4097, "copy from this many bytes before
//! the current output position"). The final partial byte is zero-padded in
//! its low bits. There is no end-of-stream marker; decoders stop after
//! reading the symbol count carried in the header.

use crate::errors::DscError;
use bitstream_io::{BitWriter, BE};
use std::convert::TryInto;
use std::io::{Read, Write};

/// ASCII format tag at the start of every DSC file.
pub const SIGNATURE: &[u8; 16] = b"DSC FORMAT 1.00\0";

/// Total size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 32;

/// One depth byte per symbol of the 512-entry alphabet.
pub const DEPTH_TABLE_SIZE: usize = 512;

/// The information stored at the start of a DSC file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DscHeader {
    /// key seeding the depth-table keystream
    pub key: u32,
    /// size of the decompressed data
    pub decompressed_size: u32,
    /// number of coded symbols in the bitstream
    pub symbol_count: u32,
}

impl DscHeader {
    /// Parse a DSC header from a byte array
    fn from_array(arr: &[u8; HEADER_SIZE]) -> Result<Self, DscError> {
        if &arr[0..16] != SIGNATURE {
            let tag = String::from_utf8_lossy(&arr[0..16]).into_owned();
            return Err(DscError::InvalidHeader(tag));
        }

        let key = u32::from_le_bytes(arr[16..20].try_into().unwrap());
        let decompressed_size = u32::from_le_bytes(arr[20..24].try_into().unwrap());
        let symbol_count = u32::from_le_bytes(arr[24..28].try_into().unwrap());

        Ok(Self {
            key,
            decompressed_size,
            symbol_count,
        })
    }

    /// Convenience function to read the header from the start of `rdr`
    pub(crate) fn from_reader<R: Read>(rdr: &mut R) -> Result<Self, DscError> {
        let mut header = [0u8; HEADER_SIZE];
        rdr.read_exact(&mut header)?;

        Self::from_array(&header)
    }

    /// Write out `self` to the `BitWriter` to match the DSC layout
    pub(crate) fn write<W: Write>(&self, wtr: &mut BitWriter<W, BE>) -> Result<(), DscError> {
        wtr.write_bytes(SIGNATURE)?; // 0..16
        wtr.write_bytes(&self.key.to_le_bytes())?; // 16..20
        wtr.write_bytes(&self.decompressed_size.to_le_bytes())?; // 20..24
        wtr.write_bytes(&self.symbol_count.to_le_bytes())?; // 24..28
        wtr.write_bytes(&[0u8; 4])?; // 28..32 reserved

        Ok(())
    }
}

/// Extract the [`DscHeader`] from existing DSC data
///
/// This reads only the fixed header, so it works on a truncated file or a
/// stream; nothing is decompressed. The recovered `key` can be fed back into
/// [`Encoder::key`](crate::Encoder::key) verbatim.
pub fn dsc_info<R: Read>(mut rdr: R) -> Result<DscHeader, DscError> {
    DscHeader::from_reader(&mut rdr)
}
