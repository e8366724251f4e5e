use crate::{
    crypt,
    errors::DscError,
    format::DscHeader,
};
use bitstream_io::{BigEndian, BitWriter};
use std::{
    convert::TryInto,
    fs,
    fs::File,
    io::{BufReader, Cursor, Read, Write},
    path::Path,
};

pub(crate) mod huffman;
pub(crate) mod lz;

use self::{
    huffman::{CodeTable, DepthTable},
    lz::LzSymbol,
};

type Frequency = u64;
type LogWtr<'a> = &'a mut dyn Write;

/// Width of the fixed offset field following every backreference code.
const OFFSET_BITS: u32 = 12;

/// Specify the encoding settings, such as the key, logging, input, and output
///
/// To create a new `Encoder`, use [`for_reader()`], [`for_file()`], or
/// [`for_bytes()`]. Set the obfuscation key with [`key()`] — usually one
/// recovered from an existing entry of the target archive via
/// [`dsc_info()`](crate::dsc_info). Finally, encode the input data with
/// [`encode_to_writer()`], [`encode_to_file()`], or [`encode_to_vec()`].
/// ```
/// # use dsc::Encoder;
/// let input = b"ABBACABBCADFEGABA";
/// let compressed = Encoder::for_bytes(input)
///     .key(0x02207D06)
///     .with_logging(&mut ::std::io::stdout())
///     .encode_to_vec();
/// ```
///
/// [`for_reader()`]: Encoder::for_reader
/// [`for_file()`]: Encoder::for_file
/// [`for_bytes()`]: Encoder::for_bytes
/// [`key()`]: Encoder::key
/// [`encode_to_writer()`]: Encoder::encode_to_writer
/// [`encode_to_file()`]: Encoder::encode_to_file
/// [`encode_to_vec()`]: Encoder::encode_to_vec
pub struct Encoder<'a, R> {
    rdr: R,
    key: u32,
    log: Option<LogWtr<'a>>,
}

impl<'a, R: Read> Encoder<'a, R> {
    /// Create a new `Encoder` for the data in `rdr`, with a key of zero.
    #[inline]
    pub fn for_reader(rdr: R) -> Self {
        Self {
            rdr,
            key: 0,
            log: None,
        }
    }

    /// Set the key seeding the depth-table keystream.
    ///
    /// The key is written into the header verbatim; any 32-bit value makes a
    /// decodable file, but archives typically share one key across entries.
    #[inline]
    pub fn key(&mut self, key: u32) -> &mut Self {
        self.key = key;
        self
    }

    /// Write encoding statistics to `log` while the input is being encoded.
    #[inline]
    pub fn with_logging<L: Write>(&mut self, log: &'a mut L) -> &mut Self {
        self.log = Some(log as LogWtr<'a>);
        self
    }

    /// Start the encoding and write the compressed container out to `wtr`
    /// as a single whole-buffer write.
    #[inline]
    pub fn encode_to_writer<W: Write>(&mut self, mut wtr: W) -> Result<(), DscError> {
        let out = do_encode(self)?;
        wtr.write_all(&out).map_err(Into::into)
    }

    /// Start the encoding and write the compressed container to the newly
    /// created file at `p`. The file only appears once encoding has
    /// succeeded; there is no partial-output mode.
    #[inline]
    pub fn encode_to_file<P: AsRef<Path>>(&mut self, p: P) -> Result<(), DscError> {
        let out = do_encode(self)?;
        fs::write(p, out).map_err(Into::into)
    }

    /// Start the encoding and return the compressed container in a `Vec<u8>`.
    #[inline]
    pub fn encode_to_vec(&mut self) -> Result<Vec<u8>, DscError> {
        do_encode(self)
    }
}

impl<'a> Encoder<'a, BufReader<File>> {
    /// Create a new `Encoder` for the file at `p`.
    #[inline]
    pub fn for_file<P: AsRef<Path>>(p: P) -> Result<Self, DscError> {
        let rdr = BufReader::new(File::open(p)?);
        Ok(Self::for_reader(rdr))
    }
}

impl<'a> Encoder<'a, Cursor<&'a [u8]>> {
    /// Create a new `Encoder` for the data in the `bytes` slice.
    #[inline]
    pub fn for_bytes(bytes: &'a [u8]) -> Self {
        let rdr = Cursor::new(bytes);
        Self::for_reader(rdr)
    }
}

/// Compress data into a DSC `Vec<u8>` under `key`
///
/// This is a convenience function to encode a `Read`er without having to
/// import and set up an [`Encoder`].
pub fn encode<R: Read>(rdr: R, key: u32) -> Result<Vec<u8>, DscError> {
    Encoder::for_reader(rdr).key(key).encode_to_vec()
}

fn do_encode<R: Read>(opts: &mut Encoder<'_, R>) -> Result<Vec<u8>, DscError> {
    let Encoder { rdr, key, log } = opts;
    let key = *key;

    let mut payload = Vec::new();
    rdr.read_to_end(&mut payload)?;
    let decompressed_size: u32 = payload
        .len()
        .try_into()
        .map_err(|_| DscError::PayloadTooLarge(payload.len()))?;

    let symbols = lz::compress(&payload);
    let depths = huffman::build_depths(&symbols);
    let codes = huffman::assign_codes(&depths);

    if let Some(wtr) = log.as_mut() {
        writeln!(
            wtr,
            "lz77: {} symbols for {} bytes",
            symbols.len(),
            decompressed_size
        )?;
        let code_count = depths.iter().filter(|&&d| d > 0).count();
        writeln!(wtr, "huffman: {} codes", code_count)?;
    }

    let header = DscHeader {
        key,
        decompressed_size,
        // cannot exceed the payload length, which already fit in a u32
        symbol_count: symbols.len() as u32,
    };

    write_container(header, &depths, &codes, &symbols)
}

/// Assemble header, masked depth table, and packed bitstream into one buffer.
fn write_container(
    header: DscHeader,
    depths: &DepthTable,
    codes: &CodeTable,
    symbols: &[LzSymbol],
) -> Result<Vec<u8>, DscError> {
    let mut buf = Vec::with_capacity(
        crate::format::HEADER_SIZE + crate::format::DEPTH_TABLE_SIZE + symbols.len(),
    );

    {
        let mut out = BitWriter::endian(&mut buf, BigEndian);

        header.write(&mut out)?;

        let mut table = *depths;
        crypt::mask_table(header.key, &mut table);
        out.write_bytes(&table)?;

        for symbol in symbols {
            let idx = symbol.code() as usize;
            let code = codes[idx].ok_or(DscError::MissingCode(idx as u16))?;
            out.write(code.bitlen(), code.code)?;

            if let LzSymbol::Match { offset, .. } = *symbol {
                out.write(OFFSET_BITS, (offset - lz::MIN_OFFSET) as u32)?;
            }
        }

        // left-justify the final partial byte, padding low bits with zeros
        out.byte_align()?;
    }

    Ok(buf)
}
