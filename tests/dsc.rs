use rand::{rngs::StdRng, Rng, SeedableRng};

/// Minimal canonical decoder used to validate round trips. It mirrors what
/// the engine (and GARbro) do with a DSC entry: read the header, unmask the
/// depth table, rebuild the canonical codes, then walk the bitstream for
/// `symbol_count` symbols.
mod reference {
    use bitstream_io::{BigEndian, BitReader};
    use dsc::{crypt, dsc_info, format};
    use std::collections::HashMap;
    use std::io::Cursor;

    pub fn decode(data: &[u8]) -> Vec<u8> {
        let header = dsc_info(data).expect("valid header");

        let table_end = format::HEADER_SIZE + format::DEPTH_TABLE_SIZE;
        let mut depths = [0u8; format::DEPTH_TABLE_SIZE];
        depths.copy_from_slice(&data[format::HEADER_SIZE..table_end]);
        crypt::unmask_table(header.key, &mut depths);

        // canonical reconstruction from depths alone
        let mut ordered: Vec<(u8, u16)> = depths
            .iter()
            .enumerate()
            .filter(|(_, &d)| d > 0)
            .map(|(s, &d)| (d, s as u16))
            .collect();
        ordered.sort_unstable();

        let mut by_code: HashMap<(u8, u64), u16> = HashMap::new();
        let mut code = 0u64;
        let mut prev_depth = 0u8;
        for (depth, symbol) in ordered {
            if depth > prev_depth {
                code <<= depth - prev_depth;
                prev_depth = depth;
            }
            by_code.insert((depth, code), symbol);
            code += 1;
        }

        let mut bits = BitReader::endian(Cursor::new(&data[table_end..]), BigEndian);
        let mut out = Vec::with_capacity(header.decompressed_size as usize);

        for _ in 0..header.symbol_count {
            let mut len = 0u8;
            let mut acc = 0u64;
            let symbol = loop {
                acc = (acc << 1) | bits.read_bit().expect("truncated bitstream") as u64;
                len += 1;
                if let Some(&s) = by_code.get(&(len, acc)) {
                    break s;
                }
                assert!(len < 64, "no canonical code matched");
            };

            if symbol < 256 {
                out.push(symbol as u8);
            } else {
                let length = symbol as usize - 256 + 2;
                let offset = bits.read::<u32>(12).expect("truncated offset") as usize + 2;
                assert!(offset <= out.len(), "offset outruns output");
                let start = out.len() - offset;
                // byte at a time: copies may overlap their own output
                for i in 0..length {
                    let byte = out[start + i];
                    out.push(byte);
                }
            }
        }

        out
    }
}

fn round_trip(payload: &[u8], key: u32) -> Vec<u8> {
    let compressed = dsc::encode(payload, key).unwrap();
    let decoded = reference::decode(&compressed);
    assert_eq!(decoded, payload, "round trip failed for key {key:#010x}");
    compressed
}

#[test]
fn golden_container() {
    // fixture produced by the original encoder
    let expected = include_bytes!("abracadabra.dsc");
    let compressed = dsc::encode(&b"abracadabra abracadabra"[..], 0x12345678).unwrap();

    assert_eq!(compressed.as_slice(), expected.as_ref());
}

#[test]
fn empty_payload() {
    // header and depth table only: 32 + 512 bytes
    let compressed = round_trip(b"", 0xDEADBEEF);
    assert_eq!(compressed.len(), 544);

    let header = dsc::dsc_info(compressed.as_slice()).unwrap();
    assert_eq!(header.key, 0xDEADBEEF);
    assert_eq!(header.decompressed_size, 0);
    assert_eq!(header.symbol_count, 0);
}

#[test]
fn single_byte_payload() {
    round_trip(b"x", 0);
    round_trip(b"x", u32::MAX);
}

#[test]
fn run_of_300() {
    // two literals, a capped 257-byte copy, and a 41-byte copy
    let compressed = round_trip(&[b'A'; 300], 0x02207D06);
    let header = dsc::dsc_info(compressed.as_slice()).unwrap();
    assert_eq!(header.symbol_count, 4);
}

#[test]
fn round_trip_text() {
    let text = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
        eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad \
        minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip \
        ex ea commodo consequat. Duis aute irure dolor in reprehenderit in \
        voluptate velit esse cillum dolore eu fugiat nulla pariatur.";

    let compressed = round_trip(text, 0x02207D06);
    // repetitive latin should actually shrink past the fixed 544-byte overhead
    assert!(compressed.len() < text.len() + 544);
}

#[test]
fn round_trip_pseudo_random() {
    let mut rng = StdRng::seed_from_u64(0x5344);

    let mut noise = vec![0u8; 8192];
    rng.fill(noise.as_mut_slice());
    round_trip(&noise, 0x12345678);

    // low-entropy structured data exercises long overlapping matches
    let mut structured = Vec::with_capacity(8192);
    while structured.len() < 8192 {
        let run = rng.gen_range(1..64);
        let byte = rng.gen_range(b'a'..=b'f');
        structured.extend(std::iter::repeat(byte).take(run));
    }
    round_trip(&structured, 0xCAFEBABE);
}

#[test]
fn encoding_is_deterministic() {
    let payload = b"the quick brown fox jumps over the lazy dog, twice over";
    let a = dsc::encode(&payload[..], 0x0BADF00D).unwrap();
    let b = dsc::encode(&payload[..], 0x0BADF00D).unwrap();
    assert_eq!(a, b);
}

#[test]
fn header_reports_encoder_inputs() {
    let payload = b"ABBACABBACD";
    let compressed = dsc::Encoder::for_bytes(payload)
        .key(0x02207D06)
        .encode_to_vec()
        .unwrap();

    let header = dsc::dsc_info(compressed.as_slice()).unwrap();
    assert_eq!(header.key, 0x02207D06);
    assert_eq!(header.decompressed_size, payload.len() as u32);
    assert!(header.symbol_count > 0);
}

#[test]
fn logging_reports_pass_statistics() {
    let mut log = Vec::new();
    dsc::Encoder::for_bytes(b"AAAAAAAAAA")
        .with_logging(&mut log)
        .encode_to_vec()
        .unwrap();

    let log = String::from_utf8(log).unwrap();
    assert!(log.contains("lz77: 3 symbols"), "log was: {log}");
    assert!(log.contains("huffman: 2 codes"), "log was: {log}");
}
