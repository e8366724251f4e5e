//! The keyed keystream that obfuscates the depth table.
//!
//! The engine derives one byte per depth-table entry from a 32-bit state
//! machine seeded with the file key. Masking adds the byte mod 256; the
//! decoder runs the same generator and subtracts. The generator is shared
//! with the engine's name-hash routines, which is why [`advance`] takes the
//! magic constant as a parameter even though DSC always uses [`CRYPT_MAGIC`].

/// Magic constant mixed into the keystream for DSC files (`"DS" << 16`).
pub const CRYPT_MAGIC: u32 = 0x5344_0000;

/// Advance the keystream one step, returning the new state and the output
/// byte. All arithmetic is mod 2^32; this must match the engine bit-for-bit.
pub fn advance(state: u32, magic: u32) -> (u32, u8) {
    let v0 = 20021u32.wrapping_mul(state & 0xFFFF);
    let mut v1 = magic | (state >> 16);
    v1 = v1.wrapping_mul(20021).wrapping_add(state.wrapping_mul(346));
    v1 = v1.wrapping_add(v0 >> 16) & 0xFFFF;
    let next = (v1 << 16).wrapping_add(v0 & 0xFFFF).wrapping_add(1);

    (next, (v1 & 0xFF) as u8)
}

/// Byte-at-a-time keystream seeded with a file key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStream {
    state: u32,
}

impl KeyStream {
    pub fn new(key: u32) -> Self {
        Self { state: key }
    }

    pub fn next_byte(&mut self) -> u8 {
        let (next, byte) = advance(self.state, CRYPT_MAGIC);
        self.state = next;
        byte
    }
}

impl Iterator for KeyStream {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}

/// Obfuscate `table` in place by adding one keystream byte to each entry.
pub fn mask_table(key: u32, table: &mut [u8]) {
    let mut ks = KeyStream::new(key);
    for entry in table {
        *entry = entry.wrapping_add(ks.next_byte());
    }
}

/// Invert [`mask_table`], recovering the original entries.
pub fn unmask_table(key: u32, table: &mut [u8]) {
    let mut ks = KeyStream::new(key);
    for entry in table {
        *entry = entry.wrapping_sub(ks.next_byte());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keystream_golden_values() {
        // first outputs computed directly from the advance() formula
        let from_zero: Vec<u8> = KeyStream::new(0).take(8).collect();
        assert_eq!(
            from_zero,
            [0x00, 0x5a, 0x82, 0xe6, 0x42, 0x88, 0xcd, 0xbb]
        );

        let from_key: Vec<u8> = KeyStream::new(0x02207D06).take(4).collect();
        assert_eq!(from_key, [0xed, 0xe3, 0xa1, 0x8d]);
    }

    #[test]
    fn keystream_is_pure_in_the_key() {
        let a: Vec<u8> = KeyStream::new(0xDEADBEEF).take(512).collect();
        let b: Vec<u8> = KeyStream::new(0xDEADBEEF).take(512).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn unmask_inverts_mask() {
        let original: Vec<u8> = (0..=255).chain((0..=255).rev()).collect();
        let mut table = original.clone();

        mask_table(0x02207D06, &mut table);
        assert_ne!(table, original);

        unmask_table(0x02207D06, &mut table);
        assert_eq!(table, original);
    }
}
