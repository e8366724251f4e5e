//! The LZ77 pass that turns a payload into the symbol stream.

/// Offsets 0 and 1 cannot be expressed by the format.
pub(crate) const MIN_OFFSET: usize = 2;
/// Largest offset encodable in the 12-bit `offset - 2` field.
pub(crate) const MAX_OFFSET: usize = 4097;
/// Shorter matches cost more than the literals they replace.
pub(crate) const MIN_MATCH: usize = 3;
/// Largest length encodable by symbols 256..=511.
pub(crate) const MAX_MATCH: usize = 257;

/// A single entry of the LZ77 symbol stream.
///
/// A backreference means "copy `length` bytes starting `offset` bytes before
/// the current output position". Copies may overlap their own output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LzSymbol {
    Literal(u8),
    Match { length: usize, offset: usize },
}

impl LzSymbol {
    /// Index of this symbol in the 512-entry Huffman alphabet.
    pub(crate) fn code(&self) -> u16 {
        match *self {
            Self::Literal(byte) => byte as u16,
            Self::Match { length, .. } => 256 + (length - MIN_MATCH + 1) as u16,
        }
    }

    /// Number of payload bytes this symbol covers.
    fn consumed(&self) -> usize {
        match *self {
            Self::Literal(..) => 1,
            Self::Match { length, .. } => length,
        }
    }
}

/// Greedy parse of the whole payload into literals and backreferences.
///
/// Deterministic for a fixed payload; makes no attempt at an optimal parse.
pub(crate) fn compress(data: &[u8]) -> Vec<LzSymbol> {
    let mut symbols = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        let symbol = match find_match(data, pos) {
            Some((length, offset)) => LzSymbol::Match { length, offset },
            None => LzSymbol::Literal(data[pos]),
        };
        pos += symbol.consumed();
        symbols.push(symbol);
    }

    symbols
}

/// Search the window behind `pos` for the longest match.
///
/// Offsets are scanned from the far edge of the window inward, and a
/// candidate only replaces the running best when strictly longer, so an
/// equal-length tie keeps the largest offset. Both rules are load-bearing:
/// the engine's decoder expects the exact symbol stream the original
/// encoder produced.
fn find_match(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let window = pos.min(MAX_OFFSET);
    let mut best: Option<(usize, usize)> = None;

    for offset in (MIN_OFFSET..=window).rev() {
        let start = pos - offset;
        // compare against the raw input so matches may run past `pos`
        let length = data[pos..]
            .iter()
            .enumerate()
            .take(MAX_MATCH)
            .take_while(|&(i, &byte)| data[start + i] == byte)
            .count();

        if length > best.map_or(0, |(len, _)| len) {
            best = Some((length, offset));
            if length == MAX_MATCH {
                break;
            }
        }
    }

    best.filter(|&(length, _)| length >= MIN_MATCH)
}
