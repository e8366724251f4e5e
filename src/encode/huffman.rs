//! Huffman depth assignment and canonical code construction.
//!
//! The container only stores one code length ("depth") per symbol; both
//! sides derive the same canonical codes from the depth table. The tree
//! itself is a throwaway used once to measure depths.

use std::{cmp::Reverse, collections::BinaryHeap};

use super::lz::LzSymbol;
use super::Frequency;

/// 256 literal symbols plus 256 length symbols.
pub(crate) const ALPHABET_SIZE: usize = 512;

/// Code length per symbol; 0 marks an unused symbol.
pub(crate) type DepthTable = [u8; ALPHABET_SIZE];

/// Canonical code per symbol, `None` for unused symbols.
pub(crate) type CodeTable = [Option<HuffCode>; ALPHABET_SIZE];

/// A Huffman tree node stored in an index-addressed arena.
///
/// The arena index doubles as the node's creation-order id: leaves are
/// pushed first, merged parents after, so ids increase strictly.
#[derive(Debug)]
enum Node {
    Leaf {
        symbol: u16,
    },
    Branch {
        left: usize,
        right: usize,
    },
}

/// Count the symbol stream and measure Huffman depths for every symbol.
///
/// The priority queue is ordered by `(frequency, creation_order)`; frequency
/// ties merge in creation order. Leaves are created in first-appearance
/// order of the stream, which is what the original encoder does, so equal
/// inputs produce equal depth tables down to the last tie.
pub(crate) fn build_depths(symbols: &[LzSymbol]) -> DepthTable {
    let mut freqs: [Frequency; ALPHABET_SIZE] = [0; ALPHABET_SIZE];
    let mut appearance = Vec::new();
    for symbol in symbols {
        let code = symbol.code() as usize;
        if freqs[code] == 0 {
            appearance.push(code);
        }
        freqs[code] += 1;
    }

    let mut arena: Vec<Node> = Vec::with_capacity(appearance.len() * 2);
    let mut heap = BinaryHeap::with_capacity(appearance.len());
    for &code in &appearance {
        let id = arena.len();
        arena.push(Node::Leaf {
            symbol: code as u16,
        });
        heap.push(Reverse((freqs[code], id)));
    }

    while heap.len() >= 2 {
        let Reverse((freq_l, left)) = heap.pop().unwrap();
        let Reverse((freq_r, right)) = heap.pop().unwrap();

        let id = arena.len();
        arena.push(Node::Branch { left, right });
        heap.push(Reverse((freq_l + freq_r, id)));
    }

    let mut depths = [0u8; ALPHABET_SIZE];
    if let Some(&Reverse((_, root))) = heap.peek() {
        walk_depths(&arena, root, &mut depths);
    }

    depths
}

/// Iterative traversal assigning each leaf its distance from the root.
fn walk_depths(arena: &[Node], root: usize, depths: &mut DepthTable) {
    let mut stack = vec![(root, 0usize)];

    while let Some((idx, depth)) = stack.pop() {
        match arena[idx] {
            Node::Leaf { symbol } => {
                // a lone root leaf still needs a one-bit code; anything past
                // 255 is clamped, matching the engine's (lossy) behavior
                depths[symbol as usize] = depth.clamp(1, 255) as u8;
            }
            Node::Branch { left, right } => {
                stack.push((right, depth + 1));
                stack.push((left, depth + 1));
            }
        }
    }
}

type CodeBacking = u64;

/// A canonical Huffman code, written MSB-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HuffCode {
    pub code: CodeBacking,
    len: u8,
}

impl HuffCode {
    #[inline(always)]
    pub(crate) fn bitlen(&self) -> u32 {
        self.len as u32
    }
}

/// Assign canonical codes from a depth table.
///
/// Symbols sort by `(depth, symbol)`; the running code increments within a
/// depth and shifts left when the depth grows. This is the standard
/// canonical construction, so the codes are recoverable from the depth
/// table alone and prefix-free whenever no depth was clamped.
pub(crate) fn assign_codes(depths: &DepthTable) -> CodeTable {
    let mut ordered: Vec<(u8, usize)> = depths
        .iter()
        .enumerate()
        .filter(|(_, &depth)| depth > 0)
        .map(|(symbol, &depth)| (depth, symbol))
        .collect();
    ordered.sort_unstable();

    let mut codes = [None; ALPHABET_SIZE];
    let mut code: CodeBacking = 0;
    let mut prev_depth = 0u8;

    for (depth, symbol) in ordered {
        if depth > prev_depth {
            code <<= depth - prev_depth;
            prev_depth = depth;
        }
        codes[symbol] = Some(HuffCode { code, len: depth });
        code += 1;
    }

    codes
}
