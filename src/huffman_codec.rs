use crate::bit_vec::{BitReader, BitVec};
use crate::error::{HuffmanError, Result};
use crate::hufftree::{CodeTable, HuffNode, HuffmanTree};
use crate::wire;

/// One-shot encoder state: the tree built from an input buffer and the
/// code table assigned from it.
pub struct HuffmanCodec {
    tree: HuffmanTree,
    codes: CodeTable,
}

impl HuffmanCodec {
    pub fn new(tree: HuffmanTree) -> Self {
        let codes = tree.assign_codes();
        HuffmanCodec { tree, codes }
    }

    pub fn from_input(input: &[u8]) -> Self {
        Self::new(HuffmanTree::from_bytes(input))
    }

    pub fn tree(&self) -> &HuffmanTree {
        &self.tree
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    /// Serializes the tree header, then packs one code per input byte and
    /// the terminator code, zero-padding the final byte.
    ///
    /// Verbosity is a diagnostic side channel only: 1 logs a summary,
    /// 2 additionally dumps the tree. The produced bytes never change.
    pub fn encode(&self, input: &[u8], verbosity: u8) -> Result<Vec<u8>> {
        if verbosity >= 2 {
            self.tree.log_structure(&self.codes);
        }

        let mut output = Vec::new();
        wire::serialize_tree(&self.tree.root, &mut output);
        output.push(wire::BOUNDARY);
        let header_len = output.len();

        let mut bits = BitVec::new();
        for &byte in input {
            let code = self
                .codes
                .get(byte)
                .ok_or(HuffmanError::MissingCode(byte))?;
            bits.push_bits(code.iter());
        }
        bits.push_bits(self.codes.eof().iter());

        if verbosity >= 1 {
            tracing::info!(
                "encode: {} bytes in, {} distinct symbols, {} header bytes, {} payload bits",
                input.len(),
                self.codes.symbol_count(),
                header_len,
                bits.bit_count()
            );
        }

        output.extend_from_slice(bits.as_bytes());
        Ok(output)
    }
}

/// Compresses `input` into the self-describing wire format.
pub fn encode(input: &[u8], verbosity: u8) -> Result<Vec<u8>> {
    HuffmanCodec::from_input(input).encode(input, verbosity)
}

/// Recovers the original stream from `input`: parses the tree header, then
/// walks the tree bit by bit until the terminator leaf is reached.
pub fn decode(input: &[u8], verbosity: u8) -> Result<Vec<u8>> {
    let (tree_bytes, payload) = wire::split_header(input)?;
    let tree = wire::parse_tree(tree_bytes)?;

    if verbosity >= 2 {
        tree.log_structure(&tree.assign_codes());
    }

    let mut reader = BitReader::new(payload);
    let mut output = Vec::new();

    'stream: loop {
        let mut node = &tree.root;
        loop {
            match node {
                HuffNode::Leaf { byte, .. } => {
                    output.push(*byte);
                    break;
                }
                HuffNode::Eof => break 'stream,
                HuffNode::Branch { left, right, .. } => {
                    let bit = reader
                        .next_bit()
                        .ok_or(HuffmanError::TruncatedPayload(reader.bits_read()))?;
                    node = if bit { right.as_ref() } else { left.as_ref() };
                }
            }
        }
    }

    if verbosity >= 1 {
        tracing::info!(
            "decode: {} header bytes, {} payload bits read, {} bytes out",
            tree_bytes.len() + 1,
            reader.bits_read(),
            output.len()
        );
    }

    Ok(output)
}
