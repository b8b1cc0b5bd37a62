//! Wire format: an escaped textual rendering of the code tree, a single
//! `0x00` boundary byte, then the packed payload bits.
//!
//! Inside the tree, `(`, `)` and `\` are escaped with a preceding `\`; the
//! terminator leaf is the two-byte sequence `\e`. Everything else appears
//! literally, so the header is self-describing without any length field.

use crate::error::{HuffmanError, Result};
use crate::hufftree::{HuffNode, HuffmanTree};

/// Separates the serialized tree from the packed payload.
pub const BOUNDARY: u8 = 0x00;

const ESCAPE: u8 = b'\\';
const OPEN: u8 = b'(';
const CLOSE: u8 = b')';
const EOF_MARK: u8 = b'e';

/// Appends the serialized form of `node` to `out`.
pub fn serialize_tree(node: &HuffNode, out: &mut Vec<u8>) {
    match node {
        HuffNode::Branch { left, right, .. } => {
            out.push(OPEN);
            serialize_tree(left, out);
            serialize_tree(right, out);
            out.push(CLOSE);
        }
        HuffNode::Leaf { byte, .. } => {
            if matches!(*byte, OPEN | CLOSE | ESCAPE) {
                out.push(ESCAPE);
            }
            out.push(*byte);
        }
        HuffNode::Eof => {
            out.push(ESCAPE);
            out.push(EOF_MARK);
        }
    }
}

/// Splits raw decode input into the serialized tree and the payload,
/// checking bracket balance and the boundary byte.
///
/// The scan carries `(depth, pending_escape)` explicitly; a byte preceded
/// by an odd number of consecutive backslashes is escaped and never counts
/// toward nesting. The bare `\e` header of an empty stream is accepted;
/// any other input that does not open with `(` is malformed.
pub fn split_header(input: &[u8]) -> Result<(&[u8], &[u8])> {
    match input.first() {
        Some(&OPEN) => match matching_close(input) {
            Some(close) => {
                let (tree, rest) = input.split_at(close + 1);
                match rest.first() {
                    Some(&BOUNDARY) => Ok((tree, &rest[1..])),
                    _ => Err(HuffmanError::MalformedTree(close + 1)),
                }
            }
            None => Err(HuffmanError::MalformedTree(input.len())),
        },
        Some(&ESCAPE) if input.get(1) == Some(&EOF_MARK) => match input.get(2) {
            Some(&BOUNDARY) => Ok((&input[..2], &input[3..])),
            _ => Err(HuffmanError::MalformedTree(2)),
        },
        _ => Err(HuffmanError::MalformedTree(0)),
    }
}

/// Rebuilds the code tree from its serialized form.
pub fn parse_tree(tree: &[u8]) -> Result<HuffmanTree> {
    let root = parse_node(tree, 0)?;
    if matches!(root, HuffNode::Leaf { .. }) {
        // a lone literal leaf would decode forever without consuming bits
        return Err(HuffmanError::MalformedTree(0));
    }
    Ok(HuffmanTree { root })
}

/// Index of the `)` matching `s[0]`, which must be `(`.
fn matching_close(s: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut pending_escape = false;
    for (index, &byte) in s.iter().enumerate() {
        if pending_escape {
            pending_escape = false;
            continue;
        }
        match byte {
            ESCAPE => pending_escape = true,
            OPEN => depth += 1,
            CLOSE => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_node(s: &[u8], offset: usize) -> Result<HuffNode> {
    if s.is_empty() {
        return Err(HuffmanError::MalformedTree(offset));
    }

    // outer brackets spanning the whole slice are redundant enclosure
    if s[0] == OPEN {
        match matching_close(s) {
            Some(close) if close == s.len() - 1 => {
                return parse_node(&s[1..close], offset + 1);
            }
            Some(_) => {}
            None => return Err(HuffmanError::MalformedTree(offset)),
        }
    }

    let split = left_len(s, offset)?;
    if split == s.len() {
        return parse_terminal(s, offset);
    }

    let left = parse_node(&s[..split], offset)?;
    let right = parse_node(&s[split..], offset + split)?;
    Ok(HuffNode::branch(left, right))
}

/// Length of the leftmost node's serialization within `s` (non-empty).
fn left_len(s: &[u8], offset: usize) -> Result<usize> {
    match s[0] {
        ESCAPE => {
            if s.len() >= 2 {
                Ok(2)
            } else {
                Err(HuffmanError::MalformedTree(offset + 1))
            }
        }
        OPEN => match matching_close(s) {
            Some(close) => Ok(close + 1),
            None => Err(HuffmanError::MalformedTree(offset)),
        },
        CLOSE => Err(HuffmanError::MalformedTree(offset)),
        _ => Ok(1),
    }
}

/// Decodes a residual one-byte (or escaped two-byte) terminal.
fn parse_terminal(s: &[u8], offset: usize) -> Result<HuffNode> {
    match s {
        [ESCAPE, EOF_MARK] => Ok(HuffNode::Eof),
        [ESCAPE, byte] => Ok(HuffNode::leaf(*byte, 1)),
        [byte] => Ok(HuffNode::leaf(*byte, 1)),
        _ => Err(HuffmanError::MalformedTree(offset)),
    }
}
