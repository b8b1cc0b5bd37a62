use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::min_heap::MinHeap;

/// A node of the code tree.
///
/// `Eof` is a synthetic leaf with frequency zero. It is merged into the tree
/// alongside the real symbols so the decoder can tell the end of the stream
/// from the zero padding of the final payload byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        byte: u8,
        frequency: u64,
    },
    Eof,
    Branch {
        frequency: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn leaf(byte: u8, frequency: u64) -> Self {
        HuffNode::Leaf { byte, frequency }
    }

    /// Merges two nodes; the first argument becomes the `0` side.
    pub fn branch(left: HuffNode, right: HuffNode) -> Self {
        let frequency = left.frequency() + right.frequency();
        HuffNode::Branch {
            frequency,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn frequency(&self) -> u64 {
        match self {
            HuffNode::Leaf { frequency, .. } => *frequency,
            HuffNode::Eof => 0,
            HuffNode::Branch { frequency, .. } => *frequency,
        }
    }

    fn assign(&self, table: &mut CodeTable, path: Code) {
        match self {
            HuffNode::Leaf { byte, .. } => {
                table.codes.insert(*byte, path);
            }
            HuffNode::Eof => table.eof = path,
            HuffNode::Branch { left, right, .. } => {
                let mut low = path.clone();
                low.push(false);
                left.assign(table, low);

                let mut high = path;
                high.push(true);
                right.assign(table, high);
            }
        }
    }

    fn log_node(&self, codes: &CodeTable, bars: usize, edge: Option<bool>) {
        let mut guide = String::new();
        for _ in 0..bars {
            guide.push_str("│   ");
        }
        if let Some(right) = edge {
            guide.push_str(if right { "└─1─" } else { "├─0─" });
        }

        match self {
            HuffNode::Leaf { byte, frequency } => {
                let code = codes.get(*byte).cloned().unwrap_or_default();
                tracing::debug!("{}{} ({}) [weight: {}]", guide, byte, code, frequency);
            }
            HuffNode::Eof => {
                tracing::debug!("{}EOF ({})", guide, codes.eof());
            }
            HuffNode::Branch {
                frequency,
                left,
                right,
            } => {
                tracing::debug!("{}┐ [weight: {}]", guide, frequency);
                let child_bars = if edge.is_some() { bars + 1 } else { bars };
                left.log_node(codes, child_bars, Some(false));
                right.log_node(codes, child_bars, Some(true));
            }
        }
    }
}

/// Heap entry pairing a node with its insertion sequence number.
///
/// Frequency ties are broken by earliest-inserted-first, which pins the tree
/// shape (and therefore the serialized output) to one deterministic form.
#[derive(Debug)]
struct Ranked {
    frequency: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.frequency == other.frequency && self.seq == other.seq
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then(self.seq.cmp(&other.seq))
    }
}

/// Counts occurrences of each distinct byte, ordered by byte value.
pub fn count_frequencies(bytes: &[u8]) -> BTreeMap<u8, u64> {
    bytes.iter().copied().fold(BTreeMap::new(), |mut acc, byte| {
        *acc.entry(byte).or_insert(0) += 1;
        acc
    })
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub root: HuffNode,
}

impl HuffmanTree {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_frequencies(count_frequencies(bytes))
    }

    /// Builds the tree by repeatedly merging the two lowest-frequency nodes.
    /// Leaves are seeded in ascending byte order, then the terminator, then
    /// branches as they are created; that order is the tie-break.
    pub fn from_frequencies(frequencies: BTreeMap<u8, u64>) -> Self {
        let mut heap = MinHeap::new();
        let mut seq = 0u64;

        for (byte, frequency) in frequencies {
            heap.push(Ranked {
                frequency,
                seq,
                node: HuffNode::leaf(byte, frequency),
            });
            seq += 1;
        }
        heap.push(Ranked {
            frequency: 0,
            seq,
            node: HuffNode::Eof,
        });
        seq += 1;

        while let Some((first, second)) = heap.pop_pair() {
            let node = HuffNode::branch(first.node, second.node);
            heap.push(Ranked {
                frequency: node.frequency(),
                seq,
                node,
            });
            seq += 1;
        }

        let root = match heap.pop() {
            Some(entry) => entry.node,
            // unreachable: the terminator is always seeded
            None => HuffNode::Eof,
        };
        HuffmanTree { root }
    }

    /// Walks the tree once, recording each leaf's root-to-leaf bit path.
    pub fn assign_codes(&self) -> CodeTable {
        let mut table = CodeTable::default();
        match &self.root {
            HuffNode::Branch { .. } => self.root.assign(&mut table, Code::default()),
            leaf => {
                // a single-node tree still needs a non-empty code
                let mut code = Code::default();
                code.push(false);
                leaf.assign(&mut table, code);
            }
        }
        table
    }

    /// Dumps the tree one node per line on the diagnostic channel, with the
    /// bit taken on each edge and the full code at each leaf.
    pub fn log_structure(&self, codes: &CodeTable) {
        self.root.log_node(codes, 0, None);
    }
}

/// Bit sequence assigned to one leaf: its path from the root, `0` for left
/// and `1` for right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.bits.iter().copied()
    }

    fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Codes for every real symbol plus the terminator, keyed by byte value.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
    eof: Code,
}

impl CodeTable {
    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    pub fn eof(&self) -> &Code {
        &self.eof
    }

    pub fn symbol_count(&self) -> usize {
        self.codes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(byte, code)| (*byte, code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_frequency_sums(node: &HuffNode) {
        if let HuffNode::Branch {
            frequency,
            left,
            right,
        } = node
        {
            assert_eq!(*frequency, left.frequency() + right.frequency());
            check_frequency_sums(left);
            check_frequency_sums(right);
        }
    }

    fn is_prefix(shorter: &Code, longer: &Code) -> bool {
        shorter.len() <= longer.len()
            && shorter.iter().zip(longer.iter()).all(|(a, b)| a == b)
    }

    #[test]
    fn counts_bytes_in_order() {
        let counts = count_frequencies(b"cabbage");
        let entries: Vec<(u8, u64)> = counts.into_iter().collect();
        assert_eq!(
            entries,
            vec![(b'a', 2), (b'b', 2), (b'c', 1), (b'e', 1), (b'g', 1)]
        );
    }

    #[test]
    fn empty_input_counts_nothing() {
        assert!(count_frequencies(b"").is_empty());
    }

    #[test]
    fn branch_frequencies_sum_to_input_length() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::from_bytes(input);
        check_frequency_sums(&tree.root);
        assert_eq!(tree.root.frequency(), input.len() as u64);
    }

    #[test]
    fn codes_are_prefix_free() {
        let tree = HuffmanTree::from_bytes(b"abracadabra alakazam");
        let table = tree.assign_codes();

        let mut codes: Vec<Code> = table.iter().map(|(_, code)| code.clone()).collect();
        codes.push(table.eof().clone());

        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!is_prefix(a, b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn every_symbol_gets_a_code() {
        let input = b"mississippi";
        let tree = HuffmanTree::from_bytes(input);
        let table = tree.assign_codes();

        assert_eq!(table.symbol_count(), 4); // i m p s
        for &byte in input {
            let code = table.get(byte).expect("symbol missing from table");
            assert!(!code.is_empty());
        }
        assert!(!table.eof().is_empty());
    }

    #[test]
    fn empty_alphabet_collapses_to_terminator() {
        let tree = HuffmanTree::from_bytes(b"");
        assert_eq!(tree.root, HuffNode::Eof);

        // the lone leaf still gets a one-bit code
        let table = tree.assign_codes();
        assert_eq!(table.symbol_count(), 0);
        assert_eq!(table.eof().to_string(), "0");
    }

    #[test]
    fn single_symbol_pairs_with_terminator() {
        let tree = HuffmanTree::from_bytes(b"aaaa");
        // the terminator has the lowest frequency, so it is popped first
        // and takes the 0 side
        match &tree.root {
            HuffNode::Branch { left, right, .. } => {
                assert_eq!(**left, HuffNode::Eof);
                assert_eq!(**right, HuffNode::leaf(b'a', 4));
            }
            other => panic!("expected a branch root, got {:?}", other),
        }

        let table = tree.assign_codes();
        assert_eq!(table.eof().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "1");
    }

    #[test]
    fn equal_frequencies_break_ties_by_insertion_order() {
        // all three symbols occur once; seeding order is byte order, so the
        // first merges are (eof, 'a') and ('b', 'c')
        let tree = HuffmanTree::from_frequencies(count_frequencies(b"cba"));
        let table = tree.assign_codes();

        let rebuilt = HuffmanTree::from_frequencies(count_frequencies(b"abc"));
        let rebuilt_table = rebuilt.assign_codes();

        for byte in [b'a', b'b', b'c'] {
            assert_eq!(table.get(byte), rebuilt_table.get(byte));
        }
        assert_eq!(table.eof(), rebuilt_table.eof());
    }

    #[test]
    fn code_displays_as_bit_string() {
        let tree = HuffmanTree::from_bytes(b"aaaa");
        let table = tree.assign_codes();
        assert_eq!(format!("{}", table.eof()), "0");
        assert_eq!(format!("{}", table.get(b'a').unwrap()), "1");
    }
}
