//! Binary prefix tree over the opcode table.

use std::sync::OnceLock;

use bitstream::BitReader;

use crate::error::{FieldPathError, FieldPathResult};
use crate::op::FieldOp;

#[derive(Debug, Clone, Copy)]
enum Node {
    Branch { zero: Option<u16>, one: Option<u16> },
    Leaf(FieldOp),
}

/// Decoding tree built once from [`FieldOp::prefix`].
#[derive(Debug)]
pub(crate) struct PrefixTree {
    nodes: Vec<Node>,
}

impl PrefixTree {
    pub(crate) fn get() -> &'static Self {
        static TREE: OnceLock<PrefixTree> = OnceLock::new();
        TREE.get_or_init(Self::build)
    }

    fn build() -> Self {
        let mut nodes = vec![Node::Branch {
            zero: None,
            one: None,
        }];
        for op in FieldOp::ALL {
            let mut at = 0usize;
            for bit in op.prefix().bytes() {
                let next = nodes.len() as u16;
                let child = match &mut nodes[at] {
                    Node::Branch { zero, one } => {
                        let slot = if bit == b'1' { one } else { zero };
                        *slot.get_or_insert(next)
                    }
                    Node::Leaf(_) => {
                        debug_assert!(false, "prefix of {op:?} passes through a leaf");
                        break;
                    }
                };
                if child == next {
                    nodes.push(Node::Branch {
                        zero: None,
                        one: None,
                    });
                }
                at = child as usize;
            }
            nodes[at] = Node::Leaf(op);
        }
        Self { nodes }
    }

    /// Walks one bit at a time from the root until a leaf is reached.
    pub(crate) fn decode(&self, reader: &mut BitReader<'_>) -> FieldPathResult<FieldOp> {
        let mut at = 0usize;
        let mut bits_read = 0usize;
        loop {
            match self.nodes[at] {
                Node::Leaf(op) => return Ok(op),
                Node::Branch { zero, one } => {
                    let bit = reader.read_bit()?;
                    bits_read += 1;
                    let next = if bit { one } else { zero };
                    at = next.ok_or(FieldPathError::UnknownPrefix { bits_read })? as usize;
                }
            }
        }
    }

    #[cfg(test)]
    fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf(_)))
            .count()
    }
}
