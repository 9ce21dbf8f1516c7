//! Per-candidate node storage (§5: "nodes live in a block allocator per
//! candidate - a growing list of fixed-size, aligned blocks. Nodes are
//! constructed in place and never individually freed; arena is released with
//! the candidate.").
//!
//! Grounded on the original `BlockAllocator<T>` (doubling-size blocks,
//! `allocate()` returns a freshly constructed slot, no per-node free). The
//! Rust realization below keeps the doubling-block growth pattern but
//! addresses nodes by a stable [`NodeId`] index rather than a raw pointer,
//! since the arena is owned by a single [`Candidate`](crate::candidate::Candidate)
//! and never shares storage across block reallocation.

use crate::node::Node;

const INITIAL_BLOCK_CAPACITY: usize = 8;

/// Stable handle into a [`NodeArena`]. Never invalidated by further allocation;
/// the arena only grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Growing list of doubling-size blocks of [`Node`]s.
#[derive(Clone)]
pub struct NodeArena {
    blocks: Vec<Vec<Node>>,
    block_starts: Vec<usize>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            blocks: vec![Vec::with_capacity(INITIAL_BLOCK_CAPACITY)],
            block_starts: vec![0],
        }
    }

    /// Construct `node` in place and return its stable id. Never freed
    /// individually; the whole arena is dropped with its owning candidate.
    pub fn allocate(&mut self, node: Node) -> NodeId {
        let last_block_full = {
            let last = self.blocks.last().unwrap();
            last.len() == last.capacity()
        };
        if last_block_full {
            let new_capacity = self.blocks.last().unwrap().capacity() * 2;
            let start = self.block_starts.last().unwrap() + self.blocks.last().unwrap().capacity();
            self.blocks.push(Vec::with_capacity(new_capacity));
            self.block_starts.push(start);
        }
        let block = self.blocks.last_mut().unwrap();
        let local_index = block.len();
        block.push(node);
        NodeId::new(self.block_starts.last().unwrap() + local_index)
    }

    pub fn get(&self, id: NodeId) -> &Node {
        let (block, local) = self.locate(id.index());
        &self.blocks[block][local]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        let (block, local) = self.locate(id.index());
        &mut self.blocks[block][local]
    }

    pub fn len(&self) -> usize {
        self.block_starts.last().copied().unwrap_or(0) + self.blocks.last().map_or(0, Vec::len)
    }

    fn locate(&self, global_index: usize) -> (usize, usize) {
        // block_starts is sorted ascending; find the last start <= global_index.
        let block = self
            .block_starts
            .partition_point(|&start| start <= global_index)
            - 1;
        (block, global_index - self.block_starts[block])
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
