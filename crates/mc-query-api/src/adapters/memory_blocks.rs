//! In-memory implementation of [`BlockStore`].

use std::collections::BTreeMap;

use parking_lot::RwLock;
use shared_types::block::{BlockHeader, SignedBlock};

use crate::ports::BlockStore;

/// Committed blocks kept in memory, keyed by height.
#[derive(Default)]
pub struct MemoryBlockStore {
    blocks: RwLock<BTreeMap<u32, SignedBlock>>,
}

impl MemoryBlockStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a committed block under its header's height.
    pub fn push_block(&self, block: SignedBlock) {
        self.blocks.write().insert(block.header.number, block);
    }

    /// Height of the highest stored block, if any.
    #[must_use]
    pub fn head_number(&self) -> Option<u32> {
        self.blocks.read().keys().next_back().copied()
    }
}

impl BlockStore for MemoryBlockStore {
    fn header(&self, block_num: u32) -> Option<BlockHeader> {
        self.blocks
            .read()
            .get(&block_num)
            .map(|block| block.header.clone())
    }

    fn block(&self, block_num: u32) -> Option<SignedBlock> {
        self.blocks.read().get(&block_num).cloned()
    }
}
