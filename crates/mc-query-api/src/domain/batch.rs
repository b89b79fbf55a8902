//! Pending broadcast state accumulated from committed blocks.

use std::collections::{BTreeMap, BTreeSet};

use shared_types::block::AppliedBlock;
use shared_types::ids::{MarketPair, ObjectId};
use shared_types::operations::AppliedOperation;

use crate::domain::markets::partition_by_market;

/// Everything one broadcast pass needs to notify subscribers about.
///
/// A batch built from a single block carries that block's changed ids and
/// per-market operations. Batches built while an earlier broadcast is
/// still running are merged: ids form a set union, per-market lists are
/// concatenated in commit order. Merging loses nothing a subscriber
/// could observe, because object snapshots are resolved at send time
/// anyway and market subscribers want every operation exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastBatch {
    /// Every object id some operation in the batch created, modified or
    /// removed.
    pub changed: BTreeSet<ObjectId>,
    /// Operations grouped by the market they touched, in commit order.
    pub markets: BTreeMap<MarketPair, Vec<AppliedOperation>>,
}

impl BroadcastBatch {
    /// Build the batch for a single committed block.
    #[must_use]
    pub fn from_block(block: &AppliedBlock) -> Self {
        Self {
            changed: block.changed_objects.clone(),
            markets: partition_by_market(&block.operations),
        }
    }

    /// Fold a later block's batch into this one.
    ///
    /// `newer` must come from a block committed after every block already
    /// folded in, so its per-market operations append after the existing
    /// ones.
    pub fn merge(&mut self, newer: BroadcastBatch) {
        self.changed.extend(newer.changed);
        for (market, mut ops) in newer.markets {
            self.markets.entry(market).or_default().append(&mut ops);
        }
    }

    /// True when no subscriber could be interested in this batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.markets.is_empty()
    }
}
