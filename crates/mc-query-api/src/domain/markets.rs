//! Partitioning of applied operations into per-market buckets.

use std::collections::BTreeMap;

use shared_types::ids::MarketPair;
use shared_types::operations::AppliedOperation;

/// Split a block's operations into per-market lists.
///
/// Each operation lands in the bucket of every market it touches, which
/// may be zero (pure bookkeeping), one (order placement, fills) or two
/// (feed publication quoting two distinct pairs). Within each bucket the
/// operations keep their block order, so market subscribers replay them
/// in the order the chain applied them.
pub fn partition_by_market(
    operations: &[AppliedOperation],
) -> BTreeMap<MarketPair, Vec<AppliedOperation>> {
    let mut buckets: BTreeMap<MarketPair, Vec<AppliedOperation>> = BTreeMap::new();
    for applied in operations {
        for market in applied.op.affected_markets() {
            buckets.entry(market).or_default().push(applied.clone());
        }
    }
    buckets
}
