//! # Meridian-Chain Query Pipeline Benchmarks
//!
//! Performance validation for the commit-to-notification hot path:
//!
//! | Stage | Claim | Target |
//! |-------|-------|--------|
//! | Market change detection | Linear in block operations | < 1ms per block |
//! | Batch coalescing | Cheap merge under bursts | < 1ms per merge chain |
//! | Subscription capture | Linear in changed objects | < 1ms per broadcast |

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use mc_query_api::domain::{partition_by_market, BroadcastBatch, SubscriptionRegistry};
use mc_query_api::{market_callback, object_callback};
use shared_types::amount::AssetAmount;
use shared_types::block::AppliedBlock;
use shared_types::ids::{AccountId, AssetId, LimitOrderId, MarketPair, ObjectId};
use shared_types::operations::{AppliedOperation, Operation, OperationResult};

// ============================================================================
// Workload builders
// ============================================================================

/// A block's worth of order placements spread across `markets` quote assets
/// (asset 0 is the core asset on the other side of every pair).
fn order_flow(operations: usize, markets: u64) -> Vec<AppliedOperation> {
    let mut rng = rand::thread_rng();
    (0..operations)
        .map(|i| {
            let quote = AssetId(rng.gen_range(1..=markets));
            AppliedOperation::new(
                Operation::LimitOrderCreate {
                    seller: AccountId(rng.gen_range(0..64)),
                    amount_to_sell: AssetAmount::new(100, AssetId(0)),
                    min_to_receive: AssetAmount::new(50, quote),
                },
                OperationResult::ObjectCreated(ObjectId::from(LimitOrderId(i as u64))),
            )
        })
        .collect()
}

fn applied_block(block_num: u32, changed: usize, operations: Vec<AppliedOperation>) -> AppliedBlock {
    let changed_objects: BTreeSet<ObjectId> = (0..changed)
        .map(|i| ObjectId::from(AccountId(block_num as u64 * 1_000 + i as u64)))
        .collect();
    AppliedBlock {
        block_num,
        block_id: [0u8; 32],
        timestamp: 1_700_000_000 + u64::from(block_num) * 5,
        changed_objects,
        operations,
    }
}

// ============================================================================
// Market change detection
// ============================================================================

fn bench_market_partitioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("market-change-detection");

    for operations in [16usize, 128, 1024] {
        for markets in [1u64, 4, 16] {
            let flow = order_flow(operations, markets);
            group.throughput(Throughput::Elements(operations as u64));
            group.bench_with_input(
                BenchmarkId::new("partition_by_market", format!("{operations}ops/{markets}mkts")),
                &flow,
                |b, flow| b.iter(|| black_box(partition_by_market(flow))),
            );
        }
    }

    group.finish();
}

// ============================================================================
// Broadcast coalescing
// ============================================================================

fn bench_batch_merging(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast-coalescing");

    for blocks in [2u32, 8, 32] {
        let batches: Vec<BroadcastBatch> = (1..=blocks)
            .map(|n| BroadcastBatch::from_block(&applied_block(n, 32, order_flow(16, 4))))
            .collect();

        group.throughput(Throughput::Elements(u64::from(blocks)));
        group.bench_with_input(
            BenchmarkId::new("merge_chain", blocks),
            &batches,
            |b, batches| {
                b.iter(|| {
                    let mut merged = BroadcastBatch::default();
                    for batch in batches {
                        merged.merge(batch.clone());
                    }
                    black_box(merged)
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Subscription capture
// ============================================================================

fn bench_subscription_capture(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscription-registry");

    // 1 000 object subscribers, 16 market subscribers.
    let mut registry = SubscriptionRegistry::new();
    let watched: Vec<ObjectId> = (0..1_000u64).map(|i| ObjectId::from(AccountId(i))).collect();
    registry.subscribe_objects(&watched, object_callback(|_update| async { Ok(()) }));
    for quote in 1..=16u64 {
        let market = MarketPair::new(AssetId(0), AssetId(quote)).unwrap();
        registry.subscribe_market(market, market_callback(|_update| async { Ok(()) }));
    }

    for changed in [10usize, 100, 1_000] {
        // Every other changed id past instance 1000 has no subscriber, so
        // the largest batch exercises the filtering path as well.
        let block = applied_block(1, 0, order_flow(32, 16));
        let mut batch = BroadcastBatch::from_block(&block);
        batch.changed = (0..changed as u64)
            .map(|i| ObjectId::from(AccountId(i * 2)))
            .collect();

        group.throughput(Throughput::Elements(changed as u64));
        group.bench_with_input(
            BenchmarkId::new("capture", changed),
            &batch,
            |b, batch| b.iter(|| black_box(registry.capture(batch.clone()))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_market_partitioning,
    bench_batch_merging,
    bench_subscription_capture,
);

criterion_main!(benches);
