//! Shared fixtures for the integration suite: a populated chain, block
//! builders, and callback recorders.

use std::sync::{Arc, Once};

use mc_query_api::{
    market_callback, object_callback, DeliveryError, MarketCallback, MarketUpdate,
    MemoryBlockStore, MemoryLedgerStore, ObjectCallback, ObjectUpdate, QueryApiConfig,
    QueryApiService,
};
use meridian_telemetry::{init_telemetry, TelemetryConfig};
use shared_types::amount::{AssetAmount, Price};
use shared_types::block::{AppliedBlock, BlockHeader, SignedBlock, SignedTransaction};
use shared_types::ids::{AccountId, AssetId, LimitOrderId, ObjectId};
use shared_types::operations::{AppliedOperation, Operation, OperationResult};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::sync::Semaphore;

static TELEMETRY: Once = Once::new();

/// Install the tracing subscriber once per test process. Failures are
/// ignored; another test may have installed one already.
pub fn init_test_telemetry() {
    TELEMETRY.call_once(|| {
        let config = TelemetryConfig::for_service("mc-tests");
        if let Ok(guard) = init_telemetry(&config) {
            // Keep the subscriber for the rest of the process.
            std::mem::forget(guard);
        }
    });
}

// =============================================================================
// CHAIN STATE
// =============================================================================

/// A small but fully populated chain with a query service over it.
///
/// Three accounts, three assets, a two-sided `MERI`/`GOLD` order book,
/// one short, one margin position, two pending settlements, and two
/// committed blocks.
pub struct ChainFixture {
    pub store: Arc<MemoryLedgerStore>,
    pub blocks: Arc<MemoryBlockStore>,
    pub service: QueryApiService,
    pub alice: AccountId,
    pub bob: AccountId,
    pub carol: AccountId,
    pub core: AssetId,
    pub gold: AssetId,
    pub silver: AssetId,
}

pub fn chain() -> ChainFixture {
    let store = Arc::new(MemoryLedgerStore::new());
    let blocks = Arc::new(MemoryBlockStore::new());

    let alice = store.create_account("alice", AccountId(0));
    let bob = store.create_account("bob", alice);
    let carol = store.create_account("carol", alice);

    let core = store.create_asset("MERI", 5, alice, 1_000_000_000);
    let gold = store.create_asset("GOLD", 4, alice, 10_000_000);
    let silver = store.create_asset("SILVER", 4, alice, 50_000_000);

    store.adjust_balance(alice, core, 100_000);
    store.adjust_balance(alice, gold, 250);
    store.adjust_balance(bob, core, 40_000);

    // MERI/GOLD book: two asks (ratios 2.0 and 2.25 MERI per GOLD) and
    // one bid on the other side.
    store.insert_limit_order(
        alice,
        100,
        Price::new(AssetAmount::new(100, core), AssetAmount::new(50, gold)),
    );
    store.insert_limit_order(
        alice,
        90,
        Price::new(AssetAmount::new(90, core), AssetAmount::new(40, gold)),
    );
    store.insert_limit_order(
        bob,
        30,
        Price::new(AssetAmount::new(30, gold), AssetAmount::new(60, core)),
    );

    store.insert_short_order(
        bob,
        20,
        Price::new(AssetAmount::new(20, gold), AssetAmount::new(100, core)),
        100,
    );
    store.insert_call_order(
        bob,
        500,
        100,
        Price::new(AssetAmount::new(100, gold), AssetAmount::new(500, core)),
    );
    store.insert_settlement(carol, AssetAmount::new(5, gold), 1_700_100_000);
    store.insert_settlement(alice, AssetAmount::new(9, gold), 1_700_050_000);

    blocks.push_block(signed_block(1, Vec::new()));
    blocks.push_block(signed_block(
        2,
        vec![transfer_tx(alice, bob, AssetAmount::new(10, core))],
    ));
    store.advance_head(2, block_id(2), 1_700_000_010);

    let service = QueryApiService::new(
        Arc::clone(&store) as Arc<dyn mc_query_api::ObjectStore>,
        Arc::clone(&blocks) as Arc<dyn mc_query_api::BlockStore>,
        QueryApiConfig::default(),
    );

    ChainFixture {
        store,
        blocks,
        service,
        alice,
        bob,
        carol,
        core,
        gold,
        silver,
    }
}

// =============================================================================
// BLOCK BUILDERS
// =============================================================================

/// Deterministic per-height block id.
pub fn block_id(block_num: u32) -> [u8; 32] {
    let mut id = [0u8; 32];
    id[..4].copy_from_slice(&block_num.to_le_bytes());
    id
}

pub fn applied_block(
    block_num: u32,
    changed: &[ObjectId],
    operations: Vec<AppliedOperation>,
) -> Arc<AppliedBlock> {
    Arc::new(AppliedBlock {
        block_num,
        block_id: block_id(block_num),
        timestamp: 1_700_000_000 + u64::from(block_num) * 5,
        changed_objects: changed.iter().copied().collect(),
        operations,
    })
}

pub fn signed_block(number: u32, transactions: Vec<SignedTransaction>) -> SignedBlock {
    SignedBlock {
        header: BlockHeader {
            number,
            previous: block_id(number.wrapping_sub(1)),
            timestamp: 1_700_000_000 + u64::from(number) * 5,
            witness: AccountId(1),
            transaction_merkle_root: [0; 32],
        },
        witness_signature: [0u8; 64],
        transactions,
    }
}

pub fn transfer_tx(from: AccountId, to: AccountId, amount: AssetAmount) -> SignedTransaction {
    SignedTransaction {
        ref_block_num: 0,
        ref_block_prefix: 0,
        expiration: 1_700_000_600,
        operations: vec![Operation::Transfer { from, to, amount }],
        signatures: vec![[3u8; 64]],
    }
}

/// A limit-order placement whose result is the created order id.
pub fn sell_op(
    seller: AccountId,
    amount_to_sell: AssetAmount,
    min_to_receive: AssetAmount,
    order: u64,
) -> AppliedOperation {
    AppliedOperation::new(
        Operation::LimitOrderCreate {
            seller,
            amount_to_sell,
            min_to_receive,
        },
        OperationResult::ObjectCreated(ObjectId::from(LimitOrderId(order))),
    )
}

// =============================================================================
// CALLBACK RECORDERS
// =============================================================================

/// An object callback that forwards every update into a channel.
pub fn recording_object_callback() -> (ObjectCallback, UnboundedReceiver<ObjectUpdate>) {
    let (tx, rx) = unbounded_channel();
    let callback = object_callback(move |update: ObjectUpdate| {
        let tx = tx.clone();
        async move {
            tx.send(update).map_err(|_| DeliveryError::disconnected())?;
            Ok(())
        }
    });
    (callback, rx)
}

/// A market callback that forwards every update into a channel.
pub fn recording_market_callback() -> (MarketCallback, UnboundedReceiver<MarketUpdate>) {
    let (tx, rx) = unbounded_channel();
    let callback = market_callback(move |update: MarketUpdate| {
        let tx = tx.clone();
        async move {
            tx.send(update).map_err(|_| DeliveryError::disconnected())?;
            Ok(())
        }
    });
    (callback, rx)
}

/// Records every update, then holds the delivery open until the gate
/// hands out a permit. Lets tests keep a broadcast in flight while more
/// blocks commit behind it.
pub fn gated_recording_object_callback(
    gate: Arc<Semaphore>,
) -> (ObjectCallback, UnboundedReceiver<ObjectUpdate>) {
    let (tx, rx) = unbounded_channel();
    let callback = object_callback(move |update: ObjectUpdate| {
        let tx = tx.clone();
        let gate = Arc::clone(&gate);
        async move {
            tx.send(update).map_err(|_| DeliveryError::disconnected())?;
            let permit = gate
                .acquire()
                .await
                .map_err(|_| DeliveryError::disconnected())?;
            permit.forget();
            Ok(())
        }
    });
    (callback, rx)
}
