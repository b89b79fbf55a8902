//! The query API service: query facade plus the notification pipeline.
//!
//! One `QueryApiService` instance serves a node. Queries go straight to
//! the store ports. Commits arrive through [`Self::on_block_applied`],
//! which never blocks: it folds the block into a batch, and either
//! starts the broadcast worker or leaves the batch queued behind the one
//! already running. The worker resolves snapshots, captures the registry
//! and fans every callback out as its own task.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared_types::amount::AssetAmount;
use shared_types::block::{AppliedBlock, BlockHeader, SignedBlock, SignedTransaction};
use shared_types::entities::{
    AccountObject, AssetObject, CallOrderObject, DynamicGlobalProperties, ForceSettlementObject,
    GlobalProperties, LedgerObject, LimitOrderObject, ShortOrderObject,
};
use shared_types::ids::{AccountId, AssetId, MarketPair, ObjectId};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, trace, warn};

use crate::domain::batch::BroadcastBatch;
use crate::domain::config::{LookupLimits, QueryApiConfig};
use crate::domain::error::{QueryError, QueryResult};
use crate::domain::resolver::SnapshotResolver;
use crate::domain::subscriptions::{
    DeliveryResult, MarketCallback, MarketUpdate, ObjectCallback, ObjectUpdate,
    SubscriptionRegistry,
};
use crate::domain::throttle::BroadcastThrottle;
use crate::ports::{BlockStore, ObjectStore};

struct ServiceInner {
    store: Arc<dyn ObjectStore>,
    blocks: Arc<dyn BlockStore>,
    limits: LookupLimits,
    resolver: SnapshotResolver,
    registry: RwLock<SubscriptionRegistry>,
    throttle: BroadcastThrottle,
    /// Handle of the broadcast worker chain, if one was spawned.
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Identifies one subscriber in delivery logs.
#[derive(Debug, Clone, Copy)]
enum SubscriberKey {
    Object(ObjectId),
    Market(MarketPair),
}

impl fmt::Display for SubscriberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(id) => write!(f, "object {id}"),
            Self::Market(market) => write!(f, "market {market}"),
        }
    }
}

/// Run one broadcast pass for `batch`.
async fn deliver(inner: &Arc<ServiceInner>, batch: BroadcastBatch) {
    let plan = inner.registry.read().capture(batch);
    if plan.is_empty() {
        return;
    }

    let mut tasks: JoinSet<(SubscriberKey, DeliveryResult)> = JoinSet::new();

    for (id, callback) in plan.objects {
        // Resolve against current state, not the state at commit time.
        let update = ObjectUpdate {
            id,
            snapshot: inner.resolver.resolve(id),
        };
        tasks.spawn(async move { (SubscriberKey::Object(id), callback(update).await) });
    }

    for (market, callback, operations) in plan.markets {
        let update = MarketUpdate { market, operations };
        tasks.spawn(async move { (SubscriberKey::Market(market), callback(update).await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((key, Ok(()))) => trace!(subscriber = %key, "Update delivered"),
            Ok((key, Err(error))) => {
                warn!(subscriber = %key, %error, "Subscriber delivery failed");
            }
            Err(error) => warn!(%error, "Subscriber callback panicked"),
        }
    }
}

/// Read-side query and subscription service.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct QueryApiService {
    inner: Arc<ServiceInner>,
}

impl QueryApiService {
    #[must_use]
    pub fn new(
        store: Arc<dyn ObjectStore>,
        blocks: Arc<dyn BlockStore>,
        config: QueryApiConfig,
    ) -> Self {
        let resolver = SnapshotResolver::new(Arc::clone(&store));
        Self {
            inner: Arc::new(ServiceInner {
                store,
                blocks,
                limits: config.limits,
                resolver,
                registry: RwLock::new(SubscriptionRegistry::new()),
                throttle: BroadcastThrottle::new(),
                worker: Mutex::new(None),
            }),
        }
    }

    // ========================================================================
    // OBJECTS AND BLOCKS
    // ========================================================================

    /// Fetch objects by id, one result slot per requested id in request
    /// order. Unknown ids yield `None`; duplicates are resolved
    /// independently.
    #[must_use]
    pub fn get_objects(&self, ids: &[ObjectId]) -> Vec<Option<LedgerObject>> {
        ids.iter().map(|id| self.inner.store.get(*id)).collect()
    }

    #[must_use]
    pub fn get_block_header(&self, block_num: u32) -> Option<BlockHeader> {
        self.inner.blocks.header(block_num)
    }

    #[must_use]
    pub fn get_block(&self, block_num: u32) -> Option<SignedBlock> {
        self.inner.blocks.block(block_num)
    }

    /// Hex of the canonical binary serialization of `tx`, suitable for
    /// offline signing tools.
    pub fn get_transaction_hex(&self, tx: &SignedTransaction) -> QueryResult<String> {
        Ok(hex::encode(bincode::serialize(tx)?))
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    #[must_use]
    pub fn get_accounts(&self, ids: &[AccountId]) -> Vec<Option<AccountObject>> {
        ids.iter().map(|id| self.account(*id)).collect()
    }

    #[must_use]
    pub fn lookup_account_names(&self, names: &[String]) -> Vec<Option<AccountObject>> {
        names
            .iter()
            .map(|name| self.inner.store.account_by_name(name))
            .collect()
    }

    /// Account names starting at `lower_bound`, mapped to their ids,
    /// at most `limit` entries.
    pub fn lookup_accounts(
        &self,
        lower_bound: &str,
        limit: u32,
    ) -> QueryResult<BTreeMap<String, AccountId>> {
        check_limit(limit, self.inner.limits.max_account_lookup)?;
        Ok(self
            .inner
            .store
            .accounts_by_name_from(lower_bound, limit)
            .into_iter()
            .collect())
    }

    #[must_use]
    pub fn get_account_count(&self) -> u64 {
        self.inner.store.account_count()
    }

    /// Balances of `account` in the requested assets, in request order,
    /// zero amounts included. An empty `assets` list returns every
    /// non-zero balance the account holds, ascending by asset id.
    #[must_use]
    pub fn get_account_balances(&self, account: AccountId, assets: &[AssetId]) -> Vec<AssetAmount> {
        if assets.is_empty() {
            self.inner.store.balances(account)
        } else {
            assets
                .iter()
                .map(|asset| self.inner.store.balance(account, *asset))
                .collect()
        }
    }

    /// [`Self::get_account_balances`] addressed by account name.
    pub fn get_named_account_balances(
        &self,
        name: &str,
        assets: &[AssetId],
    ) -> QueryResult<Vec<AssetAmount>> {
        let account = self
            .inner
            .store
            .account_by_name(name)
            .ok_or_else(|| QueryError::AccountNotFound(name.to_owned()))?;
        Ok(self.get_account_balances(account.id, assets))
    }

    // ========================================================================
    // ASSETS
    // ========================================================================

    #[must_use]
    pub fn get_assets(&self, ids: &[AssetId]) -> Vec<Option<AssetObject>> {
        ids.iter().map(|id| self.asset(*id)).collect()
    }

    #[must_use]
    pub fn lookup_asset_symbols(&self, symbols: &[String]) -> Vec<Option<AssetObject>> {
        symbols
            .iter()
            .map(|symbol| self.inner.store.asset_by_symbol(symbol))
            .collect()
    }

    /// Assets with symbol at or after `lower_bound_symbol`, ascending,
    /// at most `limit` entries.
    pub fn list_assets(&self, lower_bound_symbol: &str, limit: u32) -> QueryResult<Vec<AssetObject>> {
        check_limit(limit, self.inner.limits.max_asset_lookup)?;
        Ok(self.inner.store.assets_by_symbol_from(lower_bound_symbol, limit))
    }

    // ========================================================================
    // ORDER BOOKS
    // ========================================================================

    /// Both sides of the `a`/`b` book: up to `limit` orders selling `a`
    /// for `b`, then up to `limit` orders selling `b` for `a`, each side
    /// ascending by price with ties broken by id (time priority).
    pub fn get_limit_orders(
        &self,
        a: AssetId,
        b: AssetId,
        limit: u32,
    ) -> QueryResult<Vec<LimitOrderObject>> {
        MarketPair::new(a, b)?;
        let mut orders = self.inner.store.limit_orders(a, b, limit);
        orders.extend(self.inner.store.limit_orders(b, a, limit));
        Ok(orders)
    }

    /// Open short orders in `asset`, ascending by price.
    #[must_use]
    pub fn get_short_orders(&self, asset: AssetId, limit: u32) -> Vec<ShortOrderObject> {
        self.inner.store.short_orders(asset, limit)
    }

    /// Margin positions with debt in `asset`, least collateralized last.
    #[must_use]
    pub fn get_call_orders(&self, asset: AssetId, limit: u32) -> Vec<CallOrderObject> {
        self.inner.store.call_orders(asset, limit)
    }

    /// Pending forced settlements of `asset`, soonest first.
    #[must_use]
    pub fn get_settle_orders(&self, asset: AssetId, limit: u32) -> Vec<ForceSettlementObject> {
        self.inner.store.settle_orders(asset, limit)
    }

    // ========================================================================
    // CHAIN PROPERTIES
    // ========================================================================

    #[must_use]
    pub fn get_global_properties(&self) -> GlobalProperties {
        self.inner.store.global_properties()
    }

    #[must_use]
    pub fn get_dynamic_global_properties(&self) -> DynamicGlobalProperties {
        self.inner.store.dynamic_global_properties()
    }

    // ========================================================================
    // SUBSCRIPTIONS
    // ========================================================================

    /// Subscribe `callback` to state changes of `ids`.
    ///
    /// Each broadcast delivers one [`ObjectUpdate`] per changed id. An id
    /// that already has a callback gets the new one instead.
    pub fn subscribe_to_objects(&self, callback: ObjectCallback, ids: &[ObjectId]) {
        let mut registry = self.inner.registry.write();
        registry.subscribe_objects(ids, callback);
        debug!(
            added = ids.len(),
            total = registry.object_count(),
            "Object subscriptions registered"
        );
    }

    /// Drop the subscriptions for `ids`; unknown ids are ignored.
    /// Returns how many subscriptions existed.
    pub fn unsubscribe_from_objects(&self, ids: &[ObjectId]) -> usize {
        self.inner.registry.write().unsubscribe_objects(ids)
    }

    /// Subscribe `callback` to every operation that touches the `a`/`b`
    /// market.
    pub fn subscribe_to_market(
        &self,
        callback: MarketCallback,
        a: AssetId,
        b: AssetId,
    ) -> QueryResult<()> {
        let market = MarketPair::new(a, b)?;
        self.inner.registry.write().subscribe_market(market, callback);
        debug!(%market, "Market subscription registered");
        Ok(())
    }

    /// Drop the subscription for the `a`/`b` market. Returns whether one
    /// existed.
    pub fn unsubscribe_from_market(&self, a: AssetId, b: AssetId) -> QueryResult<bool> {
        let market = MarketPair::new(a, b)?;
        Ok(self.inner.registry.write().unsubscribe_market(market))
    }

    /// Drop every subscription at once. Safe to call while a broadcast
    /// is in flight; that broadcast still completes with the callbacks
    /// it captured.
    pub fn cancel_all_subscriptions(&self) {
        self.inner.registry.write().clear();
    }

    #[must_use]
    pub fn object_subscription_count(&self) -> usize {
        self.inner.registry.read().object_count()
    }

    #[must_use]
    pub fn market_subscription_count(&self) -> usize {
        self.inner.registry.read().market_count()
    }

    // ========================================================================
    // COMMIT PIPELINE
    // ========================================================================

    /// Feed one applied block into the notification pipeline.
    ///
    /// Returns immediately in every case; delivery happens on the
    /// broadcast worker task.
    pub fn on_block_applied(&self, block: Arc<AppliedBlock>) {
        if block.is_empty() {
            return;
        }
        if self.inner.registry.read().is_empty() {
            return;
        }
        let batch = BroadcastBatch::from_block(&block);
        if batch.is_empty() {
            return;
        }
        debug!(
            block_num = block.block_num,
            changed = batch.changed.len(),
            markets = batch.markets.len(),
            "Block queued for change notification"
        );
        if let Some(first) = self.inner.throttle.admit(batch) {
            self.spawn_broadcast(first);
        }
    }

    fn spawn_broadcast(&self, first: BroadcastBatch) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut batch = first;
            loop {
                deliver(&inner, batch).await;
                match inner.throttle.on_complete() {
                    Some(next) => batch = next,
                    None => break,
                }
            }
        });
        *self.inner.worker.lock() = Some(handle);
    }

    /// Wait until no broadcast is running and none is queued.
    pub async fn wait_idle(&self) {
        loop {
            let handle = self.inner.worker.lock().take();
            if let Some(handle) = handle {
                if let Err(error) = handle.await {
                    warn!(%error, "Broadcast worker task failed");
                }
                continue;
            }
            if self.inner.throttle.is_idle() || self.inner.throttle.is_closed() {
                return;
            }
            // A batch was admitted but its worker handle is not stored
            // yet; let the spawner run.
            tokio::task::yield_now().await;
        }
    }

    /// Stop accepting batches and drop all subscriptions. An in-flight
    /// broadcast still completes.
    pub fn shutdown(&self) {
        info!("Query API shutting down");
        self.inner.throttle.close();
        self.inner.registry.write().clear();
    }

    fn account(&self, id: AccountId) -> Option<AccountObject> {
        match self.inner.store.get(id.into()) {
            Some(LedgerObject::Account(account)) => Some(account),
            _ => None,
        }
    }

    fn asset(&self, id: AssetId) -> Option<AssetObject> {
        match self.inner.store.get(id.into()) {
            Some(LedgerObject::Asset(asset)) => Some(asset),
            _ => None,
        }
    }
}

impl fmt::Debug for QueryApiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryApiService")
            .field("object_subscriptions", &self.object_subscription_count())
            .field("market_subscriptions", &self.market_subscription_count())
            .finish_non_exhaustive()
    }
}

fn check_limit(requested: u32, maximum: u32) -> QueryResult<()> {
    if requested > maximum {
        return Err(QueryError::limit_exceeded(requested, maximum));
    }
    Ok(())
}
