//! Subscriber bookkeeping for object and market change notifications.
//!
//! The registry is a pure map from subscription key to callback. It does
//! not deliver anything itself: the broadcast worker asks it to `capture`
//! a batch, which pairs each changed id and market with the callback
//! registered for it at that instant. Later registry mutations never
//! affect a capture already taken.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use shared_types::ids::{MarketPair, ObjectId};
use shared_types::operations::AppliedOperation;

use crate::domain::batch::BroadcastBatch;
use crate::domain::error::DeliveryError;
use crate::domain::resolver::ObjectSnapshot;

/// Outcome of pushing one update at one subscriber.
pub type DeliveryResult = Result<(), DeliveryError>;

// ============================================================================
// CALLBACKS
// ============================================================================

/// Callback invoked with the fresh state of one subscribed object.
pub type ObjectCallback =
    Arc<dyn Fn(ObjectUpdate) -> BoxFuture<'static, DeliveryResult> + Send + Sync>;

/// Callback invoked with the operations that touched one subscribed market.
pub type MarketCallback =
    Arc<dyn Fn(MarketUpdate) -> BoxFuture<'static, DeliveryResult> + Send + Sync>;

/// Wrap an async closure as an [`ObjectCallback`].
pub fn object_callback<F, Fut>(f: F) -> ObjectCallback
where
    F: Fn(ObjectUpdate) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = DeliveryResult> + Send + 'static,
{
    Arc::new(move |update| Box::pin(f(update)))
}

/// Wrap an async closure as a [`MarketCallback`].
pub fn market_callback<F, Fut>(f: F) -> MarketCallback
where
    F: Fn(MarketUpdate) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = DeliveryResult> + Send + 'static,
{
    Arc::new(move |update| Box::pin(f(update)))
}

// ============================================================================
// UPDATE PAYLOADS
// ============================================================================

/// Notification payload for an object subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectUpdate {
    pub id: ObjectId,
    /// State read at broadcast time. `Absent` means the object no longer
    /// exists, which is how removals are reported.
    pub snapshot: ObjectSnapshot,
}

/// Notification payload for a market subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketUpdate {
    pub market: MarketPair,
    /// Every operation that touched the market, in commit order.
    pub operations: Vec<AppliedOperation>,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Live subscriptions, keyed by what they watch.
///
/// Subscribing to an already-subscribed key replaces the old callback,
/// so a reconnecting client never ends up with two registrations.
#[derive(Default)]
pub struct SubscriptionRegistry {
    objects: HashMap<ObjectId, ObjectCallback>,
    markets: HashMap<MarketPair, MarketCallback>,
}

impl SubscriptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every id in `ids`, replacing any callback
    /// previously registered for those ids.
    pub fn subscribe_objects(&mut self, ids: &[ObjectId], callback: ObjectCallback) {
        for id in ids {
            self.objects.insert(*id, Arc::clone(&callback));
        }
    }

    /// Drop the registrations for `ids`. Ids with no registration are
    /// ignored. Returns how many registrations were actually removed.
    pub fn unsubscribe_objects(&mut self, ids: &[ObjectId]) -> usize {
        ids.iter()
            .filter(|id| self.objects.remove(id).is_some())
            .count()
    }

    /// Register `callback` for `market`, replacing any previous one.
    pub fn subscribe_market(&mut self, market: MarketPair, callback: MarketCallback) {
        self.markets.insert(market, callback);
    }

    /// Drop the registration for `market` if present. Returns whether a
    /// registration existed.
    pub fn unsubscribe_market(&mut self, market: MarketPair) -> bool {
        self.markets.remove(&market).is_some()
    }

    /// Drop every registration at once.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.markets.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.markets.is_empty()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn market_count(&self) -> usize {
        self.markets.len()
    }

    /// Pair the batch's contents with the callbacks registered right now.
    ///
    /// Changed ids nobody watches are dropped here, so the resolver is
    /// only ever consulted for ids with a live subscriber. Market
    /// operation lists move out of the batch into the plan.
    #[must_use]
    pub fn capture(&self, batch: BroadcastBatch) -> DeliveryPlan {
        let objects = batch
            .changed
            .into_iter()
            .filter_map(|id| {
                self.objects
                    .get(&id)
                    .map(|callback| (id, Arc::clone(callback)))
            })
            .collect();

        let markets = batch
            .markets
            .into_iter()
            .filter_map(|(market, operations)| {
                self.markets
                    .get(&market)
                    .map(|callback| (market, Arc::clone(callback), operations))
            })
            .collect();

        DeliveryPlan { objects, markets }
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("objects", &self.objects.len())
            .field("markets", &self.markets.len())
            .finish()
    }
}

/// One broadcast pass worth of work, frozen against a registry snapshot.
pub struct DeliveryPlan {
    pub objects: Vec<(ObjectId, ObjectCallback)>,
    pub markets: Vec<(MarketPair, MarketCallback, Vec<AppliedOperation>)>,
}

impl DeliveryPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.markets.is_empty()
    }
}
