//! # Protocol Operations
//!
//! The operations a transaction can carry, plus the per-operation results
//! produced when a block is applied. The query layer never executes
//! operations; it only inspects them to decide which markets a block
//! touched, via [`Operation::affected_markets`].

use serde::{Deserialize, Serialize};

use crate::amount::{AssetAmount, Price};
use crate::ids::{
    AccountId, AssetId, LimitOrderId, MarketPair, ObjectId, ShortOrderId,
};

/// A published price feed for a market-issued asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFeed {
    /// Forced-settlement price, debt asset over collateral asset.
    pub settlement_price: Price,
    /// Rate for paying fees in the issued asset, issued over core.
    pub core_exchange_rate: Price,
}

/// A single protocol operation, tagged by name on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: AssetAmount,
    },
    AccountCreate {
        registrar: AccountId,
        name: String,
    },
    AccountUpdate {
        account: AccountId,
    },
    AssetCreate {
        issuer: AccountId,
        symbol: String,
        precision: u8,
        max_supply: i64,
    },
    AssetIssue {
        issuer: AccountId,
        asset_to_issue: AssetAmount,
        issue_to: AccountId,
    },
    /// Request forced settlement of a market-issued asset. Touches the
    /// market only when the settlement later executes.
    AssetSettle {
        account: AccountId,
        amount: AssetAmount,
    },
    LimitOrderCreate {
        seller: AccountId,
        amount_to_sell: AssetAmount,
        min_to_receive: AssetAmount,
    },
    /// Cancellation carries the order's asset pair so the affected market
    /// is known without a store lookup.
    LimitOrderCancel {
        account: AccountId,
        order: LimitOrderId,
        sell_asset: AssetId,
        receive_asset: AssetId,
    },
    ShortOrderCreate {
        seller: AccountId,
        amount_to_sell: AssetAmount,
        collateral: AssetAmount,
    },
    ShortOrderCancel {
        account: AccountId,
        order: ShortOrderId,
        sell_asset: AssetId,
        collateral_asset: AssetId,
    },
    CallOrderUpdate {
        funding_account: AccountId,
        delta_collateral: AssetAmount,
        delta_debt: AssetAmount,
    },
    PublishFeed {
        publisher: AccountId,
        asset: AssetId,
        feed: PriceFeed,
    },
    /// Virtual operation emitted by the matching engine when orders trade.
    FillOrder {
        order_id: ObjectId,
        account: AccountId,
        pays: AssetAmount,
        receives: AssetAmount,
    },
}

impl Operation {
    /// The markets this operation touches: zero for pure account/asset
    /// bookkeeping, one for order-book operations, up to two for a feed
    /// publication (settlement market and core-exchange market).
    ///
    /// An operation whose asset pair degenerates to a single asset
    /// contributes no market; rejecting such operations is the validator's
    /// job, not ours.
    #[must_use]
    pub fn affected_markets(&self) -> Vec<MarketPair> {
        fn pair(a: AssetId, b: AssetId) -> Option<MarketPair> {
            MarketPair::new(a, b).ok()
        }

        match self {
            Self::Transfer { .. }
            | Self::AccountCreate { .. }
            | Self::AccountUpdate { .. }
            | Self::AssetCreate { .. }
            | Self::AssetIssue { .. }
            | Self::AssetSettle { .. } => Vec::new(),
            Self::LimitOrderCreate {
                amount_to_sell,
                min_to_receive,
                ..
            } => pair(amount_to_sell.asset_id, min_to_receive.asset_id)
                .into_iter()
                .collect(),
            Self::LimitOrderCancel {
                sell_asset,
                receive_asset,
                ..
            } => pair(*sell_asset, *receive_asset).into_iter().collect(),
            Self::ShortOrderCreate {
                amount_to_sell,
                collateral,
                ..
            } => pair(amount_to_sell.asset_id, collateral.asset_id)
                .into_iter()
                .collect(),
            Self::ShortOrderCancel {
                sell_asset,
                collateral_asset,
                ..
            } => pair(*sell_asset, *collateral_asset).into_iter().collect(),
            Self::CallOrderUpdate {
                delta_collateral,
                delta_debt,
                ..
            } => pair(delta_debt.asset_id, delta_collateral.asset_id)
                .into_iter()
                .collect(),
            Self::PublishFeed { feed, .. } => {
                let settlement = pair(
                    feed.settlement_price.base.asset_id,
                    feed.settlement_price.quote.asset_id,
                );
                let core = pair(
                    feed.core_exchange_rate.base.asset_id,
                    feed.core_exchange_rate.quote.asset_id,
                );
                let mut markets: Vec<MarketPair> = settlement.into_iter().collect();
                if let Some(core) = core {
                    if !markets.contains(&core) {
                        markets.push(core);
                    }
                }
                markets
            }
            Self::FillOrder { pays, receives, .. } => {
                pair(pays.asset_id, receives.asset_id).into_iter().collect()
            }
        }
    }
}

/// The result recorded for one applied operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationResult {
    /// The operation produced no new object.
    Void,
    /// The operation created the object with this id.
    ObjectCreated(ObjectId),
    /// The operation released this amount back to the account.
    AssetReturned(AssetAmount),
}

/// An operation together with the result of applying it, in intra-block
/// execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOperation {
    pub op: Operation,
    pub result: OperationResult,
}

impl AppliedOperation {
    #[must_use]
    pub fn new(op: Operation, result: OperationResult) -> Self {
        Self { op, result }
    }
}
