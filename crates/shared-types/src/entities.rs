//! # Ledger Object State
//!
//! Defines the persisted object types the query layer serves and the
//! [`LedgerObject`] sum type used wherever an object must travel untyped
//! (point lookups, change notifications).
//!
//! ## Clusters
//!
//! - **Registry**: `AccountObject`, `AssetObject`, `AccountBalanceObject`
//! - **Order Book**: `LimitOrderObject`, `ShortOrderObject`,
//!   `CallOrderObject`, `ForceSettlementObject`
//! - **Chain Properties**: `GlobalProperties`, `DynamicGlobalProperties`

use serde::{Deserialize, Serialize};

use crate::amount::{AssetAmount, Price};
use crate::block::Hash;
use crate::ids::{
    AccountId, AssetId, BalanceId, CallOrderId, InvalidMarketPair, LimitOrderId, MarketPair,
    ObjectId, ObjectKind, SettlementId, ShortOrderId,
};

// =============================================================================
// CLUSTER A: REGISTRY
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountObject {
    pub id: AccountId,
    /// Globally unique, case-sensitive account name.
    pub name: String,
    /// The account that registered this one.
    pub registrar: AccountId,
}

/// An asset definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetObject {
    pub id: AssetId,
    /// Globally unique ticker symbol.
    pub symbol: String,
    /// Number of decimal digits in one full unit.
    pub precision: u8,
    /// The account allowed to issue this asset.
    pub issuer: AccountId,
    /// Hard cap on total supply, in base units.
    pub max_supply: i64,
}

/// One account's balance in one asset.
///
/// Balance objects exist only for (account, asset) pairs that have been
/// touched; an absent object means a zero balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalanceObject {
    pub id: BalanceId,
    pub owner: AccountId,
    pub asset: AssetId,
    pub balance: i64,
}

impl AccountBalanceObject {
    #[must_use]
    pub const fn amount(&self) -> AssetAmount {
        AssetAmount::new(self.balance, self.asset)
    }
}

// =============================================================================
// CLUSTER B: ORDER BOOK
// =============================================================================

/// An open limit order selling `sell_price.base` for `sell_price.quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderObject {
    pub id: LimitOrderId,
    pub seller: AccountId,
    /// Remaining amount for sale, in units of the sell asset.
    pub for_sale: i64,
    /// Minimum acceptable exchange ratio, sell asset over receive asset.
    pub sell_price: Price,
}

impl LimitOrderObject {
    #[must_use]
    pub fn sell_asset(&self) -> AssetId {
        self.sell_price.base.asset_id
    }

    #[must_use]
    pub fn receive_asset(&self) -> AssetId {
        self.sell_price.quote.asset_id
    }

    /// The market this order trades in.
    pub fn market(&self) -> Result<MarketPair, InvalidMarketPair> {
        MarketPair::new(self.sell_asset(), self.receive_asset())
    }
}

/// An open short order offering to sell borrowed units against collateral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortOrderObject {
    pub id: ShortOrderId,
    pub seller: AccountId,
    /// Amount of the shorted asset offered, in base units.
    pub for_sale: i64,
    /// Offered ratio, shorted asset over collateral asset.
    pub sell_price: Price,
    /// Collateral backing the short, in collateral-asset base units.
    pub collateral: i64,
}

impl ShortOrderObject {
    #[must_use]
    pub fn short_asset(&self) -> AssetId {
        self.sell_price.base.asset_id
    }

    #[must_use]
    pub fn collateral_asset(&self) -> AssetId {
        self.sell_price.quote.asset_id
    }
}

/// A margin position: debt in a market-issued asset backed by collateral.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOrderObject {
    pub id: CallOrderId,
    pub borrower: AccountId,
    /// Collateral held, in collateral-asset base units.
    pub collateral: i64,
    /// Outstanding debt, in debt-asset base units.
    pub debt: i64,
    /// Price at which the position becomes callable, debt over collateral.
    pub call_price: Price,
}

impl CallOrderObject {
    #[must_use]
    pub fn debt_asset(&self) -> AssetId {
        self.call_price.base.asset_id
    }

    #[must_use]
    pub fn collateral_asset(&self) -> AssetId {
        self.call_price.quote.asset_id
    }
}

/// A request to force-settle a market-issued asset at a future date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForceSettlementObject {
    pub id: SettlementId,
    pub owner: AccountId,
    /// Amount being settled.
    pub balance: AssetAmount,
    /// Unix timestamp at which settlement executes.
    pub settlement_date: u64,
}

// =============================================================================
// CLUSTER C: CHAIN PROPERTIES
// =============================================================================

/// Consensus-governed chain parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParameters {
    /// Target seconds between blocks.
    pub block_interval: u8,
    /// Seconds between maintenance intervals.
    pub maintenance_interval: u32,
    /// Maximum serialized transaction size in bytes.
    pub maximum_transaction_size: u32,
    /// Maximum serialized block size in bytes.
    pub maximum_block_size: u32,
}

impl Default for ChainParameters {
    fn default() -> Self {
        Self {
            block_interval: 5,
            maintenance_interval: 86_400,
            maximum_transaction_size: 4_096,
            maximum_block_size: 2_097_152,
        }
    }
}

/// The chain-wide parameter object, singleton `2.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalProperties {
    pub parameters: ChainParameters,
}

impl GlobalProperties {
    pub const ID: ObjectId = ObjectId::new(ObjectKind::GlobalProperties, 0);
}

/// Per-block chain state, singleton `2.1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DynamicGlobalProperties {
    /// Height of the most recently applied block.
    pub head_block_number: u32,
    /// Id of the most recently applied block.
    pub head_block_id: Hash,
    /// Timestamp of the most recently applied block.
    pub time: u64,
}

impl DynamicGlobalProperties {
    pub const ID: ObjectId = ObjectId::new(ObjectKind::DynamicGlobalProperties, 0);
}

// =============================================================================
// THE OBJECT SUM TYPE
// =============================================================================

/// Any persisted ledger object, tagged by kind on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerObject {
    Account(AccountObject),
    Asset(AssetObject),
    LimitOrder(LimitOrderObject),
    ShortOrder(ShortOrderObject),
    CallOrder(CallOrderObject),
    ForceSettlement(ForceSettlementObject),
    GlobalProperties(GlobalProperties),
    DynamicGlobalProperties(DynamicGlobalProperties),
    AccountBalance(AccountBalanceObject),
}

impl LedgerObject {
    /// The id this object is stored under.
    #[must_use]
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Account(a) => a.id.into(),
            Self::Asset(a) => a.id.into(),
            Self::LimitOrder(o) => o.id.into(),
            Self::ShortOrder(o) => o.id.into(),
            Self::CallOrder(o) => o.id.into(),
            Self::ForceSettlement(s) => s.id.into(),
            Self::GlobalProperties(_) => GlobalProperties::ID,
            Self::DynamicGlobalProperties(_) => DynamicGlobalProperties::ID,
            Self::AccountBalance(b) => b.id.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ObjectKind {
        self.id().kind
    }
}
