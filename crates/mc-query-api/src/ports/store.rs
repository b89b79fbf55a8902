//! Read-only access to committed chain state.

use shared_types::amount::AssetAmount;
use shared_types::block::{BlockHeader, SignedBlock};
use shared_types::entities::{
    AssetObject, CallOrderObject, DynamicGlobalProperties, ForceSettlementObject, GlobalProperties,
    LedgerObject, LimitOrderObject, ShortOrderObject,
};
use shared_types::ids::{AccountId, AssetId, ObjectId};

/// Read access to the committed object space.
///
/// Implementations serve the state as of the last applied block; the
/// query layer never observes partially applied blocks through this
/// port. All lookups are by-value because callers immediately serialize
/// or filter what they get.
pub trait ObjectStore: Send + Sync {
    /// Fetch one object by id.
    fn get(&self, id: ObjectId) -> Option<LedgerObject>;

    /// Resolve an account by its registered name.
    fn account_by_name(&self, name: &str) -> Option<shared_types::entities::AccountObject>;

    /// Resolve an asset by its ticker symbol.
    fn asset_by_symbol(&self, symbol: &str) -> Option<AssetObject>;

    /// Account names at or after `lower_bound`, ascending, capped at
    /// `limit` entries.
    fn accounts_by_name_from(&self, lower_bound: &str, limit: u32) -> Vec<(String, AccountId)>;

    /// Assets with symbol at or after `lower_bound`, ascending, capped
    /// at `limit` entries.
    fn assets_by_symbol_from(&self, lower_bound: &str, limit: u32) -> Vec<AssetObject>;

    /// Total number of registered accounts.
    fn account_count(&self) -> u64;

    /// Balance of `owner` in `asset`; zero if no balance object exists.
    fn balance(&self, owner: AccountId, asset: AssetId) -> AssetAmount;

    /// Every non-zero balance of `owner`, ascending by asset id.
    fn balances(&self, owner: AccountId) -> Vec<AssetAmount>;

    /// Open limit orders selling `sell` for `receive`, ascending by
    /// price then id, capped at `limit`. One direction only.
    fn limit_orders(&self, sell: AssetId, receive: AssetId, limit: u32) -> Vec<LimitOrderObject>;

    /// Open short orders selling `asset`, ascending by price then id.
    fn short_orders(&self, asset: AssetId, limit: u32) -> Vec<ShortOrderObject>;

    /// Margin positions with debt in `asset`, ascending by call price
    /// then id.
    fn call_orders(&self, asset: AssetId, limit: u32) -> Vec<CallOrderObject>;

    /// Pending forced settlements of `asset`, ascending by settlement
    /// date then id.
    fn settle_orders(&self, asset: AssetId, limit: u32) -> Vec<ForceSettlementObject>;

    /// The chain-wide static properties object.
    fn global_properties(&self) -> GlobalProperties;

    /// The per-block dynamic properties object.
    fn dynamic_global_properties(&self) -> DynamicGlobalProperties;
}

/// Read access to committed blocks.
pub trait BlockStore: Send + Sync {
    fn header(&self, block_num: u32) -> Option<BlockHeader>;

    fn block(&self, block_num: u32) -> Option<SignedBlock>;
}
