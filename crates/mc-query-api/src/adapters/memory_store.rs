//! In-memory implementation of [`ObjectStore`].
//!
//! Backs the query layer in tests and single-process deployments. The
//! validation pipeline owns the write API; the query layer only ever
//! reads through the port. Object ids order by `(kind, instance)`, so
//! one `BTreeMap` keyed by id gives contiguous per-kind ranges and the
//! secondary indexes stay small.

use std::collections::BTreeMap;
use std::ops::Bound::{Included, Unbounded};

use parking_lot::RwLock;
use shared_types::amount::{AssetAmount, Price};
use shared_types::block::Hash;
use shared_types::entities::{
    AccountBalanceObject, AccountObject, AssetObject, CallOrderObject, ChainParameters,
    DynamicGlobalProperties, ForceSettlementObject, GlobalProperties, LedgerObject,
    LimitOrderObject, ShortOrderObject,
};
use shared_types::ids::{
    AccountId, AssetId, BalanceId, CallOrderId, LimitOrderId, ObjectId, ObjectKind, SettlementId,
    ShortOrderId,
};

use crate::ports::ObjectStore;

#[derive(Default)]
struct Inner {
    objects: BTreeMap<ObjectId, LedgerObject>,
    accounts_by_name: BTreeMap<String, AccountId>,
    assets_by_symbol: BTreeMap<String, AssetId>,
    balance_index: BTreeMap<(AccountId, AssetId), BalanceId>,
    next_instance: BTreeMap<ObjectKind, u64>,
    global: GlobalProperties,
    dynamic: DynamicGlobalProperties,
}

impl Inner {
    fn allocate(&mut self, kind: ObjectKind) -> u64 {
        let next = self.next_instance.entry(kind).or_insert(0);
        let instance = *next;
        *next += 1;
        instance
    }

    /// Every stored object of one kind, ascending by instance.
    fn kind_range(&self, kind: ObjectKind) -> impl Iterator<Item = &LedgerObject> + '_ {
        self.objects
            .range(ObjectId::new(kind, 0)..=ObjectId::new(kind, u64::MAX))
            .map(|(_, object)| object)
    }

    fn account(&self, id: AccountId) -> Option<AccountObject> {
        match self.objects.get(&ObjectId::from(id)) {
            Some(LedgerObject::Account(account)) => Some(account.clone()),
            _ => None,
        }
    }

    fn asset(&self, id: AssetId) -> Option<AssetObject> {
        match self.objects.get(&ObjectId::from(id)) {
            Some(LedgerObject::Asset(asset)) => Some(asset.clone()),
            _ => None,
        }
    }
}

/// Thread-safe in-memory object store.
#[derive(Default)]
pub struct MemoryLedgerStore {
    inner: RwLock<Inner>,
}

impl MemoryLedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Write API, used by the validation pipeline (and tests) to mutate
    // committed state.
    // ------------------------------------------------------------------

    /// Register an account, allocating its id.
    pub fn create_account(&self, name: &str, registrar: AccountId) -> AccountId {
        let mut inner = self.inner.write();
        let id = AccountId(inner.allocate(ObjectKind::Account));
        let account = AccountObject {
            id,
            name: name.to_owned(),
            registrar,
        };
        inner.accounts_by_name.insert(name.to_owned(), id);
        inner.objects.insert(id.into(), LedgerObject::Account(account));
        id
    }

    /// Create an asset definition, allocating its id.
    pub fn create_asset(
        &self,
        symbol: &str,
        precision: u8,
        issuer: AccountId,
        max_supply: i64,
    ) -> AssetId {
        let mut inner = self.inner.write();
        let id = AssetId(inner.allocate(ObjectKind::Asset));
        let asset = AssetObject {
            id,
            symbol: symbol.to_owned(),
            precision,
            issuer,
            max_supply,
        };
        inner.assets_by_symbol.insert(symbol.to_owned(), id);
        inner.objects.insert(id.into(), LedgerObject::Asset(asset));
        id
    }

    /// Add `delta` to the balance of `owner` in `asset`, creating the
    /// balance object on first touch.
    pub fn adjust_balance(&self, owner: AccountId, asset: AssetId, delta: i64) -> BalanceId {
        let mut inner = self.inner.write();
        if let Some(id) = inner.balance_index.get(&(owner, asset)).copied() {
            if let Some(LedgerObject::AccountBalance(balance)) =
                inner.objects.get_mut(&ObjectId::from(id))
            {
                balance.balance = balance.balance.saturating_add(delta);
            }
            return id;
        }
        let id = BalanceId(inner.allocate(ObjectKind::AccountBalance));
        let balance = AccountBalanceObject {
            id,
            owner,
            asset,
            balance: delta,
        };
        inner.balance_index.insert((owner, asset), id);
        inner
            .objects
            .insert(id.into(), LedgerObject::AccountBalance(balance));
        id
    }

    pub fn insert_limit_order(
        &self,
        seller: AccountId,
        for_sale: i64,
        sell_price: Price,
    ) -> LimitOrderId {
        let mut inner = self.inner.write();
        let id = LimitOrderId(inner.allocate(ObjectKind::LimitOrder));
        let order = LimitOrderObject {
            id,
            seller,
            for_sale,
            sell_price,
        };
        inner.objects.insert(id.into(), LedgerObject::LimitOrder(order));
        id
    }

    pub fn insert_short_order(
        &self,
        seller: AccountId,
        for_sale: i64,
        sell_price: Price,
        collateral: i64,
    ) -> ShortOrderId {
        let mut inner = self.inner.write();
        let id = ShortOrderId(inner.allocate(ObjectKind::ShortOrder));
        let order = ShortOrderObject {
            id,
            seller,
            for_sale,
            sell_price,
            collateral,
        };
        inner.objects.insert(id.into(), LedgerObject::ShortOrder(order));
        id
    }

    pub fn insert_call_order(
        &self,
        borrower: AccountId,
        collateral: i64,
        debt: i64,
        call_price: Price,
    ) -> CallOrderId {
        let mut inner = self.inner.write();
        let id = CallOrderId(inner.allocate(ObjectKind::CallOrder));
        let order = CallOrderObject {
            id,
            borrower,
            collateral,
            debt,
            call_price,
        };
        inner.objects.insert(id.into(), LedgerObject::CallOrder(order));
        id
    }

    pub fn insert_settlement(
        &self,
        owner: AccountId,
        balance: AssetAmount,
        settlement_date: u64,
    ) -> SettlementId {
        let mut inner = self.inner.write();
        let id = SettlementId(inner.allocate(ObjectKind::ForceSettlement));
        let settlement = ForceSettlementObject {
            id,
            owner,
            balance,
            settlement_date,
        };
        inner
            .objects
            .insert(id.into(), LedgerObject::ForceSettlement(settlement));
        id
    }

    /// Delete an object and its secondary-index entries. Returns whether
    /// the object existed.
    pub fn remove(&self, id: ObjectId) -> bool {
        let mut inner = self.inner.write();
        let Some(object) = inner.objects.remove(&id) else {
            return false;
        };
        match &object {
            LedgerObject::Account(account) => {
                inner.accounts_by_name.remove(&account.name);
            }
            LedgerObject::Asset(asset) => {
                inner.assets_by_symbol.remove(&asset.symbol);
            }
            LedgerObject::AccountBalance(balance) => {
                inner.balance_index.remove(&(balance.owner, balance.asset));
            }
            _ => {}
        }
        true
    }

    pub fn set_chain_parameters(&self, parameters: ChainParameters) {
        self.inner.write().global = GlobalProperties { parameters };
    }

    /// Record a newly applied block in the dynamic properties.
    pub fn advance_head(&self, block_num: u32, block_id: Hash, timestamp: u64) {
        self.inner.write().dynamic = DynamicGlobalProperties {
            head_block_number: block_num,
            head_block_id: block_id,
            time: timestamp,
        };
    }
}

impl ObjectStore for MemoryLedgerStore {
    fn get(&self, id: ObjectId) -> Option<LedgerObject> {
        let inner = self.inner.read();
        if id == GlobalProperties::ID {
            Some(LedgerObject::GlobalProperties(inner.global.clone()))
        } else if id == DynamicGlobalProperties::ID {
            Some(LedgerObject::DynamicGlobalProperties(inner.dynamic.clone()))
        } else {
            inner.objects.get(&id).cloned()
        }
    }

    fn account_by_name(&self, name: &str) -> Option<AccountObject> {
        let inner = self.inner.read();
        let id = *inner.accounts_by_name.get(name)?;
        inner.account(id)
    }

    fn asset_by_symbol(&self, symbol: &str) -> Option<AssetObject> {
        let inner = self.inner.read();
        let id = *inner.assets_by_symbol.get(symbol)?;
        inner.asset(id)
    }

    fn accounts_by_name_from(&self, lower_bound: &str, limit: u32) -> Vec<(String, AccountId)> {
        let inner = self.inner.read();
        inner
            .accounts_by_name
            .range::<str, _>((Included(lower_bound), Unbounded))
            .take(limit as usize)
            .map(|(name, id)| (name.clone(), *id))
            .collect()
    }

    fn assets_by_symbol_from(&self, lower_bound: &str, limit: u32) -> Vec<AssetObject> {
        let inner = self.inner.read();
        inner
            .assets_by_symbol
            .range::<str, _>((Included(lower_bound), Unbounded))
            .take(limit as usize)
            .filter_map(|(_, id)| inner.asset(*id))
            .collect()
    }

    fn account_count(&self) -> u64 {
        self.inner.read().accounts_by_name.len() as u64
    }

    fn balance(&self, owner: AccountId, asset: AssetId) -> AssetAmount {
        let inner = self.inner.read();
        let amount = inner
            .balance_index
            .get(&(owner, asset))
            .and_then(|id| match inner.objects.get(&ObjectId::from(*id)) {
                Some(LedgerObject::AccountBalance(balance)) => Some(balance.balance),
                _ => None,
            })
            .unwrap_or(0);
        AssetAmount::new(amount, asset)
    }

    fn balances(&self, owner: AccountId) -> Vec<AssetAmount> {
        let inner = self.inner.read();
        inner
            .balance_index
            .range((owner, AssetId(0))..=(owner, AssetId(u64::MAX)))
            .filter_map(|(_, id)| match inner.objects.get(&ObjectId::from(*id)) {
                Some(LedgerObject::AccountBalance(balance)) if balance.balance != 0 => {
                    Some(balance.amount())
                }
                _ => None,
            })
            .collect()
    }

    fn limit_orders(&self, sell: AssetId, receive: AssetId, limit: u32) -> Vec<LimitOrderObject> {
        let inner = self.inner.read();
        let mut orders: Vec<LimitOrderObject> = inner
            .kind_range(ObjectKind::LimitOrder)
            .filter_map(|object| match object {
                LedgerObject::LimitOrder(order)
                    if order.sell_asset() == sell && order.receive_asset() == receive =>
                {
                    Some(order.clone())
                }
                _ => None,
            })
            .collect();
        orders.sort_by(|a, b| a.sell_price.cmp(&b.sell_price).then(a.id.cmp(&b.id)));
        orders.truncate(limit as usize);
        orders
    }

    fn short_orders(&self, asset: AssetId, limit: u32) -> Vec<ShortOrderObject> {
        let inner = self.inner.read();
        let mut orders: Vec<ShortOrderObject> = inner
            .kind_range(ObjectKind::ShortOrder)
            .filter_map(|object| match object {
                LedgerObject::ShortOrder(order) if order.short_asset() == asset => {
                    Some(order.clone())
                }
                _ => None,
            })
            .collect();
        orders.sort_by(|a, b| a.sell_price.cmp(&b.sell_price).then(a.id.cmp(&b.id)));
        orders.truncate(limit as usize);
        orders
    }

    fn call_orders(&self, asset: AssetId, limit: u32) -> Vec<CallOrderObject> {
        let inner = self.inner.read();
        let mut orders: Vec<CallOrderObject> = inner
            .kind_range(ObjectKind::CallOrder)
            .filter_map(|object| match object {
                LedgerObject::CallOrder(order) if order.debt_asset() == asset => {
                    Some(order.clone())
                }
                _ => None,
            })
            .collect();
        orders.sort_by(|a, b| a.call_price.cmp(&b.call_price).then(a.id.cmp(&b.id)));
        orders.truncate(limit as usize);
        orders
    }

    fn settle_orders(&self, asset: AssetId, limit: u32) -> Vec<ForceSettlementObject> {
        let inner = self.inner.read();
        let mut settlements: Vec<ForceSettlementObject> = inner
            .kind_range(ObjectKind::ForceSettlement)
            .filter_map(|object| match object {
                LedgerObject::ForceSettlement(settlement)
                    if settlement.balance.asset_id == asset =>
                {
                    Some(settlement.clone())
                }
                _ => None,
            })
            .collect();
        settlements.sort_by(|a, b| {
            a.settlement_date
                .cmp(&b.settlement_date)
                .then(a.id.cmp(&b.id))
        });
        settlements.truncate(limit as usize);
        settlements
    }

    fn global_properties(&self) -> GlobalProperties {
        self.inner.read().global.clone()
    }

    fn dynamic_global_properties(&self) -> DynamicGlobalProperties {
        self.inner.read().dynamic.clone()
    }
}
