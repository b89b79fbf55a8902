//! # Amounts and Prices
//!
//! An [`AssetAmount`] is an integer quantity of one asset in its smallest
//! unit. A [`Price`] is the exchange ratio between two assets, kept as the
//! original base/quote pair so no precision is lost to division.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::ids::AssetId;

/// An integer quantity of a single asset, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetAmount {
    pub amount: i64,
    pub asset_id: AssetId,
}

impl AssetAmount {
    #[must_use]
    pub const fn new(amount: i64, asset_id: AssetId) -> Self {
        Self { amount, asset_id }
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.amount == 0
    }
}

/// The exchange ratio `base / quote` between two assets.
///
/// Comparison groups by the directed `(base asset, quote asset)` pair first,
/// then compares the ratio by cross multiplication in 128-bit space, so
/// `2/4` and `1/2` of the same pair compare equal and no overflow occurs for
/// any pair of valid amounts. The ratio ordering is meaningful for prices
/// with positive amounts, which [`Price::is_valid`] checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Price {
    pub base: AssetAmount,
    pub quote: AssetAmount,
}

impl Price {
    #[must_use]
    pub const fn new(base: AssetAmount, quote: AssetAmount) -> Self {
        Self { base, quote }
    }

    /// Both amounts positive and the two assets distinct.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.base.amount > 0 && self.quote.amount > 0 && self.base.asset_id != self.quote.asset_id
    }

    fn directed_pair(&self) -> (AssetId, AssetId) {
        (self.base.asset_id, self.quote.asset_id)
    }

    fn cross(&self, other: &Self) -> (i128, i128) {
        (
            i128::from(self.base.amount) * i128::from(other.quote.amount),
            i128::from(other.base.amount) * i128::from(self.quote.amount),
        )
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        if self.directed_pair() != other.directed_pair() {
            return false;
        }
        let (lhs, rhs) = self.cross(other);
        lhs == rhs
    }
}

impl Eq for Price {}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.directed_pair()
            .cmp(&other.directed_pair())
            .then_with(|| {
                let (lhs, rhs) = self.cross(other);
                lhs.cmp(&rhs)
            })
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
