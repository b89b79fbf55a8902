//! # Object Identity
//!
//! Every persisted ledger object is addressed by an [`ObjectId`] with the
//! canonical text form `space.type.instance` (e.g. `1.1.7` for the eighth
//! account ever registered). Instances are allocated monotonically per kind
//! and never reused, so an id observed once refers to the same logical
//! object forever.
//!
//! Protocol objects live in space 1, implementation objects in space 2.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The kind of a persisted ledger object.
///
/// Variants are declared in `(space, type)` order so the derived `Ord`
/// matches the numeric ordering of the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    /// `1.1.x`: a registered account.
    Account,
    /// `1.2.x`: an asset definition.
    Asset,
    /// `1.3.x`: an open limit order.
    LimitOrder,
    /// `1.4.x`: an open short order.
    ShortOrder,
    /// `1.5.x`: a margin position (call order).
    CallOrder,
    /// `1.6.x`: a pending forced settlement.
    ForceSettlement,
    /// `2.0.0`: the chain-wide parameter object (singleton).
    GlobalProperties,
    /// `2.1.0`: head-block state (singleton).
    DynamicGlobalProperties,
    /// `2.2.x`: one account's balance in one asset.
    AccountBalance,
}

impl ObjectKind {
    /// The id space this kind lives in.
    #[must_use]
    pub const fn space(self) -> u8 {
        match self {
            Self::Account
            | Self::Asset
            | Self::LimitOrder
            | Self::ShortOrder
            | Self::CallOrder
            | Self::ForceSettlement => 1,
            Self::GlobalProperties | Self::DynamicGlobalProperties | Self::AccountBalance => 2,
        }
    }

    /// The type number within the space.
    #[must_use]
    pub const fn type_id(self) -> u8 {
        match self {
            Self::Account => 1,
            Self::Asset => 2,
            Self::LimitOrder => 3,
            Self::ShortOrder => 4,
            Self::CallOrder => 5,
            Self::ForceSettlement => 6,
            Self::GlobalProperties => 0,
            Self::DynamicGlobalProperties => 1,
            Self::AccountBalance => 2,
        }
    }

    /// Resolve a `(space, type)` pair back to a kind.
    #[must_use]
    pub const fn from_parts(space: u8, type_id: u8) -> Option<Self> {
        match (space, type_id) {
            (1, 1) => Some(Self::Account),
            (1, 2) => Some(Self::Asset),
            (1, 3) => Some(Self::LimitOrder),
            (1, 4) => Some(Self::ShortOrder),
            (1, 5) => Some(Self::CallOrder),
            (1, 6) => Some(Self::ForceSettlement),
            (2, 0) => Some(Self::GlobalProperties),
            (2, 1) => Some(Self::DynamicGlobalProperties),
            (2, 2) => Some(Self::AccountBalance),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Account => "account",
            Self::Asset => "asset",
            Self::LimitOrder => "limit_order",
            Self::ShortOrder => "short_order",
            Self::CallOrder => "call_order",
            Self::ForceSettlement => "force_settlement",
            Self::GlobalProperties => "global_properties",
            Self::DynamicGlobalProperties => "dynamic_global_properties",
            Self::AccountBalance => "account_balance",
        };
        f.write_str(name)
    }
}

/// A fully qualified object identifier.
///
/// Renders as `space.type.instance` and serializes as that string, which is
/// also the wire form consumed by remote clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId {
    pub kind: ObjectKind,
    pub instance: u64,
}

impl ObjectId {
    #[must_use]
    pub const fn new(kind: ObjectKind, instance: u64) -> Self {
        Self { kind, instance }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.kind.space(),
            self.kind.type_id(),
            self.instance
        )
    }
}

/// Failure to parse the `space.type.instance` text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseObjectIdError {
    #[error("object id must have the form space.type.instance, got {0:?}")]
    Malformed(String),
    #[error("unknown object kind {space}.{type_id}")]
    UnknownKind { space: u8, type_id: u8 },
}

impl FromStr for ObjectId {
    type Err = ParseObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseObjectIdError::Malformed(s.to_owned());
        let mut parts = s.splitn(3, '.');
        let space: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let type_id: u8 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let instance: u64 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(malformed)?;
        let kind = ObjectKind::from_parts(space, type_id)
            .ok_or(ParseObjectIdError::UnknownKind { space, type_id })?;
        Ok(Self { kind, instance })
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// A typed id was built from an [`ObjectId`] of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} id, got {actual}")]
pub struct KindMismatch {
    pub expected: ObjectKind,
    pub actual: ObjectId,
}

macro_rules! typed_object_id {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub u64);

        impl $name {
            /// The untyped id this wrapper addresses.
            #[must_use]
            pub const fn object_id(self) -> ObjectId {
                ObjectId::new(ObjectKind::$kind, self.0)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.object_id()
            }
        }

        impl TryFrom<ObjectId> for $name {
            type Error = KindMismatch;

            fn try_from(id: ObjectId) -> Result<Self, Self::Error> {
                if id.kind == ObjectKind::$kind {
                    Ok(Self(id.instance))
                } else {
                    Err(KindMismatch {
                        expected: ObjectKind::$kind,
                        actual: id,
                    })
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.object_id().fmt(f)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.object_id().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let id = ObjectId::deserialize(deserializer)?;
                Self::try_from(id).map_err(D::Error::custom)
            }
        }
    };
}

typed_object_id!(
    /// Id of a registered account (`1.1.x`).
    AccountId => Account
);
typed_object_id!(
    /// Id of an asset definition (`1.2.x`).
    AssetId => Asset
);
typed_object_id!(
    /// Id of an open limit order (`1.3.x`).
    LimitOrderId => LimitOrder
);
typed_object_id!(
    /// Id of an open short order (`1.4.x`).
    ShortOrderId => ShortOrder
);
typed_object_id!(
    /// Id of a margin position (`1.5.x`).
    CallOrderId => CallOrder
);
typed_object_id!(
    /// Id of a pending forced settlement (`1.6.x`).
    SettlementId => ForceSettlement
);
typed_object_id!(
    /// Id of an account balance entry (`2.2.x`).
    BalanceId => AccountBalance
);

/// Two distinct assets identify a market; the pair was given one asset twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a market requires two distinct assets, got {0} on both sides")]
pub struct InvalidMarketPair(pub AssetId);

/// An unordered, normalized pair of distinct assets identifying one market.
///
/// The constructor sorts the two assets, so `(a, b)` and `(b, a)` name the
/// same market and compare equal. Construction from equal assets fails;
/// holding a `MarketPair` is proof the pair is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "(AssetId, AssetId)", into = "(AssetId, AssetId)")]
pub struct MarketPair {
    lo: AssetId,
    hi: AssetId,
}

impl MarketPair {
    pub fn new(a: AssetId, b: AssetId) -> Result<Self, InvalidMarketPair> {
        if a == b {
            return Err(InvalidMarketPair(a));
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { lo, hi })
    }

    /// The two assets, smaller id first.
    #[must_use]
    pub const fn assets(self) -> (AssetId, AssetId) {
        (self.lo, self.hi)
    }

    #[must_use]
    pub fn contains(self, asset: AssetId) -> bool {
        self.lo == asset || self.hi == asset
    }
}

impl fmt::Display for MarketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lo, self.hi)
    }
}

impl From<MarketPair> for (AssetId, AssetId) {
    fn from(pair: MarketPair) -> Self {
        pair.assets()
    }
}

impl TryFrom<(AssetId, AssetId)> for MarketPair {
    type Error = InvalidMarketPair;

    fn try_from((a, b): (AssetId, AssetId)) -> Result<Self, Self::Error> {
        Self::new(a, b)
    }
}
