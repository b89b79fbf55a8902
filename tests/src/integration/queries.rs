//! # Query Facade Contracts
//!
//! End-to-end checks of the read API against a populated in-memory chain:
//! batch accessors stay order-preserving and null-preserving, paginated
//! lookups honor their caps, and the order-book views come back in their
//! documented sort orders.

#[cfg(test)]
mod tests {
    use mc_query_api::QueryError;
    use shared_types::amount::AssetAmount;
    use shared_types::entities::{DynamicGlobalProperties, GlobalProperties, LedgerObject};
    use shared_types::ids::{AssetId, LimitOrderId, ObjectId};

    use crate::fixtures::{chain, init_test_telemetry, transfer_tx};

    // =========================================================================
    // BATCH ACCESSORS
    // =========================================================================

    #[test]
    fn test_get_objects_preserves_nulls_and_duplicates() {
        init_test_telemetry();
        let fx = chain();
        let ids = [
            ObjectId::from(fx.alice),
            ObjectId::from(LimitOrderId(999)),
            ObjectId::from(fx.gold),
            ObjectId::from(fx.alice),
        ];

        let objects = fx.service.get_objects(&ids);
        assert_eq!(objects.len(), 4);
        match &objects[0] {
            Some(LedgerObject::Account(account)) => assert_eq!(account.name, "alice"),
            other => panic!("expected alice, got {other:?}"),
        }
        assert!(objects[1].is_none(), "missing ids come back as null");
        match &objects[2] {
            Some(LedgerObject::Asset(asset)) => assert_eq!(asset.symbol, "GOLD"),
            other => panic!("expected GOLD, got {other:?}"),
        }
        assert_eq!(objects[3], objects[0], "duplicates resolve independently");
    }

    #[test]
    fn test_typed_batch_accessors() {
        let fx = chain();

        let accounts = fx.service.get_accounts(&[fx.bob, fx.alice]);
        let names: Vec<&str> = accounts
            .iter()
            .map(|account| account.as_ref().map_or("-", |a| a.name.as_str()))
            .collect();
        assert_eq!(names, ["bob", "alice"]);

        let by_name = fx
            .service
            .lookup_account_names(&["carol".to_string(), "dave".to_string()]);
        assert_eq!(by_name[0].as_ref().map(|a| a.id), Some(fx.carol));
        assert!(by_name[1].is_none());

        let assets = fx
            .service
            .lookup_asset_symbols(&["GOLD".to_string(), "PLATINUM".to_string()]);
        assert_eq!(assets[0].as_ref().map(|a| a.id), Some(fx.gold));
        assert!(assets[1].is_none());
    }

    // =========================================================================
    // PAGINATED LOOKUPS AND CAPS
    // =========================================================================

    #[test]
    fn test_lookup_accounts_pagination_and_cap() {
        let fx = chain();

        let all = fx.service.lookup_accounts("", 1_000).expect("within cap");
        let names: Vec<&str> = all.keys().map(String::as_str).collect();
        assert_eq!(names, ["alice", "bob", "carol"]);

        let page = fx.service.lookup_accounts("bo", 2).expect("within cap");
        let names: Vec<&str> = page.keys().map(String::as_str).collect();
        assert_eq!(names, ["bob", "carol"]);
        assert_eq!(page["bob"], fx.bob);

        match fx.service.lookup_accounts("", 2_000) {
            Err(QueryError::LimitExceeded { requested, maximum }) => {
                assert_eq!((requested, maximum), (2_000, 1_000));
            }
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_list_assets_pagination_and_cap() {
        let fx = chain();

        let all = fx.service.list_assets("", 100).expect("within cap");
        let symbols: Vec<&str> = all.iter().map(|asset| asset.symbol.as_str()).collect();
        assert_eq!(symbols, ["GOLD", "MERI", "SILVER"]);

        let page = fx.service.list_assets("M", 1).expect("within cap");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].symbol, "MERI");

        assert!(matches!(
            fx.service.list_assets("", 101),
            Err(QueryError::LimitExceeded {
                requested: 101,
                maximum: 100,
            })
        ));
    }

    // =========================================================================
    // ORDER BOOKS
    // =========================================================================

    #[test]
    fn test_limit_orders_cover_both_sides_in_price_order() {
        let fx = chain();

        let book = fx
            .service
            .get_limit_orders(fx.core, fx.gold, 10)
            .expect("valid market");
        let shape: Vec<(AssetId, i64)> = book
            .iter()
            .map(|order| (order.sell_asset(), order.for_sale))
            .collect();
        // Asks ascending by price (100/50 before 90/40), then the bids.
        assert_eq!(
            shape,
            [(fx.core, 100), (fx.core, 90), (fx.gold, 30)]
        );

        assert!(matches!(
            fx.service.get_limit_orders(fx.gold, fx.gold, 10),
            Err(QueryError::InvalidMarket(_))
        ));
    }

    #[test]
    fn test_derivative_order_views() {
        let fx = chain();

        let shorts = fx.service.get_short_orders(fx.gold, 10);
        assert_eq!(shorts.len(), 1);
        assert_eq!(shorts[0].seller, fx.bob);
        assert_eq!(shorts[0].collateral, 100);

        let calls = fx.service.get_call_orders(fx.gold, 10);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].borrower, fx.bob);
        assert_eq!(calls[0].debt, 100);

        // Soonest settlement first, regardless of insertion order.
        let settlements = fx.service.get_settle_orders(fx.gold, 10);
        let queue: Vec<_> = settlements
            .iter()
            .map(|s| (s.owner, s.settlement_date))
            .collect();
        assert_eq!(
            queue,
            [(fx.alice, 1_700_050_000), (fx.carol, 1_700_100_000)]
        );
    }

    // =========================================================================
    // BALANCES
    // =========================================================================

    #[test]
    fn test_balance_views() {
        let fx = chain();

        // No asset filter: every non-zero balance, ascending by asset id.
        let all = fx.service.get_account_balances(fx.alice, &[]);
        assert_eq!(
            all,
            [
                AssetAmount::new(100_000, fx.core),
                AssetAmount::new(250, fx.gold),
            ]
        );

        // An explicit list echoes the requested order and keeps zeroes.
        let picked = fx
            .service
            .get_account_balances(fx.alice, &[fx.silver, fx.core]);
        assert_eq!(
            picked,
            [
                AssetAmount::new(0, fx.silver),
                AssetAmount::new(100_000, fx.core),
            ]
        );

        let named = fx
            .service
            .get_named_account_balances("bob", &[])
            .expect("bob exists");
        assert_eq!(named, [AssetAmount::new(40_000, fx.core)]);

        match fx.service.get_named_account_balances("dave", &[]) {
            Err(QueryError::AccountNotFound(name)) => assert_eq!(name, "dave"),
            other => panic!("expected AccountNotFound, got {other:?}"),
        }
    }

    // =========================================================================
    // BLOCKS AND TRANSACTIONS
    // =========================================================================

    #[test]
    fn test_block_accessors() {
        let fx = chain();

        let header = fx.service.get_block_header(2).expect("block 2 exists");
        assert_eq!(header.number, 2);

        let block = fx.service.get_block(2).expect("block 2 exists");
        assert_eq!(block.header, header);
        assert_eq!(block.transactions.len(), 1);

        assert!(fx.service.get_block(99).is_none());
        assert!(fx.service.get_block_header(0).is_none());
    }

    #[test]
    fn test_transaction_hex_round_trips() -> anyhow::Result<()> {
        let fx = chain();
        let tx = transfer_tx(fx.alice, fx.bob, AssetAmount::new(10, fx.core));

        let encoded = fx.service.get_transaction_hex(&tx)?;
        assert!(!encoded.is_empty());
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));

        let bytes = hex::decode(&encoded)?;
        let decoded: shared_types::block::SignedTransaction = bincode::deserialize(&bytes)?;
        assert_eq!(decoded, tx);
        Ok(())
    }

    // =========================================================================
    // CHAIN PROPERTIES
    // =========================================================================

    #[test]
    fn test_chain_properties() -> anyhow::Result<()> {
        let fx = chain();

        let global = fx.service.get_global_properties();
        assert_eq!(global.parameters.block_interval, 5);

        let dynamic = fx.service.get_dynamic_global_properties();
        assert_eq!(dynamic.head_block_number, 2);
        assert_eq!(dynamic.time, 1_700_000_010);

        // The singletons are reachable through the generic accessor too.
        let objects = fx
            .service
            .get_objects(&[GlobalProperties::ID, DynamicGlobalProperties::ID]);
        assert!(matches!(
            objects[0],
            Some(LedgerObject::GlobalProperties(_))
        ));
        match &objects[1] {
            Some(LedgerObject::DynamicGlobalProperties(d)) => {
                assert_eq!(d.head_block_number, 2);
            }
            other => panic!("expected dynamic properties, got {other:?}"),
        }

        assert_eq!(fx.service.get_account_count(), 3);
        Ok(())
    }
}
