use cpc_core::oracle::summarize;
use cpc_core::wire::{AuctionItem, AuctionListing, AuctionSnapshot};
use proptest::prelude::*;

fn arb_listing() -> impl Strategy<Value = AuctionListing> {
    (
        1u32..20,
        proptest::collection::vec(1u32..10, 0..3),
        1u64..50,
        0u64..10_000,
        1u64..10_000,
    )
        .prop_map(|(id, bonus_lists, quantity, buyout, unit_price)| AuctionListing {
            item: AuctionItem { id, bonus_lists },
            quantity,
            buyout,
            unit_price,
        })
}

fn arb_snapshot() -> impl Strategy<Value = AuctionSnapshot> {
    proptest::collection::vec(arb_listing(), 0..60)
        .prop_map(|auctions| AuctionSnapshot { auctions })
}

proptest! {
    #[test]
    fn unknown_item_yields_empty_summary(
        snap in arb_snapshot(),
        bonus in proptest::option::of(0u32..10),
    ) {
        let s = summarize(&snap, 999, bonus);
        prop_assert_eq!(s.total_sales, 0);
        prop_assert!(s.is_empty());
        prop_assert_eq!(s.high, 0.0);
        prop_assert_eq!(s.low, 0.0);
        prop_assert_eq!(s.average, 0.0);
    }

    #[test]
    fn average_lies_between_extremes(snap in arb_snapshot(), item in 1u32..20) {
        let s = summarize(&snap, item, None);
        if s.total_sales > 0 {
            prop_assert!(s.low <= s.average + 1e-6);
            prop_assert!(s.average <= s.high + 1e-6);
        }
    }

    #[test]
    fn filtered_volume_never_exceeds_unfiltered(
        snap in arb_snapshot(),
        item in 1u32..20,
        bonus in 1u32..10,
    ) {
        let all = summarize(&snap, item, None);
        let some = summarize(&snap, item, Some(bonus));
        prop_assert!(some.total_sales <= all.total_sales);
    }
}
