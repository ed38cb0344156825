//! Auction price summaries over a single snapshot.

use cpc_types::{BonusId, ItemId, OrderedSet, PriceSummary};

use crate::wire::{AuctionListing, AuctionSnapshot};

/// Price of one unit on a listing: buyout when set, else the unit price.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn listing_price(listing: &AuctionListing) -> f64 {
    if listing.buyout != 0 {
        listing.buyout as f64
    } else {
        listing.unit_price as f64
    }
}

fn matches(listing: &AuctionListing, item: ItemId, variant: Option<BonusId>) -> bool {
    if listing.item.id != item {
        return false;
    }
    match variant {
        None | Some(0) => true,
        Some(bonus) => listing.item.bonus_lists.contains(&bonus),
    }
}

/// Summarize the listings of `item`, optionally restricted to listings whose
/// bonus list contains `variant`.
///
/// The average is weighted by listed quantity. No match yields an empty
/// summary (`total_sales == 0`, zeroed prices).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(
    snapshot: &AuctionSnapshot,
    item: ItemId,
    variant: Option<BonusId>,
) -> PriceSummary {
    let mut high = 0.0_f64;
    let mut low = f64::INFINITY;
    let mut weighted = 0.0_f64;
    let mut total: u64 = 0;

    for listing in snapshot
        .auctions
        .iter()
        .filter(|l| matches(l, item, variant))
    {
        let price = listing_price(listing);
        high = high.max(price);
        low = low.min(price);
        weighted += price * listing.quantity as f64;
        total += listing.quantity;
    }

    if total == 0 {
        return PriceSummary::default();
    }
    PriceSummary {
        high,
        low,
        average: weighted / total as f64,
        total_sales: total,
    }
}

/// Distinct non-empty bonus lists seen for `item`, in first-seen order.
#[must_use]
pub fn distinct_variants(snapshot: &AuctionSnapshot, item: ItemId) -> Vec<Vec<BonusId>> {
    snapshot
        .auctions
        .iter()
        .filter(|l| l.item.id == item && !l.item.bonus_lists.is_empty())
        .map(|l| l.item.bonus_lists.clone())
        .collect::<OrderedSet<_>>()
        .into_vec()
}

/// Every bonus id appearing on listings of `item`, flattened and deduplicated.
#[must_use]
pub fn distinct_bonuses(snapshot: &AuctionSnapshot, item: ItemId) -> Vec<BonusId> {
    distinct_variants(snapshot, item)
        .into_iter()
        .flatten()
        .collect::<OrderedSet<_>>()
        .into_vec()
}
