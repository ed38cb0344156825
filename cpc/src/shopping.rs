//! Inventory-netted purchase lists, one per crafting rank.

use std::collections::BTreeMap;

use cpc_core::{
    ItemId, ProfitNode, RecipeOption, RunConfiguration, ShoppingCost, ShoppingListEntry,
    ShoppingLists, StaticSources,
};

use crate::Calculator;

fn leaf_entry(node: &ProfitNode) -> ShoppingListEntry {
    ShoppingListEntry {
        item_id: node.item_id,
        name: node.item_name.clone(),
        quantity: node.quantity,
        cost: ShoppingCost {
            vendor: node.vendor_price,
            ah: (!node.ah_price.is_empty()).then_some(node.ah_price),
        },
    }
}

fn expand(
    node: &ProfitNode,
    option: Option<&RecipeOption>,
    statics: &StaticSources,
    out: &mut Vec<ShoppingListEntry>,
) {
    match option {
        Some(opt) if !statics.is_excluded(opt.recipe_id) => {
            for part in &opt.parts {
                expand(part, part.recipes.first(), statics, out);
            }
        }
        _ => out.push(leaf_entry(node)),
    }
}

/// Materials for `root` through its option of `rank`, summed per item, with unit costs.
fn raw_list(
    root: &ProfitNode,
    rank: u32,
    statics: &StaticSources,
) -> BTreeMap<ItemId, ShoppingListEntry> {
    let mut flat = Vec::new();
    if root.recipes.is_empty() {
        flat.push(leaf_entry(root));
    } else if let Some(option) = root.recipes.iter().find(|o| o.rank == rank) {
        expand(root, Some(option), statics, &mut flat);
    }

    let mut merged: BTreeMap<ItemId, ShoppingListEntry> = BTreeMap::new();
    for entry in flat {
        merged
            .entry(entry.item_id)
            .and_modify(|e| e.quantity += entry.quantity)
            .or_insert(entry);
    }
    merged
}

/// Deduct on-hand units from `entry` and price what is left.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn net_entry(mut entry: ShoppingListEntry, run: &mut RunConfiguration) -> ShoppingListEntry {
    if run.item_in_inventory(entry.item_id) {
        let available = run.item_count(entry.item_id);
        let needed = entry.quantity;
        let used = needed.min(available as f64).max(0.0);
        if used > 0.0 {
            run.adjust_inventory(entry.item_id, -(used.ceil() as i64));
        }
        entry.quantity = (needed - used).max(0.0);
    }

    entry.cost.vendor = entry.cost.vendor.map(|unit| unit * entry.quantity);
    entry.cost.ah = entry.cost.ah.map(|ah| ah.scaled(entry.quantity));
    entry
}

/// Build one shopping list per distinct rank among the root's recipe options.
///
/// The root is expanded through the first option of each rank; every other
/// node through its first option. Nodes crafted by an excluded recipe and
/// nodes without recipes are bought as they are. A root without recipes
/// yields a single list under rank 0 holding the root itself.
///
/// The inventory overlay of `run` is reset before each list, so every rank
/// sees the full on-hand inventory. Entries are ordered by item id.
#[must_use]
pub fn build_shopping_lists(
    root: &ProfitNode,
    statics: &StaticSources,
    run: &mut RunConfiguration,
) -> ShoppingLists {
    let mut ranks = root.ranks();
    if ranks.is_empty() {
        ranks.push(0);
    }

    let mut lists = ShoppingLists::new();
    for rank in ranks {
        run.reset_inventory_adjustments();
        let entries: Vec<ShoppingListEntry> = raw_list(root, rank, statics)
            .into_values()
            .map(|entry| net_entry(entry, run))
            .collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(item = root.item_id, rank, entries = entries.len(), "built shopping list");
        lists.insert(rank, entries);
    }
    lists
}

impl Calculator {
    /// Shopping lists for a priced tree, using this calculator's exclusion list.
    #[must_use]
    pub fn shopping_lists(&self, root: &ProfitNode, run: &mut RunConfiguration) -> ShoppingLists {
        build_shopping_lists(root, &self.statics, run)
    }
}
