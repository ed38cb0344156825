//! Recursive pricing of an item's recipe tree.
//!
//! Resolution starts from one item, checks which recipes of the requested
//! professions craft it, and recurses into every reagent of every qualifying
//! recipe. All nodes of one request are priced against the same auction
//! snapshot.
//!
//! Fan-out points (professions, skill tiers, reagents) each run at most
//! `ResolverConfig::fan_out` sub-tasks at once. Results are put back into
//! input order before they are assembled, so the output does not depend on
//! completion order.

mod cost;
mod crafting;
mod cycles;
mod graph;
pub(crate) mod util;

pub use cost::recipe_cost;
pub use crafting::slot_name;
pub use cycles::find_cyclic_links;
