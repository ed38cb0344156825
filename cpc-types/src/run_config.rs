//! Per-request run configuration with an inventory adjustment overlay.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CpcError, ItemId, Region};

/// An item given either by id or by display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemRef {
    /// Numeric id.
    Id(ItemId),
    /// Display name, resolved through item search.
    Name(String),
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for ItemRef {
    type Err = CpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CpcError::invalid_arg("item must not be empty"));
        }
        Ok(trimmed
            .parse::<ItemId>()
            .map_or_else(|_| Self::Name(trimmed.to_string()), Self::Id))
    }
}

impl From<ItemId> for ItemRef {
    fn from(id: ItemId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ItemRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// Inventory and character export produced by the in-game addon.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddonData {
    /// Items held by the character.
    #[serde(rename = "Inventory", default)]
    pub inventory: Vec<AddonInventoryEntry>,
    /// Professions the character knows.
    #[serde(rename = "Professions", default)]
    pub professions: Vec<String>,
    /// Realm the character plays on.
    #[serde(rename = "Realm", default)]
    pub realm: AddonRealm,
}

/// One inventory stack from the addon export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonInventoryEntry {
    /// Item id.
    #[serde(rename = "Id")]
    pub id: ItemId,
    /// Units held.
    #[serde(rename = "Quantity")]
    pub quantity: u64,
}

/// Realm block of the addon export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddonRealm {
    /// Numeric region id.
    #[serde(rename = "Region_id", default)]
    pub region_id: u32,
    /// Region code, e.g. "us".
    #[serde(rename = "Region_name", default)]
    pub region_name: String,
    /// Connected realm id.
    #[serde(rename = "Realm_id", default)]
    pub realm_id: u32,
    /// Realm display name.
    #[serde(rename = "Realm_name", default)]
    pub realm_name: String,
}

/// Everything a single calculation needs, plus the mutable inventory overlay.
///
/// The overlay records per-run consumption of on-hand items and is reset
/// before every rank's shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfiguration {
    inventory: HashMap<ItemId, u64>,
    #[serde(skip)]
    overlay: HashMap<ItemId, i64>,
    /// Professions to consider; empty means every profession in the region.
    pub professions: Vec<String>,
    /// Realm whose auction house prices the tree.
    pub realm: String,
    /// Region of the realm.
    pub region: Region,
    /// Target item.
    pub item: ItemRef,
    /// Target quantity.
    pub count: u32,
}

impl RunConfiguration {
    /// Create a configuration with no inventory and no profession filter.
    #[must_use]
    pub fn new(
        region: Region,
        realm: impl Into<String>,
        item: impl Into<ItemRef>,
        count: u32,
    ) -> Self {
        Self {
            inventory: HashMap::new(),
            overlay: HashMap::new(),
            professions: Vec::new(),
            realm: realm.into(),
            region,
            item: item.into(),
            count,
        }
    }

    /// Build from an addon export.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the export names an unknown region.
    pub fn from_addon_data(
        data: &AddonData,
        item: impl Into<ItemRef>,
        count: u32,
    ) -> Result<Self, CpcError> {
        let region: Region = data.realm.region_name.parse()?;
        let mut cfg = Self::new(region, data.realm.realm_name.clone(), item, count)
            .with_professions(data.professions.iter().cloned());
        for entry in &data.inventory {
            let held = cfg.inventory.entry(entry.id).or_insert(0);
            *held = held.saturating_add(entry.quantity);
        }
        Ok(cfg)
    }

    /// Set the profession filter.
    #[must_use]
    pub fn with_professions<I, S>(mut self, professions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.professions = professions.into_iter().map(Into::into).collect();
        self
    }

    /// Add on-hand units of an item.
    #[must_use]
    pub fn with_inventory(mut self, item: ItemId, quantity: u64) -> Self {
        let held = self.inventory.entry(item).or_insert(0);
        *held = held.saturating_add(quantity);
        self
    }

    /// True when the item was listed in the on-hand inventory.
    #[must_use]
    pub fn item_in_inventory(&self, item: ItemId) -> bool {
        self.inventory.contains_key(&item)
    }

    /// Units currently available: on-hand plus overlay, never below zero.
    #[must_use]
    pub fn item_count(&self, item: ItemId) -> u64 {
        let on_hand = i128::from(self.inventory.get(&item).copied().unwrap_or(0));
        let delta = i128::from(self.overlay.get(&item).copied().unwrap_or(0));
        u64::try_from((on_hand + delta).max(0)).unwrap_or(u64::MAX)
    }

    /// Record a change to the available units of an item for this run.
    pub fn adjust_inventory(&mut self, item: ItemId, delta: i64) {
        let adjusted = self.overlay.entry(item).or_insert(0);
        *adjusted = adjusted.saturating_add(delta);
    }

    /// Forget every adjustment made so far.
    pub fn reset_inventory_adjustments(&mut self) {
        self.overlay.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_adjusts_and_resets() {
        let mut cfg = RunConfiguration::new(Region::Us, "Hyjal", 1_u32, 1).with_inventory(7, 5);
        cfg.adjust_inventory(7, -3);
        assert_eq!(cfg.item_count(7), 2);
        cfg.adjust_inventory(7, -10);
        assert_eq!(cfg.item_count(7), 0);
        cfg.reset_inventory_adjustments();
        assert_eq!(cfg.item_count(7), 5);
    }

    #[test]
    fn extreme_adjustments_saturate() {
        let mut cfg = RunConfiguration::new(Region::Us, "Hyjal", 1_u32, 1).with_inventory(7, 5);
        cfg.adjust_inventory(7, i64::MIN);
        cfg.adjust_inventory(7, i64::MIN);
        assert_eq!(cfg.item_count(7), 0);
        cfg.reset_inventory_adjustments();
        cfg.adjust_inventory(7, i64::MAX);
        cfg.adjust_inventory(7, i64::MAX);
        assert_eq!(cfg.item_count(7), i64::MAX.unsigned_abs() + 5);
    }

    #[test]
    fn item_ref_parses_ids_and_names() {
        assert_eq!("171276".parse::<ItemRef>().unwrap(), ItemRef::Id(171_276));
        assert_eq!(
            "Potion of Spectral Strength".parse::<ItemRef>().unwrap(),
            ItemRef::Name("Potion of Spectral Strength".into())
        );
        assert!("  ".parse::<ItemRef>().is_err());
    }

    #[test]
    fn addon_export_is_imported() {
        let raw = r#"{
            "Inventory": [{"Id": 10, "Quantity": 4}, {"Id": 10, "Quantity": 1}],
            "Professions": ["Alchemy"],
            "Realm": {"Region_id": 1, "Region_name": "US", "Realm_id": 3, "Realm_name": "Hyjal"}
        }"#;
        let data: AddonData = serde_json::from_str(raw).unwrap();
        let cfg = RunConfiguration::from_addon_data(&data, "Flask", 2).unwrap();
        assert_eq!(cfg.region, Region::Us);
        assert_eq!(cfg.realm, "Hyjal");
        assert_eq!(cfg.professions, vec!["Alchemy".to_string()]);
        assert_eq!(cfg.item_count(10), 5);
    }
}
