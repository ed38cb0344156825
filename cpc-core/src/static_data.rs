//! Read-only reference tables loaded from JSON files at startup.

use std::collections::HashMap;
use std::path::Path;

use cpc_types::{BonusId, CpcError, RecipeId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Directory below the static root holding the reference files.
pub const STATIC_FILES_DIR: &str = "static_files";
/// Bonus table file name.
pub const BONUSES_FILE: &str = "bonuses.json";
/// Rank table file name.
pub const RANK_MAPPINGS_FILE: &str = "rank-mappings.json";
/// Shopping exclusion list file name.
pub const EXCLUSIONS_FILE: &str = "shopping-recipe-exclusion-list.json";

/// One entry of the bonus table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusInfo {
    /// Bonus id.
    #[serde(default)]
    pub id: i64,
    /// Item level delta the bonus applies.
    #[serde(default)]
    pub level: i32,
    /// Quality override.
    #[serde(default)]
    pub quality: i32,
    /// Socket count.
    #[serde(default)]
    pub socket: i32,
}

/// Ordinal rank table mapping a recipe's position to an item level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankMappings {
    /// Item levels a crafted rank can have.
    #[serde(alias = "Available_levels", default)]
    pub available_levels: Vec<u32>,
    /// Index into `available_levels` for the n-th recipe of an item.
    #[serde(alias = "Rank_mapping", default)]
    pub rank_mapping: Vec<usize>,
}

impl RankMappings {
    /// Item level of the recipe at `index`, or 0 when the table has no entry.
    #[must_use]
    pub fn level_for(&self, index: usize) -> u32 {
        self.rank_mapping
            .get(index)
            .and_then(|&slot| self.available_levels.get(slot))
            .copied()
            .unwrap_or(0)
    }
}

/// Recipes never expanded when building shopping lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingExclusions {
    /// Excluded recipe ids.
    #[serde(alias = "Exclusions", default)]
    pub exclusions: Vec<RecipeId>,
}

/// All reference tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSources {
    bonuses: HashMap<BonusId, BonusInfo>,
    ranks: RankMappings,
    exclusions: ShoppingExclusions,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CpcError> {
    let raw = std::fs::read(path)
        .map_err(|e| CpcError::Data(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_slice(&raw)
        .map_err(|e| CpcError::decode(path.display().to_string(), e.to_string()))
}

impl StaticSources {
    /// Load the tables from `dir`.
    ///
    /// The bonus table is required; missing rank or exclusion files fall back
    /// to empty tables.
    ///
    /// # Errors
    /// Returns `Data` when the bonus file is missing and `Decode` when any
    /// present file is malformed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::static::load",
            skip(dir),
            fields(dir = %dir.as_ref().display())
        )
    )]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, CpcError> {
        let dir = dir.as_ref();
        let raw_bonuses: HashMap<String, BonusInfo> = read_json(&dir.join(BONUSES_FILE))?;
        let bonuses = raw_bonuses
            .into_iter()
            .filter_map(|(k, v)| k.parse::<BonusId>().ok().map(|id| (id, v)))
            .collect();

        let ranks = Self::optional(&dir.join(RANK_MAPPINGS_FILE))?;
        let exclusions = Self::optional(&dir.join(EXCLUSIONS_FILE))?;

        Ok(Self {
            bonuses,
            ranks,
            exclusions,
        })
    }

    fn optional<T: DeserializeOwned + Default>(path: &Path) -> Result<T, CpcError> {
        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                file = %path.display(),
                "optional static file missing, using empty table"
            );
            return Ok(T::default());
        }
        read_json(path)
    }

    /// Build from in-memory tables.
    #[must_use]
    pub fn from_parts(
        bonuses: HashMap<BonusId, BonusInfo>,
        ranks: RankMappings,
        exclusions: ShoppingExclusions,
    ) -> Self {
        Self {
            bonuses,
            ranks,
            exclusions,
        }
    }

    /// Entry for a bonus id.
    #[must_use]
    pub fn bonus(&self, id: BonusId) -> Option<&BonusInfo> {
        self.bonuses.get(&id)
    }

    /// Item level delta of a bonus; 0 when unknown.
    #[must_use]
    pub fn level_delta(&self, id: BonusId) -> i32 {
        self.bonus(id).map_or(0, |b| b.level)
    }

    /// Rank table.
    #[must_use]
    pub const fn ranks(&self) -> &RankMappings {
        &self.ranks
    }

    /// True when shopping lists must not expand `recipe`.
    #[must_use]
    pub fn is_excluded(&self, recipe: RecipeId) -> bool {
        self.exclusions.exclusions.contains(&recipe)
    }
}

/// Apply a signed level delta to a base item level, clamped at zero.
#[must_use]
pub fn shifted_level(base: u32, delta: i32) -> u32 {
    u32::try_from((i64::from(base) + i64::from(delta)).max(0)).unwrap_or(u32::MAX)
}
