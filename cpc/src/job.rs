//! Worker-facing entry points: one priced job, and batch item detail fills.

use cpc_core::{
    AddonData, AddonInventoryEntry, CpcError, ItemId, ItemRef, ProfitNode, Region,
    RunConfiguration, ShoppingLists,
};
use serde::{Deserialize, Serialize};

use crate::Calculator;
use crate::resolver::util::bounded_in_order;

/// A queued calculation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Identifier the response is stored under.
    pub job_id: String,
    /// Target item.
    pub item: ItemRef,
    /// Target quantity.
    pub count: u32,
    /// Professions to consider; empty means every profession.
    #[serde(default)]
    pub professions: Vec<String>,
    /// Realm whose auction house prices the tree.
    pub realm: String,
    /// Region of the realm.
    pub region: Region,
    /// On-hand inventory.
    #[serde(default)]
    pub inventory: Vec<AddonInventoryEntry>,
}

impl JobRequest {
    /// Build a request from an addon export.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the export names an unknown region.
    pub fn from_addon_data(
        job_id: impl Into<String>,
        data: &AddonData,
        item: impl Into<ItemRef>,
        count: u32,
    ) -> Result<Self, CpcError> {
        Ok(Self {
            job_id: job_id.into(),
            item: item.into(),
            count,
            professions: data.professions.clone(),
            realm: data.realm.realm_name.clone(),
            region: data.realm.region_name.parse()?,
            inventory: data.inventory.clone(),
        })
    }

    /// Run configuration carrying this request's inventory.
    #[must_use]
    pub fn run_configuration(&self) -> RunConfiguration {
        self.inventory.iter().fold(
            RunConfiguration::new(self.region, self.realm.clone(), self.item.clone(), self.count)
                .with_professions(self.professions.iter().cloned()),
            |cfg, entry| cfg.with_inventory(entry.id, entry.quantity),
        )
    }
}

/// Result of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The tree was priced.
    Complete {
        /// Priced recipe tree.
        price: ProfitNode,
        /// Shopping lists keyed by rank.
        shopping_lists: ShoppingLists,
    },
    /// The calculation failed.
    Failed {
        /// Error message.
        error: String,
    },
}

/// Response stored for a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    /// Identifier of the request.
    pub job_id: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

impl JobResponse {
    /// True when the job produced a priced tree.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.outcome, JobOutcome::Complete { .. })
    }
}

/// Name and craftability of one item, as recorded by batch maintenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledItem {
    /// Item id.
    pub item_id: ItemId,
    /// Region the item was looked up in.
    pub region: Region,
    /// Item display name.
    pub name: String,
    /// True when any profession can craft the item.
    pub craftable: bool,
}

/// A record that could not be filled and should be dropped from the pending queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// Item id.
    pub item_id: ItemId,
    /// Region the item was looked up in.
    pub region: Region,
    /// Why the lookup failed.
    pub error: CpcError,
}

/// Outcome of [`Calculator::fill_item_details`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailFill {
    /// Records ready to commit, in input order.
    pub filled: Vec<FilledItem>,
    /// Records that failed, in input order.
    pub failed: Vec<FailedItem>,
}

impl Calculator {
    /// Run one queued job: price the tree and build its shopping lists.
    ///
    /// Never fails; errors are reported inside the response.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::job::run",
            skip(self, job),
            fields(job_id = %job.job_id, item = %job.item)
        )
    )]
    pub async fn run_job(&self, job: &JobRequest) -> JobResponse {
        let mut run = job.run_configuration();
        let outcome = match self.resolve_run(&run).await {
            Ok(price) => {
                let shopping_lists = self.shopping_lists(&price, &mut run);
                JobOutcome::Complete {
                    price,
                    shopping_lists,
                }
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::info!(error = %e, "job failed");
                JobOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        JobResponse {
            job_id: job.job_id.clone(),
            outcome,
        }
    }

    /// Look up name and craftability (across every profession) for a batch of items.
    ///
    /// Records are processed concurrently; a failing record lands in
    /// `failed` without affecting the others.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cpc::job::fill_item_details",
            skip(self, records),
            fields(records = records.len())
        )
    )]
    pub async fn fill_item_details(&self, records: &[(ItemId, Region)]) -> DetailFill {
        let results = bounded_in_order(
            self.fan_out(),
            records.iter().map(|&(item_id, region)| async move {
                let detail = self.catalog.item_details(region, item_id).await?;
                let status = self.crafting_status(region, item_id, &[]).await?;
                Ok::<_, CpcError>(FilledItem {
                    item_id,
                    region,
                    name: detail.name,
                    craftable: status.craftable,
                })
            }),
        )
        .await;

        let mut fill = DetailFill::default();
        for (&(item_id, region), result) in records.iter().zip(results) {
            match result {
                Ok(item) => fill.filled.push(item),
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(item_id, %region, error = %error, "could not fill item");
                    fill.failed.push(FailedItem {
                        item_id,
                        region,
                        error,
                    });
                }
            }
        }
        fill
    }
}
