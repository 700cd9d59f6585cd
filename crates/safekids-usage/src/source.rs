use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use safekids_common::types::{UsageReport, UsageSample};
use serde::{Deserialize, Serialize};

use crate::aggregator;

/// Half-open query window passed to the device usage source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UsageWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }
}

/// Device-side provider of raw usage samples, e.g. the platform
/// usage-stats service. An unavailable or permission-denied source is the
/// collaborator's failure to report; a source that is reachable but has
/// nothing recorded returns an empty batch, which aggregates to a zero
/// report rather than an error.
#[async_trait]
pub trait UsageSource: Send + Sync {
    async fn query_usage(&self, window: UsageWindow) -> Result<Vec<UsageSample>>;
}

/// Query a source for one window and aggregate the result.
pub async fn report_for_window(
    source: &dyn UsageSource,
    window: UsageWindow,
) -> Result<UsageReport> {
    let samples = source.query_usage(window).await?;
    Ok(aggregator::aggregate(samples))
}
