use anyhow::Result;
use async_trait::async_trait;
use safekids_common::types::TransitionEvent;
use tracing::info;

/// Downstream consumer of zone-transition events. Actual delivery
/// (push, SMS, in-app) lives outside the core; implementations adapt
/// this seam to whatever transport the deployment uses.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn publish(&self, event: &TransitionEvent) -> Result<()>;
}

/// Sink that records events to the log and nothing else. Default wiring
/// for deployments that read alerts from the journal.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn publish(&self, event: &TransitionEvent) -> Result<()> {
        info!("Transition event: {}", serde_json::to_string(event)?);
        Ok(())
    }
}
