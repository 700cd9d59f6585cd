use std::sync::Arc;

use anyhow::Result;
use safekids_common::config::DaemonConfig;
use safekids_common::types::LocationUpdate;
use safekids_engine::GeofenceService;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sink::NotificationSink;

/// Core daemon: owns the geofence service and pumps location updates
/// from the device-side location source into it, forwarding any emitted
/// transition events to the notification sink.
pub struct Daemon {
    service: Arc<GeofenceService>,
    sink: Arc<dyn NotificationSink>,
    locations: mpsc::Receiver<LocationUpdate>,
}

impl Daemon {
    /// Build a daemon and the sender half of its location channel. The
    /// location source (platform bindings, transport layer) holds the
    /// sender; dropping every sender stops the daemon.
    pub fn new(
        config: &DaemonConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> (Self, mpsc::Sender<LocationUpdate>) {
        let (tx, rx) = mpsc::channel(config.engine.location_queue_size);
        let daemon =
            Self { service: Arc::new(GeofenceService::new()), sink, locations: rx };
        (daemon, tx)
    }

    pub fn service(&self) -> Arc<GeofenceService> {
        Arc::clone(&self.service)
    }

    /// Process location updates until the channel closes or the process
    /// receives a shutdown signal.
    pub async fn run(mut self) -> Result<()> {
        info!("Daemon processing location updates");

        loop {
            tokio::select! {
                maybe_update = self.locations.recv() => {
                    match maybe_update {
                        Some(update) => self.process(update).await,
                        None => {
                            info!("Location channel closed, shutting down");
                            break;
                        }
                    }
                }
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn process(&self, update: LocationUpdate) {
        debug!("Location update for child {}", update.child_id);

        let events = self
            .service
            .evaluate_location(update.child_id, update.point, update.timestamp)
            .await;

        for event in &events {
            if let Err(e) = self.sink.publish(event).await {
                // The sink owns delivery retries; a failed publish must
                // not stall location processing.
                warn!("Failed to publish transition event: {}", e);
            }
        }
    }
}
