//! Device registry: last-known view of discovered devices
//!
//! The registry is mutated only by the discovery event loop (single writer)
//! and read concurrently by the orchestrator and the API layer through
//! [`SharedRegistry`].

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use super::{DeviceDescriptor, DiscoveryEvent};
use crate::transport::CastTransport;

/// Registry of discovered devices, keyed by device identifier
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, DeviceDescriptor>,
}

/// Shared handle to the registry
pub type SharedRegistry = Arc<RwLock<DeviceRegistry>>;

impl DeviceRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }

    /// Create a new shared registry handle
    #[must_use]
    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Upsert a device from a found event. Idempotent: re-applying the same
    /// event leaves a single entry with the same fields (last-write-wins).
    ///
    /// An incoming event without an address keeps the previously resolved
    /// one, so a bare re-announcement does not drop the control endpoint.
    pub fn on_device_found(&mut self, id: &str, name: &str, address: Option<SocketAddr>) {
        let address = address.or_else(|| self.devices.get(id).and_then(|d| d.address));
        self.devices.insert(
            id.to_string(),
            DeviceDescriptor {
                id: id.to_string(),
                name: name.to_string(),
                address,
                reachable: true,
                last_seen: chrono::Utc::now(),
            },
        );
    }

    /// Upsert a device from an updated event; same semantics as
    /// [`Self::on_device_found`].
    pub fn on_device_updated(&mut self, id: &str, name: &str, address: Option<SocketAddr>) {
        self.on_device_found(id, name, address);
    }

    /// Remove a device, returning its descriptor if it was present
    pub fn on_device_lost(&mut self, id: &str) -> Option<DeviceDescriptor> {
        self.devices.remove(id)
    }

    /// Look up a device by identifier
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<DeviceDescriptor> {
        self.devices.get(id).cloned()
    }

    /// Point-in-time snapshot of all current devices. Purely an in-memory
    /// read; never touches the network. Order is not significant.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeviceDescriptor> {
        self.devices.values().cloned().collect()
    }

    /// Number of known devices
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Consume discovery events until the channel closes.
///
/// The sole writer of the registry. Event handling never fails the loop:
/// a lost device triggers a best-effort transport cleanup whose error is
/// logged and swallowed - the device is considered gone regardless.
pub async fn run_event_loop(
    registry: SharedRegistry,
    transport: Arc<dyn CastTransport>,
    mut events: mpsc::Receiver<DiscoveryEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            DiscoveryEvent::Found { id, name, address } => {
                tracing::info!(id = %id, name = %name, "device found");
                registry.write().await.on_device_found(&id, &name, address);
            }
            DiscoveryEvent::Updated { id, name, address } => {
                tracing::debug!(id = %id, name = %name, "device updated");
                registry.write().await.on_device_updated(&id, &name, address);
            }
            DiscoveryEvent::Lost { id } => {
                let removed = registry.write().await.on_device_lost(&id);
                match removed {
                    Some(device) => {
                        tracing::info!(id = %id, name = %device.name, "device lost");
                        if let Err(e) = transport.forget(&id).await {
                            tracing::warn!(id = %id, error = %e, "transport cleanup failed");
                        }
                    }
                    None => tracing::debug!(id = %id, "lost event for unknown device"),
                }
            }
        }
    }
    tracing::debug!("discovery event channel closed");
}
