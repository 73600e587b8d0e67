//! mDNS device browsing
//!
//! Browses the configured service type and translates raw mDNS service
//! events into [`DiscoveryEvent`]s on a channel consumed by the registry
//! event loop. Cast devices carry their identifier and friendly name in the
//! TXT record (`id` / `fn`); records that omit them fall back to the
//! service instance name.

use std::collections::HashMap;
use std::net::SocketAddr;

use mdns_sd::{ServiceDaemon, ServiceEvent};
use tokio::sync::mpsc;

use super::DiscoveryEvent;
use crate::{Error, Result};

/// Buffered events between the mDNS thread and the registry loop
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Background browser for cast-capable devices
pub struct MdnsBrowser {
    daemon: ServiceDaemon,
    service_type: String,
}

impl MdnsBrowser {
    /// Start browsing and return the browser handle plus the event stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the mDNS daemon cannot be created or
    /// the browse operation cannot start - fatal at process startup.
    pub fn start(service_type: &str) -> Result<(Self, mpsc::Receiver<DiscoveryEvent>)> {
        let daemon = ServiceDaemon::new()
            .map_err(|e| Error::Discovery(format!("failed to create mDNS daemon: {e}")))?;

        let browse_rx = daemon
            .browse(service_type)
            .map_err(|e| Error::Discovery(format!("failed to browse {service_type}: {e}")))?;

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tokio::task::spawn_blocking(move || forward_events(&browse_rx, &tx));

        tracing::info!(service_type = %service_type, "mDNS browsing started");

        Ok((
            Self {
                daemon,
                service_type: service_type.to_string(),
            },
            rx,
        ))
    }

    /// Stop browsing and shut the daemon down. Best-effort.
    pub fn shutdown(&self) {
        if let Err(e) = self.daemon.stop_browse(&self.service_type) {
            tracing::debug!(error = %e, "failed to stop mDNS browse");
        }
        if let Err(e) = self.daemon.shutdown() {
            tracing::trace!(error = %e, "mDNS daemon shutdown error (expected on normal exit)");
        }
    }
}

impl Drop for MdnsBrowser {
    fn drop(&mut self) {
        if let Err(e) = self.daemon.shutdown() {
            tracing::trace!(error = %e, "mDNS daemon shutdown error (expected on normal exit)");
        }
    }
}

/// Pump raw mDNS events into the discovery channel until either side closes.
///
/// Steady-state oddities (unresolvable records, removals for unknown
/// instances) are logged and skipped - the registry just stays stale until
/// the next event for that device.
fn forward_events(events: &mdns_sd::Receiver<ServiceEvent>, tx: &mpsc::Sender<DiscoveryEvent>) {
    // fullname -> device id, so removals can be mapped back to identifiers
    let mut known: HashMap<String, String> = HashMap::new();

    for event in events.iter() {
        match event {
            ServiceEvent::ServiceResolved(info) => {
                let fullname = info.get_fullname().to_string();
                let instance = instance_name(&fullname);
                let id = info
                    .get_property_val_str("id")
                    .unwrap_or(instance)
                    .to_string();
                let name = info
                    .get_property_val_str("fn")
                    .unwrap_or(instance)
                    .to_string();
                let address = info
                    .get_addresses()
                    .iter()
                    .next()
                    .copied()
                    .map(|ip| SocketAddr::new(ip, info.get_port()));

                let event = if known.insert(fullname, id.clone()).is_some() {
                    DiscoveryEvent::Updated { id, name, address }
                } else {
                    DiscoveryEvent::Found { id, name, address }
                };

                if tx.blocking_send(event).is_err() {
                    break;
                }
            }
            ServiceEvent::ServiceRemoved(_, fullname) => {
                if let Some(id) = known.remove(&fullname) {
                    if tx.blocking_send(DiscoveryEvent::Lost { id }).is_err() {
                        break;
                    }
                } else {
                    tracing::debug!(fullname = %fullname, "removal for unknown instance");
                }
            }
            ServiceEvent::SearchStopped(service_type) => {
                tracing::debug!(service_type = %service_type, "mDNS search stopped");
                break;
            }
            _ => {}
        }
    }
    tracing::debug!("mDNS event forwarding ended");
}

/// Strip the service type suffix from a full service name
fn instance_name(fullname: &str) -> &str {
    fullname.split("._").next().unwrap_or(fullname)
}
