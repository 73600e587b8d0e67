//! Device discovery
//!
//! A background browser watches the local network for cast-capable devices
//! and feeds found/updated/lost events into the [`registry::DeviceRegistry`],
//! the single source of truth for what is currently castable.

pub mod mdns;
pub mod registry;

pub use mdns::MdnsBrowser;
pub use registry::{DeviceRegistry, SharedRegistry};

use std::net::SocketAddr;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A discovery notification for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// Device appeared on the network
    Found {
        id: String,
        name: String,
        address: Option<SocketAddr>,
    },
    /// Device metadata changed (rename, address change)
    Updated {
        id: String,
        name: String,
        address: Option<SocketAddr>,
    },
    /// Device left the network
    Lost { id: String },
}

/// Last-known description of one discovered device
///
/// Owned by the registry; callers receive clones and never mutate shared
/// state.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDescriptor {
    /// Opaque unique device identifier
    pub id: String,

    /// Human-readable device name
    pub name: String,

    /// Control endpoint, once the discovery record resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<SocketAddr>,

    /// Whether the device is currently considered reachable
    pub reachable: bool,

    /// When the last discovery event for this device arrived
    pub last_seen: DateTime<Utc>,
}
