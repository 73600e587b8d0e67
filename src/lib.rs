//! Cast Gateway - device discovery and multi-device casting
//!
//! This library provides the core functionality for the cast gateway:
//! - mDNS discovery of cast-capable media displays
//! - A live device registry fed by discovery events
//! - Concurrent multi-device cast orchestration
//! - An HTTP API with static frontend serving and upstream pass-through
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP API (axum)                     │
//! │   devices list  │  cast  │  static  │  proxy        │
//! └────────┬────────────────────┬───────────────────────┘
//!          │                    │
//! ┌────────▼────────┐  ┌────────▼────────────────────────┐
//! │ Device Registry │  │        Cast Orchestrator        │
//! │  (mDNS events)  │  │  resolve → connect → quit →     │
//! │                 │  │  settle → launch, per device    │
//! └────────┬────────┘  └────────┬────────────────────────┘
//!          │                    │
//! ┌────────▼────────────────────▼───────────────────────┐
//! │              Transport (HTTP control)                │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cast;
pub mod config;
pub mod daemon;
pub mod discovery;
pub mod error;
pub mod transport;

pub use cast::{CastOrchestrator, CastOutcome, CastRequest, CastStatus};
pub use config::Config;
pub use daemon::Daemon;
pub use discovery::{
    DeviceDescriptor, DeviceRegistry, DiscoveryEvent, MdnsBrowser, SharedRegistry,
};
pub use error::{Error, Result};
pub use transport::{CastSession, CastTransport, HttpCastTransport};
