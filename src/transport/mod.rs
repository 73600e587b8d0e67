//! Device control transport
//!
//! The orchestrator talks to devices exclusively through these traits; the
//! wire protocol behind them is interchangeable. [`http::HttpCastTransport`]
//! is the shipped implementation; tests substitute in-memory doubles.

pub mod http;

pub use http::HttpCastTransport;

use async_trait::async_trait;

use crate::Result;
use crate::discovery::DeviceDescriptor;

/// Connects to devices and hands out live sessions
#[async_trait]
pub trait CastTransport: Send + Sync {
    /// Establish a session to the device and wait for it to be ready.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Connection`] when the device cannot be
    /// reached - the distinguished connectivity kind callers rely on.
    async fn connect(&self, device: &DeviceDescriptor) -> Result<Box<dyn CastSession>>;

    /// Drop any live handle or cached state for a device that left the
    /// network. Best-effort; stateless transports may no-op.
    ///
    /// # Errors
    ///
    /// Returns error if cleanup fails; callers log and swallow it.
    async fn forget(&self, device_id: &str) -> Result<()> {
        let _ = device_id;
        Ok(())
    }
}

/// A live control session to one device, valid until disconnected or the
/// device is lost
#[async_trait]
pub trait CastSession: Send {
    /// Stop whatever application is currently running on the device
    ///
    /// # Errors
    ///
    /// Returns error if the command fails; [`crate::Error::Connection`] when
    /// the session itself is dead.
    async fn quit_app(&mut self) -> Result<()>;

    /// Command the device's default media surface to render the URL
    ///
    /// # Errors
    ///
    /// Returns error if the launch command fails.
    async fn play_media(&mut self, url: &str, content_type: &str, title: &str) -> Result<()>;

    /// Tear the session down. Best-effort; callers log and swallow errors.
    ///
    /// # Errors
    ///
    /// Returns error if the device rejects the teardown.
    async fn disconnect(&mut self) -> Result<()>;
}
