//! DIAL-style HTTP device control
//!
//! Media displays on the local network expose a small HTTP control surface
//! on the port advertised in their discovery record: an application list for
//! probing, a running-app resource that can be deleted, and a launch
//! endpoint that accepts a URL payload.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::{CastSession, CastTransport};
use crate::discovery::DeviceDescriptor;
use crate::{Error, Result};

/// Per-request timeout for device control calls
const CONTROL_TIMEOUT: Duration = Duration::from_secs(3);

/// Application resource used for launching media URLs
const MEDIA_APP: &str = "media";

/// HTTP control transport
pub struct HttpCastTransport {
    client: reqwest::Client,
}

impl HttpCastTransport {
    /// Create the transport with its dedicated HTTP client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CONTROL_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("failed to build control client: {e}")))?;
        Ok(Self { client })
    }
}

/// Classify a reqwest failure: transport-level problems are the
/// distinguished connectivity kind, anything else a device error.
fn classify(context: &str, e: &reqwest::Error) -> Error {
    if e.is_connect() || e.is_timeout() {
        Error::Connection(format!("{context}: {e}"))
    } else {
        Error::Device(format!("{context}: {e}"))
    }
}

#[async_trait]
impl CastTransport for HttpCastTransport {
    async fn connect(&self, device: &DeviceDescriptor) -> Result<Box<dyn CastSession>> {
        let Some(address) = device.address else {
            return Err(Error::Connection(format!(
                "no resolved address for device {}",
                device.id
            )));
        };

        let base = control_base(address);

        // Probe the application list so a dead endpoint fails here, at the
        // connect step, rather than mid-cast.
        self.client
            .get(format!("{base}/apps"))
            .send()
            .await
            .map_err(|e| Error::Connection(format!("device {} unreachable: {e}", device.id)))?;

        tracing::debug!(id = %device.id, address = %address, "control session established");

        Ok(Box::new(HttpCastSession {
            client: self.client.clone(),
            base,
            device_id: device.id.clone(),
        }))
    }
}

/// A live HTTP control session to one device
struct HttpCastSession {
    client: reqwest::Client,
    base: String,
    device_id: String,
}

/// Launch payload for the media application
#[derive(Debug, Serialize)]
struct LaunchBody<'a> {
    url: &'a str,
    #[serde(rename = "contentType")]
    content_type: &'a str,
    title: &'a str,
}

#[async_trait]
impl CastSession for HttpCastSession {
    async fn quit_app(&mut self) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/apps/run", self.base))
            .send()
            .await
            .map_err(|e| classify("quit app", &e))?;

        // 404 means nothing was running, which is the state we wanted
        if response.status().is_success() || response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(Error::Device(format!(
                "device {} rejected quit: {}",
                self.device_id,
                response.status()
            )))
        }
    }

    async fn play_media(&mut self, url: &str, content_type: &str, title: &str) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/apps/{MEDIA_APP}", self.base))
            .json(&LaunchBody {
                url,
                content_type,
                title,
            })
            .send()
            .await
            .map_err(|e| classify("launch media", &e))?;

        if response.status().is_success() {
            tracing::debug!(id = %self.device_id, url = %url, "media launched");
            Ok(())
        } else {
            Err(Error::Device(format!(
                "device {} rejected launch: {}",
                self.device_id,
                response.status()
            )))
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        // Sessions are plain HTTP; there is no connection state to tear down
        tracing::trace!(id = %self.device_id, "session dropped");
        Ok(())
    }
}

fn control_base(address: SocketAddr) -> String {
    format!("http://{address}")
}
