//! Daemon - wires discovery, registry, orchestrator, and the API server

use std::sync::Arc;

use crate::api::{ApiServer, ApiState, proxy::UpstreamProxy};
use crate::cast::CastOrchestrator;
use crate::config::Config;
use crate::discovery::{DeviceRegistry, MdnsBrowser, registry::run_event_loop};
use crate::transport::{CastTransport, HttpCastTransport};
use crate::{Error, Result};

/// The cast gateway daemon
pub struct Daemon {
    config: Config,
}

impl Daemon {
    /// Create a new daemon instance
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the daemon until interrupted
    ///
    /// Discovery startup failure is fatal and surfaces here; once running,
    /// discovery hiccups only make the registry stale, never crash it.
    ///
    /// # Errors
    ///
    /// Returns error if discovery or the API server cannot start.
    pub async fn run(self) -> Result<()> {
        let (browser, events) = MdnsBrowser::start(&self.config.service_type)?;

        let registry = DeviceRegistry::shared();
        let transport: Arc<dyn CastTransport> = Arc::new(HttpCastTransport::new()?);

        let event_loop = tokio::spawn(run_event_loop(
            registry.clone(),
            transport.clone(),
            events,
        ));

        let orchestrator = Arc::new(CastOrchestrator::new(
            registry.clone(),
            transport,
            self.config.settle_delay,
        ));

        let upstream = match &self.config.upstream_url {
            Some(url) => {
                tracing::info!(url = %url, "upstream pass-through enabled");
                Some(UpstreamProxy::new(url)?)
            }
            None => None,
        };

        let callback_url = self.config.callback_url();
        let state = Arc::new(ApiState {
            registry,
            orchestrator,
            config: self.config,
            upstream,
        });

        let mut server = ApiServer::new(state).spawn();

        tracing::info!(url = %callback_url, "cast gateway ready");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
            }
            result = &mut server => {
                // The server ending on its own is a fault, not a shutdown
                browser.shutdown();
                event_loop.abort();
                return match result {
                    Ok(r) => r,
                    Err(e) => Err(Error::Config(format!("API server task failed: {e}"))),
                };
            }
        }

        browser.shutdown();
        event_loop.abort();
        server.abort();

        Ok(())
    }
}
