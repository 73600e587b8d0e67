//! Multi-device cast orchestration
//!
//! Drives every requested device through resolve -> connect -> quit current
//! app -> settle -> launch media, one concurrent task per device. Devices
//! are independent: a slow or unreachable device never delays or aborts the
//! others, and the caller always gets exactly one outcome per requested
//! identifier.

use std::sync::Arc;
use std::time::Duration;

use crate::discovery::{DeviceDescriptor, SharedRegistry};
use crate::transport::CastTransport;
use crate::{Error, Result};

use super::{CastOutcome, CastRequest, CastStatus};

/// Orchestrates cast requests against the registry and transport
pub struct CastOrchestrator {
    registry: SharedRegistry,
    transport: Arc<dyn CastTransport>,
    settle_delay: Duration,
}

impl CastOrchestrator {
    /// Create an orchestrator over the given registry and transport
    #[must_use]
    pub fn new(
        registry: SharedRegistry,
        transport: Arc<dyn CastTransport>,
        settle_delay: Duration,
    ) -> Self {
        Self {
            registry,
            transport,
            settle_delay,
        }
    }

    /// Cast the request's URL to every requested device concurrently.
    ///
    /// Returns one [`CastOutcome`] per requested identifier, in request
    /// order. Duplicate identifiers are each processed independently.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the device list is empty; this
    /// is the only whole-call error, raised before any transport activity.
    pub async fn cast(&self, request: CastRequest) -> Result<Vec<CastOutcome>> {
        if request.devices.is_empty() {
            return Err(Error::InvalidRequest(
                "Nenhum dispositivo selecionado.".to_string(),
            ));
        }

        tracing::info!(
            devices = request.devices.len(),
            url = %request.url,
            "cast requested"
        );

        let mut handles = Vec::with_capacity(request.devices.len());
        for id in &request.devices {
            let registry = self.registry.clone();
            let transport = self.transport.clone();
            let settle_delay = self.settle_delay;
            let id = id.clone();
            let url = request.url.clone();
            let content_type = request.content_type.clone();
            let title = request.title.clone();

            handles.push(tokio::spawn(async move {
                cast_one(
                    &registry,
                    transport.as_ref(),
                    settle_delay,
                    &id,
                    &url,
                    &content_type,
                    &title,
                )
                .await
            }));
        }

        let results = futures::future::join_all(handles).await;

        let mut outcomes = Vec::with_capacity(results.len());
        for (result, id) in results.into_iter().zip(request.devices) {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                // A panicked task must still yield its device's outcome
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "cast task failed");
                    outcomes.push(CastOutcome {
                        id,
                        status: CastStatus::Failure,
                        message: format!("internal error: {e}"),
                    });
                }
            }
        }

        Ok(outcomes)
    }
}

/// Run one device's full cast sequence to a terminal outcome. Never
/// returns an error - every failure mode maps to an outcome status.
async fn cast_one(
    registry: &SharedRegistry,
    transport: &dyn CastTransport,
    settle_delay: Duration,
    id: &str,
    url: &str,
    content_type: &str,
    title: &str,
) -> CastOutcome {
    let Some(device) = registry.read().await.resolve(id) else {
        return CastOutcome {
            id: id.to_string(),
            status: CastStatus::NotFound,
            message: format!("Dispositivo {id} n\u{e3}o encontrado na lista atual."),
        };
    };

    match drive_device(transport, settle_delay, &device, url, content_type, title).await {
        Ok(message) => {
            tracing::info!(id = %id, name = %device.name, "cast succeeded");
            CastOutcome {
                id: id.to_string(),
                status: CastStatus::Success,
                message,
            }
        }
        Err(e) if e.is_connection() => {
            tracing::warn!(id = %id, name = %device.name, error = %e, "device unreachable");
            CastOutcome {
                id: id.to_string(),
                status: CastStatus::ConnectionError,
                message: format!("Erro de conex\u{e3}o com {}: {e}", device.name),
            }
        }
        Err(e) => {
            tracing::warn!(id = %id, name = %device.name, error = %e, "cast failed");
            CastOutcome {
                id: id.to_string(),
                status: CastStatus::Failure,
                message: e.to_string(),
            }
        }
    }
}

/// Connect and push the URL to one resolved device.
///
/// Quit-current-app is preparation, not a correctness gate: a command error
/// there is logged and the flow proceeds, while a connectivity error ends
/// the attempt (the session is evidently dead). The settle delay gives the
/// device time to tear its app down, since the transport offers no
/// "stopped" confirmation.
async fn drive_device(
    transport: &dyn CastTransport,
    settle_delay: Duration,
    device: &DeviceDescriptor,
    url: &str,
    content_type: &str,
    title: &str,
) -> Result<String> {
    let mut session = transport.connect(device).await?;

    if let Err(e) = session.quit_app().await {
        if e.is_connection() {
            let _ = session.disconnect().await;
            return Err(e);
        }
        tracing::warn!(id = %device.id, error = %e, "quit app failed, launching anyway");
    }

    tokio::time::sleep(settle_delay).await;

    let played = session.play_media(url, content_type, title).await;

    if let Err(e) = session.disconnect().await {
        tracing::debug!(id = %device.id, error = %e, "session disconnect failed");
    }

    played?;
    Ok(format!("Transmitido para {}", device.name))
}
