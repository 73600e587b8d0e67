//! Shared helpers for integration tests

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use cast_gateway::{
    CastSession, CastTransport, DeviceDescriptor, DeviceRegistry, Error, Result, SharedRegistry,
};

/// Scripted behavior of the mock transport for one device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum DeviceScript {
    /// Every step succeeds
    Ok,
    /// Connect raises the distinguished connectivity error
    RefuseConnection,
    /// Connect succeeds but the launch command fails
    FailLaunch,
    /// Quit fails with a command error; launch still succeeds
    FailQuit,
}

/// Transport double driven by per-device scripts; devices without a script
/// succeed at every step.
pub struct MockTransport {
    scripts: HashMap<String, DeviceScript>,
    pub connects: AtomicUsize,
    pub forgotten: std::sync::Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new() -> Arc<Self> {
        Self::with_scripts([])
    }

    pub fn with_scripts(
        scripts: impl IntoIterator<Item = (&'static str, DeviceScript)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            scripts: scripts
                .into_iter()
                .map(|(id, script)| (id.to_string(), script))
                .collect(),
            connects: AtomicUsize::new(0),
            forgotten: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CastTransport for MockTransport {
    async fn connect(&self, device: &DeviceDescriptor) -> Result<Box<dyn CastSession>> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        let script = self
            .scripts
            .get(&device.id)
            .copied()
            .unwrap_or(DeviceScript::Ok);

        if script == DeviceScript::RefuseConnection {
            return Err(Error::Connection(format!(
                "device {} refused connection",
                device.id
            )));
        }

        Ok(Box::new(MockSession { script }))
    }

    async fn forget(&self, device_id: &str) -> Result<()> {
        self.forgotten
            .lock()
            .unwrap()
            .push(device_id.to_string());
        Ok(())
    }
}

struct MockSession {
    script: DeviceScript,
}

#[async_trait]
impl CastSession for MockSession {
    async fn quit_app(&mut self) -> Result<()> {
        if self.script == DeviceScript::FailQuit {
            return Err(Error::Device("quit rejected".to_string()));
        }
        Ok(())
    }

    async fn play_media(&mut self, _url: &str, _content_type: &str, _title: &str) -> Result<()> {
        if self.script == DeviceScript::FailLaunch {
            return Err(Error::Device("launch rejected".to_string()));
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Build a shared registry pre-populated with (id, name) devices
#[allow(dead_code)]
pub async fn registry_with(devices: &[(&str, &str)]) -> SharedRegistry {
    let registry = DeviceRegistry::shared();
    {
        let mut reg = registry.write().await;
        for (id, name) in devices {
            reg.on_device_found(id, name, None);
        }
    }
    registry
}
