//! Device listing endpoint

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use super::ApiState;
use crate::discovery::DeviceDescriptor;

/// REST response for one discovered device
#[derive(Debug, Serialize)]
pub struct DeviceResponse {
    pub id: String,
    pub name: String,
}

impl From<&DeviceDescriptor> for DeviceResponse {
    fn from(device: &DeviceDescriptor) -> Self {
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
        }
    }
}

/// List all currently discovered devices
pub async fn list_devices(State(state): State<Arc<ApiState>>) -> Json<Vec<DeviceResponse>> {
    let registry = state.registry.read().await;
    let devices: Vec<DeviceResponse> = registry
        .snapshot()
        .iter()
        .map(DeviceResponse::from)
        .collect();
    Json(devices)
}
