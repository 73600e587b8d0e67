//! Cast endpoint
//!
//! Accepts the selected device identifiers and commands each one to render
//! the gateway's callback page. The target URL is implicit: it is built from
//! the host's outward-facing address at request time, so a gateway that
//! changed networks keeps handing out a reachable URL.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::ApiState;
use crate::Error;
use crate::cast::{CastOutcome, CastRequest};

/// REST request for casting to a set of devices
#[derive(Debug, Deserialize)]
pub struct ConnectBody {
    #[serde(default)]
    pub devices: Vec<String>,
}

/// Error body returned for whole-call failures
fn error_body(message: String) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "error",
        "message": message,
    }))
}

/// Cast the gateway page to every requested device
///
/// # Errors
///
/// Returns 400 with an error body when no devices are selected; per-device
/// failures land in the outcome list, never in the response status.
pub async fn connect(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<ConnectBody>,
) -> Result<Json<Vec<CastOutcome>>, (StatusCode, Json<serde_json::Value>)> {
    let request = CastRequest {
        devices: body.devices,
        url: state.config.callback_url(),
        content_type: state.config.cast_content_type.clone(),
        title: state.config.cast_title.clone(),
    };

    match state.orchestrator.cast(request).await {
        Ok(outcomes) => Ok(Json(outcomes)),
        Err(Error::InvalidRequest(message)) => {
            Err((StatusCode::BAD_REQUEST, error_body(message)))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            error_body(e.to_string()),
        )),
    }
}
