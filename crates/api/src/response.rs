//! Shared response envelope types for API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vidu_pipeline::Launch;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Answer to a generation request.
///
/// A scheduled generation is `202 Accepted` with `{ "started": true }` (plus
/// whatever the engine returned under `data`); a no-op is `200 OK` with
/// `{ "started": false, "reason": ... }`.
#[derive(Debug, Serialize)]
pub struct LaunchResponse<T: Serialize> {
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> From<Launch<T>> for LaunchResponse<T> {
    fn from(launch: Launch<T>) -> Self {
        match launch {
            Launch::Started(data) => Self {
                started: true,
                reason: None,
                data: Some(data),
            },
            Launch::Skipped(reason) => Self {
                started: false,
                reason: Some(reason),
                data: None,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for LaunchResponse<T> {
    fn into_response(self) -> Response {
        let status = if self.started {
            StatusCode::ACCEPTED
        } else {
            StatusCode::OK
        };
        (status, Json(self)).into_response()
    }
}
