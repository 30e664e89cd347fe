/// HTTP endpoint for driving the host chain
///
/// Provides a small JSON API so external tools can submit readings and
/// query ledger state. Requests are served one at a time, which keeps every
/// ledger call serialized.
///
/// Endpoints:
/// - GET  /health                       - Service health check
/// - GET  /status                       - Ledger snapshot and block height
/// - GET  /reading/{id}                 - A single reading
/// - GET  /readings/{location}          - All readings for a location
/// - GET  /thresholds/{location}        - Thresholds in effect for a location
/// - GET  /alert/{location}             - Alert state for a location
/// - GET  /alerts                       - All active alerts
/// - GET  /provider/{id}                - Provider authorization
/// - POST /reading                      - Submit a reading (X-Sender header)
/// - POST /thresholds/{location}        - Replace thresholds
/// - POST /provider/{id}/authorize      - Authorize a provider
/// - POST /provider/{id}/revoke         - Revoke a provider
/// - POST /alert/{location}/clear       - Clear an alert
/// - POST /mine                         - Advance the block height

use crate::host::HostChain;
use crate::logging::{self, LogSource};
use crate::model::{LedgerError, ReadingId};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Header carrying the caller identity
pub const SENDER_HEADER: &str = "X-Sender";

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /status",
    "GET /reading/{id}",
    "GET /readings/{location}",
    "GET /thresholds/{location}",
    "GET /alert/{location}",
    "GET /alerts",
    "GET /provider/{id}",
    "POST /reading",
    "POST /thresholds/{location}",
    "POST /provider/{id}/authorize",
    "POST /provider/{id}/revoke",
    "POST /alert/{location}/clear",
    "POST /mine",
];

// ---------------------------------------------------------------------------
// Request Types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitReadingRequest {
    pub location_code: String,
    pub river_level: u64,
    pub rainfall_amount: u64,
    pub sensor_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThresholdRequest {
    pub river_level_threshold: u64,
    pub rainfall_threshold: u64,
    pub combined_threshold: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MineRequest {
    pub blocks: Option<u64>,
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Routes one request against the host and returns `(status, body)`.
pub fn route(
    host: &mut HostChain,
    method: &str,
    url: &str,
    sender: Option<&str>,
    body: &str,
) -> (u16, serde_json::Value) {
    let path = url.split('?').next().unwrap_or("");
    let decoded = match decode_segments(path) {
        Ok(d) => d,
        Err(e) => return bad_request(&format!("Invalid percent-encoding in path {}: {}", path, e)),
    };
    let segments: Vec<&str> = decoded.iter().map(|s| s.as_str()).collect();

    match (method, segments.as_slice()) {
        ("GET", ["health"]) => (
            200,
            json!({
                "status": "ok",
                "service": "flomon_ledger",
                "version": env!("CARGO_PKG_VERSION")
            }),
        ),
        ("GET", ["status"]) => (
            200,
            json!({
                "block_height": host.block_height(),
                "ledger": host.ledger().snapshot()
            }),
        ),
        ("GET", ["reading", id]) => match id.parse::<ReadingId>() {
            Ok(id) => match host.ledger().reading(id) {
                Some(reading) => (200, json!({ "reading_id": id, "reading": reading })),
                None => not_found(&format!("Reading {} not found", id)),
            },
            Err(_) => bad_request(&format!("Invalid reading id: {}", id)),
        },
        ("GET", ["readings", location]) => {
            let readings: Vec<serde_json::Value> = host
                .ledger()
                .readings_for_location(location)
                .into_iter()
                .map(|(id, r)| json!({ "reading_id": id, "reading": r }))
                .collect();
            (200, json!({ "location_code": location, "readings": readings }))
        }
        ("GET", ["thresholds", location]) => (
            200,
            json!({
                "location_code": location,
                "set": host.ledger().flood_thresholds(location).is_some(),
                "thresholds": host.ledger().effective_thresholds(location)
            }),
        ),
        ("GET", ["alert", location]) => match host.ledger().flood_alert(location) {
            Some(a) => (200, json!({ "location_code": location, "alert": a })),
            None => not_found(&format!("No flood alert for {}", location)),
        },
        ("GET", ["alerts"]) => (200, json!({ "active_alerts": host.ledger().active_alerts() })),
        ("GET", ["provider", id]) => (
            200,
            json!({ "provider": id, "authorized": host.ledger().is_provider_authorized(id) }),
        ),
        ("POST", ["reading"]) => handle_submit(host, sender, body),
        ("POST", ["thresholds", location]) => match serde_json::from_str::<ThresholdRequest>(body) {
            Ok(req) => {
                host.set_flood_thresholds(
                    sender.unwrap_or("anonymous"),
                    location,
                    req.river_level_threshold,
                    req.rainfall_threshold,
                    req.combined_threshold,
                );
                (200, json!({ "ok": true, "location_code": location }))
            }
            Err(e) => bad_request(&format!("Invalid threshold body: {}", e)),
        },
        ("POST", ["provider", id, "authorize"]) => {
            host.authorize_provider(id);
            (200, json!({ "ok": true, "provider": id, "authorized": true }))
        }
        ("POST", ["provider", id, "revoke"]) => {
            host.revoke_provider(id);
            (200, json!({ "ok": true, "provider": id, "authorized": false }))
        }
        ("POST", ["alert", location, "clear"]) => match host.clear_flood_alert(location) {
            Ok(()) => (200, json!({ "ok": true, "location_code": location })),
            Err(e) => ledger_error(&e),
        },
        ("POST", ["mine"]) => {
            let req = if body.trim().is_empty() {
                Ok(MineRequest::default())
            } else {
                serde_json::from_str::<MineRequest>(body)
            };
            match req {
                Ok(req) => {
                    let height = host.advance_blocks(req.blocks.unwrap_or(1));
                    (200, json!({ "block_height": height }))
                }
                Err(e) => bad_request(&format!("Invalid mine body: {}", e)),
            }
        }
        _ => (
            404,
            json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS
            }),
        ),
    }
}

/// Splits a path into percent-decoded segments.
fn decode_segments(path: &str) -> Result<Vec<String>, std::string::FromUtf8Error> {
    path.trim_matches('/')
        .split('/')
        .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()))
        .collect()
}

fn handle_submit(host: &mut HostChain, sender: Option<&str>, body: &str) -> (u16, serde_json::Value) {
    let Some(sender) = sender else {
        return bad_request(&format!("{} header required", SENDER_HEADER));
    };

    let req = match serde_json::from_str::<SubmitReadingRequest>(body) {
        Ok(req) => req,
        Err(e) => return bad_request(&format!("Invalid reading body: {}", e)),
    };

    match host.submit_reading(
        sender,
        &req.location_code,
        req.river_level,
        req.rainfall_amount,
        &req.sensor_id,
    ) {
        Ok(id) => {
            let is_flood = host
                .ledger()
                .reading(id)
                .map(|r| r.is_flood_condition)
                .unwrap_or(false);
            (200, json!({ "reading_id": id, "is_flood_condition": is_flood }))
        }
        Err(e) => ledger_error(&e),
    }
}

fn ledger_error(err: &LedgerError) -> (u16, serde_json::Value) {
    let status = match err {
        LedgerError::Unauthorized { .. } => 403,
        LedgerError::NotFound { .. } => 404,
    };
    (status, json!({ "error": err.to_string(), "code": err.code() }))
}

fn not_found(message: &str) -> (u16, serde_json::Value) {
    (404, json!({ "error": message }))
}

fn bad_request(message: &str) -> (u16, serde_json::Value) {
    (400, json!({ "error": message }))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port
pub fn start_endpoint_server(port: u16, mut host: HostChain) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    logging::info(
        LogSource::Endpoint,
        None,
        &format!("HTTP endpoint listening on http://0.0.0.0:{}", port),
    );

    for mut request in server.incoming_requests() {
        let method = request.method().as_str().to_string();
        let url = request.url().to_string();
        let sender = request
            .headers()
            .iter()
            .find(|h| h.field.equiv(SENDER_HEADER))
            .map(|h| h.value.as_str().to_string());

        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            logging::warn(LogSource::Endpoint, None, &format!("Failed to read body: {}", e));
        }

        let (status, json) = route(&mut host, &method, &url, sender.as_deref(), &body);
        logging::debug(LogSource::Endpoint, None, &format!("{} {} -> {}", method, url, status));

        if let Err(e) = request.respond(create_response(status, &json)) {
            logging::error(LogSource::Endpoint, None, &format!("Failed to send response: {}", e));
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: &serde_json::Value) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(json).unwrap_or_else(|_| "{}".to_string());
    let response = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(status_code));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
