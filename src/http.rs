//! Helpers shared by the vendor HTTP layers.

use reqwest::header::HeaderMap;
use std::collections::BTreeMap;

/// Headers whose values never reach the logs.
const SENSITIVE_HEADERS: [&str; 3] = ["x-tsign-open-ca-signature", "token", "authorization"];

/// Random 16-hex-digit identifier used to correlate log lines of one call.
pub(crate) fn operation_id() -> String {
    let id = uuid::Uuid::new_v4();
    hex::encode(&id.as_bytes()[..8])
}

/// Milliseconds since the Unix epoch, as a string.
pub(crate) fn timestamp_millis() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Render headers for logging with credentials masked.
pub(crate) fn sanitize_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = name.as_str().to_ascii_lowercase();
            let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "***".to_string()
            } else {
                String::from_utf8_lossy(value.as_bytes()).into_owned()
            };
            (name, value)
        })
        .collect()
}
