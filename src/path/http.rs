//! Shared HTTP client and endpoint helpers for the fallback service.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// No request timeout is configured; callers that need bounded latency wrap
/// the operation themselves.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .default_headers(default_headers())
            .pool_max_idle_per_host(4)
            .build()
            .unwrap_or_default()
    })
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// Join the service base address and an operation name.
pub fn endpoint_url(service_url: &str, operation: &str) -> String {
    format!("{}/{operation}", service_url.trim_end_matches('/'))
}

/// Human-readable transport error for a non-success status.
pub fn status_error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_ignores_trailing_slash() {
        assert_eq!(
            endpoint_url("http://svc.local/auth/", "signInAnonymously"),
            "http://svc.local/auth/signInAnonymously"
        );
        assert_eq!(
            endpoint_url("http://svc.local", "signInWithGithub"),
            "http://svc.local/signInWithGithub"
        );
    }

    #[test]
    fn status_error_message_includes_body() {
        let msg = status_error_message(reqwest::StatusCode::SERVICE_UNAVAILABLE, "network down\n");
        assert_eq!(msg, "503 Service Unavailable: network down");
        assert_eq!(
            status_error_message(reqwest::StatusCode::NOT_FOUND, ""),
            "404 Not Found"
        );
    }
}
