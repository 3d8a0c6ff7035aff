//! Fake Key Vault, Entra ID and service health endpoints on wiremock.
//!
//! wiremock serves from its own thread, so the blocking clients under test
//! talk to it directly. The runtime kept here only drives mounting and
//! request inspection.

use std::time::Duration;

use serde_json::json;
use tokio::runtime::Runtime;
use wiremock::matchers::{any, header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Access token handed out by the fake token endpoint.
pub const TEST_TOKEN: &str = "test-access-token";

/// A running fake server with its own setup runtime.
pub struct FakeServer {
    server: MockServer,
    runtime: Runtime,
}

impl FakeServer {
    /// A server with nothing mounted: every request gets 404.
    pub fn empty() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("failed to build test runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    /// Answer every request with `handler`.
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> ResponseTemplate + Send + Sync + 'static,
    {
        let server = Self::empty();
        server.mount(Mock::given(any()).respond_with(handler));
        server
    }

    /// A Key Vault plus token endpoint holding `secrets`.
    ///
    /// - `POST /{tenant}/oauth2/v2.0/token` issues [`TEST_TOKEN`]
    /// - `GET /secrets/{name}` requires that token, then answers 200 or 404
    /// - `GET /health` answers 200
    pub fn vault(secrets: &[(&str, &str)]) -> Self {
        let server = Self::empty();
        let bearer = format!("Bearer {}", TEST_TOKEN);

        server.mount(
            Mock::given(method("POST"))
                .and(path_regex(r"/oauth2/v2\.0/token$"))
                .respond_with(token_response()),
        );

        for (name, value) in secrets {
            server.mount(
                Mock::given(method("GET"))
                    .and(path(format!("/secrets/{}", name)))
                    .and(header("authorization", bearer.as_str()))
                    .respond_with(secret_response(name, value)),
            );
        }

        server.mount(
            Mock::given(method("GET"))
                .and(path_regex(r"^/secrets/"))
                .and(header("authorization", bearer.as_str()))
                .respond_with(|req: &Request| {
                    let name = req.url.path().trim_start_matches("/secrets/").to_string();
                    ResponseTemplate::new(404).set_body_json(json!({
                        "error": {
                            "code": "SecretNotFound",
                            "message": format!("A secret with (name/id) {} was not found in this key vault.", name),
                        }
                    }))
                })
                .with_priority(6),
        );

        server.mount(
            Mock::given(method("GET"))
                .and(path_regex(r"^/secrets/"))
                .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                    "error": {
                        "code": "Unauthorized",
                        "message": "AKV10000: Request is missing a Bearer or PoP token.",
                    }
                })))
                .with_priority(7),
        );

        server.mount(
            Mock::given(method("GET"))
                .and(path("/health"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"}))),
        );

        server
    }

    /// Mount an extra mock.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    pub fn port(&self) -> u16 {
        self.server.address().port()
    }

    /// Base URL, no trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }

    /// Requests whose path starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.path().starts_with(prefix))
            .count()
    }
}

/// Successful Entra token response for [`TEST_TOKEN`].
pub fn token_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "token_type": "Bearer",
        "expires_in": 3599,
        "access_token": TEST_TOKEN,
    }))
}

/// Key Vault secret bundle for `name`.
pub fn secret_response(name: &str, value: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "value": value,
        "id": format!("https://fake.vault.azure.net/secrets/{}/0123456789abcdef", name),
        "attributes": {"enabled": true},
    }))
}

/// Azure style error body with `status`.
pub fn error_response(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"error": {"message": message}}))
}

/// `response`, sent after `delay`.
pub fn delayed(response: ResponseTemplate, delay: Duration) -> ResponseTemplate {
    response.set_delay(delay)
}

/// Header value as text.
pub fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Body as text.
pub fn body_text(request: &Request) -> String {
    String::from_utf8_lossy(&request.body).into_owned()
}

/// Query string, or empty.
pub fn query(request: &Request) -> &str {
    request.url.query().unwrap_or_default()
}
