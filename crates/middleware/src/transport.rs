//! Default [`Transport`] implementation over `reqwest`.

use async_trait::async_trait;
use jwtgate_types::error::Result;
use jwtgate_types::{GateError, Transport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

/// A [`Transport`] issuing real HTTP calls through a shared `reqwest`
/// client. No retries or timeouts beyond the client's own defaults.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a transport over a preconfigured client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<Value> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| GateError::Http(format!("invalid method: {method}")))?;

        // `insert` replaces on duplicate names, giving the last-write-wins
        // merge the Transport contract requires.
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| GateError::Http(format!("invalid header name: {name}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| GateError::Http(format!("invalid value for header {name}")))?;
            header_map.insert(name, value);
        }

        let mut request = self.client.request(method, url).headers(header_map);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GateError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GateError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| GateError::Http(e.to_string()))?;
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_method_rejected_before_send() {
        let transport = HttpTransport::new();
        let err = transport
            .execute("NOT A METHOD", "http://localhost/x", None, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::Http(_)));
        assert!(err.to_string().contains("invalid method"));
    }

    #[tokio::test]
    async fn test_invalid_header_name_rejected_before_send() {
        let transport = HttpTransport::new();
        let err = transport
            .execute(
                "GET",
                "http://localhost/x",
                None,
                &[("bad header".to_string(), "v".to_string())],
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid header name"));
    }
}
