use axum::http::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::error::{AppError, AppResult};

/// Client for the policy service's preflight endpoint.
///
/// The admin surface never evaluates policy itself; it forwards the caller's
/// body and bearer token verbatim and echoes whatever the policy service
/// decided, status code included.
#[derive(Debug, Clone)]
pub struct PolicyClient {
    http: Client,
    base: String,
}

impl PolicyClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// POST {base}/v1/actions/{key}/preflight, returning the upstream status and
    /// a JSON body: parsed when the upstream declares JSON, `{"raw": text}` for
    /// other content types, `{"error": text}` when declared JSON fails to parse.
    pub async fn preflight(
        &self,
        key: &str,
        authorization: Option<&str>,
        body: String,
    ) -> AppResult<(StatusCode, serde_json::Value)> {
        let mut url = Url::parse(&self.base)
            .map_err(|e| AppError::Internal(format!("invalid policy service URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("policy service URL cannot be a base".to_string()))?
            .extend(["v1", "actions", key, "preflight"]);

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(token) = authorization {
            request = request.header(AUTHORIZATION, token);
        }

        let response = request.send().await?;

        let status = StatusCode::from_u16(response.status().as_u16())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        let text = response.text().await?;

        let value = if is_json {
            match serde_json::from_str(&text) {
                Ok(v) => v,
                Err(_) => serde_json::json!({ "error": text }),
            }
        } else {
            serde_json::json!({ "raw": text })
        };

        Ok((status, value))
    }
}
