use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::KodiConfig;
use crate::services::host::Host;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("host returned error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("response carried neither result nor error")]
    MissingResult,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u32,
}

impl<'a> RpcRequest<'a> {
    const fn new(method: &'a str, params: &'a Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,

    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,

    #[serde(default)]
    message: String,
}

impl RpcResponse {
    fn into_result(self) -> Result<Value, RpcError> {
        if let Some(err) = self.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }
        self.result.ok_or(RpcError::MissingResult)
    }
}

/// HTTP JSON-RPC gateway to a running Kodi instance.
#[derive(Debug, Clone)]
pub struct KodiClient {
    client: Client,
    rpc_url: String,
    credentials: Option<(String, Option<String>)>,
}

impl KodiClient {
    /// Creates a client for the endpoint in `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &KodiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("autofit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Kodi HTTP client: {e}"))?;

        Ok(Self {
            client,
            rpc_url: config.rpc_url.clone(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    /// Submits one request and returns its `result`.
    pub async fn execute(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        debug!("JSON-RPC -> {method} {params}");

        let mut request = self
            .client
            .post(&self.rpc_url)
            .json(&RpcRequest::new(method, params));

        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_deref());
        }

        let response: RpcResponse = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.into_result()
    }
}

#[async_trait::async_trait]
impl Host for KodiClient {
    async fn call(&self, method: &str, params: Value) -> Option<Value> {
        match self.execute(method, &params).await {
            Ok(result) => Some(result),
            Err(RpcError::Remote { code, message }) => {
                error!("JSON-RPC error on {method}: {code} {message}");
                None
            }
            Err(e) => {
                error!("Failed to execute JSON-RPC {method}: {e}");
                None
            }
        }
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_envelope() {
        let params = json!({"playerid": 1, "properties": ["videostreams"]});
        let body = serde_json::to_value(RpcRequest::new("Player.GetProperties", &params)).unwrap();

        assert_eq!(
            body,
            json!({
                "jsonrpc": "2.0",
                "method": "Player.GetProperties",
                "params": {"playerid": 1, "properties": ["videostreams"]},
                "id": 1
            })
        );
    }

    #[test]
    fn test_error_field_wins_over_result() {
        let response: RpcResponse = serde_json::from_value(json!({
            "id": 1,
            "jsonrpc": "2.0",
            "error": {"code": -32602, "message": "Invalid params."}
        }))
        .unwrap();

        match response.into_result() {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, -32602);
                assert_eq!(message, "Invalid params.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_result_is_unwrapped() {
        let response: RpcResponse =
            serde_json::from_value(json!({"id": 1, "jsonrpc": "2.0", "result": "OK"})).unwrap();
        assert_eq!(response.into_result().unwrap(), json!("OK"));

        let empty: RpcResponse = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(matches!(empty.into_result(), Err(RpcError::MissingResult)));
    }
}
