use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::core::connection::{NodeConnection, NodeConnector};
use crate::core::contract::SignedCall;
use crate::error::{CritterSdkError, Result};
use crate::types::{CallHash, LedgerCallStatus};

const JSONRPC_VERSION: &str = "2.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct ContractCallResponse {
    output: Value,
}

#[derive(Deserialize)]
struct SubmitCallResponse {
    hash: String,
}

#[derive(Deserialize)]
struct CallStatusResponse {
    status: LedgerCallStatus,
}

/// Typed JSON-RPC client for a ledger node.
#[derive(Clone)]
pub struct HttpNodeClient {
    inner: Client,
    url: Url,
}

impl HttpNodeClient {
    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &Url {
        &self.url
    }

    /// Issues a raw JSON-RPC call returning the untyped result payload.
    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let payload = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id: 1,
            method,
            params,
        };

        let response = self.inner.post(self.url.clone()).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(CritterSdkError::Connection(format!(
                "node answered http status {}",
                response.status()
            )));
        }

        let response: JsonRpcResponse = response.json().await?;
        if let Some(error) = response.error {
            return Err(CritterSdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| CritterSdkError::Connection("empty rpc response".to_string()))
    }

    /// Issues a JSON-RPC call and deserialises the result into `R`.
    async fn call<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R> {
        let value = self.request(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl NodeConnection for HttpNodeClient {
    async fn contract_call(&self, address: &str, selector: &str, args: Value) -> Result<Value> {
        let params = json!({ "address": address, "selector": selector, "args": args });
        let response: ContractCallResponse = self.call("contract_call", params).await?;
        Ok(response.output)
    }

    async fn submit_call(&self, call: &SignedCall) -> Result<CallHash> {
        let response: SubmitCallResponse = self
            .call("author_submitCall", serde_json::to_value(call)?)
            .await?;
        Ok(CallHash(response.hash))
    }

    async fn call_status(&self, hash: &CallHash) -> Result<LedgerCallStatus> {
        let response: CallStatusResponse = self
            .call("chain_callStatus", json!({ "hash": hash.0 }))
            .await?;
        Ok(response.status)
    }
}

/// Dial a ledger node and verify it is alive.
///
/// Single attempt: a failed dial surfaces as
/// [`CritterSdkError::Connection`] and the session stays not-ready until
/// restarted. No retry or backoff happens here.
pub async fn connect(endpoint: &str) -> Result<HttpNodeClient> {
    let url = Url::parse(endpoint)
        .map_err(|err| CritterSdkError::Connection(format!("invalid endpoint {endpoint}: {err}")))?;
    let inner = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let client = HttpNodeClient { inner, url };

    client.request("system_health", Value::Null).await?;
    info!(endpoint, "connected to ledger node");

    Ok(client)
}

/// Production [`NodeConnector`] backed by [`connect`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpConnector;

#[async_trait]
impl NodeConnector for HttpConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn NodeConnection>> {
        let client = connect(endpoint).await?;
        Ok(Arc::new(client))
    }
}
