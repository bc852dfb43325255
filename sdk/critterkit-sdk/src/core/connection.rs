use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::contract::SignedCall;
use crate::error::Result;
use crate::types::{CallHash, LedgerCallStatus};

#[async_trait]
pub trait NodeConnection: Send + Sync {
    /// Execute a read-only contract call and return its untyped output.
    async fn contract_call(&self, address: &str, selector: &str, args: Value) -> Result<Value>;

    /// Transmit a signed state-changing call; the returned hash is used to
    /// poll confirmation status.
    async fn submit_call(&self, call: &SignedCall) -> Result<CallHash>;

    /// Current confirmation status of a previously submitted call.
    async fn call_status(&self, hash: &CallHash) -> Result<LedgerCallStatus>;
}

/// Opens the session's connection to a ledger node.
///
/// Single attempt: callers decide whether (and when) to retry. The handle
/// stays open for the life of the session.
#[async_trait]
pub trait NodeConnector: Send + Sync {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn NodeConnection>>;
}
