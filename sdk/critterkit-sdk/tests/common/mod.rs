#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::sleep;

use critterkit_sdk::core::constants::INTERFACE_JSON;
use critterkit_sdk::{
    CallHash, ContractHandle, CritterSdkError, LedgerCallStatus, NodeConnection, NodeConnector,
    Result, SignedCall,
};

/// One scripted answer for a read-only contract call.
pub struct QueryScript {
    pub delay: Duration,
    pub result: std::result::Result<Value, String>,
}

impl QueryScript {
    pub fn ok(tokens: &[&str]) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(json!(tokens)),
        }
    }

    pub fn ok_after(delay: Duration, tokens: &[&str]) -> Self {
        Self {
            delay,
            result: Ok(json!(tokens)),
        }
    }

    pub fn value(output: Value) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Ok(output),
        }
    }

    pub fn fail(message: &str) -> Self {
        Self {
            delay: Duration::ZERO,
            result: Err(message.to_string()),
        }
    }
}

/// Scripted ledger node: counts calls, records submissions, and replays
/// pre-programmed query answers and confirmation statuses.
#[derive(Default)]
pub struct MockNode {
    pub contract_calls: AtomicUsize,
    pub submissions: AtomicUsize,
    pub submitted: Mutex<Vec<SignedCall>>,
    queries: Mutex<VecDeque<QueryScript>>,
    statuses: Mutex<VecDeque<LedgerCallStatus>>,
}

impl MockNode {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_query(&self, script: QueryScript) {
        self.queries.lock().unwrap().push_back(script);
    }

    pub fn script_statuses(&self, statuses: &[LedgerCallStatus]) {
        self.statuses.lock().unwrap().extend(statuses.iter().copied());
    }

    pub fn contract_calls(&self) -> usize {
        self.contract_calls.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn last_submission(&self) -> Option<SignedCall> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NodeConnection for MockNode {
    async fn contract_call(&self, _address: &str, _selector: &str, _args: Value) -> Result<Value> {
        self.contract_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.queries.lock().unwrap().pop_front();
        match script {
            Some(script) => {
                if !script.delay.is_zero() {
                    sleep(script.delay).await;
                }
                match script.result {
                    Ok(output) => Ok(output),
                    Err(message) => Err(CritterSdkError::Connection(message)),
                }
            }
            None => Ok(json!([])),
        }
    }

    async fn submit_call(&self, call: &SignedCall) -> Result<CallHash> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(call.clone());
        Ok(CallHash(format!("0xhash{}", self.submissions())))
    }

    async fn call_status(&self, _hash: &CallHash) -> Result<LedgerCallStatus> {
        let status = self.statuses.lock().unwrap().pop_front();
        Ok(status.unwrap_or(LedgerCallStatus::Pending))
    }
}

/// Connector handing out one shared [`MockNode`], optionally slow or
/// failing.
pub struct MockConnector {
    node: Arc<MockNode>,
    delay: Duration,
    fail: bool,
}

impl MockConnector {
    pub fn new(node: Arc<MockNode>) -> Self {
        Self {
            node,
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl NodeConnector for MockConnector {
    async fn connect(&self, endpoint: &str) -> Result<Arc<dyn NodeConnection>> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        if self.fail {
            return Err(CritterSdkError::Connection(format!(
                "node {endpoint} unreachable"
            )));
        }
        Ok(self.node.clone())
    }
}

/// Bind a contract handle directly over a mock node.
pub fn test_contract(node: &Arc<MockNode>) -> ContractHandle {
    let client: Arc<dyn NodeConnection> = node.clone();
    ContractHandle::bind(client, INTERFACE_JSON, "0xtestcontract").expect("bind test contract")
}

/// Poll `condition` until it holds, panicking after a few seconds.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        sleep(Duration::from_millis(25)).await;
    }
    panic!("timed out waiting for {what}");
}
