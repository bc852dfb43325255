use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::connection::NodeConnection;
use crate::error::{CritterSdkError, Result};

/// Parsed, validated contract interface description.
///
/// The description is fixed at build time; a malformed one is a
/// startup-fatal condition, not something the session can recover from.
#[derive(Debug, PartialEq, Eq)]
pub struct InterfaceSpec {
    name: String,
    messages: Vec<Message>,
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
struct Message {
    label: String,
    selector: String,
    mutates: bool,
}

#[derive(Deserialize)]
struct InterfaceDoc {
    name: String,
    messages: Vec<Message>,
}

impl InterfaceSpec {
    pub fn parse(interface_json: &str) -> Result<Self> {
        let doc: InterfaceDoc = serde_json::from_str(interface_json)
            .map_err(|err| CritterSdkError::Interface(err.to_string()))?;

        if doc.messages.is_empty() {
            return Err(CritterSdkError::Interface(format!(
                "interface `{}` declares no messages",
                doc.name
            )));
        }

        for message in &doc.messages {
            let hex_part = message.selector.strip_prefix("0x").ok_or_else(|| {
                CritterSdkError::Interface(format!(
                    "selector for `{}` must start with 0x",
                    message.label
                ))
            })?;
            let bytes = hex::decode(hex_part).map_err(|err| {
                CritterSdkError::Interface(format!(
                    "selector for `{}` is not hex: {err}",
                    message.label
                ))
            })?;
            if bytes.len() != 4 {
                return Err(CritterSdkError::Interface(format!(
                    "selector for `{}` must be 4 bytes",
                    message.label
                )));
            }
            let duplicates = doc
                .messages
                .iter()
                .filter(|other| other.label == message.label)
                .count();
            if duplicates > 1 {
                return Err(CritterSdkError::Interface(format!(
                    "duplicate message label `{}`",
                    message.label
                )));
            }
        }

        Ok(Self {
            name: doc.name,
            messages: doc.messages,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn message(&self, label: &str) -> Result<&Message> {
        self.messages
            .iter()
            .find(|message| message.label == label)
            .ok_or_else(|| {
                CritterSdkError::Interface(format!(
                    "interface `{}` has no message `{label}`",
                    self.name
                ))
            })
    }
}

/// Options attached to a state-changing call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallOptions {
    /// Balance transferred with the call; only useful on payable messages.
    pub value: u128,
    pub gas_limit: u64,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            value: 0,
            gas_limit: 0,
        }
    }
}

/// A state-changing call built by [`ContractHandle::tx`], waiting for a
/// signing agent. Carries the node connection so the agent can transmit
/// without holding its own client.
#[derive(Clone)]
pub struct SignableCall {
    pub(crate) client: Arc<dyn NodeConnection>,
    pub address: String,
    pub selector: String,
    pub options: CallOptions,
    pub args: Value,
}

impl SignableCall {
    /// Canonical byte encoding the signing agent signs over.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        let envelope = json!({
            "address": self.address,
            "selector": self.selector,
            "value": self.options.value.to_string(),
            "gas_limit": self.options.gas_limit,
            "args": self.args,
        });
        Ok(serde_json::to_vec(&envelope)?)
    }
}

impl fmt::Debug for SignableCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignableCall")
            .field("address", &self.address)
            .field("selector", &self.selector)
            .field("options", &self.options)
            .field("args", &self.args)
            .finish()
    }
}

/// A signed call in the form the node accepts for submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignedCall {
    pub address: String,
    pub selector: String,
    pub args: Value,
    pub value: String,
    pub gas_limit: u64,
    pub signer: String,
    pub signature: String,
}

/// Bound capability over a live connection and a contract interface.
///
/// Read calls go through [`ContractHandle::query`]; write calls are built
/// with [`ContractHandle::tx`] and handed to a signing agent. Handles are
/// immutable once constructed; clones share the underlying connection.
#[derive(Clone)]
pub struct ContractHandle {
    client: Arc<dyn NodeConnection>,
    address: String,
    interface: Arc<InterfaceSpec>,
}

impl ContractHandle {
    /// Bind a contract at `address` through `client`.
    ///
    /// Fails with [`CritterSdkError::Interface`] if the interface
    /// description is malformed.
    pub fn bind(
        client: Arc<dyn NodeConnection>,
        interface_json: &str,
        address: &str,
    ) -> Result<Self> {
        let interface = InterfaceSpec::parse(interface_json)?;
        Ok(Self {
            client,
            address: address.to_string(),
            interface: Arc::new(interface),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Execute a read-only message and decode its output.
    pub async fn query<T: DeserializeOwned>(&self, method: &str, args: Value) -> Result<T> {
        let message = self.interface.message(method)?;
        if message.mutates {
            return Err(CritterSdkError::Interface(format!(
                "message `{method}` is not a read call"
            )));
        }

        let output = self
            .client
            .contract_call(&self.address, &message.selector, args)
            .await
            .map_err(|err| CritterSdkError::Query(err.to_string()))?;
        serde_json::from_value(output)
            .map_err(|err| CritterSdkError::Query(format!("undecodable output: {err}")))
    }

    /// Build a state-changing call for a mutating message.
    pub fn tx(&self, method: &str, options: CallOptions, args: Value) -> Result<SignableCall> {
        let message = self.interface.message(method)?;
        if !message.mutates {
            return Err(CritterSdkError::Interface(format!(
                "message `{method}` is not a state-changing call"
            )));
        }

        Ok(SignableCall {
            client: Arc::clone(&self.client),
            address: self.address.clone(),
            selector: message.selector.clone(),
            options,
            args,
        })
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("address", &self.address)
            .field("interface", &self.interface.name())
            .finish()
    }
}

impl PartialEq for ContractHandle {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.interface.name() == other.interface.name()
    }
}
