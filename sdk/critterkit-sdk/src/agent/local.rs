use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::AccountSource;
use crate::core::connection::NodeConnection;
use crate::core::contract::{SignableCall, SignedCall};
use crate::core::signer::SigningAgent;
use crate::error::{CritterSdkError, Result};
use crate::types::{Account, CallHash, LedgerCallStatus, TransactionStatus};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Consecutive status-poll failures tolerated before a tracked call is
/// reported as rejected.
const MAX_POLL_FAILURES: u32 = 10;

/// Deterministic identities used when no keystore is configured. Seeds are
/// fixed so addresses stay stable across runs and test environments.
const DEV_IDENTITIES: [(&str, u8); 3] = [("alice", 0x01), ("bob", 0x02), ("charlie", 0x03)];

#[derive(Deserialize)]
struct KeystoreEntry {
    name: String,
    seed: String,
}

struct Identity {
    name: String,
    key: SigningKey,
    address: String,
}

impl Identity {
    fn new(name: &str, seed: [u8; 32]) -> Self {
        let key = SigningKey::from_bytes(&seed);
        let address = format!("0x{}", hex::encode(key.verifying_key().to_bytes()));
        Self {
            name: name.to_string(),
            key,
            address,
        }
    }
}

/// Signing agent backed by local ed25519 key material.
///
/// Account source is a pure configuration switch: deterministic dev
/// identities, or a JSON keystore on disk. Signing and submission behave
/// identically for both.
pub struct LocalSigningAgent {
    identities: Vec<Identity>,
    poll_interval: Duration,
}

impl LocalSigningAgent {
    pub fn from_source(source: &AccountSource) -> Result<Self> {
        match source {
            AccountSource::DevIdentities => Ok(Self::with_dev_identities()),
            AccountSource::Keystore(path) => Self::from_keystore(path),
        }
    }

    /// Agent holding the fixed dev identities.
    pub fn with_dev_identities() -> Self {
        let identities = DEV_IDENTITIES
            .iter()
            .map(|(name, byte)| Identity::new(name, [*byte; 32]))
            .collect();
        Self {
            identities,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Agent loading identities from a JSON keystore file.
    ///
    /// The keystore is an array of `{ "name": ..., "seed": <64 hex chars> }`
    /// entries; listing order follows file order.
    pub fn from_keystore(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            CritterSdkError::Keystore(format!("unable to read {}: {err}", path.display()))
        })?;
        let entries: Vec<KeystoreEntry> = serde_json::from_str(&content).map_err(|err| {
            CritterSdkError::Keystore(format!("malformed keystore {}: {err}", path.display()))
        })?;

        let mut identities = Vec::with_capacity(entries.len());
        for entry in entries {
            let bytes = hex::decode(&entry.seed).map_err(|err| {
                CritterSdkError::Keystore(format!("seed for `{}` is not hex: {err}", entry.name))
            })?;
            let seed: [u8; 32] = bytes.try_into().map_err(|_| {
                CritterSdkError::Keystore(format!("seed for `{}` is not 32 bytes", entry.name))
            })?;
            identities.push(Identity::new(&entry.name, seed));
        }

        Ok(Self {
            identities,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the confirmation poll cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn identity(&self, address: &str) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|identity| identity.address == address)
    }
}

#[async_trait]
impl SigningAgent for LocalSigningAgent {
    async fn authorize(&self, app_name: &str) -> Result<()> {
        if self.identities.is_empty() {
            return Err(CritterSdkError::AuthorizationDenied(
                "keystore holds no identities".to_string(),
            ));
        }
        info!(app_name, "wallet access granted");
        Ok(())
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self
            .identities
            .iter()
            .map(|identity| Account {
                address: identity.address.clone(),
                display_name: Some(identity.name.clone()),
            })
            .collect())
    }

    async fn sign_and_submit(
        &self,
        call: SignableCall,
        account: &Account,
    ) -> Result<mpsc::Receiver<TransactionStatus>> {
        let identity = self.identity(&account.address).ok_or_else(|| {
            CritterSdkError::SubmissionRejected(format!(
                "unknown signing account {}",
                account.address
            ))
        })?;

        let payload = call.signing_payload()?;
        let signature = identity.key.sign(&payload);
        let signed = SignedCall {
            address: call.address.clone(),
            selector: call.selector.clone(),
            args: call.args.clone(),
            value: call.options.value.to_string(),
            gas_limit: call.options.gas_limit,
            signer: identity.address.clone(),
            signature: hex::encode(signature.to_bytes()),
        };

        let hash = call
            .client
            .submit_call(&signed)
            .await
            .map_err(|err| CritterSdkError::SubmissionRejected(err.to_string()))?;
        info!(hash = %hash, signer = %identity.address, "call submitted");

        let (status_tx, status_rx) = mpsc::channel(8);
        let client = Arc::clone(&call.client);
        let poll_interval = self.poll_interval;
        tokio::spawn(watch_confirmations(client, hash, status_tx, poll_interval));

        Ok(status_rx)
    }
}

/// Confirmation rank used to keep the emitted stream non-decreasing and
/// free of repeats even when the node reports the same stage twice.
fn stage_rank(status: TransactionStatus) -> u8 {
    match status {
        TransactionStatus::Constructed => 0,
        TransactionStatus::Submitted => 1,
        TransactionStatus::InBlock => 2,
        TransactionStatus::Finalized => 3,
        TransactionStatus::Rejected => 4,
    }
}

async fn watch_confirmations(
    client: Arc<dyn NodeConnection>,
    hash: CallHash,
    status_tx: mpsc::Sender<TransactionStatus>,
    poll_interval: Duration,
) {
    if status_tx.send(TransactionStatus::Submitted).await.is_err() {
        return;
    }

    let mut last = TransactionStatus::Submitted;
    let mut failures = 0u32;
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if status_tx.is_closed() {
            return;
        }

        let reported = match client.call_status(&hash).await {
            Ok(status) => {
                failures = 0;
                status
            }
            Err(error) => {
                failures += 1;
                warn!(hash = %hash, %error, failures, "confirmation poll failed");
                if failures >= MAX_POLL_FAILURES {
                    let _ = status_tx.send(TransactionStatus::Rejected).await;
                    return;
                }
                continue;
            }
        };

        let status = match reported {
            LedgerCallStatus::Pending => continue,
            LedgerCallStatus::InBlock => TransactionStatus::InBlock,
            LedgerCallStatus::Finalized => TransactionStatus::Finalized,
            LedgerCallStatus::Dropped => TransactionStatus::Rejected,
        };
        if stage_rank(status) <= stage_rank(last) {
            continue;
        }

        if status_tx.send(status).await.is_err() {
            return;
        }
        last = status;

        if status.is_terminal() {
            return;
        }
    }
}
