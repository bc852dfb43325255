//! Builds, submits, and tracks state-changing calls.
//!
//! Per submitted transaction the machine runs
//! `Idle -> Constructing -> Submitted -> {InBlock -> Finalized} | Rejected`.
//! The ledger drives the confirmation stages; the coordinator consumes
//! them as a stream with ordinary sequential control flow.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::constants::MINT_GAS_LIMIT;
use crate::core::contract::CallOptions;
use crate::core::signer::SigningAgent;
use crate::error::{CritterSdkError, Result};
use crate::notify::NoticeSender;
use crate::session::{Session, SessionAction};
use crate::types::{token_id, MintSeed, TransactionStatus};

pub struct TransactionCoordinator {
    session: Session,
    agent: Arc<dyn SigningAgent>,
    notices: NoticeSender,
    shutdown_rx: watch::Receiver<bool>,
}

impl TransactionCoordinator {
    pub fn new(
        session: Session,
        agent: Arc<dyn SigningAgent>,
        notices: NoticeSender,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            session,
            agent,
            notices,
            shutdown_rx,
        }
    }

    /// Submit a mint call for `seed` and track its confirmation lifecycle.
    ///
    /// Fails with [`CritterSdkError::Precondition`] before any network
    /// traffic if no contract is bound or no account is selected. On
    /// success the returned handle joins the tracking task, which ends at
    /// the first terminal stage.
    ///
    /// Every confirmation stage (`InBlock`, `Finalized`) bumps the session
    /// activity counter, so one successful mint refreshes the owned-token
    /// list twice. The eager first refresh is intended: ownership becomes
    /// visible at the earliest confirmation signal instead of waiting for
    /// finality.
    pub async fn submit_mint(&self, seed: MintSeed) -> Result<JoinHandle<()>> {
        let state = self.session.snapshot();
        let contract = state
            .contract
            .clone()
            .ok_or_else(|| CritterSdkError::Precondition("no contract bound".to_string()))?;
        let account = state
            .selected_account
            .clone()
            .ok_or_else(|| CritterSdkError::Precondition("no account selected".to_string()))?;

        let token = token_id(&seed);
        let options = CallOptions {
            value: 0,
            gas_limit: MINT_GAS_LIMIT,
        };
        let call = contract.tx("mint", options, json!({ "seed": token }))?;

        info!(token = %token, signer = %account.address, "submitting mint");
        let statuses = match self.agent.sign_and_submit(call, &account).await {
            Ok(statuses) => statuses,
            Err(error) => {
                self.notices.error(format!("mint failed: {error}"));
                return Err(error);
            }
        };

        let session = self.session.clone();
        let notices = self.notices.clone();
        let shutdown_rx = self.shutdown_rx.clone();
        Ok(tokio::spawn(track_confirmations(
            statuses,
            session,
            notices,
            shutdown_rx,
            token,
        )))
    }
}

async fn track_confirmations(
    mut statuses: mpsc::Receiver<TransactionStatus>,
    session: Session,
    notices: NoticeSender,
    mut shutdown_rx: watch::Receiver<bool>,
    token: String,
) {
    let short = &token[..8.min(token.len())];
    loop {
        let status = tokio::select! {
            biased;
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
                continue;
            }
            status = statuses.recv() => match status {
                Some(status) => status,
                None => break,
            },
        };

        match status {
            TransactionStatus::Constructed => {}
            TransactionStatus::Submitted => {
                notices.info(format!("mint {short}: submitted to the network"));
            }
            TransactionStatus::InBlock => {
                notices.info(format!("mint {short}: included in a block"));
                session.dispatch(SessionAction::ActivityTick);
            }
            TransactionStatus::Finalized => {
                notices.info(format!("mint {short}: finalized"));
                session.dispatch(SessionAction::ActivityTick);
                break;
            }
            TransactionStatus::Rejected => {
                warn!(token = %token, "mint rejected");
                notices.error(format!("mint {short}: rejected"));
                break;
            }
        }
    }
}
