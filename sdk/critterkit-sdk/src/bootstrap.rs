//! Session bootstrap: wires the connection chain, the wallet gate, and the
//! token query worker around one [`Session`].

use std::sync::Arc;

use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ClientConfig;
use crate::coordinator::TransactionCoordinator;
use crate::core::connection::NodeConnector;
use crate::core::constants::INTERFACE_JSON;
use crate::core::contract::ContractHandle;
use crate::core::signer::SigningAgent;
use crate::notify::NoticeSender;
use crate::query::{spawn_token_query, TokenView};
use crate::registry::AccountRegistry;
use crate::session::{Session, SessionAction};

/// A running session: the state handle, the account registry, the
/// transaction coordinator, and the background tasks that feed them.
pub struct SessionRuntime {
    session: Session,
    registry: Arc<AccountRegistry>,
    coordinator: TransactionCoordinator,
    tokens_rx: watch::Receiver<TokenView>,
    shutdown_tx: watch::Sender<bool>,
    tasks: AsyncMutex<Vec<JoinHandle<()>>>,
}

impl SessionRuntime {
    /// Boot a session. Must be called within a Tokio runtime.
    ///
    /// Two independent chains start concurrently: connect-and-bind, and
    /// the wallet gate (delayed prompt, then account listing). They race
    /// freely; the reducer is order-independent for their completions.
    /// Bootstrap failures leave the session permanently not-ready rather
    /// than surfacing a dismissible error.
    pub fn start(
        config: ClientConfig,
        connector: Arc<dyn NodeConnector>,
        agent: Arc<dyn SigningAgent>,
        notices: NoticeSender,
    ) -> Self {
        let session = Session::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let registry = Arc::new(AccountRegistry::new(Arc::clone(&agent), session.clone()));

        let connect_task = tokio::spawn(run_connect(
            config.clone(),
            connector,
            session.clone(),
            notices.clone(),
            shutdown_rx.clone(),
        ));
        let wallet_task = tokio::spawn(run_wallet_gate(
            config,
            Arc::clone(&agent),
            Arc::clone(&registry),
            session.clone(),
            notices.clone(),
            shutdown_rx.clone(),
        ));
        let (tokens_rx, query_task) = spawn_token_query(&session, shutdown_rx.clone());

        let coordinator =
            TransactionCoordinator::new(session.clone(), agent, notices, shutdown_rx);

        Self {
            session,
            registry,
            coordinator,
            tokens_rx,
            shutdown_tx,
            tasks: AsyncMutex::new(vec![connect_task, wallet_task, query_task]),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn coordinator(&self) -> &TransactionCoordinator {
        &self.coordinator
    }

    /// Live view of the selected account's tokens.
    pub fn tokens(&self) -> watch::Receiver<TokenView> {
        self.tokens_rx.clone()
    }

    /// Stop all background tasks and wait for them to finish. Spawned
    /// work stops applying results as soon as the flag flips.
    pub async fn shutdown(&self) {
        self.shutdown_tx.send_replace(true);
        let mut tasks = self.tasks.lock().await;
        for task in tasks.drain(..) {
            let _ = task.await;
        }
    }
}

async fn run_connect(
    config: ClientConfig,
    connector: Arc<dyn NodeConnector>,
    session: Session,
    notices: NoticeSender,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let bind = async {
        let client = connector.connect(&config.endpoint).await?;
        ContractHandle::bind(client, INTERFACE_JSON, &config.contract_address)
    };

    tokio::select! {
        _ = shutdown_rx.wait_for(|stop| *stop) => {}
        result = bind => match result {
            Ok(handle) => {
                info!(address = %handle.address(), "contract bound");
                session.dispatch(SessionAction::SetHandle(handle));
            }
            Err(err) => {
                error!(error = %err, endpoint = %config.endpoint, "ledger bootstrap failed");
                notices.error(format!("cannot reach ledger: {err}"));
            }
        },
    }
}

async fn run_wallet_gate(
    config: ClientConfig,
    agent: Arc<dyn SigningAgent>,
    registry: Arc<AccountRegistry>,
    session: Session,
    notices: NoticeSender,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // The prompt delay is deliberately not gated on connection
    // completion; see constants::WALLET_PROMPT_DELAY.
    tokio::select! {
        _ = shutdown_rx.wait_for(|stop| *stop) => return,
        _ = tokio::time::sleep(config.wallet_prompt_delay) => {}
    }

    match agent.authorize(&config.app_name).await {
        Ok(()) => session.dispatch(SessionAction::WalletEnabled),
        Err(err) => {
            warn!(error = %err, "wallet authorization failed");
            notices.error(format!("wallet authorization failed: {err}"));
            return;
        }
    }

    if let Err(err) = registry.load_default().await {
        warn!(error = %err, "account listing failed");
        notices.error(format!("no signing accounts available: {err}"));
    }
}
