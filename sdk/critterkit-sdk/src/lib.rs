pub mod agent;
pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod core;
pub mod error;
pub mod metadata;
pub mod notify;
pub mod query;
pub mod registry;
pub mod session;
pub mod types;

pub use crate::agent::LocalSigningAgent;
pub use crate::bootstrap::SessionRuntime;
pub use crate::config::{AccountSource, ClientConfig};
pub use crate::coordinator::TransactionCoordinator;
pub use crate::core::connection::{NodeConnection, NodeConnector};
pub use crate::core::contract::{CallOptions, ContractHandle, SignableCall, SignedCall};
pub use crate::core::rpc::{connect, HttpConnector, HttpNodeClient};
pub use crate::core::signer::SigningAgent;
pub use crate::error::{CritterSdkError, Result};
pub use crate::notify::{Notice, NoticeLevel, NoticeSender};
pub use crate::query::{spawn_token_query, species_of, TokenView};
pub use crate::registry::AccountRegistry;
pub use crate::session::{reduce, Session, SessionAction, SessionState};
pub use crate::types::{
    random_mint_seed, token_id, Account, CallHash, LedgerCallStatus, MintSeed, TransactionStatus,
};
