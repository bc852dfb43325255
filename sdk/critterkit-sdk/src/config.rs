use std::path::PathBuf;
use std::time::Duration;

use crate::core::constants;

/// Where the signing agent draws its identities from.
///
/// This is the only environment switch in scope: a pure configuration
/// value, not a runtime branch the coordinator reasons about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountSource {
    /// Deterministic test identities (alice, bob, charlie).
    DevIdentities,
    /// JSON keystore on disk.
    Keystore(PathBuf),
}

/// Session configuration. [`Default`] wires in the baked-in constants.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Node endpoint, used once at startup; not re-resolvable mid-session.
    pub endpoint: String,
    pub contract_address: String,
    /// Name presented to the signing agent when requesting access.
    pub app_name: String,
    /// Delay before the wallet prompt; see
    /// [`constants::WALLET_PROMPT_DELAY`].
    pub wallet_prompt_delay: Duration,
    pub account_source: AccountSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: constants::DEFAULT_ENDPOINT.to_string(),
            contract_address: constants::CONTRACT_ADDRESS.to_string(),
            app_name: constants::APP_NAME.to_string(),
            wallet_prompt_delay: constants::WALLET_PROMPT_DELAY,
            account_source: AccountSource::DevIdentities,
        }
    }
}
