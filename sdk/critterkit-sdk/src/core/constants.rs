use std::time::Duration;

/// Default node endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9944";

/// Address the critter contract is deployed at.
pub const CONTRACT_ADDRESS: &str =
    "0xc1a7e55bd6d1c2f3a94d27a9f6c06f6f1f1de2aa77b4f2a90ce0c3d4b5a69e10";

/// Name under which wallet authorization is requested from the signing
/// agent.
pub const APP_NAME: &str = "critterdex";

/// Delay between session start and the wallet authorization prompt.
///
/// The prompt is deliberately decoupled from connection completion so a
/// slow node dial never holds the wallet prompt hostage (and vice versa).
/// The reducer tolerates either completion order, so this is purely a UX
/// smoothing knob.
pub const WALLET_PROMPT_DELAY: Duration = Duration::from_secs(1);

/// Gas limit attached to mint calls.
pub const MINT_GAS_LIMIT: u64 = 20_000_000_000;

/// Interface description of the critter contract, baked in at build time.
pub const INTERFACE_JSON: &str = r#"{
  "name": "critter_nft",
  "messages": [
    { "label": "balance_of", "selector": "0x0f755a56", "mutates": false },
    { "label": "owner_of",   "selector": "0x99720c1e", "mutates": false },
    { "label": "species_of", "selector": "0x6c9a1a58", "mutates": false },
    { "label": "tokens_of",  "selector": "0xb3a2bd9c", "mutates": false },
    { "label": "mint",       "selector": "0xcfdd9aa2", "mutates": true }
  ]
}"#;
