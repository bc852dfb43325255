pub mod connection;
pub mod constants;
pub mod contract;
pub mod rpc;
pub mod signer;
