pub mod local;

pub use local::LocalSigningAgent;
