//! Wallet session core for the unifa.launch frontend.
//!
//! Owns the connection lifecycle to exactly one of several interchangeable
//! wallet providers and normalises their heterogeneous event streams into a
//! small set of session events for the UI. Pure Rust with no browser types,
//! so the state machine is testable off-target; the wasm crate supplies the
//! provider implementations over the injected browser globals.

pub mod display;
pub mod error;
pub mod network;
pub mod provider;
pub mod session;

pub use error::SessionError;
pub use provider::{ProviderEvent, ProviderEventHandler, ProviderKind, ProviderRegistry, WalletProvider};
pub use session::{SessionEvent, SessionTask, Status, TaskSpawner, WalletSession};
