//! Solana network endpoints.
//!
//! The network is fixed configuration: every token on unifa.launch is
//! deployed on Solana, so there is no user-facing network selector.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: &'static str,
    pub symbol: &'static str,
    pub rpc_url: &'static str,
}

pub const SOLANA_MAINNET: NetworkConfig = NetworkConfig {
    name: "Solana Mainnet Beta",
    symbol: "SOL",
    rpc_url: "https://api.mainnet-beta.solana.com",
};

pub const SOLANA_DEVNET: NetworkConfig = NetworkConfig {
    name: "Solana Devnet",
    symbol: "SOL",
    rpc_url: "https://api.devnet.solana.com",
};

pub const SOLANA_TESTNET: NetworkConfig = NetworkConfig {
    name: "Solana Testnet",
    symbol: "SOL",
    rpc_url: "https://api.testnet.solana.com",
};

pub const DEFAULT_NETWORK: &NetworkConfig = &SOLANA_DEVNET;

/// EVM-style chain id Solana-compatible wallets report (0x65).
pub const SOLANA_CHAIN_ID: u64 = 101;
