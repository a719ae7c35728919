//! Provider abstraction.
//!
//! Each supported wallet extension is one [`WalletProvider`] implementation;
//! the [`ProviderRegistry`] maps kinds to live instances. A kind with no
//! registry entry means the extension is not reachable in this browser.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::SessionError;

/// The supported wallet kinds. [`ProviderKind::id`] and the [`FromStr`]
/// impl match the `data-wallet` attributes in the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Phantom,
    Solflare,
    MetaMask,
    WalletConnect,
    TrustWallet,
    Coinbase,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::Phantom,
        ProviderKind::Solflare,
        ProviderKind::MetaMask,
        ProviderKind::WalletConnect,
        ProviderKind::TrustWallet,
        ProviderKind::Coinbase,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "phantom",
            ProviderKind::Solflare => "solflare",
            ProviderKind::MetaMask => "metamask",
            ProviderKind::WalletConnect => "wallet-connect",
            ProviderKind::TrustWallet => "trust-wallet",
            ProviderKind::Coinbase => "coinbase",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Phantom => "Phantom",
            ProviderKind::Solflare => "Solflare",
            ProviderKind::MetaMask => "MetaMask",
            ProviderKind::WalletConnect => "WalletConnect",
            ProviderKind::TrustWallet => "Trust Wallet",
            ProviderKind::Coinbase => "Coinbase Wallet",
        }
    }

    /// Install page offered to the user on `ProviderNotInstalled`.
    pub fn install_url(self) -> Option<&'static str> {
        match self {
            ProviderKind::Phantom => Some("https://phantom.app/"),
            ProviderKind::Solflare => Some("https://solflare.com/"),
            ProviderKind::MetaMask => Some("https://metamask.io/"),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|k| k.id() == s)
            .ok_or_else(|| SessionError::Unknown(format!("unsupported wallet type: {s}")))
    }
}

/// Notifications pushed by a provider after a successful connect.
///
/// `AccountChanged(None)` corresponds to the extension reporting an empty
/// account list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    Connect,
    Disconnect,
    AccountChanged(Option<String>),
}

pub type ProviderEventHandler = Rc<dyn Fn(ProviderEvent)>;

/// Capability surface shared by all wallet kinds.
///
/// `?Send` because everything runs on the browser's single-threaded event
/// loop; implementations hold `JsValue`s that must not cross threads.
#[async_trait(?Send)]
pub trait WalletProvider {
    fn kind(&self) -> ProviderKind;

    fn is_connected(&self) -> bool;

    /// Request a connection; resolves to the connected account address.
    async fn connect(&self) -> Result<String, SessionError>;

    async fn disconnect(&self);

    /// Route this provider's connect/disconnect/account-change notifications
    /// to `handler`. A later call replaces the previous handler.
    fn subscribe(&self, handler: ProviderEventHandler);

    /// Stop routing notifications. Must be callable from within a
    /// notification currently being delivered.
    fn unsubscribe(&self);
}

/// Kind → provider lookup, populated once at startup from whatever
/// extensions were detected in the page.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderKind, Rc<dyn WalletProvider>>,
}

impl ProviderRegistry {
    pub fn register(&mut self, provider: Rc<dyn WalletProvider>) {
        self.providers.insert(provider.kind(), provider);
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<Rc<dyn WalletProvider>> {
        self.providers.get(&kind).cloned()
    }

    pub fn is_installed(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }
}
