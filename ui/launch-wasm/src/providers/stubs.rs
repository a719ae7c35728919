//! Wallets the UI advertises but does not integrate yet. They take part
//! in the registry like any other provider and fail cleanly on connect.

use std::rc::Rc;

use async_trait::async_trait;
use unifa_session::{ProviderEventHandler, ProviderKind, SessionError, WalletProvider};

pub struct StubProvider {
    kind: ProviderKind,
}

impl StubProvider {
    pub fn trust_wallet() -> Rc<Self> {
        Rc::new(StubProvider {
            kind: ProviderKind::TrustWallet,
        })
    }

    pub fn coinbase() -> Rc<Self> {
        Rc::new(StubProvider {
            kind: ProviderKind::Coinbase,
        })
    }
}

#[async_trait(?Send)]
impl WalletProvider for StubProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn is_connected(&self) -> bool {
        false
    }

    async fn connect(&self) -> Result<String, SessionError> {
        Err(SessionError::NotImplemented(self.kind))
    }

    async fn disconnect(&self) {}

    fn subscribe(&self, _handler: ProviderEventHandler) {}

    fn unsubscribe(&self) {}
}
