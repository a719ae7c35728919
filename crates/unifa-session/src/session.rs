//! The wallet session state machine.
//!
//! One process-wide instance, lifecycle = page lifetime. Valid transitions:
//!
//! ```text
//! Disconnected --connect--> Connecting --success--> Connected
//!                           Connecting --failure--> Disconnected
//! Connected --disconnect / provider-disconnect--> Disconnected
//! ```
//!
//! `connect` while already `Connected` toggles: it disconnects and makes no
//! further attempt, mirroring the connect-button behaviour of the site.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use crate::display::short_address;
use crate::error::SessionError;
use crate::network::NetworkConfig;
use crate::provider::{ProviderEvent, ProviderKind, ProviderRegistry, WalletProvider};

/// Deferred work handed to the host's executor (`spawn_local` in the
/// browser). A provider's own `disconnect()` runs through this when the
/// teardown is triggered from a synchronous event path.
pub type SessionTask = Pin<Box<dyn Future<Output = ()>>>;

pub type TaskSpawner = Rc<dyn Fn(SessionTask)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Disconnected,
    Connecting,
    Connected,
}

/// The fixed vocabulary of session events the UI subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected(String),
    Disconnected,
    AccountChanged(String),
    ConnectionFailed(String),
}

pub type SessionListener = Rc<dyn Fn(&SessionEvent)>;

/// Application-level record of which provider/account is currently active.
///
/// Interior mutability throughout: the browser event loop is single-threaded
/// and provider callbacks land between our own operations, never inside
/// them. The one guard that matters is the `Connecting` status, which keeps
/// a second `connect` from overlapping an in-flight attempt.
pub struct WalletSession {
    registry: ProviderRegistry,
    network: &'static NetworkConfig,
    spawner: TaskSpawner,
    status: Cell<Status>,
    address: RefCell<Option<String>>,
    active: RefCell<Option<Rc<dyn WalletProvider>>>,
    listeners: RefCell<Vec<SessionListener>>,
}

impl WalletSession {
    pub fn new(
        registry: ProviderRegistry,
        network: &'static NetworkConfig,
        spawner: TaskSpawner,
    ) -> Rc<Self> {
        Rc::new(WalletSession {
            registry,
            network,
            spawner,
            status: Cell::new(Status::Disconnected),
            address: RefCell::new(None),
            active: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    pub fn address(&self) -> Option<String> {
        self.address.borrow().clone()
    }

    pub fn network(&self) -> &'static NetworkConfig {
        self.network
    }

    pub fn is_installed(&self, kind: ProviderKind) -> bool {
        self.registry.is_installed(kind)
    }

    /// Truncated form of the connected address, if any.
    pub fn display_address(&self) -> Option<String> {
        self.address.borrow().as_deref().map(short_address)
    }

    pub fn subscribe(&self, listener: SessionListener) {
        self.listeners.borrow_mut().push(listener);
    }

    fn emit(&self, event: &SessionEvent) {
        // Snapshot so a listener may subscribe without poisoning the borrow.
        let listeners: Vec<SessionListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(event);
        }
    }

    /// Connect to the given wallet kind.
    ///
    /// Rejected with `AlreadyConnecting` while an attempt is in flight;
    /// toggles to disconnected when called while connected. Any failure is
    /// terminal for the attempt: no retry, the session stays `Disconnected`
    /// and a `ConnectionFailed` event carries the reason.
    pub async fn connect(self: &Rc<Self>, kind: ProviderKind) -> Result<(), SessionError> {
        match self.status.get() {
            Status::Connecting => return Err(SessionError::AlreadyConnecting),
            Status::Connected => {
                self.disconnect().await;
                return Ok(());
            }
            Status::Disconnected => {}
        }

        let Some(provider) = self.registry.provider(kind) else {
            let err = SessionError::ProviderNotInstalled(kind);
            self.emit(&SessionEvent::ConnectionFailed(err.to_string()));
            return Err(err);
        };

        self.status.set(Status::Connecting);
        match provider.connect().await {
            Ok(address) => {
                self.activate(Rc::clone(&provider), address);
                Ok(())
            }
            Err(err) => {
                self.status.set(Status::Disconnected);
                self.emit(&SessionEvent::ConnectionFailed(err.to_string()));
                Err(err)
            }
        }
    }

    fn activate(self: &Rc<Self>, provider: Rc<dyn WalletProvider>, address: String) {
        // Invariant: at most one active provider. A leftover (e.g. a
        // provider that reconnected behind our back) is released first,
        // its own disconnect included.
        if let Some(previous) = self.release_active() {
            self.disconnect_in_background(previous);
        }

        let weak = Rc::downgrade(self);
        provider.subscribe(Rc::new(move |event| {
            if let Some(session) = weak.upgrade() {
                session.handle_provider_event(event);
            }
        }));

        *self.active.borrow_mut() = Some(provider);
        *self.address.borrow_mut() = Some(address.clone());
        self.status.set(Status::Connected);
        self.emit(&SessionEvent::Connected(address));
    }

    /// Disconnect the active provider. Idempotent: a no-op when already
    /// disconnected.
    pub async fn disconnect(&self) {
        if self.status.get() == Status::Disconnected {
            return;
        }
        let provider = self.active.borrow_mut().take();
        if let Some(provider) = provider {
            provider.unsubscribe();
            provider.disconnect().await;
        }
        // The provider may have reported its own disconnect during the
        // await above, tearing the session down already.
        self.drop_session();
    }

    /// Provider notifications, normalised into session events. Invoked by
    /// the subscription installed in `activate`, never by consumers.
    fn handle_provider_event(self: &Rc<Self>, event: ProviderEvent) {
        match event {
            // Redundant with the connect result; nothing to re-derive.
            ProviderEvent::Connect => {}
            ProviderEvent::Disconnect => self.drop_session(),
            ProviderEvent::AccountChanged(Some(address)) => self.on_account_changed(address),
            ProviderEvent::AccountChanged(None) => self.on_account_cleared(),
        }
    }

    fn on_account_changed(&self, address: String) {
        if self.status.get() != Status::Connected {
            return;
        }
        *self.address.borrow_mut() = Some(address.clone());
        self.emit(&SessionEvent::AccountChanged(address));
    }

    /// An empty account list is a wallet-side sign-out: behaves as a full
    /// `disconnect()`, the provider's own disconnect included.
    fn on_account_cleared(&self) {
        if self.status.get() == Status::Disconnected {
            return;
        }
        if let Some(provider) = self.release_active() {
            self.disconnect_in_background(provider);
        }
        self.finish_teardown();
    }

    /// Release our side of the session. Used where the provider's own
    /// disconnect has already run (or the provider disconnected itself).
    fn drop_session(&self) {
        if self.status.get() == Status::Disconnected {
            return;
        }
        self.release_active();
        self.finish_teardown();
    }

    fn release_active(&self) -> Option<Rc<dyn WalletProvider>> {
        let provider = self.active.borrow_mut().take();
        if let Some(provider) = &provider {
            provider.unsubscribe();
        }
        provider
    }

    /// Fire-and-forget the provider's own disconnect. Event paths are
    /// synchronous, so the future goes to the host's executor.
    fn disconnect_in_background(&self, provider: Rc<dyn WalletProvider>) {
        (self.spawner)(Box::pin(async move { provider.disconnect().await }));
    }

    fn finish_teardown(&self) {
        *self.address.borrow_mut() = None;
        self.status.set(Status::Disconnected);
        self.emit(&SessionEvent::Disconnected);
    }
}

#[cfg(test)]
mod tests {
    use std::task::{Context, Poll, Waker};

    use super::*;
    use crate::network::DEFAULT_NETWORK;
    use crate::provider::ProviderEventHandler;
    use async_trait::async_trait;

    struct MockProvider {
        kind: ProviderKind,
        outcome: Result<String, SessionError>,
        connected: Cell<bool>,
        disconnect_calls: Cell<u32>,
        handler: RefCell<Option<ProviderEventHandler>>,
    }

    impl MockProvider {
        fn ok(kind: ProviderKind, address: &str) -> Rc<Self> {
            Rc::new(MockProvider {
                kind,
                outcome: Ok(address.to_owned()),
                connected: Cell::new(false),
                disconnect_calls: Cell::new(0),
                handler: RefCell::new(None),
            })
        }

        fn failing(kind: ProviderKind, err: SessionError) -> Rc<Self> {
            Rc::new(MockProvider {
                kind,
                outcome: Err(err),
                connected: Cell::new(false),
                disconnect_calls: Cell::new(0),
                handler: RefCell::new(None),
            })
        }

        /// Deliver a provider notification the way the browser would:
        /// from outside any session call.
        fn fire(&self, event: ProviderEvent) {
            let handler = self.handler.borrow().clone();
            if let Some(handler) = handler {
                handler(event);
            }
        }

        fn has_handler(&self) -> bool {
            self.handler.borrow().is_some()
        }
    }

    #[async_trait(?Send)]
    impl WalletProvider for MockProvider {
        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn is_connected(&self) -> bool {
            self.connected.get()
        }

        async fn connect(&self) -> Result<String, SessionError> {
            match &self.outcome {
                Ok(address) => {
                    self.connected.set(true);
                    Ok(address.clone())
                }
                Err(err) => Err(err.clone()),
            }
        }

        async fn disconnect(&self) {
            self.connected.set(false);
            self.disconnect_calls.set(self.disconnect_calls.get() + 1);
        }

        fn subscribe(&self, handler: ProviderEventHandler) {
            *self.handler.borrow_mut() = Some(handler);
        }

        fn unsubscribe(&self) {
            *self.handler.borrow_mut() = None;
        }
    }

    const PHANTOM_ADDR: &str = "Ax7k111111111111111111111111111111111111Qm2z";

    /// Runs spawned teardown work on the spot; the mock disconnects all
    /// resolve on their first poll.
    fn immediate_spawner() -> TaskSpawner {
        Rc::new(|mut task| {
            let mut cx = Context::from_waker(Waker::noop());
            let _ = task.as_mut().poll(&mut cx);
        })
    }

    fn session_with(providers: Vec<Rc<MockProvider>>) -> Rc<WalletSession> {
        let mut registry = ProviderRegistry::default();
        for p in providers {
            registry.register(p);
        }
        WalletSession::new(registry, DEFAULT_NETWORK, immediate_spawner())
    }

    fn record_events(session: &WalletSession) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(Rc::new(move |e| sink.borrow_mut().push(e.clone())));
        events
    }

    fn assert_address_matches_status(session: &WalletSession) {
        assert_eq!(
            session.status() == Status::Connected,
            session.address().is_some(),
            "address must be present iff status is Connected"
        );
    }

    #[tokio::test]
    async fn connect_phantom_reaches_connected_with_display_address() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);
        let events = record_events(&session);

        session.connect(ProviderKind::Phantom).await.unwrap();

        assert_eq!(session.status(), Status::Connected);
        assert_eq!(session.address().as_deref(), Some(PHANTOM_ADDR));
        assert_eq!(session.display_address().as_deref(), Some("Ax7k\u{2026}Qm2z"));
        assert!(phantom.has_handler());
        assert_eq!(
            *events.borrow(),
            vec![SessionEvent::Connected(PHANTOM_ADDR.to_owned())]
        );
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn stub_provider_fails_with_not_implemented() {
        let trust = MockProvider::failing(
            ProviderKind::TrustWallet,
            SessionError::NotImplemented(ProviderKind::TrustWallet),
        );
        let session = session_with(vec![trust]);
        let events = record_events(&session);

        let err = session.connect(ProviderKind::TrustWallet).await.unwrap_err();

        assert_eq!(err, SessionError::NotImplemented(ProviderKind::TrustWallet));
        assert_eq!(session.status(), Status::Disconnected);
        assert_address_matches_status(&session);
        assert!(matches!(
            events.borrow().as_slice(),
            [SessionEvent::ConnectionFailed(_)]
        ));
    }

    #[tokio::test]
    async fn missing_provider_fails_with_not_installed() {
        let session = session_with(vec![]);
        let events = record_events(&session);

        let err = session.connect(ProviderKind::Phantom).await.unwrap_err();

        assert_eq!(err, SessionError::ProviderNotInstalled(ProviderKind::Phantom));
        assert_eq!(session.status(), Status::Disconnected);
        assert_address_matches_status(&session);
        assert!(matches!(
            events.borrow().as_slice(),
            [SessionEvent::ConnectionFailed(_)]
        ));
    }

    #[tokio::test]
    async fn user_rejection_returns_to_disconnected() {
        let phantom = MockProvider::failing(ProviderKind::Phantom, SessionError::UserRejected);
        let session = session_with(vec![phantom]);

        let err = session.connect(ProviderKind::Phantom).await.unwrap_err();

        assert_eq!(err, SessionError::UserRejected);
        assert_eq!(session.status(), Status::Disconnected);
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);
        session.connect(ProviderKind::Phantom).await.unwrap();

        let events = record_events(&session);
        session.disconnect().await;
        session.disconnect().await;

        assert_eq!(session.status(), Status::Disconnected);
        assert_eq!(session.address(), None);
        assert_eq!(phantom.disconnect_calls.get(), 1);
        assert!(!phantom.has_handler());
        assert_eq!(*events.borrow(), vec![SessionEvent::Disconnected]);
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn disconnect_on_fresh_session_is_a_noop() {
        let session = session_with(vec![]);
        let events = record_events(&session);

        session.disconnect().await;

        assert_eq!(session.status(), Status::Disconnected);
        assert!(events.borrow().is_empty());
    }

    #[tokio::test]
    async fn connect_while_connected_toggles_to_disconnected() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let solflare = MockProvider::ok(ProviderKind::Solflare, "So1f1are111111111111111111111111111111111111");
        let session = session_with(vec![Rc::clone(&phantom), Rc::clone(&solflare)]);
        session.connect(ProviderKind::Phantom).await.unwrap();

        let events = record_events(&session);
        // Toggle semantics: no second connection is attempted, not even to
        // a different provider.
        session.connect(ProviderKind::Solflare).await.unwrap();

        assert_eq!(session.status(), Status::Disconnected);
        assert!(!solflare.is_connected());
        assert_eq!(phantom.disconnect_calls.get(), 1);
        assert_eq!(*events.borrow(), vec![SessionEvent::Disconnected]);
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn account_change_updates_address() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);
        session.connect(ProviderKind::Phantom).await.unwrap();
        let events = record_events(&session);

        let next = "Bx9p222222222222222222222222222222222222Wk3y";
        phantom.fire(ProviderEvent::AccountChanged(Some(next.to_owned())));

        assert_eq!(session.status(), Status::Connected);
        assert_eq!(session.address().as_deref(), Some(next));
        assert_eq!(
            *events.borrow(),
            vec![SessionEvent::AccountChanged(next.to_owned())]
        );
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn empty_account_change_disconnects() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);
        session.connect(ProviderKind::Phantom).await.unwrap();
        let events = record_events(&session);

        phantom.fire(ProviderEvent::AccountChanged(None));

        assert_eq!(session.status(), Status::Disconnected);
        assert_eq!(session.address(), None);
        assert!(!phantom.has_handler());
        // A wallet-side sign-out releases the provider fully, its own
        // disconnect included.
        assert_eq!(phantom.disconnect_calls.get(), 1);
        assert_eq!(*events.borrow(), vec![SessionEvent::Disconnected]);
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn provider_side_disconnect_tears_the_session_down() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);
        session.connect(ProviderKind::Phantom).await.unwrap();
        let events = record_events(&session);

        phantom.fire(ProviderEvent::Disconnect);

        assert_eq!(session.status(), Status::Disconnected);
        // Provider initiated: its own disconnect is not re-invoked.
        assert_eq!(phantom.disconnect_calls.get(), 0);
        assert_eq!(*events.borrow(), vec![SessionEvent::Disconnected]);
        assert_address_matches_status(&session);
    }

    #[tokio::test]
    async fn reconnect_after_disconnect_works() {
        let phantom = MockProvider::ok(ProviderKind::Phantom, PHANTOM_ADDR);
        let session = session_with(vec![Rc::clone(&phantom)]);

        session.connect(ProviderKind::Phantom).await.unwrap();
        session.disconnect().await;
        session.connect(ProviderKind::Phantom).await.unwrap();

        assert_eq!(session.status(), Status::Connected);
        assert_eq!(session.address().as_deref(), Some(PHANTOM_ADDR));
        assert_address_matches_status(&session);
    }

    // The Connecting guard itself: a connect that lands while another is in
    // flight is rejected without disturbing the first attempt.
    #[tokio::test]
    async fn overlapping_connect_is_rejected() {
        use std::pin::pin;

        struct PendingProvider {
            handler: RefCell<Option<ProviderEventHandler>>,
        }

        #[async_trait(?Send)]
        impl WalletProvider for PendingProvider {
            fn kind(&self) -> ProviderKind {
                ProviderKind::Phantom
            }
            fn is_connected(&self) -> bool {
                false
            }
            async fn connect(&self) -> Result<String, SessionError> {
                std::future::pending().await
            }
            async fn disconnect(&self) {}
            fn subscribe(&self, handler: ProviderEventHandler) {
                *self.handler.borrow_mut() = Some(handler);
            }
            fn unsubscribe(&self) {
                *self.handler.borrow_mut() = None;
            }
        }

        let mut registry = ProviderRegistry::default();
        registry.register(Rc::new(PendingProvider {
            handler: RefCell::new(None),
        }));
        let session = WalletSession::new(registry, DEFAULT_NETWORK, immediate_spawner());

        let mut first = pin!(session.connect(ProviderKind::Phantom));
        let mut cx = Context::from_waker(Waker::noop());
        assert!(matches!(first.as_mut().poll(&mut cx), Poll::Pending));
        assert_eq!(session.status(), Status::Connecting);

        let err = session.connect(ProviderKind::Phantom).await.unwrap_err();
        assert_eq!(err, SessionError::AlreadyConnecting);
        assert_eq!(session.status(), Status::Connecting);
    }
}
