//! Global application state.
//!
//! Uses `RefCell`-wrapped `thread_local!` storage (WASM is single-threaded).
//! The wallet session is the only shared mutable resource; it is installed
//! once during init and lives for the page lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use unifa_session::WalletSession;

thread_local! {
    static SESSION: RefCell<Option<Rc<WalletSession>>> = const { RefCell::new(None) };
}

pub fn set_session(session: Rc<WalletSession>) {
    SESSION.with(|s| *s.borrow_mut() = Some(session));
}

/// The page-wide wallet session. Panics if called before `init` installed
/// it, which would be a wiring bug.
pub fn session() -> Rc<WalletSession> {
    SESSION.with(|s| s.borrow().clone()).expect("wallet session not initialised")
}
