//! Application Context
//!
//! The engine handle and app-wide signals, provided via the Leptos Context
//! API. The engine is constructed once per client session and passed down
//! explicitly; there is no ambient global state.

use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;

use crate::api::FetchTransport;
use crate::session::BrowserTokenStorage;
use crate::sync::{EngineState, SyncEngine};

/// Engine as wired for the browser: fetch transport, localStorage tokens.
pub type AppEngine = SyncEngine<FetchTransport, BrowserTokenStorage>;

#[derive(Clone)]
pub struct AppContext {
    /// Leptos context values must be `Send + Sync`; the engine itself is
    /// single-threaded, so its handle rides in a `SendWrapper` and is only
    /// ever touched from the browser's one thread.
    pub engine: SendWrapper<Rc<AppEngine>>,
    /// Mirror of the engine state, fed by the engine listener
    pub state: ReadSignal<EngineState>,
    /// Last user-facing status message ("" = none)
    pub status: ReadSignal<String>,
    set_status: WriteSignal<String>,
}

impl AppContext {
    pub fn new(
        engine: Rc<AppEngine>,
        state: ReadSignal<EngineState>,
        status: (ReadSignal<String>, WriteSignal<String>),
    ) -> Self {
        Self {
            engine: SendWrapper::new(engine),
            state,
            status: status.0,
            set_status: status.1,
        }
    }

    pub fn set_status(&self, message: impl Into<String>) {
        self.set_status.set(message.into());
    }

    pub fn clear_status(&self) {
        self.set_status.set(String::new());
    }

    /// Route an engine result into the status banner.
    pub fn report(&self, result: Result<(), String>) {
        if let Err(message) = result {
            self.set_status.set(message);
        }
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
