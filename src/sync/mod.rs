//! Client-Side Synchronization Core
//!
//! Task store, inline-edit state machine, and the engine that sequences
//! optimistic mutations against the backend. UI-framework-free; the view
//! layer consumes [`EngineState`] snapshots.

pub mod edit;
pub mod engine;
pub mod store;

mod tests;

pub use engine::{EngineState, SyncEngine};
