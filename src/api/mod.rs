//! Backend API Access
//!
//! Transport performs one call against one origin; the client layers the
//! candidate-origin fallback loop and the typed REST calls on top.

mod client;
mod error;
mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{FetchTransport, Transport};

#[cfg(test)]
pub use transport::{ApiRequest, Method};
