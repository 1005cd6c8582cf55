//! Aparat API module.
//!
//! This module provides:
//! - The HTTP transport seam and its reqwest implementation
//! - The client holding session state and request helpers
//! - Endpoint paths and response types

pub mod client;
pub mod endpoints;
pub mod serde_helpers;
pub mod transport;
pub mod types;

pub use client::{AparatClient, ClientOptions};
pub use transport::{ReqwestTransport, StoredCookie, Transport};
pub use types::*;
