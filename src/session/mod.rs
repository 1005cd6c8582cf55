//! Session state, persistence and restore.

pub mod restore;
pub mod state;
pub mod store;

pub use state::SessionState;
pub use store::{PersistedSession, SessionStore, SESSION_EXTENSION};
