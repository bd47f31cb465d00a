//! Session token for the current conversation.
//!
//! The backend issues the token on the first exchange; it lives until the
//! conversation is reset and is never persisted.

mod state;

pub use state::{truncate_id, SessionIndicator, SessionState, INDICATOR_PREFIX};
