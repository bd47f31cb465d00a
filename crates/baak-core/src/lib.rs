//! # baak-core
//!
//! Core logic for the BAAK chat widget.
//!
//! This crate is surface-agnostic and can be driven by:
//! - The `baak` terminal client
//! - Any other front end that implements [`TranscriptSink`]
//!
//! ## Key Concepts
//!
//! - **Transcript**: The ordered list of message records; views are derived from it
//! - **Session**: The opaque token the backend hands out on the first exchange
//! - **ChatController**: Runs one question through `Idle -> Sending -> Idle`

pub mod backend;
pub mod composer;
pub mod config;
pub mod controller;
pub mod logging;
pub mod markup;
pub mod paths;
pub mod session;
pub mod time_format;
pub mod transcript;

// Re-export commonly used types
pub use backend::{BackendError, ChatBackend, HttpBackend};
pub use composer::{Composer, Key, KeyAction};
pub use config::WidgetConfig;
pub use controller::{ChatController, HealthOutcome, NewChatOutcome, Phase, SubmitOutcome};
pub use session::{SessionIndicator, SessionState};
pub use time_format::TimeFormat;
pub use transcript::{Message, MessageMeta, Role, Transcript, TranscriptSink, TypingToken};
