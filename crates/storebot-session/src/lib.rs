//! Conversation sessions and their in-process registry.
//!
//! A [`Session`] owns one transcript, identified by a caller-supplied thread
//! id. The [`SessionRegistry`] creates sessions on first use and keeps them in
//! memory behind a capacity-bounded LRU, so long-running processes do not
//! accumulate transcripts without bound.

/// The session type.
pub mod session;
/// The LRU-bounded session registry.
pub mod registry;

pub use registry::{SessionHandle, SessionRegistry};
pub use session::Session;
