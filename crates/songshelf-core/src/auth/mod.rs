//! Authentication module for the client-held session.
//!
//! This module provides:
//! - `SessionStore`: the persisted token and display name
//! - `Storage`: the key/value persistence behind it (file or memory)
//! - `UnauthorizedGuard`: the gateway hook that tears the session down on a 401

pub mod guard;
pub mod session;
pub mod storage;

pub use guard::UnauthorizedGuard;
pub use session::{Session, SessionStore, TOKEN_KEY, USERNAME_KEY};
pub use storage::{FileStorage, MemoryStorage, Storage};
