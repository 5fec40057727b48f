//! Data models exchanged with the playlist backend.
//!
//! These are pass-through DTOs: every field the pages display is optional
//! and defaulted at render time rather than validated here.
//!
//! - `Playlist`, `RemotePlaylist`, `Song`: library and search records
//! - `AuthResponse`, `UserInfo`: sign-in payloads
//! - `ExportedFile`: a downloaded text export

pub mod auth;
pub mod export;
pub mod playlist;

pub use auth::{AuthResponse, Credentials, Registration, UserInfo};
pub use export::ExportedFile;
pub use playlist::{Playlist, RemotePlaylist, Song};
