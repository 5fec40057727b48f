//! Core library for songshelf.
//!
//! Everything the front ends share lives here:
//!
//! - `auth`: the persisted session and the unauthorized-response guard
//! - `api`: the gateway every backend call goes through, and its error contract
//! - `models`: playlist, song and auth DTOs
//! - `navigation`: typed routes and the `Navigator` seam
//! - `pages`: page controllers rendering through the `View` trait
//! - `config`: on-disk configuration with environment overrides

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod pages;
pub mod utils;

pub use api::{ApiError, ApiGateway, ErrorKind};
pub use auth::SessionStore;
pub use config::Config;
pub use navigation::{NavigationLog, Navigator, Route};
pub use pages::{AppContext, PageError, View};
