//! REST gateway for the playlist backend.
//!
//! This module provides the `ApiGateway` through which every backend call
//! flows. The gateway attaches the bearer token to each request and turns
//! every failure into a single `ApiError` with a displayable message.

pub mod client;
pub mod error;
pub mod hooks;

pub use client::{ApiGateway, GatewaySettings};
pub use error::{ApiError, ErrorKind, Failure, ResponseBody, FALLBACK_MESSAGE, NETWORK_MESSAGE};
pub use hooks::ErrorHandler;
