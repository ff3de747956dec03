//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → route table lookup (longest prefix)
//!     → forward to upstream / serve health endpoint
//!     → relay response to client
//! ```

pub mod server;

pub use server::{AppState, HttpServer};
