//! Lifecycle management subsystem.
//!
//! Startup is ordered: config first, then subsystems, then the listener,
//! so the gateway only accepts traffic once the route table is compiled.
//! Shutdown fans out over a broadcast channel to every long-running task.

pub mod shutdown;

pub use shutdown::Shutdown;
