//! Health aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/checkStatus
//!     → aggregator.rs (fan-out: one task per configured probe)
//!     → probe.rs (classify each result)
//!     → join-all (wait for every probe to settle)
//!     → flat JSON status body (always 200)
//! ```
//!
//! # Design Decisions
//! - Full snapshot, not liveness short-circuit: no early return on failure
//! - Each probe carries its own timeout; a timed-out probe is abandoned
//!   locally and reported as unreachable
//! - Downstream failures live in the body, never in the status line

pub mod aggregator;
pub mod probe;

pub use aggregator::HealthAggregator;
pub use probe::{ProbeError, ProbeOutcome};
