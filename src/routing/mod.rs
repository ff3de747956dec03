//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → table.rs (longest-prefix lookup + path rewrite)
//!     → Return: matched Route + rewritten path, or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse targets, normalize prefixes
//!     → Sort longest-prefix-first
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (prefix matching only)
//! - Longest prefix wins, so overlapping prefixes are unambiguous
//! - Matches respect path segment boundaries

pub mod table;

pub use table::{Route, RouteMatch, RouteTable};
