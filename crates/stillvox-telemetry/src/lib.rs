//! Telemetry and metrics infrastructure for StillVox
//!
//! The decoder reports what it does through two channels: a structured
//! [`DecodeEvent`] stream for tests and host applications, and lock-free
//! [`SessionMetrics`] counters for cross-thread monitoring.

pub mod events;
pub mod metrics;

pub use events::*;
pub use metrics::*;
