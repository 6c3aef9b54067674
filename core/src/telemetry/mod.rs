//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for file operations.
//!
//! Every single-file and batch operation returns a `TelemetrySnapshot`, so the
//! caller can show throughput or log per-stage timings without the core
//! depending on any UI.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
