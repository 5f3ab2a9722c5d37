//! Resilience subsystem.
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: a failed forward is answered with 502/504 immediately

pub mod timeouts;

pub use timeouts::{with_timeout, TimeoutError};
