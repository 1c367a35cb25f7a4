//! Warden Core - login-attempt policy evaluation
//!
//! This crate provides the decision logic for two independent login
//! security policies:
//!
//! - [`RateLimitPolicy`] tracks failed attempts per identity inside a
//!   sliding time window and locks the identity after repeated failures
//! - [`WorkingHoursPolicy`] flags logins outside a configured time-of-day
//!   window as requiring multi-factor authentication
//!
//! Neither policy depends on the other. A caller (typically an
//! authentication gateway) invokes them per login event and combines the
//! results; [`PolicyEngine`] ships that composition with lock precedence.
//!
//! The crate is a pure decision core: it consumes `(identity, timestamp,
//! success)` events and returns an [`Outcome`], with no knowledge of how
//! events were obtained or how `Locked` / `RequireMfa` are enforced
//! downstream. Nothing here performs I/O, blocks, or retains state across
//! process restarts.

pub mod config;
pub mod engine;
pub mod error;
pub mod rate_limit;
pub mod working_hours;

pub use config::PolicyConfig;
pub use engine::{LoginAttempt, PolicyEngine};
pub use error::{Result, ValidationError};
pub use rate_limit::{Outcome, RateLimitConfig, RateLimitPolicy};
pub use working_hours::{WorkingHoursConfig, WorkingHoursPolicy};

/// Default failed attempts within the window before an identity is locked
pub const DEFAULT_FAIL_THRESHOLD: u32 = 5;

/// Default sliding-window length for counting failed attempts, in minutes
pub const DEFAULT_FAIL_WINDOW_MINUTES: u32 = 5;

/// Default lock duration, in minutes
pub const DEFAULT_LOCK_DURATION_MINUTES: u32 = 15;

/// Default start of working hours (`HH:MM`)
pub const DEFAULT_WORKING_HOURS_START: &str = "08:00";

/// Default end of working hours (`HH:MM`)
pub const DEFAULT_WORKING_HOURS_END: &str = "20:00";
