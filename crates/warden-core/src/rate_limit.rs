//! Failed-login rate limiting with per-identity lockout
//!
//! Tracks failed login attempts per identity inside a sliding time window
//! and locks the identity once the window holds `fail_threshold` failures.
//! A lock is stored as its expiry timestamp, so the locked check is a single
//! comparison with no duration arithmetic.
//!
//! # Lifecycle
//!
//! - Attempt buffers are created on the first failed attempt and trimmed to
//!   the window on every write.
//! - Locking clears the identity's attempt buffer; the counter starts fresh
//!   after a lock cycle.
//! - Lock entries are removed lazily when an evaluation or `is_locked` call
//!   observes them expired. There is no background sweeper.
//! - The first successful login that observes a lock expiring must pass
//!   through MFA once before the identity returns to normal operation.
//!
//! # Preconditions
//!
//! Timestamps must be monotonically non-decreasing per identity. Window
//! trimming is anchored to the newest attempt, so out-of-order timestamps for
//! the same identity produce incorrect trimming. Ordering across different
//! identities does not matter. This is not validated internally.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{DEFAULT_FAIL_THRESHOLD, DEFAULT_FAIL_WINDOW_MINUTES, DEFAULT_LOCK_DURATION_MINUTES};

/// Decision for a single evaluated login attempt.
///
/// Serializes to the wire names `ok`, `locked` and `require_mfa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The attempt may proceed.
    Ok,
    /// The identity is locked; reject regardless of credential validity.
    Locked,
    /// The attempt may proceed only after an MFA challenge.
    RequireMfa,
}

/// Result of probing an identity's lock entry at a point in time.
///
/// `JustExpired` is the transient signal that a lock entry existed on entry
/// to the call and was removed because its expiry had passed. It must be
/// carried forward rather than re-queried: once the entry is gone, a second
/// lookup cannot distinguish "expired just now" from "never locked".
enum LockStatus {
    Active,
    JustExpired,
    Clear,
}

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Failed attempts within the window that trigger a lock
    pub fail_threshold: u32,
    /// Sliding-window length for counting failures, in minutes
    pub fail_window_minutes: u32,
    /// How long a triggered lock lasts, in minutes
    pub lock_duration_minutes: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            fail_threshold: DEFAULT_FAIL_THRESHOLD,
            fail_window_minutes: DEFAULT_FAIL_WINDOW_MINUTES,
            lock_duration_minutes: DEFAULT_LOCK_DURATION_MINUTES,
        }
    }
}

impl RateLimitConfig {
    /// Create a strict configuration (fewer attempts, longer lock)
    pub fn strict() -> Self {
        Self {
            fail_threshold: 3,
            fail_window_minutes: 10,
            lock_duration_minutes: 60,
        }
    }

    /// Create a lenient configuration (more attempts, shorter lock)
    pub fn lenient() -> Self {
        Self {
            fail_threshold: 10,
            fail_window_minutes: 5,
            lock_duration_minutes: 5,
        }
    }
}

/// Per-identity failed-login rate limiter.
///
/// All state is instance-owned; independent instances (e.g. per tenant) do
/// not share anything. Mutating operations take `&mut self` and the type
/// offers no internal locking, so a multi-threaded caller must serialize
/// calls for a given identity externally.
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
    fail_threshold: u32,
    fail_window: Duration,
    lock_duration: Duration,
    /// identity -> timestamps of failed attempts, oldest first,
    /// trimmed to the window on every write
    failed_attempts: HashMap<String, VecDeque<DateTime<Utc>>>,
    /// identity -> lock expiry
    locked_until: HashMap<String, DateTime<Utc>>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::with_config(RateLimitConfig::default())
    }
}

impl RateLimitPolicy {
    /// Create a rate limiter with explicit parameters
    pub fn new(fail_threshold: u32, fail_window: Duration, lock_duration: Duration) -> Self {
        Self {
            fail_threshold,
            fail_window,
            lock_duration,
            failed_attempts: HashMap::new(),
            locked_until: HashMap::new(),
        }
    }

    /// Create a rate limiter from configuration
    pub fn with_config(config: RateLimitConfig) -> Self {
        Self::new(
            config.fail_threshold,
            Duration::minutes(i64::from(config.fail_window_minutes)),
            Duration::minutes(i64::from(config.lock_duration_minutes)),
        )
    }

    /// Evaluate a login attempt for `identity` at `timestamp`.
    ///
    /// A failed attempt is recorded and reported [`Outcome::Ok`] even when it
    /// is the attempt that triggers a lock; the lock applies to subsequent
    /// attempts. A successful login that observes its lock expiring yields
    /// [`Outcome::RequireMfa`] exactly once.
    pub fn evaluate(&mut self, identity: &str, timestamp: DateTime<Utc>, success: bool) -> Outcome {
        let status = self.probe_lock(identity, timestamp);

        if let LockStatus::Active = status {
            warn!("login attempt for locked identity {} at {}", identity, timestamp);
            return Outcome::Locked;
        }

        if !success {
            self.record_failed_attempt(identity, timestamp);
            return Outcome::Ok;
        }

        if let LockStatus::JustExpired = status {
            // The lock entry was consumed by the probe above; require MFA
            // for this first post-lock success only.
            info!("identity {} login after lock expiry, MFA required", identity);
            return Outcome::RequireMfa;
        }

        self.failed_attempts.remove(identity);
        Outcome::Ok
    }

    /// Check whether `identity` is locked at `timestamp`.
    ///
    /// Observing an expired lock removes the entry. That observation also
    /// consumes the one-shot post-lock MFA signal, so a caller that probes
    /// lock state out of band and then evaluates a successful login will see
    /// [`Outcome::Ok`] rather than [`Outcome::RequireMfa`].
    pub fn is_locked(&mut self, identity: &str, timestamp: DateTime<Utc>) -> bool {
        matches!(self.probe_lock(identity, timestamp), LockStatus::Active)
    }

    /// Lock expiry on record for `identity`, if any.
    ///
    /// Does not observe expiry: the returned timestamp may already be in the
    /// past if no evaluation has looked at the entry since it lapsed.
    pub fn locked_until(&self, identity: &str) -> Option<DateTime<Utc>> {
        self.locked_until.get(identity).copied()
    }

    /// Number of buffered failed attempts for `identity`.
    ///
    /// The buffer is trimmed on writes, so this reflects the window as of
    /// the identity's most recent failed attempt.
    pub fn failed_attempt_count(&self, identity: &str) -> usize {
        self.failed_attempts.get(identity).map_or(0, VecDeque::len)
    }

    /// Failed attempts within the window that trigger a lock
    pub fn fail_threshold(&self) -> u32 {
        self.fail_threshold
    }

    /// Probe and lazily clean the lock entry for `identity`.
    ///
    /// A lock is active while `timestamp < expiry`; equality means expired.
    fn probe_lock(&mut self, identity: &str, timestamp: DateTime<Utc>) -> LockStatus {
        match self.locked_until.get(identity) {
            Some(&expiry) if timestamp < expiry => LockStatus::Active,
            Some(_) => {
                self.locked_until.remove(identity);
                debug!("expired lock for identity {} removed", identity);
                LockStatus::JustExpired
            }
            None => LockStatus::Clear,
        }
    }

    /// Record a failed attempt and lock the identity if the window fills up.
    fn record_failed_attempt(&mut self, identity: &str, timestamp: DateTime<Utc>) {
        let attempts = self.failed_attempts.entry(identity.to_owned()).or_default();
        attempts.push_back(timestamp);

        // Drop attempts older than the window. An attempt exactly
        // `fail_window` old still counts.
        while let Some(&oldest) = attempts.front() {
            if timestamp.signed_duration_since(oldest) > self.fail_window {
                attempts.pop_front();
            } else {
                break;
            }
        }

        debug!(
            "recorded failed attempt for identity {} ({} in window)",
            identity,
            attempts.len()
        );

        if attempts.len() >= self.fail_threshold as usize {
            self.lock(identity, timestamp);
        }
    }

    /// Lock `identity`, starting at `lock_start`, and reset its counter.
    fn lock(&mut self, identity: &str, lock_start: DateTime<Utc>) {
        let expiry = lock_start + self.lock_duration;
        self.locked_until.insert(identity.to_owned(), expiry);
        self.failed_attempts.remove(identity);
        info!(
            "identity {} locked until {} after repeated failed attempts",
            identity, expiry
        );
    }
}
