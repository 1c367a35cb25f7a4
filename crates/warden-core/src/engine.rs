//! Caller-side composition of the two login policies
//!
//! The policies are independent and can be used on their own; an
//! authentication gateway that wants both wires them together per login
//! event. [`PolicyEngine`] ships that wiring: the rate limiter is consulted
//! first and its verdict takes precedence, then a successful login is
//! checked against working hours.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::error::Result;
use crate::rate_limit::{Outcome, RateLimitPolicy};
use crate::working_hours::WorkingHoursPolicy;

/// A single login event supplied by the caller.
///
/// The event source (log parser, login handler) is an external collaborator;
/// the engine only requires that timestamps be monotonically non-decreasing
/// per identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    pub identity: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
}

/// Evaluates login attempts against both policies.
pub struct PolicyEngine {
    rate_limit: RateLimitPolicy,
    working_hours: WorkingHoursPolicy,
}

impl PolicyEngine {
    /// Compose an engine from already-built policies
    pub fn new(rate_limit: RateLimitPolicy, working_hours: WorkingHoursPolicy) -> Self {
        Self {
            rate_limit,
            working_hours,
        }
    }

    /// Build an engine from aggregate configuration
    pub fn with_config(config: &PolicyConfig) -> Result<Self> {
        Ok(Self::new(
            RateLimitPolicy::with_config(config.rate_limit.clone()),
            WorkingHoursPolicy::with_config(&config.working_hours)?,
        ))
    }

    /// Evaluate a login attempt against both policies.
    ///
    /// The rate limiter's verdict wins: `Locked` rejects outright and a
    /// post-lock `RequireMfa` passes through unchanged. A successful login
    /// that the rate limiter waves through is still flagged `RequireMfa`
    /// when it falls outside working hours. Failed attempts are never
    /// flagged for working-hours MFA, since a failed login does not proceed
    /// to a challenge.
    pub fn evaluate(&mut self, identity: &str, timestamp: DateTime<Utc>, success: bool) -> Outcome {
        match self.rate_limit.evaluate(identity, timestamp, success) {
            Outcome::Ok if success && self.working_hours.is_outside_working_hours(timestamp) => {
                Outcome::RequireMfa
            }
            outcome => outcome,
        }
    }

    /// Evaluate a login event struct
    pub fn evaluate_attempt(&mut self, attempt: &LoginAttempt) -> Outcome {
        self.evaluate(&attempt.identity, attempt.timestamp, attempt.success)
    }

    /// The composed rate limiter
    pub fn rate_limit(&self) -> &RateLimitPolicy {
        &self.rate_limit
    }

    /// The composed working-hours policy
    pub fn working_hours(&self) -> &WorkingHoursPolicy {
        &self.working_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn engine() -> PolicyEngine {
        PolicyEngine::with_config(&PolicyConfig::default()).unwrap()
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, hour, minute, 0).unwrap()
    }

    #[test]
    fn in_hours_success_is_ok() {
        let mut engine = engine();
        assert_eq!(engine.evaluate("alice", at(9, 0), true), Outcome::Ok);
    }

    #[test]
    fn out_of_hours_success_requires_mfa() {
        let mut engine = engine();
        assert_eq!(engine.evaluate("alice", at(22, 15), true), Outcome::RequireMfa);
    }

    #[test]
    fn out_of_hours_failure_is_not_flagged() {
        let mut engine = engine();
        assert_eq!(engine.evaluate("alice", at(22, 15), false), Outcome::Ok);
    }

    #[test]
    fn lock_takes_precedence_over_time_of_day() {
        let mut engine = engine();
        // Five failures inside the window lock the identity...
        for minute in 0..5 {
            engine.evaluate("alice", at(23, 0) + Duration::seconds(minute * 10), false);
        }
        // ...and the lock wins even though the attempt is also out of hours.
        assert_eq!(engine.evaluate("alice", at(23, 5), true), Outcome::Locked);
    }

    #[test]
    fn post_lock_mfa_passes_through() {
        let mut engine = engine();
        for minute in 0..5 {
            engine.evaluate("alice", at(9, 0) + Duration::minutes(minute), false);
        }
        // Lock started 09:04, expired 09:19; first success afterwards needs
        // MFA from the rate limiter even though it is inside working hours.
        assert_eq!(engine.evaluate("alice", at(9, 30), true), Outcome::RequireMfa);
        assert_eq!(engine.evaluate("alice", at(9, 31), true), Outcome::Ok);
    }

    #[test]
    fn evaluate_attempt_matches_evaluate() {
        let mut engine = engine();
        let attempt = LoginAttempt {
            identity: "alice".to_owned(),
            timestamp: at(9, 0),
            success: true,
        };
        assert_eq!(engine.evaluate_attempt(&attempt), Outcome::Ok);
    }

    #[test]
    fn login_attempt_deserializes_from_json() {
        let attempt: LoginAttempt = serde_json::from_str(
            r#"{"identity":"alice","timestamp":"2024-03-11T09:00:00Z","success":false}"#,
        )
        .unwrap();
        assert_eq!(attempt.identity, "alice");
        assert!(!attempt.success);
        assert_eq!(attempt.timestamp, at(9, 0));
    }
}
