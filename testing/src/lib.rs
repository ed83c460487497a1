//! # Checkin Testing
//!
//! Testing utilities for the check-in client.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time for reducers that stamp outcomes
//! - [`ReducerTest`]: Given-When-Then harness for a single reducer call
//! - [`assertions`]: helpers for inspecting returned effects
//!
//! ## Example
//!
//! ```ignore
//! use checkin_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(ScanGateReducer::new())
//!     .with_env(test_environment())
//!     .given_state(ScanSession::armed())
//!     .when_action(ScanGateAction::Acknowledge)
//!     .then_state(|session| assert!(!session.is_locked()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use checkin_core::environment::Clock;


/// Mock implementations of environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, so resolved scan outcomes carry a
    /// predictable timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use checkin_testing::mocks::FixedClock;
    /// use checkin_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
