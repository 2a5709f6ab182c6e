//! # Cinemadise Testing
//!
//! Test doubles and harnesses for Cinemadise reducers: a fixed clock,
//! a fluent Given-When-Then builder, and assertion helpers for effect
//! slices.
//!
//! ## Example
//!
//! ```ignore
//! use cinemadise_testing::test_clock;
//! use cinemadise_runtime::Store;
//!
//! #[tokio::test]
//! async fn test_seat_selection() {
//!     let env = test_environment();
//!     let store = Store::new(SeatSelectionState::default(), SeatSelectionReducer, env);
//!
//!     store.send(SeatSelectionAction::Toggle(SeatNumber::new(12))).await?;
//!
//!     let count = store.state(|s| s.selected.len()).await;
//!     assert_eq!(count, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use cinemadise_core::environment::Clock;

/// Fluent Given-When-Then harness for reducers
pub mod reducer_test;

/// Environment trait doubles
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// A clock pinned to one instant
    ///
    /// Receipt timestamps and anything else derived from `Clock::now` become
    /// stable in assertions.
    ///
    /// ```
    /// use cinemadise_testing::mocks::FixedClock;
    /// use cinemadise_core::environment::Clock;
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
        /// Pins the clock to `time`
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

    /// The conventional test clock, pinned to 2025-01-01 00:00:00 UTC
    ///
    /// # Panics
    ///
    /// Never in practice; the timestamp literal always parses.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

pub use mocks::{FixedClock, test_clock};
pub use reducer_test::ReducerTest;
