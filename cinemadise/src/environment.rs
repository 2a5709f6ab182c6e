//! Application environment: injected dependencies and timings
//!
//! Every side-effecting dependency the reducers touch lives here, so
//! tests can swap in fixed clocks, instant gateways, and stub exporters.

use crate::payment_gateway::PaymentGateway;
use crate::receipt::TicketExporter;
use crate::seat_selection::SeatPolicy;
use chrono::{DateTime, Utc};
use cinemadise_core::environment::Clock;
use std::sync::Arc;
use std::time::Duration;

/// Wall-clock timings of the flow's timers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Splash screen dwell before the auth landing
    pub splash: Duration,
    /// Interval between carousel auto-advances
    pub carousel: Duration,
    /// Simulated pull-to-refresh latency
    pub refresh: Duration,
    /// Simulated payment settlement latency
    pub settlement: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            splash: Duration::from_millis(2500),
            carousel: Duration::from_millis(4000),
            refresh: Duration::from_millis(800),
            settlement: Duration::from_millis(2000),
        }
    }
}

impl Timings {
    /// Timings for tests: timers fire immediately, except the carousel
    /// which is pushed out far enough to never fire during a test run.
    #[must_use]
    pub const fn fast() -> Self {
        Self {
            splash: Duration::from_millis(1),
            carousel: Duration::from_secs(60),
            refresh: Duration::from_millis(1),
            settlement: Duration::from_millis(1),
        }
    }
}

/// System clock backed by [`Utc::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Dependencies injected into the application's reducers
pub struct AppEnvironment {
    /// Wall-clock source
    pub clock: Arc<dyn Clock>,
    /// Payment settlement backend
    pub gateway: Arc<dyn PaymentGateway>,
    /// Ticket image exporter
    pub exporter: Arc<dyn TicketExporter>,
    /// Flow timer durations
    pub timings: Timings,
    /// Seat grid and capacity limits
    pub seat_policy: SeatPolicy,
}

impl Clone for AppEnvironment {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
            gateway: Arc::clone(&self.gateway),
            exporter: Arc::clone(&self.exporter),
            timings: self.timings,
            seat_policy: self.seat_policy,
        }
    }
}

impl std::fmt::Debug for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEnvironment")
            .field("timings", &self.timings)
            .field("seat_policy", &self.seat_policy)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings_match_the_flow() {
        let timings = Timings::default();
        assert_eq!(timings.splash, Duration::from_millis(2500));
        assert_eq!(timings.carousel, Duration::from_millis(4000));
        assert_eq!(timings.refresh, Duration::from_millis(800));
        assert_eq!(timings.settlement, Duration::from_millis(2000));
    }

    #[test]
    fn environment_clones_share_dependencies() {
        let env = test_support::env();
        let other = env.clone();

        assert!(Arc::ptr_eq(&env.gateway, &other.gateway));
        assert!(Arc::ptr_eq(&env.exporter, &other.exporter));
        assert_eq!(env.timings, other.timings);
    }
}
