//! Mock payment gateway for development and testing.
//!
//! This module provides a simplified payment gateway interface. In
//! production, this would be replaced with an actual payment service
//! integration (card processor, mobile money aggregator, wallet ledger).

use crate::types::{OrderContext, PaymentMethod};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Payment gateway error
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The gateway declined the payment
    #[error("Payment declined: {reason}")]
    Declined {
        /// Decline reason
        reason: String,
    },
    /// The gateway did not respond in time
    #[error("Gateway timeout")]
    Timeout,
}

/// Receipt of a settled payment
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    /// Gateway settlement reference
    pub reference: String,
    /// Method the payment settled with
    pub method: PaymentMethod,
}

/// Payment gateway trait
///
/// Abstraction over payment processors. The settle future resolves once
/// the payment has either settled or been declined.
pub trait PaymentGateway: Send + Sync {
    /// Settle a payment for the given order
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the payment is declined or times out.
    fn settle(
        &self,
        order: &OrderContext,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Settlement>> + Send>>;
}

/// Mock payment gateway (always settles for development)
///
/// Simulates settlement latency with a fixed delay, then succeeds.
#[derive(Clone, Debug)]
pub struct MockPaymentGateway {
    delay: Duration,
}

impl MockPaymentGateway {
    /// Creates a mock gateway with the given simulated settlement delay
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates a mock gateway that settles without delay (for tests)
    #[must_use]
    pub const fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(delay: Duration) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(delay))
    }
}

impl PaymentGateway for MockPaymentGateway {
    fn settle(
        &self,
        order: &OrderContext,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<Settlement>> + Send>> {
        let delay = self.delay;
        let total = order.total;
        let seat_count = order.seats.len();

        Box::pin(async move {
            // Simulated settlement latency
            tokio::time::sleep(delay).await;

            let reference = format!("mock_stl_{}_{seat_count}", total.amount());

            tracing::info!(
                total = %total,
                method = %method,
                reference = %reference,
                "Mock payment settled"
            );

            Ok(Settlement { reference, method })
        })
    }
}
