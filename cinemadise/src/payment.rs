//! Payment method chooser and settlement state machine
//!
//! An explicit Choosing → Processing → Settled | Failed machine. Confirm
//! is idempotent while a settlement is in flight, so the downstream
//! receipt navigation fires exactly once.

use crate::environment::AppEnvironment;
use crate::types::{OrderContext, PaidOrder, PaymentMethod};
use cinemadise_core::{Effect, Reducer, SmallVec, async_effect, smallvec};

/// Phase of the payment state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentPhase {
    /// Picking a method; confirm not yet accepted
    Choosing,
    /// Settlement in flight; further confirms are ignored
    Processing,
    /// Settlement succeeded
    Settled,
    /// Settlement failed; confirm retries
    Failed {
        /// Gateway failure description
        reason: String,
    },
}

/// State of the payment screen
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentState {
    /// The order being paid for
    pub order: OrderContext,
    /// The currently chosen method, if any
    pub method: Option<PaymentMethod>,
    /// Current machine phase
    pub phase: PaymentPhase,
    /// User-visible prompt (e.g. "select a method first")
    pub prompt: Option<String>,
}

impl PaymentState {
    /// Creates a fresh payment screen for the given order
    #[must_use]
    pub const fn new(order: OrderContext) -> Self {
        Self {
            order,
            method: None,
            phase: PaymentPhase::Choosing,
            prompt: None,
        }
    }

    /// The settled order, once settlement has completed
    #[must_use]
    pub fn paid_order(&self) -> Option<PaidOrder> {
        if self.phase != PaymentPhase::Settled {
            return None;
        }
        self.method.map(|method| PaidOrder {
            order: self.order.clone(),
            method,
        })
    }
}

/// Actions on the payment screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentAction {
    /// Choose (or replace) the payment method
    SelectMethod(PaymentMethod),
    /// Submit the payment
    Confirm,
    /// Fed back by the gateway effect on success
    SettlementCompleted,
    /// Fed back by the gateway effect on failure
    SettlementFailed {
        /// Gateway failure description
        reason: String,
    },
}

/// Reducer for the payment state machine
#[derive(Debug, Clone, Default)]
pub struct PaymentReducer;

impl Reducer for PaymentReducer {
    type State = PaymentState;
    type Action = PaymentAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PaymentAction::SelectMethod(method) => {
                match state.phase {
                    PaymentPhase::Choosing | PaymentPhase::Failed { .. } => {
                        state.method = Some(method);
                        state.prompt = None;
                    },
                    // No method changes once settlement started
                    PaymentPhase::Processing | PaymentPhase::Settled => {},
                }
                smallvec![Effect::None]
            },
            PaymentAction::Confirm => match state.phase {
                // Idempotent submit guard
                PaymentPhase::Processing | PaymentPhase::Settled => {
                    tracing::debug!("Confirm ignored: settlement already in flight or done");
                    smallvec![Effect::None]
                },
                PaymentPhase::Choosing | PaymentPhase::Failed { .. } => {
                    let Some(method) = state.method else {
                        state.prompt = Some("Please select a payment method".to_string());
                        return smallvec![Effect::None];
                    };

                    state.phase = PaymentPhase::Processing;
                    state.prompt = None;

                    let settle = env.gateway.settle(&state.order, method);
                    smallvec![async_effect! {
                        match settle.await {
                            Ok(settlement) => {
                                tracing::debug!(
                                    reference = %settlement.reference,
                                    "Settlement completed"
                                );
                                Some(PaymentAction::SettlementCompleted)
                            },
                            Err(error) => Some(PaymentAction::SettlementFailed {
                                reason: error.to_string(),
                            }),
                        }
                    }]
                },
            },
            PaymentAction::SettlementCompleted => {
                // Only honored while processing; duplicates are no-ops
                if state.phase == PaymentPhase::Processing {
                    state.phase = PaymentPhase::Settled;
                }
                smallvec![Effect::None]
            },
            PaymentAction::SettlementFailed { reason } => {
                if state.phase == PaymentPhase::Processing {
                    tracing::warn!(reason = %reason, "Settlement failed");
                    state.phase = PaymentPhase::Failed { reason };
                }
                smallvec![Effect::None]
            },
        }
    }
}
