//! # Cinemadise
//!
//! A cinema ticket booking flow built as explicit state machines on the
//! Cinemadise reducer architecture.
//!
//! The app is one linear flow: splash → auth → home → movie detail →
//! seat selection → payment → receipt. Each screen is a reducer of its
//! own; [`flow::FlowReducer`] composes them and owns navigation.
//!
//! What the architecture buys here:
//!
//! - The order total is derived from the seat selection on every read,
//!   never cached ([`seat_selection::SeatSelectionState::total`])
//! - Double-submitting a payment is a guarded no-op
//!   ([`payment::PaymentReducer`])
//! - Timers are epoch-stamped effects, so a carousel tick can never fire
//!   into a screen the user already left ([`flow::FlowAction::Deferred`])

/// Authentication screens: login, sign-up, OTP
pub mod auth;

/// Static movie and cinema catalog
pub mod catalog;

/// Injected dependencies and flow timings
pub mod environment;

/// The flow coordinator over all screens
pub mod flow;

/// Home screen: carousel and pull-to-refresh
pub mod home;

/// Payment method chooser and settlement machine
pub mod payment;

/// Payment gateway abstraction and mock
pub mod payment_gateway;

/// Receipt rendering and ticket export
pub mod receipt;

/// Seat selection state machine
pub mod seat_selection;

/// Shared domain types
pub mod types;

pub use environment::{AppEnvironment, SystemClock, Timings};
pub use flow::{FlowAction, FlowReducer, FlowState, Screen};
pub use types::{Money, Movie, MovieId, OrderContext, PaidOrder, PaymentMethod, SeatNumber};
