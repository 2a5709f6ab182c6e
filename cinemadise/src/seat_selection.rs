//! Seat selection state machine
//!
//! The core of the booking flow: a pure reducer over a set of selected
//! seats. The running total is never stored; it is recomputed from the
//! selection on every read, so the displayed summary can never go stale.

use crate::types::{Money, Movie, OrderContext, SeatNumber, SeatStatus};
use cinemadise_core::{Effect, Reducer, SmallVec, smallvec};
use std::collections::BTreeSet;

/// Named selection limits, injected rather than hard-coded at use sites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatPolicy {
    /// Number of seats in the dense 1-indexed grid
    pub seat_count: u32,
    /// Maximum seats a single order may hold
    pub max_seats: usize,
}

impl Default for SeatPolicy {
    fn default() -> Self {
        Self {
            seat_count: 40,
            max_seats: 5,
        }
    }
}

/// State of the seat selection screen
#[derive(Debug, Clone, PartialEq)]
pub struct SeatSelectionState {
    /// The movie being booked
    pub movie: Movie,
    /// Selection limits
    pub policy: SeatPolicy,
    /// Currently selected seats, kept in ascending order
    pub selected: BTreeSet<SeatNumber>,
}

impl SeatSelectionState {
    /// Creates an empty selection for the given movie
    #[must_use]
    pub fn new(movie: Movie, policy: SeatPolicy) -> Self {
        Self {
            movie,
            policy,
            selected: BTreeSet::new(),
        }
    }

    /// Total price of the current selection
    ///
    /// Recomputed on every call; the total is never cached.
    #[must_use]
    pub fn total(&self) -> Money {
        self.movie
            .seat_price
            .saturating_mul(self.selected.len() as u64)
    }

    /// Whether the flow may proceed to payment
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Rendering status of a seat
    #[must_use]
    pub fn seat_status(&self, seat: SeatNumber) -> SeatStatus {
        if self.selected.contains(&seat) {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    }

    /// Immutable snapshot handed to the payment stage
    ///
    /// Returns `None` while the selection is empty.
    #[must_use]
    pub fn order_context(&self) -> Option<OrderContext> {
        if self.selected.is_empty() {
            return None;
        }
        Some(OrderContext::new(
            self.movie.clone(),
            self.selected.iter().copied().collect(),
        ))
    }
}

/// Actions on the seat selection screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatSelectionAction {
    /// Toggle a seat in or out of the selection
    Toggle(SeatNumber),
}

/// Pure reducer for seat selection
///
/// Every action returns `Effect::None`; the machine has no side effects.
#[derive(Debug, Clone, Default)]
pub struct SeatSelectionReducer;

impl Reducer for SeatSelectionReducer {
    type State = SeatSelectionState;
    type Action = SeatSelectionAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SeatSelectionAction::Toggle(seat) => {
                // Out-of-range seats are ignored
                if seat.value() == 0 || seat.value() > state.policy.seat_count {
                    return smallvec![Effect::None];
                }

                if state.selected.contains(&seat) {
                    // Deselection is never blocked
                    state.selected.remove(&seat);
                } else if state.selected.len() < state.policy.max_seats {
                    state.selected.insert(seat);
                }
                // At capacity: silent no-op, never an error

                smallvec![Effect::None]
            },
        }
    }
}
