//! Home screen: poster carousel and pull-to-refresh
//!
//! The carousel is driven by a self-rescheduling delay effect. Each tick
//! advances the index and schedules the next tick, so the timer chain
//! lives entirely in the reducer.

use crate::catalog;
use crate::environment::AppEnvironment;
use cinemadise_core::{Effect, Reducer, SmallVec, delay, smallvec};

/// State of the home screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeState {
    /// Number of posters in the carousel
    pub poster_count: usize,
    /// Index of the poster currently shown
    pub carousel_index: usize,
    /// Pull-to-refresh in flight
    pub refreshing: bool,
}

impl Default for HomeState {
    fn default() -> Self {
        Self {
            poster_count: catalog::POSTER_COUNT,
            carousel_index: 0,
            refreshing: false,
        }
    }
}

/// Actions on the home screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    /// Auto-advance the carousel and schedule the next tick
    CarouselTick,
    /// Manual swipe to a specific poster
    SwipeTo(usize),
    /// Pull-to-refresh gesture
    RefreshRequested,
    /// Fed back when the simulated refresh settles
    RefreshSettled,
}

/// Reducer for the home screen
#[derive(Debug, Clone, Default)]
pub struct HomeReducer;

impl Reducer for HomeReducer {
    type State = HomeState;
    type Action = HomeAction;
    type Environment = AppEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            HomeAction::CarouselTick => {
                if state.poster_count > 0 {
                    state.carousel_index = (state.carousel_index + 1) % state.poster_count;
                }
                // Reschedule; the chain is cut upstream on navigation
                smallvec![delay! {
                    duration: env.timings.carousel,
                    action: HomeAction::CarouselTick
                }]
            },
            HomeAction::SwipeTo(index) => {
                if index < state.poster_count {
                    state.carousel_index = index;
                }
                smallvec![Effect::None]
            },
            HomeAction::RefreshRequested => {
                // Busy guard
                if state.refreshing {
                    tracing::debug!("Refresh ignored: one already in flight");
                    return smallvec![Effect::None];
                }
                state.refreshing = true;
                smallvec![delay! {
                    duration: env.timings.refresh,
                    action: HomeAction::RefreshSettled
                }]
            },
            HomeAction::RefreshSettled => {
                state.refreshing = false;
                smallvec![Effect::None]
            },
        }
    }
}
