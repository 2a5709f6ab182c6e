//! Reducer composition
//!
//! Two ways to build a bigger reducer out of smaller ones:
//! - [`combine_reducers`] runs several reducers over the same state and action
//! - [`scope_reducer`] lifts a reducer written for a sub-state into a parent state
//!
//! # Examples
//!
//! ## Scoping a screen reducer into an app state
//!
//! ```
//! use cinemadise_core::{Reducer, Effect, SmallVec, smallvec};
//! use cinemadise_core::composition::scope_reducer;
//!
//! #[derive(Clone, Default)]
//! struct CarouselState {
//!     index: usize,
//! }
//!
//! #[derive(Clone)]
//! enum CarouselAction {
//!     Advance,
//! }
//!
//! struct CarouselReducer;
//!
//! impl Reducer for CarouselReducer {
//!     type State = CarouselState;
//!     type Action = CarouselAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Self::State,
//!         action: Self::Action,
//!         _env: &Self::Environment,
//!     ) -> SmallVec<[Effect<Self::Action>; 4]> {
//!         match action {
//!             CarouselAction::Advance => state.index += 1,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     carousel: CarouselState,
//!     title: String,
//! }
//!
//! let scoped = scope_reducer(
//!     CarouselReducer,
//!     |app: &AppState| &app.carousel,
//!     |app: &mut AppState, carousel: CarouselState| {
//!         app.carousel = carousel;
//!     },
//! );
//!
//! let mut state = AppState::default();
//! let _ = scoped.reduce(&mut state, CarouselAction::Advance, &());
//! assert_eq!(state.carousel.index, 1);
//! ```

use crate::effect::Effect;
use crate::reducer::Reducer;

/// Combines reducers that share state, action, and environment types.
///
/// Every reducer sees every action, in registration order, and their effects
/// are concatenated. Useful for splitting one screen's logic across files.
#[must_use]
pub fn combine_reducers<S, A, E>(
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E>>>,
) -> CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    CombinedReducer { reducers }
}

/// Runs its reducers in registration order. Created by [`combine_reducers`].
pub struct CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    reducers: Vec<Box<dyn Reducer<State = S, Action = A, Environment = E>>>,
}

impl<S, A, E> Reducer for CombinedReducer<S, A, E>
where
    S: 'static,
    A: Clone + 'static,
    E: 'static,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
        let mut all_effects = smallvec::SmallVec::new();

        for reducer in &self.reducers {
            let effects = reducer.reduce(state, action.clone(), env);
            all_effects.extend(effects);
        }

        all_effects
    }
}

/// Lifts a reducer written for `SubS` so it can run against a parent `S`.
///
/// `get_state` and `set_state` are plain function pointers so the scoped
/// reducer stays `'static` without capturing anything.
pub fn scope_reducer<S, SubS, A, E, R>(
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
) -> ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    ScopedReducer {
        reducer,
        get_state,
        set_state,
        _phantom: std::marker::PhantomData,
    }
}

/// Focuses a child reducer on one field of a larger state. Created by
/// [`scope_reducer`].
pub struct ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    reducer: R,
    get_state: fn(&S) -> &SubS,
    set_state: fn(&mut S, SubS),
    _phantom: std::marker::PhantomData<(A, E)>,
}

impl<S, SubS, A, E, R> Reducer for ScopedReducer<S, SubS, A, E, R>
where
    S: 'static,
    SubS: Clone + 'static,
    A: 'static,
    E: 'static,
    R: Reducer<State = SubS, Action = A, Environment = E>,
{
    type State = S;
    type Action = A;
    type Environment = E;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
        // Clone out, reduce, write back. The clone keeps the child reducer
        // oblivious to the parent state it lives in.
        let mut sub_state = (self.get_state)(state).clone();
        let effects = self.reducer.reduce(&mut sub_state, action, env);
        (self.set_state)(state, sub_state);

        effects
    }
}
