//! Given-When-Then harness for exercising a reducer in isolation

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use cinemadise_core::{effect::Effect, reducer::Reducer};

type StateAssertion<S> = Box<dyn FnOnce(&S)>;
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// One reduction, wrapped in a fluent builder
///
/// Collects a starting state, an action, and any number of assertions, then
/// runs the reducer exactly once when [`run`](Self::run) is called.
///
/// # Example
///
/// ```ignore
/// use cinemadise_testing::ReducerTest;
///
/// ReducerTest::new(SeatSelectionReducer)
///     .with_env(test_environment())
///     .given_state(SeatSelectionState::default())
///     .when_action(SeatSelectionAction::Toggle(SeatNumber::new(12)))
///     .then_state(|state| {
///         assert_eq!(state.selected.len(), 1);
///     })
///     .then_effects(|effects| {
///         assertions::assert_no_effects(effects);
///     })
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
}

impl<R, S, A, E> ReducerTest<R, S, A, E>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    S: Clone,
    A: Clone,
{
    /// Starts a test around `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Supplies the environment the reducer will see
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Given: the state before the action lands
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// When: the action under test
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Then: checks run against the state after reduction
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Then: checks run against the effects the reduction returned
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Performs the reduction and fires every registered assertion
    ///
    /// # Panics
    ///
    /// Panics when the builder is incomplete (missing state, action, or
    /// environment) or when any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("given_state() was not called");
        let action = self.action.expect("when_action() was not called");
        let env = self.environment.expect("with_env() was not called");

        let effects = self.reducer.reduce(&mut state, action, &env);

        for assertion in self.state_assertions {
            assertion(&state);
        }
        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Assertion helpers over effect slices
pub mod assertions {
    use cinemadise_core::effect::Effect;
    use std::time::Duration;

    /// Passes when the slice is empty or holds only `Effect::None`
    ///
    /// # Panics
    ///
    /// Panics when any real effect is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "expected no effects, found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Checks the slice length
    ///
    /// # Panics
    ///
    /// Panics when the count differs from `expected`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "expected {} effects, found {}",
            expected,
            effects.len()
        );
    }

    /// Checks that at least one `Future` effect was scheduled
    ///
    /// # Panics
    ///
    /// Panics when the slice holds no `Future`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "no Future effect in {} effects",
            effects.len()
        );
    }

    /// Checks that at least one `Delay` effect was scheduled
    ///
    /// # Panics
    ///
    /// Panics when the slice holds no `Delay`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_delay_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Delay { .. })),
            "no Delay effect in {} effects",
            effects.len()
        );
    }

    /// Checks for a `Delay` with exactly the given duration
    ///
    /// # Panics
    ///
    /// Panics when no `Delay` of that duration is present.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_delay_with_duration<A>(effects: &[Effect<A>], expected: Duration) {
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, Effect::Delay { duration, .. } if *duration == expected)),
            "no Delay of {expected:?} among the effects"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinemadise_core::effect::Effect;
    use cinemadise_core::reducer::Reducer;
    use std::time::Duration;

    #[derive(Clone, Debug)]
    struct PickerState {
        picked: u32,
    }

    #[derive(Clone, Debug)]
    enum PickerAction {
        Pick,
        Unpick,
        ScheduleReset,
    }

    struct PickerReducer;

    struct PickerEnv;

    impl Reducer for PickerReducer {
        type State = PickerState;
        type Action = PickerAction;
        type Environment = PickerEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> smallvec::SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                PickerAction::Pick => {
                    state.picked += 1;
                    smallvec::smallvec![Effect::None]
                }
                PickerAction::Unpick => {
                    state.picked = state.picked.saturating_sub(1);
                    smallvec::smallvec![Effect::None]
                }
                PickerAction::ScheduleReset => {
                    smallvec::smallvec![Effect::Delay {
                        duration: Duration::from_millis(800),
                        action: Box::new(PickerAction::Unpick),
                    }]
                }
            }
        }
    }

    #[test]
    fn test_reducer_test_pick() {
        ReducerTest::new(PickerReducer)
            .with_env(PickerEnv)
            .given_state(PickerState { picked: 0 })
            .when_action(PickerAction::Pick)
            .then_state(|state| {
                assert_eq!(state.picked, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_unpick() {
        ReducerTest::new(PickerReducer)
            .with_env(PickerEnv)
            .given_state(PickerState { picked: 5 })
            .when_action(PickerAction::Unpick)
            .then_state(|state| {
                assert_eq!(state.picked, 4);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<PickerAction>(&[Effect::None]);
        assertions::assert_no_effects::<PickerAction>(&[]);
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<PickerAction>::None], 1);
        assertions::assert_effects_count::<PickerAction>(&[], 0);
    }

    #[test]
    fn test_assertions_delay() {
        let effects = [Effect::Delay {
            duration: Duration::from_millis(800),
            action: Box::new(PickerAction::Unpick),
        }];
        assertions::assert_has_delay_effect(&effects);
        assertions::assert_has_delay_with_duration(&effects, Duration::from_millis(800));
    }
}
