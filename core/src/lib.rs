//! # Cinemadise Core
//!
//! Core traits and types for the Cinemadise reducer architecture.
//!
//! This crate provides the fundamental abstractions for modeling interactive
//! flows as explicit state machines using the Reducer pattern.
//!
//! ## Building blocks
//!
//! - **State**: the data behind one screen or flow
//! - **Action**: every input a reducer accepts, whether a user intent, a
//!   timer tick, or a completion fed back from an effect
//! - **Reducer**: the pure transition `(State, Action, Environment)` into a
//!   mutated state plus effects
//! - **Effect**: a description of side work, never the work itself
//! - **Environment**: trait objects standing in for clocks, gateways, and
//!   other dependencies
//!
//! State only changes inside a reducer, effects are the only route to I/O,
//! and every dependency arrives through the environment.
//!
//! ## Example
//!
//! ```ignore
//! use cinemadise_core::*;
//!
//! #[derive(Clone, Debug, Default)]
//! struct SelectionState {
//!     picked: Vec<u32>,
//! }
//!
//! #[derive(Clone, Debug)]
//! enum SelectionAction {
//!     Toggle(u32),
//! }
//!
//! impl Reducer for SelectionReducer {
//!     type State = SelectionState;
//!     type Action = SelectionAction;
//!     type Environment = SelectionEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SelectionState,
//!         action: SelectionAction,
//!         env: &SelectionEnvironment,
//!     ) -> SmallVec<[Effect<SelectionAction>; 4]> {
//!         // Toggle the seat, cap the selection, and so on
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

// Re-exports so downstream crates rarely need chrono/smallvec directly
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

pub use effect::Effect;
pub use reducer::Reducer;

/// Reducer composition utilities (`combine_reducers`, `scope_reducer`)
pub mod composition;

/// Declarative macros for ergonomic effect construction
pub mod effect_macros;

/// The reducer trait, home of all business logic
///
/// A reducer turns `(State, Action, Environment)` into a state mutation plus
/// a list of effect descriptions. No I/O happens inside `reduce`.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// A pure state-transition function for one feature
    ///
    /// Every screen or flow implements this once. Determinism is the whole
    /// point: anything time- or I/O-dependent arrives through `Environment`
    /// or leaves as an [`Effect`].
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for PaymentReducer {
    ///     type State = PaymentState;
    ///     type Action = PaymentAction;
    ///     type Environment = PaymentEnvironment;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut PaymentState,
    ///         action: PaymentAction,
    ///         env: &PaymentEnvironment,
    ///     ) -> SmallVec<[Effect<PaymentAction>; 4]> {
    ///         match action {
    ///             PaymentAction::Confirm => {
    ///                 // Kick off settlement, guard re-entry
    ///                 smallvec![Effect::None]
    ///             }
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// Domain state this reducer owns
        type State;

        /// Inputs this reducer understands
        type Action;

        /// Injected dependencies (clocks, gateways, timings)
        type Environment;

        /// Applies `action` to `state` and describes the side effects
        ///
        /// Invalid transitions must be no-ops returning `Effect::None`,
        /// never panics.
        ///
        /// Most reducers return one or two effects, hence the inline
        /// capacity of 4.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Side-effect descriptions returned from reducers
///
/// An `Effect` is a value, not a running task. The store runtime owns
/// execution; reducers only say what should happen.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// What the runtime should do after a reduction
    ///
    /// `Action` is the feedback type: effects that produce an action get it
    /// dispatched back through the same reducer.
    pub enum Effect<Action> {
        /// Nothing to do
        None,

        /// Execute all at once
        Parallel(Vec<Effect<Action>>),

        /// Execute one after another
        Sequential(Vec<Effect<Action>>),

        /// Dispatch `action` after `duration` (splash timers, carousels,
        /// simulated latency)
        Delay {
            /// Wait before dispatching
            duration: Duration,
            /// Fed back once the wait elapses
            action: Box<Action>,
        },

        /// Arbitrary async work; a `Some` result is fed back as an action
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Future has no Debug, so derive is out
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Groups effects for concurrent execution
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Groups effects for ordered, one-at-a-time execution
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }
    }

    impl<Action: Send + 'static> Effect<Action> {
        /// Re-home an effect's actions into a parent action type
        ///
        /// Used by coordinating reducers that embed child reducers: the
        /// child's effects are mapped so that actions they produce come
        /// back wrapped in the parent's action type.
        ///
        /// ```ignore
        /// let effects = payment_reducer.reduce(&mut payment, action, env);
        /// effects.into_iter().map(|e| e.map(FlowAction::Payment))
        /// ```
        #[must_use]
        pub fn map<B, F>(self, f: F) -> Effect<B>
        where
            B: Send + 'static,
            F: Fn(Action) -> B + Send + Sync + Clone + 'static,
        {
            match self {
                Effect::None => Effect::None,
                Effect::Parallel(effects) => Effect::Parallel(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Sequential(effects) => Effect::Sequential(
                    effects.into_iter().map(|e| e.map(f.clone())).collect(),
                ),
                Effect::Delay { duration, action } => Effect::Delay {
                    duration,
                    action: Box::new(f(*action)),
                },
                Effect::Future(fut) => {
                    Effect::Future(Box::pin(async move { fut.await.map(f) }))
                },
            }
        }
    }
}

/// Dependency-injection traits shared across environments
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Source of the current time
    ///
    /// Production environments wrap `Utc::now()`; tests pin a fixed instant
    /// so timestamps in assertions are stable.
    pub trait Clock: Send + Sync {
        /// The current moment
        fn now(&self) -> DateTime<Utc>;
    }
}
