//! Booking flow coordinator
//!
//! One linear state machine over every screen in the app. Each screen's
//! reducer stays its own; the flow reducer embeds them, re-homes their
//! effects, and owns navigation.
//!
//! Timer and effect feedback is epoch-stamped: every navigation bumps
//! `FlowState::epoch`, and deferred actions carrying a stale epoch are
//! dropped. That is how a splash timer or carousel tick scheduled on one
//! screen can never fire into the next.

use crate::auth::{
    LoginAction, LoginReducer, LoginState, OtpAction, OtpReducer, OtpState, SignUpAction,
    SignUpReducer, SignUpState,
};
use crate::catalog;
use crate::environment::AppEnvironment;
use crate::home::{HomeAction, HomeReducer, HomeState};
use crate::payment::{PaymentAction, PaymentReducer, PaymentState};
use crate::receipt::{Receipt, ReceiptAction, ReceiptReducer, ReceiptState};
use crate::seat_selection::{SeatSelectionAction, SeatSelectionReducer, SeatSelectionState};
use crate::types::{Movie, MovieId};
use cinemadise_core::{Effect, Reducer, SmallVec, delay, smallvec};

/// The screen currently shown
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Branded splash, shown before anything else
    Splash,
    /// Landing with the login / sign-up choice
    AuthLanding,
    /// Login form
    Login(LoginState),
    /// Sign-up form
    SignUp(SignUpState),
    /// OTP verification after sign-up
    OtpVerify(OtpState),
    /// Home with the poster carousel
    Home(HomeState),
    /// Detail page for one movie
    MovieDetail {
        /// The movie being viewed
        movie: Movie,
    },
    /// Seat picker
    SeatSelection(SeatSelectionState),
    /// Payment method chooser
    Payment(PaymentState),
    /// Ticket receipt
    Receipt(ReceiptState),
}

/// State of the whole booking flow
#[derive(Debug, Clone, PartialEq)]
pub struct FlowState {
    /// Current screen
    pub screen: Screen,
    /// Bumped on every navigation; stale deferred actions are dropped
    pub epoch: u64,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            screen: Screen::Splash,
            epoch: 0,
        }
    }
}

/// Actions on the booking flow
#[derive(Debug, Clone, PartialEq)]
pub enum FlowAction {
    /// Boot the app; schedules the splash timer
    Start,
    /// Fed back when the splash timer fires
    SplashFinished,
    /// Pick login on the auth landing
    ChooseLogin,
    /// Pick sign-up on the auth landing
    ChooseSignUp,
    /// Login screen action
    Login(LoginAction),
    /// Sign-up screen action
    SignUp(SignUpAction),
    /// OTP screen action
    Otp(OtpAction),
    /// Home screen action
    Home(HomeAction),
    /// Open a movie's detail page from home
    SelectMovie(MovieId),
    /// Enter the seat picker from a movie detail page
    BuyTickets,
    /// Seat picker action
    SeatSelection(SeatSelectionAction),
    /// Hand the selection to payment
    ProceedToPayment,
    /// Payment screen action
    Payment(PaymentAction),
    /// Receipt screen action
    Receipt(ReceiptAction),
    /// Leave the receipt and return home
    BackToHome,
    /// One step back in the linear flow
    Back,
    /// An action stamped with the epoch it was scheduled under
    Deferred {
        /// Epoch at scheduling time
        epoch: u64,
        /// The wrapped action
        action: Box<FlowAction>,
    },
}

/// Coordinating reducer over the whole flow
#[derive(Debug, Clone, Default)]
pub struct FlowReducer;

type FlowEffects = SmallVec<[Effect<FlowAction>; 4]>;

/// Stamp an action with the given epoch
fn deferred(epoch: u64, action: FlowAction) -> FlowAction {
    FlowAction::Deferred {
        epoch,
        action: Box::new(action),
    }
}

/// Re-home child effects, stamping their feedback with the epoch they
/// were produced under
fn defer_child<A, F>(effects: SmallVec<[Effect<A>; 4]>, epoch: u64, wrap: F) -> FlowEffects
where
    A: Send + 'static,
    F: Fn(A) -> FlowAction + Send + Sync + Clone + 'static,
{
    effects
        .into_iter()
        .map(|effect| {
            let wrap = wrap.clone();
            effect.map(move |action| deferred(epoch, wrap(action)))
        })
        .collect()
}

impl FlowReducer {
    /// Navigate home and start the carousel timer chain
    fn enter_home(state: &mut FlowState, env: &AppEnvironment) -> FlowEffects {
        state.screen = Screen::Home(HomeState::default());
        state.epoch += 1;
        smallvec![delay! {
            duration: env.timings.carousel,
            action: deferred(state.epoch, FlowAction::Home(HomeAction::CarouselTick))
        }]
    }
}

impl Reducer for FlowReducer {
    type State = FlowState;
    type Action = FlowAction;
    type Environment = AppEnvironment;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FlowAction::Deferred { epoch, action } => {
                if epoch == state.epoch {
                    self.reduce(state, *action, env)
                } else {
                    tracing::trace!(
                        scheduled = epoch,
                        current = state.epoch,
                        "Dropping stale deferred action"
                    );
                    smallvec![Effect::None]
                }
            },
            FlowAction::Start => {
                if state.screen != Screen::Splash {
                    return smallvec![Effect::None];
                }
                smallvec![delay! {
                    duration: env.timings.splash,
                    action: deferred(state.epoch, FlowAction::SplashFinished)
                }]
            },
            FlowAction::SplashFinished => {
                if state.screen == Screen::Splash {
                    state.screen = Screen::AuthLanding;
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::ChooseLogin => {
                if state.screen == Screen::AuthLanding {
                    state.screen = Screen::Login(LoginState::default());
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::ChooseSignUp => {
                if state.screen == Screen::AuthLanding {
                    state.screen = Screen::SignUp(SignUpState::default());
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::Login(child) => {
                let Screen::Login(login) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let _ = LoginReducer.reduce(login, child, &());
                if login.authenticated {
                    return Self::enter_home(state, env);
                }
                smallvec![Effect::None]
            },
            FlowAction::SignUp(child) => {
                let Screen::SignUp(signup) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let _ = SignUpReducer.reduce(signup, child, &());
                if signup.submitted {
                    state.screen = Screen::OtpVerify(OtpState::default());
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::Otp(child) => {
                let Screen::OtpVerify(otp) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let _ = OtpReducer.reduce(otp, child, &());
                if otp.verified {
                    return Self::enter_home(state, env);
                }
                smallvec![Effect::None]
            },
            FlowAction::Home(child) => {
                let epoch = state.epoch;
                let Screen::Home(home) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let effects = HomeReducer.reduce(home, child, env);
                defer_child(effects, epoch, FlowAction::Home)
            },
            FlowAction::SelectMovie(id) => {
                if !matches!(state.screen, Screen::Home(_)) {
                    return smallvec![Effect::None];
                }
                if let Some(movie) = catalog::movie(id) {
                    state.screen = Screen::MovieDetail { movie };
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::BuyTickets => {
                if let Screen::MovieDetail { movie } = &state.screen {
                    let selection = SeatSelectionState::new(movie.clone(), env.seat_policy);
                    state.screen = Screen::SeatSelection(selection);
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::SeatSelection(child) => {
                let Screen::SeatSelection(selection) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let _ = SeatSelectionReducer.reduce(selection, child, &());
                smallvec![Effect::None]
            },
            FlowAction::ProceedToPayment => {
                let Screen::SeatSelection(selection) = &state.screen else {
                    return smallvec![Effect::None];
                };
                // Gated on a non-empty selection
                if let Some(order) = selection.order_context() {
                    state.screen = Screen::Payment(PaymentState::new(order));
                    state.epoch += 1;
                }
                smallvec![Effect::None]
            },
            FlowAction::Payment(child) => {
                let epoch = state.epoch;
                let Screen::Payment(payment) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let child_effects = PaymentReducer.reduce(payment, child, env);
                let effects = defer_child(child_effects, epoch, FlowAction::Payment);
                if let Some(paid) = payment.paid_order() {
                    // Receipt timestamp is taken now, at render time
                    let receipt = Receipt::new(paid, env.clock.now());
                    state.screen = Screen::Receipt(ReceiptState::new(receipt));
                    state.epoch += 1;
                }
                effects
            },
            FlowAction::Receipt(child) => {
                let epoch = state.epoch;
                let Screen::Receipt(receipt) = &mut state.screen else {
                    return smallvec![Effect::None];
                };
                let effects = ReceiptReducer.reduce(receipt, child, env);
                defer_child(effects, epoch, FlowAction::Receipt)
            },
            FlowAction::BackToHome => {
                if matches!(state.screen, Screen::Receipt(_)) {
                    return Self::enter_home(state, env);
                }
                smallvec![Effect::None]
            },
            FlowAction::Back => match &state.screen {
                Screen::Login(_) | Screen::SignUp(_) => {
                    state.screen = Screen::AuthLanding;
                    state.epoch += 1;
                    smallvec![Effect::None]
                },
                Screen::OtpVerify(_) => {
                    state.screen = Screen::SignUp(SignUpState::default());
                    state.epoch += 1;
                    smallvec![Effect::None]
                },
                Screen::MovieDetail { .. } => Self::enter_home(state, env),
                Screen::SeatSelection(selection) => {
                    let movie = selection.movie.clone();
                    state.screen = Screen::MovieDetail { movie };
                    state.epoch += 1;
                    smallvec![Effect::None]
                },
                Screen::Payment(payment) => {
                    // Leaving payment discards the order; the picker
                    // comes back empty
                    let movie = payment.order.movie.clone();
                    state.screen =
                        Screen::SeatSelection(SeatSelectionState::new(movie, env.seat_policy));
                    state.epoch += 1;
                    smallvec![Effect::None]
                },
                // The receipt only leaves via BackToHome
                Screen::Splash
                | Screen::AuthLanding
                | Screen::Home(_)
                | Screen::Receipt(_) => smallvec![Effect::None],
            },
        }
    }
}
