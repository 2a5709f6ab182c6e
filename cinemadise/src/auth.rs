//! Authentication screens: login, sign-up, and OTP verification
//!
//! Validation-only machines. Credentials are never checked against a
//! backend; the demo account is the only one that exists.

use cinemadise_core::{Effect, Reducer, SmallVec, smallvec};

/// The demo account e-mail
pub const DEMO_EMAIL: &str = "demo@cinemadise.com";

/// The demo account password
pub const DEMO_PASSWORD: &str = "123456";

/// Number of digits in an OTP code
pub const OTP_LENGTH: usize = 6;

/// State of the login screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginState {
    /// E-mail field
    pub email: String,
    /// Password field
    pub password: String,
    /// Inline validation error
    pub error: Option<String>,
    /// Set when the demo credentials matched
    pub authenticated: bool,
}

/// Actions on the login screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    /// E-mail field edited
    EmailChanged(String),
    /// Password field edited
    PasswordChanged(String),
    /// Submit the form
    Submit,
}

/// Reducer for the login screen
#[derive(Debug, Clone, Default)]
pub struct LoginReducer;

impl Reducer for LoginReducer {
    type State = LoginState;
    type Action = LoginAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            LoginAction::EmailChanged(email) => {
                state.email = email;
                state.error = None;
            },
            LoginAction::PasswordChanged(password) => {
                state.password = password;
                state.error = None;
            },
            LoginAction::Submit => {
                if state.email.trim().is_empty() || state.password.is_empty() {
                    state.error = Some("Please enter email and password".to_string());
                } else if state.email == DEMO_EMAIL && state.password == DEMO_PASSWORD {
                    state.error = None;
                    state.authenticated = true;
                } else {
                    state.error = Some("Invalid credentials".to_string());
                }
            },
        }
        smallvec![Effect::None]
    }
}

/// State of the sign-up screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpState {
    /// First name field
    pub first_name: String,
    /// Last name field
    pub last_name: String,
    /// Date of birth field
    pub date_of_birth: String,
    /// Phone number field
    pub phone: String,
    /// Country field
    pub country: String,
    /// State/region field
    pub region: String,
    /// City field
    pub city: String,
    /// E-mail field
    pub email: String,
    /// Terms and conditions checkbox
    pub agreed_terms: bool,
    /// Set when a complete form was submitted
    pub submitted: bool,
}

impl SignUpState {
    /// Whether all fields are filled and the terms are agreed
    #[must_use]
    pub fn can_continue(&self) -> bool {
        self.agreed_terms
            && [
                &self.first_name,
                &self.last_name,
                &self.date_of_birth,
                &self.phone,
                &self.country,
                &self.region,
                &self.city,
                &self.email,
            ]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

/// A text field on the sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpField {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Date of birth
    DateOfBirth,
    /// Phone number
    Phone,
    /// Country
    Country,
    /// State/region
    Region,
    /// City
    City,
    /// E-mail
    Email,
}

/// Actions on the sign-up screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpAction {
    /// A text field was edited
    SetField(SignUpField, String),
    /// Toggle the terms checkbox
    ToggleTerms,
    /// Submit the form
    Continue,
}

/// Reducer for the sign-up screen
#[derive(Debug, Clone, Default)]
pub struct SignUpReducer;

impl Reducer for SignUpReducer {
    type State = SignUpState;
    type Action = SignUpAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SignUpAction::SetField(field, value) => {
                let slot = match field {
                    SignUpField::FirstName => &mut state.first_name,
                    SignUpField::LastName => &mut state.last_name,
                    SignUpField::DateOfBirth => &mut state.date_of_birth,
                    SignUpField::Phone => &mut state.phone,
                    SignUpField::Country => &mut state.country,
                    SignUpField::Region => &mut state.region,
                    SignUpField::City => &mut state.city,
                    SignUpField::Email => &mut state.email,
                };
                *slot = value;
            },
            SignUpAction::ToggleTerms => {
                state.agreed_terms = !state.agreed_terms;
            },
            SignUpAction::Continue => {
                // Incomplete forms are a no-op, never an error
                if state.can_continue() {
                    state.submitted = true;
                }
            },
        }
        smallvec![Effect::None]
    }
}

/// State of the OTP verification screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OtpState {
    /// Entered digits, oldest first, at most [`OTP_LENGTH`]
    pub digits: Vec<u8>,
    /// Set when verify was pressed with an incomplete code
    pub rejected: bool,
    /// Set when a complete code was verified
    pub verified: bool,
}

impl OtpState {
    /// Whether all six digit slots are filled
    #[must_use]
    pub fn code_complete(&self) -> bool {
        self.digits.len() == OTP_LENGTH
    }
}

/// Actions on the OTP screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpAction {
    /// A digit key was pressed
    DigitEntered(u8),
    /// Backspace clears the most recent digit
    Backspace,
    /// Submit the code
    Verify,
}

/// Reducer for the OTP screen
#[derive(Debug, Clone, Default)]
pub struct OtpReducer;

impl Reducer for OtpReducer {
    type State = OtpState;
    type Action = OtpAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            OtpAction::DigitEntered(digit) => {
                if digit <= 9 && state.digits.len() < OTP_LENGTH {
                    state.digits.push(digit);
                    state.rejected = false;
                }
            },
            OtpAction::Backspace => {
                state.digits.pop();
                state.rejected = false;
            },
            OtpAction::Verify => {
                if state.code_complete() {
                    state.verified = true;
                } else {
                    // The original shakes the input row here
                    state.rejected = true;
                }
            },
        }
        smallvec![Effect::None]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinemadise_testing::ReducerTest;
    use cinemadise_testing::reducer_test::assertions;

    fn type_login(state: &mut LoginState, email: &str, password: &str) {
        let _ = LoginReducer.reduce(
            state,
            LoginAction::EmailChanged(email.to_string()),
            &(),
        );
        let _ = LoginReducer.reduce(
            state,
            LoginAction::PasswordChanged(password.to_string()),
            &(),
        );
    }

    #[test]
    fn login_blank_fields_show_inline_error() {
        ReducerTest::new(LoginReducer)
            .with_env(())
            .given_state(LoginState::default())
            .when_action(LoginAction::Submit)
            .then_state(|state| {
                assert_eq!(
                    state.error.as_deref(),
                    Some("Please enter email and password")
                );
                assert!(!state.authenticated);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn login_wrong_credentials_rejected() {
        let mut state = LoginState::default();
        type_login(&mut state, "someone@example.com", "password");

        let _ = LoginReducer.reduce(&mut state, LoginAction::Submit, &());

        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(!state.authenticated);
    }

    #[test]
    fn login_demo_credentials_accepted() {
        let mut state = LoginState::default();
        type_login(&mut state, DEMO_EMAIL, DEMO_PASSWORD);

        let _ = LoginReducer.reduce(&mut state, LoginAction::Submit, &());

        assert!(state.authenticated);
        assert!(state.error.is_none());
    }

    #[test]
    fn login_editing_clears_error() {
        let mut state = LoginState::default();
        let _ = LoginReducer.reduce(&mut state, LoginAction::Submit, &());
        assert!(state.error.is_some());

        let _ = LoginReducer.reduce(
            &mut state,
            LoginAction::EmailChanged("a".to_string()),
            &(),
        );
        assert!(state.error.is_none());
    }

    fn complete_signup() -> SignUpState {
        let mut state = SignUpState::default();
        let fields = [
            (SignUpField::FirstName, "Ada"),
            (SignUpField::LastName, "Okello"),
            (SignUpField::DateOfBirth, "1990-04-12"),
            (SignUpField::Phone, "+256700000000"),
            (SignUpField::Country, "Uganda"),
            (SignUpField::Region, "Central"),
            (SignUpField::City, "Kampala"),
            (SignUpField::Email, "ada@example.com"),
        ];
        for (field, value) in fields {
            let _ = SignUpReducer.reduce(
                &mut state,
                SignUpAction::SetField(field, value.to_string()),
                &(),
            );
        }
        state
    }

    #[test]
    fn signup_requires_every_field_and_terms() {
        let mut state = complete_signup();
        assert!(!state.can_continue()); // terms not yet agreed

        let _ = SignUpReducer.reduce(&mut state, SignUpAction::Continue, &());
        assert!(!state.submitted);

        let _ = SignUpReducer.reduce(&mut state, SignUpAction::ToggleTerms, &());
        assert!(state.can_continue());

        let _ = SignUpReducer.reduce(&mut state, SignUpAction::Continue, &());
        assert!(state.submitted);
    }

    #[test]
    fn signup_blank_field_blocks_continue() {
        let mut state = complete_signup();
        let _ = SignUpReducer.reduce(&mut state, SignUpAction::ToggleTerms, &());
        let _ = SignUpReducer.reduce(
            &mut state,
            SignUpAction::SetField(SignUpField::City, "  ".to_string()),
            &(),
        );

        let _ = SignUpReducer.reduce(&mut state, SignUpAction::Continue, &());
        assert!(!state.submitted);
    }

    #[test]
    fn otp_fills_slots_in_order() {
        let mut state = OtpState::default();
        for digit in [1, 2, 3, 4, 5, 6, 7] {
            let _ = OtpReducer.reduce(&mut state, OtpAction::DigitEntered(digit), &());
        }

        // The seventh digit is ignored
        assert_eq!(state.digits, vec![1, 2, 3, 4, 5, 6]);
        assert!(state.code_complete());
    }

    #[test]
    fn otp_backspace_clears_last_digit() {
        let mut state = OtpState::default();
        let _ = OtpReducer.reduce(&mut state, OtpAction::DigitEntered(9), &());
        let _ = OtpReducer.reduce(&mut state, OtpAction::Backspace, &());

        assert!(state.digits.is_empty());

        // Backspace on an empty row is harmless
        let _ = OtpReducer.reduce(&mut state, OtpAction::Backspace, &());
        assert!(state.digits.is_empty());
    }

    #[test]
    fn otp_incomplete_code_is_rejected() {
        let mut state = OtpState::default();
        let _ = OtpReducer.reduce(&mut state, OtpAction::DigitEntered(1), &());
        let _ = OtpReducer.reduce(&mut state, OtpAction::Verify, &());

        assert!(state.rejected);
        assert!(!state.verified);

        // Typing again clears the rejection
        let _ = OtpReducer.reduce(&mut state, OtpAction::DigitEntered(2), &());
        assert!(!state.rejected);
    }

    #[test]
    fn otp_complete_code_verifies() {
        let mut state = OtpState::default();
        for digit in [0, 0, 0, 0, 0, 0] {
            let _ = OtpReducer.reduce(&mut state, OtpAction::DigitEntered(digit), &());
        }
        let _ = OtpReducer.reduce(&mut state, OtpAction::Verify, &());

        assert!(state.verified);
        assert!(!state.rejected);
    }
}
