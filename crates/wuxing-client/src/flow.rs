//! The login flow state machine.
//!
//! ```text
//! EnterEmail ──(submit_email + code response)──→ AwaitCode
//!     ↑                                             │
//!     └──────────────(back)───────────────────────┘ │
//!                                                    ▼
//!                        (verify response)──→ LoggedIn
//! ```
//!
//! The step only advances when the *server's* response arrives — submitting
//! an email produces a request message but stays on the email step until
//! the code response confirms the send. Failures land in
//! [`last_error`](LoginFlow::last_error) for the inline labels and leave
//! the step unchanged.

use wuxing_protocol::{ClientMessage, Elements, ServerMessage};

use crate::{FlowError, is_valid_email};

/// The profile payload of a successful login, as shown on the main screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSummary {
    pub nickname: String,
    pub level: u32,
    pub experience: i64,
    pub gold: i64,
    pub elements: Elements,
}

/// Which step of the login UI is active.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    /// Step one: the email input.
    EnterEmail,
    /// Step two: the six code inputs and the countdown.
    /// `issued_at` is the server's issue timestamp, echoed back verbatim
    /// in the verify request.
    AwaitCode { email: String, issued_at: i64 },
    /// Login finished; the main screen takes over.
    LoggedIn { profile: ProfileSummary },
}

/// Drives the two-step login exchange.
pub struct LoginFlow {
    state: FlowState,
    /// The address a code request is in flight for. Promoted into
    /// `AwaitCode` when the server confirms the send.
    pending_email: Option<String>,
    last_error: Option<String>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::EnterEmail,
            pending_email: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// The current inline error text, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validates the email input and produces the code request to send.
    ///
    /// The step does not advance yet — that happens when the server's
    /// [`ServerMessage::VerificationCodeResponse`] comes back through
    /// [`handle_response`](Self::handle_response).
    pub fn submit_email(
        &mut self,
        email: &str,
    ) -> Result<ClientMessage, FlowError> {
        if !matches!(self.state, FlowState::EnterEmail) {
            return Err(self.fail(FlowError::WrongStep {
                action: "submit_email",
            }));
        }

        let email = email.trim();
        if email.is_empty() {
            return Err(self.fail(FlowError::EmptyEmail));
        }
        if !is_valid_email(email) {
            return Err(self.fail(FlowError::InvalidEmail));
        }

        self.last_error = None;
        self.pending_email = Some(email.to_string());
        tracing::info!(email, "requesting verification code");
        Ok(ClientMessage::RequestVerificationCode {
            email: email.to_string(),
        })
    }

    /// Validates the assembled code and produces the verify request.
    ///
    /// Only valid on the code step; the code must be exactly six digits
    /// (the six single-character inputs, concatenated).
    pub fn submit_code(
        &mut self,
        code: &str,
    ) -> Result<ClientMessage, FlowError> {
        let (email, issued_at) = match &self.state {
            FlowState::AwaitCode { email, issued_at } => {
                (email.clone(), *issued_at)
            }
            _ => {
                return Err(self.fail(FlowError::WrongStep {
                    action: "submit_code",
                }));
            }
        };

        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.fail(FlowError::IncompleteCode));
        }

        self.last_error = None;
        tracing::info!(email, "verifying code");
        Ok(ClientMessage::VerifyCode {
            email,
            code: code.to_string(),
            timestamp: issued_at,
        })
    }

    /// Produces a fresh code request for the address on the code step.
    ///
    /// The new issue timestamp arrives with the response; until then the
    /// old one stays valid in `AwaitCode`.
    pub fn resend(&mut self) -> Result<ClientMessage, FlowError> {
        let FlowState::AwaitCode { email, .. } = &self.state else {
            return Err(self.fail(FlowError::WrongStep { action: "resend" }));
        };

        let email = email.clone();
        self.pending_email = Some(email.clone());
        self.last_error = None;
        tracing::info!(email, "re-requesting verification code");
        Ok(ClientMessage::RequestVerificationCode { email })
    }

    /// Returns from the code step to the email step.
    pub fn back(&mut self) {
        if matches!(self.state, FlowState::AwaitCode { .. }) {
            self.state = FlowState::EnterEmail;
            self.pending_email = None;
            self.last_error = None;
        }
    }

    /// Feeds a decoded server message into the flow.
    ///
    /// Messages that don't belong to the current step (including GM
    /// responses, which the flow doesn't own) are ignored.
    pub fn handle_response(&mut self, msg: &ServerMessage) {
        match msg {
            ServerMessage::VerificationCodeResponse {
                timestamp,
                success,
                message,
            } => self.on_code_response(*timestamp, *success, message),
            ServerMessage::VerifyCodeResponse {
                success,
                message,
                nickname,
                level,
                experience,
                gold,
                elements,
            } => {
                if *success {
                    self.on_login(ProfileSummary {
                        nickname: nickname.clone(),
                        level: *level,
                        experience: *experience,
                        gold: *gold,
                        elements: *elements,
                    });
                } else {
                    tracing::info!(message, "verification failed");
                    self.last_error = Some(message.clone());
                }
            }
            ServerMessage::GmCommandResponse { .. } => {}
        }
    }

    fn on_code_response(
        &mut self,
        timestamp: i64,
        success: bool,
        message: &str,
    ) {
        if !success {
            tracing::warn!(message, "code request failed");
            self.last_error = Some(message.to_string());
            return;
        }

        let email = match self.pending_email.take() {
            Some(email) => email,
            None => match &self.state {
                // A resend confirmation with no pending address refreshes
                // the timestamp for the current one.
                FlowState::AwaitCode { email, .. } => email.clone(),
                _ => {
                    tracing::debug!("ignoring unsolicited code response");
                    return;
                }
            },
        };

        tracing::info!(email, timestamp, "code sent, switching to code step");
        self.last_error = None;
        self.state = FlowState::AwaitCode {
            email,
            issued_at: timestamp,
        };
    }

    fn on_login(&mut self, profile: ProfileSummary) {
        if !matches!(self.state, FlowState::AwaitCode { .. }) {
            tracing::debug!("ignoring verify response outside code step");
            return;
        }
        tracing::info!(nickname = %profile.nickname, "login successful");
        self.last_error = None;
        self.state = FlowState::LoggedIn { profile };
    }

    /// Records the error text for the inline label and passes the error
    /// through.
    fn fail(&mut self, error: FlowError) -> FlowError {
        self.last_error = Some(error.to_string());
        error
    }
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
