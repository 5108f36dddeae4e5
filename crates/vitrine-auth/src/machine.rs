//! Session state machine using rust-fsm.
//!
//! This module defines an explicit finite state machine for the session
//! lifecycle, replacing scattered boolean flags with one owned state.
//!
//! ## State Diagram
//!
//! ```text
//! ┌─────────────────┐
//! │     Loading     │ (initial)
//! └────────┬────────┘
//!          │ RevalidateStarted / LoginStarted / LogoutStarted
//!          ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │   Validating    │     │    LoggingIn    │
//! └────────┬────────┘     └────────┬────────┘
//!          │                       │
//!          │ CredentialAccepted    │ CredentialAccepted/CredentialRejected
//!          │ CredentialRejected    │
//!          ▼                       ▼
//! ┌─────────────────┐     ┌─────────────────┐
//! │  Authenticated  │     │ Unauthenticated │
//! └────────┬────────┘     └────────┬────────┘
//!          │ LogoutStarted         │ LoginStarted / RevalidateStarted
//!          ▼                       │
//! ┌─────────────────┐              │
//! │   LoggingOut    │ ─────────────┘
//! └─────────────────┘   LogoutFinished
//! ```
//!
//! The transient states double as the re-entrancy guard: while an
//! operation holds the machine in `Validating`, `LoggingIn`, or
//! `LoggingOut`, a concurrent revalidation has no legal transition and
//! cannot resurrect `Authenticated` mid-logout.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

// Define the FSM using rust-fsm's declarative macro
// This generates a module `session_machine` with:
// - session_machine::State (enum)
// - session_machine::Input (enum)
// - session_machine::StateMachine (type alias)
// - session_machine::Impl (trait impl)
state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Loading)

    Loading => {
        RevalidateStarted => Validating,
        LoginStarted => LoggingIn,
        LogoutStarted => LoggingOut
    },
    Validating => {
        CredentialAccepted => Authenticated,
        CredentialRejected => Unauthenticated
    },
    LoggingIn => {
        CredentialAccepted => Authenticated,
        CredentialRejected => Unauthenticated
    },
    Authenticated => {
        RevalidateStarted => Validating,
        LoginStarted => LoggingIn,
        LogoutStarted => LoggingOut
    },
    Unauthenticated => {
        RevalidateStarted => Validating,
        LoginStarted => LoggingIn
    },
    LoggingOut => {
        LogoutFinished => Unauthenticated
    }
}

// Re-export the generated types with clearer names
pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// UI-facing session state.
///
/// The machine's transient states are an implementation detail; anything
/// in flight reads as `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// The session is being established, validated, or torn down.
    Loading,
    /// No usable credential.
    Unauthenticated,
    /// Valid credential naming a known subject.
    Authenticated,
}

impl SessionState {
    /// Returns true when the session holds a valid credential.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    /// Returns true while an operation is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

impl From<&SessionMachineState> for SessionState {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Authenticated => SessionState::Authenticated,
            SessionMachineState::Unauthenticated => SessionState::Unauthenticated,
            SessionMachineState::Loading
            | SessionMachineState::Validating
            | SessionMachineState::LoggingIn
            | SessionMachineState::LoggingOut => SessionState::Loading,
        }
    }
}

/// Payload for session state change events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateChangedPayload {
    /// Current session state.
    pub state: SessionState,
    /// User id if authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// User email if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
