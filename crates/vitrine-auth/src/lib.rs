//! Session and credential handling for the Vitrine client core.
//!
//! This crate provides:
//! - Claims extraction from the stored bearer credential
//! - Verdict computation over the credential (validity, expiry, redirect)
//! - Explicit FSM-based session state management
//! - A navigation contract for signaling login redirects to the UI shell

mod claims;
mod error;
mod machine;
mod navigation;
mod session;
mod validator;

pub use claims::{decode_claims, CredentialClaims};
pub use error::{SessionError, SessionResult};
pub use machine::session_machine;
pub use machine::{
    SessionMachine, SessionMachineInput, SessionMachineState, SessionState,
    SessionStateChangedPayload,
};
pub use navigation::{NavigationSink, NoopNavigation};
pub use session::{SessionManager, SessionStateCallback};
pub use validator::{
    judge_credential, SessionVerdict, TokenValidator, EXPIRY_WARNING_WINDOW_SECS,
};
