//! Session lifecycle management.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};
use vitrine_storage::{SessionVault, UserInfo};

use crate::claims::decode_claims;
use crate::error::{SessionError, SessionResult};
use crate::machine::{
    SessionMachine, SessionMachineInput, SessionState, SessionStateChangedPayload,
};
use crate::navigation::NavigationSink;
use crate::validator::TokenValidator;

/// Callback invoked on every observable session state change.
pub type SessionStateCallback = Box<dyn Fn(SessionStateChangedPayload) + Send + Sync>;

/// Session manager driving the session FSM over the vault.
///
/// The FSM owns the authoritative state; the vault holds the durable
/// pieces (credential, cached user info, typed email). User info is
/// mirrored in memory and written before the machine reports
/// `Authenticated`, so "authenticated implies user info" holds at the
/// instant the state flips.
pub struct SessionManager {
    vault: SessionVault,
    validator: TokenValidator,
    /// Internal FSM for tracking session state transitions.
    fsm: Mutex<SessionMachine>,
    /// In-memory user info, populated before Authenticated is announced.
    user_info: Mutex<Option<UserInfo>>,
    /// Optional callback for state change notifications.
    state_callback: Mutex<Option<SessionStateCallback>>,
    /// Optional sink for login-redirect signals.
    navigation: Mutex<Option<Arc<dyn NavigationSink>>>,
}

impl SessionManager {
    /// Create a new session manager over the given vault.
    pub fn new(vault: SessionVault) -> Self {
        let validator = TokenValidator::new(vault.clone());
        Self {
            vault,
            validator,
            fsm: Mutex::new(SessionMachine::new()),
            user_info: Mutex::new(None),
            state_callback: Mutex::new(None),
            navigation: Mutex::new(None),
        }
    }

    /// The validator this manager consults.
    pub fn validator(&self) -> TokenValidator {
        self.validator.clone()
    }

    /// The vault backing this manager.
    pub fn vault(&self) -> SessionVault {
        self.vault.clone()
    }

    /// Set a callback to be notified of session state changes.
    pub fn set_state_callback(&self, callback: SessionStateCallback) {
        let mut cb = self.state_callback.lock().unwrap();
        *cb = Some(callback);
    }

    /// Set the sink that receives login-redirect signals.
    pub fn set_navigation_sink(&self, sink: Arc<dyn NavigationSink>) {
        let mut nav = self.navigation.lock().unwrap();
        *nav = Some(sink);
    }

    /// Current UI-facing state.
    pub fn state(&self) -> SessionState {
        let fsm = self.fsm.lock().unwrap();
        SessionState::from(fsm.state())
    }

    /// Cached user info; present whenever the state is `Authenticated`.
    pub fn user_info(&self) -> Option<UserInfo> {
        self.user_info.lock().unwrap().clone()
    }

    /// Validate the stored credential and settle the machine.
    ///
    /// Called on startup and on UI re-renders. An unusable credential
    /// (absent, undecodable, expired, or missing its subject) clears the
    /// session, settles `Unauthenticated`, and signals a login redirect.
    /// A usable one populates user info and settles `Authenticated`.
    pub async fn check_auth_status(&self) -> SessionResult<SessionState> {
        // A rejected consume means another operation owns the machine;
        // report the visible state instead of racing it. The consume and
        // the guard check are one lock acquisition.
        if self
            .transition(&SessionMachineInput::RevalidateStarted)
            .is_err()
        {
            return Ok(self.state());
        }

        let verdict = self.validator.validate().await;
        if !verdict.should_redirect_to_login {
            if let Some(info) = self.load_user_info().await {
                debug!(user_id = %info.id, "stored credential accepted");
                return self.transition(&SessionMachineInput::CredentialAccepted);
            }
        }

        if verdict.has_credential {
            info!("stored credential unusable, clearing session");
        }
        let _ = self.vault.clear_session().await;
        self.set_cached_user_info(None);
        let state = self.transition(&SessionMachineInput::CredentialRejected)?;
        self.signal_redirect();
        Ok(state)
    }

    /// Settle a login performed against the remote API.
    ///
    /// The credential itself is stored by the API layer before this is
    /// called. The typed email, when supplied, is persisted and outranks
    /// whatever email the credential embeds. User info is rebuilt before
    /// the state flips to `Authenticated`.
    pub async fn login(&self, email: Option<&str>) -> SessionResult<SessionState> {
        self.transition(&SessionMachineInput::LoginStarted)?;

        if let Some(email) = email {
            if let Err(e) = self.vault.set_login_email(email).await {
                warn!(error = %e, "failed to persist login email");
            }
        }

        match self.rebuild_user_info().await {
            Some(info) => {
                info!(user_id = %info.id, "login settled");
                self.transition(&SessionMachineInput::CredentialAccepted)
            }
            None => {
                warn!("login without a decodable stored credential");
                let state = self.transition(&SessionMachineInput::CredentialRejected)?;
                self.signal_redirect();
                Ok(state)
            }
        }
    }

    /// Clear the session and settle `Unauthenticated`.
    ///
    /// The store is cleared before the state flips and before the
    /// navigation signal fires. While the clear is in flight the machine
    /// sits in `LoggingOut`, which blocks a concurrent revalidation from
    /// resurrecting `Authenticated` off stale keys.
    pub async fn logout(&self) -> SessionResult<()> {
        // If the machine cannot start a logout from here, clear storage anyway.
        let _ = self.transition(&SessionMachineInput::LogoutStarted);

        self.vault.clear_session().await?;
        self.set_cached_user_info(None);

        let _ = self.transition(&SessionMachineInput::LogoutFinished);
        self.signal_redirect();
        info!("logged out");
        Ok(())
    }

    /// Re-derive user info from the stored credential without changing
    /// the authentication state.
    pub async fn refresh_user_info_from_token(&self) -> Option<UserInfo> {
        self.rebuild_user_info().await
    }

    /// User info for startup validation: the previously cached record
    /// wins over a fresh derivation from the claims.
    async fn load_user_info(&self) -> Option<UserInfo> {
        if let Ok(Some(info)) = self.vault.user_info().await {
            self.set_cached_user_info(Some(info.clone()));
            return Some(info);
        }
        self.rebuild_user_info().await
    }

    /// Derive user info from the stored credential and cache it. The
    /// email typed at login wins over the one embedded in the claims.
    async fn rebuild_user_info(&self) -> Option<UserInfo> {
        let credential = self.vault.credential().await.ok().flatten()?;
        let claims = decode_claims(&credential)?;
        let subject = claims.subject.clone()?;

        let typed_email = self.vault.login_email().await.ok().flatten();
        let email = typed_email.or_else(|| claims.email.clone());

        let full_name = claims.name.clone().or_else(|| {
            match (&claims.given_name, &claims.family_name) {
                (Some(given), Some(family)) => Some(format!("{given} {family}")),
                _ => None,
            }
        });

        let info = UserInfo {
            id: subject,
            email,
            name: claims.name,
            first_name: claims.given_name,
            last_name: claims.family_name,
            full_name,
            username: claims.username,
        };

        if let Err(e) = self.vault.set_user_info(&info).await {
            warn!(error = %e, "failed to cache user info in store");
        }
        self.set_cached_user_info(Some(info.clone()));
        Some(info)
    }

    /// Transition the FSM and notify the callback if the visible state changed.
    fn transition(&self, input: &SessionMachineInput) -> SessionResult<SessionState> {
        let mut fsm = self.fsm.lock().unwrap();
        let old_state = SessionState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            SessionError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = SessionState::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(
                old_state = ?old_state,
                new_state = ?new_state,
                "Session state transition"
            );
            self.notify_state_change(new_state);
        }

        Ok(new_state)
    }

    fn set_cached_user_info(&self, info: Option<UserInfo>) {
        let mut cached = self.user_info.lock().unwrap();
        *cached = info;
    }

    /// Notify the callback of a state change.
    fn notify_state_change(&self, state: SessionState) {
        let cb = self.state_callback.lock().unwrap();
        if let Some(callback) = cb.as_ref() {
            let (user_id, email) = self
                .user_info
                .lock()
                .unwrap()
                .as_ref()
                .map(|info| (Some(info.id.clone()), info.email.clone()))
                .unwrap_or((None, None));

            callback(SessionStateChangedPayload {
                state,
                user_id,
                email,
            });
        }
    }

    fn signal_redirect(&self) {
        let nav = self.navigation.lock().unwrap();
        if let Some(sink) = nav.as_ref() {
            sink.redirect_to_login();
        }
    }
}
