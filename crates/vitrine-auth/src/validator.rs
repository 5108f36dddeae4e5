//! Session verdict computation.

use chrono::Utc;
use tracing::debug;
use vitrine_storage::SessionVault;

use crate::claims::{decode_claims, CredentialClaims};

/// How close to expiry a credential may get before the UI should warn.
pub const EXPIRY_WARNING_WINDOW_SECS: i64 = 300;

/// Structured judgment of a credential's usability.
///
/// Recomputed on every validation call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionVerdict {
    /// A credential string is present in the store.
    pub has_credential: bool,
    /// The credential decodes, is unexpired, and names a subject.
    pub is_valid: bool,
    /// The credential decodes but its expiry is in the past.
    pub is_expired: bool,
    /// The UI should bounce to the login entry point.
    pub should_redirect_to_login: bool,
    /// Expiry as epoch seconds, when the claims carry one.
    pub expires_at: Option<i64>,
    /// Seconds until expiry; negative once past it.
    pub seconds_remaining: Option<i64>,
}

impl SessionVerdict {
    /// Verdict for an empty store.
    fn absent() -> Self {
        Self {
            should_redirect_to_login: true,
            ..Self::default()
        }
    }

    /// Verdict for a stored credential whose claims cannot be read.
    fn malformed() -> Self {
        Self {
            has_credential: true,
            should_redirect_to_login: true,
            ..Self::default()
        }
    }

    /// Judge decoded claims against the given clock reading.
    fn from_claims(claims: &CredentialClaims, now_epoch_secs: i64) -> Self {
        let expires_at = match claims.expires_at {
            Some(exp) => exp,
            None => return Self::malformed(),
        };

        let seconds_remaining = expires_at - now_epoch_secs;
        let is_expired = seconds_remaining < 0;
        let is_valid = !is_expired && claims.subject.is_some();

        Self {
            has_credential: true,
            is_valid,
            is_expired,
            // Uniform rule: anything short of a valid credential sends
            // the user back to login.
            should_redirect_to_login: !is_valid,
            expires_at: Some(expires_at),
            seconds_remaining: Some(seconds_remaining),
        }
    }

    /// True when expiry falls within the warning window.
    pub fn is_expiring_soon(&self) -> bool {
        matches!(self.seconds_remaining, Some(s) if s <= EXPIRY_WARNING_WINDOW_SECS)
    }
}

/// Judge an explicit credential string at an explicit clock reading.
pub fn judge_credential(credential: &str, now_epoch_secs: i64) -> SessionVerdict {
    match decode_claims(credential) {
        Some(claims) => SessionVerdict::from_claims(&claims, now_epoch_secs),
        None => SessionVerdict::malformed(),
    }
}

/// Computes a [`SessionVerdict`] for the stored credential.
///
/// Validation is a pure read: it never mutates the store. A storage read
/// failure is folded into "no credential", which at worst forces a
/// re-login.
#[derive(Clone)]
pub struct TokenValidator {
    vault: SessionVault,
}

impl TokenValidator {
    pub fn new(vault: SessionVault) -> Self {
        Self { vault }
    }

    /// Judge the currently stored credential against the current clock.
    pub async fn validate(&self) -> SessionVerdict {
        let credential = match self.vault.credential().await {
            Ok(Some(credential)) => credential,
            Ok(None) => return SessionVerdict::absent(),
            Err(e) => {
                debug!(error = %e, "credential read failed, treating as absent");
                return SessionVerdict::absent();
            }
        };

        judge_credential(&credential, Utc::now().timestamp())
    }

    /// True when the stored credential expires within the warning window.
    pub async fn is_expiring_soon(&self) -> bool {
        self.validate().await.is_expiring_soon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;
    use std::sync::Arc;
    use vitrine_storage::{KeyValueStore, MemoryStore, StorageError, StorageKeys, StorageResult};

    fn token_with(claims: &serde_json::Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("h.{payload}.s")
    }

    fn valid_token(subject: &str, expires_in: i64) -> String {
        let now = Utc::now().timestamp();
        token_with(&json!({"sub": subject, "exp": now + expires_in}))
    }

    async fn vault_with_credential(credential: &str) -> SessionVault {
        let vault = SessionVault::new(Arc::new(MemoryStore::new()));
        vault.set_credential(credential).await.unwrap();
        vault
    }

    /// Store whose reads always fail, for the degraded-storage path.
    struct FailingStore;

    #[async_trait::async_trait]
    impl KeyValueStore for FailingStore {
        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Backend("write failed".to_string()))
        }

        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Backend("read failed".to_string()))
        }

        async fn remove(&self, _key: &str) -> StorageResult<bool> {
            Err(StorageError::Backend("delete failed".to_string()))
        }
    }

    #[tokio::test]
    async fn empty_store_yields_redirect_verdict() {
        let vault = SessionVault::new(Arc::new(MemoryStore::new()));
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(!verdict.has_credential);
        assert!(!verdict.is_valid);
        assert!(!verdict.is_expired);
        assert!(verdict.should_redirect_to_login);
        assert!(verdict.expires_at.is_none());
        assert!(verdict.seconds_remaining.is_none());
    }

    #[tokio::test]
    async fn failing_store_reads_as_absent() {
        let vault = SessionVault::new(Arc::new(FailingStore));
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(!verdict.has_credential);
        assert!(verdict.should_redirect_to_login);
    }

    #[tokio::test]
    async fn validation_after_a_partially_failed_clear_reads_absent() {
        /// Store whose removes fail for the email key only.
        struct StickyEmailStore {
            inner: MemoryStore,
        }

        #[async_trait::async_trait]
        impl KeyValueStore for StickyEmailStore {
            async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
                self.inner.set(key, value).await
            }

            async fn get(&self, key: &str) -> StorageResult<Option<String>> {
                self.inner.get(key).await
            }

            async fn remove(&self, key: &str) -> StorageResult<bool> {
                if key == StorageKeys::SESSION_EMAIL {
                    return Err(StorageError::Backend("delete failed".to_string()));
                }
                self.inner.remove(key).await
            }
        }

        let vault = SessionVault::new(Arc::new(StickyEmailStore {
            inner: MemoryStore::new(),
        }));
        vault
            .set_credential(&valid_token("user-1", 3600))
            .await
            .unwrap();
        vault.set_login_email("a@b.com").await.unwrap();

        vault.clear_session().await.unwrap();
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(!verdict.has_credential);
        assert!(verdict.should_redirect_to_login);
    }

    #[tokio::test]
    async fn fresh_credential_is_valid() {
        let vault = vault_with_credential(&valid_token("user-1", 3600)).await;
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(verdict.has_credential);
        assert!(verdict.is_valid);
        assert!(!verdict.is_expired);
        assert!(!verdict.should_redirect_to_login);
        let remaining = verdict.seconds_remaining.unwrap();
        assert!(remaining > 3500 && remaining <= 3600);
    }

    #[tokio::test]
    async fn expired_credential_redirects() {
        let vault = vault_with_credential(&valid_token("user-1", -10)).await;
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(verdict.has_credential);
        assert!(verdict.is_expired);
        assert!(!verdict.is_valid);
        assert!(verdict.should_redirect_to_login);
        assert!(verdict.seconds_remaining.unwrap() < 0);
    }

    #[tokio::test]
    async fn undecodable_credential_redirects() {
        let vault = vault_with_credential("definitely-not-a-token").await;
        let verdict = TokenValidator::new(vault).validate().await;

        assert!(verdict.has_credential);
        assert!(!verdict.is_valid);
        assert!(!verdict.is_expired);
        assert!(verdict.should_redirect_to_login);
    }

    #[test]
    fn claims_without_expiry_redirect() {
        let verdict = judge_credential(&token_with(&json!({"sub": "u"})), 1_000);

        assert!(verdict.has_credential);
        assert!(!verdict.is_valid);
        assert!(verdict.should_redirect_to_login);
        assert!(verdict.expires_at.is_none());
    }

    #[test]
    fn unexpired_claims_without_subject_redirect() {
        let verdict = judge_credential(&token_with(&json!({"exp": 2_000})), 1_000);

        assert!(!verdict.is_expired);
        assert!(!verdict.is_valid);
        assert!(verdict.should_redirect_to_login);
    }

    #[test]
    fn expiry_exactly_now_is_not_expired() {
        let verdict = judge_credential(&token_with(&json!({"sub": "u", "exp": 1_000})), 1_000);

        assert_eq!(verdict.seconds_remaining, Some(0));
        assert!(!verdict.is_expired);
        assert!(verdict.is_valid);
        assert!(!verdict.should_redirect_to_login);
    }

    #[test]
    fn expiring_soon_window_boundaries() {
        let at = |remaining: i64| SessionVerdict {
            has_credential: true,
            seconds_remaining: Some(remaining),
            ..SessionVerdict::default()
        };

        assert!(at(0).is_expiring_soon());
        assert!(at(300).is_expiring_soon());
        assert!(!at(301).is_expiring_soon());
        // Already past expiry still counts as "soon".
        assert!(at(-5).is_expiring_soon());
        // No expiry information, nothing to warn about.
        assert!(!SessionVerdict::default().is_expiring_soon());
    }
}
