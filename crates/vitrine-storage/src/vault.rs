//! Typed session accessors over the raw key-value store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{KeyValueStore, StorageError, StorageKeys, StorageResult};

/// User identity derived from the bearer credential's claims, cached so
/// the UI does not re-decode the credential on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Stable user id (the credential's subject).
    pub id: String,
    /// Email address, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Full display name, denormalized from name parts when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Login handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Typed facade over the session keys in the store.
///
/// Every accessor returns a `StorageResult`; callers that prefer
/// availability over strictness map failures to "absent".
#[derive(Clone)]
pub struct SessionVault {
    store: Arc<dyn KeyValueStore>,
}

impl SessionVault {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for subsystems that keep their own keys.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    // ==========================================
    // Credential
    // ==========================================

    /// Store the bearer credential
    pub async fn set_credential(&self, credential: &str) -> StorageResult<()> {
        self.store
            .set(StorageKeys::SESSION_CREDENTIAL, credential)
            .await
    }

    /// Retrieve the bearer credential
    pub async fn credential(&self) -> StorageResult<Option<String>> {
        self.store.get(StorageKeys::SESSION_CREDENTIAL).await
    }

    // ==========================================
    // User info
    // ==========================================

    /// Store cached user info
    pub async fn set_user_info(&self, info: &UserInfo) -> StorageResult<()> {
        let json =
            serde_json::to_string(info).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.store.set(StorageKeys::SESSION_USER_INFO, &json).await
    }

    /// Retrieve cached user info
    pub async fn user_info(&self) -> StorageResult<Option<UserInfo>> {
        match self.store.get(StorageKeys::SESSION_USER_INFO).await? {
            Some(json) => {
                let info: UserInfo = serde_json::from_str(&json)
                    .map_err(|e| StorageError::Encoding(e.to_string()))?;
                Ok(Some(info))
            }
            None => Ok(None),
        }
    }

    // ==========================================
    // Login email
    // ==========================================

    /// Store the email the user typed at login
    pub async fn set_login_email(&self, email: &str) -> StorageResult<()> {
        self.store.set(StorageKeys::SESSION_EMAIL, email).await
    }

    /// Retrieve the email the user typed at login
    pub async fn login_email(&self) -> StorageResult<Option<String>> {
        self.store.get(StorageKeys::SESSION_EMAIL).await
    }

    /// Clear the whole session. Removal is sequential and best-effort;
    /// a key that fails to delete is indistinguishable from absent on
    /// the next validation pass.
    pub async fn clear_session(&self) -> StorageResult<()> {
        let _ = self.store.remove(StorageKeys::SESSION_CREDENTIAL).await;
        let _ = self.store.remove(StorageKeys::SESSION_USER_INFO).await;
        let _ = self.store.remove(StorageKeys::SESSION_EMAIL).await;
        debug!("session cleared");
        Ok(())
    }
}
