//! Storage key constants.

/// Storage keys used by the client core
pub struct StorageKeys;

impl StorageKeys {
    /// Bearer credential for the storefront API
    pub const SESSION_CREDENTIAL: &'static str = "session_credential";

    /// Cached user info derived from the credential (JSON)
    pub const SESSION_USER_INFO: &'static str = "session_user_info";

    /// Email the user typed at login
    pub const SESSION_EMAIL: &'static str = "session_email";

    /// Local favorites mirror (JSON array)
    pub const FAVORITES_MIRROR: &'static str = "favorites_mirror";
}
