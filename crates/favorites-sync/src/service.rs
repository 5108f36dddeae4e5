//! Remote-first favorites service.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vitrine_api::ApiError;
use vitrine_auth::{NavigationSink, TokenValidator};
use vitrine_catalog::{FavoriteProduct, Product};
use vitrine_storage::SessionVault;

use crate::local::FavoritesMirror;
use crate::remote::RemoteFavorites;

/// Which collection actually served an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesSource {
    /// The remote collection answered.
    Remote,
    /// The local mirror answered.
    LocalMirror,
}

/// A favorites listing together with the collection that produced it.
#[derive(Debug, Clone)]
pub struct FavoritesSnapshot {
    /// Where the items came from.
    pub source: FavoritesSource,
    /// The items, wholesale from that one source.
    pub items: Vec<FavoriteProduct>,
}

/// Favorites with remote-first semantics.
///
/// Every operation runs the same two-step strategy: attempt the remote
/// collection with a validated credential, and on any failure degrade to
/// the local mirror. No operation propagates a remote error to the
/// caller, and `list` returns exactly one source per call, never a merge
/// of both.
pub struct FavoritesService {
    validator: TokenValidator,
    vault: SessionVault,
    remote: Arc<dyn RemoteFavorites>,
    mirror: FavoritesMirror,
    /// Optional sink for login-redirect signals.
    navigation: Mutex<Option<Arc<dyn NavigationSink>>>,
}

impl FavoritesService {
    /// Create a service over the given vault and remote collection.
    pub fn new(vault: SessionVault, remote: Arc<dyn RemoteFavorites>) -> Self {
        let validator = TokenValidator::new(vault.clone());
        let mirror = FavoritesMirror::new(vault.store());
        Self {
            validator,
            vault,
            remote,
            mirror,
            navigation: Mutex::new(None),
        }
    }

    /// Set the sink that receives login-redirect signals.
    pub fn set_navigation_sink(&self, sink: Arc<dyn NavigationSink>) {
        let mut nav = self.navigation.lock().unwrap();
        *nav = Some(sink);
    }

    /// Add a product to favorites. Idempotent on both paths.
    pub async fn add(&self, product: &Product) -> FavoritesSource {
        if let Some(token) = self.usable_credential().await {
            match self.remote.add(&product.id, &token).await {
                Ok(()) => return FavoritesSource::Remote,
                Err(e) => self.degrade_on_failure("add", &e),
            }
        }

        if let Err(e) = self.mirror.add(product).await {
            warn!(error = %e, "local favorites add failed");
        }
        FavoritesSource::LocalMirror
    }

    /// Remove a product from favorites.
    pub async fn remove(&self, product_id: &str) -> FavoritesSource {
        if let Some(token) = self.usable_credential().await {
            match self.remote.remove(product_id, &token).await {
                Ok(()) => return FavoritesSource::Remote,
                Err(e) => self.degrade_on_failure("remove", &e),
            }
        }

        if let Err(e) = self.mirror.remove(product_id).await {
            warn!(error = %e, "local favorites remove failed");
        }
        FavoritesSource::LocalMirror
    }

    /// List favorites from exactly one source.
    pub async fn list(&self) -> FavoritesSnapshot {
        if let Some(token) = self.usable_credential().await {
            match self.remote.list(&token).await {
                Ok(items) => {
                    return FavoritesSnapshot {
                        source: FavoritesSource::Remote,
                        items,
                    };
                }
                Err(e) => self.degrade_on_failure("list", &e),
            }
        }

        let items = match self.mirror.list().await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "local favorites read failed, returning empty");
                Vec::new()
            }
        };
        FavoritesSnapshot {
            source: FavoritesSource::LocalMirror,
            items,
        }
    }

    /// Remove every favorite.
    pub async fn clear(&self) -> FavoritesSource {
        if let Some(token) = self.usable_credential().await {
            match self.remote.clear(&token).await {
                Ok(()) => return FavoritesSource::Remote,
                Err(e) => self.degrade_on_failure("clear", &e),
            }
        }

        if let Err(e) = self.mirror.clear().await {
            warn!(error = %e, "local favorites clear failed");
        }
        FavoritesSource::LocalMirror
    }

    /// Step one of every operation: consult the validator. An unusable
    /// verdict clears the session and signals a login redirect, and the
    /// operation proceeds against the local mirror instead of failing.
    async fn usable_credential(&self) -> Option<String> {
        let verdict = self.validator.validate().await;
        if verdict.should_redirect_to_login {
            if verdict.has_credential {
                info!("favorites call found an unusable credential, clearing session");
            }
            let _ = self.vault.clear_session().await;
            self.signal_redirect();
            return None;
        }

        self.vault.credential().await.ok().flatten()
    }

    /// The degrade-on-failure policy: any remote error is logged and the
    /// operation falls through to the local mirror.
    fn degrade_on_failure(&self, operation: &str, error: &ApiError) {
        warn!(
            operation,
            error = %error,
            "remote favorites call failed, degrading to local mirror"
        );
    }

    fn signal_redirect(&self) {
        let nav = self.navigation.lock().unwrap();
        if let Some(sink) = nav.as_ref() {
            sink.redirect_to_login();
        }
    }
}
