//! Remote-first favorites with a persisted local mirror.
//!
//! Every operation tries the remote collection first, behind a validated
//! credential, and degrades to the local mirror when the remote cannot
//! answer. Reads come wholesale from one source per call, so a caller
//! never sees a merge of remote and mirrored state.

pub mod local;
pub mod remote;
pub mod service;

pub use local::FavoritesMirror;
pub use remote::RemoteFavorites;
pub use service::{FavoritesService, FavoritesSnapshot, FavoritesSource};
