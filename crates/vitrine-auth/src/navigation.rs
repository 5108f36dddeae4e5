//! Navigation signaling contract.

/// Receives "go to the login entry point" signals.
///
/// The session core never navigates by itself. It reports intent through
/// this trait and the UI shell decides what a redirect means on its
/// platform.
pub trait NavigationSink: Send + Sync {
    /// The session became unusable; show the login entry point.
    fn redirect_to_login(&self);
}

/// Sink that drops every signal, for headless use and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigation;

impl NavigationSink for NoopNavigation {
    fn redirect_to_login(&self) {}
}
