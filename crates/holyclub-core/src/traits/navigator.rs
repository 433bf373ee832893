//! Navigation hook for backend-initiated logout.

/// Receives the signal that the backend terminated the session.
///
/// A browser client redirects to its logged-out landing page here; a CLI
/// tells the user to log in again.
pub trait Navigator: Send + Sync {
    /// Called once after the stored credential has been cleared.
    fn logged_out(&self);
}

/// A [`Navigator`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct StayPut;

impl Navigator for StayPut {
    fn logged_out(&self) {}
}
