use std::sync::Arc;

use tracing::{info, warn};

use super::SessionStore;
use crate::api::{ErrorHandler, Failure};
use crate::navigation::{Navigator, Route};

/// Gateway hook enforcing the 401 policy: clear the session, go to login.
///
/// Registered once per application context so no call site repeats it.
pub struct UnauthorizedGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl UnauthorizedGuard {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl ErrorHandler for UnauthorizedGuard {
    fn on_failure(&self, failure: &Failure) {
        if !failure.is_unauthorized() {
            return;
        }
        if let Err(e) = self.session.clear_token() {
            warn!(error = %e, "Failed to clear rejected token");
        }
        info!("Session rejected by backend, redirecting to login");
        self.navigator.navigate(Route::Login);
    }
}
