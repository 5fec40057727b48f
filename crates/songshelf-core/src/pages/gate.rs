use tracing::debug;

use super::{AppContext, View};
use crate::navigation::Route;

/// Run the auth check a page performs on load.
///
/// Attaches any stored token to the gateway. Returns `false` after
/// redirecting to the login page when a protected page is opened without a
/// session; the caller must not continue loading in that case.
pub fn init_page(ctx: &AppContext, current: Route, view: &dyn View) -> bool {
    let Some(token) = ctx.session.token() else {
        if current.is_public() {
            return true;
        }
        debug!(page = %current, "No session, redirecting to login");
        ctx.navigator.navigate(Route::Login);
        return false;
    };

    ctx.gateway.set_auth_token(&token);
    view.show_username(&ctx.session.display_name_or_default());
    true
}
