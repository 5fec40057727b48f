use tracing::{error, info, warn};

use super::{AppContext, PageError, View};
use crate::models::UserInfo;
use crate::navigation::Route;

pub const MISSING_CREDENTIALS: &str = "Username and password required";

/// The sign-in form.
pub struct LoginPage<'a> {
    ctx: &'a AppContext,
    view: &'a dyn View,
}

impl<'a> LoginPage<'a> {
    pub fn new(ctx: &'a AppContext, view: &'a dyn View) -> Self {
        Self { ctx, view }
    }

    /// Sign in, persist the session and go to the dashboard.
    pub async fn submit(&self, username: &str, password: &str) -> Result<(), PageError> {
        if username.is_empty() || password.is_empty() {
            self.view.show_error(MISSING_CREDENTIALS);
            return Err(PageError::Validation(MISSING_CREDENTIALS.to_string()));
        }

        self.view.show_loading();
        let result = self.ctx.gateway.login(username, password).await;
        self.view.hide_loading();

        let auth = match result {
            Ok(auth) => auth,
            Err(e) => {
                error!(error = %e, "Login failed");
                self.view.show_error(&e.message);
                return Err(e.into());
            }
        };

        if let Err(e) = self.ctx.session.save_token(&auth.token) {
            let message = format!("Could not save session: {}", e);
            self.view.show_error(&message);
            return Err(PageError::Local(message));
        }
        if let Err(e) = self.ctx.session.save_user_info(&UserInfo::from(&auth)) {
            warn!(error = %e, "Failed to save user info");
        }
        self.ctx.gateway.set_auth_token(&auth.token);

        info!("Login successful");
        self.ctx.navigator.navigate(Route::Dashboard);
        Ok(())
    }
}
