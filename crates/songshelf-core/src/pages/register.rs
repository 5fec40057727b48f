use tracing::{error, info};

use super::{AppContext, PageError, View};
use crate::navigation::Route;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const REGISTERED: &str = "Registration successful, please log in";

/// The sign-up form.
pub struct RegisterPage<'a> {
    ctx: &'a AppContext,
    view: &'a dyn View,
}

impl<'a> RegisterPage<'a> {
    pub fn new(ctx: &'a AppContext, view: &'a dyn View) -> Self {
        Self { ctx, view }
    }

    /// Create an account and send the user to the login page.
    pub async fn submit(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), PageError> {
        if password != confirm_password {
            self.view.show_error(PASSWORD_MISMATCH);
            return Err(PageError::Validation(PASSWORD_MISMATCH.to_string()));
        }

        self.view.show_loading();
        let result = self.ctx.gateway.register(username, email, password).await;
        self.view.hide_loading();

        if let Err(e) = result {
            error!(error = %e, "Registration failed");
            self.view.show_error(&e.message);
            return Err(e.into());
        }

        info!(username, "Account created");
        self.view.alert(REGISTERED);
        self.ctx.navigator.navigate(Route::Login);
        Ok(())
    }
}
