//! Login and registration screens.

use crate::errors::ClientError;
use crate::models::user::{Credentials, Registration, Session};
use crate::views::{ViewContext, ViewCore};

pub struct AuthView {
    ctx: ViewContext,
    pub core: ViewCore,
}

fn require(label: &str, value: &str) -> Result<(), ClientError> {
    if value.trim().is_empty() {
        return Err(ClientError::validation(format!("{label} is required")));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<(), ClientError> {
    require("Email", email)?;
    if !email.contains('@') {
        return Err(ClientError::validation(format!(
            "'{email}' is not a valid email address"
        )));
    }
    Ok(())
}

impl AuthView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self { ctx, core }
    }

    /// Returns `true` once the session is persisted and current.
    pub async fn login(&mut self, credentials: Credentials) -> bool {
        let checked = require_email(&credentials.email)
            .and_then(|()| require("Password", &credentials.password));
        if let Err(err) = checked {
            self.core.fail(err);
            return false;
        }

        let credentials = Credentials {
            email: credentials.email.trim().to_string(),
            ..credentials
        };
        let session = self.core.run(self.ctx.backend.login(&credentials)).await;
        self.establish(session, "Welcome back")
    }

    pub async fn register(&mut self, registration: Registration) -> bool {
        let checked = require("Full name", &registration.full_name)
            .and_then(|()| require_email(&registration.email))
            .and_then(|()| require("Password", &registration.password));
        if let Err(err) = checked {
            self.core.fail(err);
            return false;
        }

        let registration = Registration {
            email: registration.email.trim().to_string(),
            full_name: registration.full_name.trim().to_string(),
            ..registration
        };
        let session = self.core.run(self.ctx.backend.register(&registration)).await;
        self.establish(session, "Account created")
    }

    fn establish(&mut self, session: Option<Session>, greeting: &str) -> bool {
        let Some(Session { token, user }) = session else {
            return false;
        };
        let name = user.full_name.clone();
        if let Err(err) = self.ctx.session.login(token, user) {
            self.core.fail(err);
            return false;
        }
        self.core.notify_success(format!("{greeting}, {name}"));
        true
    }
}
