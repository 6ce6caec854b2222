//! Resource views: headless page controllers.
//!
//! Each view owns fetch/mutate logic for one or more backend resources and exposes the
//! fetched data plus a `ViewCore` (status, notification, cancellation scope) for rendering.
//! Mutations are fire-and-confirm: on success the view re-runs its initial fetch.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod jobs;
pub mod resume;
pub mod scope;

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::api_client::Backend;
use crate::errors::{ClientError, ErrorKind};
use crate::session::SessionContext;
use crate::views::scope::{ScopeHandle, ViewScope};

/// What every view needs: the backend and the shared session.
#[derive(Clone)]
pub struct ViewContext {
    pub backend: Arc<dyn Backend>,
    pub session: SessionContext,
}

impl ViewContext {
    pub fn new(backend: Arc<dyn Backend>, session: SessionContext) -> Self {
        Self { backend, session }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Error,
    /// Terminal: the session is gone and the view must hand over to the login screen.
    RedirectToLogin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Asks the user before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Always answers yes (`--yes` on the command line).
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// State machine shared by every view: `idle → loading → {idle, error}`,
/// with `redirect-to-login` as a terminal state.
pub struct ViewCore {
    status: ViewStatus,
    notification: Option<Notification>,
    session: SessionContext,
    scope: ViewScope,
}

impl ViewCore {
    pub fn new(session: SessionContext) -> Self {
        Self {
            status: ViewStatus::Idle,
            notification: None,
            session,
            scope: ViewScope::new(),
        }
    }

    pub fn status(&self) -> ViewStatus {
        self.status
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn take_notification(&mut self) -> Option<Notification> {
        self.notification.take()
    }

    pub fn redirect_to_login(&self) -> bool {
        self.status == ViewStatus::RedirectToLogin
    }

    pub fn scope_handle(&self) -> ScopeHandle {
        self.scope.handle()
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(Level::Success, message);
    }

    pub fn notify_warning(&mut self, message: impl Into<String>) {
        self.notify(Level::Warning, message);
    }

    fn notify(&mut self, level: Level, message: impl Into<String>) {
        self.notification = Some(Notification {
            level,
            message: message.into(),
        });
    }

    /// Issues `request` under the view's scope and folds the outcome into view state.
    /// Returns `None` on any failure; the caller leaves its data untouched in that case.
    pub async fn run<T, F>(&mut self, request: F) -> Option<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        if self.redirect_to_login() {
            return None;
        }
        let previous = self.status;
        self.status = ViewStatus::Loading;
        match self.scope.guard(request).await {
            Ok(value) => {
                self.status = ViewStatus::Idle;
                if self.notification.as_ref().is_some_and(|n| n.level == Level::Error) {
                    self.notification = None;
                }
                Some(value)
            }
            Err(err) if err.kind() == ErrorKind::Cancelled => {
                debug!("Request cancelled; keeping view state");
                self.status = previous;
                None
            }
            Err(err) => {
                self.fail(err);
                None
            }
        }
    }

    /// Records a failure that happened before (or instead of) a request.
    pub fn fail(&mut self, err: ClientError) {
        if err.kind() == ErrorKind::Cancelled {
            return;
        }
        if err.is_auth_failure() {
            if let Err(e) = self.session.logout() {
                warn!("Session teardown incomplete: {e}");
            }
            self.status = ViewStatus::RedirectToLogin;
        } else {
            self.status = ViewStatus::Error;
        }
        self.notify(Level::Error, err.user_message());
    }
}

#[cfg(test)]
pub(crate) mod testing;
