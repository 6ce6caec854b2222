use std::sync::Arc;

use tracing::debug;

use crate::api_client::{ApiClient, Backend};
use crate::config::Config;
use crate::errors::ClientError;
use crate::routes::{guard, Route};
use crate::session::store::{FileSessionStore, SessionStore};
use crate::session::SessionContext;
use crate::views::ViewContext;

/// Application shell: the shared session, the backend, and the current screen.
pub struct App {
    pub config: Config,
    ctx: ViewContext,
    current: Route,
}

impl App {
    /// Restores any persisted session and wires the HTTP backend to it.
    pub fn bootstrap(config: Config) -> Result<Self, ClientError> {
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&config.session_dir));
        let session = SessionContext::init(store)?;
        let backend = Arc::new(ApiClient::new(&config, session.clone())?);
        Ok(Self::with_backend(config, backend, session))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn Backend>, session: SessionContext) -> Self {
        let current = guard(Route::Dashboard, &session);
        Self {
            config,
            ctx: ViewContext::new(backend, session),
            current,
        }
    }

    pub fn context(&self) -> ViewContext {
        self.ctx.clone()
    }

    pub fn session(&self) -> &SessionContext {
        &self.ctx.session
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Navigates through the route guard and returns where the app landed.
    pub fn navigate(&mut self, requested: Route) -> &Route {
        let landed = guard(requested.clone(), &self.ctx.session);
        if landed != requested {
            debug!("Redirected {requested} -> {landed}");
        }
        self.current = landed;
        &self.current
    }
}
