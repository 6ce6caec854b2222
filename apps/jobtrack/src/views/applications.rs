use tracing::info;

use crate::models::application::{Application, ApplicationStatus};
use crate::views::{ViewContext, ViewCore};

pub struct ApplicationsView {
    ctx: ViewContext,
    pub core: ViewCore,
    pub applications: Vec<Application>,
    pub filter: Option<ApplicationStatus>,
}

impl ApplicationsView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self {
            ctx,
            core,
            applications: Vec::new(),
            filter: None,
        }
    }

    pub async fn load(&mut self) {
        if let Some(applications) = self.core.run(self.ctx.backend.list_applications()).await {
            self.applications = applications;
        }
    }

    /// Applications matching the current filter, in server order.
    pub fn visible(&self) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|a| self.filter.map_or(true, |status| a.status == status))
            .collect()
    }

    pub async fn update_status(&mut self, id: &str, status: ApplicationStatus) -> bool {
        let updated = self
            .core
            .run(self.ctx.backend.update_application_status(id, status))
            .await;
        if updated.is_none() {
            return false;
        }
        info!("Application {id} moved to {status}");
        self.core.notify_success(format!("Status updated to {status}"));
        self.load().await;
        true
    }
}

/// One application with its generated documents.
pub struct ApplicationDetailView {
    ctx: ViewContext,
    pub core: ViewCore,
    pub application: Option<Application>,
}

impl ApplicationDetailView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self {
            ctx,
            core,
            application: None,
        }
    }

    pub async fn load(&mut self, id: &str) {
        if let Some(application) = self.core.run(self.ctx.backend.fetch_application(id)).await {
            self.application = Some(application);
        }
    }
}
