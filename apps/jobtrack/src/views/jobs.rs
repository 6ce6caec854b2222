use tracing::info;

use crate::models::application::Application;
use crate::models::job::{Job, NewJob};
use crate::views::{Confirm, ViewContext, ViewCore};

pub struct JobsView {
    ctx: ViewContext,
    pub core: ViewCore,
    pub jobs: Vec<Job>,
}

impl JobsView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self {
            ctx,
            core,
            jobs: Vec::new(),
        }
    }

    pub async fn load(&mut self) {
        if let Some(jobs) = self.core.run(self.ctx.backend.list_jobs()).await {
            self.jobs = jobs;
        }
    }

    pub fn find(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub async fn create(&mut self, form: NewJob) -> Option<Job> {
        let form = match form.validated() {
            Ok(form) => form,
            Err(err) => {
                self.core.fail(err);
                return None;
            }
        };

        let created = self.core.run(self.ctx.backend.create_job(&form)).await?;
        info!("Created job {} ({})", created.id, created.title);
        self.core
            .notify_success(format!("Added {} at {}", created.title, created.company));
        self.load().await;
        Some(created)
    }

    /// Deletes only after `confirm` agrees; declining sends nothing.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> bool {
        let label = self
            .find(id)
            .map(|j| format!("{} at {}", j.title, j.company))
            .unwrap_or_else(|| format!("job {id}"));
        if !confirm.confirm(&format!("Delete {label}?")) {
            return false;
        }

        if self.core.run(self.ctx.backend.delete_job(id)).await.is_none() {
            return false;
        }
        self.core.notify_success(format!("Deleted {label}"));
        self.load().await;
        true
    }

    /// Asks the backend to generate a tailored résumé and cover letter for `job_id`.
    pub async fn apply(&mut self, job_id: &str) -> Option<Application> {
        let application = self.core.run(self.ctx.backend.apply_to_job(job_id)).await?;
        info!("Applied to {} at {}", application.job_title, application.company);
        self.core.notify_success(format!(
            "Application for {} at {} created",
            application.job_title, application.company
        ));
        self.load().await;
        Some(application)
    }
}
