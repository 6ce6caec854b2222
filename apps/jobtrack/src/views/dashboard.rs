use crate::models::application::{most_recent, Application};
use crate::models::resume::Resume;
use crate::models::stats::Stats;
use crate::views::{ViewContext, ViewCore};

pub const RECENT_APPLICATIONS: usize = 5;

/// Landing page: aggregate counts, the current résumé, and the latest applications.
pub struct DashboardView {
    ctx: ViewContext,
    pub core: ViewCore,
    pub stats: Option<Stats>,
    pub resume: Option<Resume>,
    pub recent: Vec<Application>,
}

impl DashboardView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self {
            ctx,
            core,
            stats: None,
            resume: None,
            recent: Vec::new(),
        }
    }

    /// Fetches the three resources side by side; all must succeed for the view to update.
    pub async fn load(&mut self) {
        let backend = &self.ctx.backend;
        let fetched = self
            .core
            .run(async {
                tokio::try_join!(
                    backend.fetch_stats(),
                    backend.fetch_resume(),
                    backend.list_applications()
                )
            })
            .await;

        if let Some((stats, resume, applications)) = fetched {
            self.stats = Some(stats);
            self.resume = resume;
            self.recent = most_recent(&applications, RECENT_APPLICATIONS);
        }
    }
}
