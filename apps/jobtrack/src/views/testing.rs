//! In-memory `Backend` used by the view tests. Mirrors the REST backend's observable behavior.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::api_client::{Backend, UploadFile};
use crate::errors::ClientError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::job::{Job, NewJob};
use crate::models::resume::{ParsedResume, Resume, UploadReceipt};
use crate::models::stats::Stats;
use crate::models::user::{Credentials, Registration, Session, User};
use crate::session::store::MemorySessionStore;
use crate::session::SessionContext;

pub const PASSWORD: &str = "secret";

pub fn user() -> User {
    User {
        id: "u1".to_string(),
        full_name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        created_at: None,
    }
}

/// An authenticated session backed by a memory store.
pub fn session() -> SessionContext {
    let session = Session {
        token: "tok".to_string(),
        user: user(),
    };
    SessionContext::init(Arc::new(MemorySessionStore::with_session(session))).unwrap()
}

pub fn anonymous() -> SessionContext {
    SessionContext::init(Arc::new(MemorySessionStore::new())).unwrap()
}

pub fn job(id: &str, title: &str, company: &str) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        location: None,
        url: None,
        description: format!("{title} at {company}"),
        requirements: "Rust".to_string(),
        added_at: None,
    }
}

pub fn resume() -> Resume {
    Resume {
        id: "r1".to_string(),
        file_name: "cv.pdf".to_string(),
        uploaded_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        parsed_data: ParsedResume {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555-0100".to_string(),
            summary: "Analyst".to_string(),
            skills: vec!["Mathematics".to_string(), "Poetry".to_string()],
            experience: vec![crate::models::resume::Experience {
                title: "Collaborator".to_string(),
                company: "Analytical Engine".to_string(),
                duration: "1842-1843".to_string(),
                description: "Wrote the first program".to_string(),
            }],
            education: vec![],
            keywords: vec!["algorithm".to_string()],
            parse_error: None,
        },
    }
}

#[derive(Default)]
struct State {
    resume: Option<Resume>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    calls: Vec<String>,
    expired: bool,
    hang: bool,
    fail_next: Option<(u16, String)>,
    parsed_override: Option<ParsedResume>,
    applied_counter: i64,
}

#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        self.lock().jobs = jobs;
        self
    }

    pub fn with_resume(self, resume: Resume) -> Self {
        self.lock().resume = Some(resume);
        self
    }

    pub fn with_applications(self, applications: Vec<Application>) -> Self {
        self.lock().applications = applications;
        self
    }

    /// Uploads come back with `parsed` instead of the sample résumé.
    pub fn with_parse_result(self, parsed: ParsedResume) -> Self {
        self.lock().parsed_override = Some(parsed);
        self
    }

    /// Every authenticated call answers 401 from now on.
    pub fn expire_session(&self) {
        self.lock().expired = true;
    }

    /// Every call stays pending forever.
    pub fn hang(&self) {
        self.lock().hang = true;
    }

    /// The next call fails with an API error.
    pub fn fail_next(&self, status: u16, message: &str) {
        self.lock().fail_next = Some((status, message.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn call_log(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.lock().jobs.clone()
    }

    pub fn applications(&self) -> Vec<Application> {
        self.lock().applications.clone()
    }

    pub fn stored_resume(&self) -> Option<Resume> {
        self.lock().resume.clone()
    }

    async fn enter(&self, call: String, authenticated: bool) -> Result<(), ClientError> {
        let hang = {
            let mut state = self.lock();
            state.calls.push(call);
            if let Some((status, message)) = state.fail_next.take() {
                return Err(ClientError::Api { status, message });
            }
            if authenticated && state.expired {
                return Err(ClientError::Unauthorized);
            }
            state.hang
        };
        if hang {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

pub fn application(id: &str, job: &Job, status: ApplicationStatus, day: u32) -> Application {
    Application {
        id: id.to_string(),
        job_id: Some(job.id.clone()),
        job_title: job.title.clone(),
        company: job.company.clone(),
        status,
        applied_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
        updated_at: None,
        tailored_resume: Some(format!("Resume for {}", job.title)),
        cover_letter: Some(format!("Dear {}", job.company)),
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        self.enter("login".to_string(), false).await?;
        if credentials.email == user().email && credentials.password == PASSWORD {
            Ok(Session {
                token: "fresh-token".to_string(),
                user: user(),
            })
        } else {
            Err(ClientError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        self.enter("register".to_string(), false).await?;
        if registration.email == user().email {
            return Err(ClientError::Api {
                status: 400,
                message: "Email already registered".to_string(),
            });
        }
        Ok(Session {
            token: "new-token".to_string(),
            user: User {
                id: Uuid::new_v4().to_string(),
                full_name: registration.full_name.clone(),
                email: registration.email.clone(),
                created_at: None,
            },
        })
    }

    async fn fetch_resume(&self) -> Result<Option<Resume>, ClientError> {
        self.enter("fetch_resume".to_string(), true).await?;
        Ok(self.lock().resume.clone())
    }

    async fn upload_resume(&self, file: &UploadFile) -> Result<UploadReceipt, ClientError> {
        self.enter(format!("upload_resume {}", file.file_name()), true)
            .await?;
        let parsed = self.lock().parsed_override.clone().unwrap_or_else(|| {
            let mut parsed = resume().parsed_data;
            parsed.summary = format!("Parsed from {}", file.file_name());
            parsed
        });
        let uploaded = Resume {
            id: Uuid::new_v4().to_string(),
            file_name: file.file_name().to_string(),
            uploaded_at: Utc::now(),
            parsed_data: parsed.clone(),
        };
        let receipt = UploadReceipt {
            message: Some("Resume uploaded and parsed successfully".to_string()),
            resume_id: uploaded.id.clone(),
            parsed_data: parsed,
        };
        self.lock().resume = Some(uploaded);
        Ok(receipt)
    }

    async fn update_resume(&self, id: &str, parsed: &ParsedResume) -> Result<(), ClientError> {
        self.enter(format!("update_resume {id}"), true).await?;
        let mut state = self.lock();
        match state.resume.as_mut() {
            Some(resume) if resume.id == id => {
                resume.parsed_data = parsed.clone();
                Ok(())
            }
            _ => Err(not_found("Resume")),
        }
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.enter("list_jobs".to_string(), true).await?;
        Ok(self.lock().jobs.clone())
    }

    async fn create_job(&self, new_job: &NewJob) -> Result<Job, ClientError> {
        self.enter("create_job".to_string(), true).await?;
        let created = Job {
            id: Uuid::new_v4().to_string(),
            title: new_job.title.clone(),
            company: new_job.company.clone(),
            location: new_job.location.clone(),
            url: new_job.url.clone(),
            description: new_job.description.clone(),
            requirements: new_job.requirements.clone(),
            added_at: Some(Utc::now()),
        };
        // newest first, like the server's sort on added_at
        self.lock().jobs.insert(0, created.clone());
        Ok(created)
    }

    async fn delete_job(&self, id: &str) -> Result<(), ClientError> {
        self.enter(format!("delete_job {id}"), true).await?;
        let mut state = self.lock();
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != id);
        if state.jobs.len() == before {
            return Err(not_found("Job"));
        }
        Ok(())
    }

    async fn apply_to_job(&self, job_id: &str) -> Result<Application, ClientError> {
        self.enter(format!("apply_to_job {job_id}"), true).await?;
        let mut state = self.lock();
        let job = state
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .cloned()
            .ok_or_else(|| not_found("Job"))?;
        if state.resume.is_none() {
            return Err(ClientError::Api {
                status: 400,
                message: "Please upload a resume first".to_string(),
            });
        }
        if state
            .applications
            .iter()
            .any(|a| a.job_id.as_deref() == Some(job_id))
        {
            return Err(ClientError::Api {
                status: 400,
                message: "Already applied to this job".to_string(),
            });
        }
        state.applied_counter += 1;
        let created = Application {
            id: Uuid::new_v4().to_string(),
            job_id: Some(job.id.clone()),
            job_title: job.title.clone(),
            company: job.company.clone(),
            status: ApplicationStatus::Applied,
            applied_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
                + Duration::minutes(state.applied_counter),
            updated_at: None,
            tailored_resume: Some(format!("Tailored for {}", job.title)),
            cover_letter: Some(format!("Dear {} hiring team", job.company)),
        };
        state.applications.insert(0, created.clone());
        Ok(created)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        self.enter("list_applications".to_string(), true).await?;
        Ok(self.lock().applications.clone())
    }

    async fn fetch_application(&self, id: &str) -> Result<Application, ClientError> {
        self.enter(format!("fetch_application {id}"), true).await?;
        self.lock()
            .applications
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| not_found("Application"))
    }

    async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ClientError> {
        self.enter(format!("update_application_status {id} {status}"), true)
            .await?;
        let mut state = self.lock();
        let application = state
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Application"))?;
        application.status = status;
        application.updated_at = Some(Utc::now());
        Ok(())
    }

    async fn fetch_stats(&self) -> Result<Stats, ClientError> {
        self.enter("fetch_stats".to_string(), true).await?;
        let state = self.lock();
        let mut by_status = BTreeMap::new();
        for application in &state.applications {
            *by_status
                .entry(application.status.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(Stats {
            total_jobs: state.jobs.len() as u64,
            total_applications: state.applications.len() as u64,
            by_status,
        })
    }
}
