/// API client — the single point of entry for every backend call.
///
/// Views never build HTTP requests themselves; they go through the `Backend` trait,
/// which `ApiClient` implements against the REST API.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{ClientError, GENERIC_FAILURE};
use crate::models::application::{Application, ApplicationStatus, ApplyResponse, StatusUpdate};
use crate::models::job::{Job, NewJob};
use crate::models::resume::{resume_from_value, ParsedResume, Resume, ResumeUpdate, UploadReceipt};
use crate::models::stats::Stats;
use crate::models::user::{Credentials, Registration, Session, TokenResponse};
use crate::session::SessionContext;

pub mod upload;

pub use upload::UploadFile;

/// Upload triggers a server-side parse.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Apply triggers generation of a tailored résumé and cover letter.
pub const APPLY_TIMEOUT: Duration = Duration::from_secs(120);

/// Every operation the views can ask of the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError>;
    async fn register(&self, registration: &Registration) -> Result<Session, ClientError>;

    async fn fetch_resume(&self) -> Result<Option<Resume>, ClientError>;
    async fn upload_resume(&self, file: &UploadFile) -> Result<UploadReceipt, ClientError>;
    async fn update_resume(&self, id: &str, parsed: &ParsedResume) -> Result<(), ClientError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, ClientError>;
    async fn create_job(&self, job: &NewJob) -> Result<Job, ClientError>;
    async fn delete_job(&self, id: &str) -> Result<(), ClientError>;

    async fn apply_to_job(&self, job_id: &str) -> Result<Application, ClientError>;
    async fn list_applications(&self) -> Result<Vec<Application>, ClientError>;
    async fn fetch_application(&self, id: &str) -> Result<Application, ClientError>;
    async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ClientError>;

    async fn fetch_stats(&self) -> Result<Stats, ClientError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
}

/// HTTP implementation of `Backend`.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            session,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{method} {path}");
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Attaches the bearer token, sends, and normalizes non-2xx responses.
    async fn execute(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<Response, ClientError> {
        let request = match access {
            Access::Public => request,
            Access::Authenticated => {
                let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
                request.bearer_auth(token)
            }
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED && access == Access::Authenticated {
            warn!("Server rejected the session token");
            return Err(ClientError::Unauthorized);
        }

        let message = error_detail(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
        warn!("API returned {status}: {message}");
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<T, ClientError> {
        let response = self.execute(request, access).await?;
        let body = response.bytes().await.map_err(transport_error)?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// For mutations whose response body carries nothing the client needs.
    async fn discard(&self, request: RequestBuilder) -> Result<(), ClientError> {
        self.execute(request, Access::Authenticated).await?;
        Ok(())
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let request = self.request(Method::POST, "/api/auth/login").json(credentials);
        let response: TokenResponse = self.json(request, Access::Public).await?;
        Ok(response.into())
    }

    async fn register(&self, registration: &Registration) -> Result<Session, ClientError> {
        let request = self
            .request(Method::POST, "/api/auth/register")
            .json(registration);
        let response: TokenResponse = self.json(request, Access::Public).await?;
        Ok(response.into())
    }

    async fn fetch_resume(&self) -> Result<Option<Resume>, ClientError> {
        let value: Value = self
            .json(self.request(Method::GET, "/api/resume"), Access::Authenticated)
            .await?;
        Ok(resume_from_value(value)?)
    }

    async fn upload_resume(&self, file: &UploadFile) -> Result<UploadReceipt, ClientError> {
        let part = Part::bytes(file.content().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime())?;
        // multipart() sets the boundary-bearing content type itself
        let request = self
            .request(Method::POST, "/api/resume/upload")
            .multipart(Form::new().part("file", part))
            .timeout(UPLOAD_TIMEOUT);
        self.json(request, Access::Authenticated).await
    }

    async fn update_resume(&self, id: &str, parsed: &ParsedResume) -> Result<(), ClientError> {
        let request = self
            .request(Method::PUT, &format!("/api/resume/{id}"))
            .json(&ResumeUpdate {
                parsed_data: parsed,
            });
        self.discard(request).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.json(self.request(Method::GET, "/api/jobs"), Access::Authenticated)
            .await
    }

    async fn create_job(&self, job: &NewJob) -> Result<Job, ClientError> {
        let request = self.request(Method::POST, "/api/jobs").json(job);
        self.json(request, Access::Authenticated).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), ClientError> {
        self.discard(self.request(Method::DELETE, &format!("/api/jobs/{id}")))
            .await
    }

    async fn apply_to_job(&self, job_id: &str) -> Result<Application, ClientError> {
        let request = self
            .request(Method::POST, &format!("/api/applications/{job_id}"))
            .timeout(APPLY_TIMEOUT);
        let response: ApplyResponse = self.json(request, Access::Authenticated).await?;
        Ok(response.application)
    }

    async fn list_applications(&self) -> Result<Vec<Application>, ClientError> {
        self.json(
            self.request(Method::GET, "/api/applications"),
            Access::Authenticated,
        )
        .await
    }

    async fn fetch_application(&self, id: &str) -> Result<Application, ClientError> {
        self.json(
            self.request(Method::GET, &format!("/api/applications/{id}")),
            Access::Authenticated,
        )
        .await
    }

    async fn update_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<(), ClientError> {
        let request = self
            .request(Method::PATCH, &format!("/api/applications/{id}/status"))
            .json(&StatusUpdate { status });
        self.discard(request).await
    }

    async fn fetch_stats(&self) -> Result<Stats, ClientError> {
        self.json(self.request(Method::GET, "/api/stats"), Access::Authenticated)
            .await
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Http(e)
    }
}

/// Pulls a human-readable message out of an error body.
/// Understands `{"detail": "..."}`, `{"detail": [{"msg": ...}]}` and `{"error": {"message": ...}}`.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    value
        .get("message")
        .or_else(|| value.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}
