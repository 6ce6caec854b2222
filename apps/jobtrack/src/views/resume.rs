//! Résumé page: upload, preview, and the draft-based editor.
//!
//! Edit mode works on a draft copied from the last fetched résumé. Draft operations never
//! touch the server copy; `save` persists the draft and `cancel` drops it and re-fetches.
//! List edits build a new list and swap it in rather than mutating in place.

use std::path::Path;

use tracing::{info, warn};

use crate::api_client::UploadFile;
use crate::errors::ClientError;
use crate::models::resume::{Education, Experience, ParsedResume, Resume};
use crate::views::{ViewContext, ViewCore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    Name,
    Email,
    Phone,
    Summary,
}

pub struct ResumeView {
    ctx: ViewContext,
    pub core: ViewCore,
    pub resume: Option<Resume>,
    draft: Option<ParsedResume>,
}

fn appended<T: Clone>(items: &[T], item: T) -> Vec<T> {
    let mut next = items.to_vec();
    next.push(item);
    next
}

fn replaced<T: Clone>(items: &[T], index: usize, item: T) -> Result<Vec<T>, ClientError> {
    check_index(items.len(), index)?;
    Ok(items
        .iter()
        .enumerate()
        .map(|(i, existing)| if i == index { item.clone() } else { existing.clone() })
        .collect())
}

fn removed<T: Clone>(items: &[T], index: usize) -> Result<Vec<T>, ClientError> {
    check_index(items.len(), index)?;
    Ok(items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, existing)| existing.clone())
        .collect())
}

fn check_index(len: usize, index: usize) -> Result<(), ClientError> {
    if index >= len {
        return Err(ClientError::validation(format!(
            "No entry at position {} (there are {len})",
            index + 1
        )));
    }
    Ok(())
}

impl ResumeView {
    pub fn new(ctx: ViewContext) -> Self {
        let core = ViewCore::new(ctx.session.clone());
        Self {
            ctx,
            core,
            resume: None,
            draft: None,
        }
    }

    pub async fn load(&mut self) {
        if let Some(resume) = self.core.run(self.ctx.backend.fetch_resume()).await {
            self.resume = resume;
        }
    }

    pub fn mode(&self) -> Mode {
        if self.draft.is_some() {
            Mode::Edit
        } else {
            Mode::Preview
        }
    }

    /// What the page renders: the draft in edit mode, the fetched copy otherwise.
    pub fn fields(&self) -> Option<&ParsedResume> {
        self.draft
            .as_ref()
            .or_else(|| self.resume.as_ref().map(|r| &r.parsed_data))
    }

    pub async fn upload_path(&mut self, path: &Path) -> bool {
        match UploadFile::from_path(path).await {
            Ok(file) => self.upload(file).await,
            Err(err) => {
                self.core.fail(err);
                false
            }
        }
    }

    pub async fn upload(&mut self, file: UploadFile) -> bool {
        let Some(receipt) = self.core.run(self.ctx.backend.upload_resume(&file)).await else {
            return false;
        };
        info!("Uploaded {} as résumé {}", file.file_name(), receipt.resume_id);
        match &receipt.parsed_data.parse_error {
            Some(reason) => {
                warn!("Server could not parse {}: {reason}", file.file_name());
                self.core.notify_warning(format!(
                    "Uploaded {}, but it could not be parsed: {reason}",
                    file.file_name()
                ));
            }
            None if receipt.parsed_data.is_empty() => self.core.notify_warning(format!(
                "Uploaded {}, but no fields could be extracted",
                file.file_name()
            )),
            None => self.core.notify_success(
                receipt
                    .message
                    .unwrap_or_else(|| "Resume uploaded and parsed successfully".to_string()),
            ),
        }
        self.draft = None;
        self.load().await;
        true
    }

    /// Enters edit mode with a draft copied from the last fetched résumé.
    pub fn begin_edit(&mut self) -> Result<(), ClientError> {
        let resume = self
            .resume
            .as_ref()
            .ok_or_else(|| ClientError::validation("Upload a resume before editing it"))?;
        self.draft = Some(resume.parsed_data.clone());
        Ok(())
    }

    fn edit<F>(&mut self, change: F) -> Result<(), ClientError>
    where
        F: FnOnce(&ParsedResume) -> Result<ParsedResume, ClientError>,
    {
        let draft = self
            .draft
            .as_ref()
            .ok_or_else(|| ClientError::validation("Not in edit mode"))?;
        let next = change(draft)?;
        self.draft = Some(next);
        Ok(())
    }

    pub fn set_field(&mut self, field: ScalarField, value: &str) -> Result<(), ClientError> {
        let value = value.to_string();
        self.edit(|d| {
            Ok(match field {
                ScalarField::Name => ParsedResume { name: value, ..d.clone() },
                ScalarField::Email => ParsedResume { email: value, ..d.clone() },
                ScalarField::Phone => ParsedResume { phone: value, ..d.clone() },
                ScalarField::Summary => ParsedResume { summary: value, ..d.clone() },
            })
        })
    }

    pub fn add_skill(&mut self, skill: &str) -> Result<(), ClientError> {
        let skill = skill.trim().to_string();
        if skill.is_empty() {
            return Err(ClientError::validation("Skill cannot be empty"));
        }
        self.edit(|d| {
            Ok(ParsedResume {
                skills: appended(&d.skills, skill),
                ..d.clone()
            })
        })
    }

    pub fn update_skill(&mut self, index: usize, skill: &str) -> Result<(), ClientError> {
        let skill = skill.trim().to_string();
        self.edit(|d| {
            Ok(ParsedResume {
                skills: replaced(&d.skills, index, skill)?,
                ..d.clone()
            })
        })
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                skills: removed(&d.skills, index)?,
                ..d.clone()
            })
        })
    }

    pub fn add_experience(&mut self, entry: Experience) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                experience: appended(&d.experience, entry),
                ..d.clone()
            })
        })
    }

    pub fn update_experience(&mut self, index: usize, entry: Experience) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                experience: replaced(&d.experience, index, entry)?,
                ..d.clone()
            })
        })
    }

    pub fn remove_experience(&mut self, index: usize) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                experience: removed(&d.experience, index)?,
                ..d.clone()
            })
        })
    }

    pub fn add_education(&mut self, entry: Education) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                education: appended(&d.education, entry),
                ..d.clone()
            })
        })
    }

    pub fn update_education(&mut self, index: usize, entry: Education) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                education: replaced(&d.education, index, entry)?,
                ..d.clone()
            })
        })
    }

    pub fn remove_education(&mut self, index: usize) -> Result<(), ClientError> {
        self.edit(|d| {
            Ok(ParsedResume {
                education: removed(&d.education, index)?,
                ..d.clone()
            })
        })
    }

    /// Persists the draft, leaves edit mode, and re-fetches the canonical copy.
    /// On failure the draft is kept so the user can retry.
    pub async fn save(&mut self) -> bool {
        let (Some(resume), Some(draft)) = (self.resume.as_ref(), self.draft.as_ref()) else {
            self.core
                .fail(ClientError::validation("Nothing to save: not in edit mode"));
            return false;
        };
        let id = resume.id.clone();
        let saved = self
            .core
            .run(self.ctx.backend.update_resume(&id, draft))
            .await;
        if saved.is_none() {
            return false;
        }
        self.draft = None;
        self.core.notify_success("Resume saved");
        self.load().await;
        true
    }

    /// Discards the draft and reloads the server copy.
    pub async fn cancel(&mut self) {
        self.draft = None;
        self.load().await;
    }
}
