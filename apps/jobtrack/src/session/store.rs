//! Durable storage for the session: one entry for the token, one for the serialized user.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::errors::ClientError;
use crate::models::user::{Session, User};

const TOKEN_ENTRY: &str = "token";
const USER_ENTRY: &str = "user.json";

pub trait SessionStore: Send + Sync {
    /// Returns the persisted session, or `None` when nothing (or nothing usable) is stored.
    fn load(&self) -> Result<Option<Session>, ClientError>;
    fn save(&self, session: &Session) -> Result<(), ClientError>;
    fn clear(&self) -> Result<(), ClientError>;
}

/// Stores the two session entries as files in a directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ClientError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Writes the token readable by the owner only.
#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> Result<(), ClientError> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> Result<(), ClientError> {
    fs::write(path, contents)?;
    Ok(())
}

fn remove_optional(path: &Path) -> Result<(), ClientError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        let token = read_optional(&self.entry(TOKEN_ENTRY))?;
        let user = read_optional(&self.entry(USER_ENTRY))?;

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) => (token.trim().to_string(), user),
            (None, None) => return Ok(None),
            _ => {
                warn!("Half-written session in {}; discarding", self.dir.display());
                self.clear()?;
                return Ok(None);
            }
        };

        let user: User = match serde_json::from_str(&user) {
            Ok(user) => user,
            Err(e) => {
                warn!("Stored user entry is corrupt ({e}); discarding session");
                self.clear()?;
                return Ok(None);
            }
        };

        if token.is_empty() {
            self.clear()?;
            return Ok(None);
        }

        Ok(Some(Session { token, user }))
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        fs::create_dir_all(&self.dir)?;
        write_private(&self.entry(TOKEN_ENTRY), &session.token)?;
        fs::write(
            self.entry(USER_ENTRY),
            serde_json::to_string(&session.user)?,
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        remove_optional(&self.entry(TOKEN_ENTRY))?;
        remove_optional(&self.entry(USER_ENTRY))
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            slot: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ClientError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, session: &Session) -> Result<(), ClientError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        Ok(())
    }
}
