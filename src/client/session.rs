//! Persisted login session.
//!
//! The session remembers who is logged in between CLI invocations. It is
//! loaded once on start, written on login, and removed on logout. A file
//! that cannot be read back is discarded, leaving the caller logged out.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{ClientError, ClientResult};
use crate::interfaces::http::modules::auth::UserDto;

/// `<data_dir>/vesuvio/session.json`
pub fn default_session_path() -> PathBuf {
    dirs_next::data_local_dir()
        .or_else(dirs_next::config_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vesuvio")
        .join("session.json")
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    user: Option<UserDto>,
}

impl Session {
    /// Restore the session stored at `path`. Missing or corrupt files give
    /// an empty session; a corrupt file is removed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let user = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<UserDto>(&bytes) {
                Ok(user) => {
                    debug!(user_id = user.id, "Session restored");
                    Some(user)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable session");
                    if let Err(e) = fs::remove_file(&path) {
                        warn!(error = %e, "Failed to remove session file");
                    }
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read session file");
                None
            }
        };
        Self { path, user }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn user(&self) -> Option<&UserDto> {
        self.user.as_ref()
    }

    /// Identity to send as `X-User-ID`.
    pub fn user_id(&self) -> ClientResult<i32> {
        self.user.as_ref().map(|u| u.id).ok_or(ClientError::NotLoggedIn)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub fn login(&mut self, user: UserDto) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let bytes = serde_json::to_vec_pretty(&user).map_err(std::io::Error::other)?;
        fs::write(&self.path, bytes)?;
        self.user = Some(user);
        Ok(())
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.user = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> UserDto {
        UserDto {
            id: 3,
            name: "Ann".into(),
            email: "ann@example.com".into(),
            is_admin: false,
        }
    }

    #[test]
    fn login_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = Session::load(&path);
        assert!(session.user().is_none());
        assert!(matches!(session.user_id(), Err(ClientError::NotLoggedIn)));

        session.login(ann()).unwrap();
        let restored = Session::load(&path);
        assert_eq!(restored.user_id().unwrap(), 3);
        assert_eq!(restored.user().unwrap().email, "ann@example.com");
        assert!(!restored.is_admin());
    }

    #[test]
    fn logout_clears_memory_and_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(&path);
        session.login(ann()).unwrap();
        session.logout().unwrap();
        assert!(session.user().is_none());
        assert!(!path.exists());

        // Logging out twice is fine.
        session.logout().unwrap();
    }

    #[test]
    fn corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let session = Session::load(&path);
        assert!(session.user().is_none());
        assert!(!path.exists());
    }
}
