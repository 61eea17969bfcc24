use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Well-known storage keys, as file names under the store directory.
const TOKEN_FILE: &str = "session";
const USER_ID_FILE: &str = "user_id";

/// Persisted credentials under `~/.glimpse/`: the session token and the
/// acting user's identifier. Written by the login flow; the feed reads
/// them only.
///
/// The token file is written atomically with 0600 permissions so only
/// the owner can read it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at the default `~/.glimpse` directory.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(Self {
            dir: home_dir.join(".glimpse"),
        })
    }

    /// Creates a store rooted at an explicit directory (used by tests).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_id_path(&self) -> PathBuf {
        self.dir.join(USER_ID_FILE)
    }

    /// Loads the session token.
    ///
    /// Returns `Ok(None)` when the file is absent, empty, or looks
    /// corrupted (implausible length, control characters).
    pub fn load_token(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read session file")?;
        let token = content.trim();

        if token.is_empty() {
            log::warn!("Session file is empty, treating as no session");
            return Ok(None);
        }

        // Tokens are JWT-sized strings; anything far outside that range
        // is a corrupted file, not a credential.
        if token.len() < 8 || token.len() > 4096 {
            log::warn!(
                "Session token has invalid length: {}, treating as corrupted",
                token.len()
            );
            return Ok(None);
        }

        if token
            .chars()
            .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
        {
            log::warn!("Session file contains control characters, treating as corrupted");
            return Ok(None);
        }

        Ok(Some(token.to_string()))
    }

    /// Saves the session token atomically with 0600 permissions.
    pub fn save_token(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create .glimpse directory")?;

        let path = self.token_path();
        let temp_path = path.with_extension("tmp");

        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;
        file.write_all(token.as_bytes())
            .context("Failed to write session token")?;
        file.sync_all()
            .context("Failed to sync session file to disk")?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&temp_path, permissions)
                .context("Failed to set session file permissions")?;
        }

        fs::rename(&temp_path, &path).context("Failed to rename temporary session file")?;

        log::info!("Saved session token to {}", path.display());
        Ok(())
    }

    /// Loads the stored user identifier, the fallback for tokens whose
    /// payload carries no `userId` claim.
    pub fn load_user_id(&self) -> Result<Option<String>> {
        let path = self.user_id_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).context("Failed to read user id file")?;
        let user_id = content.trim();
        if user_id.is_empty() {
            return Ok(None);
        }
        Ok(Some(user_id.to_string()))
    }

    /// Saves the user identifier.
    pub fn save_user_id(&self, user_id: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).context("Failed to create .glimpse directory")?;
        fs::write(self.user_id_path(), user_id).context("Failed to write user id file")?;
        Ok(())
    }

    /// Deletes both credential files. Returns `Ok(())` even if absent.
    pub fn delete(&self) -> Result<()> {
        for path in [self.token_path(), self.user_id_path()] {
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to delete {}", path.display()))?;
            }
        }
        Ok(())
    }
}
