//! On-disk cache of the signed-in user's profile.
//!
//! Stored as `{"user": {...}}` in `<data_dir>/kubechat/user.json`. Uses
//! atomic writes (write to `.tmp`, then rename).

use std::path::{Path, PathBuf};

use kubechat_common::KubechatError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::UserProfile;

const PROFILE_FILE: &str = "user.json";

#[derive(Serialize, Deserialize)]
struct StoredProfile {
    user: UserProfile,
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    ///
    /// - macOS: `~/Library/Application Support/kubechat/user.json`
    /// - Linux: `~/.local/share/kubechat/user.json`
    pub fn default_location() -> Result<Self, KubechatError> {
        let dir = dirs::data_dir()
            .ok_or_else(|| KubechatError::Storage("could not determine data directory".into()))?;
        Ok(Self::new(dir.join("kubechat").join(PROFILE_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached profile, if any. A corrupt file is treated as absent.
    pub fn load(&self) -> Result<Option<UserProfile>, KubechatError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<StoredProfile>(&data) {
            Ok(stored) => Ok(Some(stored.user)),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring unreadable profile cache: {e}");
                Ok(None)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), KubechatError> {
        let json = serde_json::to_string_pretty(&StoredProfile {
            user: profile.clone(),
        })
        .map_err(|e| KubechatError::Storage(format!("failed to serialize profile: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            warn!("atomic rename failed ({e}), falling back to direct write");
            std::fs::write(&self.path, &json)?;
        }

        debug!(path = %self.path.display(), user_id = profile.id, "profile cached");
        Ok(())
    }

    /// Remove the cached profile. Missing file is not an error.
    pub fn clear(&self) -> Result<(), KubechatError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "profile cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
