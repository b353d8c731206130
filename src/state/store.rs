use super::profile::StudentProfile;
use crate::types::Message;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Everything persisted for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub profile: Option<StudentProfile>,
}

/// Persistence boundary for chat sessions. Implementations are last-write-wins
/// by session id and idempotent on retry; the coordinator never depends on
/// anything stronger.
pub trait SessionStore: Send + Sync {
    fn load_session(&self, session_id: &str) -> Result<SessionSnapshot>;

    fn append_turn(
        &self,
        session_id: &str,
        new_messages: &[Message],
        profile: Option<&StudentProfile>,
    ) -> Result<()>;
}

/// One JSON file per session under a root directory.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_path(&self, session_id: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", sanitize_session_id(session_id)))
    }
}

impl SessionStore for JsonFileStore {
    fn load_session(&self, session_id: &str) -> Result<SessionSnapshot> {
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(SessionSnapshot::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading session file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("decoding session file {}", path.display()))
    }

    fn append_turn(
        &self,
        session_id: &str,
        new_messages: &[Message],
        profile: Option<&StudentProfile>,
    ) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("creating session dir {}", self.root.display()))?;

        let mut snapshot = self.load_session(session_id)?;
        snapshot.messages.extend_from_slice(new_messages);
        if let Some(profile) = profile {
            snapshot.profile = Some(profile.clone());
        }

        let path = self.session_path(session_id);
        let serialized = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&path, serialized)
            .with_context(|| format!("writing session file {}", path.display()))
    }
}

fn sanitize_session_id(session_id: &str) -> String {
    let sanitized: String = session_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "session".to_string()
    } else {
        sanitized
    }
}
