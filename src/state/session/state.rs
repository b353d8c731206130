use crate::api::ApiClient;
use crate::markup::{DisplayState, RecommendationBlock};
use crate::state::profile::ProfileHandle;
use crate::state::store::SessionStore;
use crate::types::Message;
use anyhow::Result;
use std::sync::Arc;

/// Lifecycle of one request/response turn. `Failed` is reachable from
/// `Sending` and `Streaming`; every terminal path returns the session to
/// `Idle` so input is never left stuck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Sending,
    Streaming,
    Finalizing,
    Failed,
}

/// Updates emitted toward the frontend while a turn runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// The optimistic user-message append, sent before the network call.
    UserMessage(Message),
    /// Re-evaluated display state after a content delta.
    Display(DisplayState),
    /// The frozen assistant message plus its permanent block records.
    TurnFinished {
        message: Message,
        blocks: Vec<RecommendationBlock>,
    },
}

pub struct AdvisorSession {
    pub(super) client: Arc<ApiClient>,
    pub(super) store: Option<Arc<dyn SessionStore>>,
    pub(super) session_id: String,
    pub(super) messages: Vec<Message>,
    pub(super) profile: ProfileHandle,
    pub(super) phase: TurnPhase,
}

impl AdvisorSession {
    pub fn new(client: ApiClient, session_id: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            store: None,
            session_id: session_id.into(),
            messages: Vec::new(),
            profile: ProfileHandle::new(),
            phase: TurnPhase::Idle,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Loads persisted history and profile, replacing in-memory state.
    pub fn load(&mut self) -> Result<()> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let snapshot = store.load_session(&self.session_id)?;
        self.messages = snapshot.messages;
        match snapshot.profile {
            Some(profile) => self.profile.set(profile),
            None => self.profile.clear(),
        }
        Ok(())
    }

    /// Switches to another session id: in-memory history and the profile
    /// handle are reset, then the new session is loaded.
    pub fn switch_session(&mut self, session_id: impl Into<String>) -> Result<()> {
        self.session_id = session_id.into();
        self.messages.clear();
        self.profile.clear();
        self.load()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn profile(&self) -> ProfileHandle {
        self.profile.clone()
    }
}
