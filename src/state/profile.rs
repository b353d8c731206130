use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Free-form student profile used to personalize advice. All fields are
/// optional text; the gateway fills them in over time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentProfile {
    pub home_country: Option<String>,
    pub target_degree: Option<String>,
    pub field_of_study: Option<String>,
    pub budget_annual: Option<String>,
    pub preferred_countries: Vec<String>,
    pub test_scores: Option<String>,
}

/// Process-scoped handle to the current student's profile. Set when a session
/// loads, cleared on session switch; readers get a clone and never block a
/// writer for long. This replaces what used to be ambient shared state
/// readable from any screen.
#[derive(Clone, Default)]
pub struct ProfileHandle {
    inner: Arc<RwLock<Option<StudentProfile>>>,
}

impl ProfileHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, profile: StudentProfile) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(profile);
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    pub fn get(&self) -> Option<StudentProfile> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    pub fn is_loaded(&self) -> bool {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.is_some()
    }
}
