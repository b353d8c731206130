mod profile;
mod selection;
mod session;
mod store;

pub use profile::{ProfileHandle, StudentProfile};
pub use selection::{SelectionSets, COMPARE_LIMIT};
pub use session::{AdvisorSession, SessionUpdate, TurnPhase};
pub use store::{JsonFileStore, SessionSnapshot, SessionStore};
