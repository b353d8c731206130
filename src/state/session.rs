mod core;
mod state;


pub use state::{AdvisorSession, SessionUpdate, TurnPhase};
