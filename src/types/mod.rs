mod chat;

pub use chat::{ApiMessage, Message, Role, StreamPayload};
