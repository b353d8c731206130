use super::state::{AdvisorSession, SessionUpdate, TurnPhase};
use crate::api::logging::emit_task_error;
use crate::api::stream::{StreamParser, StreamRecord};
use crate::markup::{extract, render};
use crate::types::{ApiMessage, Message};
use anyhow::Result;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

pub(super) const EMPTY_RESPONSE_FALLBACK: &str =
    "I couldn't generate a response. Please try sending your message again.";
pub(super) const CONNECTION_ERROR_FALLBACK: &str =
    "I couldn't reach the advisor service. Please check your connection and try again.";

impl AdvisorSession {
    /// Drives one turn: optimistic user append, transport open, delta
    /// accumulation with display re-evaluation, finalization. Returns
    /// `Ok(None)` when the submit is rejected (empty input, or a turn is
    /// already in flight); otherwise the frozen assistant message. Transport
    /// failures never propagate — they become a fallback assistant message
    /// and the session returns to `Idle`.
    pub async fn send_message(
        &mut self,
        input: &str,
        update_tx: Option<&mpsc::UnboundedSender<SessionUpdate>>,
    ) -> Result<Option<Message>> {
        let trimmed = input.trim();
        if trimmed.is_empty() || self.phase != TurnPhase::Idle {
            return Ok(None);
        }
        self.phase = TurnPhase::Sending;

        // The user message lands before the network call and stays even if
        // the call fails.
        let user_message = Message::user(trimmed);
        self.messages.push(user_message.clone());
        emit_update(update_tx, SessionUpdate::UserMessage(user_message.clone()));

        let api_messages: Vec<ApiMessage> = self.messages.iter().map(ApiMessage::from).collect();

        // The assistant message exists from the start of the turn, empty, and
        // is mutated in place as deltas arrive.
        self.messages.push(Message::assistant_empty());

        let mut stream = match self.client.create_stream(&api_messages).await {
            Ok(stream) => stream,
            Err(error) => return Ok(Some(self.fail_turn(error, update_tx))),
        };

        let mut parser = StreamParser::new();
        let mut buffer = String::new();
        let mut pending_error: Option<String> = None;
        let mut done = false;

        while let Some(chunk_result) = stream.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(error) => return Ok(Some(self.fail_turn(error, update_tx))),
            };
            if self.phase == TurnPhase::Sending {
                self.phase = TurnPhase::Streaming;
            }

            let records = match parser.process(&chunk) {
                Ok(records) => records,
                Err(error) => return Ok(Some(self.fail_turn(error, update_tx))),
            };

            for record in records {
                match record {
                    StreamRecord::Content(delta) => {
                        buffer.push_str(&delta);
                        self.set_assistant_content(&buffer);
                        emit_update(update_tx, SessionUpdate::Display(render(&buffer, true)));
                    }
                    StreamRecord::Error(error) => {
                        // Captured, not shown: a partial answer must never be
                        // overwritten by a late error.
                        pending_error = Some(error);
                    }
                    StreamRecord::Done => done = true,
                }
                if done {
                    break;
                }
            }
            if done {
                break;
            }
        }

        // A transport that closes without a final newline may leave one
        // undelivered record behind.
        if !done {
            match parser.finish() {
                Some(StreamRecord::Content(delta)) => buffer.push_str(&delta),
                Some(StreamRecord::Error(error)) => pending_error = Some(error),
                Some(StreamRecord::Done) | None => {}
            }
        }

        self.phase = TurnPhase::Finalizing;
        let content = if buffer.is_empty() {
            pending_error.unwrap_or_else(|| EMPTY_RESPONSE_FALLBACK.to_string())
        } else {
            buffer
        };
        self.set_assistant_content(&content);

        let assistant_message = self
            .messages
            .last()
            .cloned()
            .unwrap_or_else(|| Message::assistant(content.clone()));
        let blocks = extract(&assistant_message.content).blocks;

        emit_update(
            update_tx,
            SessionUpdate::Display(render(&assistant_message.content, false)),
        );
        emit_update(
            update_tx,
            SessionUpdate::TurnFinished {
                message: assistant_message.clone(),
                blocks,
            },
        );

        self.persist_turn(&user_message, &assistant_message);
        self.spawn_profile_refresh();

        self.phase = TurnPhase::Idle;
        Ok(Some(assistant_message))
    }

    fn set_assistant_content(&mut self, content: &str) {
        if let Some(message) = self.messages.last_mut() {
            message.content = content.to_string();
        }
    }

    /// Network-level failure: the turn is over, the session is not. The
    /// in-flight assistant message becomes a generic connection-error reply.
    fn fail_turn(
        &mut self,
        error: anyhow::Error,
        update_tx: Option<&mpsc::UnboundedSender<SessionUpdate>>,
    ) -> Message {
        self.phase = TurnPhase::Failed;
        emit_task_error("turn transport", &error);

        self.set_assistant_content(CONNECTION_ERROR_FALLBACK);
        let assistant_message = self
            .messages
            .last()
            .cloned()
            .unwrap_or_else(|| Message::assistant(CONNECTION_ERROR_FALLBACK));

        emit_update(
            update_tx,
            SessionUpdate::TurnFinished {
                message: assistant_message.clone(),
                blocks: Vec::new(),
            },
        );

        self.phase = TurnPhase::Idle;
        assistant_message
    }

    fn persist_turn(&self, user_message: &Message, assistant_message: &Message) {
        let Some(store) = &self.store else {
            return;
        };
        let new_messages = [user_message.clone(), assistant_message.clone()];
        let profile = self.profile.get();
        if let Err(error) = store.append_turn(&self.session_id, &new_messages, profile.as_ref()) {
            emit_task_error("session persistence", &error);
        }
    }

    /// Best-effort profile refresh after finalization. Detached; never
    /// awaited by the turn path, and its failure only reaches the debug log.
    fn spawn_profile_refresh(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let store = Arc::clone(store);
        let session_id = self.session_id.clone();
        let profile = self.profile.clone();
        tokio::spawn(async move {
            match store.load_session(&session_id) {
                Ok(snapshot) => {
                    if let Some(refreshed) = snapshot.profile {
                        profile.set(refreshed);
                    }
                }
                Err(error) => emit_task_error("profile refresh", &error),
            }
        });
    }
}

fn emit_update(
    update_tx: Option<&mpsc::UnboundedSender<SessionUpdate>>,
    update: SessionUpdate,
) {
    if let Some(tx) = update_tx {
        let _ = tx.send(update);
    }
}
