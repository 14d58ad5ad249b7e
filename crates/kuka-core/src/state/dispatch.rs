use super::chat_state::ChatState;
use crate::error::{KukaError, Result};
use crate::message::Message;
use crate::notice::Notice;

/// One request of a fan-out round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub model_id: String,
    pub prompt: String,
}

/// A fan-out round that has been started but not yet committed.
///
/// The origin room is captured here, so replies land in the room the message
/// was sent from even if another room is active by the time they arrive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDispatch {
    pub room_id: String,
    pub room_name: String,
    /// Requests in selection order.
    pub requests: Vec<OutboundRequest>,
}

impl ChatState {
    /// Starts a fan-out round for `text`.
    ///
    /// Records the user message on the transient transcript and the active
    /// room, then returns one request per active selected model.
    ///
    /// Returns `Ok(None)` when `text` is blank.
    ///
    /// # Errors
    ///
    /// Rejected when no selected model is active. Nothing is recorded in that
    /// case.
    pub fn begin_dispatch(&mut self, text: &str) -> Result<Option<PendingDispatch>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if !self.selection.has_active() {
            return Err(KukaError::rejected(Notice::no_models_for_message()));
        }

        let requests = self
            .selection
            .active()
            .map(|entry| OutboundRequest {
                model_id: entry.id.clone(),
                prompt: entry.prompt_for(text),
            })
            .collect();

        let room_id = self.active_room_id.clone();
        let room = self
            .room_mut(&room_id)
            .ok_or_else(|| KukaError::internal("active room missing from room store"))?;
        let message = Message::user(text);
        room.messages.push(message.clone());
        let room_name = room.name.clone();
        self.transcript.push(message);

        Ok(Some(PendingDispatch {
            room_id,
            room_name,
            requests,
        }))
    }

    /// Appends the replies of a finished round to the origin room, and to the
    /// transient transcript when the origin room is still active.
    ///
    /// Returns the number of appended messages.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the origin room has been deleted; nothing is
    /// appended.
    pub fn commit_replies(&mut self, room_id: &str, replies: Vec<Message>) -> Result<usize> {
        let is_active = self.active_room_id == room_id;
        let room = self
            .room_mut(room_id)
            .ok_or_else(|| KukaError::not_found("room", room_id))?;

        let count = replies.len();
        room.messages.extend(replies.iter().cloned());
        if is_active {
            self.transcript.extend(replies);
        }
        Ok(count)
    }
}
