use crate::error::{KukaError, Result};
use crate::message::Message;
use crate::notice::Notice;
use crate::room::{DEFAULT_ROOM_NAME, Room};
use crate::selection::SelectionSet;

/// The whole client state.
///
/// `ChatState` holds:
/// - the ordered room store
/// - the id of the active room
/// - a transient copy of the active room's transcript and selection
///
/// Switching rooms copies the target room's stored data into the transient
/// fields. Selection edits are written through to the active room, while
/// `clear_chat` only empties the transient transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatState {
    pub(super) rooms: Vec<Room>,
    pub(super) active_room_id: String,
    pub(super) transcript: Vec<Message>,
    pub(super) selection: SelectionSet,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    /// Creates the startup state: a single empty room, active.
    pub fn new() -> Self {
        let room = Room::new(DEFAULT_ROOM_NAME);
        Self {
            active_room_id: room.id.clone(),
            rooms: vec![room],
            transcript: Vec::new(),
            selection: SelectionSet::new(),
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn active_room_id(&self) -> &str {
        &self.active_room_id
    }

    /// Index of the active room in the room list.
    pub fn active_index(&self) -> usize {
        self.index_of(&self.active_room_id).unwrap_or(0)
    }

    pub fn active_room(&self) -> &Room {
        &self.rooms[self.active_index()]
    }

    pub fn room_by_id(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    /// The transcript currently on screen.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// The selection set of the active room.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Rooms whose name contains `term`, case-insensitively, with their index.
    pub fn search(&self, term: &str) -> Vec<(usize, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .filter(|(_, room)| room.matches(term))
            .collect()
    }

    pub(super) fn index_of(&self, room_id: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.id == room_id)
    }

    pub(super) fn room_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.iter_mut().find(|room| room.id == room_id)
    }

    // ============================================================================
    // Selection transitions
    // ============================================================================

    /// Applies `edit` to the transient selection and stores the result on
    /// the active room.
    fn edit_selection<R>(&mut self, edit: impl FnOnce(&mut SelectionSet) -> R) -> R {
        let result = edit(&mut self.selection);
        let selection = self.selection.clone();
        let active_room_id = self.active_room_id.clone();
        if let Some(room) = self.room_mut(&active_room_id) {
            room.selected_models = selection;
        }
        result
    }

    /// Selects the model if absent, deselects it if present.
    pub fn toggle_select(&mut self, model_id: &str) -> bool {
        self.edit_selection(|selection| selection.toggle_select(model_id))
    }

    pub fn set_model_active(&mut self, model_id: &str, active: bool) {
        self.edit_selection(|selection| selection.set_active(model_id, active));
    }

    pub fn toggle_model_active(&mut self, model_id: &str) -> Option<bool> {
        self.edit_selection(|selection| selection.toggle_active(model_id))
    }

    pub fn set_instruction(&mut self, model_id: &str, instruction: impl Into<String>) {
        let instruction = instruction.into();
        self.edit_selection(|selection| selection.set_instruction(model_id, instruction));
    }

    pub fn remove_model(&mut self, model_id: &str) {
        self.edit_selection(|selection| selection.remove(model_id));
    }

    pub fn clear_models(&mut self) -> Notice {
        self.edit_selection(SelectionSet::clear);
        Notice::models_cleared()
    }

    // ============================================================================
    // Room transitions
    // ============================================================================

    /// Appends a room that copies the current selection. The new room is not
    /// activated.
    ///
    /// # Errors
    ///
    /// Rejected when the current selection is empty.
    pub fn create_room_with_selection(&mut self) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(KukaError::rejected(Notice::no_models_for_room()));
        }

        let name = format!("New Room ({} models)", self.selection.len());
        self.rooms
            .push(Room::with_selection(name, self.selection.clone()));
        Ok(self.rooms.len() - 1)
    }

    /// Inserts an empty room at the front of the list and activates it.
    pub fn create_and_activate(&mut self) -> &Room {
        let room = Room::new(format!("New Chat {}", self.rooms.len() + 1));
        self.active_room_id = room.id.clone();
        self.rooms.insert(0, room);
        self.transcript.clear();
        self.selection.clear();
        &self.rooms[0]
    }

    /// Renames a room. Blank names and unknown indices are ignored.
    pub fn rename(&mut self, index: usize, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.rooms.get_mut(index) {
            Some(room) => {
                room.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Deletes a room. When the active room is deleted, the room now at
    /// index 0 becomes active.
    ///
    /// # Errors
    ///
    /// - `InvariantViolation` when it is the only room
    /// - `NotFound` when the index is out of range
    pub fn delete(&mut self, index: usize) -> Result<Room> {
        if self.rooms.len() <= 1 {
            return Err(KukaError::rejected(Notice::last_room()));
        }
        if index >= self.rooms.len() {
            return Err(KukaError::not_found("room", index.to_string()));
        }

        let removed = self.rooms.remove(index);
        if removed.id == self.active_room_id {
            self.load_room(0);
        }
        Ok(removed)
    }

    /// Makes the room at `index` active and copies its stored transcript and
    /// selection into the transient view.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the index is out of range.
    pub fn switch_to(&mut self, index: usize) -> Result<()> {
        if index >= self.rooms.len() {
            return Err(KukaError::not_found("room", index.to_string()));
        }
        self.load_room(index);
        Ok(())
    }

    /// Empties the on-screen transcript. The stored transcript is kept.
    pub fn clear_chat(&mut self) -> Notice {
        self.transcript.clear();
        Notice::chat_cleared()
    }

    fn load_room(&mut self, index: usize) {
        let room = &self.rooms[index];
        self.active_room_id = room.id.clone();
        self.transcript = room.messages.clone();
        self.selection = room.selected_models.clone();
    }
}
