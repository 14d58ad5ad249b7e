//! Per-room model selection.

use serde::{Deserialize, Serialize};

/// A catalog model chosen for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedModel {
    /// Catalog id of the model.
    pub id: String,
    /// Inactive entries stay listed but are skipped by dispatch.
    pub active: bool,
    /// Text prepended to every prompt sent to this model.
    #[serde(default)]
    pub custom_instruction: String,
}

impl SelectedModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            custom_instruction: String::new(),
        }
    }

    /// Builds the prompt for this model: the instruction and the message
    /// joined by a newline, or the message alone when no instruction is set.
    pub fn prompt_for(&self, message: &str) -> String {
        if self.custom_instruction.is_empty() {
            message.to_string()
        } else {
            format!("{}\n{}", self.custom_instruction, message)
        }
    }
}

/// Ordered set of [`SelectedModel`]s, unique by model id.
///
/// Every operation is infallible; operations addressing a model that is not
/// in the set do nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    entries: Vec<SelectedModel>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the model (active, no instruction) if absent, removes it if present.
    ///
    /// Returns `true` if the model is selected afterwards.
    pub fn toggle_select(&mut self, model_id: &str) -> bool {
        if self.contains(model_id) {
            self.remove(model_id);
            false
        } else {
            self.entries.push(SelectedModel::new(model_id));
            true
        }
    }

    pub fn set_active(&mut self, model_id: &str, active: bool) {
        if let Some(entry) = self.get_mut(model_id) {
            entry.active = active;
        }
    }

    /// Inverts the active flag. Returns the new flag, or `None` for non-members.
    pub fn toggle_active(&mut self, model_id: &str) -> Option<bool> {
        let entry = self.get_mut(model_id)?;
        entry.active = !entry.active;
        Some(entry.active)
    }

    pub fn set_instruction(&mut self, model_id: &str, instruction: impl Into<String>) {
        if let Some(entry) = self.get_mut(model_id) {
            entry.custom_instruction = instruction.into();
        }
    }

    pub fn remove(&mut self, model_id: &str) {
        self.entries.retain(|entry| entry.id != model_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == model_id)
    }

    pub fn get(&self, model_id: &str) -> Option<&SelectedModel> {
        self.entries.iter().find(|entry| entry.id == model_id)
    }

    fn get_mut(&mut self, model_id: &str) -> Option<&mut SelectedModel> {
        self.entries.iter_mut().find(|entry| entry.id == model_id)
    }

    /// Active entries, in selection order.
    pub fn active(&self) -> impl Iterator<Item = &SelectedModel> {
        self.entries.iter().filter(|entry| entry.active)
    }

    pub fn has_active(&self) -> bool {
        self.entries.iter().any(|entry| entry.active)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedModel> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SelectedModel> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = SelectedModel>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for entry in iter {
            if !set.contains(&entry.id) {
                set.entries.push(entry);
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &SelectionSet) -> Vec<&str> {
        set.iter().map(|entry| entry.id.as_str()).collect()
    }

    #[test]
    fn test_toggle_select_adds_active_entry() {
        let mut set = SelectionSet::new();
        assert!(set.toggle_select("gpt-x"));

        let entry = set.get("gpt-x").unwrap();
        assert!(entry.active);
        assert!(entry.custom_instruction.is_empty());
    }

    #[test]
    fn test_toggle_select_twice_restores_membership() {
        let mut set = SelectionSet::new();
        set.toggle_select("a");
        set.toggle_select("b");
        let before = set.clone();

        set.toggle_select("c");
        set.toggle_select("c");
        assert_eq!(set, before);

        set.toggle_select("a");
        set.toggle_select("a");
        assert_eq!(ids(&set), vec!["b", "a"]);
    }

    #[test]
    fn test_active_flag_is_independent_of_membership() {
        let mut set = SelectionSet::new();
        set.toggle_select("a");
        set.set_active("a", false);

        assert!(set.contains("a"));
        assert!(!set.has_active());
        assert_eq!(set.toggle_active("a"), Some(true));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_non_member_operations_are_no_ops() {
        let mut set = SelectionSet::new();
        set.toggle_select("a");
        let before = set.clone();

        set.set_active("missing", false);
        set.set_instruction("missing", "be brief");
        set.remove("missing");
        assert_eq!(set.toggle_active("missing"), None);

        assert_eq!(set, before);
    }

    #[test]
    fn test_active_preserves_selection_order() {
        let mut set = SelectionSet::new();
        for id in ["c", "a", "b"] {
            set.toggle_select(id);
        }
        set.set_active("a", false);

        let active: Vec<&str> = set.active().map(|entry| entry.id.as_str()).collect();
        assert_eq!(active, vec!["c", "b"]);
    }

    #[test]
    fn test_prompt_for_with_and_without_instruction() {
        let mut entry = SelectedModel::new("gpt-x");
        assert_eq!(entry.prompt_for("Hello"), "Hello");

        entry.custom_instruction = "Answer in French".to_string();
        assert_eq!(entry.prompt_for("Hello"), "Answer in French\nHello");
    }

    #[test]
    fn test_from_iter_drops_duplicates() {
        let set: SelectionSet = vec![SelectedModel::new("a"), SelectedModel::new("a")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }
}
