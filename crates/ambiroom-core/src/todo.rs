//! Lightweight todo list with an optional "current task".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_current_task: bool,
}

impl TodoItem {
    fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
            is_current_task: false,
        }
    }
}

/// Ordered todo items. Ids are unique within the list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoList {
    todos: Vec<TodoItem>,
    current: Option<String>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.todos
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// The item marked as current, if it is still in the list.
    pub fn current(&self) -> Option<&TodoItem> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    /// Items not yet completed.
    pub fn remaining(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    /// Append a new item and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyText`] for blank text.
    pub fn add(&mut self, text: &str) -> Result<String, ValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText("todo text".into()));
        }
        let item = TodoItem::new(text);
        let id = item.id.clone();
        self.todos.push(item);
        tracing::debug!(%id, "todo added");
        Ok(id)
    }

    /// Flip completion. Unknown ids are ignored; returns whether one matched.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.todos.iter_mut().find(|t| t.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => false,
        }
    }

    /// Remove an item, dropping the current-task pointer if it pointed there.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.todos.len() != before
    }

    /// Make `id` the only current task. An unknown id leaves none current.
    pub fn set_current(&mut self, id: &str) -> Option<&TodoItem> {
        for todo in &mut self.todos {
            todo.is_current_task = todo.id == id;
        }
        self.current = self.get(id).map(|t| t.id.clone());
        self.current()
    }

    pub fn clear_current(&mut self) {
        for todo in &mut self.todos {
            todo.is_current_task = false;
        }
        self.current = None;
    }

    /// Drop completed items. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.todos.len();
        self.todos.retain(|t| !t.completed);
        before - self.todos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(texts: &[&str]) -> (TodoList, Vec<String>) {
        let mut list = TodoList::new();
        let ids = texts.iter().map(|t| list.add(t).unwrap()).collect();
        (list, ids)
    }

    #[test]
    fn add_keeps_order_and_unique_ids() {
        let (list, ids) = list_with(&["write", "read", "walk"]);
        let texts: Vec<_> = list.items().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["write", "read", "walk"]);
        assert_ne!(ids[0], ids[1]);
        assert!(list.items().iter().all(|t| !t.completed && !t.is_current_task));
    }

    #[test]
    fn blank_text_is_rejected() {
        let mut list = TodoList::new();
        assert_eq!(
            list.add("   "),
            Err(ValidationError::EmptyText("todo text".into()))
        );
        assert!(list.is_empty());
    }

    #[test]
    fn toggle_flips_and_ignores_unknown() {
        let (mut list, ids) = list_with(&["a"]);
        assert!(list.toggle(&ids[0]));
        assert!(list.items()[0].completed);
        assert!(list.toggle(&ids[0]));
        assert!(!list.items()[0].completed);
        assert!(!list.toggle("nope"));
    }

    #[test]
    fn only_one_current_task() {
        let (mut list, ids) = list_with(&["a", "b"]);
        list.set_current(&ids[0]);
        list.set_current(&ids[1]);
        let flags: Vec<_> = list.items().iter().map(|t| t.is_current_task).collect();
        assert_eq!(flags, [false, true]);
        assert_eq!(list.current().map(|t| t.text.as_str()), Some("b"));

        assert!(list.set_current("missing").is_none());
        assert!(list.items().iter().all(|t| !t.is_current_task));
    }

    #[test]
    fn deleting_current_clears_pointer() {
        let (mut list, ids) = list_with(&["a", "b"]);
        list.set_current(&ids[0]);
        assert!(list.delete(&ids[1]));
        assert!(list.current().is_some());
        assert!(list.delete(&ids[0]));
        assert!(list.current().is_none());
        assert!(!list.delete(&ids[0]));
    }

    #[test]
    fn clear_current_resets_flags() {
        let (mut list, ids) = list_with(&["a"]);
        list.set_current(&ids[0]);
        list.clear_current();
        assert!(list.current().is_none());
        assert!(!list.items()[0].is_current_task);
    }

    #[test]
    fn clear_completed_drops_done_items() {
        let (mut list, ids) = list_with(&["a", "b", "c"]);
        list.toggle(&ids[0]);
        list.toggle(&ids[2]);
        assert_eq!(list.clear_completed(), 2);
        assert_eq!(list.len(), 1);
        assert_eq!(list.remaining(), 1);
        assert_eq!(list.items()[0].id, ids[1]);
    }
}
