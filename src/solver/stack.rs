//! Cursor-based traversal used by the explicit-stack search

use std::collections::HashMap;

use crate::models::{Actor, ActorId, Note};

/// An ordered list with a cursor that moves forward and backward
///
/// The cursor starts before the first element, so the first `next` yields
/// element 0. Moving back past the first element leaves the cursor before
/// the start again, where `current` is `None`.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
    cursor: Option<usize>,
}

impl<T> Stack<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items, cursor: None }
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|i| self.items.get(i))
    }

    /// Advance and return the new current element
    ///
    /// At the last element the cursor stays put and `None` is returned.
    pub fn next(&mut self) -> Option<&T> {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next >= self.items.len() {
            return None;
        }
        self.cursor = Some(next);
        self.items.get(next)
    }

    /// Step back and return the new current element
    pub fn prev(&mut self) -> Option<&T> {
        self.cursor = match self.cursor {
            Some(0) | None => None,
            Some(i) => Some(i - 1),
        };
        self.current()
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.map_or(self.items.is_empty(), |i| i + 1 >= self.items.len())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-actor candidate values, each traversed with its own cursor
#[derive(Debug, Default)]
pub struct ValueMap {
    values: HashMap<ActorId, Stack<Note>>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_values(&self, actor: &Actor) -> bool {
        self.values.contains_key(&actor.id())
    }

    pub fn set_values(&mut self, actor: &Actor, notes: Vec<Note>) {
        self.values.insert(actor.id(), Stack::new(notes));
    }

    /// The actor's next untried value, if any
    pub fn next_value(&mut self, actor: &Actor) -> Option<Note> {
        self.values.get_mut(&actor.id()).and_then(|s| s.next().copied())
    }

    pub fn clear(&mut self, actor: &Actor) {
        self.values.remove(&actor.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiatonicPitch, Duration};

    #[test]
    fn test_stack_cursor() {
        let mut stack = Stack::new(vec![1, 2, 3]);
        assert_eq!(stack.current(), None);
        assert_eq!(stack.next(), Some(&1));
        assert_eq!(stack.next(), Some(&2));
        assert_eq!(stack.next(), Some(&3));
        assert!(stack.is_at_end());
        assert_eq!(stack.next(), None);
        assert_eq!(stack.current(), Some(&3));
        assert_eq!(stack.prev(), Some(&2));
        assert_eq!(stack.prev(), Some(&1));
        assert_eq!(stack.prev(), None);
        assert_eq!(stack.current(), None);
    }

    #[test]
    fn test_value_map_exhaustion() {
        let note = |text: &str| Note::new(DiatonicPitch::parse(text).unwrap(), Duration::QUARTER, 0);
        let actor = Actor::new(note("C:5"));
        let mut values = ValueMap::new();
        assert!(!values.has_values(&actor));

        values.set_values(&actor, vec![note("D:5"), note("E:5")]);
        assert_eq!(values.next_value(&actor), Some(note("D:5")));
        assert_eq!(values.next_value(&actor), Some(note("E:5")));
        assert_eq!(values.next_value(&actor), None);

        values.clear(&actor);
        assert!(!values.has_values(&actor));
    }
}
