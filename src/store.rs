// In-memory ordered task store

use crate::error::{Result, TodoError};
use crate::task::Task;
use tracing::debug;

/// Capacity a store starts with when none is configured
pub const DEFAULT_CAPACITY: usize = 5;

const GROWTH_FACTOR: usize = 2;

/// Ordered, growable collection of tasks
///
/// Position in the sequence is the only identifier a task has. Removal shifts
/// later tasks left, so relative order always matches insertion order.
#[derive(Debug, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl TaskStore {
    /// Create an empty store with room for `capacity` tasks
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tasks: Vec::with_capacity(capacity),
        }
    }

    /// Create a store holding `tasks`, in order
    ///
    /// Capacity is at least `capacity` and at least `tasks.len()`.
    pub fn from_tasks(tasks: Vec<Task>, capacity: usize) -> Self {
        let mut store = Self::with_capacity(capacity.max(tasks.len()));
        store.tasks.extend(tasks);
        store
    }

    /// Append a pending task
    ///
    /// Fails with `OversizedField` without touching the store if either text
    /// is over its bound.
    pub fn add(&mut self, description: &str, due_date: &str) -> Result<()> {
        let task = Task::new(description, due_date)?;
        self.push(task);
        Ok(())
    }

    /// Append an already-built task, growing capacity when full
    pub fn push(&mut self, task: Task) {
        if self.tasks.len() == self.tasks.capacity() {
            self.grow();
        }
        self.tasks.push(task);
    }

    fn grow(&mut self) {
        let old = self.tasks.capacity();
        let new = (old * GROWTH_FACTOR).max(1);
        self.tasks.reserve_exact(new - self.tasks.len());
        debug!(old, new = self.tasks.capacity(), "grew task store capacity");
    }

    /// All tasks in sequence order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Mark the task at `index` completed
    pub fn mark_completed(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.tasks[index].completed = true;
        Ok(())
    }

    /// Remove and return the task at `index`, shifting later tasks left
    pub fn remove(&mut self, index: usize) -> Result<Task> {
        self.check_index(index)?;
        Ok(self.tasks.remove(index))
    }

    /// Number of live tasks
    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tasks.capacity()
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.tasks.len() {
            return Err(TodoError::InvalidIndex {
                index,
                size: self.tasks.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Field, Oversized};

    fn store_with(n: usize) -> TaskStore {
        let mut store = TaskStore::default();
        for i in 0..n {
            store.add(&format!("task {}", i), &format!("day {}", i)).unwrap();
        }
        store
    }

    fn descriptions(store: &TaskStore) -> Vec<String> {
        store.list().iter().map(|t| t.description.to_string()).collect()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = TaskStore::default();
        assert_eq!(store.size(), 0);
        assert!(store.is_empty());
        assert!(store.capacity() >= DEFAULT_CAPACITY);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let store = store_with(4);
        assert_eq!(store.size(), 4);
        assert_eq!(descriptions(&store), vec!["task 0", "task 1", "task 2", "task 3"]);
        assert!(store.list().iter().all(|t| !t.completed));
    }

    #[test]
    fn test_add_past_initial_capacity() {
        let mut store = TaskStore::with_capacity(5);
        for i in 0..5 {
            store.add(&format!("task {}", i), "").unwrap();
        }
        store.add("task 5", "").unwrap();

        assert_eq!(store.size(), 6);
        assert!(store.capacity() >= 6);
        assert_eq!(store.get(5).unwrap().description.as_str(), "task 5");
        assert_eq!(store.get(0).unwrap().description.as_str(), "task 0");
    }

    #[test]
    fn test_zero_capacity_store_grows() {
        let mut store = TaskStore::with_capacity(0);
        store.add("first", "").unwrap();
        store.add("second", "").unwrap();
        assert_eq!(descriptions(&store), vec!["first", "second"]);
    }

    #[test]
    fn test_add_oversized_is_rejected() {
        let mut store = store_with(2);
        let long = "x".repeat(crate::task::MAX_DESCRIPTION_LEN + 1);

        let err = store.add(&long, "2024-01-01").unwrap_err();
        assert!(matches!(
            err,
            TodoError::OversizedField(Oversized {
                field: Field::Description,
                ..
            })
        ));
        assert_eq!(store.size(), 2);

        let err = store.add("ok", "this due date is far too long").unwrap_err();
        assert!(matches!(err, TodoError::OversizedField(Oversized { field: Field::DueDate, .. })));
        assert_eq!(store.size(), 2);
    }

    #[test]
    fn test_mark_completed() {
        let mut store = store_with(3);
        store.mark_completed(1).unwrap();
        assert!(!store.get(0).unwrap().completed);
        assert!(store.get(1).unwrap().completed);
        assert!(!store.get(2).unwrap().completed);

        // Marking twice is harmless
        store.mark_completed(1).unwrap();
        assert!(store.get(1).unwrap().completed);
    }

    #[test]
    fn test_mark_completed_invalid_index() {
        let mut store = store_with(3);
        let before = store.list().to_vec();

        let err = store.mark_completed(3).unwrap_err();
        assert!(matches!(err, TodoError::InvalidIndex { index: 3, size: 3 }));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut store = store_with(5);
        let removed = store.remove(1).unwrap();
        assert_eq!(removed.description.as_str(), "task 1");
        assert_eq!(store.size(), 4);
        assert_eq!(descriptions(&store), vec!["task 0", "task 2", "task 3", "task 4"]);
    }

    #[test]
    fn test_remove_every_position() {
        for i in 0..5 {
            let mut store = store_with(5);
            let mut expected = descriptions(&store);
            expected.remove(i);

            store.remove(i).unwrap();
            assert_eq!(store.size(), 4);
            assert_eq!(descriptions(&store), expected);
        }
    }

    #[test]
    fn test_remove_invalid_index() {
        let mut store = store_with(2);
        let before = store.list().to_vec();

        assert!(matches!(
            store.remove(2).unwrap_err(),
            TodoError::InvalidIndex { index: 2, size: 2 }
        ));
        assert!(store.remove(usize::MAX).is_err());
        assert_eq!(store.list(), before.as_slice());

        let mut empty = TaskStore::default();
        assert!(empty.remove(0).is_err());
        assert!(empty.mark_completed(0).is_err());
    }

    #[test]
    fn test_from_tasks_keeps_order_and_capacity() {
        let tasks = store_with(7).into_tasks();
        let store = TaskStore::from_tasks(tasks, 5);
        assert_eq!(store.size(), 7);
        assert!(store.capacity() >= 7);
        assert_eq!(store.get(6).unwrap().description.as_str(), "task 6");
    }
}
