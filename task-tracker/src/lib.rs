use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// One tracked to-do item.
#[derive(Debug, Eq, PartialEq, Serialize, Deserialize, Clone)]
pub struct Task {
    pub id: u32,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
}

/// Raised only when rewriting the backing file fails. Everything else the
/// store recovers from internally.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot write task file: {0}")]
    Write(#[from] std::io::Error),
    #[error("cannot serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// How the backing file was read at construction time.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum LoadOutcome {
    /// File existed and parsed; tasks were loaded as stored.
    Loaded,
    /// File did not exist; store starts empty.
    Missing,
    /// File existed but was unreadable or malformed; store starts empty
    /// and the old contents are overwritten on the next mutation.
    Corrupt,
}

/// Snapshot of task counts. `percentage` is `None` for an empty store,
/// not zero.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub percentage: Option<f64>,
}

/// Ordered collection of tasks kept in sync with a JSON file. Every
/// mutation rewrites the whole file before it returns.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    path: PathBuf,
}

impl TaskStore {
    /// Reads the backing file at `path`, falling back to an empty store
    /// when the file is missing or corrupt. Never fails.
    pub fn load(path: impl Into<PathBuf>) -> (Self, LoadOutcome) {
        let path = path.into();
        let (tasks, outcome) = if path.exists() {
            let parsed = fs::read_to_string(&path)
                .ok()
                .and_then(|contents| serde_json::from_str(&contents).ok());
            match parsed {
                Some(tasks) => (tasks, LoadOutcome::Loaded),
                None => (Vec::new(), LoadOutcome::Corrupt),
            }
        } else {
            (Vec::new(), LoadOutcome::Missing)
        };
        (Self { tasks, path }, outcome)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Appends a new task and persists. The caller has already rejected
    /// empty descriptions; the store does not re-check.
    ///
    /// Ids are assigned as `len + 1`, reproducing the reference behavior:
    /// after a delete, a later add can hand out an id an existing task
    /// still holds.
    pub fn add(&mut self, description: String) -> Result<&Task, StoreError> {
        let task = Task {
            id: self.tasks.len() as u32 + 1,
            description,
            completed: false,
            created_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        self.tasks.push(task);
        self.persist()?;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Marks the first task with `id` as completed and persists. Returns
    /// `Ok(None)` when no task matches; nothing is written in that case.
    pub fn complete(&mut self, id: u32) -> Result<Option<&Task>, StoreError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };
        self.tasks[index].completed = true;
        self.persist()?;
        Ok(Some(&self.tasks[index]))
    }

    /// Removes the first task with `id` and persists, returning the removed
    /// task. Ids of the remaining tasks are never renumbered. Returns
    /// `Ok(None)` when no task matches; nothing is written in that case.
    pub fn delete(&mut self, id: u32) -> Result<Option<Task>, StoreError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };
        let removed = self.tasks.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn statistics(&self) -> Statistics {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        let percentage = if total > 0 {
            // One decimal place, matching the display format.
            Some((completed as f64 / total as f64 * 1000.0).round() / 10.0)
        } else {
            None
        };
        Statistics {
            total,
            completed,
            active: total - completed,
            percentage,
        }
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}


#[cfg(test)]
mod statistics_tests {
    use super::*;
    use assert_fs::TempDir;

    fn store_in(dir: &TempDir) -> TaskStore {
        TaskStore::load(dir.path().join("tasks.json")).0
    }

    #[test]
    fn empty_store_omits_percentage() {
        let dir = TempDir::new().unwrap();
        let stats = store_in(&dir).statistics();
        assert_eq!(
            stats,
            Statistics {
                total: 0,
                completed: 0,
                active: 0,
                percentage: None,
            }
        );
    }

    #[test]
    fn counts_always_balance() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        for i in 0..5 {
            store.add(format!("Task {i}")).unwrap();
        }
        store.complete(1).unwrap();
        store.complete(4).unwrap();
        store.delete(2).unwrap();

        let stats = store.statistics();
        assert_eq!(stats.active + stats.completed, stats.total);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 2);
    }

    #[test]
    fn percentage_rounds_to_one_decimal() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add("A".to_string()).unwrap();
        store.add("B".to_string()).unwrap();
        store.add("C".to_string()).unwrap();
        store.complete(1).unwrap();

        // 1/3 completed = 33.333...%, rounded to 33.3.
        assert_eq!(store.statistics().percentage, Some(33.3));
    }

    #[test]
    fn add_complete_delete_scenario() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.add("Buy milk".to_string()).unwrap();
        assert_eq!(store.tasks()[0].id, 1);
        assert!(!store.tasks()[0].completed);

        store.complete(1).unwrap();
        let stats = store.statistics();
        assert_eq!((stats.total, stats.completed, stats.active), (1, 1, 0));
        assert_eq!(stats.percentage, Some(100.0));

        store.add("Walk dog".to_string()).unwrap();
        assert_eq!(store.tasks()[1].id, 2);

        store.delete(1).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].description, "Walk dog");
        assert_eq!(store.tasks()[0].id, 2, "surviving id is not renumbered");
        let stats = store.statistics();
        assert_eq!((stats.total, stats.completed, stats.active), (1, 0, 1));
        assert_eq!(stats.percentage, Some(0.0));
    }
}
