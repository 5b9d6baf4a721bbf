//! SQLite-backed task store

use super::{NewTask, Task, TaskPriority};
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// SQLite-backed task store
pub struct TaskStore {
    conn: Mutex<Connection>,
}

impl TaskStore {
    /// Create or open the task database at ~/.config/episteme/tasks.db
    pub fn open_default() -> Result<Self, String> {
        let db_path = Self::default_db_path()?;

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        Self::open(&db_path)
    }

    /// Open a task database at an explicit path
    pub fn open(path: &Path) -> Result<Self, String> {
        let conn = Connection::open(path)
            .map_err(|e| format!("Failed to open task database: {}", e))?;
        Self::from_connection(conn)
    }

    /// In-memory store, used in tests
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("Failed to open in-memory database: {}", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                priority TEXT NOT NULL DEFAULT 'medium',
                category TEXT NOT NULL DEFAULT 'General',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_created
                ON tasks(created_at ASC);
        "#,
        )
        .map_err(|e| format!("Failed to create tables: {}", e))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn default_db_path() -> Result<PathBuf, String> {
        dirs::config_dir()
            .map(|d| d.join("episteme").join("tasks.db"))
            .ok_or_else(|| "Could not determine config directory".to_string())
    }

    /// Fixed-width UTC timestamp so lexicographic ordering matches time
    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            title: row.get(1)?,
            completed: row.get::<_, i64>(2)? != 0,
            priority: TaskPriority::from_str(&row.get::<_, String>(3)?),
            category: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    /// Insert a task, returning the stored row
    pub fn add(&self, new: NewTask) -> Result<Task, String> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err("Task title cannot be empty".to_string());
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            completed: false,
            priority: new.priority,
            category: if new.category.trim().is_empty() {
                "General".to_string()
            } else {
                new.category.trim().to_string()
            },
            created_at: Self::now(),
            updated_at: Self::now(),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tasks (id, title, completed, priority, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                task.id,
                task.title,
                task.completed as i64,
                task.priority.as_str(),
                task.category,
                task.created_at,
                task.updated_at,
            ],
        )
        .map_err(|e| format!("Failed to insert task: {}", e))?;

        tracing::debug!("[Tasks] Added '{}' ({})", task.title, task.id);
        Ok(task)
    }

    /// All tasks, oldest first
    pub fn list(&self) -> Result<Vec<Task>, String> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, completed, priority, category, created_at, updated_at
                 FROM tasks ORDER BY created_at ASC",
            )
            .map_err(|e| format!("Query prepare failed: {}", e))?;

        let rows = stmt
            .query_map([], Self::row_to_task)
            .map_err(|e| format!("Query failed: {}", e))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("Failed to collect tasks: {}", e))
    }

    /// Flip a task's completed flag, returning the updated row
    pub fn toggle(&self, id: &str) -> Result<Task, String> {
        let conn = self.conn.lock().unwrap();

        let updated = conn
            .execute(
                "UPDATE tasks SET completed = 1 - completed, updated_at = ?2 WHERE id = ?1",
                params![id, Self::now()],
            )
            .map_err(|e| format!("Failed to toggle task: {}", e))?;

        if updated == 0 {
            return Err(format!("Task not found: {}", id));
        }

        conn.query_row(
            "SELECT id, title, completed, priority, category, created_at, updated_at
             FROM tasks WHERE id = ?1",
            params![id],
            Self::row_to_task,
        )
        .map_err(|e| format!("Failed to read task back: {}", e))
    }

    /// Remove a task
    pub fn delete(&self, id: &str) -> Result<(), String> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .map_err(|e| format!("Failed to delete task: {}", e))?;

        if deleted == 0 {
            return Err(format!("Task not found: {}", id));
        }

        tracing::debug!("[Tasks] Deleted {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_list() {
        let store = TaskStore::open_in_memory().unwrap();

        let first = store.add(NewTask::new("Read chapter 4")).unwrap();
        let second = store
            .add(NewTask {
                title: "  Revise notes  ".to_string(),
                priority: TaskPriority::High,
                category: "Biology".to_string(),
            })
            .unwrap();

        assert_eq!(second.title, "Revise notes");
        assert!(!first.completed);

        let tasks = store.list().unwrap();
        assert_eq!(tasks.len(), 2);
        // Oldest first
        assert_eq!(tasks[0].id, first.id);
        assert_eq!(tasks[1].priority, TaskPriority::High);
        assert_eq!(tasks[1].category, "Biology");
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let store = TaskStore::open_in_memory().unwrap();
        assert!(store.add(NewTask::new("   ")).is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_toggle_flips_and_bumps_updated_at() {
        let store = TaskStore::open_in_memory().unwrap();
        let task = store.add(NewTask::new("Flashcards")).unwrap();

        let toggled = store.toggle(&task.id).unwrap();
        assert!(toggled.completed);
        assert!(toggled.updated_at >= task.updated_at);

        let again = store.toggle(&task.id).unwrap();
        assert!(!again.completed);
    }

    #[test]
    fn test_toggle_missing_task() {
        let store = TaskStore::open_in_memory().unwrap();
        assert!(store.toggle("nope").is_err());
    }

    #[test]
    fn test_delete() {
        let store = TaskStore::open_in_memory().unwrap();
        let task = store.add(NewTask::new("Temporary")).unwrap();

        store.delete(&task.id).unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(store.delete(&task.id).is_err());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.db");

        let id = {
            let store = TaskStore::open(&path).unwrap();
            store.add(NewTask::new("Persisted")).unwrap().id
        };

        let reopened = TaskStore::open(&path).unwrap();
        let tasks = reopened.list().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
    }
}
