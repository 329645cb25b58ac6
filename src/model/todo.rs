use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Todo priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: high = 3, medium = 2, low = 1
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            _ => Err(format!("invalid priority '{}' (expected high, medium, low)", s)),
        }
    }
}

/// A single todo record as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Opaque id assigned by the store
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// Free-form category label; the UI offers the configured set
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Fields sent to the store when creating a todo
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTodo {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub category: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub user_id: String,
}

/// Error for rejected todo input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoInputError {
    #[error("todo text must not be blank")]
    BlankText,
}

impl NewTodo {
    /// Build an insert request. Text and description are trimmed; an empty
    /// description becomes `None`. Blank text is rejected.
    pub fn new(
        text: &str,
        description: Option<&str>,
        category: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
        user_id: &str,
    ) -> Result<Self, TodoInputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoInputError::BlankText);
        }
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(NewTodo {
            text: text.to_string(),
            description,
            completed: false,
            category: category.to_string(),
            priority,
            due_date,
            user_id: user_id.to_string(),
        })
    }
}

/// A targeted field-level update. `None` leaves a field untouched.
/// For the nullable fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        TodoPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }

    /// Rename a todo. Blank text is rejected like on creation.
    pub fn text(text: &str) -> Result<Self, TodoInputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TodoInputError::BlankText);
        }
        Ok(TodoPatch {
            text: Some(text.to_string()),
            ..Default::default()
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == TodoPatch::default()
    }

    /// Apply this patch to a todo in place
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(category) = &self.category {
            todo.category = category.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}

/// Short display form of a todo id (first 8 chars)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
